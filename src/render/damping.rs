//! `<damping>` zones
//!
//! A zone whose limits coincide, or a cylinder whose axis has no length, is
//! reported and left out; the rest of the damping block still renders.

use super::geometry::{self, meters, meters3};
use super::{nested, Scope};
use crate::context::Node;
use crate::error::{CompileError, Result};
use crate::template::Fields;

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let mut items = Vec::new();
    for (name, zone) in scope.ctx.entries("damping")? {
        if !zone.enabled()? {
            continue;
        }
        let fragment = zone_fragment(scope, &name, &zone);
        items.push(scope.recover(fragment)?);
    }
    scope.container("damping/damping.xml", items, 4)
}

fn zone_fragment(scope: &Scope<'_>, name: &str, zone: &Node<'_>) -> Result<String> {
    let geometry_node = zone.get("geometry")?;
    let fields = Fields::new()
        .set("name", name)
        .num("overlimit", meters(zone.f64("overlimit")?))
        .set("redumax", zone.str("redumax")?)
        .point("factorxyz", zone.point("factorxyz")?);

    match geometry_node.tag()?.as_str() {
        "zone" => {
            let min = geometry_node.point("limitmin")?;
            let max = geometry_node.point("limitmax")?;
            if geometry::length(geometry::sub(max, min)) < f64::EPSILON {
                return Err(CompileError::degenerate(zone.path(), "limitmax", "coincides with limitmin"));
            }
            let fields = fields.point("limitmin", meters3(min)).point("limitmax", meters3(max));
            scope.render("damping/zone.xml", &fields)
        }
        "box" => {
            let inner = region(&geometry_node.get("inner")?)?;
            let outer_node = geometry_node.get("outer")?;
            let outer = region(&outer_node)?;
            let placement = outer_node.get("placement")?;
            let rotate = match geometry::rotation(&placement)? {
                Some(r) => scope.render(
                    "damping/rotate.xml",
                    &Fields::new()
                        .num("ang", r.angle_deg)
                        .point("vec", r.vec)
                        .point("center", geometry::base(&placement)?),
                )?,
                None => String::new(),
            };
            let directions: Vec<String> = geometry_node
                .seq("directions")?
                .iter()
                .map(|d| d.as_string())
                .collect::<Result<_>>()?;
            let fields = fields
                .set("directions", directions.join(","))
                .point("inner_min", inner.0)
                .point("inner_max", inner.1)
                .point("outer_min", outer.0)
                .point("outer_max", outer.1)
                .raw("rotate", nested(&rotate, 4));
            scope.render("damping/box.xml", &fields)
        }
        "cylinder" => {
            let p1 = geometry_node.point("point1")?;
            let p2 = geometry_node.point("point2")?;
            if geometry::length(geometry::sub(p2, p1)) < f64::EPSILON {
                return Err(CompileError::degenerate(zone.path(), "point2", "cylinder axis has zero length"));
            }
            let fields = fields
                .point("point1", meters3(p1))
                .point("point2", meters3(p2))
                .num("limitmin", meters(geometry_node.f64("limitmin")?))
                .num("limitmax", meters(geometry_node.f64("limitmax")?));
            scope.render("damping/cylinder.xml", &fields)
        }
        other => Err(CompileError::schema(geometry_node.path(), other)),
    }
}

/// Corners of a box region in metres
fn region(node: &Node<'_>) -> Result<([f64; 3], [f64; 3])> {
    let min = geometry::base(&node.get("placement")?)?;
    let size = meters3(node.point("size")?);
    Ok((min, geometry::add(min, size)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{Case, DampingBoxRegion, DampingGeometry, DampingZone, Placement};
    use crate::render::test_support::run;

    fn zone(geometry: DampingGeometry) -> DampingZone {
        DampingZone {
            enabled: true,
            overlimit: 1000.0,
            redumax: 10.0,
            factorxyz: [1.0, 1.0, 1.0],
            geometry,
        }
    }

    #[test]
    fn test_zone_and_degenerate_zone() {
        let mut case = Case::new("D", 0.01);
        case.damping.insert(
            "Good".to_string(),
            zone(DampingGeometry::Zone {
                limitmin: [4000.0, 0.0, 0.0],
                limitmax: [5000.0, 0.0, 0.0],
            }),
        );
        case.damping.insert(
            "Flat".to_string(),
            zone(DampingGeometry::Zone {
                limitmin: [1.0, 1.0, 1.0],
                limitmax: [1.0, 1.0, 1.0],
            }),
        );
        let (out, skipped) = run(&case, render);
        assert_eq!(skipped, 1);
        assert!(out.contains("<dampingzone comment=\"Good\">"));
        assert!(out.contains("<limitmin x=\"4.0\" y=\"0.0\" z=\"0.0\""));
        assert!(out.contains("<overlimit value=\"1.0\""));
        assert!(!out.contains("Flat"));
    }

    #[test]
    fn test_box_outer_corners() {
        let mut case = Case::new("D", 0.01);
        case.damping.insert(
            "Box".to_string(),
            zone(DampingGeometry::Box {
                directions: vec!["left".to_string(), "right".to_string()],
                inner: DampingBoxRegion {
                    placement: Placement::at([100.0, 100.0, 100.0]),
                    size: [800.0, 800.0, 800.0],
                },
                outer: DampingBoxRegion {
                    placement: Placement::at([0.0, 10.0, 20.0]),
                    size: [1000.0, 2000.0, 3000.0],
                },
            }),
        );
        let (out, _) = run(&case, render);
        assert!(out.contains("<directions>left,right</directions>"));
        assert!(out.contains("<pointend x=\"0.9\" y=\"0.9\" z=\"0.9\" />"));
        assert!(out.contains("<pointini x=\"0.0\" y=\"0.01\" z=\"0.02\" />"));
        assert!(out.contains("<pointend x=\"1.0\" y=\"2.01\" z=\"3.02\" />"));
        assert!(!out.contains("<rotate"));
    }

    #[test]
    fn test_disabled_zone_omitted() {
        let mut case = Case::new("D", 0.01);
        let mut z = zone(DampingGeometry::Cylinder {
            point1: [0.0; 3],
            point2: [0.0, 0.0, 100.0],
            limitmin: 10.0,
            limitmax: 20.0,
        });
        z.enabled = false;
        case.damping.insert("Cyl".to_string(), z);
        assert_eq!(run(&case, render).0, "");
    }
}
