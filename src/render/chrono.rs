//! `<chrono>`: bodies coupled to the Chrono multibody engine and their links

use super::{flatten, nested, Scope};
use crate::case::BOUND_MK_OFFSET;
use crate::context::Node;
use crate::error::{CompileError, Result};
use crate::template::{join_fragments, Fields};

const MM_KEYS: &[&str] = &[
    "rotpoint",
    "point_fb1",
    "point_fb2",
    "rest_length",
    "radius",
    "radius2",
    "vtk_radius",
    "vtk_length",
];

/// Link kinds that need both bodies
const TWO_BODY_LINKS: &[&str] = &["hinge", "linearspring", "coulombdamping", "pulley"];
/// Link kinds where a missing second body anchors the joint in space
const ANCHORED_LINKS: &[&str] = &["spheric", "pointline"];

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let chrono = scope.ctx.get("chrono")?;
    if !chrono.enabled()? {
        return Ok(String::new());
    }

    let collisiondp = match chrono.opt_str("collisiondp")? {
        Some(dp) => scope.value_tag("collisiondp", dp)?,
        None => String::new(),
    };

    let mut bodies = Vec::new();
    for object in chrono.seq("objects")? {
        bodies.push(body(scope, &object)?);
    }

    let mut links = Vec::new();
    for link in chrono.seq("links")? {
        let fragment = link_fragment(scope, &link);
        links.push(scope.recover(fragment)?);
    }

    let fields = Fields::new()
        .set("savedata", chrono.str("savedata")?)
        .set("schemescale", chrono.str("schemescale")?)
        .raw("collisiondp", nested(&collisiondp, 4))
        .raw("bodies", nested(&join_fragments(bodies), 4))
        .raw("links", nested(&join_fragments(links), 4));
    scope.render("chrono/chrono.xml", &fields)
}

/// Floating when the mk floats, moving when it has a motion, fixed otherwise
fn body(scope: &Scope<'_>, object: &Node<'_>) -> Result<String> {
    let mkbound = object.get("mkbound")?.as_f64()? as u32;
    let real_mk = (mkbound + BOUND_MK_OFFSET).to_string();
    let props = scope
        .ctx
        .entries("mk_properties")?
        .into_iter()
        .find(|(key, _)| *key == real_mk)
        .map(|(_, node)| node);
    let body_type = match &props {
        Some(p) if p.opt("floating").is_some() => "bodyfloating",
        Some(p) if p.opt("mlpiston").is_some() || !p.seq("movements")?.is_empty() => "bodymoving",
        _ => "bodyfixed",
    };
    let model = if object.flag("collisions")? {
        scope.render(
            "chrono/model.xml",
            &Fields::new().set("modelnormal", object.str("modelnormal")?),
        )?
    } else {
        String::new()
    };
    let fields = Fields::new()
        .set("body_type", body_type)
        .set("id", object.str("id")?)
        .set("mkbound", mkbound.to_string())
        .raw("model", model);
    scope.render("chrono/body.xml", &fields)
}

fn link_fragment(scope: &Scope<'_>, link: &Node<'_>) -> Result<String> {
    let tag = link.tag()?;
    if !TWO_BODY_LINKS.contains(&tag.as_str()) && !ANCHORED_LINKS.contains(&tag.as_str()) {
        return Err(CompileError::schema(link.path(), tag));
    }
    let idbody1 = link.str("idbody1")?;
    let idbody2 = link.opt_str("idbody2")?.unwrap_or_default();
    if idbody1.is_empty() {
        return Err(dangling(link, "idbody1"));
    }
    if idbody2.is_empty() && TWO_BODY_LINKS.contains(&tag.as_str()) {
        return Err(dangling(link, "idbody2"));
    }

    let mut fields = flatten(link, MM_KEYS)?;
    if ANCHORED_LINKS.contains(&tag.as_str()) {
        let attr = if idbody2.is_empty() {
            String::new()
        } else {
            scope.attr("idbody2", &idbody2)?
        };
        fields.insert_raw("idbody2", attr);
    }
    scope.render(&format!("chrono/{}.xml", tag), &fields)
}

fn dangling(link: &Node<'_>, field: &str) -> CompileError {
    CompileError::DanglingLink {
        scope: link.path().to_string(),
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{Case, ChronoLink, ChronoObject, Floating, ModelNormal, Motion, Movement};
    use crate::render::test_support::run;

    fn object(id: &str, mkbound: u32, collisions: bool) -> ChronoObject {
        ChronoObject {
            id: id.to_string(),
            mkbound,
            modelnormal: ModelNormal::Original,
            collisions,
        }
    }

    #[test]
    fn test_body_kinds() {
        let mut case = Case::new("C", 0.01);
        case.chrono.enabled = true;
        case.chrono.objects = vec![object("float", 1, true), object("arm", 2, false), object("wall", 3, false)];
        case.properties_mut(12).floating = Some(Floating::with_density(500.0));
        case.properties_mut(13).movements =
            vec![Movement::plain("Spin", false, vec![Motion::Wait { duration: 1.0 }])];
        let (out, _) = run(&case, render);
        assert!(out.contains(
            "<bodyfloating id=\"float\" mkbound=\"1\" modelfile=\"AutoActual\" modelnormal=\"original\" />"
        ));
        assert!(out.contains("<bodymoving id=\"arm\" mkbound=\"2\" />"));
        assert!(out.contains("<bodyfixed id=\"wall\" mkbound=\"3\" />"));
    }

    #[test]
    fn test_anchored_spheric_omits_second_body() {
        let mut case = Case::new("C", 0.01);
        case.chrono.enabled = true;
        case.chrono.links.push(ChronoLink::Spheric {
            idbody1: "float".to_string(),
            idbody2: String::new(),
            rotpoint: [0.0, 0.0, 500.0],
            stiffness: 0.0,
            damping: 0.0,
        });
        let (out, skipped) = run(&case, render);
        assert_eq!(skipped, 0);
        assert!(out.contains("<link_spheric idbody1=\"float\">"));
        assert!(out.contains("<rotpoint x=\"0.0\" y=\"0.0\" z=\"0.5\""));
    }

    #[test]
    fn test_dangling_link_is_skipped() {
        let mut case = Case::new("C", 0.01);
        case.chrono.enabled = true;
        case.chrono.links.push(ChronoLink::Hinge {
            idbody1: "a".to_string(),
            idbody2: String::new(),
            rotpoint: [0.0; 3],
            rotvector: [0.0, 1.0, 0.0],
            stiffness: 0.0,
            damping: 0.0,
        });
        case.chrono.links.push(ChronoLink::Pulley {
            idbody1: "a".to_string(),
            idbody2: "b".to_string(),
            rotpoint: [0.0; 3],
            rotvector: [0.0, 1.0, 0.0],
            radius: 100.0,
            radius2: 200.0,
        });
        let (out, skipped) = run(&case, render);
        assert_eq!(skipped, 1);
        assert!(!out.contains("link_hinge"));
        assert!(out.contains("<link_pulley idbody1=\"a\" idbody2=\"b\">"));
        assert!(out.contains("<radius2 value=\"0.2\""));
    }

    #[test]
    fn test_disabled() {
        assert_eq!(run(&Case::new("C", 0.01), render).0, "");
    }
}
