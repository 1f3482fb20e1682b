//! `<initials>` velocity profiles and mDBC `<normals>`

use super::geometry::{meters, meters3};
use super::{mk_entries, mkbound, nested, objects, Scope};
use crate::case::FLUID_MK_OFFSET;
use crate::context::Node;
use crate::error::{CompileError, Result};
use crate::template::{join_fragments, Fields};
use log::debug;

pub fn render_initials(scope: &Scope<'_>) -> Result<String> {
    let mut items = Vec::new();
    for (real_mk, props) in mk_entries(scope)? {
        let Some(initials) = props.opt("initials") else {
            continue;
        };
        let mkfluid = real_mk
            .checked_sub(FLUID_MK_OFFSET)
            .filter(|_| mkbound(real_mk).is_none())
            .ok_or_else(|| CompileError::schema(props.path(), "initials"))?;
        items.push(initial(scope, mkfluid, &initials)?);
    }
    scope.container("initials/initials.xml", items, 4)
}

fn initial(scope: &Scope<'_>, mkfluid: u32, node: &Node<'_>) -> Result<String> {
    let tag = node.tag()?;
    let mut fields = Fields::new().set("mkfluid", mkfluid.to_string());
    match tag.as_str() {
        "uniform" => fields = fields.point("velocity", node.point("velocity")?),
        "linear" | "parabolic" => {
            fields = fields.point("direction", node.point("direction")?);
            let levels = if tag == "linear" { 2 } else { 3 };
            for i in 1..=levels {
                fields = fields
                    .set(&format!("v{}", i), node.str(&format!("v{}", i))?)
                    .num(&format!("z{}", i), meters(node.f64(&format!("z{}", i))?));
            }
        }
        other => return Err(CompileError::schema(node.path(), other)),
    }
    scope.render(&format!("initials/{}.xml", tag), &fields)
}

pub fn render_normals(scope: &Scope<'_>) -> Result<String> {
    let mut items = Vec::new();
    for (real_mk, props) in mk_entries(scope)? {
        let Some(normals) = props.opt("bound_normals") else {
            continue;
        };
        let mkbound = mkbound(real_mk).ok_or_else(|| CompileError::schema(props.path(), "bound_normals"))?;
        items.push(normal(scope, real_mk, mkbound, &normals)?);
    }
    scope.container("normals/normals.xml", items, 4)
}

fn normal(scope: &Scope<'_>, real_mk: u32, mkbound: u32, node: &Node<'_>) -> Result<String> {
    let tag = node.tag()?;
    let mut fields = Fields::new().set("mkbound", mkbound.to_string());
    if let Some(maxdisth) = node.opt_f64("maxdisth")? {
        fields = fields.num("maxdisth", meters(maxdisth));
    }
    if let Some(radius) = node.opt_f64("radius")? {
        fields = fields.num("radius", meters(radius));
    }
    if let Some(inside) = node.opt_str("inside")? {
        fields.insert("inside", inside);
    }
    for key in ["center", "center1", "center2"] {
        if let Some(p) = node.opt_point(key)? {
            fields = fields.point(key, meters3(p));
        }
    }
    match tag.as_str() {
        "set" => fields = fields.point("normal", node.point("normal")?),
        "plane" => {
            let point = if node.flag("auto_point")? {
                scope.render("normals/plane_point_auto.xml", &Fields::new())?
            } else {
                scope.render(
                    "normals/plane_point.xml",
                    &Fields::new().point("point", meters3(node.point("point")?)),
                )?
            };
            fields = fields.point("normal", node.point("normal")?).raw("point", point);
        }
        "sphere" | "cylinder" => {}
        "parts" => {
            let mut geometry = Vec::new();
            for object in scope.ctx.seq("objects")? {
                if object.str("kind")? != "special" && objects::real_mk(&object)? == real_mk {
                    match objects::draw(scope, &object) {
                        Ok(fragment) => geometry.push(fragment),
                        // the mainlist already reported it
                        Err(e) if e.is_recoverable() => debug!("normals for mkbound {} leave out {}", mkbound, e),
                        Err(e) => return Err(e),
                    }
                }
            }
            fields.insert_raw("geometry", nested(&join_fragments(geometry), 8));
        }
        other => return Err(CompileError::schema(node.path(), other)),
    }
    scope.render(&format!("normals/{}.xml", tag), &fields)
}
