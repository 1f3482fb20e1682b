//! `<relaxationzones>`: wave generation by velocity relaxation

use super::{flatten, nested, Scope};
use crate::context::Node;
use crate::error::{CompileError, Result};
use crate::template::{indent, Fields};

const MM_KEYS: &[&str] = &[
    "center",
    "width",
    "movedata",
    "domainbox_point",
    "domainbox_size",
    "savemotion_xpos",
    "savemotion_zpos",
];

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let Some(zone) = scope.ctx.opt("relaxation_zone") else {
        return Ok(String::new());
    };
    let tag = zone.tag()?;
    let mut fields = flatten(&zone, MM_KEYS)?;
    match tag.as_str() {
        "regular" | "irregular" | "file" => {}
        "uniform" => fields.insert_raw("velocity", nested(&velocity(scope, &zone.get("velocity")?)?, 4)),
        other => return Err(CompileError::schema(zone.path(), other)),
    }
    let body = scope.render(&format!("rzones/{}.xml", tag), &fields)?;
    scope.render("rzones/relaxationzones.xml", &Fields::new().raw("zone", indent(&body, 4)))
}

/// Constant velocity, or a velocity series as `(time, value)` pairs
fn velocity(scope: &Scope<'_>, node: &Node<'_>) -> Result<String> {
    match node.tag()?.as_str() {
        "constant" => scope.render("rzones/velocity.xml", &Fields::new().set("value", node.str("value")?)),
        "times" => {
            let mut values = Vec::new();
            for pair in node.seq("series")? {
                values.push(scope.render(
                    "rzones/timevalue.xml",
                    &Fields::new().set("time", pair.str("time")?).set("value", pair.str("value")?),
                )?);
            }
            scope.render(
                "rzones/velocitytimes.xml",
                &Fields::new().raw("values", nested(&values.join("\n"), 4)),
            )
        }
        other => Err(CompileError::schema(node.path(), other)),
    }
}
