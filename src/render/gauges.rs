//! `<gauges>`: measurement probes

use super::geometry::{meters, meters3};
use super::Scope;
use crate::context::Node;
use crate::error::{CompileError, Result};
use crate::template::{indent, Fields};

/// Point-like gauge fields given in millimetres
const LENGTHS: &[&str] = &["point", "point0", "point2", "size"];
/// Vector fields passed through unchanged
const VECTORS: &[&str] = &["vec1", "vec2", "vec3", "dirdat"];
const SCALARS: &[&str] = &["pointdp", "masslimit", "distlimit", "mkbound", "outputdata", "kclimit", "kcdummy"];

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let gauges = scope.ctx.get("gauges")?;
    if !gauges.enabled()? {
        return Ok(String::new());
    }
    let mut items = Vec::new();
    for (name, gauge) in gauges.entries("gauges")? {
        items.push(gauge_fragment(scope, &name, &gauge)?);
    }
    scope.container("gauges/gauges.xml", items, 4)
}

fn gauge_fragment(scope: &Scope<'_>, name: &str, gauge: &Node<'_>) -> Result<String> {
    let kind = gauge.get("kind")?;
    let tag = kind.tag()?;
    if !matches!(tag.as_str(), "velocity" | "swl" | "maxz" | "force" | "mesh" | "flow") {
        return Err(CompileError::schema(kind.path(), tag));
    }

    let mut fields = Fields::new()
        .set("name", name)
        .raw("common", indent(&common(scope, &gauge.get("common")?)?, 4));
    for key in LENGTHS {
        if let Some(p) = kind.opt_point(key)? {
            fields = fields.point(key, meters3(p));
        }
    }
    for key in VECTORS {
        if let Some(p) = kind.opt_point(key)? {
            fields = fields.point(key, p);
        }
    }
    for key in SCALARS {
        if let Some(v) = kind.opt_str(key)? {
            fields.insert(key, v);
        }
    }
    if let Some(height) = kind.opt_f64("height")? {
        fields = fields.num("height", meters(height));
    }
    scope.render(&format!("gauges/{}.xml", tag), &fields)
}

fn common(scope: &Scope<'_>, common: &Node<'_>) -> Result<String> {
    let computetime = common.seq("computetime")?;
    let outputtime = common.seq("outputtime")?;
    let (Some(cstart), Some(cend), Some(ostart), Some(oend)) =
        (computetime.first(), computetime.get(1), outputtime.first(), outputtime.get(1))
    else {
        return Err(CompileError::schema(common.path(), "computetime"));
    };
    let fields = Fields::new()
        .set("savevtkpart", common.str("savevtkpart")?)
        .set("computedt", common.str("computedt")?)
        .set("computetime_start", cstart.as_string()?)
        .set("computetime_end", cend.as_string()?)
        .set("output", common.str("output")?)
        .set("outputdt", common.str("outputdt")?)
        .set("outputtime_start", ostart.as_string()?)
        .set("outputtime_end", oend.as_string()?);
    scope.render("gauges/common.xml", &fields)
}
