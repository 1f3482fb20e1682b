//! `<moorings>`: MoorDyn lines attached to floatings

use super::geometry::meters3;
use super::{flatten, nested, Scope};
use crate::context::Node;
use crate::error::{CompileError, Result};
use crate::template::{join_fragments, Fields};

/// Per-line overrides of the line defaults, model key to MoorDyn tag
const LINE_OVERRIDES: &[(&str, &str)] = &[
    ("ea", "ea"),
    ("diameter", "diameter"),
    ("massdeninair", "massDenInAir"),
    ("ba", "ba"),
    ("can", "can"),
    ("cat", "cat"),
    ("cdn", "cdn"),
    ("cdt", "cdt"),
    ("breaktension", "breaklinetension"),
    ("outputflags", "outputFlags"),
];

const OUTPUT_FLAGS: &[&str] = &["tension", "force", "velocity", "position"];

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let moorings = scope.ctx.get("moorings")?;
    if !moorings.enabled()? {
        return Ok(String::new());
    }

    let mut floatings = Vec::new();
    for mkbound in moorings.seq("moored_floatings")? {
        let fields = Fields::new().set("mkbound", mkbound.as_string()?);
        floatings.push(scope.render("moorings/floating.xml", &fields)?);
    }

    let configuration = moorings.get("configuration")?;
    let moordyn = match configuration.str("method")?.as_str() {
        "external" => scope.render(
            "moorings/moordyn_file.xml",
            &Fields::new().set("file", configuration.str("file")?),
        )?,
        "embedded" => embedded(scope, &configuration)?,
        other => return Err(CompileError::schema(configuration.path(), other)),
    };

    let fields = Fields::new()
        .set("savevtk_moorings", moorings.str("savevtk_moorings")?)
        .set("savecsv_points", moorings.str("savecsv_points")?)
        .set("savevtk_points", moorings.str("savevtk_points")?)
        .raw("floatings", nested(&join_fragments(floatings), 8))
        .raw("moordyn", nested(&moordyn, 4));
    scope.render("moorings/moorings.xml", &fields)
}

fn embedded(scope: &Scope<'_>, moordyn: &Node<'_>) -> Result<String> {
    let mut bodies = Vec::new();
    for body in moordyn.seq("bodies")? {
        let depth = match body.opt_str("depth")? {
            Some(depth) => scope.attr("depth", depth)?,
            None => String::new(),
        };
        let fields = Fields::new()
            .set("reference", body.str("reference")?)
            .raw("depth", depth);
        bodies.push(scope.render("moorings/body.xml", &fields)?);
    }

    let mut lines = Vec::new();
    for line in moordyn.seq("lines")? {
        lines.push(line_fragment(scope, &line)?);
    }

    let output = moordyn.get("output")?;
    let mut flags = Vec::new();
    for flag in OUTPUT_FLAGS {
        if output.flag(flag)? {
            flags.push(scope.render("moorings/output_flag.xml", &Fields::new().set("tag", *flag))?);
        }
    }

    let fields = flatten(moordyn, &[])?
        .raw("bodies", nested(&join_fragments(bodies), 8))
        .raw("lines", nested(&join_fragments(lines), 8))
        .raw("flags", nested(&join_fragments(flags), 8));
    scope.render("moorings/moordyn.xml", &fields)
}

fn line_fragment(scope: &Scope<'_>, line: &Node<'_>) -> Result<String> {
    let mut overrides = Vec::new();
    for (key, tag) in LINE_OVERRIDES {
        if let Some(value) = line.opt_str(key)? {
            overrides.push(scope.value_tag(tag, value)?);
        }
    }
    let fields = Fields::new()
        .raw("start", connection(scope, &line.get("start")?)?)
        .raw("end", connection(scope, &line.get("end")?)?)
        .set("length", line.str("length")?)
        .set("segments", line.str("segments")?)
        .raw("overrides", nested(&join_fragments(overrides), 4));
    scope.render("moorings/line.xml", &fields)
}

fn connection(scope: &Scope<'_>, end: &Node<'_>) -> Result<String> {
    let tag = end.tag()?;
    let mut fields = Fields::new().point("point", meters3(end.point("point")?));
    match tag.as_str() {
        "vessel" => fields.insert("bodyref", end.str("bodyref")?),
        "fix" | "connect" => {}
        other => return Err(CompileError::schema(end.path(), other)),
    }
    scope.render(&format!("moorings/{}.xml", tag), &fields)
}
