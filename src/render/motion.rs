//! `<motion>`: segment chains per bound mk
//!
//! Segment ids start at 1 for every mk and keep counting across its
//! movements. A segment points at the next id; the last segment of a looping
//! movement points back at that movement's first id. Special movements take a
//! single id and never chain.

use super::geometry::meters3;
use super::{flatten, mk_entries, mkbound, Scope};
use crate::context::Node;
use crate::error::{CompileError, Result};
use crate::template::{indent, join_fragments, Fields};
use log::warn;

const SEGMENTS: &[&str] = &[
    "rect",
    "acc_rect",
    "rot",
    "acc_rot",
    "cir",
    "acc_cir",
    "rect_sinu",
    "rot_sinu",
    "cir_sinu",
    "wait",
];

/// Segment points given in millimetres
const MM_POINTS: &[&str] = &["axis1", "axis2", "reference"];

/// Generators whose motion is computed by the solver
pub const WAVE_GENERATORS: &[&str] = &["regular_piston", "irregular_piston", "regular_flap", "irregular_flap"];

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let mut items = Vec::new();
    for (real_mk, props) in mk_entries(scope)? {
        let movements = props.seq("movements")?;
        let piston = props.opt("mlpiston").is_some();
        if movements.is_empty() && !piston {
            continue;
        }
        let Some(mkbound) = mkbound(real_mk) else {
            warn!("fluid mk {} has movements; fluid cannot be moved, ignoring", real_mk);
            continue;
        };
        let blocks = if piston {
            if !movements.is_empty() {
                warn!("mkbound {} is driven by a multi-layer piston; its movements are ignored", mkbound);
            }
            vec![null_slot(scope, 1)?]
        } else {
            chain(scope, &movements)?
        };
        if blocks.is_empty() {
            warn!("mkbound {} has no motion segments, omitting it", mkbound);
            continue;
        }
        let fields = Fields::new()
            .set("mkbound", mkbound.to_string())
            .raw("movements", indent(&join_fragments(blocks), 4));
        items.push(scope.render("motion/objreal.xml", &fields)?);
    }
    scope.container("motion/motion.xml", items, 4)
}

fn chain(scope: &Scope<'_>, movements: &[Node<'_>]) -> Result<Vec<String>> {
    let mut out = Vec::new();
    let mut next_id = 1u32;
    for movement in movements {
        match movement.tag()?.as_str() {
            "plain" => {
                let motions = movement.seq("motions")?;
                if motions.is_empty() {
                    warn!("movement {} has no segments, skipping it", movement.path());
                    continue;
                }
                let looping = movement.flag("loop")?;
                let first = next_id;
                for (i, motion) in motions.iter().enumerate() {
                    let id = next_id;
                    next_id += 1;
                    let next = if i + 1 < motions.len() {
                        Some(id + 1)
                    } else if looping {
                        Some(first)
                    } else {
                        None
                    };
                    out.push(segment(scope, motion, id, next)?);
                }
            }
            "special" => {
                out.push(special(scope, &movement.get("generator")?, next_id)?);
                next_id += 1;
            }
            other => return Err(CompileError::schema(movement.path(), other)),
        }
    }
    Ok(out)
}

fn segment(scope: &Scope<'_>, motion: &Node<'_>, id: u32, next: Option<u32>) -> Result<String> {
    let tag = motion.tag()?;
    if !SEGMENTS.contains(&tag.as_str()) {
        return Err(CompileError::schema(motion.path(), tag));
    }
    // sinusoidal translation amplitude is a length, the angular ones are degrees
    let mm: &[&str] = if tag == "rect_sinu" { &["ampl"] } else { MM_POINTS };
    let next = match next {
        Some(n) => scope.attr("next", n.to_string())?,
        None => String::new(),
    };
    let fields = flatten(motion, mm)?.set("id", id.to_string()).raw("next", next);
    scope.render(&format!("motion/{}.xml", tag), &fields)
}

fn special(scope: &Scope<'_>, generator: &Node<'_>, id: u32) -> Result<String> {
    let tag = generator.tag()?;
    match tag.as_str() {
        "file_linear" => {
            let mut columns = String::new();
            for key in ["fieldx", "fieldy", "fieldz"] {
                if let Some(column) = generator.opt_str(key)? {
                    columns.push_str(&scope.attr(key, column)?);
                }
            }
            let fields = Fields::new()
                .set("id", id.to_string())
                .set("duration", generator.str("duration")?)
                .set("filename", generator.str("filename")?)
                .set("fields", generator.str("fields")?)
                .set("fieldtime", generator.str("fieldtime")?)
                .raw("columns", columns);
            scope.render("motion/file_linear.xml", &fields)
        }
        "file_rotational" => {
            let fields = Fields::new()
                .set("id", id.to_string())
                .set("duration", generator.str("duration")?)
                .set("filename", generator.str("filename")?)
                .point("axis1", meters3(generator.point("axis1")?))
                .point("axis2", meters3(generator.point("axis2")?));
            scope.render("motion/file_rotational.xml", &fields)
        }
        t if WAVE_GENERATORS.contains(&t) => null_slot(scope, id),
        _ => Err(CompileError::schema(generator.path(), tag)),
    }
}

fn null_slot(scope: &Scope<'_>, id: u32) -> Result<String> {
    scope.render("motion/null.xml", &Fields::new().set("id", id.to_string()))
}
