//! Geometry commands of the `<mainlist>`
//!
//! Each drawable object becomes an mk selector, a draw mode and one draw
//! command. Rotated objects are moved and rotated through the transform
//! matrix and drawn at the local origin; the matrix is reset around them so
//! the following objects start from identity.

use super::geometry::{self, Rotation, UNIT_DIVISOR};
use super::Scope;
use crate::case::{BOUND_MK_OFFSET, FLUID_MK_OFFSET};
use crate::context::Node;
use crate::error::{CompileError, Result};
use crate::template::{comment_text, join_fragments, Fields};

const FACE_ORDER: [&str; 6] = ["front", "back", "top", "bottom", "left", "right"];

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let mut out = Vec::new();
    for object in scope.ctx.seq("objects")? {
        if object.str("kind")? == "special" {
            continue;
        }
        out.push(render_object(scope, &object)?);
    }
    Ok(join_fragments(out))
}

/// Draw commands for one object; degenerate placements are reported and
/// render nothing
fn render_object(scope: &Scope<'_>, object: &Node<'_>) -> Result<String> {
    let drawn = draw(scope, object);
    scope.recover(drawn)
}

/// Real mk of an object node
pub fn real_mk(object: &Node<'_>) -> Result<u32> {
    let mk = object.get("mk")?.as_f64()? as u32;
    Ok(match object.str("kind")?.as_str() {
        "fluid" => mk + FLUID_MK_OFFSET,
        _ => mk + BOUND_MK_OFFSET,
    })
}

struct Drawing {
    command: String,
    move_to: Option<[f64; 3]>,
    rotation: Option<Rotation>,
}

/// Draw commands for one object, failing on degenerate geometry
pub fn draw(scope: &Scope<'_>, object: &Node<'_>) -> Result<String> {
    let shape = object.get("shape")?;
    let drawing = match shape.tag()?.as_str() {
        "box" => draw_box(scope, object, &shape)?,
        "sphere" => draw_sphere(scope, &shape)?,
        "cylinder" => draw_cylinder(scope, &shape)?,
        "fillbox" => draw_fillbox(scope, &shape)?,
        _ => draw_complex(scope, object)?,
    };

    let mut transform = Vec::new();
    if let Some(p) = drawing.move_to {
        transform.push(scope.render("objects/move.xml", &Fields::new().point("move", p))?);
    }
    if let Some(r) = drawing.rotation {
        transform.push(scope.render(
            "objects/rotate.xml",
            &Fields::new().num("ang", r.angle_deg).point("vec", r.vec),
        )?);
    }
    let (transform, reset) = if transform.is_empty() {
        (String::new(), String::new())
    } else {
        let reset = scope.render("objects/matrixreset.xml", &Fields::new())?;
        transform.insert(0, reset.clone());
        (format!("\n{}", transform.join("\n")), format!("\n{}", reset))
    };

    let fields = Fields::new()
        .raw("label", comment_text(&object.str("label")?))
        .set("kind", object.str("kind")?)
        .set("mk", object.str("mk")?)
        .set("mode", object.str("fill_mode")?)
        .raw("transform", transform)
        .raw("draw", drawing.command)
        .raw("reset", reset);
    scope.render("objects/object.xml", &fields)
}

/// Origin to draw at plus the transform that brings it into place
fn placed(placement: &Node<'_>) -> Result<([f64; 3], Option<[f64; 3]>, Option<Rotation>)> {
    let base = geometry::base(placement)?;
    match geometry::rotation(placement)? {
        Some(r) => Ok(([0.0; 3], Some(base), Some(r))),
        None => Ok((base, None, None)),
    }
}

fn draw_box(scope: &Scope<'_>, object: &Node<'_>, shape: &Node<'_>) -> Result<Drawing> {
    let (origin, move_to, rotation) = placed(&shape.get("placement")?)?;
    let size = geometry::meters3(shape.point("size")?);

    let (boxfill, layers) = match object.opt("faces") {
        Some(faces) => {
            let layers: Vec<String> = faces
                .seq("layers")?
                .iter()
                .map(|l| l.as_string())
                .collect::<Result<_>>()?;
            let layers = if layers.is_empty() {
                String::new()
            } else {
                let tag = scope.render("objects/layers.xml", &Fields::new().set("vdp", layers.join(",")))?;
                format!("\n    {}", tag)
            };
            (face_pattern(&faces)?, layers)
        }
        None => ("solid".to_string(), String::new()),
    };

    let fields = Fields::new()
        .set("boxfill", boxfill)
        .point("point", origin)
        .point("size", size)
        .raw("layers", layers);
    Ok(Drawing {
        command: scope.render("objects/box.xml", &fields)?,
        move_to,
        rotation,
    })
}

/// `solid` when every face or none is selected, otherwise the selected
/// faces joined with ` | `
pub fn face_pattern(faces: &Node<'_>) -> Result<String> {
    if faces.flag("all")? {
        return Ok("solid".to_string());
    }
    let mut selected = Vec::new();
    for face in FACE_ORDER {
        if faces.flag(face)? {
            selected.push(face);
        }
    }
    if selected.is_empty() || selected.len() == FACE_ORDER.len() {
        return Ok("solid".to_string());
    }
    Ok(selected.join(" | "))
}

fn draw_sphere(scope: &Scope<'_>, shape: &Node<'_>) -> Result<Drawing> {
    let (origin, move_to, rotation) = placed(&shape.get("placement")?)?;
    let fields = Fields::new()
        .num("radius", geometry::meters(shape.f64("radius")?))
        .point("point", origin);
    Ok(Drawing {
        command: scope.render("objects/sphere.xml", &fields)?,
        move_to,
        rotation,
    })
}

fn draw_cylinder(scope: &Scope<'_>, shape: &Node<'_>) -> Result<Drawing> {
    let (origin, move_to, rotation) = placed(&shape.get("placement")?)?;
    let height = geometry::meters(shape.f64("height")?);
    let fields = Fields::new()
        .num("radius", geometry::meters(shape.f64("radius")?))
        .point("point", origin)
        .point("top", geometry::add(origin, [0.0, 0.0, height]));
    Ok(Drawing {
        command: scope.render("objects/cylinder.xml", &fields)?,
        move_to,
        rotation,
    })
}

/// Fill box folder: the `FillLimit` box bounds the fill, the `FillPoint`
/// sphere seeds it
fn draw_fillbox(scope: &Scope<'_>, shape: &Node<'_>) -> Result<Drawing> {
    let children = shape.seq("children")?;
    let limit = fill_child(shape, &children, "FillLimit")?;
    let seed = fill_child(shape, &children, "FillPoint")?;

    let (origin, move_to, rotation) = placed(&limit.get("placement")?)?;
    let seed_point = geometry::base(&seed.get("placement")?)?;
    let seed_point = match (move_to, rotation) {
        (Some(base), Some(r)) => r.to_local(geometry::sub(seed_point, base)),
        _ => seed_point,
    };
    let fields = Fields::new()
        .point("seed", seed_point)
        .point("point", origin)
        .point("size", geometry::meters3(limit.point("size")?));
    Ok(Drawing {
        command: scope.render("objects/fillbox.xml", &fields)?,
        move_to,
        rotation,
    })
}

fn fill_child<'a>(shape: &Node<'a>, children: &[Node<'a>], prefix: &str) -> Result<Node<'a>> {
    for child in children {
        if child.str("label")?.starts_with(prefix) {
            return child.get("shape");
        }
    }
    Err(CompileError::schema(shape.path(), prefix))
}

/// Anything else is exported as an STL file in millimetres
fn draw_complex(scope: &Scope<'_>, object: &Node<'_>) -> Result<Drawing> {
    let name = object.str("name")?;
    let fields = Fields::new()
        .set("file", format!("{}.stl", name))
        .set("name", name)
        .set("autofill", object.str("autofill")?)
        .num("scale", 1.0 / UNIT_DIVISOR);
    Ok(Drawing {
        command: scope.render("objects/complex.xml", &fields)?,
        move_to: None,
        rotation: None,
    })
}
