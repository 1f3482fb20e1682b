//! `<floatings>`: rigid bodies moved by the fluid

use super::geometry::meters3;
use super::{mk_entries, mkbound, Scope};
use crate::context::Node;
use crate::error::{CompileError, Result};
use crate::template::{format_number, Fields};

/// Optional vectors: context key, emitted tag, millimetre conversion
const EXTRAS: [(&str, &str, bool); 6] = [
    ("center", "center", true),
    ("inertia", "inertia", false),
    ("velini", "velini", false),
    ("omegaini", "omegaini", false),
    ("translation_dof", "translationDOF", false),
    ("rotation_dof", "rotationDOF", false),
];

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let mut items = Vec::new();
    for (real_mk, props) in mk_entries(scope)? {
        let Some(floating) = props.opt("floating") else {
            continue;
        };
        let mkbound = mkbound(real_mk).ok_or_else(|| CompileError::schema(props.path(), "floating"))?;
        let property = match props.opt("material") {
            Some(material) => scope.attr("property", material.str("name")?)?,
            None => String::new(),
        };
        let mut extras = String::new();
        for (key, tag, in_mm) in EXTRAS {
            if floating.opt(key).is_some() {
                extras.push_str("\n    ");
                extras.push_str(&vector(scope, &floating, key, tag, in_mm)?);
            }
        }
        let fields = Fields::new()
            .set("mkbound", mkbound.to_string())
            .raw("property", property)
            .set("mass_kind", floating.str("mass_kind")?)
            .set("mass_value", floating.str("mass_value")?)
            .raw("extras", extras);
        items.push(scope.render("floatings/floating.xml", &fields)?);
    }
    scope.container("floatings/floatings.xml", items, 4)
}

fn vector(scope: &Scope<'_>, floating: &Node<'_>, key: &str, tag: &str, in_mm: bool) -> Result<String> {
    let values: [String; 3] = if in_mm {
        meters3(floating.point(key)?).map(format_number)
    } else {
        let items = floating.seq(key)?;
        let strings = items.iter().map(|n| n.as_string()).collect::<Result<Vec<_>>>()?;
        strings
            .try_into()
            .map_err(|_| CompileError::schema(floating.path(), key))?
    };
    let [x, y, z] = values;
    scope.render(
        "floatings/vector.xml",
        &Fields::new().set("tag", tag).set("x", x).set("y", y).set("z", z),
    )
}
