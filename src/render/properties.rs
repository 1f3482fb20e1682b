//! `<properties>`: links from bound mks to entries of `materials.xml`

use super::{mk_entries, mkbound, Scope};
use crate::config::MATERIALS_FILE;
use crate::context::Node;
use crate::error::Result;
use crate::template::{indent, Fields};
use indexmap::IndexMap;

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let mut links = Vec::new();
    for (real_mk, props) in mk_entries(scope)? {
        let (Some(mkbound), Some(material)) = (mkbound(real_mk), props.opt("material")) else {
            continue;
        };
        let fields = Fields::new()
            .set("mkbound", mkbound.to_string())
            .set("property", material.str("name")?);
        links.push(scope.render("property_link.xml", &fields)?);
    }
    if links.is_empty() {
        return Ok(String::new());
    }
    let fields = Fields::new()
        .set("file", MATERIALS_FILE)
        .raw("links", indent(&links.join("\n"), 8));
    scope.render("properties.xml", &fields)
}

/// Distinct materials of every mk by name, first definition wins
pub fn materials<'a>(scope: &Scope<'a>) -> Result<IndexMap<String, Node<'a>>> {
    let mut out = IndexMap::new();
    for (_, props) in mk_entries(scope)? {
        if let Some(material) = props.opt("material") {
            out.entry(material.str("name")?).or_insert(material);
        }
    }
    Ok(out)
}
