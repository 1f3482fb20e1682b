//! `<flexstrucs>`: flexible structures clamped to a bound mk

use super::{leaves, Scope};
use crate::error::Result;

const KEYS: &[&str] = &[
    "mkbound",
    "mkclamp",
    "density",
    "youngmod",
    "poissratio",
    "hgfactor",
    "constitmodel",
];

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let flex = scope.ctx.get("flex_structs")?;
    if !flex.enabled()? {
        return Ok(String::new());
    }
    let mut items = Vec::new();
    for item in flex.seq("structs")? {
        items.push(scope.render("flexstruct/flexstruc.xml", &leaves(&item, KEYS)?)?);
    }
    scope.container("flexstruct/flexstrucs.xml", items, 4)
}
