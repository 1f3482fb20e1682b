//! `<wavepaddles>`: piston and flap wave makers attached to bound mks

use super::motion::WAVE_GENERATORS;
use super::{flatten, mk_entries, mkbound, nested, Scope};
use crate::context::Node;
use crate::error::{CompileError, Result};

const MM_KEYS: &[&str] = &["flapaxis0", "flapaxis1", "savemotion_xpos", "savemotion_zpos"];

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let mut items = Vec::new();
    for (real_mk, props) in mk_entries(scope)? {
        for movement in props.seq("movements")? {
            if movement.tag()? != "special" {
                continue;
            }
            let generator = movement.get("generator")?;
            let tag = generator.tag()?;
            if !WAVE_GENERATORS.contains(&tag.as_str()) {
                continue;
            }
            let mkbound = mkbound(real_mk).ok_or_else(|| CompileError::schema(props.path(), tag.clone()))?;
            items.push(paddle(scope, mkbound, &tag, &generator)?);
        }
    }
    scope.container("wavepaddles/wavepaddles.xml", items, 4)
}

fn paddle(scope: &Scope<'_>, mkbound: u32, tag: &str, generator: &Node<'_>) -> Result<String> {
    let awas = match generator.opt("awas") {
        Some(awas) => awas_block(scope, &awas)?,
        None => String::new(),
    };
    let fields = flatten(generator, MM_KEYS)?
        .set("mkbound", mkbound.to_string())
        .raw("awas", nested(&awas, 4));
    scope.render(&format!("wavepaddles/{}.xml", tag), &fields)
}

fn awas_block(scope: &Scope<'_>, awas: &Node<'_>) -> Result<String> {
    let correction = match awas.opt("correction") {
        Some(c) => scope.render("wavepaddles/awas_correction.xml", &flatten(&c, &[])?)?,
        None => String::new(),
    };
    let fields = flatten(awas, &[])?.raw("correction", nested(&correction, 4));
    scope.render("wavepaddles/awas.xml", &fields)
}
