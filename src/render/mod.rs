//! Feature renderers
//!
//! Every renderer is a free function `fn(&Scope) -> Result<String>` reading
//! only the context. An empty string means the feature is absent and its tag
//! is omitted from the document.
//!
//! # Submodules
//! - `geometry` - unit conversion and rotation helpers
//! - leaf renderers: `constants`, `parameters`, `definition`,
//!   `simulation_domain`, `periodicity`, `accinput`, `damping`, `mlpistons`,
//!   `properties`, `gauges`, `flexstruct`
//! - variant renderers: `objects`, `initials`, `rzones`, `motion`,
//!   `wavepaddles`, `floatings`, `chrono`, `moorings`
//! - tree renderers: `vres`, `outfilters`

pub mod geometry;

pub mod accinput;
pub mod chrono;
pub mod constants;
pub mod damping;
pub mod definition;
pub mod flexstruct;
pub mod floatings;
pub mod gauges;
pub mod initials;
pub mod mlpistons;
pub mod moorings;
pub mod motion;
pub mod objects;
pub mod outfilters;
pub mod parameters;
pub mod periodicity;
pub mod properties;
pub mod rzones;
pub mod simulation_domain;
pub mod vres;
pub mod wavepaddles;

use crate::case::BOUND_MK_OFFSET;
use crate::context::Node;
use crate::error::{CompileError, Result};
use crate::template::{format_number, indent, Fields, TemplateStore};
use serde_json::Value;
use std::cell::RefCell;

/// Renderer entry point
pub type RenderFn = fn(&Scope<'_>) -> Result<String>;

/// Fragments skipped during one compile, with the reason
#[derive(Debug, Default)]
pub struct Report {
    skipped: RefCell<Vec<CompileError>>,
}

impl Report {
    pub fn skip(&self, error: CompileError) {
        log::warn!("skipping fragment: {}", error);
        self.skipped.borrow_mut().push(error);
    }

    pub fn len(&self) -> usize {
        self.skipped.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_inner(self) -> Vec<CompileError> {
        self.skipped.into_inner()
    }
}

/// What a renderer sees: the context root, the template store and the report
pub struct Scope<'a> {
    pub ctx: Node<'a>,
    pub templates: &'a TemplateStore,
    pub report: &'a Report,
}

impl<'a> Scope<'a> {
    pub fn new(ctx: Node<'a>, templates: &'a TemplateStore, report: &'a Report) -> Self {
        Self {
            ctx,
            templates,
            report,
        }
    }

    pub fn render(&self, template: &str, fields: &Fields) -> Result<String> {
        self.templates.render(template, fields)
    }

    pub fn mode_3d(&self) -> Result<bool> {
        self.ctx.flag("mode_3d")
    }

    /// Turn a recoverable failure into a reported, empty fragment
    pub fn recover(&self, result: Result<String>) -> Result<String> {
        match result {
            Err(e) if e.is_recoverable() => {
                self.report.skip(e);
                Ok(String::new())
            }
            other => other,
        }
    }

    /// `<{tag} value="{value}" />`
    pub fn value_tag(&self, tag: &str, value: impl AsRef<str>) -> Result<String> {
        self.render("common/value.xml", &Fields::new().set("tag", tag).set("value", value))
    }

    /// Optional attribute ` {name}="{value}"`, appended after the last
    /// mandatory attribute of a tag
    pub fn attr(&self, name: &str, value: impl AsRef<str>) -> Result<String> {
        self.render("common/attr.xml", &Fields::new().set("name", name).set("value", value))
    }

    /// Wrap `items` in a container template exposing `{each}`; no items
    /// renders nothing
    pub fn container(&self, template: &str, items: Vec<String>, spaces: usize) -> Result<String> {
        let body: Vec<String> = items.into_iter().filter(|i| !i.is_empty()).collect();
        if body.is_empty() {
            return Ok(String::new());
        }
        self.render(template, &Fields::new().raw("each", indent(&body.join("\n"), spaces)))
    }
}

/// Copy scalar leaves of `node` into formatter fields under the same names
pub fn leaves(node: &Node<'_>, keys: &[&str]) -> Result<Fields> {
    let mut fields = Fields::new();
    for key in keys {
        fields.insert(key, node.str(key)?);
    }
    Ok(fields)
}

/// Scalars and 3-vectors of `node` as fields; nested maps flatten to
/// `{parent}_{child}` keys. Keys listed in `mm` are converted to metres.
pub fn flatten(node: &Node<'_>, mm: &[&str]) -> Result<Fields> {
    let mut fields = Fields::new();
    flatten_into(&mut fields, node, "", mm)?;
    Ok(fields)
}

fn flatten_into(fields: &mut Fields, node: &Node<'_>, prefix: &str, mm: &[&str]) -> Result<()> {
    for (key, child) in node.members()? {
        let name = format!("{}{}", prefix, key);
        let in_mm = mm.contains(&name.as_str());
        match child.value() {
            Value::Null => {}
            Value::Object(_) => flatten_into(fields, &child, &format!("{}_", name), mm)?,
            Value::Array(items) if items.len() == 3 && items.iter().all(Value::is_number) => {
                let p = node.point(&key)?;
                let p = if in_mm { geometry::meters3(p) } else { p };
                *fields = std::mem::take(fields).point(&name, p);
            }
            Value::Array(_) => {}
            _ if in_mm => fields.insert(&name, format_number(geometry::meters(child.as_f64()?))),
            _ => fields.insert(&name, child.as_string()?),
        }
    }
    Ok(())
}

/// Optional nested fragment: empty stays empty, anything else moves to its
/// own line indented by `spaces`
pub fn nested(fragment: &str, spaces: usize) -> String {
    if fragment.is_empty() {
        String::new()
    } else {
        format!("\n{}", indent(fragment, spaces))
    }
}

/// Real mk keys of the properties map paired with their property nodes
pub fn mk_entries<'a>(scope: &Scope<'a>) -> Result<Vec<(u32, Node<'a>)>> {
    scope
        .ctx
        .entries("mk_properties")?
        .into_iter()
        .map(|(key, node)| {
            key.parse::<u32>()
                .map(|mk| (mk, node))
                .map_err(|_| CompileError::schema("case.mk_properties", key))
        })
        .collect()
}

/// mkbound for a real mk, `None` for fluid mks
pub fn mkbound(real_mk: u32) -> Option<u32> {
    real_mk.checked_sub(BOUND_MK_OFFSET)
}
