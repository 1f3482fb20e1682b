//! Minimal XML tree reader on top of quick-xml
//!
//! Used to read back exported case definitions. Whitespace-only text is
//! dropped and attribute order is kept.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use quick_xml::events::attributes::Attributes;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A parsed XML element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub text_content: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// First direct child named `name`
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Numeric attribute, failing with the element name when absent or malformed
    pub fn attr_f64(&self, key: &str) -> Result<f64> {
        let raw = self
            .attr(key)
            .with_context(|| format!("<{}> has no `{}` attribute", self.name, key))?;
        raw.trim()
            .parse::<f64>()
            .with_context(|| format!("<{} {}=\"{}\"> is not a number", self.name, key, raw))
    }

    /// `x`, `y`, `z` attributes as a point
    pub fn attr_point(&self) -> Result<[f64; 3]> {
        Ok([self.attr_f64("x")?, self.attr_f64("y")?, self.attr_f64("z")?])
    }

    /// Descend through a chain of first children, e.g. `["casedef", "geometry"]`
    pub fn descend(&self, path: &[&str]) -> Option<&XmlNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }
}

/// Parse the XML file at `path` and return its root element
pub fn parse_xml_file<P: AsRef<Path>>(path: P) -> Result<XmlNode> {
    let file = File::open(&path)
        .with_context(|| format!("failed to open {}", path.as_ref().display()))?;
    parse_reader(BufReader::new(file))
}

pub fn parse_xml_str(xml: &str) -> Result<XmlNode> {
    parse_reader(xml.as_bytes())
}

fn parse_reader<R: BufRead>(source: R) -> Result<XmlNode> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        buf.clear();
        let root = match reader.read_event_into(&mut buf)? {
            Event::Start(start) => Some((start.into_owned(), false)),
            Event::Empty(start) => Some((start.into_owned(), true)),
            Event::Eof => anyhow::bail!("XML document is empty"),
            _ => None,
        };
        if let Some((start, self_closing)) = root {
            return parse_node(&mut reader, start, self_closing);
        }
    }
}

fn parse_node<R: BufRead>(
    reader: &mut Reader<R>,
    start: BytesStart<'static>,
    self_closing: bool,
) -> Result<XmlNode> {
    let name_bytes = start.name().as_ref().to_vec();
    let mut node = XmlNode {
        name: String::from_utf8_lossy(&name_bytes).to_string(),
        attributes: collect_attributes(start.attributes())?,
        text_content: String::new(),
        children: Vec::new(),
    };
    if self_closing {
        return Ok(node);
    }

    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(child) => {
                let child = parse_node(reader, child.into_owned(), false)?;
                node.children.push(child);
            }
            Event::Empty(child) => {
                let child = parse_node(reader, child.into_owned(), true)?;
                node.children.push(child);
            }
            Event::Text(text) => {
                let value = text.unescape()?;
                if !value.trim().is_empty() {
                    node.text_content.push_str(&value);
                }
            }
            Event::CData(text) => {
                node.text_content.push_str(&String::from_utf8_lossy(text.as_ref()));
            }
            Event::End(end) => {
                anyhow::ensure!(
                    end.name().as_ref() == name_bytes.as_slice(),
                    "unexpected closing tag '</{}>' while parsing '<{}>'",
                    String::from_utf8_lossy(end.name().as_ref()),
                    node.name
                );
                return Ok(node);
            }
            Event::Eof => anyhow::bail!("unexpected end of file while parsing element '{}'", node.name),
            _ => {}
        }
    }
}

fn collect_attributes(attributes: Attributes<'_>) -> Result<IndexMap<String, String>> {
    let mut map = IndexMap::new();
    for attr in attributes {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value()?.to_string();
        map.insert(key, value);
    }
    Ok(map)
}
