//! Writes [`XmlNode`] trees as indented XML documents
//!
//! Generated sidecar documents such as `materials.xml` are built as node trees
//! and written here, which keeps attribute escaping in one place.

use crate::parse_xml::XmlNode;
use std::io::{self, Write};

const DECLARATION: &[u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n";

/// Serialize `node` and its descendants, prefixed by the XML declaration
pub fn xml_node_to_string(node: &XmlNode) -> io::Result<String> {
    let mut buffer = Vec::with_capacity(1024);
    buffer.extend_from_slice(DECLARATION);
    write_node_pretty(node, &mut buffer, 0)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn write_node_pretty<W: Write>(node: &XmlNode, writer: &mut W, indent_level: usize) -> io::Result<()> {
    write_indent(writer, indent_level)?;
    writer.write_all(b"<")?;
    writer.write_all(node.name.as_bytes())?;

    for (key, value) in &node.attributes {
        writer.write_all(b" ")?;
        writer.write_all(key.as_bytes())?;
        writer.write_all(b"=\"")?;
        write_escaped(writer, value, true)?;
        writer.write_all(b"\"")?;
    }

    let text = node.text_content.trim();
    if node.children.is_empty() && text.is_empty() {
        writer.write_all(b" />\n")?;
        return Ok(());
    }
    writer.write_all(b">\n")?;

    if !text.is_empty() {
        write_indent(writer, indent_level + 1)?;
        write_escaped(writer, text, false)?;
        writer.write_all(b"\n")?;
    }
    for child in &node.children {
        write_node_pretty(child, writer, indent_level + 1)?;
    }

    write_indent(writer, indent_level)?;
    writer.write_all(b"</")?;
    writer.write_all(node.name.as_bytes())?;
    writer.write_all(b">\n")
}

fn write_indent<W: Write>(writer: &mut W, indent_level: usize) -> io::Result<()> {
    for _ in 0..indent_level {
        writer.write_all(b"    ")?;
    }
    Ok(())
}

/// Escape markup characters; quotes only matter inside attribute values
fn write_escaped<W: Write>(writer: &mut W, input: &str, attribute: bool) -> io::Result<()> {
    let mut last = 0;
    for (idx, ch) in input.char_indices() {
        let entity = match ch {
            '&' => Some(b"&amp;" as &[u8]),
            '<' => Some(b"&lt;" as &[u8]),
            '>' => Some(b"&gt;" as &[u8]),
            '"' if attribute => Some(b"&quot;" as &[u8]),
            '\'' if attribute => Some(b"&apos;" as &[u8]),
            _ => None,
        };
        if let Some(bytes) = entity {
            writer.write_all(input[last..idx].as_bytes())?;
            writer.write_all(bytes)?;
            last = idx + ch.len_utf8();
        }
    }
    writer.write_all(input[last..].as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_xml::parse_xml_str;

    fn materials() -> XmlNode {
        XmlNode::new("materials").with_child(
            XmlNode::new("material")
                .with_attr("name", "steel")
                .with_child(XmlNode::new("Young_Modulus").with_attr("value", "2.1e11")),
        )
    }

    #[test]
    fn test_pretty_layout() {
        let xml = xml_node_to_string(&materials()).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n\
             <materials>\n    <material name=\"steel\">\n        <Young_Modulus value=\"2.1e11\" />\n    </material>\n</materials>\n"
        );
    }

    #[test]
    fn test_escape_xml_chars() {
        let node = XmlNode::new("test")
            .with_attr("attr", "a&b\"c<d>")
            .with_child(XmlNode {
                text_content: "x<y & 'z'".to_string(),
                ..XmlNode::new("t")
            });
        let xml = xml_node_to_string(&node).unwrap();
        assert!(xml.contains("attr=\"a&amp;b&quot;c&lt;d&gt;\""));
        assert!(xml.contains("x&lt;y &amp; 'z'"));
    }

    #[test]
    fn test_reads_back() {
        let xml = xml_node_to_string(&materials()).unwrap();
        assert_eq!(parse_xml_str(&xml).unwrap(), materials());
    }
}
