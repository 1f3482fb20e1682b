//! Template store and named-placeholder binding
//!
//! Templates are plain text files with `{name}` placeholders. `{{` and `}}`
//! produce literal braces. Every [`TemplateStore::load`] re-reads the file from
//! disk; nothing is cached between calls.

use crate::error::{CompileError, Result};
use indexmap::IndexMap;
use quick_xml::escape::escape;
use std::path::{Path, PathBuf};

/// Loads template text by name from a directory
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the template `name` (a path relative to the store root)
    pub fn load(&self, name: &str) -> Result<Template> {
        let path = self.root.join(name);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Template {
                name: name.to_string(),
                text,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CompileError::TemplateNotFound { path })
            }
            Err(e) => Err(CompileError::Io(e)),
        }
    }

    /// Load `name` and bind `fields` in one step
    pub fn render(&self, name: &str, fields: &Fields) -> Result<String> {
        self.load(name)?.render(fields)
    }
}

/// Raw template text with its name, for error reporting
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    text: String,
}

enum Piece<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

impl Template {
    pub fn from_text(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Placeholder names in order of appearance (duplicates included)
    pub fn placeholders(&self) -> Vec<&str> {
        self.pieces()
            .into_iter()
            .filter_map(|p| match p {
                Piece::Placeholder(name) => Some(name),
                Piece::Literal(_) => None,
            })
            .collect()
    }

    /// Substitute every placeholder. A placeholder without a matching field is
    /// a schema mismatch; fields the template does not use are ignored.
    pub fn render(&self, fields: &Fields) -> Result<String> {
        let mut out = String::with_capacity(self.text.len() + 64);
        for piece in self.pieces() {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Placeholder(key) => {
                    let value = fields
                        .get(key)
                        .ok_or_else(|| CompileError::schema(format!("template {}", self.name), key))?;
                    out.push_str(value);
                }
            }
        }
        let trimmed_len = out.trim_end_matches(['\n', '\r']).len();
        out.truncate(trimmed_len);
        Ok(out)
    }

    fn pieces(&self) -> Vec<Piece<'_>> {
        let text = self.text.as_str();
        let bytes = text.as_bytes();
        let mut pieces = Vec::new();
        let mut last = 0;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'{' if bytes.get(i + 1) == Some(&b'{') => {
                    pieces.push(Piece::Literal(&text[last..i + 1]));
                    i += 2;
                    last = i;
                }
                b'}' if bytes.get(i + 1) == Some(&b'}') => {
                    pieces.push(Piece::Literal(&text[last..i + 1]));
                    i += 2;
                    last = i;
                }
                b'{' => {
                    let end = text[i + 1..]
                        .find('}')
                        .map(|offset| i + 1 + offset)
                        .filter(|&end| is_placeholder_name(&text[i + 1..end]));
                    match end {
                        Some(end) => {
                            pieces.push(Piece::Literal(&text[last..i]));
                            pieces.push(Piece::Placeholder(&text[i + 1..end]));
                            i = end + 1;
                            last = i;
                        }
                        None => i += 1,
                    }
                }
                _ => i += 1,
            }
        }
        pieces.push(Piece::Literal(&text[last..]));
        pieces
    }
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Formatter values handed to [`Template::render`]
///
/// Text set through [`Fields::set`] and [`Fields::insert`] is XML-escaped.
/// Already rendered fragments go through [`Fields::raw`] and
/// [`Fields::insert_raw`] and are substituted as they are.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    values: IndexMap<String, String>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl AsRef<str>) -> Self {
        self.insert(key, value);
        self
    }

    /// Rendered markup, substituted verbatim
    pub fn raw(mut self, key: &str, fragment: impl Into<String>) -> Self {
        self.insert_raw(key, fragment);
        self
    }

    pub fn num(self, key: &str, value: f64) -> Self {
        self.raw(key, format_number(value))
    }

    /// Sets `{prefix}_x`, `{prefix}_y` and `{prefix}_z`
    pub fn point(self, prefix: &str, p: [f64; 3]) -> Self {
        self.num(&format!("{}_x", prefix), p[0])
            .num(&format!("{}_y", prefix), p[1])
            .num(&format!("{}_z", prefix), p[2])
    }

    pub fn insert(&mut self, key: &str, value: impl AsRef<str>) {
        self.values.insert(key.to_string(), escape(value.as_ref()).into_owned());
    }

    pub fn insert_raw(&mut self, key: &str, fragment: impl Into<String>) {
        self.values.insert(key.to_string(), fragment.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }
}

/// Free text safe inside `<!-- -->`: `--` cannot appear in a comment body
/// and the body cannot end with `-`
pub fn comment_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '-' && out.ends_with('-') {
            out.push(' ');
        }
        out.push(ch);
    }
    if out.ends_with('-') {
        out.push(' ');
    }
    out
}

/// Canonical number form used on the wire: integral values keep one decimal
/// (`1.0`), float noise below 1e-9 is rounded away and `-0.0` prints as `0.0`.
pub fn format_number(value: f64) -> String {
    let mut v = value;
    if v.is_finite() && v.abs() < 1e6 {
        v = (v * 1e9).round() / 1e9;
    }
    if v == 0.0 {
        v = 0.0;
    }
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

/// Shift every non-empty line of `block` right by `spaces`
pub fn indent(block: &str, spaces: usize) -> String {
    if block.is_empty() {
        return String::new();
    }
    let pad = " ".repeat(spaces);
    block
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Join fragments line by line, dropping empty ones
pub fn join_fragments<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fragments
        .into_iter()
        .filter(|f| !f.as_ref().is_empty())
        .map(|f| f.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse runs of blank lines left behind by omitted fragments into a single
/// blank line, and strip whitespace from blank lines
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_blank = false;
    for line in text.lines() {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        if !blank {
            out.push_str(line.trim_end());
        }
        out.push('\n');
        previous_blank = blank;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_named_fields() {
        let t = Template::from_text("t", "<point x=\"{p_x}\" y=\"{p_y}\" z=\"{p_z}\" />\n");
        let out = t.render(&Fields::new().point("p", [1.0, 0.5, -2.0])).unwrap();
        assert_eq!(out, "<point x=\"1.0\" y=\"0.5\" z=\"-2.0\" />");
    }

    #[test]
    fn test_missing_field_is_schema_mismatch() {
        let t = Template::from_text("velocity.xml", "<vel v=\"{v}\" z=\"{z}\" />");
        let err = t.render(&Fields::new().set("v", "1")).unwrap_err();
        match err {
            CompileError::SchemaMismatch { scope, key } => {
                assert_eq!(key, "z");
                assert!(scope.contains("velocity.xml"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_escaped_braces_and_non_placeholders() {
        let t = Template::from_text("t", "{{literal}} {a} { not one }");
        assert_eq!(t.placeholders(), vec!["a"]);
        assert_eq!(t.render(&Fields::new().set("a", "x")).unwrap(), "{literal} x { not one }");
    }

    #[test]
    fn test_text_is_escaped_fragments_are_not() {
        let t = Template::from_text("t", "<zone name=\"{name}\">{body}</zone>");
        let fields = Fields::new()
            .set("name", "Beach \"east\" & <west>")
            .raw("body", "<a x=\"1\" />");
        assert_eq!(
            t.render(&fields).unwrap(),
            "<zone name=\"Beach &quot;east&quot; &amp; &lt;west&gt;\"><a x=\"1\" /></zone>"
        );
    }

    #[test]
    fn test_comment_text() {
        assert_eq!(comment_text("Wall -- A&B"), "Wall - - A&B");
        assert_eq!(comment_text("a---b-"), "a- - -b- ");
        assert_eq!(comment_text("Tank"), "Tank");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1.0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.0), "0.0");
        assert_eq!(format_number(90.00000000000001), "90.0");
        assert_eq!(format_number(0.0005), "0.0005");
        assert_eq!(format_number(210000000000.0), "210000000000.0");
    }

    #[test]
    fn test_collapse_blank_lines() {
        let text = "<a>\n\n   \n\n<b/>\n\n</a>\n";
        assert_eq!(collapse_blank_lines(text), "<a>\n\n<b/>\n\n</a>\n");
        let collapsed = collapse_blank_lines(text);
        assert!(!collapsed.contains("\n\n\n"));
    }

    #[test]
    fn test_indent_and_join() {
        assert_eq!(indent("<a>\n    <b/>\n</a>", 4), "    <a>\n        <b/>\n    </a>");
        assert_eq!(join_fragments(["x", "", "y"]), "x\ny");
        assert_eq!(indent("", 4), "");
    }

    #[test]
    fn test_store_reports_missing_template() {
        let store = TemplateStore::new("/nonexistent-template-root");
        match store.load("case.xml") {
            Err(CompileError::TemplateNotFound { path }) => assert!(path.ends_with("case.xml")),
            other => panic!("unexpected {:?}", other.map(|t| t.name().to_string())),
        }
    }
}
