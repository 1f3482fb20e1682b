//! `<outputparts>`: filters deciding which particles reach the output files

use super::{flatten, nested, Scope};
use crate::context::Node;
use crate::error::{CompileError, Result};
use crate::template::{indent, join_fragments, Fields};

const KINDS: &[&str] = &["pos", "plane", "sphere", "cylinder", "type", "mk", "group"];

const MM_KEYS: &[&str] = &["posmin", "posmax", "point", "center", "point1", "point2", "radius", "distance"];

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let filters = scope.ctx.get("out_filters")?;
    if !filters.enabled()? {
        return Ok(String::new());
    }
    let mut items = Vec::new();
    for (id, filter) in filters.entries("filters")? {
        items.push(visit(scope, &id, &filter)?);
    }
    if items.is_empty() {
        return Ok(String::new());
    }
    let fields = Fields::new()
        .set("ignore_nparts", filters.str("ignore_nparts")?)
        .raw("each", indent(&items.join("\n"), 8));
    scope.render("outfilters/outputparts.xml", &fields)
}

fn visit(scope: &Scope<'_>, id: &str, filter: &Node<'_>) -> Result<String> {
    let kind = filter.get("kind")?;
    let tag = kind.tag()?;
    if !KINDS.contains(&tag.as_str()) {
        return Err(CompileError::schema(kind.path(), tag));
    }
    let mut children = Vec::new();
    if tag == "group" {
        for (child_id, child) in kind.entries("filters")? {
            children.push(visit(scope, &child_id, &child)?);
        }
    }
    let fields = flatten(&kind, MM_KEYS)?
        .set("id", id)
        .set("operation", filter.str("operation")?)
        .set("inverse", filter.str("inverse")?)
        .raw("each", nested(&join_fragments(children), 4));
    scope.render(&format!("outfilters/{}.xml", tag), &fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{Case, FilterKind, OutputFilter};
    use crate::parse_xml::parse_xml_str;
    use crate::render::test_support::run;
    use indexmap::IndexMap;

    #[test]
    fn test_group_recursion_keeps_insertion_order() {
        let mut inner = IndexMap::new();
        inner.insert(
            "zeta".to_string(),
            OutputFilter::new("add", FilterKind::Type { ptype: "fluid".to_string() }),
        );
        inner.insert(
            "alpha".to_string(),
            OutputFilter::new(
                "del",
                FilterKind::Sphere {
                    center: [500.0, 0.0, 0.0],
                    radius: 250.0,
                },
            ),
        );
        let mut case = Case::new("F", 0.01);
        case.out_filters.enabled = true;
        case.out_filters.ignore_nparts = 10;
        case.out_filters.filters.insert(
            "box".to_string(),
            OutputFilter::new(
                "add",
                FilterKind::Pos {
                    posmin: [0.0; 3],
                    posmax: [1000.0, 1000.0, 500.0],
                },
            ),
        );
        case.out_filters
            .filters
            .insert("grp".to_string(), OutputFilter::new("confirm", FilterKind::Group { filters: inner }));

        let (out, _) = run(&case, render);
        assert!(out.contains("<ignore nparts=\"10\""));
        assert!(out.contains("\n        <filterpos id=\"box\" operation=\"add\" inverse=\"false\">"));
        assert!(out.contains("<posmax x=\"1.0\" y=\"1.0\" z=\"0.5\""));
        assert!(out.contains("\n        <filtergroup id=\"grp\" operation=\"confirm\" inverse=\"false\">"));
        assert!(out.contains("\n            <filtertype id=\"zeta\""));
        assert!(out.find("id=\"zeta\"").unwrap() < out.find("id=\"alpha\"").unwrap());
        assert!(out.contains("<radius value=\"0.25\""));
    }

    #[test]
    fn test_group_inside_group() {
        let mut g2 = IndexMap::new();
        g2.insert(
            "s".to_string(),
            OutputFilter::new(
                "add",
                FilterKind::Sphere {
                    center: [0.0; 3],
                    radius: 100.0,
                },
            ),
        );
        let mut g1 = IndexMap::new();
        g1.insert(
            "p".to_string(),
            OutputFilter::new(
                "add",
                FilterKind::Plane {
                    point: [0.0; 3],
                    vector: [0.0, 0.0, 1.0],
                    distance: 0.0,
                },
            ),
        );
        g1.insert("g2".to_string(), OutputFilter::new("del", FilterKind::Group { filters: g2 }));
        let mut case = Case::new("F", 0.01);
        case.out_filters.enabled = true;
        case.out_filters
            .filters
            .insert("g1".to_string(), OutputFilter::new("add", FilterKind::Group { filters: g1 }));

        let (out, _) = run(&case, render);
        assert!(out.contains("\n        <filtergroup id=\"g1\""));
        assert!(out.contains("\n            <filterplane id=\"p\""));
        assert!(out.contains("\n            <filtergroup id=\"g2\""));
        assert!(out.contains("\n                <filtersphere id=\"s\""));

        let root = parse_xml_str(&out).unwrap();
        let g1 = root.descend(&["filters", "filtergroup"]).unwrap();
        let names: Vec<&str> = g1.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["filterplane", "filtergroup"]);
        let g2 = &g1.children[1];
        assert_eq!(g2.attr("id"), Some("g2"));
        assert_eq!(g2.children.len(), 1);
        assert_eq!(g2.children[0].attr("id"), Some("s"));
    }

    #[test]
    fn test_enabled_without_filters() {
        let mut case = Case::new("F", 0.01);
        case.out_filters.enabled = true;
        assert_eq!(run(&case, render).0, "");
    }
}
