//! `<vres>`: nested variable-resolution buffer boxes
//!
//! Boxes are stored flat with a back-reference to their parent. The list is
//! turned into an arena once, then visited depth first from the roots. Roots
//! and siblings keep their list order.

use super::geometry::meters3;
use super::{flatten, nested, simulation_domain, Scope};
use crate::context::Node;
use crate::error::{CompileError, Result};
use crate::template::{join_fragments, Fields};
use std::collections::HashMap;

const SCOPE: &str = "case.vres.buffer_boxes";

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let vres = scope.ctx.get("vres")?;
    if !vres.enabled()? {
        return Ok(String::new());
    }
    let arena = Arena::build(vres.seq("buffer_boxes")?)?;
    let mut items = Vec::new();
    for &root in &arena.roots {
        items.push(arena.visit(scope, root)?);
    }
    scope.container("vres/vres.xml", items, 4)
}

struct Arena<'a> {
    boxes: Vec<Node<'a>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl<'a> Arena<'a> {
    fn build(boxes: Vec<Node<'a>>) -> Result<Self> {
        let mut index = HashMap::with_capacity(boxes.len());
        for (i, bbox) in boxes.iter().enumerate() {
            let id = bbox.str("id")?;
            if index.insert(id.clone(), i).is_some() {
                return Err(CompileError::schema(bbox.path(), format!("unique id ({} repeats)", id)));
            }
        }

        let mut children = vec![Vec::new(); boxes.len()];
        let mut roots = Vec::new();
        for (i, bbox) in boxes.iter().enumerate() {
            match bbox.opt_str("parent")? {
                None => roots.push(i),
                Some(parent) => {
                    let p = *index
                        .get(&parent)
                        .ok_or_else(|| CompileError::schema(bbox.path(), format!("parent box {}", parent)))?;
                    children[p].push(i);
                }
            }
        }

        // With one parent per box, anything unreachable from a root sits on a cycle
        let mut reached = 0;
        let mut stack = roots.clone();
        while let Some(i) = stack.pop() {
            reached += 1;
            stack.extend(&children[i]);
        }
        if reached != boxes.len() {
            return Err(CompileError::schema(SCOPE, "acyclic parent chain"));
        }

        Ok(Self {
            boxes,
            children,
            roots,
        })
    }

    fn visit(&self, scope: &Scope<'_>, i: usize) -> Result<String> {
        let bbox = &self.boxes[i];

        let tracking = match bbox.opt("tracking") {
            Some(t) => scope.render(
                "vres/tracking.xml",
                &Fields::new().set("mkbound", t.str("mkbound")?),
            )?,
            None => String::new(),
        };
        let transform = match bbox.opt("transform") {
            Some(t) => scope.render("vres/transform.xml", &flatten(&t, &["displacement", "center"])?)?,
            None => String::new(),
        };
        let domain = match bbox.opt("simulation_domain") {
            Some(d) => simulation_domain::fragment(scope, &d)?,
            None => String::new(),
        };

        let mut children = Vec::new();
        for &child in &self.children[i] {
            children.push(self.visit(scope, child)?);
        }

        let fields = Fields::new()
            .set("id", bbox.str("id")?)
            .set("dpratio", bbox.str("dpratio")?)
            .point("point", meters3(bbox.point("point")?))
            .point("size", meters3(bbox.point("size")?))
            .raw("tracking", nested(&tracking, 4))
            .raw("transform", nested(&transform, 4))
            .raw("domain", nested(&domain, 4))
            .raw("each", nested(&join_fragments(children), 4));
        scope.render("vres/bufferbox.xml", &fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{BufferBox, Case, Tracking, Transform};
    use crate::render::test_support::{context, store};
    use crate::render::Report;

    fn compile(case: &Case) -> Result<String> {
        let ctx = context(case);
        let templates = store();
        let report = Report::default();
        render(&Scope::new(Node::root(&ctx), &templates, &report))
    }

    fn tree() -> Case {
        let mut case = Case::new("V", 0.01);
        case.vres.enabled = true;
        case.vres.buffer_boxes = vec![
            BufferBox::new(1, None, [0.0; 3], [1000.0; 3]),
            BufferBox::new(2, Some(1), [100.0, 0.0, 0.0], [200.0; 3]),
            BufferBox::new(3, None, [5000.0, 0.0, 0.0], [500.0; 3]),
            BufferBox::new(4, Some(1), [600.0, 0.0, 0.0], [200.0; 3]),
        ];
        case
    }

    #[test]
    fn test_children_nest_in_list_order() {
        let out = compile(&tree()).unwrap();
        let pos = |needle: &str| out.find(needle).unwrap();
        assert!(pos("<bufferbox id=\"1\"") < pos("<bufferbox id=\"2\""));
        assert!(pos("<bufferbox id=\"2\"") < pos("<bufferbox id=\"4\""));
        assert!(pos("<bufferbox id=\"4\"") < pos("<bufferbox id=\"3\""));
        assert!(out.contains("\n        <bufferbox id=\"2\" dpratio=\"0.5\""));
        assert!(out.contains("\n    <bufferbox id=\"3\" dpratio=\"0.5\""));
        assert!(out.contains("<point x=\"0.1\" y=\"0.0\" z=\"0.0\""));
    }

    #[test]
    fn test_tree_output_is_stable() {
        let case = tree();
        assert_eq!(compile(&case).unwrap(), compile(&case).unwrap());
    }

    #[test]
    fn test_tracking_and_transform() {
        let mut case = tree();
        case.vres.buffer_boxes[2].tracking = Some(Tracking { mkbound: 5 });
        case.vres.buffer_boxes[2].transform = Some(Transform {
            displacement: [1000.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 45.0],
            center: [0.0, 0.0, 500.0],
        });
        let out = compile(&case).unwrap();
        assert!(out.contains("<tracking mkbound=\"5\""));
        assert!(out.contains("<move x=\"1.0\" y=\"0.0\" z=\"0.0\""));
        assert!(out.contains("angz=\"45.0\""));
        assert!(out.contains("<center x=\"0.0\" y=\"0.0\" z=\"0.5\""));
    }

    #[test]
    fn test_unknown_parent_is_fatal() {
        let mut case = tree();
        case.vres.buffer_boxes[1].parent = Some(9);
        let err = compile(&case).unwrap_err();
        assert!(matches!(err, CompileError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_cycle_is_fatal() {
        let mut case = tree();
        case.vres.buffer_boxes[0].parent = Some(2);
        let err = compile(&case).unwrap_err();
        assert!(matches!(err, CompileError::SchemaMismatch { .. }));
    }
}
