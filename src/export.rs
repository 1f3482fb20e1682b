//! Case compiler: context, renderers and the master template
//!
//! Every renderer reads the context only, so slot order below follows the
//! document and nothing else. A fatal error in any slot aborts the compile
//! before anything is written.

use crate::case::{Case, ObjectKind, Shape, MK_BOUND_COUNT, MK_FLUID_COUNT};
use crate::config::{ExportConfig, MATERIALS_FILE};
use crate::context::{build_context, Node};
use crate::error::{CompileError, Result};
use crate::parse_xml::XmlNode;
use crate::render::{self, RenderFn, Report, Scope};
use crate::serialize_xml::xml_node_to_string;
use crate::template::{collapse_blank_lines, comment_text, indent, Fields, TemplateStore};
use log::{debug, info, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

const MASTER_TEMPLATE: &str = "case.xml";

/// Master template placeholder, its indentation and the renderer filling it
const SLOTS: &[(&str, usize, RenderFn)] = &[
    ("constants", 12, render::constants::render),
    ("definition", 12, render::definition::render),
    ("objects", 20, render::objects::render),
    ("properties", 8, render::properties::render),
    ("initials", 8, render::initials::render_initials),
    ("normals", 8, render::initials::render_normals),
    ("floatings", 8, render::floatings::render),
    ("motion", 8, render::motion::render),
    ("accinputs", 12, render::accinput::render),
    ("damping", 12, render::damping::render),
    ("mlpistons", 12, render::mlpistons::render),
    ("wavepaddles", 12, render::wavepaddles::render),
    ("rzones", 12, render::rzones::render),
    ("chrono", 12, render::chrono::render),
    ("moorings", 12, render::moorings::render),
    ("flexstruct", 12, render::flexstruct::render),
    ("vres", 12, render::vres::render),
    ("outfilters", 12, render::outfilters::render),
    ("gauges", 12, render::gauges::render),
    ("parameters", 12, render::parameters::render),
    ("periodicity", 12, render::periodicity::render),
    ("simulationdomain", 12, render::simulation_domain::render),
];

/// Result of one compile
#[derive(Debug)]
pub struct CompiledCase {
    pub xml: String,
    /// Fragments left out because of degenerate geometry or dangling links
    pub skipped: Vec<CompileError>,
}

pub struct Exporter {
    config: ExportConfig,
    templates: TemplateStore,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        let templates = TemplateStore::new(config.templates_dir.clone());
        Self { config, templates }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Compile `case` into the GenCase definition document
    pub fn compile(&self, case: &Case) -> Result<CompiledCase> {
        let ctx = build_context(case)?;
        self.compile_context(&ctx)
    }

    /// Compile an already normalized context
    pub fn compile_context(&self, ctx: &Value) -> Result<CompiledCase> {
        let report = Report::default();
        let root = Node::root(ctx);
        let scope = Scope::new(root.clone(), &self.templates, &report);

        let mut fields = Fields::new()
            .set("app_name", self.config.app_name.as_str())
            .raw("case_name", comment_text(&root.str("name")?))
            .set("bound_count", MK_BOUND_COUNT.to_string())
            .set("fluid_count", MK_FLUID_COUNT.to_string());
        for (slot, spaces, renderer) in SLOTS {
            let started = Instant::now();
            let fragment = renderer(&scope)?;
            debug!("{}: {} bytes in {:?}", slot, fragment.len(), started.elapsed());
            fields.insert_raw(slot, indent(&fragment, *spaces));
        }

        let xml = collapse_blank_lines(&self.templates.render(MASTER_TEMPLATE, &fields)?);
        if !report.is_empty() {
            warn!("{} fragment(s) skipped", report.len());
        }
        Ok(CompiledCase {
            xml,
            skipped: report.into_inner(),
        })
    }

    /// `materials.xml` for every distinct material name; empty when the case
    /// has no materials
    pub fn compile_materials(&self, case: &Case) -> Result<String> {
        let ctx = build_context(case)?;
        let report = Report::default();
        let scope = Scope::new(Node::root(&ctx), &self.templates, &report);
        let materials = render::properties::materials(&scope)?;
        if materials.is_empty() {
            return Ok(String::new());
        }

        let mut root = XmlNode::new("materials");
        for (name, material) in materials {
            root = root.with_child(
                XmlNode::new("material")
                    .with_attr("name", name)
                    .with_child(value_node("Young_Modulus", material.str("young_modulus")?))
                    .with_child(value_node("PoissonRatio", material.str("poisson_ratio")?))
                    .with_child(value_node(
                        "Restitution_Coefficient",
                        material.str("restitution_coefficient")?,
                    ))
                    .with_child(value_node("Kfric", material.str("kfric")?)),
            );
        }
        Ok(xml_node_to_string(&root)?)
    }

    /// Compile and write `{name}_Def.xml`, plus `materials.xml` when the case
    /// defines materials. Returns the definition path.
    pub fn save(&self, case: &Case, dir: &Path) -> Result<PathBuf> {
        let compiled = self.compile(case)?;
        let materials = self.compile_materials(case)?;

        fs::create_dir_all(dir)?;
        let def_path = dir.join(ExportConfig::def_file_name(&case.name));
        fs::write(&def_path, &compiled.xml)?;
        info!("wrote {}", def_path.display());
        if !materials.is_empty() {
            let path = dir.join(MATERIALS_FILE);
            fs::write(&path, materials)?;
            info!("wrote {}", path.display());
        }

        for object in &case.objects {
            if object.kind == ObjectKind::Special || !matches!(object.shape, Shape::Mesh {}) {
                continue;
            }
            let stl = dir.join(format!("{}.stl", object.name));
            if !stl.exists() {
                warn!("{} references {} which does not exist yet", object.label, stl.display());
            }
        }
        Ok(def_path)
    }
}

fn value_node(name: &str, value: String) -> XmlNode {
    XmlNode::new(name).with_attr("value", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{Material, Placement, SimulationObject};

    fn exporter() -> Exporter {
        Exporter::new(ExportConfig::default())
    }

    fn tank() -> Case {
        let mut case = Case::new("Tank", 0.01);
        case.objects.push(SimulationObject::limits([0.0; 3], [1000.0, 1000.0, 1000.0]));
        case.objects.push(SimulationObject::boxed(
            "Water",
            0,
            ObjectKind::Fluid,
            Placement::at([0.0; 3]),
            [500.0, 1000.0, 300.0],
        ));
        case
    }

    #[test]
    fn test_document_skeleton() {
        let compiled = exporter().compile(&tank()).unwrap();
        let xml = &compiled.xml;
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n"));
        assert!(xml.contains("<mkconfig boundcount=\"240\" fluidcount=\"10\" />"));
        assert!(xml.contains("\n                    <setmkfluid mk=\"0\" />"));
        assert!(!xml.contains("<motion>"));
        assert!(!xml.contains("\n\n\n"));
        assert!(xml.ends_with("</case>\n"));
        assert!(compiled.skipped.is_empty());
    }

    #[test]
    fn test_materials_document() {
        let mut case = tank();
        case.properties_mut(12).material = Some(Material::new("steel"));
        let xml = exporter().compile_materials(&case).unwrap();
        assert!(xml.contains("<material name=\"steel\">"));
        assert!(xml.contains("<PoissonRatio value=\"0.35\" />"));
        assert_eq!(exporter().compile_materials(&tank()).unwrap(), "");
    }
}
