// Whole-document compile tests against the shipped templates
use sph_case_compiler::case::{
    BufferBox, Case, ChronoLink, ChronoObject, DampingGeometry, DampingZone, FilterKind, Material,
    ModelNormal, ObjectKind, OutputFilter, Placement, SimulationObject,
};
use sph_case_compiler::context::build_context;
use sph_case_compiler::parse_xml::{parse_xml_str, XmlNode};
use sph_case_compiler::{CompileError, ExportConfig, Exporter};
use std::time::Instant;

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "tests/fixtures/dambreak.json";

    fn exporter() -> Exporter {
        Exporter::new(ExportConfig::default())
    }

    fn dambreak() -> Case {
        let text = std::fs::read_to_string(FIXTURE).expect("Failed to read fixture");
        serde_json::from_str(&text).expect("Fixture is not a valid case")
    }

    #[test]
    fn test_dambreak_document() {
        let start = Instant::now();
        let compiled = exporter().compile(&dambreak()).expect("Compile failed");
        println!("Compile time: {:.3}ms", start.elapsed().as_secs_f64() * 1000.0);

        let xml = &compiled.xml;
        assert!(compiled.skipped.is_empty(), "Unexpected skips: {:?}", compiled.skipped);
        assert!(xml.contains("<definition dp=\"0.01\""));
        assert!(xml.contains("<pointmax x=\"1.6\" y=\"0.67\" z=\"0.4\" />"));
        assert!(xml.contains("<hswl value=\"0.3\" auto=\"false\""));
        assert!(xml.contains("<boxfill>front | back | bottom | left | right</boxfill>"));
        assert!(xml.contains("<setmkbound mk=\"1\" />"));
        assert!(xml.contains("<point x=\"0.9\" y=\"0.24\" z=\"0.0\" />"));
        assert!(xml.contains("<floating mkbound=\"1\" property=\"pvc\">"));
        assert!(xml.contains("<rhopbody value=\"800.0\" />"));
        assert!(xml.contains("<link mkbound=\"1\" property=\"pvc\" />"));
        assert!(xml.contains("<parameter key=\"TimeMax\" value=\"1.5\""));
        assert!(!xml.contains("matrixreset"), "Zero angle must not transform");
        assert!(!xml.contains('{'), "Unfilled placeholder left in document");
        assert!(!xml.contains("\n\n\n"));
    }

    #[test]
    fn test_compile_is_idempotent() {
        let case = dambreak();
        let first = exporter().compile(&case).unwrap().xml;
        let second = exporter().compile(&case).unwrap().xml;
        assert_eq!(first, second);
    }

    fn beach(limitmax_x: f64) -> DampingZone {
        DampingZone {
            enabled: true,
            overlimit: 100.0,
            redumax: 10.0,
            factorxyz: [1.0, 1.0, 1.0],
            geometry: DampingGeometry::Zone {
                limitmin: [1200.0, 0.0, 0.0],
                limitmax: [limitmax_x, 0.0, 0.0],
            },
        }
    }

    fn chrono_body(id: &str) -> ChronoObject {
        ChronoObject {
            id: id.to_string(),
            mkbound: 1,
            modelnormal: ModelNormal::Original,
            collisions: false,
        }
    }

    /// Dambreak with every optional special section switched on
    fn all_features() -> Case {
        let mut case = dambreak();
        case.chrono.enabled = true;
        case.chrono.objects.push(chrono_body("floater"));
        case.chrono.links.push(ChronoLink::Hinge {
            idbody1: "floater".to_string(),
            idbody2: "floater".to_string(),
            rotpoint: [0.0; 3],
            rotvector: [0.0, 1.0, 0.0],
            stiffness: 0.0,
            damping: 0.0,
        });
        case.moorings.enabled = true;
        case.moorings.moored_floatings = vec![1];
        case.vres.enabled = true;
        case.vres.buffer_boxes.push(BufferBox::new(1, None, [0.0; 3], [500.0; 3]));
        case.out_filters.enabled = true;
        case.out_filters.filters.insert(
            "near".to_string(),
            OutputFilter::new(
                "add",
                FilterKind::Sphere {
                    center: [800.0, 335.0, 200.0],
                    radius: 100.0,
                },
            ),
        );
        case.damping.insert("Beach".to_string(), beach(1500.0));
        case
    }

    #[test]
    fn test_disabled_features_are_omitted() {
        let toggles: [(&str, fn(&mut Case)); 5] = [
            ("<chrono>", |c: &mut Case| c.chrono.enabled = false),
            ("<moorings>", |c: &mut Case| c.moorings.enabled = false),
            ("<vres ", |c: &mut Case| c.vres.enabled = false),
            ("<outputparts ", |c: &mut Case| c.out_filters.enabled = false),
            ("<damping>", |c: &mut Case| {
                c.damping.get_mut("Beach").unwrap().enabled = false;
            }),
        ];

        let xml = exporter().compile(&all_features()).unwrap().xml;
        for (tag, _) in &toggles {
            assert!(xml.contains(tag), "{} should render when enabled", tag);
        }

        for (tag, disable) in &toggles {
            let mut case = all_features();
            disable(&mut case);
            let xml = exporter().compile(&case).unwrap().xml;
            assert!(!xml.contains(tag), "{} should be omitted when disabled", tag);
            for (other, _) in toggles.iter().filter(|(other, _)| other != tag) {
                assert!(xml.contains(other), "{} should not depend on {}", other, tag);
            }
        }
    }

    fn find<'a>(node: &'a XmlNode, name: &str) -> Option<&'a XmlNode> {
        if node.name == name {
            return Some(node);
        }
        node.children.iter().find_map(|child| find(child, name))
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut case = dambreak();
        case.damping.insert("Beach \"east\" & <west>".to_string(), beach(1500.0));
        let mut wall = SimulationObject::boxed("Wall", 5, ObjectKind::Bound, Placement::at([0.0; 3]), [10.0; 3]);
        wall.label = "Wall -- A&B".to_string();
        case.objects.push(wall);
        case.chrono.enabled = true;
        case.chrono.objects.push(chrono_body("float <1>"));
        for props in case.mk_properties.values_mut() {
            if let Some(material) = props.material.as_mut() {
                material.name = "pvc & \"co\"".to_string();
            }
        }

        let compiled = exporter().compile(&case).unwrap();
        assert!(compiled.xml.contains("<!-- Wall - - A&B -->"));
        let root = parse_xml_str(&compiled.xml).expect("Document must stay well-formed");
        assert_eq!(
            find(&root, "dampingzone").and_then(|z| z.attr("comment")),
            Some("Beach \"east\" & <west>")
        );
        assert_eq!(find(&root, "bodyfloating").and_then(|b| b.attr("id")), Some("float <1>"));
        assert_eq!(find(&root, "floating").and_then(|f| f.attr("property")), Some("pvc & \"co\""));
        assert_eq!(find(&root, "link").and_then(|l| l.attr("property")), Some("pvc & \"co\""));

        let materials = exporter().compile_materials(&case).unwrap();
        let materials = parse_xml_str(&materials).unwrap();
        assert_eq!(materials.children[0].attr("name"), Some("pvc & \"co\""));
    }

    #[test]
    fn test_missing_context_key_is_fatal() {
        let mut ctx = build_context(&dambreak()).unwrap();
        ctx["constants"]
            .as_object_mut()
            .unwrap()
            .remove("rhop0");
        let err = exporter().compile_context(&ctx).unwrap_err();
        match err {
            CompileError::SchemaMismatch { scope, key } => {
                assert_eq!(key, "rhop0");
                assert!(scope.contains("constants"), "scope was {}", scope);
            }
            other => panic!("expected a schema mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_template_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(ExportConfig::default().with_templates_dir(dir.path()));
        let err = exporter.compile(&dambreak()).unwrap_err();
        assert!(matches!(err, CompileError::TemplateNotFound { .. }), "got {:?}", err);
    }

    #[test]
    fn test_degenerate_damping_is_skipped_and_reported() {
        let mut case = dambreak();
        case.damping.insert("Flat".to_string(), beach(1200.0));
        case.damping.insert("Beach".to_string(), beach(1500.0));
        let compiled = exporter().compile(&case).unwrap();
        assert_eq!(compiled.skipped.len(), 1);
        assert!(compiled.skipped[0].is_recoverable());
        assert!(compiled.xml.contains("<limitmax x=\"1.5\""));
        assert!(compiled.xml.contains("</case>"));
    }

    #[test]
    fn test_materials_are_deduplicated_by_name() {
        let mut case = dambreak();
        let mut softer = Material::new("pvc");
        softer.young_modulus = 1.0;
        case.objects.push(SimulationObject::boxed(
            "Second",
            4,
            ObjectKind::Bound,
            Placement::at([0.0; 3]),
            [10.0; 3],
        ));
        case.properties_mut(15).material = Some(softer);
        case.properties_mut(16).material = Some(Material::new("steel"));

        let xml = exporter().compile_materials(&case).unwrap();
        assert_eq!(xml.matches("<material name=\"pvc\">").count(), 1);
        assert!(xml.contains("<Young_Modulus value=\"3000000000.0\" />"));
        assert!(!xml.contains("<Young_Modulus value=\"1.0\" />"));
        assert!(xml.find("pvc").unwrap() < xml.find("steel").unwrap());
    }

    #[test]
    fn test_save_writes_definition_and_materials() {
        let dir = tempfile::tempdir().unwrap();
        let path = exporter().save(&dambreak(), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("Dambreak_Def.xml"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<?xml"));
        assert!(dir.path().join("materials.xml").exists());
    }

    #[test]
    fn test_save_without_materials() {
        let dir = tempfile::tempdir().unwrap();
        let mut case = dambreak();
        case.mk_properties.clear();
        exporter().save(&case, dir.path()).unwrap();
        assert!(dir.path().join("Dambreak_Def.xml").exists());
        assert!(!dir.path().join("materials.xml").exists());
    }
}
