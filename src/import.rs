//! Reads an exported `_Def.xml` back into a [`Case`]
//!
//! Only what the definition document carries losslessly is rebuilt: name,
//! dp, limits, constants, execution parameters and the drawn primitives with
//! their placement. Motion, special sections and mk properties stay at their
//! defaults.

use crate::case::{
    Case, Constants, ExecutionParameters, FaceConfig, FillMode, ObjectKind, Placement, Shape,
    SimulationObject,
};
use crate::config::DEF_SUFFIX;
use crate::parse_xml::{parse_xml_file, parse_xml_str, XmlNode};
use crate::render::geometry::UNIT_DIVISOR;
use anyhow::{bail, Context, Result};
use log::debug;
use serde_json::{Map, Number, Value};
use std::path::Path;

/// `<parameter key>` to execution parameter field
const PARAMETER_KEYS: &[(&str, &str)] = &[
    ("PosDouble", "posdouble"),
    ("Boundary", "boundary"),
    ("SlipMode", "slipmode"),
    ("StepAlgorithm", "stepalgorithm"),
    ("VerletSteps", "verletsteps"),
    ("Kernel", "kernel"),
    ("ViscoTreatment", "viscotreatment"),
    ("Visco", "visco"),
    ("ViscoBoundFactor", "viscoboundfactor"),
    ("DensityDT", "densitydt_type"),
    ("DensityDTvalue", "densitydt_value"),
    ("Shifting", "shifting"),
    ("ShiftCoef", "shiftcoef"),
    ("ShiftTFS", "shifttfs"),
    ("RigidAlgorithm", "rigidalgorithm"),
    ("FtPause", "ftpause"),
    ("CoefDtMin", "coefdtmin"),
    ("DtIni", "dtini"),
    ("DtMin", "dtmin"),
    ("DtFixed", "dtfixed"),
    ("DtAllParticles", "dtallparticles"),
    ("TimeMax", "timemax"),
    ("TimeOut", "timeout"),
    ("RhopOutMin", "rhopoutmin"),
    ("RhopOutMax", "rhopoutmax"),
    ("PartsOutMax", "partsoutmax"),
];

/// Import the definition file at `path`; the case is named after the file
pub fn import_case<P: AsRef<Path>>(path: P) -> Result<Case> {
    let path = path.as_ref();
    let stem = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no file name", path.display()))?;
    let name = stem
        .strip_suffix(DEF_SUFFIX)
        .or_else(|| stem.strip_suffix(".xml"))
        .unwrap_or(stem);
    let root = parse_xml_file(path)?;
    from_root(&root, name).with_context(|| format!("failed to import {}", path.display()))
}

pub fn import_case_str(xml: &str, name: &str) -> Result<Case> {
    from_root(&parse_xml_str(xml)?, name)
}

fn from_root(root: &XmlNode, name: &str) -> Result<Case> {
    if root.name != "case" {
        bail!("expected <case> root element, found <{}>", root.name);
    }
    let casedef = root.child("casedef").context("missing <casedef>")?;
    let definition = casedef
        .descend(&["geometry", "definition"])
        .context("missing <geometry><definition>")?;

    let mut case = Case::new(name, definition.attr_f64("dp")?);
    let min = millimetres3(child(definition, "pointmin")?.attr_point()?);
    let max = millimetres3(child(definition, "pointmax")?.attr_point()?);
    case.mode_3d = min[1] != max[1];
    case.objects.push(SimulationObject::limits(min, max));

    if let Some(constants) = casedef.child("constantsdef") {
        case.constants = read_constants(constants)?;
    }
    if let Some(parameters) = root.descend(&["execution", "parameters"]) {
        case.execution = read_parameters(parameters)?;
    }
    if let Some(mainlist) = casedef.descend(&["geometry", "commands", "mainlist"]) {
        case.objects.extend(read_objects(mainlist)?);
    }
    Ok(case)
}

fn child<'a>(node: &'a XmlNode, name: &str) -> Result<&'a XmlNode> {
    node.child(name)
        .with_context(|| format!("<{}> has no <{}>", node.name, name))
}

fn millimetres(m: f64) -> f64 {
    (m * UNIT_DIVISOR * 1e6).round() / 1e6
}

fn millimetres3(p: [f64; 3]) -> [f64; 3] {
    p.map(millimetres)
}

/// Integers stay integers so they deserialize into integer fields
fn number(raw: &str) -> Result<Value> {
    let raw = raw.trim();
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Value::from(i));
    }
    let f: f64 = raw
        .parse()
        .with_context(|| format!("`{}` is not a number", raw))?;
    Number::from_f64(f)
        .map(Value::Number)
        .with_context(|| format!("`{}` is not finite", raw))
}

fn read_constants(constantsdef: &XmlNode) -> Result<Constants> {
    let mut map = Map::new();
    for node in &constantsdef.children {
        match node.name.as_str() {
            "lattice" => {
                map.insert("lattice_bound".into(), number(node.attr("bound").unwrap_or("1"))?);
                map.insert("lattice_fluid".into(), number(node.attr("fluid").unwrap_or("1"))?);
            }
            "gravity" => {
                map.insert("gravity".into(), serde_json::to_value(node.attr_point()?)?);
            }
            tag => {
                let Some(raw) = node.attr("value") else {
                    continue;
                };
                let value = if tag == "hswl" {
                    serde_json::to_value(millimetres(node.attr_f64("value")?))?
                } else {
                    number(raw)?
                };
                map.insert(tag.to_string(), value);
                if let Some(auto) = node.attr("auto") {
                    map.insert(format!("{}_auto", tag), Value::Bool(auto == "true"));
                }
            }
        }
    }
    serde_json::from_value(Value::Object(map)).context("invalid <constantsdef>")
}

fn read_parameters(parameters: &XmlNode) -> Result<ExecutionParameters> {
    let mut map = Map::new();
    for node in parameters.children.iter().filter(|n| n.name == "parameter") {
        let (Some(key), Some(raw)) = (node.attr("key"), node.attr("value")) else {
            continue;
        };
        let Some((_, field)) = PARAMETER_KEYS.iter().find(|(k, _)| *k == key) else {
            debug!("ignoring parameter {}", key);
            continue;
        };
        let value = if *field == "dtfixed" {
            Value::String(raw.to_string())
        } else {
            number(raw)?
        };
        map.insert(field.to_string(), value);
    }
    serde_json::from_value(Value::Object(map)).context("invalid <parameters>")
}

/// Matrix and selection state while walking the main list
#[derive(Default)]
struct DrawState {
    mk: u32,
    kind: Option<ObjectKind>,
    mode: FillMode,
    move_to: [f64; 3],
    rotation: Option<([f64; 3], f64)>,
    count: usize,
}

impl DrawState {
    fn placement(&self, local: [f64; 3]) -> Placement {
        let base = [
            self.move_to[0] + local[0],
            self.move_to[1] + local[1],
            self.move_to[2] + local[2],
        ];
        match self.rotation {
            Some((axis, angle)) => Placement::at(base).rotated(axis, angle),
            None => Placement::at(base),
        }
    }

    fn object(&mut self, prefix: &str, shape: Shape) -> Result<SimulationObject> {
        let kind = self
            .kind
            .context("draw command before any <setmkbound> or <setmkfluid>")?;
        self.count += 1;
        let mut object = SimulationObject::new(&format!("{}_{}", prefix, self.count), self.mk, kind, shape);
        object.fill_mode = self.mode;
        Ok(object)
    }
}

fn read_objects(mainlist: &XmlNode) -> Result<Vec<SimulationObject>> {
    let mut state = DrawState::default();
    let mut objects = Vec::new();
    for node in &mainlist.children {
        match node.name.as_str() {
            "setmkbound" | "setmkfluid" => {
                state.mk = node.attr_f64("mk")? as u32;
                state.kind = Some(if node.name == "setmkbound" {
                    ObjectKind::Bound
                } else {
                    ObjectKind::Fluid
                });
            }
            "setdrawmode" => {
                state.mode = match node.attr("mode") {
                    Some("solid") => FillMode::Solid,
                    Some("face") => FillMode::Face,
                    Some("wire") => FillMode::Wire,
                    _ => FillMode::Full,
                };
            }
            "matrixreset" => {
                state.move_to = [0.0; 3];
                state.rotation = None;
            }
            "move" => state.move_to = millimetres3(node.attr_point()?),
            "rotate" => {
                let vec = node.attr_point()?;
                let angle = node.attr_f64("ang")?.to_radians();
                state.rotation = Some(([-vec[0], -vec[1], -vec[2]], angle));
            }
            "drawbox" => {
                let point = millimetres3(child(node, "point")?.attr_point()?);
                let size = millimetres3(child(node, "size")?.attr_point()?);
                let shape = Shape::Box {
                    placement: state.placement(point),
                    size,
                };
                let mut object = state.object("box", shape)?;
                object.faces = read_faces(node)?;
                objects.push(object);
            }
            "drawsphere" => {
                let point = millimetres3(child(node, "point")?.attr_point()?);
                let shape = Shape::Sphere {
                    placement: state.placement(point),
                    radius: millimetres(node.attr_f64("radius")?),
                };
                objects.push(state.object("sphere", shape)?);
            }
            "drawcylinder" => {
                let mut points = node.children.iter().filter(|c| c.name == "point");
                let (Some(bottom), Some(top)) = (points.next(), points.next()) else {
                    bail!("<drawcylinder> needs two <point> children");
                };
                let bottom = millimetres3(bottom.attr_point()?);
                let top = millimetres3(top.attr_point()?);
                let height = ((top[0] - bottom[0]).powi(2)
                    + (top[1] - bottom[1]).powi(2)
                    + (top[2] - bottom[2]).powi(2))
                .sqrt();
                let shape = Shape::Cylinder {
                    placement: state.placement(bottom),
                    radius: millimetres(node.attr_f64("radius")?),
                    height,
                };
                objects.push(state.object("cylinder", shape)?);
            }
            "drawfilestl" => {
                let mut object = state.object("mesh", Shape::Mesh {})?;
                if let Some(name) = node.attr("objname") {
                    object.name = name.to_string();
                    object.label = name.to_string();
                }
                object.autofill = node.attr("autofill") == Some("true");
                objects.push(object);
            }
            other => debug!("not importing <{}>", other),
        }
    }
    Ok(objects)
}

/// Face selection of a `<drawbox>`; `solid` without layers means no config
fn read_faces(drawbox: &XmlNode) -> Result<Option<FaceConfig>> {
    let boxfill = drawbox
        .child("boxfill")
        .map(|b| b.text_content.trim().to_string())
        .unwrap_or_default();
    let layers = match drawbox.child("layers").and_then(|l| l.attr("vdp")) {
        Some(vdp) => vdp
            .split(',')
            .map(|v| v.trim().parse::<i32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("invalid layers `{}`", vdp))?,
        None => Vec::new(),
    };
    if (boxfill.is_empty() || boxfill == "solid") && layers.is_empty() {
        return Ok(None);
    }
    let mut faces = FaceConfig {
        layers,
        ..FaceConfig::default()
    };
    if boxfill == "solid" {
        faces.all = true;
    }
    for face in boxfill.split('|').map(str::trim) {
        match face {
            "front" => faces.front = true,
            "back" => faces.back = true,
            "top" => faces.top = true,
            "bottom" => faces.bottom = true,
            "left" => faces.left = true,
            "right" => faces.right = true,
            _ => {}
        }
    }
    Ok(Some(faces))
}
