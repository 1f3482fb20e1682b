//! Features written under `<execution><special>`

use super::motion::{Discretization, SaveMotion, SaveMotionSeries, Spectrum};
use super::objects::Placement;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DampingZone {
    pub enabled: bool,
    /// Millimetres
    pub overlimit: f64,
    pub redumax: f64,
    pub factorxyz: [f64; 3],
    pub geometry: DampingGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DampingGeometry {
    /// Damping grows from `limitmin` towards `limitmax` (millimetres)
    Zone { limitmin: [f64; 3], limitmax: [f64; 3] },
    /// Damping between an inner and an outer box on the given faces
    Box {
        directions: Vec<String>,
        inner: DampingBoxRegion,
        outer: DampingBoxRegion,
    },
    /// Radial damping between two radii around the `point1 -> point2` axis
    Cylinder {
        point1: [f64; 3],
        point2: [f64; 3],
        limitmin: f64,
        limitmax: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DampingBoxRegion {
    pub placement: Placement,
    pub size: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccelerationInput {
    pub enabled: bool,
    pub inputs: Vec<AccelerationInputData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccelerationInputData {
    pub label: String,
    pub mkfluid: u32,
    /// Millimetres
    pub acccentre: [f64; 3],
    pub globalgravity: bool,
    pub datafile: String,
}

/// Relaxation zone generating waves inside the fluid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelaxationZone {
    Regular(RzRegular),
    Irregular(RzIrregular),
    File(RzFile),
    Uniform(RzUniform),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RzRegular {
    pub start: f64,
    pub duration: f64,
    pub depth: f64,
    pub swl: f64,
    pub wave_order: u32,
    pub wave_height: f64,
    pub wave_period: f64,
    pub phase: f64,
    pub ramp: f64,
    /// Millimetres
    pub center: [f64; 3],
    pub width: f64,
    pub savemotion: SaveMotion,
    pub coefdir: [f64; 3],
    pub coefdt: f64,
    pub function_psi: f64,
    pub function_beta: f64,
    pub driftcorrection: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RzIrregular {
    pub start: f64,
    pub duration: f64,
    pub depth: f64,
    pub swl: f64,
    pub wave_order: u32,
    pub wave_height: f64,
    pub wave_period: f64,
    pub spectrum: Spectrum,
    pub discretization: Discretization,
    pub peak_coef: f64,
    pub waves: u32,
    pub randomseed: u32,
    pub ramptime: f64,
    pub serieini: f64,
    pub center: [f64; 3],
    pub width: f64,
    pub savemotion: SaveMotionSeries,
    pub coefdir: [f64; 3],
    pub coefdt: f64,
    pub function_psi: f64,
    pub function_beta: f64,
    pub driftcorrection: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RzFile {
    pub start: f64,
    pub duration: f64,
    pub depth: f64,
    pub swl: f64,
    /// Prefix of the external velocity files
    pub filesvel: String,
    pub filesvelx_initial: u32,
    pub filesvelx_count: u32,
    pub usevelz: bool,
    pub movedata: [f64; 3],
    pub dpz: f64,
    pub smooth: u32,
    pub center: [f64; 3],
    pub width: f64,
    pub coefdir: [f64; 3],
    pub coefdt: f64,
    pub function_psi: f64,
    pub function_beta: f64,
    pub driftcorrection: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RzUniform {
    pub start: f64,
    pub duration: f64,
    /// Millimetres
    pub domainbox_point: [f64; 3],
    pub domainbox_size: [f64; 3],
    pub domainbox_direction: [f64; 3],
    pub velocity: UniformVelocity,
    pub coefdt: f64,
    pub function_psi: f64,
    pub function_beta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UniformVelocity {
    Constant { value: f64 },
    Times { series: Vec<TimeValue> },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeValue {
    pub time: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexStructs {
    pub enabled: bool,
    pub structs: Vec<FlexStruct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexStruct {
    pub mkbound: u32,
    pub mkclamp: u32,
    pub density: f64,
    pub youngmod: f64,
    pub poissratio: f64,
    pub hgfactor: f64,
    pub constitmodel: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Gauges {
    pub enabled: bool,
    pub gauges: IndexMap<String, Gauge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub common: GaugeCommon,
    pub kind: GaugeKind,
}

/// Settings every gauge shares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeCommon {
    pub savevtkpart: bool,
    pub computedt: f64,
    pub computetime: [f64; 2],
    pub output: bool,
    pub outputdt: f64,
    pub outputtime: [f64; 2],
}

impl Default for GaugeCommon {
    fn default() -> Self {
        Self {
            savevtkpart: false,
            computedt: 0.1,
            computetime: [0.0, 1000.0],
            output: true,
            outputdt: 0.1,
            outputtime: [0.0, 1000.0],
        }
    }
}

/// Gauge variants; points in millimetres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GaugeKind {
    Velocity {
        point: [f64; 3],
    },
    Swl {
        point0: [f64; 3],
        point2: [f64; 3],
        pointdp: f64,
        masslimit: f64,
    },
    Maxz {
        point0: [f64; 3],
        height: f64,
        distlimit: f64,
    },
    Force {
        mkbound: u32,
    },
    Mesh {
        point: [f64; 3],
        vec1: [f64; 3],
        vec2: [f64; 3],
        vec3: [f64; 3],
        size: [f64; 3],
        dirdat: [f64; 3],
        masslimit: f64,
        outputdata: String,
        kclimit: f64,
        kcdummy: f64,
    },
    Flow {
        point: [f64; 3],
        vec1: [f64; 3],
        vec2: [f64; 3],
        size: [f64; 3],
        dirdat: [f64; 3],
        masslimit: f64,
    },
}
