//! Rigid-body coupling: Chrono links and MoorDyn moorings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chrono {
    pub enabled: bool,
    /// CSV output interval in seconds
    pub savedata: f64,
    pub schemescale: f64,
    pub collisiondp: Option<f64>,
    pub objects: Vec<ChronoObject>,
    pub links: Vec<ChronoLink>,
}

impl Default for Chrono {
    fn default() -> Self {
        Self {
            enabled: false,
            savedata: 0.01,
            schemescale: 1.0,
            collisiondp: None,
            objects: Vec::new(),
            links: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelNormal {
    #[default]
    Original,
    Invert,
    Twoface,
}

/// A bound mk taking part in the Chrono system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChronoObject {
    /// Body identifier referenced by links
    pub id: String,
    pub mkbound: u32,
    #[serde(default)]
    pub modelnormal: ModelNormal,
    /// Export the body geometry for collisions
    #[serde(default)]
    pub collisions: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkVtk {
    pub nside: u32,
    /// Millimetres
    pub radius: f64,
    pub length: f64,
}

/// Points in millimetres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChronoLink {
    Hinge {
        idbody1: String,
        idbody2: String,
        rotpoint: [f64; 3],
        rotvector: [f64; 3],
        stiffness: f64,
        damping: f64,
    },
    /// `idbody2` may be empty to anchor the joint in space
    Spheric {
        idbody1: String,
        #[serde(default)]
        idbody2: String,
        rotpoint: [f64; 3],
        stiffness: f64,
        damping: f64,
    },
    Pointline {
        idbody1: String,
        #[serde(default)]
        idbody2: String,
        slidingvector: [f64; 3],
        rotpoint: [f64; 3],
        rotvector: [f64; 3],
        rotvector2: [f64; 3],
        stiffness: f64,
        damping: f64,
    },
    Linearspring {
        idbody1: String,
        idbody2: String,
        point_fb1: [f64; 3],
        point_fb2: [f64; 3],
        stiffness: f64,
        damping: f64,
        rest_length: f64,
        vtk: LinkVtk,
    },
    Coulombdamping {
        idbody1: String,
        idbody2: String,
        point_fb1: [f64; 3],
        point_fb2: [f64; 3],
        rest_length: f64,
        damping: f64,
        vtk: LinkVtk,
    },
    Pulley {
        idbody1: String,
        idbody2: String,
        rotpoint: [f64; 3],
        rotvector: [f64; 3],
        radius: f64,
        radius2: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Moorings {
    pub enabled: bool,
    /// mkbound of the floatings the lines attach to
    pub moored_floatings: Vec<u32>,
    pub savevtk_moorings: bool,
    pub savecsv_points: bool,
    pub savevtk_points: bool,
    pub configuration: MoorDynConfiguration,
}

impl Default for Moorings {
    fn default() -> Self {
        Self {
            enabled: false,
            moored_floatings: Vec::new(),
            savevtk_moorings: true,
            savecsv_points: true,
            savevtk_points: false,
            configuration: MoorDynConfiguration::External {
                file: "moordyn.xml".to_string(),
            },
        }
    }
}

/// Where the MoorDyn document comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum MoorDynConfiguration {
    External { file: String },
    Embedded(MoorDyn),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoorDyn {
    pub solver_options: SolverOptions,
    pub bodies: Vec<MoorDynBody>,
    pub line_defaults: LineDefaults,
    pub lines: Vec<MoorDynLine>,
    pub output: MoorDynOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    pub water_depth: f64,
    pub freesurface: f64,
    pub kbot: f64,
    pub cbot: f64,
    pub dtm: f64,
    pub wavekin: u32,
    pub frictioncoefficient: f64,
    pub fricdamp: f64,
    pub statdynfricscale: f64,
    pub dtic: f64,
    pub cdscaleic: f64,
    pub threshic: f64,
    pub tmaxic: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            water_depth: 0.5,
            freesurface: 0.0,
            kbot: 3.0e6,
            cbot: 3.0e5,
            dtm: 0.0001,
            wavekin: 0,
            frictioncoefficient: 0.0,
            fricdamp: 200.0,
            statdynfricscale: 1.0,
            dtic: 0.5,
            cdscaleic: 5.0,
            threshic: 0.001,
            tmaxic: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoorDynBody {
    /// mkbound of the floating
    pub reference: u32,
    #[serde(default)]
    pub depth: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDefaults {
    pub ea: f64,
    pub diameter: f64,
    pub massdeninair: f64,
    pub ba: f64,
    pub can: f64,
    pub cat: f64,
    pub cdn: f64,
    pub cdt: f64,
    pub breaktension: f64,
    pub outputflags: String,
}

impl Default for LineDefaults {
    fn default() -> Self {
        Self {
            ea: 2.9e3,
            diameter: 3.656e-3,
            massdeninair: 0.0607,
            ba: -0.8,
            can: 1.0,
            cat: 0.0,
            cdn: 1.6,
            cdt: 0.05,
            breaktension: 0.0,
            outputflags: "-".to_string(),
        }
    }
}

/// One mooring line; every `Option` overrides the matching line default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoorDynLine {
    pub start: Connection,
    pub end: Connection,
    /// Unstretched length, metres
    pub length: f64,
    pub segments: u32,
    #[serde(default)]
    pub ea: Option<f64>,
    #[serde(default)]
    pub diameter: Option<f64>,
    #[serde(default)]
    pub massdeninair: Option<f64>,
    #[serde(default)]
    pub ba: Option<f64>,
    #[serde(default)]
    pub can: Option<f64>,
    #[serde(default)]
    pub cat: Option<f64>,
    #[serde(default)]
    pub cdn: Option<f64>,
    #[serde(default)]
    pub cdt: Option<f64>,
    #[serde(default)]
    pub breaktension: Option<f64>,
    #[serde(default)]
    pub outputflags: Option<String>,
}

/// Line end point, millimetres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Connection {
    Vessel { bodyref: u32, point: [f64; 3] },
    Fix { point: [f64; 3] },
    Connect { point: [f64; 3] },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoorDynOutput {
    pub starttime: f64,
    pub endtime: f64,
    pub dtout: f64,
    pub tension: bool,
    pub force: bool,
    pub velocity: bool,
    pub position: bool,
}

impl Default for MoorDynOutput {
    fn default() -> Self {
        Self {
            starttime: 0.0,
            endtime: 1000.0,
            dtout: 0.01,
            tension: true,
            force: false,
            velocity: false,
            position: false,
        }
    }
}
