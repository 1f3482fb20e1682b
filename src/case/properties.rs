//! Per-mk physical properties

use super::motion::Movement;
use serde::{Deserialize, Serialize};

/// Everything attached to one real mk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MkBasedProperties {
    pub floating: Option<Floating>,
    pub initials: Option<Initials>,
    pub bound_normals: Option<BoundNormals>,
    pub material: Option<Material>,
    /// When set, the mk's motion is a single null slot driven by the piston
    pub mlpiston: Option<MLPiston>,
    pub movements: Vec<Movement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatingMass {
    /// Total mass in kg
    Massbody,
    /// Density in kg/m3
    Rhopbody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floating {
    pub mass_kind: FloatingMass,
    pub mass_value: f64,
    /// Centre of gravity, millimetres
    #[serde(default)]
    pub center: Option<[f64; 3]>,
    #[serde(default)]
    pub inertia: Option<[f64; 3]>,
    #[serde(default)]
    pub velini: Option<[f64; 3]>,
    #[serde(default)]
    pub omegaini: Option<[f64; 3]>,
    /// 1 keeps the degree of freedom, 0 locks it
    #[serde(default)]
    pub translation_dof: Option<[u8; 3]>,
    #[serde(default)]
    pub rotation_dof: Option<[u8; 3]>,
}

impl Floating {
    pub fn with_density(rhop: f64) -> Self {
        Self {
            mass_kind: FloatingMass::Rhopbody,
            mass_value: rhop,
            center: None,
            inertia: None,
            velini: None,
            omegaini: None,
            translation_dof: None,
            rotation_dof: None,
        }
    }
}

/// Initial fluid velocity profile; heights in millimetres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Initials {
    Uniform {
        velocity: [f64; 3],
    },
    Linear {
        direction: [f64; 3],
        v1: f64,
        z1: f64,
        v2: f64,
        z2: f64,
    },
    Parabolic {
        direction: [f64; 3],
        v1: f64,
        z1: f64,
        v2: f64,
        z2: f64,
        v3: f64,
        z3: f64,
    },
}

/// mDBC boundary normal definition for a bound mk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundNormals {
    Set {
        normal: [f64; 3],
    },
    Plane {
        /// Let GenCase pick the reference point
        auto_point: bool,
        point: [f64; 3],
        normal: [f64; 3],
        maxdisth: f64,
    },
    Sphere {
        center: [f64; 3],
        radius: f64,
        inside: bool,
        maxdisth: f64,
    },
    Cylinder {
        center1: [f64; 3],
        center2: [f64; 3],
        radius: f64,
        inside: bool,
        maxdisth: f64,
    },
    /// Normals computed from the mk's own geometry
    Parts {
        maxdisth: f64,
    },
}

/// Contact material, written to `materials.xml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub young_modulus: f64,
    pub poisson_ratio: f64,
    pub restitution_coefficient: f64,
    pub kfric: f64,
}

impl Material {
    /// Structural steel
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            young_modulus: 210000000000.0,
            poisson_ratio: 0.35,
            restitution_coefficient: 0.8,
            kfric: 0.35,
        }
    }
}

/// Multi-layer piston driven by velocity files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MLPiston {
    #[serde(rename = "1d")]
    OneD {
        filevelx: String,
        incz: f64,
        timedataini: f64,
    },
    #[serde(rename = "2d")]
    TwoD {
        incz: f64,
        smoothz: u32,
        smoothy: u32,
        veldata: Vec<MLPistonVelData>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MLPistonVelData {
    pub filevelx: String,
    /// Millimetres
    pub posy: f64,
}
