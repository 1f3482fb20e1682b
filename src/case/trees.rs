//! Tree-shaped configuration: VRes buffer boxes and output filters

use super::domain::SimulationDomain;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VRes {
    pub enabled: bool,
    /// Flat list; nesting comes from each box's `parent`
    pub buffer_boxes: Vec<BufferBox>,
}

/// Variable-resolution sub-domain. `parent` names the enclosing box by id and
/// is a back-reference only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferBox {
    pub id: u32,
    #[serde(default)]
    pub parent: Option<u32>,
    /// Resolution ratio relative to the parent
    pub dpratio: f64,
    /// Millimetres
    pub point: [f64; 3],
    pub size: [f64; 3],
    #[serde(default)]
    pub tracking: Option<Tracking>,
    #[serde(default)]
    pub transform: Option<Transform>,
    #[serde(default)]
    pub simulation_domain: Option<SimulationDomain>,
}

impl BufferBox {
    pub fn new(id: u32, parent: Option<u32>, point: [f64; 3], size: [f64; 3]) -> Self {
        Self {
            id,
            parent,
            dpratio: 0.5,
            point,
            size,
            tracking: None,
            transform: None,
            simulation_domain: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracking {
    pub mkbound: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Millimetres
    pub displacement: [f64; 3],
    /// Degrees about X, Y and Z
    pub rotation: [f64; 3],
    pub center: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutFilters {
    pub enabled: bool,
    pub ignore_nparts: u32,
    pub filters: IndexMap<String, OutputFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputFilter {
    /// `add`, `del` or `confirm`
    pub operation: String,
    #[serde(default)]
    pub inverse: bool,
    pub kind: FilterKind,
}

impl OutputFilter {
    pub fn new(operation: &str, kind: FilterKind) -> Self {
        Self {
            operation: operation.to_string(),
            inverse: false,
            kind,
        }
    }
}

/// Filter variants; only `Group` has children. Points in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterKind {
    Pos {
        posmin: [f64; 3],
        posmax: [f64; 3],
    },
    Plane {
        point: [f64; 3],
        vector: [f64; 3],
        distance: f64,
    },
    Sphere {
        center: [f64; 3],
        radius: f64,
    },
    Cylinder {
        point1: [f64; 3],
        point2: [f64; 3],
        radius: f64,
    },
    /// `bound`, `fixed`, `moving`, `floating` or `fluid`
    Type {
        ptype: String,
    },
    Mk {
        mk: String,
    },
    Group {
        filters: IndexMap<String, OutputFilter>,
    },
}
