//! Geometry objects placed in the CAD document

use serde::{Deserialize, Serialize};

pub const MK_FLUID_COUNT: u32 = 10;
pub const MK_BOUND_COUNT: u32 = 240;
/// Real mk of fluid `mk` is `mk + FLUID_MK_OFFSET`
pub const FLUID_MK_OFFSET: u32 = 1;
/// Real mk of bound `mk` is `mk + BOUND_MK_OFFSET`
pub const BOUND_MK_OFFSET: u32 = MK_FLUID_COUNT + 1;

/// Axis-angle placement in CAD units (millimetres, radians)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub base: [f64; 3],
    #[serde(default = "default_axis")]
    pub axis: [f64; 3],
    #[serde(default)]
    pub angle: f64,
}

fn default_axis() -> [f64; 3] {
    [0.0, 0.0, 1.0]
}

impl Default for Placement {
    fn default() -> Self {
        Self::at([0.0; 3])
    }
}

impl Placement {
    pub fn at(base: [f64; 3]) -> Self {
        Self {
            base,
            axis: default_axis(),
            angle: 0.0,
        }
    }

    pub fn rotated(mut self, axis: [f64; 3], angle: f64) -> Self {
        self.axis = axis;
        self.angle = angle;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Bound,
    Fluid,
    /// Case limits; never drawn
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    #[default]
    Full,
    Solid,
    Face,
    Wire,
}

/// Per-face drawing options of box objects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceConfig {
    /// Extra boundary layers, in multiples of dp
    pub layers: Vec<i32>,
    pub all: bool,
    pub front: bool,
    pub back: bool,
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

/// Geometric primitive of an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Box { placement: Placement, size: [f64; 3] },
    Sphere { placement: Placement, radius: f64 },
    /// Axis along the local Z direction
    Cylinder { placement: Placement, radius: f64, height: f64 },
    /// Folder holding a `FillLimit` box and a `FillPoint` sphere
    #[serde(rename = "fillbox")]
    FillBox { children: Vec<FillChild> },
    /// Exported to `{name}.stl` by the geometry collaborator
    Mesh {},
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillChild {
    pub label: String,
    pub shape: Shape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationObject {
    pub name: String,
    pub label: String,
    pub mk: u32,
    pub kind: ObjectKind,
    #[serde(default)]
    pub fill_mode: FillMode,
    #[serde(default)]
    pub faces: Option<FaceConfig>,
    #[serde(default)]
    pub autofill: bool,
    pub shape: Shape,
}

impl SimulationObject {
    pub fn new(name: &str, mk: u32, kind: ObjectKind, shape: Shape) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            mk,
            kind,
            fill_mode: FillMode::default(),
            faces: None,
            autofill: false,
            shape,
        }
    }

    pub fn boxed(name: &str, mk: u32, kind: ObjectKind, placement: Placement, size: [f64; 3]) -> Self {
        Self::new(name, mk, kind, Shape::Box { placement, size })
    }

    /// Case limits object spanning `min..max`
    pub fn limits(min: [f64; 3], max: [f64; 3]) -> Self {
        let size = [max[0] - min[0], max[1] - min[1], max[2] - min[2]];
        Self::boxed("Case_Limits", 0, ObjectKind::Special, Placement::at(min), size)
    }

    /// The mk the solver sees, offset by kind
    pub fn real_mk(&self) -> u32 {
        match self.kind {
            ObjectKind::Fluid => self.mk + FLUID_MK_OFFSET,
            ObjectKind::Bound | ObjectKind::Special => self.mk + BOUND_MK_OFFSET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_mk_offsets() {
        let fluid = SimulationObject::boxed("Water", 0, ObjectKind::Fluid, Placement::default(), [1.0; 3]);
        let bound = SimulationObject::boxed("Tank", 2, ObjectKind::Bound, Placement::default(), [1.0; 3]);
        assert_eq!(fluid.real_mk(), 1);
        assert_eq!(bound.real_mk(), 13);
    }
}
