//! Strongly typed case model
//!
//! A [`Case`] is what the CAD and dialog layers build up during an editing
//! session. The compiler only reads it. CAD-derived lengths (placements,
//! sizes, radii, points, axis points) are millimetres; physical scalars are SI.
//! Placement angles are radians, motion angles are degrees.

mod domain;
mod links;
mod motion;
mod objects;
mod properties;
mod special;
mod trees;

pub use domain::{
    Constants, DomainPoint, DomainValue, ExecutionParameters, PeriodicAxis, Periodicity,
    SimulationDomain,
};
pub use links::{
    Chrono, ChronoLink, ChronoObject, LinkVtk, Connection, ModelNormal, MoorDyn, MoorDynBody,
    MoorDynConfiguration, MoorDynLine, MoorDynOutput, Moorings, SolverOptions, LineDefaults,
};
pub use motion::{
    Awas, AwasCorrection, Discretization, IrregularFlap, IrregularPiston, Motion, Movement,
    RegularFlap, RegularPiston, SaveMotion, SaveMotionSeries, SpecialMovement, Spectrum,
};
pub use objects::{
    FaceConfig, FillChild, FillMode, ObjectKind, Placement, Shape, SimulationObject,
    BOUND_MK_OFFSET, FLUID_MK_OFFSET, MK_BOUND_COUNT, MK_FLUID_COUNT,
};
pub use properties::{
    BoundNormals, Floating, FloatingMass, Initials, MLPiston, MLPistonVelData, Material,
    MkBasedProperties,
};
pub use special::{
    AccelerationInput, AccelerationInputData, DampingBoxRegion, DampingGeometry, DampingZone,
    FlexStruct, FlexStructs, Gauge, GaugeCommon, GaugeKind, Gauges, RelaxationZone, RzFile,
    RzIrregular, RzRegular, RzUniform, TimeValue, UniformVelocity,
};
pub use trees::{
    BufferBox, FilterKind, OutFilters, OutputFilter, Tracking, Transform, VRes,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root aggregate of a simulation case
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Case {
    pub name: String,
    /// Particle spacing in metres
    pub dp: f64,
    pub mode_3d: bool,
    pub constants: Constants,
    pub execution: ExecutionParameters,
    pub objects: Vec<SimulationObject>,
    /// Keyed by real mk, see [`SimulationObject::real_mk`]
    pub mk_properties: IndexMap<u32, MkBasedProperties>,
    pub domain: SimulationDomain,
    pub periodicity: Periodicity,
    pub relaxation_zone: Option<RelaxationZone>,
    pub damping: IndexMap<String, DampingZone>,
    pub acceleration_input: AccelerationInput,
    pub chrono: Chrono,
    pub moorings: Moorings,
    pub flex_structs: FlexStructs,
    pub vres: VRes,
    pub out_filters: OutFilters,
    pub gauges: Gauges,
}

impl Default for Case {
    fn default() -> Self {
        Self {
            name: "Case".to_string(),
            dp: 0.01,
            mode_3d: true,
            constants: Constants::default(),
            execution: ExecutionParameters::default(),
            objects: Vec::new(),
            mk_properties: IndexMap::new(),
            domain: SimulationDomain::default(),
            periodicity: Periodicity::default(),
            relaxation_zone: None,
            damping: IndexMap::new(),
            acceleration_input: AccelerationInput::default(),
            chrono: Chrono::default(),
            moorings: Moorings::default(),
            flex_structs: FlexStructs::default(),
            vres: VRes::default(),
            out_filters: OutFilters::default(),
            gauges: Gauges::default(),
        }
    }
}

impl Case {
    pub fn new(name: &str, dp: f64) -> Self {
        Self {
            name: name.to_string(),
            dp,
            ..Self::default()
        }
    }

    /// Properties for `real_mk`, created empty on first access
    pub fn properties_mut(&mut self, real_mk: u32) -> &mut MkBasedProperties {
        self.mk_properties.entry(real_mk).or_default()
    }

    /// The object holding the case limits, if any
    pub fn limits(&self) -> Option<&SimulationObject> {
        self.objects.iter().find(|o| o.kind == ObjectKind::Special)
    }

    pub fn object(&self, name: &str) -> Option<&SimulationObject> {
        self.objects.iter().find(|o| o.name == name)
    }
}
