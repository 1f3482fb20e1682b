//! Case-wide constants, execution parameters and domain settings

use serde::{Deserialize, Serialize};

/// Physical constants written to `<constantsdef>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constants {
    pub lattice_bound: u32,
    pub lattice_fluid: u32,
    pub gravity: [f64; 3],
    pub rhop0: f64,
    pub rhopgradient: u32,
    /// Still water level, millimetres
    pub hswl: f64,
    pub hswl_auto: bool,
    pub gamma: f64,
    pub speedsystem: f64,
    pub speedsystem_auto: bool,
    pub coefsound: f64,
    pub speedsound: f64,
    pub speedsound_auto: bool,
    pub coefh: f64,
    pub cflnumber: f64,
    pub h: f64,
    pub h_auto: bool,
    pub b: f64,
    pub b_auto: bool,
    pub massbound: f64,
    pub massbound_auto: bool,
    pub massfluid: f64,
    pub massfluid_auto: bool,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            lattice_bound: 1,
            lattice_fluid: 1,
            gravity: [0.0, 0.0, -9.81],
            rhop0: 1000.0,
            rhopgradient: 2,
            hswl: 0.0,
            hswl_auto: true,
            gamma: 7.0,
            speedsystem: 0.0,
            speedsystem_auto: true,
            coefsound: 20.0,
            speedsound: 0.0,
            speedsound_auto: true,
            coefh: 1.2,
            cflnumber: 0.2,
            h: 0.0,
            h_auto: true,
            b: 0.0,
            b_auto: true,
            massbound: 0.0,
            massbound_auto: true,
            massfluid: 0.0,
            massfluid_auto: true,
        }
    }
}

/// Solver execution parameters written to `<parameters>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionParameters {
    pub posdouble: u32,
    pub stepalgorithm: u32,
    pub verletsteps: u32,
    pub kernel: u32,
    pub viscotreatment: u32,
    pub visco: f64,
    pub viscoboundfactor: f64,
    pub densitydt_type: u32,
    pub densitydt_value: f64,
    pub shifting: u32,
    pub shiftcoef: f64,
    pub shifttfs: f64,
    pub rigidalgorithm: u32,
    pub ftpause: f64,
    pub coefdtmin: f64,
    /// `None` lets the solver pick
    pub dtini: Option<f64>,
    pub dtmin: Option<f64>,
    /// File with a fixed dt series
    pub dtfixed: Option<String>,
    pub dtallparticles: u32,
    pub timemax: f64,
    pub timeout: f64,
    pub rhopoutmin: f64,
    pub rhopoutmax: f64,
    pub partsoutmax: f64,
    /// 1 for DBC, 2 for mDBC
    pub boundary: u32,
    pub slipmode: u32,
}

impl Default for ExecutionParameters {
    fn default() -> Self {
        Self {
            posdouble: 1,
            stepalgorithm: 2,
            verletsteps: 40,
            kernel: 2,
            viscotreatment: 1,
            visco: 0.01,
            viscoboundfactor: 1.0,
            densitydt_type: 1,
            densitydt_value: 0.1,
            shifting: 0,
            shiftcoef: -2.0,
            shifttfs: 0.0,
            rigidalgorithm: 1,
            ftpause: 0.0,
            coefdtmin: 0.05,
            dtini: None,
            dtmin: None,
            dtfixed: None,
            dtallparticles: 0,
            timemax: 1.5,
            timeout: 0.01,
            rhopoutmin: 700.0,
            rhopoutmax: 1300.0,
            partsoutmax: 1.0,
            boundary: 1,
            slipmode: 1,
        }
    }
}

/// One bound of the simulation domain along an axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainValue {
    /// Extent of the generated particles
    #[default]
    Default,
    /// Fixed coordinate, millimetres
    Value { value: f64 },
    /// Particle extent widened by a length in millimetres
    DefaultValue { value: f64 },
    /// Particle extent widened by a percentage
    DefaultPercent { value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainPoint {
    pub x: DomainValue,
    pub y: DomainValue,
    pub z: DomainValue,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationDomain {
    pub enabled: bool,
    pub posmin: DomainPoint,
    pub posmax: DomainPoint,
}

/// Periodic boundary along one axis; `increment` holds the shift applied to
/// the other two axes, millimetres (the axis' own component is unused)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodicAxis {
    pub enabled: bool,
    pub increment: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Periodicity {
    pub x: PeriodicAxis,
    pub y: PeriodicAxis,
    pub z: PeriodicAxis,
}
