//! Prescribed motions and wave generators

use serde::{Deserialize, Serialize};

/// One movement attached to an mk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Movement {
    Plain {
        name: String,
        #[serde(rename = "loop", default)]
        looping: bool,
        motions: Vec<Motion>,
    },
    Special {
        name: String,
        generator: SpecialMovement,
    },
}

impl Movement {
    pub fn plain(name: &str, looping: bool, motions: Vec<Motion>) -> Self {
        Movement::Plain {
            name: name.to_string(),
            looping,
            motions,
        }
    }

    pub fn special(name: &str, generator: SpecialMovement) -> Self {
        Movement::Special {
            name: name.to_string(),
            generator,
        }
    }
}

/// Primitive motion segment. Velocities in m/s, angular values in degrees,
/// axis points and reference points in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Motion {
    Rect {
        duration: f64,
        velocity: [f64; 3],
    },
    AccRect {
        duration: f64,
        velocity: [f64; 3],
        acceleration: [f64; 3],
    },
    Rot {
        duration: f64,
        ang_vel: f64,
        axis1: [f64; 3],
        axis2: [f64; 3],
    },
    AccRot {
        duration: f64,
        ang_vel: f64,
        ang_acc: f64,
        axis1: [f64; 3],
        axis2: [f64; 3],
    },
    Cir {
        duration: f64,
        ang_vel: f64,
        reference: [f64; 3],
        axis1: [f64; 3],
        axis2: [f64; 3],
    },
    AccCir {
        duration: f64,
        ang_vel: f64,
        ang_acc: f64,
        reference: [f64; 3],
        axis1: [f64; 3],
        axis2: [f64; 3],
    },
    /// Amplitude in millimetres
    RectSinu {
        duration: f64,
        freq: [f64; 3],
        ampl: [f64; 3],
        phase: [f64; 3],
    },
    RotSinu {
        duration: f64,
        freq: f64,
        ampl: f64,
        phase: f64,
        axis1: [f64; 3],
        axis2: [f64; 3],
    },
    CirSinu {
        duration: f64,
        freq: f64,
        ampl: f64,
        phase: f64,
        reference: [f64; 3],
        axis1: [f64; 3],
        axis2: [f64; 3],
    },
    Wait {
        duration: f64,
    },
}

/// Movement produced by a single generator instead of a segment chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpecialMovement {
    FileLinear {
        duration: f64,
        filename: String,
        fields: u32,
        fieldtime: u32,
        #[serde(default)]
        fieldx: Option<u32>,
        #[serde(default)]
        fieldy: Option<u32>,
        #[serde(default)]
        fieldz: Option<u32>,
    },
    FileRotational {
        duration: f64,
        filename: String,
        axis1: [f64; 3],
        axis2: [f64; 3],
    },
    RegularPiston(RegularPiston),
    IrregularPiston(IrregularPiston),
    RegularFlap(RegularFlap),
    IrregularFlap(IrregularFlap),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spectrum {
    #[serde(rename = "jonswap")]
    Jonswap,
    #[serde(rename = "pierson-moskowitz")]
    PiersonMoskowitz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discretization {
    Regular,
    Random,
    Stretched,
    Cosstretched,
}

/// Motion dump settings of regular generators (positions in millimetres)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveMotion {
    pub periods: u32,
    pub periodsteps: u32,
    pub xpos: f64,
    pub zpos: f64,
}

/// Motion dump settings of irregular generators (positions in millimetres)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveMotionSeries {
    pub time: f64,
    pub timedt: f64,
    pub xpos: f64,
    pub zpos: f64,
}

/// Active wave absorption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Awas {
    pub startawas: f64,
    pub swl: f64,
    pub elevation: u32,
    pub gaugex: f64,
    pub gaugey: f64,
    pub gaugezmin: f64,
    pub gaugezmax: f64,
    pub gaugedp: f64,
    pub coefmasslimit: f64,
    pub savedata: u32,
    pub limitace: f64,
    #[serde(default)]
    pub correction: Option<AwasCorrection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwasCorrection {
    pub coefstroke: f64,
    pub coefperiod: f64,
    pub powerfunc: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularPiston {
    pub start: f64,
    pub duration: f64,
    pub depth: f64,
    pub piston_dir: [f64; 3],
    pub wave_order: u32,
    pub wave_height: f64,
    pub wave_period: f64,
    pub phase: f64,
    pub ramp: f64,
    pub savemotion: SaveMotion,
    #[serde(default)]
    pub awas: Option<Awas>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrregularPiston {
    pub start: f64,
    pub duration: f64,
    pub depth: f64,
    pub piston_dir: [f64; 3],
    pub wave_order: u32,
    pub wave_height: f64,
    pub wave_period: f64,
    pub spectrum: Spectrum,
    pub discretization: Discretization,
    pub peak_coef: f64,
    pub waves: u32,
    pub randomseed: u32,
    pub serieini: f64,
    pub serieini_autofit: bool,
    pub ramptime: f64,
    pub savemotion: SaveMotionSeries,
    #[serde(default)]
    pub awas: Option<Awas>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularFlap {
    pub start: f64,
    pub duration: f64,
    pub depth: f64,
    pub wave_order: u32,
    pub wave_height: f64,
    pub wave_period: f64,
    pub phase: f64,
    pub ramp: f64,
    pub variable_draft: f64,
    /// Hinge axis end points, millimetres
    pub flapaxis0: [f64; 3],
    pub flapaxis1: [f64; 3],
    pub savemotion: SaveMotion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrregularFlap {
    pub start: f64,
    pub duration: f64,
    pub depth: f64,
    pub wave_order: u32,
    pub wave_height: f64,
    pub wave_period: f64,
    pub spectrum: Spectrum,
    pub discretization: Discretization,
    pub peak_coef: f64,
    pub waves: u32,
    pub randomseed: u32,
    pub serieini: f64,
    pub serieini_autofit: bool,
    pub ramptime: f64,
    pub variable_draft: f64,
    pub flapaxis0: [f64; 3],
    pub flapaxis1: [f64; 3],
    pub savemotion: SaveMotionSeries,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_json_shape() {
        let mv = Movement::plain("Shake", true, vec![Motion::Wait { duration: 1.0 }]);
        let value = serde_json::to_value(&mv).unwrap();
        assert_eq!(value["type"], "plain");
        assert_eq!(value["loop"], true);
        assert_eq!(value["motions"][0]["type"], "wait");
    }

    #[test]
    fn test_spectrum_names() {
        assert_eq!(serde_json::to_value(Spectrum::PiersonMoskowitz).unwrap(), "pierson-moskowitz");
        assert_eq!(serde_json::to_value(Discretization::Cosstretched).unwrap(), "cosstretched");
    }
}
