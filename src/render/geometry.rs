//! Unit conversion and rotation helpers shared by geometric renderers

use crate::context::Node;
use crate::error::{CompileError, Result};

/// CAD millimetres per solver metre
pub const UNIT_DIVISOR: f64 = 1000.0;

const EPSILON: f64 = 1e-12;

pub fn meters(mm: f64) -> f64 {
    mm / UNIT_DIVISOR
}

pub fn meters3(p: [f64; 3]) -> [f64; 3] {
    [meters(p[0]), meters(p[1]), meters(p[2])]
}

pub fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn length(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Unit vector along `v`; a zero-length vector is degenerate geometry
pub fn normalize(v: [f64; 3], scope: &str, field: &str) -> Result<[f64; 3]> {
    let len = length(v);
    if len < EPSILON {
        return Err(CompileError::degenerate(scope, field, "zero-length vector"));
    }
    Ok([v[0] / len, v[1] / len, v[2] / len])
}

/// Rotate `v` by `angle` radians about the unit vector `axis` (Rodrigues)
pub fn rotate(v: [f64; 3], axis: [f64; 3], angle: f64) -> [f64; 3] {
    let (sin, cos) = angle.sin_cos();
    let dot = axis[0] * v[0] + axis[1] * v[1] + axis[2] * v[2];
    let cross = [
        axis[1] * v[2] - axis[2] * v[1],
        axis[2] * v[0] - axis[0] * v[2],
        axis[0] * v[1] - axis[1] * v[0],
    ];
    let mut out = [0.0; 3];
    for i in 0..3 {
        out[i] = v[i] * cos + cross[i] * sin + axis[i] * dot * (1.0 - cos);
    }
    out
}

/// Rotation as GenCase expects it: degrees about the negated axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub angle_deg: f64,
    pub vec: [f64; 3],
}

impl Rotation {
    /// Map a world offset into the rotated frame
    pub fn to_local(&self, v: [f64; 3]) -> [f64; 3] {
        rotate(v, self.vec, self.angle_deg.to_radians())
    }
}

/// Rotation of an axis-angle placement node, `None` when the angle is zero
pub fn rotation(placement: &Node<'_>) -> Result<Option<Rotation>> {
    let angle = placement.f64("angle")?;
    if angle.abs() < EPSILON {
        return Ok(None);
    }
    let axis = normalize(placement.point("axis")?, placement.path(), "axis")?;
    Ok(Some(Rotation {
        angle_deg: angle.to_degrees(),
        vec: [-axis[0], -axis[1], -axis[2]],
    }))
}

/// Placement base converted to metres
pub fn base(placement: &Node<'_>) -> Result<[f64; 3]> {
    Ok(meters3(placement.point("base")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::format_number;
    use serde_json::json;

    #[test]
    fn test_rotation_sign_convention() {
        let v = json!({"base": [0.0, 0.0, 0.0], "axis": [0.0, 0.0, 1.0], "angle": std::f64::consts::FRAC_PI_2});
        let r = rotation(&Node::root(&v)).unwrap().unwrap();
        assert_eq!(format_number(r.angle_deg), "90.0");
        assert_eq!(r.vec.map(format_number), ["0.0", "0.0", "-1.0"]);
    }

    #[test]
    fn test_zero_angle_has_no_rotation() {
        let v = json!({"base": [1.0, 2.0, 3.0], "axis": [0.0, 0.0, 0.0], "angle": 0.0});
        assert!(rotation(&Node::root(&v)).unwrap().is_none());
    }

    #[test]
    fn test_zero_axis_is_degenerate() {
        let v = json!({"base": [0.0, 0.0, 0.0], "axis": [0.0, 0.0, 0.0], "angle": 1.0});
        let err = rotation(&Node::root(&v)).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_to_local_inverts_rotation() {
        let v = json!({"base": [0.0, 0.0, 0.0], "axis": [0.0, 0.0, 1.0], "angle": std::f64::consts::FRAC_PI_2});
        let r = rotation(&Node::root(&v)).unwrap().unwrap();
        let local = r.to_local([0.0, 1.0, 0.0]);
        assert_eq!(local.map(format_number), ["1.0", "0.0", "0.0"]);
    }

    #[test]
    fn test_meters() {
        assert_eq!(meters3([1000.0, 2000.0, 3000.0]), [1.0, 2.0, 3.0]);
        assert_eq!(meters(500.0), 0.5);
    }
}
