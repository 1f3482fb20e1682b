//! Periodic boundary parameters

use super::geometry::meters3;
use super::Scope;
use crate::error::Result;
use crate::template::{join_fragments, Fields};

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let periodicity = scope.ctx.get("periodicity")?;
    let mode_3d = scope.mode_3d()?;
    let mut out = Vec::new();
    for axis in ["x", "y", "z"] {
        // 2D cases have no Y extent to wrap around
        if axis == "y" && !mode_3d {
            continue;
        }
        let node = periodicity.get(axis)?;
        if !node.enabled()? {
            continue;
        }
        let inc = meters3(node.point("increment")?);
        out.push(scope.render(&format!("periodicity/{}.xml", axis), &Fields::new().point("inc", inc))?);
    }
    Ok(join_fragments(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::Case;
    use crate::render::test_support::run;

    #[test]
    fn test_y_omitted_in_2d() {
        let mut case = Case::new("P", 0.01);
        case.periodicity.x.enabled = true;
        case.periodicity.x.increment = [0.0, 0.0, 100.0];
        case.periodicity.y.enabled = true;
        case.mode_3d = false;
        let (out, _) = run(&case, render);
        assert!(out.contains("XPeriodicIncZ\" value=\"0.1\""));
        assert!(!out.contains("YPeriodic"));

        case.mode_3d = true;
        let (out, _) = run(&case, render);
        assert!(out.contains("YPeriodicIncX"));
    }

    #[test]
    fn test_nothing_enabled() {
        let (out, _) = run(&Case::new("P", 0.01), render);
        assert_eq!(out, "");
    }
}
