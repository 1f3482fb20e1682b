//! `<mlayerpistons>`: multi-layer pistons fed by velocity files

use super::geometry::meters;
use super::{mk_entries, mkbound, nested, Scope};
use crate::error::{CompileError, Result};
use crate::template::{join_fragments, Fields};

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let mut items = Vec::new();
    for (real_mk, props) in mk_entries(scope)? {
        let Some(piston) = props.opt("mlpiston") else {
            continue;
        };
        let mkbound = mkbound(real_mk).ok_or_else(|| CompileError::schema(props.path(), "mlpiston"))?;
        let fields = Fields::new().set("mkbound", mkbound.to_string());
        let fragment = match piston.tag()?.as_str() {
            "1d" => {
                let fields = fields
                    .set("filevelx", piston.str("filevelx")?)
                    .set("incz", piston.str("incz")?)
                    .set("timedataini", piston.str("timedataini")?);
                scope.render("mlpistons/piston1d.xml", &fields)?
            }
            "2d" => {
                let mut veldata = Vec::new();
                for data in piston.seq("veldata")? {
                    veldata.push(scope.render(
                        "mlpistons/veldata.xml",
                        &Fields::new()
                            .set("filevelx", data.str("filevelx")?)
                            .num("posy", meters(data.f64("posy")?)),
                    )?);
                }
                let fields = fields
                    .set("incz", piston.str("incz")?)
                    .set("smoothz", piston.str("smoothz")?)
                    .set("smoothy", piston.str("smoothy")?)
                    .raw("veldata", nested(&join_fragments(veldata), 4));
                scope.render("mlpistons/piston2d.xml", &fields)?
            }
            other => return Err(CompileError::schema(piston.path(), other)),
        };
        items.push(fragment);
    }
    scope.container("mlpistons/mlpistons.xml", items, 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{Case, MLPiston, MLPistonVelData};
    use crate::render::test_support::run;

    #[test]
    fn test_piston_variants() {
        let mut case = Case::new("M", 0.01);
        case.properties_mut(11).mlpiston = Some(MLPiston::OneD {
            filevelx: "vel.csv".to_string(),
            incz: 0.0,
            timedataini: 0.0,
        });
        case.properties_mut(12).mlpiston = Some(MLPiston::TwoD {
            incz: 0.0,
            smoothz: 1,
            smoothy: 1,
            veldata: vec![MLPistonVelData {
                filevelx: "y0.csv".to_string(),
                posy: 250.0,
            }],
        });
        let (out, _) = run(&case, render);
        assert!(out.contains("<piston1d>\n        <mkbound value=\"0\""));
        assert!(out.contains("<piston2d>\n        <mkbound value=\"1\""));
        assert!(out.contains("<posy value=\"0.25\""));
    }

    #[test]
    fn test_no_pistons() {
        assert_eq!(run(&Case::new("M", 0.01), render).0, "");
    }
}
