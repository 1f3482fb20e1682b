//! `<constantsdef>` body

use super::geometry::meters;
use super::{leaves, Scope};
use crate::error::Result;

const SCALARS: &[&str] = &[
    "lattice_bound",
    "lattice_fluid",
    "rhop0",
    "rhopgradient",
    "hswl_auto",
    "gamma",
    "speedsystem",
    "speedsystem_auto",
    "coefsound",
    "speedsound",
    "speedsound_auto",
    "coefh",
    "cflnumber",
    "h",
    "h_auto",
    "b",
    "b_auto",
    "massbound",
    "massbound_auto",
    "massfluid",
    "massfluid_auto",
];

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let constants = scope.ctx.get("constants")?;
    let fields = leaves(&constants, SCALARS)?
        .point("gravity", constants.point("gravity")?)
        .num("hswl", meters(constants.f64("hswl")?));
    scope.render("constants.xml", &fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::Case;
    use crate::render::test_support::run;

    #[test]
    fn test_constants_fragment() {
        let mut case = Case::new("C", 0.01);
        case.constants.hswl = 800.0;
        case.constants.hswl_auto = false;
        let (out, _) = run(&case, render);
        assert!(out.starts_with("<lattice bound=\"1\" fluid=\"1\" />"));
        assert!(out.contains("<gravity x=\"0.0\" y=\"0.0\" z=\"-9.81\""));
        assert!(out.contains("<hswl value=\"0.8\" auto=\"false\""));
        assert!(out.contains("<rhop0 value=\"1000.0\""));
    }
}
