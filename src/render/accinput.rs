//! `<accinputs>`: external acceleration applied to fluid mks

use super::geometry::meters3;
use super::{leaves, Scope};
use crate::error::Result;

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let acc = scope.ctx.get("acceleration_input")?;
    if !acc.enabled()? {
        return Ok(String::new());
    }
    let mut items = Vec::new();
    for input in acc.seq("inputs")? {
        let fields = leaves(&input, &["label", "mkfluid", "globalgravity", "datafile"])?
            .point("acccentre", meters3(input.point("acccentre")?));
        items.push(scope.render("accinputs/accinput.xml", &fields)?);
    }
    scope.container("accinputs/accinputs.xml", items, 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{AccelerationInputData, Case};
    use crate::render::test_support::run;

    #[test]
    fn test_accinput() {
        let mut case = Case::new("A", 0.01);
        case.acceleration_input.enabled = true;
        case.acceleration_input.inputs.push(AccelerationInputData {
            label: "Shaker".to_string(),
            mkfluid: 0,
            acccentre: [100.0, 0.0, 0.0],
            globalgravity: true,
            datafile: "acc.csv".to_string(),
        });
        let (out, _) = run(&case, render);
        assert!(out.starts_with("<accinputs>\n    <accinput>"));
        assert!(out.contains("<acccentre x=\"0.1\" y=\"0.0\" z=\"0.0\""));
        assert!(out.contains("<globalgravity value=\"true\""));

        case.acceleration_input.enabled = false;
        assert_eq!(run(&case, render).0, "");
    }
}
