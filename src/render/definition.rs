//! `<definition>`: particle spacing and the case limits box

use super::{geometry, Scope};
use crate::error::{CompileError, Result};
use crate::template::Fields;

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let objects = scope.ctx.seq("objects")?;
    let mut limits = None;
    for object in objects {
        if object.str("kind")? == "special" {
            limits = Some(object.get("shape")?);
            break;
        }
    }
    let shape = limits.ok_or_else(|| CompileError::schema("case.objects", "special"))?;

    let pointmin = geometry::base(&shape.get("placement")?)?;
    let size = geometry::meters3(shape.point("size")?);
    let mut pointmax = geometry::add(pointmin, size);
    if !scope.mode_3d()? {
        pointmax[1] = pointmin[1];
    }

    let fields = Fields::new()
        .set("dp", scope.ctx.str("dp")?)
        .point("pointmin", pointmin)
        .point("pointmax", pointmax);
    scope.render("definition.xml", &fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{Case, SimulationObject};
    use crate::render::test_support::run;

    #[test]
    fn test_definition_3d() {
        let mut case = Case::new("D", 0.005);
        case.objects.push(SimulationObject::limits([0.0, -500.0, 0.0], [2000.0, 500.0, 1000.0]));
        let (out, _) = run(&case, render);
        assert!(out.starts_with("<definition dp=\"0.005\""));
        assert!(out.contains("<pointmin x=\"0.0\" y=\"-0.5\" z=\"0.0\" />"));
        assert!(out.contains("<pointmax x=\"2.0\" y=\"0.5\" z=\"1.0\" />"));
    }

    #[test]
    fn test_definition_2d_flattens_y() {
        let mut case = Case::new("D", 0.005);
        case.mode_3d = false;
        case.objects.push(SimulationObject::limits([0.0, 100.0, 0.0], [2000.0, 600.0, 1000.0]));
        let (out, _) = run(&case, render);
        assert!(out.contains("<pointmax x=\"2.0\" y=\"0.1\" z=\"1.0\" />"));
    }
}
