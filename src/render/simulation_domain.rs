//! `<simulationdomain>`, also nested inside VRes buffer boxes

use super::geometry::meters;
use super::Scope;
use crate::context::Node;
use crate::error::{CompileError, Result};
use crate::template::{format_number, Fields};

pub fn render(scope: &Scope<'_>) -> Result<String> {
    fragment(scope, &scope.ctx.get("domain")?)
}

/// Domain block for a `SimulationDomain` node; disabled renders nothing
pub fn fragment(scope: &Scope<'_>, domain: &Node<'_>) -> Result<String> {
    if !domain.enabled()? {
        return Ok(String::new());
    }
    let mut fields = Fields::new();
    for (bound, sign) in [("posmin", '-'), ("posmax", '+')] {
        let point = domain.get(bound)?;
        for axis in ["x", "y", "z"] {
            let value = bound_value(&point.get(axis)?, sign)?;
            fields.insert(&format!("{}_{}", bound, axis), value);
        }
    }
    scope.render("simulationdomain.xml", &fields)
}

/// GenCase form of one domain bound: `default`, a coordinate, or the
/// particle extent widened by a length or a percentage
fn bound_value(node: &Node<'_>, sign: char) -> Result<String> {
    match node.tag()?.as_str() {
        "default" => Ok("default".to_string()),
        "value" => Ok(format_number(meters(node.f64("value")?))),
        "default_value" => Ok(format!("default{}{}", sign, format_number(meters(node.f64("value")?)))),
        "default_percent" => Ok(format!("default{}{}%", sign, format_number(node.f64("value")?))),
        other => Err(CompileError::schema(node.path(), other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{Case, DomainValue};
    use crate::render::test_support::run;

    #[test]
    fn test_disabled_domain_is_omitted() {
        let case = Case::new("S", 0.01);
        let (out, _) = run(&case, render);
        assert_eq!(out, "");
    }

    #[test]
    fn test_domain_values() {
        let mut case = Case::new("S", 0.01);
        case.domain.enabled = true;
        case.domain.posmin.x = DomainValue::Value { value: 500.0 };
        case.domain.posmin.y = DomainValue::DefaultValue { value: 1000.0 };
        case.domain.posmin.z = DomainValue::DefaultPercent { value: 10.0 };
        case.domain.posmax.z = DomainValue::DefaultValue { value: 250.0 };
        let (out, _) = run(&case, render);
        assert!(out.contains("<posmin x=\"0.5\" y=\"default-1.0\" z=\"default-10.0%\""));
        assert!(out.contains("<posmax x=\"default\" y=\"default\" z=\"default+0.25\" />"));
    }
}
