//! Execution `<parameter>` list

use super::{leaves, nested, Scope};
use crate::error::Result;
use crate::template::Fields;

const KEYS: &[&str] = &[
    "posdouble",
    "stepalgorithm",
    "verletsteps",
    "kernel",
    "viscotreatment",
    "visco",
    "viscoboundfactor",
    "densitydt_type",
    "densitydt_value",
    "shifting",
    "shiftcoef",
    "shifttfs",
    "rigidalgorithm",
    "ftpause",
    "coefdtmin",
    "dtallparticles",
    "timemax",
    "timeout",
    "rhopoutmin",
    "rhopoutmax",
    "partsoutmax",
    "boundary",
    "slipmode",
];

/// Optional parameters with their GenCase key and comment
const OPTIONAL: [(&str, &str, &str); 3] = [
    ("dtini", "DtIni", "Initial time step (default=h/speedsound)"),
    ("dtmin", "DtMin", "Minimum time step (default=coefdtmin*h/speedsound)"),
    ("dtfixed", "DtFixed", "Fixed Dt file name"),
];

pub fn render(scope: &Scope<'_>) -> Result<String> {
    let execution = scope.ctx.get("execution")?;
    let mut fields = leaves(&execution, KEYS)?;
    for (name, key, comment) in OPTIONAL {
        let fragment = match execution.opt_str(name)? {
            Some(value) => scope.render(
                "parameter.xml",
                &Fields::new().set("key", key).set("value", value).set("comment", comment),
            )?,
            None => String::new(),
        };
        fields.insert_raw(name, nested(&fragment, 0));
    }
    scope.render("parameters.xml", &fields)
}
