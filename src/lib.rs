//! SPH case compiler
//!
//! Turns an in-memory [`Case`] into the XML case definition consumed by
//! GenCase and DualSPHysics. The case is flattened to a string-normalized
//! context, every feature renderer fills its template from that context, and
//! the fragments are assembled into the master template.
//!
//! ```ignore
//! let exporter = Exporter::new(ExportConfig::from_env());
//! let compiled = exporter.compile(&case)?;
//! println!("{}", compiled.xml);
//! ```

pub mod case;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod import;
pub mod parse_xml;
pub mod render;
pub mod serialize_xml;
pub mod template;

pub use case::Case;
pub use config::ExportConfig;
pub use error::{CompileError, Result};
pub use export::{CompiledCase, Exporter};
pub use import::{import_case, import_case_str};
