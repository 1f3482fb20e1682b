//! Export configuration

use std::path::PathBuf;

/// Environment variable overriding the template directory
pub const TEMPLATES_ENV: &str = "SPH_CASE_TEMPLATES";

/// Suffix GenCase expects on the case definition file
pub const DEF_SUFFIX: &str = "_Def.xml";

pub const MATERIALS_FILE: &str = "materials.xml";

#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory holding the `.xml` templates
    pub templates_dir: PathBuf,
    /// Written into the `app` attribute of the root `<case>` element
    pub app_name: String,
}

impl ExportConfig {
    /// Default configuration, with the template directory taken from
    /// `SPH_CASE_TEMPLATES` when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var(TEMPLATES_ENV) {
            if !dir.trim().is_empty() {
                config.templates_dir = PathBuf::from(dir);
            }
        }
        config
    }

    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = dir.into();
        self
    }

    /// File name of the case definition for `case_name`
    pub fn def_file_name(case_name: &str) -> String {
        format!("{}{}", case_name, DEF_SUFFIX)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates"),
            app_name: format!("sph_case_compiler v{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_def_file_name() {
        assert_eq!(ExportConfig::def_file_name("Dambreak"), "Dambreak_Def.xml");
    }

    #[test]
    fn test_default_templates_dir_exists() {
        let config = ExportConfig::default();
        assert!(config.templates_dir.join("case.xml").exists());
    }
}
