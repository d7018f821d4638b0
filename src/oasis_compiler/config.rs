// Compiler configuration
//
// Read from a TOML file; every key is optional.

use crate::oasis_compiler::error::CompilerError;
use crate::oasis_compiler::symbols::MAX_ADDRESS;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "OASIS_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// First automatic address for unit-local variables
    pub local_address_base: u32,
    /// First automatic address for global variables
    pub global_address_base: u32,
    /// Emit the comment banner at the top of the listing
    pub banner: bool,
    /// Append `; <source>` comments to variable fetches and stores
    pub source_comments: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            local_address_base: 200,
            global_address_base: 0,
            banner: true,
            source_comments: true,
        }
    }
}

impl CompilerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, CompilerError> {
        let config: CompilerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, CompilerError> {
        log::debug!("loading configuration from {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load the file named by `OASIS_CONFIG`, or the defaults when unset
    pub fn from_env() -> Result<Self, CompilerError> {
        match env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), CompilerError> {
        for (key, value) in [
            ("local_address_base", self.local_address_base),
            ("global_address_base", self.global_address_base),
        ] {
            if value > MAX_ADDRESS {
                return Err(CompilerError::ConfigError(format!(
                    "{} must be at most {}, got {}",
                    key, MAX_ADDRESS, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(
            CompilerConfig::from_toml_str("").unwrap(),
            CompilerConfig::default()
        );
    }

    #[test]
    fn test_partial_override() {
        let config = CompilerConfig::from_toml_str("banner = false\nlocal_address_base = 180\n")
            .unwrap();
        assert!(!config.banner);
        assert_eq!(config.local_address_base, 180);
        assert_eq!(config.global_address_base, 0);
        assert!(config.source_comments);
    }

    #[test]
    fn test_malformed_and_unknown_keys() {
        assert!(matches!(
            CompilerConfig::from_toml_str("banner = "),
            Err(CompilerError::ConfigError(_))
        ));
        assert!(matches!(
            CompilerConfig::from_toml_str("colour = true"),
            Err(CompilerError::ConfigError(_))
        ));
    }

    #[test]
    fn test_address_base_out_of_range() {
        let err = CompilerConfig::from_toml_str("local_address_base = 300").unwrap_err();
        assert!(err.to_string().contains("local_address_base"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = CompilerConfig::load(Path::new("/nonexistent/oasis.toml"));
        assert!(matches!(result, Err(CompilerError::IOError(_))));
    }
}
