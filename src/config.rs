use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid scalar type name {0:?}: names must be non-empty and contain no whitespace")]
    InvalidScalarType(String),
}

/// Resolver configuration with validation
#[derive(Clone, Debug, PartialEq, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Honour the deprecated `foreign_key` annotation
    pub legacy_foreign_key: bool,

    /// Infer navigation properties from declared type shapes
    pub structural_heuristic: bool,

    /// Pair `<Nav>Id` columns with the `<Nav>` reference they back
    pub foreign_key_convention: bool,

    /// Additional type names treated as scalars by the structural heuristic
    #[validate(length(max = 256, message = "At most 256 extra scalar types"))]
    pub extra_scalar_types: Vec<String>,

    /// Scan entities on worker threads
    pub parallel: bool,

    /// Upper bound on concurrently scanned entities (1-256)
    #[validate(range(min = 1, max = 256, message = "Max workers must be between 1 and 256"))]
    pub max_workers: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            legacy_foreign_key: true,
            structural_heuristic: true,
            foreign_key_convention: true,
            extra_scalar_types: Vec::new(),
            parallel: false,
            max_workers: 4,
        }
    }
}

impl ResolverConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            legacy_foreign_key: parse_env_var("COLMETA_LEGACY_FOREIGN_KEY", "true")?,
            structural_heuristic: parse_env_var("COLMETA_STRUCTURAL_HEURISTIC", "true")?,
            foreign_key_convention: parse_env_var("COLMETA_FOREIGN_KEY_CONVENTION", "true")?,
            extra_scalar_types: env::var("COLMETA_EXTRA_SCALAR_TYPES")
                .map(|list| split_list(&list))
                .unwrap_or_default(),
            parallel: parse_env_var("COLMETA_PARALLEL", "false")?,
            max_workers: parse_env_var("COLMETA_MAX_WORKERS", "4")?,
        };

        config.check()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.check()?;
        Ok(config)
    }

    /// Merge command-line settings on top of a file or environment configuration.
    /// Switches only ever turn stages off; scalar types accumulate.
    pub fn merge_cli(&mut self, cli: &CliConfig) {
        self.legacy_foreign_key &= !cli.no_legacy_foreign_key;
        self.structural_heuristic &= !cli.no_structural_heuristic;
        self.foreign_key_convention &= !cli.no_foreign_key_convention;
        for ty in &cli.extra_scalar_types {
            if !self.extra_scalar_types.contains(ty) {
                self.extra_scalar_types.push(ty.clone());
            }
        }
        self.parallel |= cli.parallel;
        if let Some(max_workers) = cli.max_workers {
            self.max_workers = max_workers;
        }
    }

    /// Derive validation plus the scalar name check
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(bad) = self
            .extra_scalar_types
            .iter()
            .find(|ty| ty.trim().is_empty() || ty.chars().any(char::is_whitespace))
        {
            return Err(ConfigError::InvalidScalarType(bad.clone()));
        }
        Ok(())
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub no_legacy_foreign_key: bool,
    pub no_structural_heuristic: bool,
    pub no_foreign_key_convention: bool,
    pub extra_scalar_types: Vec<String>,
    pub parallel: bool,
    pub max_workers: Option<usize>,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
