//! Engine configuration.
//!
//! Built-in defaults are embedded at compile time; an optional TOML file and
//! environment variables of the form `CHEMEXT_SECTION__KEY` (for instance
//! `CHEMEXT_TRIGGER__ENABLED`) layer on top, later sources winning. All knobs
//! also have a plain [`Default`] for embedding without the loader.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::merge::{MergePolicy, TieBreak};

const DEFAULT_CONFIG: &str = include_str!("../defaults/chemext.default.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub trigger: TriggerConfig,
    pub merge: MergeConfig,
}

/// Admission-control settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// When false, every parser runs on every sentence.
    pub enabled: bool,
    /// Bloom filter width in bits, per parser.
    pub bloom_bits: usize,
    pub hash_count: u32,
    /// Entries in the per-document sentence cache; zero disables it.
    pub cache_capacity: usize,
}

/// Contextual-merging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub max_passes: usize,
    pub tie_break: TieBreak,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            trigger: TriggerConfig::default(),
            merge: MergeConfig::default(),
        }
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        TriggerConfig {
            enabled: true,
            bloom_bits: 8192,
            hash_count: 3,
            cache_capacity: 1024,
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            max_passes: 16,
            tie_break: TieBreak::DocumentOrder,
        }
    }
}

impl EngineConfig {
    /// Embedded defaults plus environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::loader(None)
    }

    /// Embedded defaults, then the given TOML file, then environment
    /// overrides.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Self::loader(Some(path))
    }

    fn loader(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).format(FileFormat::Toml));
        }
        builder
            .add_source(Environment::with_prefix("CHEMEXT").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn merge_policy(&self) -> MergePolicy {
        MergePolicy {
            tie_break: self.merge.tie_break,
            max_passes: self.merge.max_passes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_match_the_default_impl() {
        let loaded: EngineConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(loaded, EngineConfig::default());
    }

    #[test]
    fn merge_policy_reflects_config() {
        let mut config = EngineConfig::default();
        config.merge.tie_break = TieBreak::PreferFollowing;
        config.merge.max_passes = 4;
        let policy = config.merge_policy();
        assert_eq!(policy.tie_break, TieBreak::PreferFollowing);
        assert_eq!(policy.max_passes, 4);
    }
}
