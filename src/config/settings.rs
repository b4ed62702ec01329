//! Configuration settings for the automaton runner

use crate::automaton::{Catalog, CatalogEntry, RuleSet, Seeder};
use crate::error::EngineError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub simulation: SimulationConfig,
    pub display: DisplayConfig,
    /// Custom catalog; the built-in seven variants are used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Vec<RuleSetConfig>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub width: i64,
    pub height: i64,
    pub interval_ms: i64,
    pub initial_rule_set: usize,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub enabled: bool,
    pub clear_screen: bool,
    pub show_status: bool,
}

/// One catalog entry written as rule notation plus its seeding strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub rule: String,
    pub seeder: Seeder,
}

impl RuleSetConfig {
    pub fn to_entry(&self) -> Result<CatalogEntry, EngineError> {
        let rule_set = RuleSet::from_notation(&self.rule)?;
        let rule_set = match &self.name {
            Some(name) => rule_set.renamed(name.clone()),
            None => rule_set,
        };
        Ok(CatalogEntry {
            rule_set,
            seeder: self.seeder,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                width: 80,
                height: 40,
                interval_ms: 100,
                initial_rule_set: 0,
                rng_seed: None,
            },
            display: DisplayConfig {
                enabled: true,
                clear_screen: true,
                show_status: true,
            },
            catalog: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        if sim.width < 0 || sim.height < 0 || sim.width.checked_mul(sim.height).is_none() {
            return Err(EngineError::InvalidDimension {
                width: sim.width,
                height: sim.height,
            }
            .into());
        }

        if sim.interval_ms < 1 {
            return Err(EngineError::InvalidInterval(sim.interval_ms).into());
        }

        let catalog = self.build_catalog()?;
        catalog
            .entry(sim.initial_rule_set)
            .context("Initial rule set is not in the catalog")?;

        Ok(())
    }

    /// The catalog these settings describe
    pub fn build_catalog(&self) -> Result<Catalog> {
        let Some(entries) = &self.catalog else {
            return Ok(Catalog::builtin());
        };

        let entries = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry
                    .to_entry()
                    .with_context(|| format!("Invalid catalog entry {} ('{}')", i, entry.rule))
            })
            .collect::<Result<Vec<_>>>()?;

        Catalog::new(entries).context("Invalid catalog")
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(width) = cli_overrides.width {
            self.simulation.width = width;
        }
        if let Some(height) = cli_overrides.height {
            self.simulation.height = height;
        }
        if let Some(interval_ms) = cli_overrides.interval_ms {
            self.simulation.interval_ms = interval_ms;
        }
        if let Some(rule) = cli_overrides.initial_rule_set {
            self.simulation.initial_rule_set = rule;
        }
        if cli_overrides.rng_seed.is_some() {
            self.simulation.rng_seed = cli_overrides.rng_seed;
        }
        if cli_overrides.no_display {
            self.display.enabled = false;
        }
    }

    /// Example settings with a small custom catalog, written by `setup`
    pub fn custom_catalog_example() -> Self {
        Self {
            catalog: Some(vec![
                RuleSetConfig {
                    name: Some("Life".to_string()),
                    rule: "B3S23".to_string(),
                    seeder: Seeder::UniformRandom { probability: 30 },
                },
                RuleSetConfig {
                    name: Some("HighLife".to_string()),
                    rule: "B36S23".to_string(),
                    seeder: Seeder::BoundedRandomBlock { probability: 40, size: 16 },
                },
                RuleSetConfig {
                    name: None,
                    rule: "B2S345G6".to_string(),
                    seeder: Seeder::BoundedSolidBlock { size: 4 },
                },
            ]),
            ..Self::default()
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub interval_ms: Option<i64>,
    pub initial_rule_set: Option<usize>,
    pub rng_seed: Option<u64>,
    pub no_display: bool,
}
