//! Configuration management for the automaton runner

pub mod settings;

pub use settings::{CliOverrides, DisplayConfig, RuleSetConfig, Settings, SimulationConfig};
