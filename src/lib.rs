//! Cycling cellular automata
//!
//! This library animates two-dimensional cellular automata on a toroidal grid,
//! cycling through a catalog of Game-of-Life style rule sets, some of which let
//! cells fade through several decay generations before dying.

pub mod automaton;
pub mod config;
pub mod error;
pub mod utils;

pub use automaton::{Catalog, Engine, RuleSet, Seeder, Snapshot};
pub use config::Settings;
pub use error::EngineError;

use anyhow::{Context, Result};

/// Build an engine from `settings` and advance it `generations` ticks
pub fn run_generations(settings: &Settings, generations: u64) -> Result<Engine> {
    settings.validate()?;
    let mut engine = engine_from_settings(settings)?;
    for _ in 0..generations {
        engine.tick();
    }
    Ok(engine)
}

/// Build an engine with the catalog, dimensions and initial rule set from `settings`
pub fn engine_from_settings(settings: &Settings) -> Result<Engine> {
    let sim = &settings.simulation;
    let catalog = settings.build_catalog()?;
    let mut engine = match sim.rng_seed {
        Some(seed) => Engine::with_seed(sim.width, sim.height, catalog, seed),
        None => Engine::initialize(sim.width, sim.height, catalog),
    }
    .context("Failed to initialize engine")?;

    engine
        .select_rule_set(sim.initial_rule_set)
        .context("Failed to select initial rule set")?;
    Ok(engine)
}
