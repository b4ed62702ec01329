//! Cellular automaton core: rule sets, grid, seeding and the tick engine

pub mod engine;
pub mod grid;
pub mod rules;
pub mod seeder;

pub use engine::{transition, Engine, FrameSink, RunState, Snapshot, TimerHandle};
pub use grid::{Cell, Grid, ALIVE, DEAD};
pub use rules::{Catalog, CatalogEntry, RuleSet};
pub use seeder::Seeder;
