//! Simulation engine: tick orchestration, rule-set selection and run state

use super::{Catalog, Cell, Grid, RuleSet, Seeder};
use crate::error::EngineError;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::time::{Duration, Instant};

/// Next state of one cell given its current state and live-neighbor count.
///
/// Dead cells are born per the `born` table. A live cell that fails `survive`,
/// or is already decaying, advances one decay step; reaching `lifetime` kills it.
#[inline]
pub fn transition(rule_set: &RuleSet, state: Cell, neighbors: u8) -> Cell {
    if state == 0 {
        return Cell::from(rule_set.is_born(neighbors));
    }

    let next = if !rule_set.survives(neighbors) || state > 1 {
        state.saturating_add(1)
    } else {
        state
    };

    if next >= rule_set.lifetime() {
        0
    } else {
        next
    }
}

/// Read-only view of the grid after a tick, handed to renderers
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub generation: u64,
    pub rule_index: usize,
    pub rule_set: &'a RuleSet,
    grid: &'a Grid,
}

impl<'a> Snapshot<'a> {
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.grid.get(x, y)
    }

    pub fn states(&self) -> &'a [Cell] {
        self.grid.states()
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    pub fn alive_count(&self) -> usize {
        self.grid.alive_count()
    }

    pub fn decaying_count(&self) -> usize {
        self.grid.decaying_count()
    }
}

/// Receives a frame every time the engine finishes a tick
pub trait FrameSink {
    fn frame(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()>;
}

/// A scheduled periodic tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    pub interval: Duration,
    pub next_due: Instant,
}

/// Whether ticks are currently being scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Stopped,
    Running(TimerHandle),
}

/// Owns the grid, the catalog and the run state of one simulation
#[derive(Debug)]
pub struct Engine {
    catalog: Catalog,
    rule_index: usize,
    grid: Grid,
    generation: u64,
    run_state: RunState,
    last_interval: Option<Duration>,
    rng: StdRng,
}

impl Engine {
    /// Create an engine seeded from OS entropy and load the first rule set
    pub fn initialize(width: i64, height: i64, catalog: Catalog) -> Result<Self, EngineError> {
        Self::build(width, height, catalog, StdRng::from_entropy())
    }

    /// Like [`initialize`](Self::initialize) but with reproducible seeding
    pub fn with_seed(
        width: i64,
        height: i64,
        catalog: Catalog,
        seed: u64,
    ) -> Result<Self, EngineError> {
        Self::build(width, height, catalog, StdRng::seed_from_u64(seed))
    }

    fn build(width: i64, height: i64, catalog: Catalog, rng: StdRng) -> Result<Self, EngineError> {
        let invalid = EngineError::InvalidDimension { width, height };
        let w = usize::try_from(width).map_err(|_| invalid.clone())?;
        let h = usize::try_from(height).map_err(|_| invalid.clone())?;
        w.checked_mul(h)
            .filter(|&len| isize::try_from(len).is_ok())
            .ok_or(invalid)?;

        let mut engine = Self {
            catalog,
            rule_index: 0,
            grid: Grid::new(w, h),
            generation: 0,
            run_state: RunState::Stopped,
            last_interval: None,
            rng,
        };
        engine.load(0);
        Ok(engine)
    }

    /// Discard the grid and reseed it for the rule set at `index`.
    ///
    /// Any pending tick is cancelled first; a running engine resumes with a
    /// fresh deadline afterwards.
    pub fn select_rule_set(&mut self, index: usize) -> Result<(), EngineError> {
        self.catalog.entry(index)?;
        self.switch_to(index);
        Ok(())
    }

    /// Advance to the following catalog entry, wrapping at the end
    pub fn next_rule_set(&mut self) {
        let (_, index) = self.catalog.next(self.rule_index);
        self.switch_to(index);
    }

    /// Step back to the preceding catalog entry, wrapping at the start
    pub fn prev_rule_set(&mut self) {
        let (_, index) = self.catalog.prev(self.rule_index);
        self.switch_to(index);
    }

    /// Reseed the current rule set from scratch
    pub fn reset(&mut self) {
        self.switch_to(self.rule_index);
    }

    fn switch_to(&mut self, index: usize) {
        let resume = self.cancel_pending();
        self.load(index);
        if let Some(interval) = resume {
            self.schedule(interval, Instant::now());
        }
    }

    fn load(&mut self, index: usize) {
        self.rule_index = index;
        self.generation = 0;
        let seeder: Seeder = self.catalog.seeder(index);
        seeder.seed(&mut self.grid, &mut self.rng);
        info!(
            "Loaded rule set {} ({}) with {} on {}x{} grid",
            index,
            self.catalog.get(index),
            seeder,
            self.grid.width(),
            self.grid.height()
        );
    }

    /// Advance one generation: count neighbors, then transition every cell
    /// against that same snapshot of counts.
    pub fn tick(&mut self) -> Snapshot<'_> {
        self.step();
        self.snapshot()
    }

    /// Tick, then hand the new frame to `sink`, passing back its write error
    pub fn tick_into(&mut self, sink: &mut dyn FrameSink) -> io::Result<()> {
        self.step();
        sink.frame(&self.snapshot())
    }

    fn step(&mut self) {
        self.grid.count_neighbors();

        let rule_set = self.catalog.get(self.rule_index);
        let (states, counts) = self.grid.states_and_counts_mut();
        for (state, &neighbors) in states.iter_mut().zip(counts) {
            *state = transition(rule_set, *state, neighbors);
        }

        self.generation += 1;
    }

    /// Begin scheduling ticks every `interval_ms` milliseconds.
    ///
    /// Restarting an already running engine replaces its interval.
    pub fn start(&mut self, interval_ms: i64) -> Result<(), EngineError> {
        self.start_at(interval_ms, Instant::now())
    }

    /// [`start`](Self::start) with an explicit clock reading
    pub fn start_at(&mut self, interval_ms: i64, now: Instant) -> Result<(), EngineError> {
        let interval = u64::try_from(interval_ms)
            .ok()
            .filter(|&ms| ms >= 1)
            .map(Duration::from_millis)
            .ok_or(EngineError::InvalidInterval(interval_ms))?;

        self.cancel_pending();
        self.schedule(interval, now);
        info!("Started {} at {}ms per tick", self.rule_set(), interval.as_millis());
        Ok(())
    }

    /// Stop scheduling ticks. Stopping a stopped engine does nothing.
    pub fn stop(&mut self) {
        if self.cancel_pending().is_some() {
            info!("Stopped {} at generation {}", self.rule_set(), self.generation);
        }
    }

    /// Start with the last used interval if stopped, otherwise stop.
    ///
    /// Returns whether the engine is running afterwards. An engine that was
    /// never started has no interval to resume with and stays stopped.
    pub fn toggle(&mut self) -> bool {
        match (self.run_state, self.last_interval) {
            (RunState::Running(_), _) => self.stop(),
            (RunState::Stopped, Some(interval)) => self.schedule(interval, Instant::now()),
            (RunState::Stopped, None) => debug!("Toggle ignored: engine was never started"),
        }
        self.is_running()
    }

    /// Run one tick if the engine is running and its deadline has passed.
    ///
    /// The following deadline is measured from `now`, so a late poll never
    /// triggers a burst of catch-up ticks.
    pub fn poll(&mut self, now: Instant) -> Option<Snapshot<'_>> {
        match self.run_state {
            RunState::Running(handle) if now >= handle.next_due => {
                self.run_state = RunState::Running(TimerHandle {
                    interval: handle.interval,
                    next_due: now + handle.interval,
                });
                Some(self.tick())
            }
            _ => None,
        }
    }

    fn schedule(&mut self, interval: Duration, now: Instant) {
        self.last_interval = Some(interval);
        self.run_state = RunState::Running(TimerHandle {
            interval,
            next_due: now + interval,
        });
    }

    /// Cancel any pending tick, returning its interval if one was scheduled
    fn cancel_pending(&mut self) -> Option<Duration> {
        match std::mem::take(&mut self.run_state) {
            RunState::Running(handle) => {
                debug!("Cancelled tick due at {:?}", handle.next_due);
                Some(handle.interval)
            }
            RunState::Stopped => None,
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            generation: self.generation,
            rule_index: self.rule_index,
            rule_set: self.catalog.get(self.rule_index),
            grid: &self.grid,
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.run_state, RunState::Running(_))
    }

    /// Deadline of the next scheduled tick, if running
    pub fn next_due(&self) -> Option<Instant> {
        match self.run_state {
            RunState::Running(handle) => Some(handle.next_due),
            RunState::Stopped => None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn rule_index(&self) -> usize {
        self.rule_index
    }

    pub fn rule_set(&self) -> &RuleSet {
        self.catalog.get(self.rule_index)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for callers that place their own patterns
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }
}
