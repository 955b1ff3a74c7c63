//! # Selection - Randomized Roll-Call Engine
//!
//! A small state machine that picks one candidate out of a pool with a
//! "slot machine" effect: while spinning, every tick draws a candidate
//! uniformly at random (with replacement) and publishes it; stopping freezes
//! on whatever was published last.
//!
//! ```text
//!            start(pool)                 stop()
//!   Idle ──────────────────► Spinning ──────────► Settled
//!    ▲                        │  ▲ tick()            │
//!    │   pool emptied         │  └──────┘            │
//!    └────────────────────────┘                      │
//!    ▲            reset()            start(pool)     │
//!    └───────────────────────── ◄────────────────────┘ (back to Spinning)
//! ```
//!
//! The engine owns no timer. Ticks come from whoever drives it: a UI timer
//! calling [`SelectionEngine::tick`] directly, or a [`Spinner`] thread.
//! Observers register with [`SelectionEngine::subscribe`] and are called
//! with every published candidate; [`SelectionEngine::current`] is the
//! pollable alternative.
//!
//! Two-stage selection (group, then a member of that group) is two engines:
//! the second one is started with a pool built from the first one's result.
//!
//! ## Example
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use selection::{SelectionEngine, SpinState};
//!
//! let mut engine = SelectionEngine::with_rng(StdRng::seed_from_u64(7));
//! engine.start(vec!["G1", "G2", "G3"]).unwrap();
//! for _ in 0..10 {
//!     engine.tick().unwrap();
//! }
//! let picked = *engine.stop().unwrap();
//! assert_eq!(engine.state(), SpinState::Settled);
//! assert_eq!(engine.selection(), Some(&picked));
//! ```

mod spinner;

pub use spinner::Spinner;

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinState {
    Idle,
    Spinning,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("candidate pool is empty")]
    EmptyPool,
}

type Listener<T> = Box<dyn FnMut(&T) + Send>;

/// Randomized pick over a pool of candidates.
pub struct SelectionEngine<T, R = StdRng> {
    state: SpinState,
    pool: Vec<T>,
    /// Last published candidate. Becomes the selection on `stop()`.
    current: Option<T>,
    rng: R,
    listeners: Vec<Listener<T>>,
    ticks: u64,
}

impl<T: Clone> SelectionEngine<T, StdRng> {
    /// Creates an idle engine seeded from the operating system.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl<T: Clone> Default for SelectionEngine<T, StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, R: Rng> SelectionEngine<T, R> {
    /// Creates an idle engine drawing from `rng`. Use a seeded RNG for
    /// reproducible sequences.
    pub fn with_rng(rng: R) -> Self {
        Self {
            state: SpinState::Idle,
            pool: Vec::new(),
            current: None,
            rng,
            listeners: Vec::new(),
            ticks: 0,
        }
    }

    /// Registers an observer called with every published candidate.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Starts spinning over `pool` and immediately publishes a first
    /// candidate, so stopping right away still settles on a real candidate.
    ///
    /// From `Settled` the previous result is discarded. From `Spinning` the
    /// pool is replaced and spinning continues.
    ///
    /// # Errors
    ///
    /// [`SelectionError::EmptyPool`] if `pool` is empty; the engine is left
    /// untouched.
    pub fn start(&mut self, pool: Vec<T>) -> Result<&T, SelectionError> {
        if pool.is_empty() {
            return Err(SelectionError::EmptyPool);
        }
        self.pool = pool;
        self.current = None;
        self.ticks = 0;
        self.state = SpinState::Spinning;
        debug!(pool = self.pool.len(), "spin started");
        Ok(self.draw())
    }

    /// Advances the spin by one step.
    ///
    /// Returns `Ok(None)` when not spinning (a late timer callback is
    /// harmless). If the pool has been emptied while spinning the engine
    /// goes back to `Idle`, drops its candidate and reports `EmptyPool`.
    pub fn tick(&mut self) -> Result<Option<&T>, SelectionError> {
        if self.state != SpinState::Spinning {
            return Ok(None);
        }
        if self.pool.is_empty() {
            warn!("candidate pool emptied while spinning, stopping");
            self.state = SpinState::Idle;
            self.current = None;
            return Err(SelectionError::EmptyPool);
        }
        self.ticks += 1;
        Ok(Some(self.draw()))
    }

    /// Settles on the last published candidate.
    ///
    /// Only meaningful while spinning; in any other state nothing changes.
    /// Returns the selection, if there is one.
    pub fn stop(&mut self) -> Option<&T> {
        if self.state == SpinState::Spinning {
            self.state = SpinState::Settled;
            debug!(ticks = self.ticks, "spin settled");
        }
        self.selection()
    }

    /// Clears the pool and any result and returns to `Idle`.
    pub fn reset(&mut self) {
        self.state = SpinState::Idle;
        self.pool.clear();
        self.current = None;
        self.ticks = 0;
    }

    /// Swaps the candidate pool without changing state, e.g. after the
    /// underlying roster changed. An empty pool stops the next tick.
    pub fn replace_pool(&mut self, pool: Vec<T>) {
        self.pool = pool;
    }

    pub fn state(&self) -> SpinState {
        self.state
    }

    pub fn is_spinning(&self) -> bool {
        self.state == SpinState::Spinning
    }

    /// Last published candidate, whatever the state.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// The settled result; `None` unless the state is `Settled`.
    pub fn selection(&self) -> Option<&T> {
        match self.state {
            SpinState::Settled => self.current.as_ref(),
            _ => None,
        }
    }

    pub fn pool(&self) -> &[T] {
        &self.pool
    }

    /// Ticks since the last `start`.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn draw(&mut self) -> &T {
        let idx = self.rng.random_range(0..self.pool.len());
        let picked: &T = self.current.insert(self.pool[idx].clone());
        for listener in self.listeners.iter_mut() {
            listener(picked);
        }
        picked
    }
}

impl<T: fmt::Debug, R> fmt::Debug for SelectionEngine<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("state", &self.state)
            .field("pool_len", &self.pool.len())
            .field("current", &self.current)
            .field("ticks", &self.ticks)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
