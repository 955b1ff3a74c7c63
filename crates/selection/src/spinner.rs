/// Background tick driver for a shared [`SelectionEngine`].
///
/// A single thread sleeps for the tick interval, locks the engine, and calls
/// `tick()` until the engine is no longer spinning. Subscribers registered on
/// the engine observe every tick. Stopping goes through the same lock, so a
/// tick and a stop never interleave.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::{SelectionEngine, SelectionError};

pub struct Spinner<T, R> {
    engine: Arc<Mutex<SelectionEngine<T, R>>>,
    handle: Option<JoinHandle<()>>,
}

impl<T, R> Spinner<T, R>
where
    T: Clone + Send + 'static,
    R: Rng + Send + 'static,
{
    /// Starts `engine` over `pool` and spawns the tick thread.
    ///
    /// # Errors
    ///
    /// `EmptyPool` if the pool is empty; no thread is spawned.
    pub fn start(
        engine: Arc<Mutex<SelectionEngine<T, R>>>,
        pool: Vec<T>,
        interval: Duration,
    ) -> Result<Self, SelectionError> {
        lock(&engine).start(pool)?;

        let worker = Arc::clone(&engine);
        let handle = thread::spawn(move || loop {
            thread::sleep(interval);
            let mut guard = lock(&worker);
            if !guard.is_spinning() {
                break;
            }
            if let Err(e) = guard.tick() {
                debug!(error = %e, "tick thread stopping");
                break;
            }
        });

        Ok(Self {
            engine,
            handle: Some(handle),
        })
    }

    /// Settles the engine and waits for the tick thread to exit.
    ///
    /// Returns the settled candidate, or `None` if the engine had already
    /// left the spinning state on its own (pool emptied).
    pub fn stop(mut self) -> Option<T> {
        let selected = lock(&self.engine).stop().cloned();
        self.join();
        selected
    }

    /// Whether the engine is still spinning.
    pub fn is_running(&self) -> bool {
        lock(&self.engine).is_spinning()
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Settles a spin that was never stopped explicitly, so the thread exits.
impl<T, R> Drop for Spinner<T, R> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            {
                let mut guard = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
                if guard.state == crate::SpinState::Spinning {
                    guard.state = crate::SpinState::Settled;
                }
            }
            let _ = handle.join();
        }
    }
}

/// Locks the engine even if a subscriber panicked while holding it.
pub(crate) fn lock<T, R>(engine: &Mutex<SelectionEngine<T, R>>) -> MutexGuard<'_, SelectionEngine<T, R>> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}
