//! Keeps the artwork on screen consistent while inputs keep changing.
//!
//! Every run takes a [`Ticket`] stamped with a generation number. Only the
//! newest ticket may replace the displayed artwork: results of superseded
//! runs are dropped, and a failed run leaves the previous artwork in place.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::warn;
use parking_lot::Mutex;
use rand::Rng;

use crate::error::Result;
use crate::pipeline::{Artwork, PipelineConfig, run_bytes};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// What happened to a finished run.
#[derive(Debug)]
pub enum Outcome {
    /// The artwork is now the one on display.
    Shown(Arc<Artwork>),
    /// A newer run was started; this result was discarded.
    Superseded,
    /// The run failed. Whatever was shown before stays shown.
    Failed {
        error: String,
        previous: Option<Arc<Artwork>>,
    },
}

#[derive(Default)]
pub struct Session {
    generation: AtomicU64,
    current: Mutex<Option<Arc<Artwork>>>,
    last_error: Mutex<Option<String>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a run, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    pub fn finish(&self, ticket: Ticket, result: Result<Artwork>) -> Outcome {
        let mut current = self.current.lock();
        if !self.is_latest(ticket) {
            warn!("dropping result of superseded run #{}", ticket.0);
            return Outcome::Superseded;
        }
        match result {
            Ok(artwork) => {
                let artwork = Arc::new(artwork);
                *current = Some(artwork.clone());
                *self.last_error.lock() = None;
                Outcome::Shown(artwork)
            }
            Err(e) => {
                warn!("processing failed (run #{}): {e}", ticket.0);
                let error = e.to_string();
                *self.last_error.lock() = Some(error.clone());
                Outcome::Failed {
                    error,
                    previous: current.clone(),
                }
            }
        }
    }

    /// The artwork on display, if any run has succeeded yet.
    pub fn current(&self) -> Option<Arc<Artwork>> {
        self.current.lock().clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    /// Decode and process `bytes` as the newest run.
    pub fn run<R: Rng>(&self, bytes: &[u8], config: &PipelineConfig, rng: &mut R) -> Outcome {
        let ticket = self.begin();
        self.finish(ticket, run_bytes(bytes, config, rng))
    }
}
