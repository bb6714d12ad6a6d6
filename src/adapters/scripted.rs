//! Scripted adapter that replays canned outcomes.
//!
//! Used by tests. Outcomes are consumed in order; once the
//! script is exhausted every call returns an empty result. A client built
//! with [`ScriptedClient::gated`] holds each call until [`ScriptedClient::release`]
//! is called, which makes the in-flight window observable.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::{parse_generation_text, GenerationClient, GenerationError};
use crate::core::prompt::validate_reference;
use crate::domain::{GenerationResult, Series};

/// One canned outcome
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// Succeed with these series
    Series(Vec<Series>),
    /// Parse this raw payload text as the service response
    RawText(String),
    /// Fail as if the service answered with this status and message
    ApiError { status: u16, message: String },
}

/// Generation client backed by a script
pub struct ScriptedClient {
    script: Mutex<VecDeque<ScriptedOutcome>>,
    gate: Option<Semaphore>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    /// Create a client that answers immediately
    pub fn new(script: impl IntoIterator<Item = ScriptedOutcome>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a client whose calls wait for [`release`](Self::release)
    pub fn gated(script: impl IntoIterator<Item = ScriptedOutcome>) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new(script)
        }
    }

    /// Let `n` pending or future calls proceed
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Number of generate calls received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_outcome(&self) -> Option<ScriptedOutcome> {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, reference: &Series) -> Result<GenerationResult, GenerationError> {
        validate_reference(reference)?;
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        match self.next_outcome() {
            Some(ScriptedOutcome::Series(new_series)) => Ok(GenerationResult { new_series }),
            Some(ScriptedOutcome::RawText(text)) => parse_generation_text(Some(&text)),
            Some(ScriptedOutcome::ApiError { status, message }) => {
                Err(GenerationError::Api { status, message })
            }
            None => Ok(GenerationResult::default()),
        }
    }
}
