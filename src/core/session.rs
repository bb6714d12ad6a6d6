//! Session state and the generation trigger.
//!
//! A [`Session`] owns the content store together with the `generating` and
//! `error` flags, and is the only place that calls the generation client.
//! At most one generation is in flight per session: a second trigger while
//! one is outstanding is rejected without touching state.

use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::adapters::{GenerationClient, GenerationError};
use crate::domain::Series;

use super::store::ContentStore;

/// Message shown to the user whenever a generation fails
pub const GENERATION_FAILED_MESSAGE: &str =
    "Falha ao gerar ideias. Verifique sua conexão ou tente novamente.";

/// Errors returned by the generation trigger
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A generation request is already in flight")]
    AlreadyGenerating,

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Flags the presentation layer renders from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// True strictly between a trigger and its settlement
    pub generating: bool,

    /// User-facing message from the last failed generation
    pub error: Option<String>,
}

/// Addresses one series in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesSelector {
    /// The seed series
    Seed,

    /// A generated series by zero-based position (newest first)
    Generated(usize),
}

impl FromStr for SeriesSelector {
    type Err = anyhow::Error;

    /// Accepts "seed" or a one-based position in the generated list
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("seed") || s.eq_ignore_ascii_case("base") {
            return Ok(SeriesSelector::Seed);
        }
        match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(SeriesSelector::Generated(n - 1)),
            _ => anyhow::bail!("Expected 'seed' or a series number starting at 1, got: {}", s),
        }
    }
}

struct Inner {
    store: ContentStore,
    view: ViewState,
}

/// Clears `generating` if a trigger is dropped before it settles
struct InFlight<'a> {
    session: &'a Session,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn settle(mut self) -> MutexGuard<'a, Inner> {
        self.armed = false;
        let session = self.session;
        let mut inner = session.lock();
        inner.view.generating = false;
        inner
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Generation abandoned before it settled");
            self.session.lock().view.generating = false;
        }
    }
}

/// One user session: seed, generated series and generation flags
pub struct Session {
    client: Arc<dyn GenerationClient>,
    inner: Mutex<Inner>,
}

impl Session {
    /// Create a session around a seed series
    pub fn new(seed: Series, client: Arc<dyn GenerationClient>) -> Self {
        Self {
            client,
            inner: Mutex::new(Inner {
                store: ContentStore::new(seed),
                view: ViewState::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Name of the backing generation client
    pub fn client_name(&self) -> &str {
        self.client.name()
    }

    /// Snapshot of the generating/error flags
    pub fn view(&self) -> ViewState {
        self.lock().view.clone()
    }

    /// Whether a generation is in flight
    pub fn is_generating(&self) -> bool {
        self.lock().view.generating
    }

    /// Message from the last failed generation, if any
    pub fn error(&self) -> Option<String> {
        self.lock().view.error.clone()
    }

    /// The seed series
    pub fn seed(&self) -> Arc<Series> {
        self.lock().store.seed_handle()
    }

    /// Snapshot of the generated series, newest first
    pub fn generated(&self) -> Vec<Series> {
        self.lock().store.generated().to_vec()
    }

    /// Number of generated series
    pub fn generated_count(&self) -> usize {
        self.lock().store.len()
    }

    /// Look up one series
    pub fn get(&self, selector: SeriesSelector) -> Option<Series> {
        let inner = self.lock();
        match selector {
            SeriesSelector::Seed => Some(inner.store.seed().clone()),
            SeriesSelector::Generated(idx) => inner.store.generated().get(idx).cloned(),
        }
    }

    /// Run one generation against the seed series.
    ///
    /// On success the new series are placed in front of the generated list
    /// and their count is returned. On failure the user-facing error is set,
    /// the list is untouched, and the underlying error is returned for
    /// diagnostics. `generating` is cleared either way once the call settles,
    /// or when the returned future is dropped early. A dropped trigger leaves
    /// the list and the error untouched.
    #[instrument(skip(self), fields(client = self.client.name()))]
    pub async fn start_generation(&self) -> Result<usize, SessionError> {
        let seed = {
            let mut inner = self.lock();
            if inner.view.generating {
                warn!("Generation already in flight, trigger rejected");
                return Err(SessionError::AlreadyGenerating);
            }
            inner.view.generating = true;
            inner.view.error = None;
            inner.store.seed_handle()
        };

        let in_flight = InFlight {
            session: self,
            armed: true,
        };

        info!(reference = %seed.title, "Generation started");
        let outcome = self.client.generate(&seed).await;

        let mut inner = in_flight.settle();

        match outcome {
            Ok(result) => {
                let added = result.len();
                inner.store.prepend(result.new_series);
                info!(added, total = inner.store.len(), "Generation completed");
                Ok(added)
            }
            Err(e) => {
                error!(error = %e, "Generation failed");
                inner.view.error = Some(GENERATION_FAILED_MESSAGE.to_string());
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::scripted::{ScriptedClient, ScriptedOutcome};
    use crate::domain::builtin_seed;

    fn session_with(script: Vec<ScriptedOutcome>) -> Session {
        Session::new(builtin_seed().unwrap(), Arc::new(ScriptedClient::new(script)))
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!("seed".parse::<SeriesSelector>().unwrap(), SeriesSelector::Seed);
        assert_eq!("1".parse::<SeriesSelector>().unwrap(), SeriesSelector::Generated(0));
        assert_eq!(" 3 ".parse::<SeriesSelector>().unwrap(), SeriesSelector::Generated(2));
        assert!("0".parse::<SeriesSelector>().is_err());
        assert!("first".parse::<SeriesSelector>().is_err());
    }

    #[test]
    fn test_client_name_comes_from_backend() {
        assert_eq!(session_with(vec![]).client_name(), "scripted");
    }

    #[tokio::test]
    async fn test_new_session_is_idle() {
        let session = session_with(vec![]);
        assert_eq!(session.view(), ViewState::default());
        assert_eq!(session.generated_count(), 0);
        assert_eq!(session.get(SeriesSelector::Seed).unwrap().episodes.len(), 10);
        assert!(session.get(SeriesSelector::Generated(0)).is_none());
    }

    #[tokio::test]
    async fn test_success_clears_previous_error() {
        let session = session_with(vec![
            ScriptedOutcome::ApiError {
                status: 500,
                message: "boom".to_string(),
            },
            ScriptedOutcome::Series(vec![Series::new("A", "")]),
        ]);

        assert!(session.start_generation().await.is_err());
        assert_eq!(session.error().as_deref(), Some(GENERATION_FAILED_MESSAGE));

        assert_eq!(session.start_generation().await.unwrap(), 1);
        assert!(session.error().is_none());
        assert!(!session.is_generating());
    }
}
