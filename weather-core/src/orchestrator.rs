//! Drives a lookup from submitted text to a displayable [`UiState`].

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{FETCH_FAILED_MESSAGE, FetchError},
    model::{QueryInput, UiState},
    provider::WeatherProvider,
};

/// Owns the widget state and turns searches into state transitions.
///
/// Every accepted search takes a new request token. A response that comes
/// back after a newer search has started is dropped, so the newest search
/// always decides what is shown.
#[derive(Debug)]
pub struct Orchestrator {
    provider: Box<dyn WeatherProvider>,
    default_city: String,
    state: watch::Sender<UiState>,
    latest_request: AtomicU64,
}

impl Orchestrator {
    pub fn new(provider: Box<dyn WeatherProvider>, default_city: impl Into<String>) -> Self {
        let (state, _) = watch::channel(UiState::Loading);

        Self {
            provider,
            default_city: default_city.into(),
            state,
            latest_request: AtomicU64::new(0),
        }
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    /// Initial lookup for the configured default city.
    pub async fn mount(&self) -> bool {
        self.fetch_weather(&self.default_city).await
    }

    /// Look up `input` and publish the outcome.
    ///
    /// Blank input is ignored: no request, no state change, returns `false`.
    #[instrument(skip(self))]
    pub async fn fetch_weather(&self, input: &str) -> bool {
        let Some(city) = QueryInput::parse(input) else {
            debug!("{}", FetchError::EmptyInput);
            return false;
        };

        let mut token = 0;
        self.state.send_if_modified(|state| {
            token = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
            if state.is_loading() {
                return false;
            }
            *state = UiState::Loading;
            true
        });

        let next = match self.provider.current_weather(&city).await {
            Ok(snapshot) => UiState::Ready(snapshot),
            Err(err) => {
                match &err {
                    FetchError::NotFound { .. } => info!(%city, error = %err, "city lookup failed"),
                    _ => warn!(%city, error = %err, "error fetching weather information"),
                }
                UiState::Error(err.user_message().unwrap_or(FETCH_FAILED_MESSAGE).to_string())
            }
        };

        let published = self.state.send_if_modified(|state| {
            if self.latest_request.load(Ordering::SeqCst) != token {
                return false;
            }
            *state = next;
            true
        });

        if !published {
            debug!(token, "discarding response superseded by a newer search");
        }

        true
    }
}
