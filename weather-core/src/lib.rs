//! Core library for the `weather` widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather "current weather by city" client
//! - Icon mapping for provider condition codes
//! - The orchestrator that turns a search into a displayable state
//!
//! It has no terminal I/O; `weather-cli` renders what it produces.

pub mod config;
pub mod error;
pub mod icon;
pub mod model;
pub mod orchestrator;
pub mod provider;

pub use config::Config;
pub use error::FetchError;
pub use icon::{IconAsset, MetricIcon, resolve_icon};
pub use model::{QueryInput, UiState, WeatherSnapshot};
pub use orchestrator::Orchestrator;
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
