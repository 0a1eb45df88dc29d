//! Core library for the `weathernow` CLI.
//!
//! This crate defines:
//! - Forecast aggregation (3-hourly samples into a 5-day summary)
//! - Per-user favorite city lists over a pluggable key-value store
//! - The OpenWeather client and payload normalization
//! - Configuration & session handling
//!
//! It is used by `weathernow-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod favorites;
pub mod forecast;
pub mod model;
pub mod session;
pub mod store;

pub use client::OpenWeatherClient;
pub use config::Config;
pub use error::{InvalidInputError, PersistenceError, StoreError};
pub use favorites::FavoritesStore;
pub use forecast::aggregate;
pub use model::{CurrentConditions, DailySummary, WeatherSample};
pub use session::{Session, UserProfile};
pub use store::KeyValueStore;
