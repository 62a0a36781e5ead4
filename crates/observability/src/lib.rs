//! # spectator-observability
//!
//! Observability fuer das Spectator-Addon:
//! - Prometheus-kompatible Routing-Metriken (Textexport)
//! - Structured Logging via tracing-subscriber (text oder json)

pub mod logging;
pub mod metrics;

pub use logging::logging_initialisieren;
pub use metrics::SpectatorMetrics;
