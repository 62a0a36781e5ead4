//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable:
//! - `SPECTATOR_LOG_LEVEL`: Log-Level oder Filter-Direktive, Standard: info
//! - `SPECTATOR_LOG_FORMAT`: Format (text/json), Standard: text
//!
//! Routing-Felder (listener, line, quelle, art) erscheinen als strukturierte
//! Event-Felder.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LOG_LEVEL: &str = "SPECTATOR_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "SPECTATOR_LOG_FORMAT";

/// Initialisiert das Logging-System.
///
/// Umgebungsvariablen haben Vorrang vor den uebergebenen Werten.
/// Ein zweiter Aufruf im selben Prozess liefert einen Fehler.
pub fn logging_initialisieren(level: &str, format: &str) -> Result<()> {
    let filter = EnvFilter::try_from_env(ENV_LOG_LEVEL)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format_env = std::env::var(ENV_LOG_FORMAT).unwrap_or_else(|_| format.to_string());

    let ergebnis = match format_env.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_current_span(true)
            .try_init(),
        _ => fmt().with_env_filter(filter).with_target(true).try_init(),
    };

    ergebnis.map_err(|e| anyhow!("Logging-Initialisierung fehlgeschlagen: {e}"))
}

/// Gibt den konfigurierten Log-Level aus der Umgebung zurueck.
/// Fallback: "info"
pub fn log_level_aus_env() -> String {
    std::env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| "info".to_string())
}

/// Gibt das konfigurierte Log-Format aus der Umgebung zurueck.
/// Fallback: "text"
pub fn log_format_aus_env() -> String {
    std::env::var(ENV_LOG_FORMAT).unwrap_or_else(|_| "text".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Prozess-Umgebung ist global: Setzen und Fallback im selben Test
    #[test]
    fn log_level_aus_env_mit_fallback() {
        std::env::set_var(ENV_LOG_LEVEL, "debug");
        assert_eq!(log_level_aus_env(), "debug");
        std::env::remove_var(ENV_LOG_LEVEL);
        assert_eq!(log_level_aus_env(), "info");
    }

    #[test]
    fn log_format_aus_env_mit_fallback() {
        std::env::set_var(ENV_LOG_FORMAT, "json");
        assert_eq!(log_format_aus_env(), "json");
        std::env::remove_var(ENV_LOG_FORMAT);
        assert_eq!(log_format_aus_env(), "text");
    }
}
