//! Fehlertypen fuer das Spectator-Addon
//!
//! Der Routing-Pfad selbst ist fehlerfrei; Fehler entstehen nur beim
//! Laden und Speichern der Konfiguration sowie beim Aufbau der Metriken.

use thiserror::Error;

/// Globaler Result-Alias
pub type Result<T> = std::result::Result<T, SpectatorError>;

/// Alle moeglichen Fehler im Spectator-Addon
#[derive(Debug, Error)]
pub enum SpectatorError {
    // --- Konfiguration ---
    #[error("Konfigurationsfehler in '{pfad}': {grund}")]
    Konfiguration { pfad: String, grund: String },

    // --- Intern ---
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl SpectatorError {
    /// Erstellt einen Konfigurationsfehler fuer eine Datei
    pub fn konfiguration(pfad: impl std::fmt::Display, grund: impl std::fmt::Display) -> Self {
        Self::Konfiguration {
            pfad: pfad.to_string(),
            grund: grund.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn konfiguration_anzeige() {
        let e = SpectatorError::konfiguration("config.toml", "unerwartetes Zeichen");
        assert_eq!(
            e.to_string(),
            "Konfigurationsfehler in 'config.toml': unerwartetes Zeichen"
        );
    }

    #[test]
    fn anyhow_fehler_bleibt_transparent() {
        let e: SpectatorError = anyhow::anyhow!("Registrierung doppelt").into();
        assert_eq!(e.to_string(), "Registrierung doppelt");
    }
}
