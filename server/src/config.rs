//! Addon-Konfiguration
//!
//! Liegt unter `<configs_dir>/pv-addon-spectator/config.toml`. Fehlende
//! Felder bekommen Standardwerte; nach dem Laden wird die vollstaendige
//! Konfiguration zurueckgeschrieben, damit neue Schalter in der Datei
//! sichtbar werden. Lese-, Parse- und Schreibfehler sind fatal.

use serde::{Deserialize, Serialize};
use spectator_core::error::{Result, SpectatorError};
use spectator_voice::RoutingOptionen;
use std::path::{Path, PathBuf};

/// Unterverzeichnis des Addons im Konfig-Verzeichnis des Voice-Servers
pub const ADDON_VERZEICHNIS: &str = "pv-addon-spectator";

/// Dateiname der Addon-Konfiguration
pub const KONFIG_DATEI: &str = "config.toml";

/// Vollstaendige Addon-Konfiguration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddonKonfig {
    /// Icon-Sichtbarkeit der Ersatzquellen
    pub show_icon: bool,
    /// Statischer Anker unterdrueckt ebenfalls die Standard-Auslieferung
    pub suppress_static_default: bool,
    /// Reload setzt `show_icon` auch auf Entity-Quellen
    pub reload_entity_icons: bool,
}

impl Default for AddonKonfig {
    fn default() -> Self {
        Self {
            show_icon: true,
            suppress_static_default: false,
            reload_entity_icons: true,
        }
    }
}

impl AddonKonfig {
    /// Pfad der Konfigurationsdatei fuer ein Konfig-Verzeichnis
    pub fn pfad(configs_dir: &Path) -> PathBuf {
        configs_dir.join(ADDON_VERZEICHNIS).join(KONFIG_DATEI)
    }

    /// Laedt die Konfiguration oder legt sie mit Standardwerten an.
    ///
    /// Die geladene Konfiguration wird immer zurueckgeschrieben.
    pub fn laden_oder_erstellen(configs_dir: &Path) -> Result<Self> {
        let pfad = Self::pfad(configs_dir);

        let konfig = match std::fs::read_to_string(&pfad) {
            Ok(inhalt) => toml::from_str(&inhalt)
                .map_err(|e| SpectatorError::konfiguration(pfad.display(), e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    pfad = %pfad.display(),
                    "Konfigurationsdatei nicht gefunden, lege Standardwerte an"
                );
                Self::default()
            }
            Err(e) => return Err(SpectatorError::konfiguration(pfad.display(), e)),
        };

        konfig.speichern(&pfad)?;
        Ok(konfig)
    }

    /// Schreibt die Konfiguration (legt fehlende Verzeichnisse an)
    pub fn speichern(&self, pfad: &Path) -> Result<()> {
        if let Some(verzeichnis) = pfad.parent() {
            std::fs::create_dir_all(verzeichnis)
                .map_err(|e| SpectatorError::konfiguration(verzeichnis.display(), e))?;
        }
        let inhalt = toml::to_string_pretty(self)
            .map_err(|e| SpectatorError::konfiguration(pfad.display(), e))?;
        std::fs::write(pfad, inhalt).map_err(|e| SpectatorError::konfiguration(pfad.display(), e))
    }

    /// Routing-Optionen fuer die Engine
    pub fn routing_optionen(&self) -> RoutingOptionen {
        RoutingOptionen {
            icon_anzeigen: self.show_icon,
            statisch_unterdruecken: self.suppress_static_default,
            entity_icons_aktualisieren: self.reload_entity_icons,
        }
    }
}
