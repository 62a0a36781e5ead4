//! spectator-server – Addon-Schale um die Routing-Engine
//!
//! Verbindet die Feeds des Voice-Servers mit dem [`SpectatorRouter`]:
//! - Audio- und Steuerpakete -> Routing-Entscheidung (Suppress/Augment)
//! - Disconnect -> Bereinigung des Listeners
//! - Konfig-Reload -> Datei neu lesen, Optionen anwenden
//!
//! Die Konfiguration wird bei der Initialisierung geladen; Fehler dort sind
//! fatal. Ein fehlgeschlagener Reload behaelt die bisherigen Optionen.

pub mod beobachter;
pub mod config;
pub mod demo;

use spectator_core::error::Result;
use spectator_core::event::AddonEvent;
use spectator_core::types::ListenerId;
use spectator_observability::SpectatorMetrics;
use spectator_voice::{
    ActivationBridge, AudioEreignis, RoutingDecision, SpectatorRouter, SteuerEreignis,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

use beobachter::MetrikBeobachter;
use config::AddonKonfig;

/// Das initialisierte Addon
pub struct SpectatorAddon {
    configs_dir: PathBuf,
    router: SpectatorRouter,
    metriken: SpectatorMetrics,
}

impl SpectatorAddon {
    /// Laedt die Konfiguration und baut die Engine auf
    pub fn initialisieren(
        configs_dir: impl Into<PathBuf>,
        bruecke: Option<Arc<dyn ActivationBridge>>,
    ) -> Result<Self> {
        let configs_dir = configs_dir.into();
        let konfig = AddonKonfig::laden_oder_erstellen(&configs_dir)?;
        let metriken = SpectatorMetrics::neu()?;

        let router = SpectatorRouter::mit_beobachter(
            konfig.routing_optionen(),
            bruecke,
            Arc::new(MetrikBeobachter::neu(metriken.clone())),
        );

        tracing::info!(
            pfad = %AddonKonfig::pfad(&configs_dir).display(),
            show_icon = konfig.show_icon,
            suppress_static_default = konfig.suppress_static_default,
            reload_entity_icons = konfig.reload_entity_icons,
            "Spectator-Addon initialisiert"
        );

        Ok(Self {
            configs_dir,
            router,
            metriken,
        })
    }

    /// Liest die Konfiguration neu und wendet sie auf bestehende Quellen an
    ///
    /// Bei einem Fehler bleiben die bisherigen Optionen aktiv.
    pub fn konfig_neu_laden(&self) -> Result<()> {
        let konfig = AddonKonfig::laden_oder_erstellen(&self.configs_dir)?;
        self.router.optionen_anwenden(konfig.routing_optionen());
        Ok(())
    }

    pub fn client_getrennt(&self, listener: &ListenerId) {
        tracing::debug!(listener = %listener, "Client getrennt");
        self.router.client_getrennt(listener);
    }

    /// Audio-Paket einer Quelle; `Suppress` verwirft die Standard-Auslieferung
    pub fn audio_paket_empfangen(&self, ereignis: &AudioEreignis) -> RoutingDecision {
        self.router.audio_paket_verarbeiten(ereignis)
    }

    /// Steuerpaket einer Quelle; `Suppress` verwirft die Standard-Auslieferung
    pub fn steuer_paket_empfangen(&self, ereignis: &SteuerEreignis) -> RoutingDecision {
        self.router.steuer_paket_verarbeiten(ereignis)
    }

    /// Verarbeitet ein Ereignis aus dem Lifecycle-Feed des Hosts
    pub fn ereignis_verarbeiten(&self, ereignis: &AddonEvent) -> Result<()> {
        tracing::trace!(ereignis = ereignis.name(), "Host-Ereignis");
        match ereignis {
            AddonEvent::ClientGetrennt { listener } => {
                self.client_getrennt(listener);
                Ok(())
            }
            AddonEvent::KonfigurationNeuGeladen => self.konfig_neu_laden(),
        }
    }

    pub fn configs_dir(&self) -> &Path {
        &self.configs_dir
    }

    pub fn router(&self) -> &SpectatorRouter {
        &self.router
    }

    pub fn metriken(&self) -> &SpectatorMetrics {
        &self.metriken
    }
}

/// Konsumiert den Lifecycle-Feed bis der Sender geschlossen wird
///
/// Ein fehlgeschlagener Reload wird geloggt; die bisherigen Optionen
/// bleiben aktiv und spaetere Disconnects werden weiter verarbeitet.
pub async fn ereignisse_verarbeiten(
    addon: Arc<SpectatorAddon>,
    mut feed: mpsc::Receiver<AddonEvent>,
) {
    while let Some(ereignis) = feed.recv().await {
        if let Err(e) = addon.ereignis_verarbeiten(&ereignis) {
            tracing::error!(ereignis = ereignis.name(), fehler = %e, "Host-Ereignis fehlgeschlagen");
        }
    }
    tracing::debug!("Lifecycle-Feed geschlossen");
}
