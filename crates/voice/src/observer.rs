//! Beobachter-Schnittstelle fuer Routing-Statistiken
//!
//! Die Engine meldet Ereignisse an einen [`RoutingBeobachter`]; die
//! Addon-Schale haengt dort ihre Prometheus-Metriken an.

use spectator_core::types::{ListenerId, SubstituteKind};

/// Art eines umgeleiteten Pakets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaketArt {
    Audio,
    Steuerung,
}

impl PaketArt {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Steuerung => "control",
        }
    }
}

/// Empfaenger fuer Routing-Ereignisse. Alle Methoden haben leere Defaults.
pub trait RoutingBeobachter: Send + Sync {
    fn quelle_erstellt(&self, _art: SubstituteKind) {}

    fn quelle_entfernt(&self, _art: SubstituteKind) {}

    fn paket_umgeleitet(&self, _art: SubstituteKind, _paket: PaketArt) {}

    fn position_aktualisiert(&self) {}

    /// Ein Listener wurde bereinigt und hatte noch Zustand
    fn listener_bereinigt(&self, _listener: ListenerId) {}
}

/// Beobachter der nichts tut
#[derive(Debug, Default, Clone, Copy)]
pub struct KeinBeobachter;

impl RoutingBeobachter for KeinBeobachter {}
