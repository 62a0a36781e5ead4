//! Host-Ereignisse ausserhalb des Voice-Pfads
//!
//! Verbindungs- und Konfigurations-Feeds des Hosts. Voice-Pakete laufen
//! nicht ueber diesen Typ, sondern direkt in die Routing-Handler.

use crate::types::ListenerId;
use serde::{Deserialize, Serialize};

/// Lifecycle-Ereignisse die der Host an das Addon meldet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddonEvent {
    /// UDP-Verbindung eines Zuhoerers wurde getrennt
    ClientGetrennt { listener: ListenerId },
    /// Die Voice-Server-Konfiguration wurde neu geladen
    KonfigurationNeuGeladen,
}

impl AddonEvent {
    /// Gibt den Event-Namen als String zurueck (fuer Logs)
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClientGetrennt { .. } => "client_getrennt",
            Self::KonfigurationNeuGeladen => "konfiguration_neu_geladen",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_namen() {
        let e = AddonEvent::ClientGetrennt {
            listener: ListenerId::new(),
        };
        assert_eq!(e.name(), "client_getrennt");
        assert_eq!(
            AddonEvent::KonfigurationNeuGeladen.name(),
            "konfiguration_neu_geladen"
        );
    }

    #[test]
    fn event_ist_serde_kompatibel() {
        let e = AddonEvent::ClientGetrennt {
            listener: ListenerId::new(),
        };
        let json = serde_json::to_string(&e).unwrap();
        let e2: AddonEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(e, e2);
    }
}
