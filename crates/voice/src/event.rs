//! Eingehende Voice-Ereignisse
//!
//! Der Host reicht jedes Audio- und Steuerpaket einer Quelle als Ereignis
//! an den Router. Nur Ereignisse der eigenen Spieler-Quelle eines Listeners
//! werden umgeleitet.

use spectator_core::types::{ActivationId, ChannelKey, SourceId};
use spectator_protocol::source::{SourceAudioPacket, SourcePacket};
use std::sync::Arc;

use crate::host::{Listener, SourceLine};

/// Die eigene Quelle eines sprechenden Spielers
#[derive(Clone)]
pub struct SpielerQuelle {
    pub listener: Arc<dyn Listener>,
    /// Line auf der gesprochen wird
    pub line: Arc<dyn SourceLine>,
    /// Stereo-Flag aus der aktuellen Quellen-Info des Spielers
    pub stereo: bool,
}

impl SpielerQuelle {
    pub fn schluessel(&self) -> ChannelKey {
        ChannelKey::neu(self.listener.id(), self.line.id())
    }
}

/// Absender eines Ereignisses
#[derive(Clone)]
pub enum EreignisQuelle {
    Spieler(SpielerQuelle),
    /// Jede andere Quelle (statisch, Entity, anderes Addon) – wird ignoriert
    Andere(SourceId),
}

/// Audio-Paket einer Quelle
#[derive(Clone)]
pub struct AudioEreignis {
    pub quelle: EreignisQuelle,
    pub paket: SourceAudioPacket,
    /// Hoerweite mit der das Paket ausgeliefert wird
    pub distanz: u16,
    pub aktivierung: Option<ActivationId>,
}

/// Steuerpaket einer Quelle
#[derive(Clone)]
pub struct SteuerEreignis {
    pub quelle: EreignisQuelle,
    pub paket: SourcePacket,
    pub distanz: u16,
}
