//! Quellen-Pakete
//!
//! - [`SourceAudioPacket`] – Audio-Frame einer Quelle (UDP, clientbound)
//! - [`SourcePacket`] – Steuerpakete einer Quelle (TCP, clientbound):
//!   Quellen-Info und Ende einer Sprechsequenz
//!
//! Beim Umleiten wird nur die Quellen-ID ausgetauscht; Sequenznummer,
//! Nutzdaten und Distanz bleiben erhalten.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use spectator_core::types::{LineId, SourceId};

use crate::codec::CodecInfo;

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

/// Audio-Frame einer Quelle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAudioPacket {
    /// Monoton steigende Sequenznummer des Senders
    pub sequenz: u64,
    /// Quellen-Zustand (umgeleitete Pakete setzen immer 0)
    pub zustand: u8,
    /// Kodierte Nutzdaten (Opus)
    pub daten: Bytes,
    /// Quelle unter der das Paket ausgeliefert wird
    pub quelle: SourceId,
    /// Hoerweite in Bloecken
    pub distanz: u16,
}

impl SourceAudioPacket {
    pub fn neu(sequenz: u64, daten: Bytes, quelle: SourceId, distanz: u16) -> Self {
        Self {
            sequenz,
            zustand: 0,
            daten,
            quelle,
            distanz,
        }
    }

    /// Baut das Paket fuer eine andere Quelle neu auf
    ///
    /// Die Nutzdaten werden nicht kopiert (`Bytes` ist referenzgezaehlt).
    pub fn fuer_quelle(&self, quelle: SourceId, distanz: u16) -> Self {
        Self::neu(self.sequenz, self.daten.clone(), quelle, distanz)
    }
}

// ---------------------------------------------------------------------------
// Steuerpakete
// ---------------------------------------------------------------------------

/// Beschreibung einer Quelle wie sie Clients sehen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub quelle: SourceId,
    pub line: LineId,
    pub stereo: bool,
    pub codec: Option<CodecInfo>,
    pub icon_sichtbar: bool,
    /// Anzeigename (bei Spieler-Quellen der Spielername)
    pub name: Option<String>,
}

/// Quellen-Info (Codec, Stereo, Sichtbarkeit)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfoPacket {
    pub info: SourceInfo,
}

/// Ende einer Sprechsequenz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAudioEndPacket {
    pub quelle: SourceId,
    pub sequenz: u64,
}

/// Steuerpakete die eine Quelle aussendet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "typ", rename_all = "snake_case")]
pub enum SourcePacket {
    Info(SourceInfoPacket),
    AudioEnde(SourceAudioEndPacket),
}

impl SourcePacket {
    /// Gibt den Paket-Namen zurueck (fuer Logs)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Info(_) => "source_info",
            Self::AudioEnde(_) => "source_audio_end",
        }
    }
}
