//! Selbst-Aktivierung – haelt die "Ich spreche"-Anzeige konsistent
//!
//! Wird Sprache ueber eine Entity-Quelle statt ueber die eigene Quelle
//! ausgeliefert, sieht der Client seine eigene Aktivierung sonst nicht.
//! Kein eigener Zustand; ohne Bruecke sind alle Aufrufe No-ops.

use spectator_core::types::ActivationId;
use spectator_protocol::source::{SourceAudioPacket, SourceInfo};
use std::sync::Arc;

use crate::host::{ActivationBridge, Listener, Substitute};

#[derive(Clone, Default)]
pub struct SelbstAktivierung {
    bruecke: Option<Arc<dyn ActivationBridge>>,
}

impl SelbstAktivierung {
    pub fn neu(bruecke: Option<Arc<dyn ActivationBridge>>) -> Self {
        Self { bruecke }
    }

    pub fn audio_info_senden(
        &self,
        listener: &dyn Listener,
        quelle: &dyn Substitute,
        aktivierung: ActivationId,
        paket: &SourceAudioPacket,
    ) {
        if let Some(bruecke) = &self.bruecke {
            bruecke.audio_info_senden(listener, quelle, aktivierung, paket);
        }
    }

    pub fn eigene_quellen_info_aktualisieren(
        &self,
        listener: &dyn Listener,
        quelle: &dyn Substitute,
        info: &SourceInfo,
    ) {
        if let Some(bruecke) = &self.bruecke {
            bruecke.eigene_quellen_info_aktualisieren(listener, quelle, info);
        }
    }
}
