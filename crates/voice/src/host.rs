//! Host-Schnittstellen
//!
//! Der Voice-Server stellt Listener, Source-Lines und Quellen als
//! Trait-Objekte bereit. Die Engine nimmt keine konkrete Darstellung an
//! und ruft nur die hier beschriebenen Zugriffe auf.
//!
//! Alle Aufrufe sind nicht-blockierend; Sendevorgaene sind fire-and-forget.

use spectator_core::types::{
    ActivationId, EntityId, LineId, ListenerId, Position, SourceId, SubstituteKind,
};
use spectator_protocol::codec::CodecInfo;
use spectator_protocol::source::{SourceAudioPacket, SourceInfo, SourcePacket};
use std::sync::Arc;

use crate::filter::EmpfaengerFilter;

/// Ein verbundener Spieler aus Sicht des Addons
pub trait Listener: Send + Sync {
    /// Stabile Identitaet (bleibt ueber Reconnects gleich)
    fn id(&self) -> ListenerId;

    /// Anzeigename
    fn name(&self) -> String;

    /// Ist der Spieler gerade im Zuschauermodus?
    fn ist_zuschauer(&self) -> bool;

    /// Entity die der Zuschauer gerade beobachtet
    fn zuschau_ziel(&self) -> Option<EntityId>;

    /// Aktuelle Welt-Position
    fn position(&self) -> Position;

    /// Hoehe der Hitbox in Bloecken
    fn hitbox_hoehe(&self) -> f64;

    /// Sendet ein Steuerpaket direkt an diesen Spieler
    fn paket_senden(&self, paket: &SourcePacket);
}

/// Eine vom Voice-Server verwaltete Ersatzquelle
pub trait Substitute: Send + Sync {
    /// Vom Host vergebene Quellen-ID, fuer die Lebensdauer stabil
    fn id(&self) -> SourceId;

    fn art(&self) -> SubstituteKind;

    /// Nur fuer statische Quellen relevant
    fn position_setzen(&self, position: Position);

    fn stereo_setzen(&self, stereo: bool);

    fn name_setzen(&self, name: &str);

    fn icon_sichtbar_setzen(&self, sichtbar: bool);

    /// Liefert ein Audio-Paket an alle Empfaenger in `distanz` aus
    ///
    /// Gibt `true` zurueck wenn mindestens ein Empfaenger erreicht wurde.
    fn audio_paket_senden(&self, paket: &SourceAudioPacket, distanz: u16) -> bool;

    /// Liefert ein Steuerpaket an alle Empfaenger in `distanz` aus
    fn paket_senden(&self, paket: &SourcePacket, distanz: u16);
}

/// Logischer Audio-Kanal (z.B. Proximity) mit eigener Quellen-Verwaltung
pub trait SourceLine: Send + Sync {
    fn id(&self) -> LineId;

    /// Erstellt eine an eine Welt-Position gebundene Quelle
    fn statische_quelle_erstellen(
        &self,
        position: Position,
        stereo: bool,
        codec: CodecInfo,
        filter: EmpfaengerFilter,
    ) -> Arc<dyn Substitute>;

    /// Erstellt eine an eine Entity gebundene Quelle
    fn entity_quelle_erstellen(
        &self,
        entity: EntityId,
        stereo: bool,
        codec: CodecInfo,
        filter: EmpfaengerFilter,
    ) -> Arc<dyn Substitute>;

    /// Entfernt eine Quelle dieser Line (Clients werden benachrichtigt)
    fn quelle_entfernen(&self, quelle: SourceId);
}

/// Anbindung an die "Ich spreche"-Anzeige des Clients
pub trait ActivationBridge: Send + Sync {
    /// Meldet dem Spieler, dass seine Sprache ueber `quelle` ausgeliefert wurde
    fn audio_info_senden(
        &self,
        listener: &dyn Listener,
        quelle: &dyn Substitute,
        aktivierung: ActivationId,
        paket: &SourceAudioPacket,
    );

    /// Aktualisiert die Quellen-Info der eigenen Anzeige (Stereo, Codec)
    fn eigene_quellen_info_aktualisieren(
        &self,
        listener: &dyn Listener,
        quelle: &dyn Substitute,
        info: &SourceInfo,
    );
}
