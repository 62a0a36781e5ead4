//! In-Memory Host – Listener, Lines und Quellen ohne Voice-Server
//!
//! Bildet die Host-Schnittstellen so weit nach, dass Routing-Entscheidungen
//! beobachtbar werden: Quellen zeichnen alle Aufrufe auf und liefern an die
//! Listener der [`SimWelt`] aus, die ihr Filter zulaesst. Reichweite und
//! Netzwerk werden nicht simuliert.

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use spectator_core::types::{
    ActivationId, EntityId, LineId, ListenerId, Position, SourceId, SubstituteKind,
};
use spectator_protocol::codec::CodecInfo;
use spectator_protocol::source::{SourceAudioPacket, SourceInfo, SourcePacket};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use crate::filter::EmpfaengerFilter;
use crate::host::{ActivationBridge, Listener, SourceLine, Substitute};

/// Standard-Hitbox eines stehenden Spielers
pub const STANDARD_HITBOX: f64 = 1.8;

// ---------------------------------------------------------------------------
// Welt
// ---------------------------------------------------------------------------

/// Alle verbundenen Listener und lebenden Quellen
#[derive(Default)]
pub struct SimWelt {
    listener: RwLock<Vec<Arc<SimListener>>>,
    quellen: DashMap<SourceId, Arc<SimQuelle>>,
    entfernt: Mutex<Vec<SourceId>>,
}

impl SimWelt {
    pub fn neu() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Verbindet einen neuen Listener
    pub fn listener_hinzufuegen(&self, name: &str) -> Arc<SimListener> {
        let listener = SimListener::neu(name);
        self.listener.write().push(Arc::clone(&listener));
        listener
    }

    /// Trennt einen Listener (nur aus der Welt, nicht aus dem Router)
    pub fn listener_entfernen(&self, id: &ListenerId) -> bool {
        let mut listener = self.listener.write();
        let vorher = listener.len();
        listener.retain(|l| l.id != *id);
        listener.len() != vorher
    }

    pub fn listener(&self) -> Vec<Arc<SimListener>> {
        self.listener.read().clone()
    }

    /// Lebende Quelle mit dieser ID
    pub fn quelle(&self, id: SourceId) -> Option<Arc<SimQuelle>> {
        self.quellen.get(&id).map(|q| Arc::clone(q.value()))
    }

    pub fn quellen_anzahl(&self) -> usize {
        self.quellen.len()
    }

    /// IDs aller ueber eine Line entfernten Quellen, in Reihenfolge
    pub fn entfernte_quellen(&self) -> Vec<SourceId> {
        self.entfernt.lock().clone()
    }

    fn empfaenger(&self, filter: &EmpfaengerFilter) -> Vec<Arc<SimListener>> {
        self.listener
            .read()
            .iter()
            .filter(|l| filter.erlaubt(l.as_ref()))
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Listener
// ---------------------------------------------------------------------------

pub struct SimListener {
    id: ListenerId,
    name: RwLock<String>,
    zuschauer: AtomicBool,
    ziel: Mutex<Option<EntityId>>,
    position: Mutex<Position>,
    hitbox: Mutex<f64>,
    postfach: Mutex<Vec<SourcePacket>>,
    audio_empfangen: AtomicUsize,
}

impl SimListener {
    pub fn neu(name: &str) -> Arc<Self> {
        Self::mit_id(ListenerId::new(), name)
    }

    /// Listener mit fester ID (Reconnect behaelt die Identitaet)
    pub fn mit_id(id: ListenerId, name: &str) -> Arc<Self> {
        Arc::new(Self {
            id,
            name: RwLock::new(name.to_string()),
            zuschauer: AtomicBool::new(false),
            ziel: Mutex::new(None),
            position: Mutex::new(Position::default()),
            hitbox: Mutex::new(STANDARD_HITBOX),
            postfach: Mutex::new(Vec::new()),
            audio_empfangen: AtomicUsize::new(0),
        })
    }

    pub fn zuschauer_setzen(&self, zuschauer: bool) {
        self.zuschauer.store(zuschauer, Ordering::SeqCst);
    }

    pub fn ziel_setzen(&self, ziel: Option<EntityId>) {
        *self.ziel.lock() = ziel;
    }

    pub fn position_setzen(&self, position: Position) {
        *self.position.lock() = position;
    }

    pub fn hitbox_setzen(&self, hoehe: f64) {
        *self.hitbox.lock() = hoehe;
    }

    /// Alle empfangenen Steuerpakete
    pub fn empfangene_pakete(&self) -> Vec<SourcePacket> {
        self.postfach.lock().clone()
    }

    pub fn empfangene_audio_pakete(&self) -> usize {
        self.audio_empfangen.load(Ordering::SeqCst)
    }
}

impl Listener for SimListener {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn name(&self) -> String {
        self.name.read().clone()
    }

    fn ist_zuschauer(&self) -> bool {
        self.zuschauer.load(Ordering::SeqCst)
    }

    fn zuschau_ziel(&self) -> Option<EntityId> {
        *self.ziel.lock()
    }

    fn position(&self) -> Position {
        *self.position.lock()
    }

    fn hitbox_hoehe(&self) -> f64 {
        *self.hitbox.lock()
    }

    fn paket_senden(&self, paket: &SourcePacket) {
        self.postfach.lock().push(paket.clone());
    }
}

// ---------------------------------------------------------------------------
// Quelle
// ---------------------------------------------------------------------------

/// Ersatzquelle, die alle Host-Aufrufe aufzeichnet
pub struct SimQuelle {
    id: SourceId,
    art: SubstituteKind,
    entity: Option<EntityId>,
    filter: EmpfaengerFilter,
    codec: CodecInfo,
    welt: Weak<SimWelt>,
    position: Mutex<Option<Position>>,
    positions_updates: AtomicUsize,
    stereo: AtomicBool,
    name: Mutex<String>,
    icon_sichtbar: AtomicBool,
    audio: Mutex<Vec<SourceAudioPacket>>,
}

impl SimQuelle {
    fn neu(
        art: SubstituteKind,
        position: Option<Position>,
        entity: Option<EntityId>,
        stereo: bool,
        codec: CodecInfo,
        filter: EmpfaengerFilter,
        welt: Weak<SimWelt>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: SourceId::new(),
            art,
            entity,
            filter,
            codec,
            welt,
            position: Mutex::new(position),
            positions_updates: AtomicUsize::new(0),
            stereo: AtomicBool::new(stereo),
            name: Mutex::new(String::new()),
            icon_sichtbar: AtomicBool::new(true),
            audio: Mutex::new(Vec::new()),
        })
    }

    /// Freistehende statische Quelle ohne Welt (liefert an niemanden aus)
    pub fn statisch(position: Position) -> Arc<Self> {
        Self::neu(
            SubstituteKind::Statisch,
            Some(position),
            None,
            false,
            CodecInfo::default(),
            EmpfaengerFilter::fuer(SubstituteKind::Statisch, ListenerId::new()),
            Weak::new(),
        )
    }

    /// Letzte gesetzte Position (bei Entity-Quellen `None`)
    pub fn position(&self) -> Option<Position> {
        *self.position.lock()
    }

    /// Anzahl der Positions-Updates nach der Erstellung
    pub fn positions_updates(&self) -> usize {
        self.positions_updates.load(Ordering::SeqCst)
    }

    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    pub fn stereo(&self) -> bool {
        self.stereo.load(Ordering::SeqCst)
    }

    pub fn name(&self) -> String {
        self.name.lock().clone()
    }

    pub fn icon_sichtbar(&self) -> bool {
        self.icon_sichtbar.load(Ordering::SeqCst)
    }

    pub fn filter(&self) -> EmpfaengerFilter {
        self.filter
    }

    pub fn codec(&self) -> CodecInfo {
        self.codec
    }

    pub fn audio_pakete(&self) -> Vec<SourceAudioPacket> {
        self.audio.lock().clone()
    }

    fn empfaenger(&self) -> Vec<Arc<SimListener>> {
        self.welt
            .upgrade()
            .map(|welt| welt.empfaenger(&self.filter))
            .unwrap_or_default()
    }
}

impl Substitute for SimQuelle {
    fn id(&self) -> SourceId {
        self.id
    }

    fn art(&self) -> SubstituteKind {
        self.art
    }

    fn position_setzen(&self, position: Position) {
        *self.position.lock() = Some(position);
        self.positions_updates.fetch_add(1, Ordering::SeqCst);
    }

    fn stereo_setzen(&self, stereo: bool) {
        self.stereo.store(stereo, Ordering::SeqCst);
    }

    fn name_setzen(&self, name: &str) {
        *self.name.lock() = name.to_string();
    }

    fn icon_sichtbar_setzen(&self, sichtbar: bool) {
        self.icon_sichtbar.store(sichtbar, Ordering::SeqCst);
    }

    fn audio_paket_senden(&self, paket: &SourceAudioPacket, _distanz: u16) -> bool {
        self.audio.lock().push(paket.clone());
        let empfaenger = self.empfaenger();
        for listener in &empfaenger {
            listener.audio_empfangen.fetch_add(1, Ordering::SeqCst);
        }
        !empfaenger.is_empty()
    }

    fn paket_senden(&self, paket: &SourcePacket, _distanz: u16) {
        for listener in self.empfaenger() {
            listener.paket_senden(paket);
        }
    }
}

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

pub struct SimLine {
    id: LineId,
    welt: Arc<SimWelt>,
    erstellt: AtomicUsize,
    letzte: Mutex<Option<Arc<SimQuelle>>>,
}

impl SimLine {
    pub fn neu(welt: &Arc<SimWelt>) -> Arc<Self> {
        Arc::new(Self {
            id: LineId::new(),
            welt: Arc::clone(welt),
            erstellt: AtomicUsize::new(0),
            letzte: Mutex::new(None),
        })
    }

    /// Anzahl der ueber diese Line erstellten Quellen
    pub fn erstellte_quellen(&self) -> usize {
        self.erstellt.load(Ordering::SeqCst)
    }

    /// Zuletzt erstellte Quelle
    pub fn letzte_quelle(&self) -> Option<Arc<SimQuelle>> {
        self.letzte.lock().clone()
    }

    fn registrieren(&self, quelle: Arc<SimQuelle>) -> Arc<dyn Substitute> {
        self.erstellt.fetch_add(1, Ordering::SeqCst);
        self.welt.quellen.insert(quelle.id, Arc::clone(&quelle));
        *self.letzte.lock() = Some(Arc::clone(&quelle));
        quelle
    }
}

impl SourceLine for SimLine {
    fn id(&self) -> LineId {
        self.id
    }

    fn statische_quelle_erstellen(
        &self,
        position: Position,
        stereo: bool,
        codec: CodecInfo,
        filter: EmpfaengerFilter,
    ) -> Arc<dyn Substitute> {
        self.registrieren(SimQuelle::neu(
            SubstituteKind::Statisch,
            Some(position),
            None,
            stereo,
            codec,
            filter,
            Arc::downgrade(&self.welt),
        ))
    }

    fn entity_quelle_erstellen(
        &self,
        entity: EntityId,
        stereo: bool,
        codec: CodecInfo,
        filter: EmpfaengerFilter,
    ) -> Arc<dyn Substitute> {
        self.registrieren(SimQuelle::neu(
            SubstituteKind::Entity,
            None,
            Some(entity),
            stereo,
            codec,
            filter,
            Arc::downgrade(&self.welt),
        ))
    }

    fn quelle_entfernen(&self, quelle: SourceId) {
        self.welt.quellen.remove(&quelle);
        self.welt.entfernt.lock().push(quelle);
    }
}

// ---------------------------------------------------------------------------
// Aktivierungs-Bruecke
// ---------------------------------------------------------------------------

/// Aufgezeichneter Aufruf von `audio_info_senden`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioInfoAufruf {
    pub listener: ListenerId,
    pub quelle: SourceId,
    pub aktivierung: ActivationId,
    pub sequenz: u64,
}

/// Aufgezeichneter Aufruf von `eigene_quellen_info_aktualisieren`
#[derive(Debug, Clone, PartialEq)]
pub struct QuellenInfoAufruf {
    pub listener: ListenerId,
    pub quelle: SourceId,
    pub stereo: bool,
    pub codec: Option<CodecInfo>,
}

#[derive(Default)]
pub struct SimBruecke {
    audio_infos: Mutex<Vec<AudioInfoAufruf>>,
    quellen_infos: Mutex<Vec<QuellenInfoAufruf>>,
}

impl SimBruecke {
    pub fn audio_infos(&self) -> Vec<AudioInfoAufruf> {
        self.audio_infos.lock().clone()
    }

    pub fn quellen_infos(&self) -> Vec<QuellenInfoAufruf> {
        self.quellen_infos.lock().clone()
    }
}

impl ActivationBridge for SimBruecke {
    fn audio_info_senden(
        &self,
        listener: &dyn Listener,
        quelle: &dyn Substitute,
        aktivierung: ActivationId,
        paket: &SourceAudioPacket,
    ) {
        self.audio_infos.lock().push(AudioInfoAufruf {
            listener: listener.id(),
            quelle: quelle.id(),
            aktivierung,
            sequenz: paket.sequenz,
        });
    }

    fn eigene_quellen_info_aktualisieren(
        &self,
        listener: &dyn Listener,
        quelle: &dyn Substitute,
        info: &SourceInfo,
    ) {
        self.quellen_infos.lock().push(QuellenInfoAufruf {
            listener: listener.id(),
            quelle: quelle.id(),
            stereo: info.stereo,
            codec: info.codec,
        });
    }
}
