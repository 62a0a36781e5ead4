//! Spectator Router – Routing-Entscheidung pro Voice-Ereignis
//!
//! Fuer jedes Audio- oder Steuerpaket aus der eigenen Quelle eines Spielers:
//!
//! 1. Spieler schaut nicht zu -> Zustand bereinigen, Standard-Auslieferung
//! 2. Zuschauer mit Ziel-Entity -> Entity-Quelle, Standard-Auslieferung
//!    wird unterdrueckt
//! 3. Zuschauer ohne Ziel -> statische Quelle ueber dem Kopf; die
//!    Standard-Auslieferung bleibt erhalten (umschaltbar)
//!
//! Danach wird das Paket mit der ID der Ersatzquelle neu aufgebaut und
//! ueber sie ausgeliefert.
//!
//! `SpectatorRouter` ist `Clone` (innerer Arc) und wird von allen
//! I/O-Kontexten des Hosts gleichzeitig benutzt.

use parking_lot::RwLock;
use spectator_core::types::{ListenerId, SubstituteKind};
use spectator_protocol::codec::CodecInfo;
use spectator_protocol::source::{SourceAudioEndPacket, SourcePacket};
use std::sync::Arc;

use crate::activation::SelbstAktivierung;
use crate::event::{AudioEreignis, EreignisQuelle, SpielerQuelle, SteuerEreignis};
use crate::host::{ActivationBridge, Substitute};
use crate::lifecycle::LebenszyklusManager;
use crate::observer::{KeinBeobachter, PaketArt, RoutingBeobachter};
use crate::registry::{Anker, QuellenAnfrage, QuellenRegistry};
use crate::throttle::{anker_position, PositionsDrossel};

// ---------------------------------------------------------------------------
// Entscheidung & Optionen
// ---------------------------------------------------------------------------

/// Was mit der Standard-Auslieferung des Original-Ereignisses passiert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Standard-Auslieferung entfaellt, nur die Ersatzquelle liefert aus
    Suppress,
    /// Standard-Auslieferung laeuft weiter (ggf. zusaetzlich zur Ersatzquelle)
    Augment,
}

impl RoutingDecision {
    pub fn ist_unterdrueckt(&self) -> bool {
        matches!(self, Self::Suppress)
    }
}

/// Laufzeit-Optionen, bei Konfig-Reload austauschbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingOptionen {
    /// Icon-Sichtbarkeit der Ersatzquellen
    pub icon_anzeigen: bool,
    /// Unterdrueckt auch beim statischen Anker die Standard-Auslieferung
    pub statisch_unterdruecken: bool,
    /// Reload verteilt `icon_anzeigen` auch an Entity-Quellen
    pub entity_icons_aktualisieren: bool,
}

impl Default for RoutingOptionen {
    fn default() -> Self {
        Self {
            icon_anzeigen: true,
            statisch_unterdruecken: false,
            entity_icons_aktualisieren: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SpectatorRouter {
    inner: Arc<RouterInner>,
}

struct RouterInner {
    registry: Arc<QuellenRegistry>,
    drossel: Arc<PositionsDrossel>,
    lebenszyklus: LebenszyklusManager,
    aktivierung: SelbstAktivierung,
    optionen: RwLock<RoutingOptionen>,
    beobachter: Arc<dyn RoutingBeobachter>,
    codec: CodecInfo,
}

/// Gewaehlte Ersatzquelle fuer ein Ereignis
struct Ziel {
    quelle: Arc<dyn Substitute>,
    entscheidung: RoutingDecision,
}

impl SpectatorRouter {
    /// Erstellt einen Router ohne Beobachter
    pub fn neu(optionen: RoutingOptionen, bruecke: Option<Arc<dyn ActivationBridge>>) -> Self {
        Self::mit_beobachter(optionen, bruecke, Arc::new(KeinBeobachter))
    }

    pub fn mit_beobachter(
        optionen: RoutingOptionen,
        bruecke: Option<Arc<dyn ActivationBridge>>,
        beobachter: Arc<dyn RoutingBeobachter>,
    ) -> Self {
        let registry = Arc::new(QuellenRegistry::neu());
        let drossel = Arc::new(PositionsDrossel::neu());
        let lebenszyklus = LebenszyklusManager::neu(
            Arc::clone(&registry),
            Arc::clone(&drossel),
            Arc::clone(&beobachter),
        );

        Self {
            inner: Arc::new(RouterInner {
                registry,
                drossel,
                lebenszyklus,
                aktivierung: SelbstAktivierung::neu(bruecke),
                optionen: RwLock::new(optionen),
                beobachter,
                codec: CodecInfo::default(),
            }),
        }
    }

    /// Verarbeitet ein Audio-Paket aus einer Quelle
    pub fn audio_paket_verarbeiten(&self, ereignis: &AudioEreignis) -> RoutingDecision {
        let EreignisQuelle::Spieler(spieler) = &ereignis.quelle else {
            return RoutingDecision::Augment;
        };
        let Some(ziel) = self.ziel_quelle(spieler) else {
            return RoutingDecision::Augment;
        };

        let quelle = &ziel.quelle;
        let paket = ereignis.paket.fuer_quelle(quelle.id(), ereignis.distanz);
        let erreicht = quelle.audio_paket_senden(&paket, ereignis.distanz);
        self.inner
            .beobachter
            .paket_umgeleitet(quelle.art(), PaketArt::Audio);

        tracing::trace!(
            listener = %spieler.listener.id(),
            quelle = %quelle.id(),
            sequenz = paket.sequenz,
            erreicht,
            "Audio-Paket umgeleitet"
        );

        if erreicht && quelle.art() == SubstituteKind::Entity {
            if let Some(aktivierung) = ereignis.aktivierung {
                self.inner.aktivierung.audio_info_senden(
                    spieler.listener.as_ref(),
                    quelle.as_ref(),
                    aktivierung,
                    &paket,
                );
            }
        }

        ziel.entscheidung
    }

    /// Verarbeitet ein Steuerpaket (Quellen-Info, Audio-Ende) aus einer Quelle
    pub fn steuer_paket_verarbeiten(&self, ereignis: &SteuerEreignis) -> RoutingDecision {
        let EreignisQuelle::Spieler(spieler) = &ereignis.quelle else {
            return RoutingDecision::Augment;
        };
        let Some(ziel) = self.ziel_quelle(spieler) else {
            return RoutingDecision::Augment;
        };

        let quelle = &ziel.quelle;
        let ist_entity = quelle.art() == SubstituteKind::Entity;
        tracing::trace!(
            listener = %spieler.listener.id(),
            quelle = %quelle.id(),
            paket = ereignis.paket.name(),
            "Steuerpaket ueber Ersatzquelle"
        );

        match &ereignis.paket {
            SourcePacket::Info(info_paket) => {
                // Statische Quellen treiben keine eigene Anzeige
                if ist_entity {
                    self.inner.aktivierung.eigene_quellen_info_aktualisieren(
                        spieler.listener.as_ref(),
                        quelle.as_ref(),
                        &info_paket.info,
                    );
                }
            }
            SourcePacket::AudioEnde(ende) => {
                let umgeleitet = SourcePacket::AudioEnde(SourceAudioEndPacket {
                    quelle: quelle.id(),
                    sequenz: ende.sequenz,
                });
                quelle.paket_senden(&umgeleitet, ereignis.distanz);
                // Der Client folgt der Entity und sieht sonst kein Ende
                if ist_entity {
                    spieler.listener.paket_senden(&umgeleitet);
                }
                self.inner
                    .beobachter
                    .paket_umgeleitet(quelle.art(), PaketArt::Steuerung);

                tracing::trace!(
                    listener = %spieler.listener.id(),
                    quelle = %quelle.id(),
                    sequenz = ende.sequenz,
                    "Audio-Ende umgeleitet"
                );
            }
        }

        ziel.entscheidung
    }

    /// Ein Client hat die Verbindung getrennt
    pub fn client_getrennt(&self, listener: &ListenerId) {
        self.inner.lebenszyklus.bereinigen(listener);
    }

    /// Uebernimmt neue Optionen (Konfig-Reload) und verteilt die
    /// Icon-Sichtbarkeit an bestehende Quellen
    pub fn optionen_anwenden(&self, optionen: RoutingOptionen) {
        *self.inner.optionen.write() = optionen;
        let aktualisiert = self
            .inner
            .registry
            .icon_sichtbarkeit_verteilen(optionen.icon_anzeigen, optionen.entity_icons_aktualisieren);

        tracing::info!(
            icon_anzeigen = optionen.icon_anzeigen,
            statisch_unterdruecken = optionen.statisch_unterdruecken,
            quellen = aktualisiert,
            "Routing-Optionen angewendet"
        );
    }

    pub fn optionen(&self) -> RoutingOptionen {
        *self.inner.optionen.read()
    }

    pub fn registry(&self) -> &QuellenRegistry {
        &self.inner.registry
    }

    pub fn drossel(&self) -> &PositionsDrossel {
        &self.inner.drossel
    }

    // -----------------------------------------------------------------------
    // Interne Hilfsfunktionen
    // -----------------------------------------------------------------------

    /// Waehlt (oder erstellt) die Ersatzquelle fuer ein Spieler-Ereignis
    ///
    /// `None` wenn der Spieler nicht zuschaut; sein Zustand ist dann bereinigt.
    fn ziel_quelle(&self, spieler: &SpielerQuelle) -> Option<Ziel> {
        let listener = spieler.listener.as_ref();
        let listener_id = listener.id();

        if !listener.ist_zuschauer() {
            self.inner.lebenszyklus.bereinigen(&listener_id);
            return None;
        }

        let optionen = self.optionen();
        let anker = match listener.zuschau_ziel() {
            Some(entity) => Anker::Entity(entity),
            None => Anker::Position(anker_position(listener)),
        };

        let zugriff = self.inner.registry.hole_oder_erstelle(&QuellenAnfrage {
            listener,
            line: &spieler.line,
            anker,
            stereo: spieler.stereo,
            codec: self.inner.codec,
            icon_sichtbar: optionen.icon_anzeigen,
        });
        if zugriff.erstellt {
            self.inner.beobachter.quelle_erstellt(anker.art());
        }

        let entscheidung = match anker {
            Anker::Entity(_) => RoutingDecision::Suppress,
            Anker::Position(position) => {
                if self
                    .inner
                    .drossel
                    .vielleicht_aktualisieren(listener_id, zugriff.quelle.as_ref(), position)
                {
                    self.inner.beobachter.position_aktualisiert();
                }
                if optionen.statisch_unterdruecken {
                    RoutingDecision::Suppress
                } else {
                    RoutingDecision::Augment
                }
            }
        };

        Some(Ziel {
            quelle: zugriff.quelle,
            entscheidung,
        })
    }
}

impl Default for SpectatorRouter {
    fn default() -> Self {
        Self::neu(RoutingOptionen::default(), None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
