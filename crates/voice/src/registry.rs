//! Quellen-Registry – Ersatzquellen pro (Listener, Line)
//!
//! Pro [`ChannelKey`] existiert hoechstens eine statische und eine
//! Entity-Quelle. Erstellung ist atomar pro Schluessel: bei gleichzeitigem
//! Erstzugriff gewinnt genau ein Aufrufer, alle anderen erhalten dessen
//! Instanz.
//!
//! ## Design-Entscheidungen
//! - Eine DashMap pro Quellen-Art; die Entry-API haelt den Shard-Lock
//!   waehrend der Erstellung, dadurch single-shot
//! - Stereo und Name werden ohne Synchronisation gesetzt (last write wins)
//! - Entfernen ruft den Host ausserhalb jedes Locks auf
//! - Ein Listener-Index macht das Entfernen unabhaengig von der Tabellengroesse;
//!   es laeuft fuer nicht zuschauende Listener bei jedem Paket

use dashmap::DashMap;
use spectator_core::types::{ChannelKey, EntityId, ListenerId, Position, SourceId, SubstituteKind};
use spectator_protocol::codec::CodecInfo;
use std::sync::Arc;

use crate::filter::EmpfaengerFilter;
use crate::host::{Listener, SourceLine, Substitute};

// ---------------------------------------------------------------------------
// Anfrage
// ---------------------------------------------------------------------------

/// Woran eine neue Ersatzquelle gebunden wird
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anker {
    Position(Position),
    Entity(EntityId),
}

impl Anker {
    pub fn art(&self) -> SubstituteKind {
        match self {
            Self::Position(_) => SubstituteKind::Statisch,
            Self::Entity(_) => SubstituteKind::Entity,
        }
    }
}

/// Alles was zum Erstellen oder Auffrischen einer Ersatzquelle noetig ist
pub struct QuellenAnfrage<'a> {
    pub listener: &'a dyn Listener,
    pub line: &'a Arc<dyn SourceLine>,
    pub anker: Anker,
    pub stereo: bool,
    pub codec: CodecInfo,
    /// Icon-Sichtbarkeit fuer neu erstellte Quellen
    pub icon_sichtbar: bool,
}

/// Ergebnis eines Registry-Zugriffs
pub struct QuellenZugriff {
    pub quelle: Arc<dyn Substitute>,
    /// `true` wenn die Quelle bei diesem Zugriff erstellt wurde
    pub erstellt: bool,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

struct Eintrag {
    quelle: Arc<dyn Substitute>,
    /// Line die die Quelle erstellt hat (fuer das Entfernen)
    line: Arc<dyn SourceLine>,
}

/// Entfernte Quelle (fuer Logs und Statistik)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntfernteQuelle {
    pub schluessel: ChannelKey,
    pub art: SubstituteKind,
    pub quelle: SourceId,
}

/// Thread-sichere Registry aller Ersatzquellen
#[derive(Default)]
pub struct QuellenRegistry {
    statisch: DashMap<ChannelKey, Eintrag>,
    entity: DashMap<ChannelKey, Eintrag>,
    /// Listener -> erstellte Schluessel, damit Entfernen nicht alle
    /// Tabellen durchsuchen muss
    index: DashMap<ListenerId, Vec<(SubstituteKind, ChannelKey)>>,
}

impl QuellenRegistry {
    /// Erstellt eine neue leere Registry
    pub fn neu() -> Self {
        Self::default()
    }

    fn tabelle(&self, art: SubstituteKind) -> &DashMap<ChannelKey, Eintrag> {
        match art {
            SubstituteKind::Statisch => &self.statisch,
            SubstituteKind::Entity => &self.entity,
        }
    }

    /// Gibt die Ersatzquelle fuer (Listener, Line) zurueck oder erstellt sie
    ///
    /// Erstellung: ueber die Line, mit Icon-Sichtbarkeit und Filter.
    /// Bestehende Quellen bekommen nur Stereo-Flag und Name aufgefrischt;
    /// der Anker einer bestehenden Quelle wird hier nicht veraendert.
    pub fn hole_oder_erstelle(&self, anfrage: &QuellenAnfrage<'_>) -> QuellenZugriff {
        let art = anfrage.anker.art();
        let schluessel = ChannelKey::neu(anfrage.listener.id(), anfrage.line.id());
        let mut erstellt = false;

        let quelle = {
            // Lock-Reihenfolge: Tabelle -> Index (entfernen() haelt nie beide)
            let eintrag = self.tabelle(art).entry(schluessel).or_insert_with(|| {
                erstellt = true;
                self.index
                    .entry(schluessel.listener)
                    .or_default()
                    .push((art, schluessel));
                Eintrag {
                    quelle: Self::erstellen(anfrage),
                    line: Arc::clone(anfrage.line),
                }
            });
            Arc::clone(&eintrag.quelle)
        };

        if erstellt {
            tracing::info!(
                listener = %schluessel.listener,
                line = %schluessel.line,
                quelle = %quelle.id(),
                art = %art,
                "Ersatzquelle erstellt"
            );
        }

        quelle.stereo_setzen(anfrage.stereo);
        quelle.name_setzen(&anfrage.listener.name());

        QuellenZugriff { quelle, erstellt }
    }

    fn erstellen(anfrage: &QuellenAnfrage<'_>) -> Arc<dyn Substitute> {
        let filter = EmpfaengerFilter::fuer(anfrage.anker.art(), anfrage.listener.id());
        let quelle = match anfrage.anker {
            Anker::Position(position) => anfrage.line.statische_quelle_erstellen(
                position,
                anfrage.stereo,
                anfrage.codec,
                filter,
            ),
            Anker::Entity(entity) => anfrage.line.entity_quelle_erstellen(
                entity,
                anfrage.stereo,
                anfrage.codec,
                filter,
            ),
        };
        quelle.icon_sichtbar_setzen(anfrage.icon_sichtbar);
        quelle
    }

    /// Entfernt alle Ersatzquellen eines Listeners auf allen Lines
    ///
    /// Jede Quelle wird genau einmal ueber ihre Line abgebaut; wiederholte
    /// Aufrufe sind No-ops.
    pub fn entfernen(&self, listener: &ListenerId) -> Vec<EntfernteQuelle> {
        let Some((_, schluessel)) = self.index.remove(listener) else {
            return Vec::new();
        };

        let mut entfernt = Vec::with_capacity(schluessel.len());
        for (art, schluessel) in schluessel {
            // remove() liefert den Eintrag nur einem Aufrufer
            let Some((_, eintrag)) = self.tabelle(art).remove(&schluessel) else {
                continue;
            };
            let quelle = eintrag.quelle.id();
            eintrag.line.quelle_entfernen(quelle);
            tracing::debug!(
                listener = %listener,
                line = %schluessel.line,
                quelle = %quelle,
                art = %art,
                "Ersatzquelle entfernt"
            );
            entfernt.push(EntfernteQuelle {
                schluessel,
                art,
                quelle,
            });
        }

        entfernt
    }

    /// Setzt die Icon-Sichtbarkeit auf allen statischen Quellen und
    /// optional auch auf allen Entity-Quellen
    ///
    /// Gibt die Anzahl der aktualisierten Quellen zurueck.
    pub fn icon_sichtbarkeit_verteilen(&self, sichtbar: bool, auch_entity: bool) -> usize {
        let mut anzahl = 0usize;
        let mut setzen = |tabelle: &DashMap<ChannelKey, Eintrag>| {
            tabelle.iter().for_each(|e| {
                e.quelle.icon_sichtbar_setzen(sichtbar);
                anzahl += 1;
            });
        };

        setzen(&self.statisch);
        if auch_entity {
            setzen(&self.entity);
        }
        anzahl
    }

    /// Gibt die Ersatzquelle einer Art fuer einen Schluessel zurueck
    pub fn quelle(&self, art: SubstituteKind, schluessel: &ChannelKey) -> Option<Arc<dyn Substitute>> {
        self.tabelle(art)
            .get(schluessel)
            .map(|e| Arc::clone(&e.quelle))
    }

    /// Anzahl der Ersatzquellen einer Art
    pub fn anzahl(&self, art: SubstituteKind) -> usize {
        self.tabelle(art).len()
    }

    /// Anzahl aller Ersatzquellen eines Listeners
    pub fn anzahl_von(&self, listener: &ListenerId) -> usize {
        self.index.get(listener).map(|e| e.len()).unwrap_or(0)
    }

    pub fn ist_leer(&self) -> bool {
        self.statisch.is_empty() && self.entity.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimLine, SimListener, SimWelt};
    use std::sync::Barrier;
    use std::thread;

    fn anfrage<'a>(
        listener: &'a SimListener,
        line: &'a Arc<dyn SourceLine>,
        anker: Anker,
        stereo: bool,
    ) -> QuellenAnfrage<'a> {
        QuellenAnfrage {
            listener,
            line,
            anker,
            stereo,
            codec: CodecInfo::default(),
            icon_sichtbar: true,
        }
    }

    #[test]
    fn erstellung_ist_idempotent() {
        let welt = SimWelt::neu();
        let line: Arc<dyn SourceLine> = SimLine::neu(&welt);
        let listener = welt.listener_hinzufuegen("Zuschauer");
        let registry = QuellenRegistry::neu();

        let erster = registry.hole_oder_erstelle(&anfrage(&listener, &line, Anker::Position(Position::default()), false));
        let zweiter = registry.hole_oder_erstelle(&anfrage(&listener, &line, Anker::Position(Position::neu(5.0, 5.0, 5.0)), true));

        assert!(erster.erstellt);
        assert!(!zweiter.erstellt);
        assert_eq!(erster.quelle.id(), zweiter.quelle.id());
        assert_eq!(registry.anzahl(SubstituteKind::Statisch), 1);

        // Nur Stereo wurde aufgefrischt, die Position nicht
        let sim = welt.quelle(erster.quelle.id()).expect("Quelle existiert");
        assert!(sim.stereo());
        assert_eq!(sim.position(), Some(Position::default()));
        assert_eq!(sim.name(), "Zuschauer");
    }

    #[test]
    fn statisch_und_entity_sind_unabhaengig() {
        let welt = SimWelt::neu();
        let line: Arc<dyn SourceLine> = SimLine::neu(&welt);
        let listener = welt.listener_hinzufuegen("Zuschauer");
        let registry = QuellenRegistry::neu();

        let statisch = registry.hole_oder_erstelle(&anfrage(&listener, &line, Anker::Position(Position::default()), false));
        let entity = registry.hole_oder_erstelle(&anfrage(&listener, &line, Anker::Entity(EntityId::new()), false));

        assert_ne!(statisch.quelle.id(), entity.quelle.id());
        assert_eq!(statisch.quelle.art(), SubstituteKind::Statisch);
        assert_eq!(entity.quelle.art(), SubstituteKind::Entity);
        assert_eq!(registry.anzahl_von(&listener.id()), 2);
    }

    #[test]
    fn filter_und_icon_bei_erstellung() {
        let welt = SimWelt::neu();
        let line: Arc<dyn SourceLine> = SimLine::neu(&welt);
        let listener = welt.listener_hinzufuegen("Zuschauer");
        let registry = QuellenRegistry::neu();

        let mut a = anfrage(&listener, &line, Anker::Entity(EntityId::new()), false);
        a.icon_sichtbar = false;
        let zugriff = registry.hole_oder_erstelle(&a);

        let sim = welt.quelle(zugriff.quelle.id()).expect("Quelle existiert");
        assert!(!sim.icon_sichtbar());
        assert_eq!(
            sim.filter(),
            EmpfaengerFilter::OhneSelbst {
                sprecher: listener.id()
            }
        );
    }

    #[test]
    fn entfernen_baut_alle_lines_ab_und_ist_idempotent() {
        let welt = SimWelt::neu();
        let line_a: Arc<dyn SourceLine> = SimLine::neu(&welt);
        let line_b: Arc<dyn SourceLine> = SimLine::neu(&welt);
        let listener = welt.listener_hinzufuegen("Zuschauer");
        let anderer = welt.listener_hinzufuegen("Anderer");
        let registry = QuellenRegistry::neu();

        registry.hole_oder_erstelle(&anfrage(&listener, &line_a, Anker::Position(Position::default()), false));
        registry.hole_oder_erstelle(&anfrage(&listener, &line_b, Anker::Entity(EntityId::new()), false));
        registry.hole_oder_erstelle(&anfrage(&anderer, &line_a, Anker::Position(Position::default()), false));

        let entfernt = registry.entfernen(&listener.id());
        assert_eq!(entfernt.len(), 2);
        assert_eq!(registry.anzahl_von(&listener.id()), 0);
        assert_eq!(registry.anzahl_von(&anderer.id()), 1);
        assert_eq!(welt.entfernte_quellen().len(), 2);

        assert!(registry.entfernen(&listener.id()).is_empty());
        assert_eq!(welt.entfernte_quellen().len(), 2, "Kein zweiter Abbau");
    }

    #[test]
    fn icon_verteilung_respektiert_entity_schalter() {
        let welt = SimWelt::neu();
        let line: Arc<dyn SourceLine> = SimLine::neu(&welt);
        let listener = welt.listener_hinzufuegen("Zuschauer");
        let registry = QuellenRegistry::neu();

        let statisch = registry.hole_oder_erstelle(&anfrage(&listener, &line, Anker::Position(Position::default()), false));
        let entity = registry.hole_oder_erstelle(&anfrage(&listener, &line, Anker::Entity(EntityId::new()), false));

        assert_eq!(registry.icon_sichtbarkeit_verteilen(false, false), 1);
        assert!(!welt.quelle(statisch.quelle.id()).unwrap().icon_sichtbar());
        assert!(welt.quelle(entity.quelle.id()).unwrap().icon_sichtbar());

        assert_eq!(registry.icon_sichtbarkeit_verteilen(false, true), 2);
        assert!(!welt.quelle(entity.quelle.id()).unwrap().icon_sichtbar());
    }

    #[test]
    fn gleichzeitiger_erstzugriff_erstellt_genau_eine_quelle() {
        const THREADS: usize = 16;

        let welt = SimWelt::neu();
        let sim_line = SimLine::neu(&welt);
        let line: Arc<dyn SourceLine> = sim_line.clone();
        let listener = welt.listener_hinzufuegen("Zuschauer");
        let registry = Arc::new(QuellenRegistry::neu());
        let barriere = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barriere = Arc::clone(&barriere);
                let line = Arc::clone(&line);
                let listener = Arc::clone(&listener);
                thread::spawn(move || {
                    barriere.wait();
                    let zugriff = registry.hole_oder_erstelle(&anfrage(
                        &listener,
                        &line,
                        Anker::Position(Position::default()),
                        false,
                    ));
                    (zugriff.quelle.id(), zugriff.erstellt)
                })
            })
            .collect();

        let ergebnisse: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("Thread darf nicht paniken"))
            .collect();

        let erste_id = ergebnisse[0].0;
        assert!(ergebnisse.iter().all(|(id, _)| *id == erste_id));
        assert_eq!(ergebnisse.iter().filter(|(_, erstellt)| *erstellt).count(), 1);
        assert_eq!(sim_line.erstellte_quellen(), 1);
    }
}
