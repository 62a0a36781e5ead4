//! Positions-Drossel – begrenzt Positions-Updates statischer Ersatzquellen
//!
//! Pro Listener wird hoechstens alle [`POSITIONS_INTERVALL`] eine neue
//! Anker-Position uebernommen, unabhaengig von der Paketrate.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use spectator_core::types::{ListenerId, Position};
use std::time::{Duration, Instant};

use crate::host::{Listener, Substitute};

/// Mindestabstand zwischen zwei Positions-Updates pro Listener
pub const POSITIONS_INTERVALL: Duration = Duration::from_millis(100);

/// Zusaetzlicher Abstand ueber der Hitbox
pub const ANKER_ABSTAND: f64 = 0.5;

/// Anker-Position einer statischen Quelle: ueber dem Kopf des Zuschauers
pub fn anker_position(listener: &dyn Listener) -> Position {
    listener
        .position()
        .nach_oben(listener.hitbox_hoehe() + ANKER_ABSTAND)
}

/// Zeitstempel des letzten uebernommenen Updates pro Listener
pub struct PositionsDrossel {
    letzte_updates: DashMap<ListenerId, Instant>,
    intervall: Duration,
}

impl PositionsDrossel {
    /// Erstellt eine Drossel mit dem Standard-Intervall
    pub fn neu() -> Self {
        Self::mit_intervall(POSITIONS_INTERVALL)
    }

    pub fn mit_intervall(intervall: Duration) -> Self {
        Self {
            letzte_updates: DashMap::new(),
            intervall,
        }
    }

    /// Setzt `kandidat` als Position von `quelle`, falls faellig
    ///
    /// Gibt zurueck ob die Position uebernommen wurde.
    pub fn vielleicht_aktualisieren(
        &self,
        listener: ListenerId,
        quelle: &dyn Substitute,
        kandidat: Position,
    ) -> bool {
        self.vielleicht_aktualisieren_um(listener, quelle, kandidat, Instant::now())
    }

    /// Wie [`Self::vielleicht_aktualisieren`], mit explizitem Zeitpunkt
    pub fn vielleicht_aktualisieren_um(
        &self,
        listener: ListenerId,
        quelle: &dyn Substitute,
        kandidat: Position,
        jetzt: Instant,
    ) -> bool {
        // Entscheidung unter dem Shard-Lock, Host-Aufruf danach
        let faellig = match self.letzte_updates.entry(listener) {
            Entry::Occupied(mut eintrag) => {
                if jetzt.saturating_duration_since(*eintrag.get()) < self.intervall {
                    false
                } else {
                    eintrag.insert(jetzt);
                    true
                }
            }
            Entry::Vacant(eintrag) => {
                eintrag.insert(jetzt);
                true
            }
        };

        if faellig {
            quelle.position_setzen(kandidat);
            tracing::trace!(
                listener = %listener,
                quelle = %quelle.id(),
                x = kandidat.x,
                y = kandidat.y,
                z = kandidat.z,
                "Anker-Position aktualisiert"
            );
        }
        faellig
    }

    /// Entfernt den Eintrag eines Listeners
    pub fn entfernen(&self, listener: &ListenerId) -> bool {
        self.letzte_updates.remove(listener).is_some()
    }

    /// Prueft ob fuer den Listener ein Eintrag existiert
    pub fn hat_eintrag(&self, listener: &ListenerId) -> bool {
        self.letzte_updates.contains_key(listener)
    }

    pub fn anzahl(&self) -> usize {
        self.letzte_updates.len()
    }
}

impl Default for PositionsDrossel {
    fn default() -> Self {
        Self::neu()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimListener, SimQuelle};
    use spectator_core::types::SubstituteKind;

    #[test]
    fn erstes_update_wird_immer_uebernommen() {
        let drossel = PositionsDrossel::neu();
        let quelle = SimQuelle::statisch(Position::default());
        let listener = ListenerId::new();

        assert!(drossel.vielleicht_aktualisieren(listener, quelle.as_ref(), Position::neu(1.0, 2.0, 3.0)));
        assert_eq!(quelle.position(), Some(Position::neu(1.0, 2.0, 3.0)));
        assert!(drossel.hat_eintrag(&listener));
    }

    #[test]
    fn updates_innerhalb_des_intervalls_werden_verworfen() {
        let drossel = PositionsDrossel::neu();
        let quelle = SimQuelle::statisch(Position::default());
        let listener = ListenerId::new();
        let start = Instant::now();

        let mut uebernommen = 0;
        for i in 0..50u64 {
            let jetzt = start + Duration::from_millis(i);
            let kandidat = Position::neu(i as f64, 0.0, 0.0);
            if drossel.vielleicht_aktualisieren_um(listener, quelle.as_ref(), kandidat, jetzt) {
                uebernommen += 1;
            }
        }

        assert_eq!(uebernommen, 1, "50 Pakete in 50ms -> genau ein Update");
        assert_eq!(quelle.position(), Some(Position::neu(0.0, 0.0, 0.0)));
        assert_eq!(quelle.positions_updates(), 1);
    }

    #[test]
    fn update_nach_ablauf_des_intervalls() {
        let drossel = PositionsDrossel::neu();
        let quelle = SimQuelle::statisch(Position::default());
        let listener = ListenerId::new();
        let start = Instant::now();

        assert!(drossel.vielleicht_aktualisieren_um(listener, quelle.as_ref(), Position::neu(1.0, 0.0, 0.0), start));
        assert!(!drossel.vielleicht_aktualisieren_um(
            listener,
            quelle.as_ref(),
            Position::neu(2.0, 0.0, 0.0),
            start + Duration::from_millis(99)
        ));
        assert!(drossel.vielleicht_aktualisieren_um(
            listener,
            quelle.as_ref(),
            Position::neu(3.0, 0.0, 0.0),
            start + Duration::from_millis(100)
        ));
        assert_eq!(quelle.position(), Some(Position::neu(3.0, 0.0, 0.0)));
    }

    #[test]
    fn listener_werden_unabhaengig_gedrosselt() {
        let drossel = PositionsDrossel::neu();
        let quelle_a = SimQuelle::statisch(Position::default());
        let quelle_b = SimQuelle::statisch(Position::default());
        let jetzt = Instant::now();

        assert!(drossel.vielleicht_aktualisieren_um(ListenerId::new(), quelle_a.as_ref(), Position::default(), jetzt));
        assert!(drossel.vielleicht_aktualisieren_um(ListenerId::new(), quelle_b.as_ref(), Position::default(), jetzt));
        assert_eq!(drossel.anzahl(), 2);
    }

    #[test]
    fn entfernen_ist_idempotent() {
        let drossel = PositionsDrossel::neu();
        let quelle = SimQuelle::statisch(Position::default());
        let listener = ListenerId::new();
        drossel.vielleicht_aktualisieren(listener, quelle.as_ref(), Position::default());

        assert!(drossel.entfernen(&listener));
        assert!(!drossel.entfernen(&listener));
        assert!(!drossel.hat_eintrag(&listener));
    }

    #[test]
    fn anker_liegt_ueber_der_hitbox() {
        let listener = SimListener::neu("Zuschauer");
        listener.position_setzen(Position::neu(10.0, 64.0, -5.0));
        listener.hitbox_setzen(1.8);

        let anker = anker_position(listener.as_ref());
        assert_eq!(anker.x, 10.0);
        assert!((anker.y - 66.3).abs() < 1e-9);
        assert_eq!(anker.z, -5.0);
        assert_eq!(SimQuelle::statisch(anker).art(), SubstituteKind::Statisch);
    }
}
