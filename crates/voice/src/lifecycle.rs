//! Lebenszyklus – Bereinigung eines Listeners
//!
//! Wird bei Disconnect und bei jedem Paket eines Listeners aufgerufen, der
//! nicht mehr zuschaut. Entfernt beide Quellen-Arten auf allen Lines und
//! den Drossel-Eintrag. Ohne vorhandenen Zustand ist der Aufruf ein No-op.

use spectator_core::types::ListenerId;
use std::sync::Arc;

use crate::observer::RoutingBeobachter;
use crate::registry::{EntfernteQuelle, QuellenRegistry};
use crate::throttle::PositionsDrossel;

#[derive(Clone)]
pub struct LebenszyklusManager {
    registry: Arc<QuellenRegistry>,
    drossel: Arc<PositionsDrossel>,
    beobachter: Arc<dyn RoutingBeobachter>,
}

impl LebenszyklusManager {
    pub fn neu(
        registry: Arc<QuellenRegistry>,
        drossel: Arc<PositionsDrossel>,
        beobachter: Arc<dyn RoutingBeobachter>,
    ) -> Self {
        Self {
            registry,
            drossel,
            beobachter,
        }
    }

    /// Entfernt alle Ersatzquellen und den Drossel-Eintrag eines Listeners
    ///
    /// Gibt die entfernten Quellen zurueck (leer wenn nichts zu tun war).
    pub fn bereinigen(&self, listener: &ListenerId) -> Vec<EntfernteQuelle> {
        let drossel_entfernt = self.drossel.entfernen(listener);
        let entfernt = self.registry.entfernen(listener);

        for quelle in &entfernt {
            self.beobachter.quelle_entfernt(quelle.art);
        }

        if drossel_entfernt || !entfernt.is_empty() {
            self.beobachter.listener_bereinigt(*listener);
            tracing::info!(
                listener = %listener,
                quellen = entfernt.len(),
                "Zuschauer-Zustand bereinigt"
            );
        }

        entfernt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Listener, SourceLine};
    use crate::observer::KeinBeobachter;
    use crate::registry::{Anker, QuellenAnfrage};
    use crate::sim::{SimLine, SimWelt};
    use spectator_core::types::{EntityId, Position};
    use spectator_protocol::codec::CodecInfo;

    #[test]
    fn bereinigen_entfernt_alles_genau_einmal() {
        let welt = SimWelt::neu();
        let line: Arc<dyn SourceLine> = SimLine::neu(&welt);
        let listener = welt.listener_hinzufuegen("Zuschauer");

        let registry = Arc::new(QuellenRegistry::neu());
        let drossel = Arc::new(PositionsDrossel::neu());
        let manager = LebenszyklusManager::neu(
            Arc::clone(&registry),
            Arc::clone(&drossel),
            Arc::new(KeinBeobachter),
        );

        for anker in [Anker::Position(Position::default()), Anker::Entity(EntityId::new())] {
            let zugriff = registry.hole_oder_erstelle(&QuellenAnfrage {
                listener: listener.as_ref(),
                line: &line,
                anker,
                stereo: false,
                codec: CodecInfo::default(),
                icon_sichtbar: true,
            });
            drossel.vielleicht_aktualisieren(listener.id(), zugriff.quelle.as_ref(), Position::default());
        }

        let id = listener.id();
        assert_eq!(manager.bereinigen(&id).len(), 2);
        assert_eq!(registry.anzahl_von(&id), 0);
        assert!(!drossel.hat_eintrag(&id));

        assert!(manager.bereinigen(&id).is_empty(), "Zweiter Aufruf ist No-op");
        assert_eq!(welt.entfernte_quellen().len(), 2);
    }
}
