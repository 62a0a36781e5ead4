//! Metrik-Beobachter – verbindet die Routing-Engine mit Prometheus

use spectator_core::types::{ListenerId, SubstituteKind};
use spectator_observability::SpectatorMetrics;
use spectator_voice::observer::PaketArt;
use spectator_voice::RoutingBeobachter;

pub struct MetrikBeobachter {
    metriken: SpectatorMetrics,
}

impl MetrikBeobachter {
    pub fn neu(metriken: SpectatorMetrics) -> Self {
        Self { metriken }
    }
}

impl RoutingBeobachter for MetrikBeobachter {
    fn quelle_erstellt(&self, art: SubstituteKind) {
        self.metriken
            .substitutes_created_total
            .with_label_values(&[art.als_str()])
            .inc();
        self.metriken
            .substitutes_active
            .with_label_values(&[art.als_str()])
            .inc();
    }

    fn quelle_entfernt(&self, art: SubstituteKind) {
        self.metriken
            .substitutes_removed_total
            .with_label_values(&[art.als_str()])
            .inc();
        self.metriken
            .substitutes_active
            .with_label_values(&[art.als_str()])
            .dec();
    }

    fn paket_umgeleitet(&self, art: SubstituteKind, paket: PaketArt) {
        self.metriken
            .packets_rerouted_total
            .with_label_values(&[art.als_str(), paket.als_str()])
            .inc();
    }

    fn position_aktualisiert(&self) {
        self.metriken.position_updates_total.inc();
    }

    fn listener_bereinigt(&self, _listener: ListenerId) {
        self.metriken.listeners_purged_total.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aktive_quellen_folgen_erstellen_und_entfernen() {
        let metriken = SpectatorMetrics::neu().unwrap();
        let beobachter = MetrikBeobachter::neu(metriken.clone());

        beobachter.quelle_erstellt(SubstituteKind::Entity);
        beobachter.quelle_erstellt(SubstituteKind::Entity);
        beobachter.quelle_entfernt(SubstituteKind::Entity);

        let aktiv = metriken.substitutes_active.with_label_values(&["entity"]).get();
        let erstellt = metriken
            .substitutes_created_total
            .with_label_values(&["entity"])
            .get();
        assert_eq!(aktiv, 1);
        assert_eq!(erstellt, 2);
    }

    #[test]
    fn pakete_nach_art_gezaehlt() {
        let metriken = SpectatorMetrics::neu().unwrap();
        let beobachter = MetrikBeobachter::neu(metriken.clone());

        beobachter.paket_umgeleitet(SubstituteKind::Statisch, PaketArt::Audio);
        beobachter.paket_umgeleitet(SubstituteKind::Statisch, PaketArt::Steuerung);

        let audio = metriken
            .packets_rerouted_total
            .with_label_values(&["static", "audio"])
            .get();
        assert_eq!(audio, 1);
    }
}
