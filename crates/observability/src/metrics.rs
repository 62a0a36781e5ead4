//! Prometheus-kompatible Metriken fuer das Spectator-Addon
//!
//! Registrierte Metriken:
//! - `spectator_substitutes_created_total` – Counter (kind): Erstellte Ersatzquellen
//! - `spectator_substitutes_removed_total` – Counter (kind): Entfernte Ersatzquellen
//! - `spectator_substitutes_active` – Gauge (kind): Aktuell lebende Ersatzquellen
//! - `spectator_packets_rerouted_total` – Counter (kind, packet): Umgeleitete Pakete
//! - `spectator_position_updates_total` – Counter: Uebernommene Anker-Positionen
//! - `spectator_listeners_purged_total` – Counter: Bereinigte Listener

use anyhow::Result;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Alle Spectator-Prometheus-Metriken
#[derive(Clone)]
pub struct SpectatorMetrics {
    pub registry: Arc<Registry>,

    // Ersatzquellen
    pub substitutes_created_total: IntCounterVec,
    pub substitutes_removed_total: IntCounterVec,
    pub substitutes_active: IntGaugeVec,

    // Routing
    pub packets_rerouted_total: IntCounterVec,
    pub position_updates_total: IntCounter,
    pub listeners_purged_total: IntCounter,
}

impl SpectatorMetrics {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        // --- Ersatzquellen ---
        let substitutes_created_total = IntCounterVec::new(
            Opts::new(
                "spectator_substitutes_created_total",
                "Gesamtanzahl erstellter Ersatzquellen",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(substitutes_created_total.clone()))?;

        let substitutes_removed_total = IntCounterVec::new(
            Opts::new(
                "spectator_substitutes_removed_total",
                "Gesamtanzahl entfernter Ersatzquellen",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(substitutes_removed_total.clone()))?;

        let substitutes_active = IntGaugeVec::new(
            Opts::new(
                "spectator_substitutes_active",
                "Anzahl aktuell lebender Ersatzquellen",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(substitutes_active.clone()))?;

        // --- Routing ---
        let packets_rerouted_total = IntCounterVec::new(
            Opts::new(
                "spectator_packets_rerouted_total",
                "Gesamtanzahl ueber Ersatzquellen ausgelieferter Pakete",
            ),
            &["kind", "packet"],
        )?;
        registry.register(Box::new(packets_rerouted_total.clone()))?;

        let position_updates_total = IntCounter::with_opts(Opts::new(
            "spectator_position_updates_total",
            "Uebernommene Anker-Positionen statischer Ersatzquellen",
        ))?;
        registry.register(Box::new(position_updates_total.clone()))?;

        let listeners_purged_total = IntCounter::with_opts(Opts::new(
            "spectator_listeners_purged_total",
            "Bereinigte Listener (Disconnect oder Zuschauer-Ende)",
        ))?;
        registry.register(Box::new(listeners_purged_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            substitutes_created_total,
            substitutes_removed_total,
            substitutes_active,
            packets_rerouted_total,
            position_updates_total,
            listeners_purged_total,
        })
    }

    /// Exportiert alle Metriken im Prometheus-Textformat
    pub fn exportieren(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
