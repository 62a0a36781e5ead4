//! Spectator-Addon – Demo-Einstiegspunkt
//!
//! Initialisiert Logging und Addon und spielt eine Sitzung gegen den
//! In-Memory Host ab. Am Ende werden die Metriken ausgegeben.

use anyhow::Result;
use spectator_observability::logging::{log_format_aus_env, log_level_aus_env};
use spectator_observability::logging_initialisieren;
use spectator_server::{demo, ereignisse_verarbeiten, SpectatorAddon};
use spectator_voice::sim::{SimBruecke, SimWelt};
use spectator_voice::ActivationBridge;
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    logging_initialisieren(&log_level_aus_env(), &log_format_aus_env())?;

    // Konfigurationsverzeichnis aus Umgebungsvariable oder Standard
    let configs_dir =
        std::env::var("SPECTATOR_CONFIGS_DIR").unwrap_or_else(|_| "configs".into());

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        configs_dir = %configs_dir,
        "Spectator-Addon wird initialisiert"
    );

    let welt = SimWelt::neu();
    let bruecke = Arc::new(SimBruecke::default());
    let addon = Arc::new(SpectatorAddon::initialisieren(
        configs_dir,
        Some(bruecke.clone() as Arc<dyn ActivationBridge>),
    )?);

    let (feed, empfaenger) = mpsc::channel(64);
    let feed_task = tokio::spawn(ereignisse_verarbeiten(Arc::clone(&addon), empfaenger));

    let bericht = demo::sitzung_abspielen(&addon, &welt, &feed, 25).await?;
    drop(feed);
    feed_task.await?;

    tracing::info!(
        frames = bericht.frames,
        unterdrueckt = bericht.unterdrueckt,
        ergaenzt = bericht.ergaenzt,
        beim_zuhoerer = bericht.beim_zuhoerer,
        aktivierungen = bruecke.audio_infos().len(),
        entfernte_quellen = welt.entfernte_quellen().len(),
        "Sitzung beendet"
    );

    print!("{}", addon.metriken().exportieren()?);
    Ok(())
}
