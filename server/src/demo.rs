//! Demo-Sitzung gegen den In-Memory Host
//!
//! Spielt eine kurze Sitzung ab: ein Zuschauer spricht erst frei (statischer
//! Anker), dann waehrend er einem Spieler folgt (Entity-Quelle), verlaesst
//! den Zuschauermodus und trennt die Verbindung. Dazwischen wird die
//! Konfiguration neu geladen.

use bytes::Bytes;
use spectator_core::event::AddonEvent;
use spectator_core::types::{ActivationId, EntityId, Position, SourceId};
use spectator_protocol::source::{SourceAudioEndPacket, SourceAudioPacket, SourcePacket};
use spectator_voice::host::{Listener, SourceLine};
use spectator_voice::sim::{SimLine, SimListener, SimWelt};
use spectator_voice::{AudioEreignis, EreignisQuelle, SpielerQuelle, SteuerEreignis};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::SpectatorAddon;

/// Abstand zweier Opus-Frames
pub const FRAME_INTERVALL: Duration = Duration::from_millis(20);

/// Hoerweite der Proximity-Line
pub const DISTANZ: u16 = 48;

/// Zusammenfassung einer abgespielten Sitzung
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DemoBericht {
    pub frames: u64,
    pub unterdrueckt: u64,
    pub ergaenzt: u64,
    /// Beim Zuhoerer angekommene Audio-Frames (ueber Ersatzquellen)
    pub beim_zuhoerer: usize,
}

/// Spielt die Demo-Sitzung ab und meldet Lifecycle-Ereignisse ueber `feed`
pub async fn sitzung_abspielen(
    addon: &SpectatorAddon,
    welt: &Arc<SimWelt>,
    feed: &mpsc::Sender<AddonEvent>,
    frames_pro_phase: u64,
) -> anyhow::Result<DemoBericht> {
    let line = SimLine::neu(welt);
    let zuschauer = welt.listener_hinzufuegen("Alex");
    let zuhoerer = welt.listener_hinzufuegen("Sam");
    zuhoerer.position_setzen(Position::neu(4.0, 64.0, 4.0));

    zuschauer.zuschauer_setzen(true);
    zuschauer.position_setzen(Position::neu(0.0, 80.0, 0.0));

    let mut bericht = DemoBericht::default();
    let mut sequenz = 0u64;
    let mut takt = tokio::time::interval(FRAME_INTERVALL);

    // Phase 1: freie Kamera
    tracing::info!(listener = %zuschauer.id(), "Phase: freie Kamera");
    for _ in 0..frames_pro_phase {
        takt.tick().await;
        frame_senden(addon, &zuschauer, &line, sequenz, None, &mut bericht);
        sequenz += 1;
    }
    ende_senden(addon, &zuschauer, &line, sequenz);

    // Phase 2: folgt einem Spieler
    zuschauer.ziel_setzen(Some(EntityId::new()));
    let aktivierung = ActivationId::new();
    tracing::info!(listener = %zuschauer.id(), "Phase: folgt Entity");
    for _ in 0..frames_pro_phase {
        takt.tick().await;
        frame_senden(addon, &zuschauer, &line, sequenz, Some(aktivierung), &mut bericht);
        sequenz += 1;
    }
    ende_senden(addon, &zuschauer, &line, sequenz);

    feed.send(AddonEvent::KonfigurationNeuGeladen).await?;

    // Phase 3: zurueck im Spiel
    zuschauer.zuschauer_setzen(false);
    zuschauer.ziel_setzen(None);
    tracing::info!(listener = %zuschauer.id(), "Phase: kein Zuschauer");
    takt.tick().await;
    frame_senden(addon, &zuschauer, &line, sequenz, None, &mut bericht);

    welt.listener_entfernen(&zuschauer.id());
    feed.send(AddonEvent::ClientGetrennt {
        listener: zuschauer.id(),
    })
    .await?;

    bericht.beim_zuhoerer = zuhoerer.empfangene_audio_pakete();
    Ok(bericht)
}

fn spieler_quelle(listener: &Arc<SimListener>, line: &Arc<SimLine>) -> EreignisQuelle {
    EreignisQuelle::Spieler(SpielerQuelle {
        listener: listener.clone(),
        line: line.clone() as Arc<dyn SourceLine>,
        stereo: false,
    })
}

fn frame_senden(
    addon: &SpectatorAddon,
    listener: &Arc<SimListener>,
    line: &Arc<SimLine>,
    sequenz: u64,
    aktivierung: Option<ActivationId>,
    bericht: &mut DemoBericht,
) {
    let ereignis = AudioEreignis {
        quelle: spieler_quelle(listener, line),
        paket: SourceAudioPacket::neu(sequenz, Bytes::from_static(&[0xF8; 40]), SourceId::new(), DISTANZ),
        distanz: DISTANZ,
        aktivierung,
    };

    bericht.frames += 1;
    if addon.audio_paket_empfangen(&ereignis).ist_unterdrueckt() {
        bericht.unterdrueckt += 1;
    } else {
        bericht.ergaenzt += 1;
    }
}

fn ende_senden(addon: &SpectatorAddon, listener: &Arc<SimListener>, line: &Arc<SimLine>, sequenz: u64) {
    let ereignis = SteuerEreignis {
        quelle: spieler_quelle(listener, line),
        paket: SourcePacket::AudioEnde(SourceAudioEndPacket {
            quelle: SourceId::new(),
            sequenz,
        }),
        distanz: DISTANZ,
    };
    addon.steuer_paket_empfangen(&ereignis);
}
