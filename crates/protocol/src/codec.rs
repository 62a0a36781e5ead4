//! Codec-Beschreibung fuer Ersatzquellen
//!
//! Die eigentliche Codec-Aushandlung uebernimmt der Voice-Server. Das Addon
//! reicht beim Erstellen einer Quelle nur die Decoder-Beschreibung durch,
//! die Clients zum Dekodieren der weitergeleiteten Pakete benoetigen.

use serde::{Deserialize, Serialize};

/// Abtastrate fuer Opus
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleRate {
    /// 16 kHz – Breitband
    Hz16000 = 16000,
    /// 24 kHz – Superbreitband
    Hz24000 = 24000,
    /// 48 kHz – Vollband (Standard)
    #[default]
    Hz48000 = 48000,
}

/// Frame-Groesse in Zehntelmillisekunden
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSizeMs {
    /// 10 ms
    Ms10 = 100,
    /// 20 ms – Standard
    #[default]
    Ms20 = 200,
    /// 40 ms
    Ms40 = 400,
}

/// Decoder-Parameter fuer Opus-Pakete
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpusDecoderInfo {
    pub sample_rate: SampleRate,
    pub frame_size: FrameSizeMs,
}

/// Codec mit dem eine Quelle ihre Pakete ausliefert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "codec", rename_all = "snake_case")]
pub enum CodecInfo {
    Opus(OpusDecoderInfo),
}

impl Default for CodecInfo {
    fn default() -> Self {
        Self::Opus(OpusDecoderInfo::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_ist_opus_48khz_20ms() {
        let CodecInfo::Opus(info) = CodecInfo::default();
        assert_eq!(info.sample_rate, SampleRate::Hz48000);
        assert_eq!(info.frame_size, FrameSizeMs::Ms20);
    }

    #[test]
    fn codec_info_tagged_serde() {
        let json = serde_json::to_string(&CodecInfo::default()).unwrap();
        assert!(json.contains("\"codec\":\"opus\""));
        let decoded: CodecInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, CodecInfo::default());
    }
}
