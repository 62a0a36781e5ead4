//! spectator-protocol – Paket-Typen
//!
//! Werttypen fuer die Pakete die das Addon umschreibt und weiterleitet.
//! Die Wire-Kodierung uebernimmt der Voice-Server.

pub mod codec;
pub mod source;

pub use codec::{CodecInfo, OpusDecoderInfo};
pub use source::{SourceAudioEndPacket, SourceAudioPacket, SourceInfo, SourceInfoPacket, SourcePacket};
