//! spectator-core – Gemeinsame Typen und Fehlertypen
//!
//! Dieses Crate stellt die Bausteine bereit, die von Engine, Protokoll
//! und Addon-Schale gemeinsam genutzt werden.

pub mod error;
pub mod event;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{Result, SpectatorError};
pub use event::AddonEvent;
pub use types::{
    ActivationId, ChannelKey, EntityId, LineId, ListenerId, Position, SourceId, SubstituteKind,
};
