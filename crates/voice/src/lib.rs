//! spectator-voice – Routing-Engine fuer Zuschauer-Sprache
//!
//! Leitet die Sprache von Zuschauern ueber Ersatzquellen um, damit andere
//! Spieler sie an einer sinnvollen Position hoeren: an einem Anker ueber der
//! Kamera des Zuschauers oder an der beobachteten Entity.
//!
//! ## Module
//! - [`host`] – Schnittstellen zum Voice-Server (Listener, Source-Lines, Quellen)
//! - [`filter`] – Empfaenger-Filter der Ersatzquellen
//! - [`throttle`] – Drossel fuer Positions-Updates
//! - [`registry`] – Ersatzquellen pro (Listener, Line)
//! - [`lifecycle`] – Bereinigung bei Disconnect und Zuschauer-Ende
//! - [`activation`] – Spiegelung an die eigene Sprech-Anzeige
//! - [`router`] – Routing-Entscheidung pro Paket
//! - `sim` – In-Memory Host fuer Tests und Demo (Feature `sim`)

pub mod activation;
pub mod event;
pub mod filter;
pub mod host;
pub mod lifecycle;
pub mod observer;
pub mod registry;
pub mod router;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod throttle;

pub use event::{AudioEreignis, EreignisQuelle, SpielerQuelle, SteuerEreignis};
pub use filter::EmpfaengerFilter;
pub use host::{ActivationBridge, Listener, SourceLine, Substitute};
pub use observer::RoutingBeobachter;
pub use registry::QuellenRegistry;
pub use router::{RoutingDecision, RoutingOptionen, SpectatorRouter};
pub use throttle::PositionsDrossel;
