//! Gemeinsame Identifikationstypen fuer das Spectator-Addon
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_typ {
    ($(#[$meta:meta])* $name:ident, $praefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Erstellt eine neue zufaellige ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Gibt die innere UUID zurueck
            pub fn inner(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($praefix, ":{}"), self.0)
            }
        }
    };
}

id_typ!(
    /// Stabile Identitaet eines Zuhoerers (Spielers) ueber Verbindungen hinweg
    ListenerId,
    "listener"
);
id_typ!(
    /// ID einer Source-Line (logischer Audio-Kanal, z.B. Proximity)
    LineId,
    "line"
);
id_typ!(
    /// ID einer Audio-Quelle (vom Host vergeben)
    SourceId,
    "source"
);
id_typ!(
    /// Referenz auf eine vom Host verfolgte Entity
    EntityId,
    "entity"
);
id_typ!(
    /// Aktivierungs-ID des Clients (steuert die "Ich spreche"-Anzeige)
    ActivationId,
    "activation"
);

/// Zusammengesetzter Schluessel: ein Zuhoerer auf einer Source-Line
///
/// Pro Schluessel existiert hoechstens eine statische und eine Entity-Quelle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelKey {
    pub listener: ListenerId,
    pub line: LineId,
}

impl ChannelKey {
    pub fn neu(listener: ListenerId, line: LineId) -> Self {
        Self { listener, line }
    }
}

impl std::fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.listener, self.line)
    }
}

/// Welt-Position (Bloecke)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn neu(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Gibt die um `dy` nach oben verschobene Position zurueck
    pub fn nach_oben(self, dy: f64) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }
}

/// Art einer Ersatzquelle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstituteKind {
    /// An eine gedrosselt aktualisierte Welt-Position gebunden
    Statisch,
    /// An die Position der beobachteten Entity gebunden
    Entity,
}

impl SubstituteKind {
    /// Kurzname fuer Logs und Metrik-Labels
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Statisch => "static",
            Self::Entity => "entity",
        }
    }
}

impl std::fmt::Display for SubstituteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.als_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_id_eindeutig() {
        let a = ListenerId::new();
        let b = ListenerId::new();
        assert_ne!(a, b, "Zwei neue ListenerIds muessen verschieden sein");
    }

    #[test]
    fn id_display_praefix() {
        assert!(SourceId(Uuid::nil()).to_string().starts_with("source:"));
        assert!(LineId(Uuid::nil()).to_string().starts_with("line:"));
    }

    #[test]
    fn channel_key_gleichheit() {
        let listener = ListenerId::new();
        let line = LineId::new();
        assert_eq!(ChannelKey::neu(listener, line), ChannelKey::neu(listener, line));
        assert_ne!(
            ChannelKey::neu(listener, line),
            ChannelKey::neu(listener, LineId::new())
        );
    }

    #[test]
    fn position_nach_oben() {
        let p = Position::neu(1.0, 64.0, -3.0).nach_oben(2.3);
        assert_eq!(p.x, 1.0);
        assert!((p.y - 66.3).abs() < 1e-9);
        assert_eq!(p.z, -3.0);
    }

    #[test]
    fn ids_sind_serde_kompatibel() {
        let id = EntityId::new();
        let json = serde_json::to_string(&id).unwrap();
        let id2: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, id2);
    }
}
