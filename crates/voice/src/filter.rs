//! Empfaenger-Filter fuer Ersatzquellen
//!
//! Wird beim Erstellen einer Quelle einmalig installiert und pro
//! Empfaenger-Kandidat ausgewertet.

use spectator_core::types::{ListenerId, SubstituteKind};

use crate::host::Listener;

/// Wer eine Ersatzquelle NICHT hoeren darf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmpfaengerFilter {
    /// Nur der Sprecher selbst ist ausgeschlossen (Entity-Quellen)
    OhneSelbst { sprecher: ListenerId },
    /// Der Sprecher und alle anderen Zuschauer sind ausgeschlossen
    /// (statische Quellen)
    OhneSelbstUndZuschauer { sprecher: ListenerId },
}

impl EmpfaengerFilter {
    /// Filter passend zur Art der Ersatzquelle
    pub fn fuer(art: SubstituteKind, sprecher: ListenerId) -> Self {
        match art {
            SubstituteKind::Statisch => Self::OhneSelbstUndZuschauer { sprecher },
            SubstituteKind::Entity => Self::OhneSelbst { sprecher },
        }
    }

    pub fn sprecher(&self) -> ListenerId {
        match self {
            Self::OhneSelbst { sprecher } | Self::OhneSelbstUndZuschauer { sprecher } => *sprecher,
        }
    }

    /// Darf `empfaenger` die Quelle hoeren?
    pub fn erlaubt(&self, empfaenger: &dyn Listener) -> bool {
        if empfaenger.id() == self.sprecher() {
            return false;
        }
        match self {
            Self::OhneSelbst { .. } => true,
            Self::OhneSelbstUndZuschauer { .. } => !empfaenger.ist_zuschauer(),
        }
    }
}
