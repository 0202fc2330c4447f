use serde::Serialize;

/// A fixed-length query sequence tied to an identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Probe {
    /// Probe sequence, expected over the alphabet {A, C, G, T}
    pub sequence: String,

    /// Probe (or probe set) identifier from the probe file
    pub identifier: String,
}

impl Probe {
    pub fn new(sequence: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            sequence: sequence.into(),
            identifier: identifier.into(),
        }
    }

    /// Length of the probe sequence in bases
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
