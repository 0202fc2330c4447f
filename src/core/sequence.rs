/// A named, flattened genome sequence ready for scanning.
///
/// The sequence text is held as raw bytes; it is never normalized, so
/// ambiguity symbols and lowercase bases are kept as they were read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSequence {
    /// Name of the source this sequence came from (e.g. `chr1.fa`)
    pub name: String,

    /// Concatenated sequence text of one record
    pub sequence: Vec<u8>,
}

impl TargetSequence {
    pub fn new(name: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
