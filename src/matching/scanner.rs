//! Sliding-window scan of one target sequence against a [`ProbeTable`].
//!
//! Every offset from `0` to `len - window` is tested independently, so
//! overlapping occurrences are all reported, in ascending offset order.
//!
//! Two strategies produce identical hits:
//!
//! - **Packed**: when the table holds only uppercase ACGT probes of at most 32
//!   bases, a 2-bit rolling k-mer is updated one base at a time and looked up
//!   by integer. A window containing any other symbol cannot match such a
//!   table, so the scan tracks the length of the current run of ACGT bases and
//!   skips lookups until the run covers a full window.
//! - **Slice**: otherwise each window is looked up directly as a byte slice
//!   (borrowed, never copied).

use crate::core::probe::Probe;
use crate::matching::table::ProbeTable;
use crate::utils::validation::{base_code, kmer_mask};

/// One probe occurrence within a scanned sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit<'t> {
    /// The matching table entry
    pub probe: &'t Probe,
    /// Zero-based start of the window
    pub offset: usize,
}

impl Hit<'_> {
    /// The matched sequence, equal to the scanned window
    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.probe.sequence
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.probe.identifier
    }
}

/// Scan `sequence` with a window of `window` bases against `table`.
///
/// Produces nothing if the sequence is shorter than the window, if the window
/// is zero, or if the window differs from the table's probe length (no key
/// could ever equal such a window).
pub fn scan<'s, 't>(sequence: &'s [u8], window: usize, table: &'t ProbeTable) -> Scan<'s, 't> {
    let exhausted = window == 0
        || window != table.probe_length()
        || sequence.len() < window
        || table.is_empty();

    let strategy = if exhausted {
        Strategy::Done
    } else if table.has_packed_index() {
        Strategy::Packed {
            kmer: 0,
            valid: 0,
            mask: kmer_mask(window),
        }
    } else {
        Strategy::Slice
    };

    Scan {
        sequence,
        window,
        table,
        pos: 0,
        strategy,
    }
}

#[derive(Debug, Clone, Copy)]
enum Strategy {
    Packed {
        kmer: u64,
        /// Length of the run of ACGT bases ending just before `pos`
        valid: usize,
        mask: u64,
    },
    Slice,
    Done,
}

/// Iterator over the [`Hit`]s of one sequence, ascending by offset
#[derive(Debug, Clone)]
pub struct Scan<'s, 't> {
    sequence: &'s [u8],
    window: usize,
    table: &'t ProbeTable,
    /// Packed: next base to fold in. Slice: next window start.
    pos: usize,
    strategy: Strategy,
}

impl<'t> Scan<'_, 't> {
    fn next_packed(&mut self) -> Option<Hit<'t>> {
        let Strategy::Packed {
            mut kmer,
            mut valid,
            mask,
        } = self.strategy
        else {
            return None;
        };

        let mut found = None;
        while self.pos < self.sequence.len() {
            let b = self.sequence[self.pos];
            self.pos += 1;

            if let Some(code) = base_code(b) {
                kmer = ((kmer << 2) | code) & mask;
                valid = (valid + 1).min(self.window);
            } else {
                valid = 0;
                continue;
            }

            if valid == self.window {
                if let Some(probe) = self.table.lookup_kmer(kmer) {
                    found = Some(Hit {
                        probe,
                        offset: self.pos - self.window,
                    });
                    break;
                }
            }
        }

        self.strategy = Strategy::Packed { kmer, valid, mask };
        found
    }

    fn next_slice(&mut self) -> Option<Hit<'t>> {
        while self.pos + self.window <= self.sequence.len() {
            let offset = self.pos;
            self.pos += 1;
            let candidate = &self.sequence[offset..offset + self.window];
            if let Some(probe) = self.table.lookup_bytes(candidate) {
                return Some(Hit { probe, offset });
            }
        }
        None
    }
}

impl<'t> Iterator for Scan<'_, 't> {
    type Item = Hit<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.strategy {
            Strategy::Packed { .. } => self.next_packed(),
            Strategy::Slice => self.next_slice(),
            Strategy::Done => None,
        }
    }
}
