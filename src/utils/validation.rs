//! Nucleotide alphabet helpers shared by the parsers and the scanner.

/// Longest window that fits a 2-bit packed `u64` k-mer
pub const MAX_PACKED_WINDOW: usize = 32;

/// Check whether a byte is one of the uppercase bases `A`, `C`, `G`, `T`.
#[inline]
#[must_use]
pub fn is_acgt_base(b: u8) -> bool {
    matches!(b, b'A' | b'C' | b'G' | b'T')
}

/// Check whether every byte of a sequence is an uppercase `A`, `C`, `G` or `T`.
///
/// # Examples
///
/// ```
/// use probe_search::utils::validation::is_acgt;
///
/// assert!(is_acgt(b"ACGTTGCA"));
/// assert!(!is_acgt(b"ACGN"));
/// assert!(!is_acgt(b"acgt")); // lowercase is not normalized
/// ```
#[must_use]
pub fn is_acgt(seq: &[u8]) -> bool {
    seq.iter().copied().all(is_acgt_base)
}

/// 2-bit code of an uppercase base, `None` for anything else
#[inline]
#[must_use]
pub fn base_code(b: u8) -> Option<u64> {
    match b {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

/// Pack an uppercase ACGT sequence of at most [`MAX_PACKED_WINDOW`] bases
/// into a `u64`, first base in the most significant position.
///
/// Returns `None` if the sequence is too long or contains any other symbol.
#[must_use]
pub fn pack_kmer(seq: &[u8]) -> Option<u64> {
    if seq.len() > MAX_PACKED_WINDOW {
        return None;
    }
    seq.iter()
        .try_fold(0u64, |acc, &b| base_code(b).map(|code| (acc << 2) | code))
}

/// Bit mask covering the low `2 * window` bits
#[must_use]
pub fn kmer_mask(window: usize) -> u64 {
    if window >= MAX_PACKED_WINDOW {
        u64::MAX
    } else {
        (1u64 << (2 * window)) - 1
    }
}

/// Drop every byte that is not an uppercase `A`, `C`, `G` or `T`.
pub fn retain_acgt(seq: &mut Vec<u8>) {
    seq.retain(|&b| is_acgt_base(b));
}
