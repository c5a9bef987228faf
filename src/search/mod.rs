//! Exact substring search: three interchangeable algorithms behind one
//! selector, operating on mora-aligned or plain character positions.

mod bitap;
mod naive;
mod select;
mod two_way;

pub use select::{select, Algorithm};

use self::bitap::{Bitap32, Bitap64};
use self::two_way::TwoWay;

enum Impl {
    Naive,
    Bitap32(Bitap32),
    Bitap64(Bitap64),
    TwoWay(TwoWay),
}

/// A needle preprocessed once and reusable across repeated searches
/// (e.g. successive [`crate::finditer::FindIter`] refills or the
/// multiple passes a replace makes over the same pattern).
pub struct Needle {
    pattern: Vec<char>,
    algorithm: Algorithm,
    inner: Impl,
}

impl Needle {
    pub fn new(pattern: &[char], haystack_len: usize, mora_aligned: bool) -> Self {
        let algorithm = select::select(pattern.len(), haystack_len, mora_aligned);
        let inner = match algorithm {
            Algorithm::Naive => Impl::Naive,
            Algorithm::Bitap32 => Impl::Bitap32(Bitap32::new(pattern)),
            Algorithm::Bitap64 => Impl::Bitap64(Bitap64::new(pattern)),
            Algorithm::TwoWay => Impl::TwoWay(TwoWay::new(pattern)),
        };
        Needle {
            pattern: pattern.to_vec(),
            algorithm,
            inner,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn pattern_len(&self) -> usize {
        self.pattern.len()
    }

    /// First occurrence at or after character offset `from`.
    pub fn find_from(&self, haystack: &[char], from: usize) -> Option<usize> {
        match &self.inner {
            Impl::Naive => naive::find_from(haystack, &self.pattern, from),
            Impl::Bitap32(b) => b.find_from(haystack, from),
            Impl::Bitap64(b) => b.find_from(haystack, from),
            Impl::TwoWay(t) => t.find_from(haystack, from),
        }
    }

    /// Last occurrence with a start position at or before `upto`.
    pub fn rfind_upto(&self, haystack: &[char], upto: usize) -> Option<usize> {
        // The Bitap/Two-Way tables are built left-to-right; a dedicated
        // reverse scan only needs the raw pattern, so route through the
        // naive right-to-left scan regardless of which forward
        // algorithm this needle would otherwise use.
        naive::rfind_from(haystack, &self.pattern, upto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn dispatches_to_naive_for_short_needle() {
        let h = chars("キャッキャ");
        let needle = Needle::new(&chars("キャ"), h.len(), true);
        assert_eq!(needle.algorithm(), Algorithm::Naive);
        assert_eq!(needle.find_from(&h, 0), Some(0));
    }
}
