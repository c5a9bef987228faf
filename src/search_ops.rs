//! `MoraStr` search and count, built on the algorithm selector.

use crate::error::Error;
use crate::mora_str::MoraStr;
use crate::search::Needle;

fn char_bound(haystack: &MoraStr, mora_idx: usize) -> usize {
    if mora_idx == 0 {
        0
    } else if mora_idx >= haystack.len() {
        haystack.char_len() as usize
    } else {
        haystack.boundaries().start(mora_idx) as usize
    }
}

impl MoraStr {
    /// Finds the first occurrence of `needle` at or after mora index
    /// `start`, searching up to (exclusive) mora index `end` (defaults
    /// to the end of `self`). Returns a mora index.
    pub fn find(&self, needle: &MoraStr, start: usize, end: Option<usize>) -> Option<usize> {
        let end = end.unwrap_or_else(|| self.len()).min(self.len());
        if start > end {
            return None;
        }
        if needle.is_empty() {
            return Some(start);
        }

        let hay_chars = self.chars_vec();
        let needle_chars = needle.chars_vec();
        let search_from = char_bound(self, start);
        let search_upto = char_bound(self, end);
        if needle_chars.len() > search_upto.saturating_sub(search_from) {
            return None;
        }

        let matcher = Needle::new(&needle_chars, hay_chars.len(), true);
        let mut from = search_from;
        loop {
            let pos = matcher.find_from(&hay_chars, from)?;
            let match_end = pos + needle_chars.len();
            if match_end > search_upto {
                return None;
            }
            if self.boundaries().is_boundary(pos as u32) && self.boundaries().is_boundary(match_end as u32) {
                return self.boundaries().mora_index_at_start(pos as u32);
            }
            from = pos + 1;
        }
    }

    /// Finds the last occurrence of `needle` with a start position at or
    /// after mora index `start` and before `end`.
    pub fn rfind(&self, needle: &MoraStr, start: usize, end: Option<usize>) -> Option<usize> {
        let end = end.unwrap_or_else(|| self.len()).min(self.len());
        if start > end {
            return None;
        }
        if needle.is_empty() {
            return Some(end);
        }

        let hay_chars = self.chars_vec();
        let needle_chars = needle.chars_vec();
        let search_from = char_bound(self, start);
        let search_upto = char_bound(self, end);
        if needle_chars.len() > search_upto.saturating_sub(search_from) {
            return None;
        }

        let matcher = Needle::new(&needle_chars, hay_chars.len(), true);
        let mut upto = search_upto - needle_chars.len();
        loop {
            let pos = matcher.rfind_upto(&hay_chars, upto)?;
            if pos < search_from {
                return None;
            }
            let match_end = pos + needle_chars.len();
            if self.boundaries().is_boundary(pos as u32) && self.boundaries().is_boundary(match_end as u32) {
                return self.boundaries().mora_index_at_start(pos as u32);
            }
            if pos == 0 {
                return None;
            }
            upto = pos - 1;
        }
    }

    pub fn contains(&self, needle: &MoraStr) -> bool {
        self.find(needle, 0, None).is_some()
    }

    /// `find`, but a missing match is an error rather than `None`.
    pub fn index(&self, needle: &MoraStr, start: usize, end: Option<usize>) -> Result<usize, Error> {
        self.find(needle, start, end).ok_or(Error::NotFound)
    }

    /// `rfind`, but a missing match is an error rather than `None`.
    pub fn rindex(&self, needle: &MoraStr, start: usize, end: Option<usize>) -> Result<usize, Error> {
        self.rfind(needle, start, end).ok_or(Error::NotFound)
    }

    /// Counts non-overlapping occurrences of `needle` in `self`, capped
    /// at `max` if given.
    pub fn count(&self, needle: &MoraStr, start: usize, end: Option<usize>, max: Option<usize>) -> usize {
        let mut count = 0;
        let mut from = start;
        let limit = max.unwrap_or(usize::MAX);
        while count < limit {
            match self.find(needle, from, end) {
                Some(pos) => {
                    count += 1;
                    from = pos + needle.len().max(1);
                }
                None => break,
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    fn mora(s: &str) -> MoraStr {
        let ctx = Context::new();
        MoraStr::new(&ctx, s, false).unwrap()
    }

    #[test]
    fn find_plain() {
        let h = mora("キャッキャ");
        let n = mora("キャ");
        assert_eq!(h.find(&n, 0, None), Some(0));
        assert_eq!(h.find(&n, 1, None), Some(2));
    }

    #[test]
    fn find_respects_mora_boundaries() {
        // "ャ" alone never occurs as a standalone mora inside キャッキャ.
        let h = mora("キャッキャ");
        let n = mora("ャ");
        assert_eq!(h.find(&n, 0, None), None);
    }

    #[test]
    fn rfind_finds_last_occurrence() {
        let h = mora("キャッキャ");
        let n = mora("キャ");
        assert_eq!(h.rfind(&n, 0, None), Some(2));
    }

    #[test]
    fn contains_and_count() {
        let h = mora("カタカナカタカナ");
        let n = mora("カタ");
        assert!(h.contains(&n));
        assert_eq!(h.count(&n, 0, None, None), 2);
    }

    #[test]
    fn index_errs_on_missing() {
        let h = mora("カタカナ");
        let n = mora("サ");
        assert!(h.index(&n, 0, None).is_err());
    }
}
