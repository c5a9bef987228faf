//! Resumable, non-overlapping match iterator.

use arrayvec::ArrayVec;

use crate::mora_str::MoraStr;
use crate::search::Needle;

const RING_CAP: usize = 32;

enum Mode {
    /// Ordinary needle: matcher plus the char offset to resume from and
    /// the char offset bounding the search region.
    Needle {
        matcher: Needle,
        resume_from: usize,
        region_end: usize,
    },
    /// Empty needle: yields every mora gap, `next_index` mora indices at
    /// a time, up to and including the scanned string's length.
    EmptyGaps { next_index: usize },
}

/// An iterator over non-overlapping occurrences of a needle within a
/// haystack, refilling a small ring buffer of matches at a time.
///
/// When `needle` is longer than `haystack`, the two operands swap roles:
/// the longer string is scanned as the haystack and the shorter one
/// becomes the pattern, so `self.finditer(x)` always scans the shorter
/// side and a match is still possible. Yielded positions are then
/// expressed in the scanned string's own mora space, which in the
/// swapped case is the string originally passed as `needle`.
pub struct FindIter {
    haystack: MoraStr,
    hay_chars: Vec<char>,
    mode: Mode,
    ring: ArrayVec<u32, RING_CAP>,
    read_idx: usize,
    charwise: bool,
    done: bool,
}

impl FindIter {
    pub fn new(haystack: &MoraStr, needle: &MoraStr, start: usize, end: Option<usize>, charwise: bool) -> Self {
        let (scanned, pattern) = if needle.len() > haystack.len() {
            (needle, haystack)
        } else {
            (haystack, needle)
        };

        let hay_chars = scanned.chars_vec();
        let scan_len = scanned.len();
        let end = end.unwrap_or(scan_len).min(scan_len);
        let start = start.min(end);

        let mode = if pattern.is_empty() {
            Mode::EmptyGaps { next_index: start }
        } else {
            let needle_chars = pattern.chars_vec();
            let matcher = Needle::new(&needle_chars, hay_chars.len(), true);
            let resume_from = char_bound(scanned, start);
            let region_end = char_bound(scanned, end);
            Mode::Needle {
                matcher,
                resume_from,
                region_end,
            }
        };

        FindIter {
            haystack: scanned.clone(),
            hay_chars,
            mode,
            ring: ArrayVec::new(),
            read_idx: 0,
            charwise,
            done: false,
        }
    }

    fn refill(&mut self) {
        self.ring.clear();
        self.read_idx = 0;

        match &mut self.mode {
            Mode::EmptyGaps { next_index } => {
                let haystack_len = self.haystack.len();
                while self.ring.len() < RING_CAP {
                    if *next_index > haystack_len {
                        self.done = true;
                        break;
                    }
                    let idx = *next_index;
                    *next_index += 1;
                    let out = if !self.charwise {
                        idx as u32
                    } else if idx == 0 {
                        0
                    } else {
                        self.haystack.boundaries().end(idx - 1)
                    };
                    self.ring.push(out);
                }
            }
            Mode::Needle {
                matcher,
                resume_from,
                region_end,
            } => {
                let needle_len = matcher_pattern_len(matcher);
                while self.ring.len() < RING_CAP {
                    let Some(pos) = matcher.find_from(&self.hay_chars, *resume_from) else {
                        self.done = true;
                        break;
                    };
                    let match_end = pos + needle_len;
                    if match_end > *region_end {
                        self.done = true;
                        break;
                    }
                    let boundaries = self.haystack.boundaries();
                    if boundaries.is_boundary(pos as u32) && boundaries.is_boundary(match_end as u32) {
                        let mora_idx = boundaries
                            .mora_index_at_start(pos as u32)
                            .expect("pos already validated as a boundary");
                        self.ring.push(if self.charwise {
                            pos as u32
                        } else {
                            mora_idx as u32
                        });
                        *resume_from = match_end;
                    } else {
                        *resume_from = pos + 1;
                    }
                }
                tracing::trace!(found = self.ring.len(), resume_from, "finditer refill");
            }
        }
    }
}

fn matcher_pattern_len(matcher: &Needle) -> usize {
    matcher.pattern_len()
}

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
    /// A resumable iterator over non-overlapping occurrences of
    /// `needle`, restricted to mora range `[start, end)`. If `needle` is
    /// longer than `self`, the roles swap: `needle` is scanned as the
    /// haystack and `self` becomes the pattern, so a match is still
    /// possible and yielded positions land in `needle`'s mora space.
    pub fn finditer(&self, needle: &MoraStr, start: usize, end: Option<usize>, charwise: bool) -> FindIter {
        FindIter::new(self, needle, start, end, charwise)
    }
}

impl Iterator for FindIter {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.read_idx >= self.ring.len() {
            if self.done {
                return None;
            }
            self.refill();
        }
        if self.read_idx >= self.ring.len() {
            return None;
        }
        let item = self.ring[self.read_idx];
        self.read_idx += 1;
        Some(item)
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
    fn iterates_all_matches() {
        let h = mora("カタカナカタカナ");
        let n = mora("カタ");
        let indices: Vec<u32> = FindIter::new(&h, &n, 0, None, false).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn empty_needle_yields_every_gap() {
        let h = mora("カナ");
        let n = MoraStr::empty().clone();
        let indices: Vec<u32> = FindIter::new(&h, &n, 0, None, false).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn needle_longer_than_haystack_swaps_roles() {
        // self="ア" is shorter than needle="イアウ", so the search scans
        // "イアウ" for "ア" instead of reporting no match.
        let h = mora("ア");
        let n = mora("イアウ");
        let indices: Vec<u32> = FindIter::new(&h, &n, 0, None, false).collect();
        assert_eq!(indices, vec![1]);
    }
}
