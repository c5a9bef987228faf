//! Two-Way string matching, preprocessed from a Crochemore-Perrin
//! critical factorization of the needle.
//!
//! The outer scan uses a Horspool-style bad-character skip on the
//! needle's last character; candidate positions are then verified right
//! half first, left half second, in the order the critical
//! factorization prescribes. This omits the reference algorithm's
//! constant-memory "periodic needle" fast path -- needles for which
//! that matters are short enough that the selector (`search::select`)
//! routes them to Bitap before Two-Way is ever built.

use crate::kana;

/// A needle preprocessed for Two-Way matching. Cheap to keep around
/// (e.g. across `FindIter` refills) since preprocessing is the
/// expensive part of a Two-Way search.
pub struct TwoWay {
    needle: Vec<char>,
    crit_pos: usize,
    last_char_skip: [usize; 96],
}

/// Computes the maximal suffix of `x` and its period, under the given
/// character ordering. `reverse_order` negates the comparison key,
/// which is equivalent to running the algorithm against the opposite
/// lexicographic order -- the textbook presentation runs the procedure
/// twice, once per order, and keeps whichever suffix starts later.
fn maximal_suffix(x: &[char], reverse_order: bool) -> (usize, usize) {
    let key = |c: char| -> i64 {
        if reverse_order {
            -(c as i64)
        } else {
            c as i64
        }
    };
    let n = x.len();
    let mut ms = 0usize;
    let mut j = 1usize;
    let mut k = 1usize;
    let mut p = 1usize;

    while j + k <= n {
        let a = key(x[j + k - 1]);
        let b = key(x[ms + k - 1]);
        if a < b {
            j += k;
            k = 1;
            p = j - ms;
        } else if a == b {
            if k == p {
                j += p;
                k = 1;
            } else {
                k += 1;
            }
        } else {
            ms = j;
            j += 1;
            k = 1;
            p = 1;
        }
    }
    (ms, p)
}

impl TwoWay {
    pub fn new(needle: &[char]) -> Self {
        let (pos1, _) = maximal_suffix(needle, false);
        let (pos2, _) = maximal_suffix(needle, true);
        let crit_pos = pos1.max(pos2);

        let mut last_char_skip = [needle.len(); 96];
        for (i, &c) in needle.iter().enumerate().take(needle.len().saturating_sub(1)) {
            if let Some(id) = kana::kana_id(c) {
                last_char_skip[id] = needle.len() - 1 - i;
            }
        }

        TwoWay {
            needle: needle.to_vec(),
            crit_pos,
            last_char_skip,
        }
    }

    /// Finds the first occurrence at or after `from`.
    pub fn find_from(&self, haystack: &[char], from: usize) -> Option<usize> {
        let m = self.needle.len();
        if m == 0 {
            return (from <= haystack.len()).then_some(from);
        }
        let n = haystack.len();
        if n < m {
            return None;
        }

        let mut pos = from;
        while pos + m <= n {
            let last = haystack[pos + m - 1];
            if last != self.needle[m - 1] {
                let skip = kana::kana_id(last)
                    .map(|id| self.last_char_skip[id])
                    .unwrap_or(m);
                pos += skip.max(1);
                continue;
            }

            let mut i = self.crit_pos;
            while i < m && haystack[pos + i] == self.needle[i] {
                i += 1;
            }
            if i < m {
                pos += (i - self.crit_pos) + 1;
                continue;
            }

            let mut i = 0;
            while i < self.crit_pos && haystack[pos + i] == self.needle[i] {
                i += 1;
            }
            if i == self.crit_pos {
                return Some(pos);
            }
            pos += i.max(1);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn finds_match_past_critical_point() {
        let needle = chars("カタカナヅケ");
        let tw = TwoWay::new(&needle);
        let h = chars("アイウエオカタカナヅケキクケコ");
        assert_eq!(tw.find_from(&h, 0), Some(5));
    }

    #[test]
    fn no_match_returns_none() {
        let needle = chars("サシスセソタチツ");
        let tw = TwoWay::new(&needle);
        let h = chars("カタカナカタカナ");
        assert_eq!(tw.find_from(&h, 0), None);
    }

    #[test]
    fn finds_repeated_pattern() {
        let needle = chars("アイウアイウ");
        let tw = TwoWay::new(&needle);
        let h = chars("アアイウアイウ");
        assert_eq!(tw.find_from(&h, 0), Some(1));
    }
}
