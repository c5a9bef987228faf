//! The `MoraStr` value type and its structural operations.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use crate::context::Context;
use crate::error::{Error, Warning};
use crate::kana::{self, Column};
use crate::normalize::normalize;
use crate::segment::{segment, Boundaries};

/// An immutable, mora-segmented katakana string.
///
/// Equality and hashing consider only the backing character data, not
/// the (derivable) boundary index.
#[derive(Clone, Debug)]
pub struct MoraStr {
    string: String,
    boundaries: Boundaries,
}

impl MoraStr {
    /// Normalises and segments `x`, escalating the leading-small-kana
    /// diagnostic into an error when `ignore` is `false`... no -- when
    /// `ignore` is `true` both validation and the warning are suppressed.
    pub fn new(ctx: &Context, x: impl AsRef<str>, ignore: bool) -> Result<Self, Error> {
        Self::with_warning(ctx, x, ignore).map(|(m, _)| m)
    }

    /// As [`Self::new`], but also returns the leading-small-kana warning
    /// rather than silently discarding it.
    pub fn with_warning(
        ctx: &Context,
        x: impl AsRef<str>,
        ignore: bool,
    ) -> Result<(Self, Option<Warning>), Error> {
        let normalized = normalize(ctx, x.as_ref(), !ignore)?;
        let (boundaries, warning) = segment(&normalized)?;
        let warning = if ignore { None } else { warning };
        Ok((
            MoraStr {
                string: normalized,
                boundaries,
            },
            warning,
        ))
    }

    /// Concatenates `iterables`' string pieces, then constructs as
    /// [`Self::new`] would.
    pub fn from_strs<I, S>(ctx: &Context, iterables: I, ignore: bool) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buf = String::new();
        for piece in iterables {
            buf.push_str(piece.as_ref());
        }
        Self::new(ctx, buf, ignore)
    }

    /// The shared, process-wide empty `MoraStr`.
    pub fn empty() -> &'static MoraStr {
        static EMPTY: OnceLock<MoraStr> = OnceLock::new();
        EMPTY.get_or_init(|| MoraStr {
            string: String::new(),
            boundaries: Boundaries::Dense(0),
        })
    }

    /// Builds a single-mora `MoraStr` directly from an already-validated
    /// katakana span, skipping normalisation and segmentation. Used by
    /// the replace engine to wrap a mora it just extracted via [`Self::nth`].
    pub(crate) fn single_mora(s: &str) -> MoraStr {
        let char_len = s.chars().count() as u32;
        let boundaries = if char_len == 1 {
            Boundaries::Dense(1)
        } else {
            Boundaries::Sparse(vec![char_len])
        };
        MoraStr {
            string: s.to_string(),
            boundaries,
        }
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.string
    }

    pub(crate) fn char_len(&self) -> u32 {
        match &self.boundaries {
            Boundaries::Dense(m) => *m,
            Boundaries::Sparse(b) => b.last().copied().unwrap_or(0),
        }
    }

    /// Every character admitted into `string` is in U+30A1..=U+30FE,
    /// which is uniformly three bytes in UTF-8.
    fn char_slice(&self, start: u32, end: u32) -> &str {
        &self.string[start as usize * 3..end as usize * 3]
    }

    fn is_boundary(&self, char_offset: u32) -> bool {
        if char_offset == 0 || char_offset == self.char_len() {
            return true;
        }
        match &self.boundaries {
            Boundaries::Dense(_) => true,
            Boundaries::Sparse(b) => b.binary_search(&char_offset).is_ok(),
        }
    }

    pub(crate) fn chars_vec(&self) -> Vec<char> {
        self.string.chars().collect()
    }

    /// Builds a `MoraStr` from an already-segmented string and its
    /// boundaries, trusting the caller to have validated both.
    pub(crate) fn from_parts(string: String, boundaries: Boundaries) -> MoraStr {
        MoraStr { string, boundaries }
    }

    /// The mora at `i`, with negative indices counting from the end.
    pub fn nth(&self, i: isize) -> Option<&str> {
        let len = self.len() as isize;
        let idx = if i < 0 { i + len } else { i };
        if idx < 0 || idx >= len {
            return None;
        }
        let idx = idx as usize;
        Some(self.char_slice(self.boundaries.start(idx), self.boundaries.end(idx)))
    }

    fn first_char(&self) -> Option<char> {
        self.string.chars().next()
    }

    /// Mora-indexed slice. `step == 1` is the fast contiguous path;
    /// any other nonzero step re-validates boundaries at every sampled
    /// mora join, since a strided selection can juxtapose morae that
    /// were not adjacent in the source.
    pub fn slice(&self, start: isize, end: isize, step: isize) -> Result<MoraStr, Error> {
        assert_ne!(step, 0, "slice step must not be zero");
        let len = self.len() as isize;
        let norm = |i: isize| -> isize {
            if i < 0 {
                (i + len).clamp(0, len)
            } else {
                i.clamp(0, len)
            }
        };

        if step == 1 {
            let a = norm(start) as usize;
            let c = norm(end) as usize;
            if c <= a {
                return Ok(MoraStr {
                    string: String::new(),
                    boundaries: Boundaries::Dense(0),
                });
            }
            let char_start = self.boundaries.start(a);
            let char_end = self.boundaries.end(c - 1);
            let new_string = self.char_slice(char_start, char_end).to_string();
            let new_boundaries = match &self.boundaries {
                Boundaries::Dense(_) => Boundaries::Dense((c - a) as u32),
                Boundaries::Sparse(b) => {
                    let sub: Vec<u32> = b[a..c].iter().map(|x| x - char_start).collect();
                    if sub.len() == c - a {
                        Boundaries::Dense(sub.len() as u32)
                    } else {
                        Boundaries::Sparse(sub)
                    }
                }
            };
            return Ok(MoraStr {
                string: new_string,
                boundaries: new_boundaries,
            });
        }

        let indices = resolve_stride(start, end, step, self.len());
        let mut out_string = String::new();
        let mut out_boundaries = Vec::with_capacity(indices.len());
        let mut prev_col: Option<Column> = None;

        for (n, idx) in indices.iter().enumerate() {
            let mora = self.nth(*idx as isize).expect("index resolved in-range");
            let first = mora.chars().next().expect("mora is never empty");
            if let Some(small) = kana::small_vowel(first) {
                if n == 0 {
                    if step < 0 {
                        return Err(Error::IllFormedMoraString);
                    }
                } else if Some(small) != prev_col {
                    return Err(Error::IllFormedMoraString);
                }
            }
            out_string.push_str(mora);
            out_boundaries.push(out_string.chars().count() as u32);
            prev_col = mora.chars().last().and_then(kana::column);
        }

        let m = out_boundaries.len();
        let boundaries = if m == out_string.chars().count() {
            Boundaries::Dense(m as u32)
        } else {
            Boundaries::Sparse(out_boundaries)
        };
        Ok(MoraStr {
            string: out_string,
            boundaries,
        })
    }

    /// Concatenates `self` and `other`. Re-segments only when `other`
    /// begins with a small kana that might bind across the join.
    pub fn concat(&self, other: &MoraStr) -> Result<MoraStr, Error> {
        if self.is_empty() {
            return Ok(other.clone());
        }
        if other.is_empty() {
            return Ok(self.clone());
        }

        let joins_small = other
            .first_char()
            .map(|c| kana::small_vowel(c).is_some())
            .unwrap_or(false);

        let mut new_string = String::with_capacity(self.string.len() + other.string.len());
        new_string.push_str(&self.string);
        new_string.push_str(&other.string);

        if !joins_small {
            let offset = self.char_len();
            let boundaries = match (&self.boundaries, &other.boundaries) {
                (Boundaries::Dense(a), Boundaries::Dense(b)) => Boundaries::Dense(a + b),
                _ => {
                    let mut v = self.boundaries.to_vec();
                    v.extend(other.boundaries.to_vec().into_iter().map(|x| x + offset));
                    if v.len() == new_string.chars().count() {
                        Boundaries::Dense(v.len() as u32)
                    } else {
                        Boundaries::Sparse(v)
                    }
                }
            };
            return Ok(MoraStr {
                string: new_string,
                boundaries,
            });
        }

        let (boundaries, _) = segment(&new_string)?;
        if boundaries.len() != self.len() + other.len() {
            return Err(Error::MoraLengthInconsistency);
        }
        Ok(MoraStr {
            string: new_string,
            boundaries,
        })
    }

    /// Repeats `self` `n` times.
    pub fn repeat(&self, n: usize) -> Result<MoraStr, Error> {
        if n == 0 || self.is_empty() {
            return Ok(MoraStr {
                string: String::new(),
                boundaries: Boundaries::Dense(0),
            });
        }
        if n == 1 {
            return Ok(self.clone());
        }

        let joins_small = self
            .first_char()
            .map(|c| kana::small_vowel(c).is_some())
            .unwrap_or(false);
        let new_string = self.string.repeat(n);

        if !joins_small {
            let char_len = self.char_len();
            let boundaries = match &self.boundaries {
                Boundaries::Dense(m) => Boundaries::Dense(m * n as u32),
                Boundaries::Sparse(b) => {
                    let mut v = Vec::with_capacity(b.len() * n);
                    for k in 0..n as u32 {
                        let offset = k * char_len;
                        v.extend(b.iter().map(|x| x + offset));
                    }
                    Boundaries::Sparse(v)
                }
            };
            return Ok(MoraStr {
                string: new_string,
                boundaries,
            });
        }

        let (boundaries, _) = segment(&new_string)?;
        if boundaries.len() != self.len() * n {
            return Err(Error::MoraLengthInconsistency);
        }
        Ok(MoraStr {
            string: new_string,
            boundaries,
        })
    }

    /// Strips `prefix` if `self` begins with it on a mora boundary,
    /// otherwise returns a clone of `self`.
    pub fn remove_prefix(&self, prefix: &MoraStr) -> MoraStr {
        if prefix.is_empty() || !self.string.starts_with(prefix.as_str()) {
            return self.clone();
        }
        if !self.is_boundary(prefix.char_len()) {
            return self.clone();
        }
        self.slice(prefix.len() as isize, self.len() as isize, 1)
            .expect("forward unit-step slice never fails")
    }

    /// Strips `suffix` if `self` ends with it on a mora boundary,
    /// otherwise returns a clone of `self`.
    pub fn remove_suffix(&self, suffix: &MoraStr) -> MoraStr {
        if suffix.is_empty() || !self.string.ends_with(suffix.as_str()) {
            return self.clone();
        }
        let cut = self.char_len() - suffix.char_len();
        if !self.is_boundary(cut) {
            return self.clone();
        }
        self.slice(0, (self.len() - suffix.len()) as isize, 1)
            .expect("forward unit-step slice never fails")
    }

    /// Whether `self` begins with any of `needles` on a mora boundary.
    pub fn starts_with(&self, needles: &[MoraStr]) -> bool {
        needles.iter().any(|needle| {
            !needle.is_empty()
                && self.string.starts_with(needle.as_str())
                && self.is_boundary(needle.char_len())
        })
    }

    /// Whether `self` ends with any of `needles` on a mora boundary.
    pub fn ends_with(&self, needles: &[MoraStr]) -> bool {
        needles.iter().any(|needle| {
            !needle.is_empty()
                && self.string.ends_with(needle.as_str())
                && self.is_boundary(self.char_len() - needle.char_len())
        })
    }

    /// The mora boundary offsets, prefixed with 0 when `zero` is set.
    pub fn char_indices(&self, zero: bool) -> Vec<u32> {
        let mut v = self.boundaries.to_vec();
        if zero {
            v.insert(0, 0);
        }
        v
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { mora: self, idx: 0 }
    }

    pub(crate) fn boundaries(&self) -> &Boundaries {
        &self.boundaries
    }
}

fn resolve_stride(start: isize, end: isize, step: isize, len: usize) -> Vec<usize> {
    let len = len as isize;
    let norm = |i: isize| -> isize {
        if i < 0 {
            (i + len).clamp(0, len)
        } else {
            i.clamp(0, len)
        }
    };
    let a = norm(start);
    let c = norm(end);
    let mut out = Vec::new();
    if step > 0 {
        let mut i = a;
        while i < c {
            out.push(i as usize);
            i += step;
        }
    } else {
        let mut i = a;
        while i > c {
            out.push(i as usize);
            i += step;
        }
    }
    out
}

impl fmt::Display for MoraStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string)
    }
}

impl PartialEq for MoraStr {
    fn eq(&self, other: &Self) -> bool {
        self.string == other.string
    }
}

impl Eq for MoraStr {}

impl Hash for MoraStr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.string.hash(state);
    }
}

pub struct Iter<'a> {
    mora: &'a MoraStr,
    idx: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.mora.nth(self.idx as isize);
        if item.is_some() {
            self.idx += 1;
        }
        item
    }
}

impl<'a> IntoIterator for &'a MoraStr {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mora(s: &str) -> MoraStr {
        let ctx = Context::new();
        MoraStr::new(&ctx, s, false).unwrap()
    }

    #[test]
    fn len_and_nth() {
        let m = mora("キャッキャ");
        assert_eq!(m.len(), 3);
        assert_eq!(m.nth(0), Some("キャ"));
        assert_eq!(m.nth(1), Some("ッ"));
        assert_eq!(m.nth(2), Some("キャ"));
        assert_eq!(m.nth(-1), Some("キャ"));
        assert_eq!(m.nth(3), None);
    }

    #[test]
    fn slice_unit_step() {
        let m = mora("キャッキャ");
        let s = m.slice(1, 3, 1).unwrap();
        assert_eq!(s.as_str(), "ッキャ");
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn concat_simple() {
        let a = mora("カタ");
        let b = mora("カナ");
        let c = a.concat(&b).unwrap();
        assert_eq!(c.as_str(), "カタカナ");
        assert_eq!(c.len(), 4);
    }

    #[test]
    fn concat_rejoins_small_kana_boundary() {
        let a = mora("キ");
        let b = mora("ャ");
        let c = a.concat(&b).unwrap();
        assert_eq!(c.as_str(), "キャ");
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn repeat_dense() {
        let a = mora("カ");
        let r = a.repeat(3).unwrap();
        assert_eq!(r.as_str(), "カカカ");
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn remove_prefix_on_boundary() {
        let a = mora("キャッキャ");
        let p = mora("キャ");
        let r = a.remove_prefix(&p);
        assert_eq!(r.as_str(), "ッキャ");
    }

    #[test]
    fn starts_with_needles() {
        let a = mora("キャッキャ");
        let needles = vec![mora("カ"), mora("キャ")];
        assert!(a.starts_with(&needles));
    }

    #[test]
    fn equality_ignores_boundaries() {
        let a = mora("カタカナ");
        let b = mora("カタカナ");
        assert_eq!(a, b);
    }

    #[test]
    fn iterates_morae_in_order() {
        let m = mora("キャッキャ");
        let collected: Vec<&str> = m.iter().collect();
        assert_eq!(collected, vec!["キャ", "ッ", "キャ"]);
    }
}
