//! Multi-occurrence replacement, built atop [`MoraStr::concat`] and
//! [`MoraStr::slice`] for the bulk splicing, with its own boundary check
//! at each replace-introduced join.

use crate::error::Error;
use crate::kana;
use crate::mora_str::MoraStr;

/// Appends `piece` to `result`, first checking the replace-introduced
/// join itself: a small kana at the start of `piece` binding to the
/// column of `result`'s last character would silently reinterpret a mora
/// boundary that `old`/`new` never touched. That is a malformed splice,
/// not the ordinary resegmentation drift [`MoraStr::concat`] guards
/// against, so it is checked here directly and reported as
/// [`Error::IllFormedMoraString`] rather than inheriting whatever
/// `concat` would have raised.
fn splice(result: MoraStr, piece: &MoraStr) -> Result<MoraStr, Error> {
    if !result.is_empty() && !piece.is_empty() {
        let left = result.as_str().chars().next_back().expect("checked non-empty");
        let right = piece.as_str().chars().next().expect("checked non-empty");
        if let Some(rime) = kana::small_vowel(right) {
            if Some(rime) == kana::column(left) {
                return Err(Error::IllFormedMoraString);
            }
        }
    }
    result.concat(piece)
}

/// Replaces up to `maxcount` non-overlapping occurrences of `old` with
/// `new` in `haystack`. An empty `old` inserts `new` between every pair
/// of adjacent morae (and at both ends).
pub fn replace(
    haystack: &MoraStr,
    old: &MoraStr,
    new: &MoraStr,
    maxcount: Option<usize>,
) -> Result<MoraStr, Error> {
    if let Some(first) = new.as_str().chars().next() {
        if kana::small_vowel(first).is_some() {
            return Err(Error::IllFormedReplacement);
        }
    }

    if old == new {
        return Ok(haystack.clone());
    }

    let limit = maxcount.unwrap_or(usize::MAX);
    if limit == 0 {
        return Ok(haystack.clone());
    }

    if old.is_empty() {
        return replace_empty_old(haystack, new, limit);
    }

    let mut result = MoraStr::empty().clone();
    let mut cursor = 0usize;
    let mut replaced = 0usize;

    while replaced < limit {
        match haystack.find(old, cursor, None) {
            Some(pos) => {
                let before = haystack.slice(cursor as isize, pos as isize, 1)?;
                result = splice(result, &before)?;
                result = splice(result, new)?;
                cursor = pos + old.len();
                replaced += 1;
            }
            None => break,
        }
    }

    let tail = haystack.slice(cursor as isize, haystack.len() as isize, 1)?;
    result = splice(result, &tail)?;
    tracing::debug!(old_len = old.len(), new_len = new.len(), replaced, "replace");
    Ok(result)
}

fn replace_empty_old(haystack: &MoraStr, new: &MoraStr, limit: usize) -> Result<MoraStr, Error> {
    let mut result = MoraStr::empty().clone();
    let mut inserted = 0usize;

    if inserted < limit {
        result = splice(result, new)?;
        inserted += 1;
    }
    for mora in haystack.iter() {
        result = splice(result, &MoraStr::single_mora(mora))?;
        if inserted < limit {
            result = splice(result, new)?;
            inserted += 1;
        }
    }
    tracing::debug!(new_len = new.len(), inserted, "replace (empty needle)");
    Ok(result)
}

impl MoraStr {
    /// Replaces up to `maxcount` non-overlapping occurrences of `old`
    /// with `new`.
    pub fn replace(&self, old: &MoraStr, new: &MoraStr, maxcount: Option<usize>) -> Result<MoraStr, Error> {
        replace(self, old, new, maxcount)
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
    fn replaces_all_occurrences() {
        let h = mora("カタカナカタカナ");
        let old = mora("カタ");
        let new = mora("サシ");
        let r = replace(&h, &old, &new, None).unwrap();
        assert_eq!(r.as_str(), "サシカナサシカナ");
    }

    #[test]
    fn respects_maxcount() {
        let h = mora("カタカナカタカナ");
        let old = mora("カタ");
        let new = mora("サシ");
        let r = replace(&h, &old, &new, Some(1)).unwrap();
        assert_eq!(r.as_str(), "サシカナカタカナ");
    }

    #[test]
    fn empty_old_inserts_between_morae() {
        let h = mora("カナ");
        let new = mora("・");
        let r = replace(&h, &MoraStr::empty().clone(), &new, None).unwrap();
        assert_eq!(r.as_str(), "・カ・ナ・");
    }

    #[test]
    fn rejects_splice_that_rebinds_small_kana_across_the_join() {
        // "カォ" segments as two independent morae ("カ", "ォ") since ォ's
        // rime (O) doesn't match カ's column (A). Replacing カ with コ
        // (column O) would let ォ bind into the new splice, silently
        // collapsing the trailing mora into the replacement -- malformed,
        // not a resegmentation-count drift.
        let h = mora("カォ");
        let old = mora("カ");
        let new = mora("コ");
        assert!(matches!(
            replace(&h, &old, &new, None),
            Err(Error::IllFormedMoraString)
        ));
    }

    #[test]
    fn rejects_replacement_starting_with_small_kana() {
        let h = mora("カナ");
        let old = mora("カ");
        let new = mora("ャ");
        assert!(matches!(
            replace(&h, &old, &new, None),
            Err(Error::IllFormedReplacement)
        ));
    }
}
