//! Prolonged-sound-mark (chōonpu, ー) folding and unfolding.

use crate::context::Context;
use crate::error::Error;
use crate::kana::{self, Column};
use crate::mora_str::MoraStr;
use crate::normalize::normalize;
use crate::segment::segment;

fn vowel_char_for_column(col: Column) -> char {
    match col {
        Column::A => 'ア',
        Column::I => 'イ',
        Column::U => 'ウ',
        Column::E => 'エ',
        Column::O => 'オ',
        Column::N => 'ン',
    }
}

fn vowel_to_choon_chars(
    chars: &[char],
    maxrep: Option<usize>,
    ou: bool,
    ei: bool,
    nn: bool,
) -> Vec<char> {
    let mut out = chars.to_vec();
    let limit = maxrep.unwrap_or(usize::MAX);
    let mut rep_count = 0usize;
    let mut ei_used = false;
    let mut ou_used = false;

    for i in 1..chars.len() {
        let prev_col = kana::column(chars[i - 1]);
        let cur = chars[i];
        let cur_col = kana::column(cur);
        let mut replaced = false;

        // Each rule tracks its own independent run: the counter/flag only
        // carries across consecutive characters that keep that rule's
        // condition true, and resets the moment the condition breaks, so a
        // later unrelated occurrence gets a fresh budget.
        let vowel_repeat = prev_col.is_some()
            && prev_col == cur_col
            && matches!(cur, 'ァ' | 'ア' | 'ィ' | 'イ' | 'ゥ' | 'ウ' | 'ェ' | 'エ' | 'ォ' | 'オ');
        let nn_repeat = nn && chars[i - 1] == 'ン' && cur == 'ン';

        if vowel_repeat || nn_repeat {
            if rep_count < limit {
                out[i] = 'ー';
                rep_count += 1;
                replaced = true;
            }
        } else {
            rep_count = 0;
        }

        let ei_repeat = ei && prev_col == Some(Column::E) && matches!(cur, 'ィ' | 'イ');
        if ei_repeat {
            if !replaced && !ei_used {
                out[i] = 'ー';
                ei_used = true;
                replaced = true;
            }
        } else {
            ei_used = false;
        }

        let ou_repeat = ou && prev_col == Some(Column::O) && matches!(cur, 'ゥ' | 'ウ');
        if ou_repeat {
            if !replaced && !ou_used {
                out[i] = 'ー';
                ou_used = true;
            }
        } else {
            ou_used = false;
        }
    }
    out
}

fn choon_to_vowel_chars(chars: &[char], strict: bool) -> Result<Vec<char>, Error> {
    let mut out = chars.to_vec();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != 'ー' {
            i += 1;
            continue;
        }
        let run_start = i;
        let mut j = i;
        while j < chars.len() && chars[j] == 'ー' {
            j += 1;
        }
        let before_col = if run_start == 0 {
            None
        } else {
            kana::column(chars[run_start - 1])
        };
        match before_col {
            Some(col) => {
                let vowel = vowel_char_for_column(col);
                for k in run_start..j {
                    out[k] = vowel;
                }
            }
            None => {
                if strict {
                    tracing::debug!("prolonged sound mark has no preceding katakana");
                    return Err(Error::DanglingProlongedMark);
                }
            }
        }
        i = j;
    }
    Ok(out)
}

/// Folds long-vowel sequences in `s` into chōonpu (ー).
pub fn vowel_to_choon_str(
    ctx: &Context,
    s: &str,
    maxrep: Option<usize>,
    clean: bool,
    ou: bool,
    ei: bool,
    nn: bool,
) -> Result<String, Error> {
    let chars: Vec<char> = s.chars().collect();
    let folded: String = vowel_to_choon_chars(&chars, maxrep, ou, ei, nn).into_iter().collect();
    if clean {
        normalize(ctx, &folded, false)
    } else {
        Ok(folded)
    }
}

/// As [`vowel_to_choon_str`], operating on (and returning) a `MoraStr`;
/// the transform must not change the mora count.
pub fn vowel_to_choon_mora(
    ctx: &Context,
    s: &MoraStr,
    maxrep: Option<usize>,
    clean: bool,
    ou: bool,
    ei: bool,
    nn: bool,
) -> Result<MoraStr, Error> {
    let folded = vowel_to_choon_str(ctx, s.as_str(), maxrep, clean, ou, ei, nn)?;
    let (boundaries, _) = segment(&folded)?;
    if boundaries.len() != s.len() {
        return Err(Error::MoraLengthInconsistency);
    }
    Ok(MoraStr::from_parts(folded, boundaries))
}

/// Expands every chōonpu in `s` back into the vowel matching the
/// preceding katakana's column.
pub fn choon_to_vowel_str(
    ctx: &Context,
    s: &str,
    strict: bool,
    clean: bool,
) -> Result<String, Error> {
    let chars: Vec<char> = s.chars().collect();
    let unfolded: String = choon_to_vowel_chars(&chars, strict)?.into_iter().collect();
    if clean {
        normalize(ctx, &unfolded, false)
    } else {
        Ok(unfolded)
    }
}

/// As [`choon_to_vowel_str`], operating on (and returning) a `MoraStr`;
/// the transform must not change the mora count.
pub fn choon_to_vowel_mora(
    ctx: &Context,
    s: &MoraStr,
    strict: bool,
    clean: bool,
) -> Result<MoraStr, Error> {
    let unfolded = choon_to_vowel_str(ctx, s.as_str(), strict, clean)?;
    let (boundaries, _) = segment(&unfolded)?;
    if boundaries.len() != s.len() {
        return Err(Error::MoraLengthInconsistency);
    }
    Ok(MoraStr::from_parts(unfolded, boundaries))
}

impl MoraStr {
    /// Folds long-vowel sequences into chōonpu, preserving mora count.
    pub fn vowel_to_choon(
        &self,
        ctx: &Context,
        maxrep: Option<usize>,
        clean: bool,
        ou: bool,
        ei: bool,
        nn: bool,
    ) -> Result<MoraStr, Error> {
        vowel_to_choon_mora(ctx, self, maxrep, clean, ou, ei, nn)
    }

    /// Expands chōonpu back into vowels, preserving mora count.
    pub fn choon_to_vowel(&self, ctx: &Context, strict: bool, clean: bool) -> Result<MoraStr, Error> {
        choon_to_vowel_mora(ctx, self, strict, clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_same_column_run() {
        let ctx = Context::new();
        // カー <- same-column ア after カ (column A) folds to ー.
        let s = vowel_to_choon_str(&ctx, "カア", None, false, false, false, false).unwrap();
        assert_eq!(s, "カー");
    }

    #[test]
    fn ei_rule_folds_each_independent_occurrence() {
        let ctx = Context::new();
        let s = vowel_to_choon_str(&ctx, "ケイケイ", None, false, false, true, false).unwrap();
        // the ei rule is one-shot per run, not one-shot for the whole
        // string: the two ケイ occurrences are independent runs and each
        // folds once.
        assert_eq!(s, "ケーケー");
    }

    #[test]
    fn maxrep_resets_per_independent_run() {
        let ctx = Context::new();
        let s = vowel_to_choon_str(&ctx, "カアカア", Some(1), false, false, false, false).unwrap();
        // カ between the two runs breaks the vowel-repeat run, so the
        // second カア gets its own maxrep budget rather than inheriting
        // the first run's exhausted counter.
        assert_eq!(s, "カーカー");
    }

    #[test]
    fn unfolds_choon_run() {
        let ctx = Context::new();
        let s = choon_to_vowel_str(&ctx, "カー", false, false).unwrap();
        assert_eq!(s, "カア");
    }

    #[test]
    fn dangling_choon_is_strict_error() {
        let ctx = Context::new();
        let err = choon_to_vowel_str(&ctx, "ーカ", true, false).unwrap_err();
        assert!(matches!(err, Error::DanglingProlongedMark));
    }

    #[test]
    fn dangling_choon_is_left_alone_when_not_strict() {
        let ctx = Context::new();
        let s = choon_to_vowel_str(&ctx, "ーカ", false, false).unwrap();
        assert_eq!(s, "ーカ");
    }

    #[test]
    fn mora_variant_preserves_count() {
        let ctx = Context::new();
        let m = MoraStr::new(&ctx, "カア", false).unwrap();
        let r = vowel_to_choon_mora(&ctx, &m, None, false, false, false, false).unwrap();
        assert_eq!(r.len(), m.len());
        assert_eq!(r.as_str(), "カー");
    }
}
