//! Folds hiragana and registered half-width forms into full-width
//! katakana, optionally running a user-supplied converter first.

use std::borrow::Cow;

use crate::context::Context;
use crate::error::Error;
use crate::kana;

/// Branch-free(-ish) check that four consecutive characters are all
/// already full-width katakana, so a long katakana run can be pushed in
/// one slice copy instead of one `push` per character.
fn all_in_katakana_range4(chars: &[char]) -> bool {
    chars.len() == 4 && chars.iter().all(|&c| kana::is_katakana(c))
}

/// Advances past a run of already-katakana characters starting at `i`,
/// four at a time where possible.
fn skip_katakana(chars: &[char], mut i: usize) -> usize {
    let n = chars.len();
    while i + 4 <= n && all_in_katakana_range4(&chars[i..i + 4]) {
        i += 4;
    }
    while i < n && kana::is_katakana(chars[i]) {
        i += 1;
    }
    i
}

/// Normalises `input` into an all-full-width-katakana `String`.
///
/// When `validate` is `true`, any character that is neither katakana,
/// foldable hiragana, nor covered by a registered hankaku mapping is a
/// hard error; when `false`, such characters are silently dropped.
pub fn normalize(ctx: &Context, input: &str, validate: bool) -> Result<String, Error> {
    let source: Cow<'_, str> = match ctx.converter() {
        Some(conv) => Cow::Owned(conv(input)?),
        None => Cow::Borrowed(input),
    };

    tracing::trace!(
        len = source.len(),
        converted = ctx.converter().is_some(),
        "normalising"
    );

    let chars: Vec<char> = source.chars().collect();
    let n = chars.len();
    let mut out = String::with_capacity(n);
    let mut i = 0;

    while i < n {
        let c = chars[i];

        if kana::is_katakana(c) {
            let end = skip_katakana(&chars, i);
            out.extend(&chars[i..end]);
            i = end;
            continue;
        }

        if let Some(k) = kana::hiragana_to_katakana(c) {
            out.push(k);
            i += 1;
            continue;
        }

        if ctx.has_pair_keys() && i + 1 < n {
            if let Some(k) = ctx.lookup_pair(c, chars[i + 1]) {
                out.push(k);
                i += 2;
                continue;
            }
        }

        if let Some(k) = ctx.lookup_single(c) {
            out.push(k);
            i += 1;
            continue;
        }

        if validate {
            tracing::debug!(ch = ?c, offset = i as u32, "invalid character during normalisation");
            return Err(Error::InvalidCharacter {
                ch: c,
                offset: i as u32,
            });
        }
        i += 1;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn passthrough_katakana() {
        let ctx = Context::new();
        assert_eq!(normalize(&ctx, "カタカナ", true).unwrap(), "カタカナ");
    }

    #[test]
    fn folds_hiragana() {
        let ctx = Context::new();
        assert_eq!(normalize(&ctx, "ひらがな", true).unwrap(), "ヒラガナ");
    }

    #[test]
    fn rejects_unmapped_character_when_validating() {
        let ctx = Context::new();
        let err = normalize(&ctx, "abc", true).unwrap_err();
        assert!(matches!(err, Error::InvalidCharacter { ch: 'a', offset: 0 }));
    }

    #[test]
    fn skips_unmapped_character_when_not_validating() {
        let ctx = Context::new();
        assert_eq!(normalize(&ctx, "aアb", false).unwrap(), "ア");
    }

    #[test]
    fn registered_single_char_mapping() {
        let mut ctx = Context::new();
        let mut map = HashMap::new();
        map.insert("A".to_string(), "ア".to_string());
        ctx.register(map).unwrap();
        assert_eq!(normalize(&ctx, "A", true).unwrap(), "ア");
    }

    #[test]
    fn registered_pair_mapping_takes_priority_over_single() {
        let mut ctx = Context::new();
        let mut map = HashMap::new();
        map.insert("ab".to_string(), "ガ".to_string());
        map.insert("a".to_string(), "ア".to_string());
        ctx.register(map).unwrap();
        assert_eq!(normalize(&ctx, "ab", true).unwrap(), "ガ");
    }
}
