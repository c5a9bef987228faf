//! Kana classification: column assignment and small-kana rime vowels for
//! the full-width katakana block (U+30A0..U+30FF).

/// The five vowel columns of the gojūon table, plus the moraic nasal.
///
/// Values double as the "rime" a small kana contributes when it binds to
/// the mora before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Column {
    A = 1,
    I = 2,
    U = 3,
    E = 4,
    O = 5,
    N = 8,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    column: Option<Column>,
    small: Option<Column>,
}

const fn e(column: Option<Column>, small: Option<Column>) -> Entry {
    Entry { column, small }
}

const A: Option<Column> = Some(Column::A);
const I: Option<Column> = Some(Column::I);
const U: Option<Column> = Some(Column::U);
const EE: Option<Column> = Some(Column::E);
const O: Option<Column> = Some(Column::O);
const N: Option<Column> = Some(Column::N);
const X: Option<Column> = None;

/// Base offset of the katakana window this table covers.
const KATAKANA_OFF: u32 = 0x30a0;
const KATAKANA_RNG: usize = 96;

// Indexed by `c as u32 - KATAKANA_OFF`. Small-kana glides get a `small`
// rime distinct from their own `column` where the reference table
// conflates the two incorrectly (ャ/ュ/ョ/ヮ) -- see DESIGN.md.
#[rustfmt::skip]
static TABLE: [Entry; KATAKANA_RNG] = [
    e(X, X),    /* ゠ */  e(A, A),    /* ァ */  e(A, X),    /* ア */  e(I, I),    /* ィ */
    e(I, X),    /* イ */  e(U, U),    /* ゥ */  e(U, X),    /* ウ */  e(EE, EE),  /* ェ */
    e(EE, X),   /* エ */  e(O, O),    /* ォ */  e(O, X),    /* オ */  e(A, X),    /* カ */
    e(A, X),    /* ガ */  e(I, X),    /* キ */  e(I, X),    /* ギ */  e(U, X),    /* ク */
    e(U, X),    /* グ */  e(EE, X),   /* ケ */  e(EE, X),   /* ゲ */  e(O, X),    /* コ */
    e(O, X),    /* ゴ */  e(A, X),    /* サ */  e(A, X),    /* ザ */  e(I, X),    /* シ */
    e(I, X),    /* ジ */  e(U, X),    /* ス */  e(U, X),    /* ズ */  e(EE, X),   /* セ */
    e(EE, X),   /* ゼ */  e(O, X),    /* ソ */  e(O, X),    /* ゾ */  e(A, X),    /* タ */
    e(A, X),    /* ダ */  e(I, X),    /* チ */  e(I, X),    /* ヂ */  e(X, X),    /* ッ */
    e(U, X),    /* ツ */  e(U, X),    /* ヅ */  e(EE, X),   /* テ */  e(EE, X),   /* デ */
    e(O, X),    /* ト */  e(O, X),    /* ド */  e(A, X),    /* ナ */  e(I, X),    /* ニ */
    e(U, X),    /* ヌ */  e(EE, X),   /* ネ */  e(O, X),    /* ノ */  e(A, X),    /* ハ */
    e(A, X),    /* バ */  e(A, X),    /* パ */  e(I, X),    /* ヒ */  e(I, X),    /* ビ */
    e(I, X),    /* ピ */  e(U, X),    /* フ */  e(U, X),    /* ブ */  e(U, X),    /* プ */
    e(EE, X),   /* ヘ */  e(EE, X),   /* ベ */  e(EE, X),   /* ペ */  e(O, X),    /* ホ */
    e(O, X),    /* ボ */  e(O, X),    /* ポ */  e(A, X),    /* マ */  e(I, X),    /* ミ */
    e(U, X),    /* ム */  e(EE, X),   /* メ */  e(O, X),    /* モ */  e(A, I),    /* ャ */
    e(A, X),    /* ヤ */  e(U, I),    /* ュ */  e(U, X),    /* ユ */  e(O, I),    /* ョ */
    e(O, X),    /* ヨ */  e(A, X),    /* ラ */  e(I, X),    /* リ */  e(U, X),    /* ル */
    e(EE, X),   /* レ */  e(O, X),    /* ロ */  e(A, U),    /* ヮ */  e(A, X),    /* ワ */
    e(I, X),    /* ヰ */  e(EE, X),   /* ヱ */  e(O, X),    /* ヲ */  e(N, X),    /* ン */
    e(U, X),    /* ヴ */  e(X, X),    /* ヵ */  e(X, X),    /* ヶ */  e(A, X),    /* ヷ */
    e(I, X),    /* ヸ */  e(EE, X),   /* ヹ */  e(O, X),    /* ヺ */  e(X, X),    /* ・ */
    e(X, X),    /* ー */  e(X, X),    /* ヽ */  e(X, X),    /* ヾ */  e(X, X),    /* ヿ */
];

fn entry(c: char) -> Option<&'static Entry> {
    let code = c as u32;
    let idx = code.checked_sub(KATAKANA_OFF)?;
    TABLE.get(idx as usize)
}

/// The gojūon column of `c`, or `None` if `c` is not a classified katakana.
pub fn column(c: char) -> Option<Column> {
    entry(c)?.column
}

/// The rime vowel a small kana contributes to the mora it binds to, or
/// `None` if `c` is not a small kana.
pub fn small_vowel(c: char) -> Option<Column> {
    entry(c)?.small
}

/// Whether `c` is a valid character inside a `MoraStr`'s backing string:
/// full-width katakana in U+30A1..=U+30FE, excluding the block's two
/// boundary punctuation marks (゠ and ヿ).
pub fn is_katakana(c: char) -> bool {
    matches!(c as u32, 0x30a1..=0x30fe)
}

/// Whether `c` is hiragana in the ranges the normaliser folds into
/// katakana (U+3041..=U+3096, U+309D..=U+309E).
pub fn is_hiragana(c: char) -> bool {
    matches!(c as u32, 0x3041..=0x3096 | 0x309d..=0x309e)
}

/// Shifts a hiragana code point into its katakana counterpart.
pub fn hiragana_to_katakana(c: char) -> Option<char> {
    if is_hiragana(c) {
        char::from_u32(c as u32 + 0x60)
    } else {
        None
    }
}

/// Index of `c` into the 96-entry katakana window, used as the table key
/// by the search algorithms' per-character bitmasks and skip tables.
pub fn kana_id(c: char) -> Option<usize> {
    let id = (c as u32).checked_sub(KATAKANA_OFF)? as usize;
    (id < KATAKANA_RNG).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_of_a_row() {
        assert_eq!(column('ア'), Some(Column::A));
        assert_eq!(column('イ'), Some(Column::I));
        assert_eq!(column('ウ'), Some(Column::U));
        assert_eq!(column('エ'), Some(Column::E));
        assert_eq!(column('オ'), Some(Column::O));
        assert_eq!(column('ン'), Some(Column::N));
    }

    #[test]
    fn unclassified_punctuation() {
        assert_eq!(column('ッ'), None);
        assert_eq!(column('ー'), None);
        assert_eq!(column('・'), None);
        assert_eq!(column('ヵ'), None);
        assert_eq!(column('ヶ'), None);
    }

    #[test]
    fn small_glide_rimes() {
        assert_eq!(small_vowel('ャ'), Some(Column::I));
        assert_eq!(small_vowel('ュ'), Some(Column::I));
        assert_eq!(small_vowel('ョ'), Some(Column::I));
        assert_eq!(small_vowel('ヮ'), Some(Column::U));
        assert_eq!(small_vowel('ァ'), Some(Column::A));
        assert_eq!(small_vowel('ィ'), Some(Column::I));
        assert_eq!(small_vowel('ゥ'), Some(Column::U));
        assert_eq!(small_vowel('ェ'), Some(Column::E));
        assert_eq!(small_vowel('ォ'), Some(Column::O));
    }

    #[test]
    fn large_kana_has_no_rime() {
        assert_eq!(small_vowel('ア'), None);
        assert_eq!(small_vowel('キ'), None);
    }

    #[test]
    fn hiragana_folds_to_katakana() {
        assert_eq!(hiragana_to_katakana('あ'), Some('ア'));
        assert_eq!(hiragana_to_katakana('ん'), Some('ン'));
        assert_eq!(hiragana_to_katakana('ア'), None);
    }

    #[test]
    fn valid_mora_char_range() {
        assert!(is_katakana('ア'));
        assert!(is_katakana('ッ'));
        assert!(is_katakana('ー'));
        assert!(!is_katakana('゠'));
        assert!(!is_katakana('ヿ'));
        assert!(!is_katakana('あ'));
    }
}
