//! Mora-aware Japanese kana strings: segmentation, mora-aligned search,
//! replace, and prolonged-sound-mark folding.

mod choon;
mod context;
mod count_all;
mod error;
mod finditer;
mod kana;
mod mora_str;
mod normalize;
mod replace;
mod search;
mod search_ops;
mod segment;

pub use self::choon::{choon_to_vowel_str, vowel_to_choon_str};
pub use self::context::Context;
pub use self::count_all::count_all;
pub use self::error::{Error, Warning};
pub use self::finditer::FindIter;
pub use self::kana::Column;
pub use self::mora_str::MoraStr;
