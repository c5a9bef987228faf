//! Process-local configuration: the half-width/hankaku pair map and an
//! optional pre-processing converter. Threaded explicitly as `&Context`
//! rather than hidden behind global mutable state.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::kana;

/// Key into the hankaku pair map: either a single character or an
/// ordered pair of characters that together fold to one katakana.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairKey {
    Single(char),
    Pair(char, char),
}

pub(crate) type Converter = dyn Fn(&str) -> Result<String, Error> + Send + Sync;

/// Caller-owned configuration consulted by normalisation. Mutating
/// methods take `&mut self`, so the borrow checker rules out the races
/// that a process-wide global would need runtime discipline to avoid.
#[derive(Clone, Default)]
pub struct Context {
    pair_map: HashMap<PairKey, char>,
    has_pairs: bool,
    converter: Option<Arc<Converter>>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("pair_map", &self.pair_map)
            .field("has_converter", &self.converter.is_some())
            .finish()
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any two-character keys are registered, letting the
    /// normaliser skip the pair-lookup probe entirely when not.
    pub(crate) fn has_pair_keys(&self) -> bool {
        self.has_pairs
    }

    pub(crate) fn lookup_single(&self, c: char) -> Option<char> {
        self.pair_map.get(&PairKey::Single(c)).copied()
    }

    pub(crate) fn lookup_pair(&self, c1: char, c2: char) -> Option<char> {
        self.pair_map.get(&PairKey::Pair(c1, c2)).copied()
    }

    pub(crate) fn converter(&self) -> Option<&Converter> {
        self.converter.as_deref()
    }

    /// Installs `mapping` as the hankaku pair map, replacing whatever was
    /// registered before. Entries whose key is neither one nor two
    /// characters long are returned unconsumed for the caller to handle.
    ///
    /// Each key character must not already be full-width katakana or
    /// hiragana, and each value must be exactly one full-width katakana
    /// character.
    pub fn register(
        &mut self,
        mapping: HashMap<String, String>,
    ) -> Result<HashMap<String, String>, Error> {
        let mut new_map = HashMap::with_capacity(mapping.len());
        let mut has_pairs = false;
        let mut residue = HashMap::new();

        for (key, value) in mapping {
            let mut chars = key.chars();
            let (Some(c1), second, None) = (chars.next(), chars.next(), chars.next()) else {
                residue.insert(key, value);
                continue;
            };

            let mut vchars = value.chars();
            let (Some(vc), None) = (vchars.next(), vchars.next()) else {
                return Err(Error::TypeMismatch);
            };
            if !kana::is_katakana(vc) {
                return Err(Error::TypeMismatch);
            }

            for c in [Some(c1), second].into_iter().flatten() {
                if kana::is_katakana(c) || kana::is_hiragana(c) {
                    return Err(Error::TypeMismatch);
                }
            }

            match second {
                None => {
                    new_map.insert(PairKey::Single(c1), vc);
                }
                Some(c2) => {
                    has_pairs = true;
                    new_map.insert(PairKey::Pair(c1, c2), vc);
                }
            }
        }

        self.pair_map = new_map;
        self.has_pairs = has_pairs;
        Ok(residue)
    }

    /// Installs (or clears, with `None`) a pre-processing callable run
    /// over the whole input string before normalisation proper begins.
    pub fn set_converter<F>(&mut self, f: Option<F>)
    where
        F: Fn(&str) -> Result<String, Error> + Send + Sync + 'static,
    {
        self.converter = f.map(|f| Arc::new(f) as Arc<Converter>);
    }
}
