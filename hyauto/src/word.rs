//! Words and hyperwords.
use std::{fmt, ops::Deref, sync::Arc};

use indexmap::IndexSet;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::symbol::Symbol;

/// An immutable, finite sequence of symbols.
///
/// Words are shared by reference counting: assigning the same word to
/// several tracks during quantifier search never copies its symbols.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Word(Arc<[Symbol]>);

impl Word {
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self(symbols.into_iter().collect())
    }

    /// Builds a word with one symbol per character of `text`.
    pub fn from_chars(text: &str) -> Self {
        Self(text.chars().map(Symbol::from).collect())
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }
}

impl Deref for Word {
    type Target = [Symbol];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for Word {
    fn from(value: &str) -> Self {
        Word::from_chars(value)
    }
}

impl FromIterator<Symbol> for Word {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Word::new(iter)
    }
}

impl fmt::Display for Word {
    /// Single-character symbols are printed back to back (`abba`), longer
    /// symbols are separated by dots (`req.ack`). The empty word prints as `ε`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("ε");
        }
        let compact = self.0.iter().all(|s| s.as_str().chars().count() == 1);
        for (idx, symbol) in self.0.iter().enumerate() {
            if idx > 0 && !compact {
                f.write_str(".")?;
            }
            f.write_str(symbol.as_str())?;
        }
        Ok(())
    }
}

/// A finite set of words.
///
/// Iteration follows insertion order, which makes the quantifier search
/// reproducible. Inserting a word twice keeps the first occurrence only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Hyperword {
    words: IndexSet<Word>,
}

impl Hyperword {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a hyperword from strings, one symbol per character.
    pub fn from_strs<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        words.into_iter().map(Word::from_chars).collect()
    }

    /// Adds a word, returning false if it was already present.
    pub fn insert(&mut self, word: Word) -> bool {
        self.words.insert(word)
    }

    pub fn contains(&self, word: &Word) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Word> + '_ {
        self.words.iter()
    }
}

impl FromIterator<Word> for Hyperword {
    fn from_iter<I: IntoIterator<Item = Word>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Hyperword {
    type Item = &'a Word;
    type IntoIter = indexmap::set::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

impl fmt::Display for Hyperword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.words.is_empty() {
            return f.write_str("{ }");
        }
        f.write_str("{ ")?;
        for (idx, word) in self.words.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", word)?;
        }
        f.write_str(" }")
    }
}
