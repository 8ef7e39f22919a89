//! Alphabet tokens and the padding sentinel.
//!
//! A [`Symbol`] is an opaque, cheaply clonable token. Transitions do not read
//! symbols directly but [`Letter`]s, which are either a real symbol or the
//! padding sentinel. Padding is a distinct variant rather than a reserved
//! symbol value, so it can never be mistaken for a member of the alphabet.
use std::{fmt, sync::Arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumTryAs};

/// Textual spelling of the padding token in definitions and listings.
pub const PADDING_TOKEN: &str = "#";

/// An atomic alphabet token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this symbol is spelled like the padding token.
    ///
    /// Such a symbol is rejected from alphabets, see
    /// [`crate::utils::Malformation::PaddingInAlphabet`].
    pub fn is_padding_spelling(&self) -> bool {
        &*self.0 == PADDING_TOKEN
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Symbol(Arc::from(value))
    }
}

impl From<char> for Symbol {
    fn from(value: char) -> Self {
        let mut buf = [0u8; 4];
        Symbol::new(value.encode_utf8(&mut buf))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of a transition tuple: either a real symbol or padding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Letter {
    /// Consume this symbol from the track.
    Sym(Symbol),
    /// Consume nothing from the track.
    ///
    /// In synchronous runs padding is only offered by exhausted tracks. In
    /// asynchronous runs it lets the track idle for one step.
    Pad,
}

impl Letter {
    /// Parses the textual form used in definitions: [`PADDING_TOKEN`] is
    /// padding, anything else is a symbol.
    pub fn parse(text: &str) -> Self {
        if text == PADDING_TOKEN {
            Letter::Pad
        } else {
            Letter::Sym(Symbol::new(text))
        }
    }

    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            Letter::Sym(symbol) => Some(symbol),
            Letter::Pad => None,
        }
    }
}

impl From<Symbol> for Letter {
    fn from(value: Symbol) -> Self {
        Letter::Sym(value)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Letter::Sym(symbol) => symbol.fmt(f),
            Letter::Pad => f.write_str(PADDING_TOKEN),
        }
    }
}
