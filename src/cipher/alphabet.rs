//! Symbol alphabets.
//!
//! An [`Alphabet`] is an ordered set of distinct characters; a symbol's
//! position in that order is its index everywhere else in the crate.

use std::collections::HashMap;
use std::fmt;

use crate::error::CipherError;

/// The 26 uppercase Latin letters, the default machine alphabet.
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Characters the cycle and directive grammars use structurally.
const RESERVED: [char; 3] = ['(', ')', '*'];

/// Bidirectional mapping between symbols and their indices.
///
/// Immutable once built; share it with `Arc` between the permutations and
/// rotors that are defined over it.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    indices: HashMap<char, usize>,
}

impl Alphabet {
    /// Builds an alphabet from the characters of `chars`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::EmptyAlphabet`] for an empty string,
    /// [`CipherError::DuplicateSymbol`] if a character repeats, and
    /// [`CipherError::ReservedSymbol`] for whitespace, `(`, `)` or `*`.
    pub fn new(chars: &str) -> Result<Self, CipherError> {
        let mut symbols = Vec::with_capacity(chars.len());
        let mut indices = HashMap::with_capacity(chars.len());

        for symbol in chars.chars() {
            if symbol.is_whitespace() || RESERVED.contains(&symbol) {
                return Err(CipherError::ReservedSymbol { symbol });
            }
            if indices.insert(symbol, symbols.len()).is_some() {
                return Err(CipherError::DuplicateSymbol { symbol });
            }
            symbols.push(symbol);
        }

        if symbols.is_empty() {
            return Err(CipherError::EmptyAlphabet);
        }

        Ok(Self { symbols, indices })
    }

    /// Number of symbols.
    #[must_use]
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if `symbol` is a member.
    #[must_use]
    pub fn contains(&self, symbol: char) -> bool {
        self.indices.contains_key(&symbol)
    }

    /// Returns the symbol at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::IndexOutOfDomain`] unless `index < size()`.
    pub fn to_char(&self, index: usize) -> Result<char, CipherError> {
        self.symbols
            .get(index)
            .copied()
            .ok_or(CipherError::IndexOutOfDomain {
                index,
                size: self.size(),
            })
    }

    /// Returns the index of `symbol`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::UnknownSymbol`] if `symbol` is not a member.
    pub fn to_int(&self, symbol: char) -> Result<usize, CipherError> {
        self.indices
            .get(&symbol)
            .copied()
            .ok_or(CipherError::UnknownSymbol { symbol })
    }

    /// Reduces any integer into `[0, size)`.
    #[must_use]
    pub fn wrap(&self, p: i64) -> usize {
        // size() is at least 1 and bounded by the input string length
        let size = i64::try_from(self.size()).unwrap_or(i64::MAX);
        usize::try_from(p.rem_euclid(size)).unwrap_or_default()
    }

    /// Symbol at an index already known to be in range.
    pub(crate) fn symbol(&self, index: usize) -> char {
        self.symbols[index]
    }

    /// Iterates over the symbols in index order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        let symbols: Vec<char> = UPPERCASE.chars().collect();
        let indices = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { symbols, indices }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alphabet({self})")
    }
}
