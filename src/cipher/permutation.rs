//! Permutations in cycle notation.
//!
//! A [`Permutation`] is parsed from a string such as `"(AELTPHQXRU) (BKNW)"`
//! and stored as a pair of lookup tables (forward and inverse), so both
//! directions are O(1).

use std::fmt;
use std::sync::Arc;

use crate::cipher::Alphabet;
use crate::error::CipherError;

/// A bijection on the indices of an [`Alphabet`].
///
/// Invariant: `forward` and `inverse` are total bijections on `[0, size)`
/// and are inverses of each other.
#[derive(Clone, PartialEq, Eq)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
    cycles: Vec<Vec<usize>>,
}

impl Permutation {
    /// Parses `cycles` over `alphabet`.
    ///
    /// Each parenthesized group maps every symbol to the next one in the
    /// group, the last wrapping to the first. Symbols in no group map to
    /// themselves. Whitespace between groups is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedCycle`] if a group is unclosed or
    /// nested, text appears outside a group, a symbol repeats, or a symbol is
    /// not in the alphabet.
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self, CipherError> {
        let groups = parse_cycles(cycles, &alphabet)?;
        let size = alphabet.size();

        let mut forward: Vec<usize> = (0..size).collect();
        for group in &groups {
            for (pos, &from) in group.iter().enumerate() {
                forward[from] = group[(pos + 1) % group.len()];
            }
        }

        let mut inverse = vec![0; size];
        for (from, &to) in forward.iter().enumerate() {
            inverse[to] = from;
        }

        Ok(Self {
            alphabet,
            forward,
            inverse,
            cycles: groups,
        })
    }

    /// The identity permutation over `alphabet`.
    #[must_use]
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let forward: Vec<usize> = (0..alphabet.size()).collect();
        Self {
            inverse: forward.clone(),
            forward,
            alphabet,
            cycles: Vec::new(),
        }
    }

    /// Size of the underlying alphabet.
    #[must_use]
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// The alphabet this permutation is defined over.
    #[must_use]
    pub const fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Reduces `p` modulo the alphabet size into `[0, size)`.
    #[must_use]
    pub fn wrap(&self, p: i64) -> usize {
        self.alphabet.wrap(p)
    }

    /// Applies the permutation to `p`, wrapped into range first.
    #[must_use]
    pub fn permute(&self, p: i64) -> usize {
        self.forward[self.wrap(p)]
    }

    /// Applies the inverse permutation to `c`, wrapped into range first.
    #[must_use]
    pub fn invert(&self, c: i64) -> usize {
        self.inverse[self.wrap(c)]
    }

    /// Character form of [`permute`](Self::permute).
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::UnknownSymbol`] if `p` is not in the alphabet.
    pub fn permute_char(&self, p: char) -> Result<char, CipherError> {
        let index = self.alphabet.to_int(p)?;
        Ok(self.alphabet.symbol(self.forward[index]))
    }

    /// Character form of [`invert`](Self::invert).
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::UnknownSymbol`] if `c` is not in the alphabet.
    pub fn invert_char(&self, c: char) -> Result<char, CipherError> {
        let index = self.alphabet.to_int(c)?;
        Ok(self.alphabet.symbol(self.inverse[index]))
    }

    /// Returns `true` iff no index maps to itself.
    #[must_use]
    pub fn derangement(&self) -> bool {
        self.first_fixed_point().is_none()
    }

    /// First index that maps to itself, if any.
    #[must_use]
    pub fn first_fixed_point(&self) -> Option<usize> {
        self.forward
            .iter()
            .enumerate()
            .find_map(|(i, &to)| (i == to).then_some(i))
    }

    /// Returns `true` iff applying the permutation twice is the identity.
    #[must_use]
    pub fn is_involution(&self) -> bool {
        self.forward == self.inverse
    }

    /// The cycle notation this permutation was parsed from, normalized.
    #[must_use]
    pub fn cycles(&self) -> String {
        self.cycles
            .iter()
            .map(|group| {
                let body: String = group.iter().map(|&i| self.alphabet.symbol(i)).collect();
                format!("({body})")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Debug for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Permutation")
            .field("alphabet", &self.alphabet)
            .field("cycles", &self.cycles())
            .finish()
    }
}

/// Splits cycle notation into groups of alphabet indices.
fn parse_cycles(cycles: &str, alphabet: &Alphabet) -> Result<Vec<Vec<usize>>, CipherError> {
    let malformed = |reason: String| CipherError::MalformedCycle {
        cycles: cycles.to_string(),
        reason,
    };

    let mut seen = vec![false; alphabet.size()];
    let mut groups = Vec::new();
    let mut current: Option<Vec<usize>> = None;

    for ch in cycles.chars() {
        match (ch, current.as_mut()) {
            ('(', None) => current = Some(Vec::new()),
            ('(', Some(_)) => return Err(malformed("nested '('".to_string())),
            (')', Some(_)) => groups.extend(current.take()),
            (')', None) => return Err(malformed("')' without matching '('".to_string())),
            (c, None) if c.is_whitespace() => {}
            (c, None) => return Err(malformed(format!("'{c}' outside of a cycle"))),
            (c, Some(_)) if c.is_whitespace() => {
                return Err(malformed("whitespace inside a cycle".to_string()));
            }
            (c, Some(group)) => {
                let index = alphabet
                    .to_int(c)
                    .map_err(|_| malformed(format!("symbol '{c}' is not in the alphabet")))?;
                if std::mem::replace(&mut seen[index], true) {
                    return Err(malformed(format!("symbol '{c}' appears more than once")));
                }
                group.push(index);
            }
        }
    }

    if current.is_some() {
        return Err(malformed("no closing ')'".to_string()));
    }

    groups.retain(|group| !group.is_empty());
    Ok(groups)
}
