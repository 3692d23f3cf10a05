//! Rotors: a permutation mounted at a rotational offset.
//!
//! Every rotor converts a contact index through its wiring shifted by the
//! current setting (`wrap(permute(wrap(p + setting)) - setting)`). The
//! [`RotorKind`] decides how the rotor takes part in stepping.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::cipher::{Alphabet, Permutation};
use crate::error::CipherError;

/// How a rotor behaves in the stepping mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Never moves on its own; may still be given a setting.
    Fixed,
    /// Driven by a pawl; `notches` are the settings at which it carries.
    Moving {
        /// Notch positions as alphabet indices
        notches: Vec<usize>,
    },
    /// Turns the signal around at the end of the forward pass.
    Reflector,
}

/// Short, stable name for a rotor kind, used in listings and traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RotorClass {
    /// [`RotorKind::Fixed`]
    Fixed,
    /// [`RotorKind::Moving`]
    Moving,
    /// [`RotorKind::Reflector`]
    Reflector,
}

impl fmt::Display for RotorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fixed => "fixed",
            Self::Moving => "moving",
            Self::Reflector => "reflector",
        })
    }
}

/// A named rotor with a mutable setting.
#[derive(Debug, Clone)]
pub struct Rotor {
    name: String,
    permutation: Permutation,
    setting: usize,
    kind: RotorKind,
}

impl Rotor {
    /// A non-moving rotor.
    #[must_use]
    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        Self::with_kind(name.into(), permutation, RotorKind::Fixed)
    }

    /// A pawl-driven rotor that carries at each symbol of `notches`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidNotch`] if a notch symbol is not in the
    /// permutation's alphabet.
    pub fn moving(
        name: impl Into<String>,
        permutation: Permutation,
        notches: &str,
    ) -> Result<Self, CipherError> {
        let name = name.into();
        let alphabet = permutation.alphabet();
        let notches = notches
            .chars()
            .map(|notch| {
                alphabet.to_int(notch).map_err(|_| CipherError::InvalidNotch {
                    rotor: name.clone(),
                    notch,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::with_kind(name, permutation, RotorKind::Moving { notches }))
    }

    /// A reflector. Its permutation must be a derangement.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::NotDerangement`] if any symbol maps to itself.
    pub fn reflector(name: impl Into<String>, permutation: Permutation) -> Result<Self, CipherError> {
        let name = name.into();
        if let Some(fixed) = permutation.first_fixed_point() {
            return Err(CipherError::NotDerangement {
                symbol: permutation.alphabet().symbol(fixed),
                rotor: name,
            });
        }
        Ok(Self::with_kind(name, permutation, RotorKind::Reflector))
    }

    const fn with_kind(name: String, permutation: Permutation, kind: RotorKind) -> Self {
        Self {
            name,
            permutation,
            setting: 0,
            kind,
        }
    }

    /// Rotor name as given in the catalog.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variant data.
    #[must_use]
    pub const fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Variant tag without data.
    #[must_use]
    pub const fn class(&self) -> RotorClass {
        match self.kind {
            RotorKind::Fixed => RotorClass::Fixed,
            RotorKind::Moving { .. } => RotorClass::Moving,
            RotorKind::Reflector => RotorClass::Reflector,
        }
    }

    /// Wiring at setting 0.
    #[must_use]
    pub const fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Alphabet of the wiring.
    #[must_use]
    pub const fn alphabet(&self) -> &Arc<Alphabet> {
        self.permutation.alphabet()
    }

    /// Number of positions.
    #[must_use]
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// Returns `true` iff a pawl drives this rotor.
    #[must_use]
    pub const fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// Returns `true` iff this rotor is a reflector.
    #[must_use]
    pub const fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// Returns `true` iff the current setting is one of the notches.
    #[must_use]
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.setting),
            RotorKind::Fixed | RotorKind::Reflector => false,
        }
    }

    /// Steps the rotor one position. A no-op unless it is a moving rotor.
    pub fn advance(&mut self) {
        if self.rotates() {
            self.setting = (self.setting + 1) % self.size();
        }
    }

    /// Notch symbols, in declaration order. Empty for non-moving rotors.
    #[must_use]
    pub fn notches(&self) -> String {
        match &self.kind {
            RotorKind::Moving { notches } => notches
                .iter()
                .map(|&i| self.alphabet().symbol(i))
                .collect(),
            RotorKind::Fixed | RotorKind::Reflector => String::new(),
        }
    }

    /// Current setting as an index.
    #[must_use]
    pub const fn setting(&self) -> usize {
        self.setting
    }

    /// Current setting as a symbol.
    #[must_use]
    pub fn setting_char(&self) -> char {
        self.alphabet().symbol(self.setting)
    }

    /// Sets the setting to `posn`, wrapped into range.
    pub fn set(&mut self, posn: i64) {
        self.setting = self.permutation.wrap(posn);
    }

    /// Sets the setting to the index of `cposn`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::UnknownSymbol`] if `cposn` is not in the alphabet.
    pub fn set_char(&mut self, cposn: char) -> Result<(), CipherError> {
        self.setting = self.alphabet().to_int(cposn)?;
        Ok(())
    }

    /// Converts contact `p` entering from the right.
    #[must_use]
    pub fn convert_forward(&self, p: usize) -> usize {
        let shift = self.offset();
        let contact = self.permutation.permute(as_signed(p) + shift);
        self.permutation.wrap(as_signed(contact) - shift)
    }

    /// Converts contact `e` entering from the left.
    #[must_use]
    pub fn convert_backward(&self, e: usize) -> usize {
        let shift = self.offset();
        let contact = self.permutation.invert(as_signed(e) + shift);
        self.permutation.wrap(as_signed(contact) - shift)
    }

    fn offset(&self) -> i64 {
        as_signed(self.setting)
    }
}

impl fmt::Display for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rotor {}", self.name)
    }
}

/// Indices are bounded by the alphabet length, so this never saturates in practice.
fn as_signed(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}
