//! Typed machine configuration.
//!
//! A [`MachineConfig`] is the parsed, not yet validated, form of a
//! configuration stream. It keeps rotor wirings as cycle strings so that the
//! validator can report every bad descriptor with its position before any
//! primitive is built.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::cipher::{Alphabet, Permutation, Rotor};
use crate::error::ConfigError;
use crate::machine::Machine;

// ============================================================================
// Machine Configuration
// ============================================================================

/// A parsed machine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineConfig {
    /// Alphabet symbols in index order.
    pub alphabet: String,

    /// Number of rotor slots, reflector included.
    pub num_rotors: usize,

    /// Number of pawls (moving rotors per arrangement).
    pub pawls: usize,

    /// Every available rotor, in file order.
    pub rotors: Vec<RotorDescriptor>,
}

/// One rotor as described in the configuration stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotorDescriptor {
    /// Rotor name, unique within the configuration.
    pub name: String,

    /// Stepping behaviour.
    #[serde(flatten)]
    pub kind: RotorType,

    /// Wiring in cycle notation, groups separated by single spaces.
    pub cycles: String,
}

/// Rotor type token: `R`, `N` or `M` followed by the notch symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RotorType {
    /// `R`: a reflector.
    Reflector,

    /// `N`: a non-moving rotor.
    Fixed,

    /// `M<notches>`: a pawl-driven rotor.
    Moving {
        /// Notch symbols, possibly empty.
        notches: String,
    },
}

impl RotorType {
    /// Parses a type token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] unless the token is `R`, `N`, or
    /// starts with `M`.
    pub fn parse(rotor: &str, token: &str) -> Result<Self, ConfigError> {
        match token.split_at_checked(1) {
            Some(("M", notches)) => Ok(Self::Moving {
                notches: notches.to_string(),
            }),
            Some(("N", "")) => Ok(Self::Fixed),
            Some(("R", "")) => Ok(Self::Reflector),
            _ => Err(ConfigError::InvalidValue {
                field: format!("rotors.{rotor}.type"),
                value: token.to_string(),
                expected: "R, N, or M followed by notch symbols".to_string(),
            }),
        }
    }
}

impl fmt::Display for RotorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reflector => f.write_str("R"),
            Self::Fixed => f.write_str("N"),
            Self::Moving { notches } => write!(f, "M{notches}"),
        }
    }
}

impl RotorDescriptor {
    /// Builds the rotor over `alphabet`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Cipher`] for a malformed wiring, a notch outside
    /// the alphabet, or a reflector with a fixed point.
    pub fn build(&self, alphabet: &Arc<Alphabet>) -> Result<Rotor, ConfigError> {
        let permutation = Permutation::new(&self.cycles, Arc::clone(alphabet))?;
        let rotor = match &self.kind {
            RotorType::Reflector => Rotor::reflector(&self.name, permutation)?,
            RotorType::Fixed => Rotor::fixed(&self.name, permutation),
            RotorType::Moving { notches } => Rotor::moving(&self.name, permutation, notches)?,
        };
        Ok(rotor)
    }
}

impl MachineConfig {
    /// Builds the shared alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Cipher`] if the alphabet is empty, repeats a
    /// symbol, or uses a reserved character.
    pub fn alphabet(&self) -> Result<Arc<Alphabet>, ConfigError> {
        Ok(Arc::new(Alphabet::new(&self.alphabet)?))
    }

    /// Builds an unarranged [`Machine`] holding every described rotor.
    ///
    /// # Errors
    ///
    /// Returns the first primitive or machine construction error.
    pub fn build(&self) -> Result<Machine, ConfigError> {
        let alphabet = self.alphabet()?;
        let rotors = self
            .rotors
            .iter()
            .map(|descriptor| descriptor.build(&alphabet))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Machine::new(alphabet, self.num_rotors, self.pawls, rotors)?)
    }

    /// Number of descriptors of each kind: (reflectors, fixed, moving).
    #[must_use]
    pub fn kind_counts(&self) -> (usize, usize, usize) {
        self.rotors
            .iter()
            .fold((0, 0, 0), |(r, f, m), d| match d.kind {
                RotorType::Reflector => (r + 1, f, m),
                RotorType::Fixed => (r, f + 1, m),
                RotorType::Moving { .. } => (r, f, m + 1),
            })
    }
}
