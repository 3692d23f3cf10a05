//! Cipher primitives
//!
//! The building blocks of a rotor machine: the symbol alphabet, permutations
//! written in cycle notation, and rotors that mount a permutation at a
//! rotational offset.

pub mod alphabet;
pub mod permutation;
pub mod rotor;

pub use alphabet::Alphabet;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorClass, RotorKind};
