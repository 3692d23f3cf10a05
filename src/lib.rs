//! `enigma` - rotor cipher machine simulator
//!
//! This library models rotor cipher machines of the Enigma family: an
//! alphabet, permutations in cycle notation, fixed, moving and reflecting
//! rotors, and a machine that steps its rotors with ratchet-and-pawl
//! semantics (double step included). Configurations are read from a simple
//! token stream, and a session driver applies setting directives and
//! encodes message lines.

pub mod cipher;
pub mod cli;
pub mod config;
pub mod error;
pub mod machine;
pub mod observability;
pub mod session;
