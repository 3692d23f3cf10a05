//! Setting directives.
//!
//! A directive line looks like `* B Beta III IV I AXLE (HQ) (EX)`: the rotor
//! names reflector first, the initial positions of the non-reflector slots,
//! then optional plugboard cycles.

use std::fmt;

use serde::Serialize;

use crate::error::ConfigError;

/// Marker that opens a directive line.
pub const DIRECTIVE_MARKER: char = '*';

/// A parsed setting directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingDirective {
    /// Rotor names, reflector first.
    pub rotors: Vec<String>,

    /// Initial positions of slots 1..N-1.
    pub positions: String,

    /// Plugboard cycles, possibly empty.
    pub plugboard: String,
}

impl SettingDirective {
    /// Returns `true` if `line` is a setting directive rather than a message.
    #[must_use]
    pub fn is_directive(line: &str) -> bool {
        line.starts_with(DIRECTIVE_MARKER)
    }

    /// Parses a directive for a machine with `num_rotors` slots.
    ///
    /// The marker may be followed directly by the first rotor name.
    /// Everything after the position string is taken as plugboard cycles.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] if the line does not start with
    /// the marker or has fewer than `num_rotors + 1` tokens after it.
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidSetting {
            line: line.to_string(),
            message,
        };

        let rest = line
            .strip_prefix(DIRECTIVE_MARKER)
            .ok_or_else(|| invalid(format!("directive must start with '{DIRECTIVE_MARKER}'")))?;

        let mut tokens = rest.split_whitespace();
        let rotors: Vec<String> = tokens.by_ref().take(num_rotors).map(str::to_string).collect();
        if rotors.len() < num_rotors {
            return Err(invalid(format!(
                "expected {num_rotors} rotor names, found {}",
                rotors.len()
            )));
        }

        let positions = tokens
            .next()
            .ok_or_else(|| invalid("missing rotor positions".to_string()))?
            .to_string();
        let plugboard = tokens.collect::<Vec<_>>().join(" ");

        Ok(Self {
            rotors,
            positions,
            plugboard,
        })
    }
}

impl fmt::Display for SettingDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DIRECTIVE_MARKER} {} {}", self.rotors.join(" "), self.positions)?;
        if !self.plugboard.is_empty() {
            write!(f, " {}", self.plugboard)?;
        }
        Ok(())
    }
}
