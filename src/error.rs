//! Error types for `enigma`
//!
//! Each layer owns an error enum (cipher primitives, machine, configuration,
//! session). [`EnigmaError`] aggregates them and maps each to a process exit
//! code for the CLI.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `enigma` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (truncated stream, bad rotor descriptor, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Machine error (unknown rotor, wrong rotor mix, bad setting)
    pub const MACHINE_ERROR: i32 = 4;

    /// Session error (message before any setting directive)
    pub const SESSION_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `enigma` operations.
///
/// This enum aggregates all domain-specific errors and provides
/// a unified interface for error handling and exit code mapping.
#[derive(Debug, Error)]
pub enum EnigmaError {
    /// Alphabet, permutation or rotor construction error
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Machine arrangement or encoding error
    #[error(transparent)]
    Machine(#[from] MachineError),

    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Message processing error
    #[error(transparent)]
    Session(#[from] SessionError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EnigmaError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Cipher(_) => ExitCode::CONFIG_ERROR,
            Self::Machine(_) => ExitCode::MACHINE_ERROR,
            Self::Session(SessionError::Machine { .. }) => ExitCode::MACHINE_ERROR,
            Self::Session(SessionError::Io(_)) => ExitCode::IO_ERROR,
            Self::Session(_) => ExitCode::SESSION_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Cipher Primitive Errors
// ============================================================================

/// Errors raised while building or querying alphabets, permutations and rotors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// The alphabet string was empty
    #[error("alphabet must contain at least one symbol")]
    EmptyAlphabet,

    /// The alphabet string repeats a symbol
    #[error("duplicate symbol '{symbol}' in alphabet")]
    DuplicateSymbol {
        /// The repeated symbol
        symbol: char,
    },

    /// The alphabet contains a character the cycle or directive grammar reserves
    #[error("symbol {symbol:?} is reserved and cannot appear in an alphabet")]
    ReservedSymbol {
        /// The reserved character
        symbol: char,
    },

    /// A symbol is not a member of the alphabet
    #[error("symbol '{symbol}' is not in the alphabet")]
    UnknownSymbol {
        /// The offending symbol
        symbol: char,
    },

    /// An index lies outside `[0, size)`
    #[error("index {index} is outside the alphabet domain [0, {size})")]
    IndexOutOfDomain {
        /// The offending index
        index: usize,
        /// Size of the alphabet
        size: usize,
    },

    /// A cycle specification could not be parsed
    #[error("malformed cycle notation {cycles:?}: {reason}")]
    MalformedCycle {
        /// The cycle string being parsed
        cycles: String,
        /// What was wrong with it
        reason: String,
    },

    /// A moving rotor names a notch outside its alphabet
    #[error("rotor {rotor}: notch '{notch}' is not in the alphabet")]
    InvalidNotch {
        /// Rotor name
        rotor: String,
        /// The offending notch symbol
        notch: char,
    },

    /// A reflector's permutation leaves some symbol fixed
    #[error("reflector {rotor} maps '{symbol}' to itself")]
    NotDerangement {
        /// Rotor name
        rotor: String,
        /// First symbol found mapping to itself
        symbol: char,
    },
}

// ============================================================================
// Machine Errors
// ============================================================================

/// Errors raised while arranging, setting or running a machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    /// The machine shape itself is impossible
    #[error("invalid machine shape: {rotors} slots with {pawls} pawls (need 1 < slots, pawls < slots)")]
    InvalidShape {
        /// Number of rotor slots
        rotors: usize,
        /// Number of pawls
        pawls: usize,
    },

    /// Two catalog entries share a name
    #[error("rotor {name} is defined more than once")]
    DuplicateCatalogEntry {
        /// The duplicated name
        name: String,
    },

    /// A rotor or the plugboard is wired over a different alphabet
    #[error("{name} is not wired over the machine alphabet")]
    AlphabetMismatch {
        /// Rotor name, or `plugboard`
        name: String,
    },

    /// A setting directive names a rotor absent from the catalog
    #[error("unknown rotor {name}{}", suggestion.as_ref().map(|s| format!(" (did you mean {s}?)")).unwrap_or_default())]
    UnknownRotor {
        /// The unknown name
        name: String,
        /// Closest catalog name, if any is close
        suggestion: Option<String>,
    },

    /// The same rotor was placed in two slots
    #[error("rotor {name} appears more than once in the arrangement")]
    DuplicateRotor {
        /// The repeated name
        name: String,
    },

    /// The arrangement names the wrong number of rotors
    #[error("expected {expected} rotors in the arrangement, got {actual}")]
    SlotCountMismatch {
        /// Number of slots in the machine
        expected: usize,
        /// Number of names supplied
        actual: usize,
    },

    /// Slot 0 is not a reflector, or a reflector sits in another slot
    #[error("rotor {name} in slot {slot}: {reason}")]
    MisplacedReflector {
        /// Rotor name
        name: String,
        /// Slot index
        slot: usize,
        /// Which placement rule was broken
        reason: &'static str,
    },

    /// Moving/fixed rotor counts do not match the pawl count
    #[error("wrong rotor types: need {expected_moving} moving and {expected_fixed} fixed, got {moving} moving and {fixed} fixed")]
    RotorCountMismatch {
        /// Required moving rotors (`pawls`)
        expected_moving: usize,
        /// Required non-moving rotors (`numRotors - pawls`)
        expected_fixed: usize,
        /// Moving rotors supplied
        moving: usize,
        /// Non-moving rotors supplied
        fixed: usize,
    },

    /// Initial position string has the wrong length
    #[error("rotor setting {setting:?} must have {expected} symbols")]
    SettingLength {
        /// The supplied setting
        setting: String,
        /// Required length (`numRotors - 1`)
        expected: usize,
    },

    /// Encoding was attempted before the machine was fully set
    #[error("machine is not ready to encode (state: {state})")]
    NotReady {
        /// Current lifecycle state
        state: String,
    },

    /// Underlying cipher primitive failure
    #[error(transparent)]
    Cipher(#[from] CipherError),
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration stream ended mid-description
    #[error("configuration truncated: expected {expected}")]
    Truncated {
        /// What the loader was expecting when input ran out
        expected: String,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Configuration file exceeds the size limit
    #[error("configuration is {size} bytes, limit is {limit}")]
    TooLarge {
        /// Actual size in bytes
        size: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// A setting directive line could not be parsed
    #[error("invalid setting directive {line:?}: {message}")]
    InvalidSetting {
        /// The directive text
        line: String,
        /// What was wrong with it
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed with {} error(s): {}", errors.len(), errors.first().map(ToString::to_string).unwrap_or_default())]
    Validation {
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// A primitive could not be built from the configuration
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// The machine could not be assembled from the configuration
    #[error(transparent)]
    Machine(#[from] MachineError),
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during configuration validation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ValidationIssue {
    /// Path to the problematic item (e.g., "rotors[3].notches")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - validation failure that prevents configuration from being used
    Error,
    /// Warning - potential issue that does not prevent configuration loading
    Warning,
}

// ============================================================================
// Session Errors
// ============================================================================

/// Errors raised while driving a machine over an input stream.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A message line appeared before any setting directive
    #[error("line {line}: message seen before any setting directive")]
    NoActiveSetting {
        /// 1-based input line number
        line: usize,
    },

    /// A setting directive could not be parsed
    #[error("line {line}: {source}")]
    Directive {
        /// 1-based input line number
        line: usize,
        /// Underlying parse error
        #[source]
        source: ConfigError,
    },

    /// A directive or message was rejected by the machine
    #[error("line {line}: {source}")]
    Machine {
        /// 1-based input line number
        line: usize,
        /// Underlying machine error
        #[source]
        source: MachineError,
    },

    /// Reading input or writing output failed
    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `enigma` operations.
pub type Result<T> = std::result::Result<T, EnigmaError>;

// ============================================================================
// Tests
// ============================================================================
