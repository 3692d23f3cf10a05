//! Configuration loader
//!
//! This module implements the configuration loading pipeline:
//! 1. Size check and read (files only)
//! 2. Tokenizing on whitespace
//! 3. Parsing the header and rotor descriptors into a [`MachineConfig`]
//! 4. Semantic validation
//!
//! The stream format is the alphabet, the number of rotor slots, the number
//! of pawls, then any number of rotor descriptors:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ 5 3
//!  I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!  B R (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)
//! ```

use std::iter::Peekable;
use std::path::Path;
use std::str::SplitWhitespace;

use crate::config::schema::{MachineConfig, RotorDescriptor, RotorType};
use crate::config::validation::Validator;
use crate::error::{ConfigError, ValidationIssue};

// ============================================================================
// Public API
// ============================================================================

/// Options for the configuration loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits for configuration size.
    pub config_limits: ConfigLimits,
}

/// Limits for configuration size to prevent resource exhaustion.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum number of rotor descriptors.
    pub max_rotors: usize,

    /// Maximum number of rotor slots.
    pub max_slots: usize,

    /// Maximum configuration size in bytes.
    pub max_config_size: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_rotors: env_or("ENIGMA_MAX_ROTORS", 1000),
            max_slots: env_or("ENIGMA_MAX_SLOTS", 64),
            max_config_size: env_or("ENIGMA_MAX_CONFIG_SIZE", 1024 * 1024),
        }
    }
}

/// Result of loading a configuration.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: MachineConfig,

    /// Warnings raised by validation.
    pub warnings: Vec<ValidationIssue>,
}

/// Configuration loader.
#[derive(Debug)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new configuration loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Loads and validates the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read ([`ConfigError::MissingFile`])
    /// - The file exceeds the size limit ([`ConfigError::TooLarge`])
    /// - Parsing or validation fails (see [`load_from_str`](Self::load_from_str))
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let limit = self.options.config_limits.max_config_size;
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > limit {
            return Err(ConfigError::TooLarge { size, limit });
        }

        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        tracing::debug!(path = %path.display(), bytes = size, "loading configuration");
        self.load_from_str(&content)
    }

    /// Parses and validates a configuration from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The text exceeds the size limit ([`ConfigError::TooLarge`])
    /// - The stream ends early ([`ConfigError::Truncated`])
    /// - A count or type token is invalid ([`ConfigError::InvalidValue`])
    /// - Semantic validation fails ([`ConfigError::Validation`])
    pub fn load_from_str(&self, content: &str) -> Result<LoadResult, ConfigError> {
        let limits = &self.options.config_limits;
        if content.len() > limits.max_config_size {
            return Err(ConfigError::TooLarge {
                size: content.len(),
                limit: limits.max_config_size,
            });
        }

        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let config = parse(content)?;

        let result = Validator::new().validate(&config, limits);
        for warning in &result.warnings {
            tracing::warn!(path = %warning.path, "{}", warning.message);
        }
        if result.has_errors() {
            return Err(ConfigError::Validation {
                errors: result.errors,
            });
        }

        tracing::debug!(
            alphabet = %config.alphabet,
            slots = config.num_rotors,
            pawls = config.pawls,
            rotors = config.rotors.len(),
            "configuration loaded"
        );

        Ok(LoadResult {
            config,
            warnings: result.warnings,
        })
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Whitespace token stream with the parser's only scratch state.
struct TokenCursor<'a> {
    tokens: Peekable<SplitWhitespace<'a>>,
}

impl<'a> TokenCursor<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            tokens: content.split_whitespace().peekable(),
        }
    }

    /// Takes the next token, describing what was expected if there is none.
    fn expect(&mut self, expected: impl FnOnce() -> String) -> Result<&'a str, ConfigError> {
        self.tokens
            .next()
            .ok_or_else(|| ConfigError::Truncated {
                expected: expected(),
            })
    }

    fn expect_count(&mut self, field: &str) -> Result<usize, ConfigError> {
        let token = self.expect(|| format!("{field} count"))?;
        token.parse().map_err(|_| ConfigError::InvalidValue {
            field: field.to_string(),
            value: token.to_string(),
            expected: "a non-negative integer".to_string(),
        })
    }

    /// Takes the next token if it opens a cycle.
    fn next_cycle(&mut self) -> Option<&'a str> {
        self.tokens.next_if(|token| token.starts_with('('))
    }

    fn at_end(&mut self) -> bool {
        self.tokens.peek().is_none()
    }
}

/// Parses a configuration stream without validating it.
///
/// # Errors
///
/// Returns [`ConfigError::Truncated`] or [`ConfigError::InvalidValue`].
pub fn parse(content: &str) -> Result<MachineConfig, ConfigError> {
    let mut cursor = TokenCursor::new(content);

    let alphabet = cursor.expect(|| "alphabet".to_string())?.to_string();
    let num_rotors = cursor.expect_count("num_rotors")?;
    let pawls = cursor.expect_count("pawls")?;

    let mut rotors = Vec::new();
    while !cursor.at_end() {
        rotors.push(parse_rotor(&mut cursor)?);
    }

    Ok(MachineConfig {
        alphabet,
        num_rotors,
        pawls,
        rotors,
    })
}

/// Parses `name type cycles...`; the descriptor ends at the next bare token.
fn parse_rotor(cursor: &mut TokenCursor<'_>) -> Result<RotorDescriptor, ConfigError> {
    let name = cursor.expect(|| "rotor name".to_string())?;
    let type_token = cursor.expect(|| format!("type of rotor {name}"))?;
    let kind = RotorType::parse(name, type_token)?;

    let mut cycles = Vec::new();
    while let Some(cycle) = cursor.next_cycle() {
        cycles.push(cycle);
    }

    Ok(RotorDescriptor {
        name: name.to_string(),
        kind,
        cycles: cycles.join(" "),
    })
}

/// Reads a limit from the environment, falling back to `default`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================
