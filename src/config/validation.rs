//! Semantic validation of machine configurations.
//!
//! Validation runs on the parsed [`MachineConfig`] and collects every issue
//! instead of stopping at the first, so a broken rotor table is reported in
//! one pass.

use std::collections::HashSet;
use std::sync::Arc;

use crate::cipher::{Alphabet, Permutation};
use crate::config::loader::ConfigLimits;
use crate::config::schema::{MachineConfig, RotorDescriptor, RotorType};
use crate::error::{Severity, ValidationIssue};

// ============================================================================
// Public API
// ============================================================================

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a configuration and returns every error and warning found.
    pub fn validate(&mut self, config: &MachineConfig, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_shape(config);
        self.validate_names(config);
        self.validate_supply(config);
        self.validate_limits(config, limits);

        match Alphabet::new(&config.alphabet) {
            Ok(alphabet) => {
                let alphabet = Arc::new(alphabet);
                for (i, rotor) in config.rotors.iter().enumerate() {
                    self.validate_rotor(i, rotor, &alphabet);
                }
            }
            Err(e) => self.add_error("alphabet", e.to_string()),
        }

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Machine Shape
    // ========================================================================

    fn validate_shape(&mut self, config: &MachineConfig) {
        if config.num_rotors < 2 {
            self.add_error(
                "num_rotors",
                format!(
                    "a machine needs at least 2 rotor slots, got {}",
                    config.num_rotors
                ),
            );
        }
        if config.pawls >= config.num_rotors {
            self.add_error(
                "pawls",
                format!(
                    "pawls ({}) must be fewer than rotor slots ({})",
                    config.pawls, config.num_rotors
                ),
            );
        }
    }

    fn validate_names(&mut self, config: &MachineConfig) {
        let mut seen = HashSet::new();
        for (i, rotor) in config.rotors.iter().enumerate() {
            if !seen.insert(rotor.name.as_str()) {
                self.add_error(
                    format!("rotors[{i}].name"),
                    format!("rotor {} is defined more than once", rotor.name),
                );
            }
            if rotor.name.starts_with('(') {
                self.add_error(
                    format!("rotors[{i}].name"),
                    format!("rotor name {} looks like a wiring cycle", rotor.name),
                );
            }
            if rotor.name.starts_with('*') {
                self.add_warning(
                    format!("rotors[{i}].name"),
                    format!(
                        "rotor {} starts with '*' and cannot be named first in a setting",
                        rotor.name
                    ),
                );
            }
        }
    }

    /// Checks there are enough rotors of each kind to fill one arrangement.
    fn validate_supply(&mut self, config: &MachineConfig) {
        let (reflectors, fixed, moving) = config.kind_counts();

        if reflectors == 0 {
            self.add_error("rotors", "no reflector is defined");
        }
        if moving < config.pawls {
            self.add_error(
                "rotors",
                format!(
                    "{} pawls need {} moving rotors, only {moving} defined",
                    config.pawls, config.pawls
                ),
            );
        }
        let needed_fixed = config.num_rotors.saturating_sub(config.pawls + 1);
        if fixed < needed_fixed {
            self.add_error(
                "rotors",
                format!("arrangements need {needed_fixed} non-moving rotors, only {fixed} defined"),
            );
        }
    }

    fn validate_limits(&mut self, config: &MachineConfig, limits: &ConfigLimits) {
        if config.rotors.len() > limits.max_rotors {
            self.add_error(
                "rotors",
                format!(
                    "{} rotors defined, limit is {}",
                    config.rotors.len(),
                    limits.max_rotors
                ),
            );
        }
        if config.num_rotors > limits.max_slots {
            self.add_error(
                "num_rotors",
                format!(
                    "{} rotor slots requested, limit is {}",
                    config.num_rotors, limits.max_slots
                ),
            );
        }
    }

    // ========================================================================
    // Rotor Descriptors
    // ========================================================================

    fn validate_rotor(&mut self, i: usize, rotor: &RotorDescriptor, alphabet: &Arc<Alphabet>) {
        let permutation = match Permutation::new(&rotor.cycles, Arc::clone(alphabet)) {
            Ok(permutation) => permutation,
            Err(e) => {
                self.add_error(format!("rotors[{i}].cycles"), e.to_string());
                return;
            }
        };

        match &rotor.kind {
            RotorType::Moving { notches } => {
                if notches.is_empty() {
                    self.add_warning(
                        format!("rotors[{i}].notches"),
                        format!("moving rotor {} has no notches and never carries", rotor.name),
                    );
                }
                for notch in notches.chars().filter(|&c| !alphabet.contains(c)) {
                    self.add_error(
                        format!("rotors[{i}].notches"),
                        format!("notch '{notch}' of rotor {} is not in the alphabet", rotor.name),
                    );
                }
            }
            RotorType::Reflector => {
                if let Some(fixed) = permutation.first_fixed_point() {
                    self.add_error(
                        format!("rotors[{i}].cycles"),
                        format!(
                            "reflector {} maps '{}' to itself",
                            rotor.name,
                            alphabet.symbol(fixed)
                        ),
                    );
                } else if !permutation.is_involution() {
                    self.add_warning(
                        format!("rotors[{i}].cycles"),
                        format!(
                            "reflector {} is not an involution; decoding will not mirror encoding",
                            rotor.name
                        ),
                    );
                }
            }
            RotorType::Fixed => {}
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn add_error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
            severity: Severity::Warning,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
