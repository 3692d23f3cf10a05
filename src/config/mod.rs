//! Configuration
//!
//! Loads machine configuration streams (alphabet, slot and pawl counts,
//! rotor descriptors), validates them, and parses the setting directives
//! that arrange a machine between messages.

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validation;

pub use loader::{ConfigLimits, ConfigLoader, LoadResult, LoaderOptions};
pub use schema::{MachineConfig, RotorDescriptor, RotorType};
pub use settings::SettingDirective;
pub use validation::{ValidationResult, Validator};
