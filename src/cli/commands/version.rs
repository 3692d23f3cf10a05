//! Version information display.

use serde_json::json;

use crate::cli::args::{OutputFormat, VersionArgs};
use crate::error::EnigmaError;

/// Prints the package name and version.
///
/// # Errors
///
/// Returns [`EnigmaError::Json`] if the JSON form cannot be rendered.
pub fn run(args: &VersionArgs) -> Result<(), EnigmaError> {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    match args.format {
        OutputFormat::Human => println!("{name} {version}"),
        OutputFormat::Json => {
            let info = json!({ "name": name, "version": version });
            println!("{}", serde_json::to_string(&info)?);
        }
    }
    Ok(())
}
