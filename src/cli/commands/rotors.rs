//! `rotors` command: list the catalog a configuration defines.

use serde::Serialize;

use crate::cli::args::{OutputFormat, RotorsArgs};
use crate::cipher::{Rotor, RotorClass};
use crate::config::ConfigLoader;
use crate::error::EnigmaError;
use crate::machine::Machine;

#[derive(Serialize)]
struct RotorEntry<'a> {
    name: &'a str,
    class: RotorClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    notches: Option<String>,
    cycles: String,
}

impl<'a> From<&'a Rotor> for RotorEntry<'a> {
    fn from(rotor: &'a Rotor) -> Self {
        Self {
            name: rotor.name(),
            class: rotor.class(),
            notches: (rotor.class() == RotorClass::Moving).then(|| rotor.notches()),
            cycles: rotor.permutation().cycles(),
        }
    }
}

#[derive(Serialize)]
struct Listing<'a> {
    alphabet: String,
    slots: usize,
    pawls: usize,
    rotors: Vec<RotorEntry<'a>>,
}

/// Prints every rotor of the configuration with its type and wiring.
///
/// # Errors
///
/// Returns a configuration error if the file does not load, or
/// [`EnigmaError::Json`] if the JSON listing cannot be rendered.
pub fn run(args: &RotorsArgs) -> Result<(), EnigmaError> {
    let config = ConfigLoader::with_defaults().load(&args.config)?.config;
    let machine = config.build()?;
    let listing = listing(&machine);

    match args.format {
        OutputFormat::Human => print!("{}", render_human(&listing)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
    }
    Ok(())
}

fn listing(machine: &Machine) -> Listing<'_> {
    Listing {
        alphabet: machine.alphabet().to_string(),
        slots: machine.num_rotors(),
        pawls: machine.num_pawls(),
        rotors: machine.catalog().map(RotorEntry::from).collect(),
    }
}

fn render_human(listing: &Listing<'_>) -> String {
    let width = listing
        .rotors
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut out = format!(
        "alphabet {} ({} slots, {} pawls)\n{:<width$}  {:<9}  {:<7}  WIRING\n",
        listing.alphabet, listing.slots, listing.pawls, "NAME", "TYPE", "NOTCHES"
    );
    for rotor in &listing.rotors {
        let notches = rotor.notches.as_deref().unwrap_or("-");
        out.push_str(&format!(
            "{:<width$}  {:<9}  {:<7}  {}\n",
            rotor.name,
            rotor.class.to_string(),
            notches,
            rotor.cycles
        ));
    }
    out
}
