//! Session driver.
//!
//! A [`Session`] feeds an input stream through a [`Machine`] line by line.
//! Lines starting with `*` are setting directives; every other line is a
//! message whose whitespace is dropped before encoding. Encoded messages are
//! written one per line in fixed-size groups.

use std::io::{BufRead, Write};

use chrono::Utc;
use serde::Serialize;

use crate::config::settings::SettingDirective;
use crate::error::SessionError;
use crate::machine::Machine;
use crate::observability::trace::TraceEvent;

/// Default number of symbols per output group.
pub const DEFAULT_GROUP_SIZE: usize = 5;

/// Options for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Symbols per output group; 0 disables grouping.
    pub group_size: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            group_size: DEFAULT_GROUP_SIZE,
        }
    }
}

/// Counters for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Setting directives applied.
    pub directives: usize,
    /// Message lines encoded, blank ones included.
    pub messages: usize,
    /// Symbols encoded.
    pub symbols: usize,
}

/// Drives one machine over an input stream.
#[derive(Debug)]
pub struct Session {
    machine: Machine,
    options: SessionOptions,
    has_setting: bool,
    summary: SessionSummary,
}

impl Session {
    /// Creates a session around an unarranged or already set machine.
    #[must_use]
    pub const fn new(machine: Machine, options: SessionOptions) -> Self {
        Self {
            machine,
            options,
            has_setting: false,
            summary: SessionSummary {
                directives: 0,
                messages: 0,
                symbols: 0,
            },
        }
    }

    /// The machine being driven.
    #[must_use]
    pub const fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Consumes the session, returning the machine in its final state.
    #[must_use]
    pub fn into_machine(self) -> Machine {
        self.machine
    }

    /// Processes every line of `reader`, writing encoded messages to `writer`.
    ///
    /// Stops at the first failing line; output already written for earlier
    /// lines stays written.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NoActiveSetting`] for a message before any directive
    /// - [`SessionError::Directive`] for a directive that does not parse
    /// - [`SessionError::Machine`] for a directive or message the machine rejects
    /// - [`SessionError::Io`] if reading or writing fails
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        mut writer: W,
    ) -> Result<SessionSummary, SessionError> {
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if let Some(output) = self.process_line(index + 1, &line)? {
                writeln!(writer, "{output}")?;
            }
        }
        writer.flush()?;

        tracing::info!(
            directives = self.summary.directives,
            messages = self.summary.messages,
            symbols = self.summary.symbols,
            "session complete"
        );
        Ok(self.summary)
    }

    /// Handles one input line (`line_no` is 1-based).
    ///
    /// Returns the grouped ciphertext for a message line, `None` for a
    /// directive.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn process_line(
        &mut self,
        line_no: usize,
        line: &str,
    ) -> Result<Option<String>, SessionError> {
        if SettingDirective::is_directive(line) {
            self.apply_directive(line_no, line)?;
            return Ok(None);
        }

        if !self.has_setting {
            return Err(SessionError::NoActiveSetting { line: line_no });
        }

        let message: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        let encoded = self
            .machine
            .convert_message(&message)
            .map_err(|source| SessionError::Machine {
                line: line_no,
                source,
            })?;

        let symbols = encoded.chars().count();
        self.summary.messages += 1;
        self.summary.symbols += symbols;
        self.machine.emit(&TraceEvent::MessageEncoded {
            timestamp: Utc::now(),
            line: line_no,
            symbols,
        });
        tracing::debug!(line = line_no, symbols, positions = %self.machine.positions(), "message encoded");

        Ok(Some(group_output(&encoded, self.options.group_size)))
    }

    fn apply_directive(&mut self, line_no: usize, line: &str) -> Result<(), SessionError> {
        let directive = SettingDirective::parse(line, self.machine.num_rotors()).map_err(
            |source| SessionError::Directive {
                line: line_no,
                source,
            },
        )?;
        self.machine
            .apply(&directive)
            .map_err(|source| SessionError::Machine {
                line: line_no,
                source,
            })?;

        self.has_setting = true;
        self.summary.directives += 1;
        self.machine.emit(&TraceEvent::SettingApplied {
            timestamp: Utc::now(),
            line: line_no,
            rotors: directive.rotors,
            positions: directive.positions,
            plugboard: self.machine.plugboard().cycles(),
        });
        Ok(())
    }
}

/// Splits `text` into space-separated groups of `size` symbols.
///
/// The last group may be shorter; there is no trailing space. A `size` of 0
/// returns the text unchanged.
#[must_use]
pub fn group_output(text: &str, size: usize) -> String {
    if size == 0 {
        return text.to_string();
    }

    let mut grouped = String::with_capacity(text.len() + text.len() / size);
    for (i, c) in text.chars().enumerate() {
        if i > 0 && i % size == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::error::{CipherError, ConfigError, MachineError};
    use crate::machine::MachineState;
    use proptest::prelude::*;

    const CONFIG: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ 5 3
 I MQ      (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
 II ME     (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
 III MV    (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
 IV MJ     (AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)
 V MZ      (AVOLDRWFIUQ)(BZKSMNHYC) (EGTJPX)
 Beta N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
 Gamma N   (AFNIRLBSQWVXGUZDKMTPCOYJHE)
 B R       (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)
";

    fn session() -> Session {
        let config = ConfigLoader::with_defaults()
            .load_from_str(CONFIG)
            .unwrap()
            .config;
        Session::new(config.build().unwrap(), SessionOptions::default())
    }

    fn run(input: &str) -> (Result<SessionSummary, SessionError>, String) {
        let mut session = session();
        let mut output = Vec::new();
        let result = session.run(input.as_bytes(), &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn encodes_published_message() {
        let (result, output) =
            run("* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)\nFROM HIS SHOULDER HIAWATHA\n");
        assert_eq!(output, "QVPQS OKOIL PUBKJ ZPISF XDW\n");
        assert_eq!(
            result.unwrap(),
            SessionSummary {
                directives: 1,
                messages: 1,
                symbols: 23
            }
        );
    }

    #[test]
    fn machine_state_carries_across_lines() {
        let (_, split) = run("* B Beta III IV I AXLE\nFROMHIS\nSHOULDER\n");
        let (_, joined) = run("* B Beta III IV I AXLE\nFROMHISSHOULDER\n");
        let split: String = split.chars().filter(|c| c.is_alphabetic()).collect();
        let joined: String = joined.chars().filter(|c| c.is_alphabetic()).collect();
        assert_eq!(split, joined);
    }

    #[test]
    fn new_directive_resets_the_machine() {
        let input = "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)\nFROM\n\
                     * B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)\nFROM\n";
        let (result, output) = run(input);
        assert_eq!(output, "QVPQ\nQVPQ\n");
        assert_eq!(result.unwrap().directives, 2);
    }

    #[test]
    fn decoding_recovers_plaintext() {
        let (_, output) = run(
            "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)\nQVPQS OKOIL PUBKJ ZPISF XDW\n",
        );
        assert_eq!(output, "FROMH ISSHO ULDER HIAWA THA\n");
    }

    #[test]
    fn blank_message_line_prints_blank_line() {
        let (result, output) = run("* B Beta I II III AAAA\n\nHELLO\n");
        assert_eq!(output, "\nILBDA\n");
        assert_eq!(result.unwrap().messages, 2);
    }

    #[test]
    fn message_before_setting_fails() {
        let (result, output) = run("HELLO\n* B Beta I II III AAAA\n");
        assert!(matches!(
            result,
            Err(SessionError::NoActiveSetting { line: 1 })
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn blank_line_before_setting_fails() {
        let (result, _) = run("\n* B Beta I II III AAAA\n");
        assert!(matches!(
            result,
            Err(SessionError::NoActiveSetting { line: 1 })
        ));
    }

    #[test]
    fn errors_carry_line_numbers_and_keep_earlier_output() {
        let (result, output) = run("* B Beta I II III AAAA\nHELLO\nHELL0\n");
        assert_eq!(output, "ILBDA\n");
        let Err(SessionError::Machine { line, source }) = result else {
            panic!("expected a machine error, got {result:?}");
        };
        assert_eq!(line, 3);
        assert_eq!(
            source,
            MachineError::Cipher(CipherError::UnknownSymbol { symbol: '0' })
        );
    }

    #[test]
    fn unknown_rotor_in_directive_fails() {
        let (result, _) = run("* B Beta I II X AAAA\n");
        assert!(matches!(
            result,
            Err(SessionError::Machine {
                line: 1,
                source: MachineError::UnknownRotor { .. }
            })
        ));
    }

    #[test]
    fn short_directive_fails() {
        let (result, _) = run("* B Beta I\n");
        assert!(matches!(
            result,
            Err(SessionError::Directive {
                line: 1,
                source: ConfigError::InvalidSetting { .. }
            })
        ));
    }

    #[test]
    fn process_line_reports_directive_and_message() {
        let mut session = session();
        assert_eq!(
            session.process_line(1, "* B Beta I II III AAAA").unwrap(),
            None
        );
        assert_eq!(session.machine().state(), MachineState::Ready);
        assert_eq!(
            session.process_line(2, "HELLO WORLD").unwrap().as_deref(),
            Some("ILBDA AMTAZ")
        );
        assert_eq!(session.into_machine().positions(), "AAAK");
    }

    #[test]
    fn custom_group_size() {
        let config = ConfigLoader::with_defaults()
            .load_from_str(CONFIG)
            .unwrap()
            .config;
        let mut session = Session::new(config.build().unwrap(), SessionOptions { group_size: 0 });
        let mut output = Vec::new();
        session
            .run("* B Beta I II III AAAA\nHELLOWORLD\n".as_bytes(), &mut output)
            .unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "ILBDAAMTAZ\n");
    }

    #[test]
    fn group_output_examples() {
        assert_eq!(group_output("", 5), "");
        assert_eq!(group_output("ABC", 5), "ABC");
        assert_eq!(group_output("ABCDE", 5), "ABCDE");
        assert_eq!(group_output("ABCDEF", 5), "ABCDE F");
        assert_eq!(group_output("ABCDEFGHIJ", 5), "ABCDE FGHIJ");
        assert_eq!(group_output("ABCDEFG", 3), "ABC DEF G");
        assert_eq!(group_output("ABCDEFG", 0), "ABCDEFG");
    }

    proptest! {
        #[test]
        fn grouping_preserves_symbols(text in "[A-Z]{0,64}", size in 1usize..10) {
            let grouped = group_output(&text, size);
            prop_assert_eq!(grouped.replace(' ', ""), text.clone());
            prop_assert!(!grouped.ends_with(' '));
            for group in grouped.split(' ').filter(|g| !g.is_empty()) {
                prop_assert!(group.len() <= size);
            }
        }
    }
}
