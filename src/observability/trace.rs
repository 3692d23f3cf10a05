//! Per-symbol diagnostic trace.
//!
//! The machine reports every encoded symbol to an injected [`TraceSink`]
//! instead of consulting a global verbose flag. Sinks render the trace in
//! the classic human form (`[AXLE] F -> ... -> Q`) or as JSON lines.
//! Write failures are dropped: tracing must never abort an encoding run.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// The signal path of one encoded symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepTrace {
    /// Rotor positions (slots 1..N-1) after the advance for this symbol.
    pub positions: String,
    /// Symbol entering the machine.
    pub input: char,
    /// Symbol after the first plugboard pass.
    pub plugged: char,
    /// Output of each rotor in the forward pass, fastest rotor first.
    pub forward: Vec<char>,
    /// Output of each rotor in the backward pass, leftmost rotor first.
    pub backward: Vec<char>,
    /// Symbol leaving the machine.
    pub output: char,
}

/// A trace record.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum TraceEvent {
    /// A setting directive replaced the arrangement.
    SettingApplied {
        /// When the directive was applied.
        timestamp: DateTime<Utc>,
        /// 1-based input line of the directive.
        line: usize,
        /// Rotor names, reflector first.
        rotors: Vec<String>,
        /// Initial positions of slots 1..N-1.
        positions: String,
        /// Plugboard in cycle notation.
        plugboard: String,
    },

    /// One symbol went through the machine.
    Step(StepTrace),

    /// A message line was fully encoded.
    MessageEncoded {
        /// When encoding finished.
        timestamp: DateTime<Utc>,
        /// 1-based input line of the message.
        line: usize,
        /// Number of symbols encoded.
        symbols: usize,
    },
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Receives trace events from a machine and its session.
pub trait TraceSink: Send {
    /// Records one event.
    fn record(&mut self, event: &TraceEvent);

    /// Whether events should be built at all.
    ///
    /// The machine skips assembling [`StepTrace`]s when this is `false`.
    fn enabled(&self) -> bool {
        true
    }
}

/// Discards everything. The default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn record(&mut self, _event: &TraceEvent) {}

    fn enabled(&self) -> bool {
        false
    }
}

/// Renders steps as `[POSITIONS] in -> plugged -> ... -> out`.
#[derive(Debug)]
pub struct HumanTraceSink<W> {
    writer: W,
}

impl<W: Write + Send> HumanTraceSink<W> {
    /// Creates a sink writing to `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl HumanTraceSink<std::io::Stderr> {
    /// Creates a sink writing to stderr, which keeps stdout free for ciphertext.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> TraceSink for HumanTraceSink<W> {
    fn record(&mut self, event: &TraceEvent) {
        if let TraceEvent::Step(step) = event {
            let _ = writeln!(self.writer, "{}", render_step(step));
        }
    }
}

/// Writes every event as one JSON object per line with a sequence number.
#[derive(Debug)]
pub struct JsonTraceSink<W> {
    writer: W,
    sequence: u64,
}

/// Adds a sequence number to a flattened event.
#[derive(Serialize)]
struct Envelope<'a> {
    sequence: u64,
    #[serde(flatten)]
    event: &'a TraceEvent,
}

impl<W: Write + Send> JsonTraceSink<W> {
    /// Creates a sink writing to `writer`.
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            sequence: 0,
        }
    }

    /// Number of events written so far.
    #[must_use]
    pub const fn event_count(&self) -> u64 {
        self.sequence
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonTraceSink<std::io::Stderr> {
    /// Creates a sink writing to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> TraceSink for JsonTraceSink<W> {
    fn record(&mut self, event: &TraceEvent) {
        let envelope = Envelope {
            sequence: self.sequence,
            event,
        };
        self.sequence += 1;
        if let Ok(line) = serde_json::to_string(&envelope) {
            let _ = writeln!(self.writer, "{line}");
        }
    }
}

/// Renders a step the way the verbose machine output always looked.
#[must_use]
pub fn render_step(step: &StepTrace) -> String {
    let mut path = vec![step.input, step.plugged];
    path.extend(&step.forward);
    path.extend(&step.backward);
    path.push(step.output);

    let arrows = path
        .iter()
        .map(char::to_string)
        .collect::<Vec<_>>()
        .join(" -> ");
    format!("[{}] {arrows}", step.positions)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
