//! The rotor machine.
//!
//! A [`Machine`] owns the rotor catalog (every rotor the configuration
//! defines, by name) and an arrangement of catalog indices, slot 0 being the
//! reflector and slot N-1 the fastest rotor. Encoding a symbol advances the
//! rotors, then passes the signal through the plugboard, forward through
//! every slot, backward through every slot except the reflector, and through
//! the plugboard again.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::cipher::{Alphabet, Permutation, Rotor};
use crate::config::settings::SettingDirective;
use crate::error::{CipherError, MachineError};
use crate::machine::stepping::{Pawl, plan_advances};
use crate::observability::trace::{NullSink, StepTrace, TraceEvent, TraceSink};

/// Maximum edit distance for "did you mean" rotor suggestions.
const SUGGESTION_DISTANCE: usize = 3;

/// Lifecycle of a machine between setting directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    /// No rotors have been inserted.
    Unarranged,
    /// Rotors are inserted but positions or plugboard are not yet set.
    ArrangedUnset,
    /// Fully set; encoding is allowed.
    Ready,
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unarranged => "unarranged",
            Self::ArrangedUnset => "arranged-unset",
            Self::Ready => "ready",
        })
    }
}

/// A rotor cipher machine.
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    pawls: usize,
    catalog: IndexMap<String, Rotor>,
    slots: Vec<usize>,
    plugboard: Permutation,
    positions_set: bool,
    plugboard_set: bool,
    sink: Box<dyn TraceSink>,
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("alphabet", &self.alphabet)
            .field("num_rotors", &self.num_rotors)
            .field("pawls", &self.pawls)
            .field("arrangement", &self.arrangement())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Machine {
    /// Creates a machine with `num_rotors` slots and `pawls` pawls over the
    /// rotors in `all_rotors`.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::InvalidShape`] unless `1 < num_rotors` and
    /// `pawls < num_rotors`, [`MachineError::DuplicateCatalogEntry`] if two
    /// rotors share a name, and [`MachineError::AlphabetMismatch`] if a rotor
    /// is wired over another alphabet.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        pawls: usize,
        all_rotors: impl IntoIterator<Item = Rotor>,
    ) -> Result<Self, MachineError> {
        if num_rotors < 2 || pawls >= num_rotors {
            return Err(MachineError::InvalidShape {
                rotors: num_rotors,
                pawls,
            });
        }

        let mut catalog = IndexMap::new();
        for rotor in all_rotors {
            let name = rotor.name().to_owned();
            if **rotor.alphabet() != *alphabet {
                return Err(MachineError::AlphabetMismatch { name });
            }
            if catalog.contains_key(&name) {
                return Err(MachineError::DuplicateCatalogEntry { name });
            }
            catalog.insert(name, rotor);
        }

        Ok(Self {
            plugboard: Permutation::identity(Arc::clone(&alphabet)),
            alphabet,
            num_rotors,
            pawls,
            catalog,
            slots: Vec::new(),
            positions_set: false,
            plugboard_set: false,
            sink: Box::new(NullSink),
        })
    }

    /// Replaces the trace sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Forwards a session-level event to the trace sink.
    pub fn emit(&mut self, event: &TraceEvent) {
        if self.sink.enabled() {
            self.sink.record(event);
        }
    }

    /// The common alphabet of the machine and its rotors.
    #[must_use]
    pub const fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Number of rotor slots, reflector included.
    #[must_use]
    pub const fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Number of pawls, and so of moving rotors in any arrangement.
    #[must_use]
    pub const fn num_pawls(&self) -> usize {
        self.pawls
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> MachineState {
        if self.slots.is_empty() {
            MachineState::Unarranged
        } else if self.positions_set && self.plugboard_set {
            MachineState::Ready
        } else {
            MachineState::ArrangedUnset
        }
    }

    /// Every rotor the machine knows, in configuration order.
    pub fn catalog(&self) -> impl Iterator<Item = &Rotor> {
        self.catalog.values()
    }

    /// Rotor in slot `k` (0 is the reflector), if arranged.
    #[must_use]
    pub fn rotor(&self, k: usize) -> Option<&Rotor> {
        self.slots.get(k).map(|&index| &self.catalog[index])
    }

    /// Names of the arranged rotors, reflector first.
    #[must_use]
    pub fn arrangement(&self) -> Vec<&str> {
        self.slots
            .iter()
            .map(|&index| self.catalog[index].name())
            .collect()
    }

    /// Current positions of slots 1..N-1 as symbols.
    #[must_use]
    pub fn positions(&self) -> String {
        self.slots
            .iter()
            .skip(1)
            .map(|&index| self.catalog[index].setting_char())
            .collect()
    }

    /// The current plugboard.
    #[must_use]
    pub const fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    /// Places the rotors named `names` into the slots, reflector first.
    ///
    /// The inserted rotors start at setting 0 and the plugboard is cleared;
    /// the machine is `ArrangedUnset` until positions and plugboard are set.
    /// On error the previous arrangement is left untouched.
    ///
    /// # Errors
    ///
    /// - [`MachineError::SlotCountMismatch`] if `names` does not fill every slot
    /// - [`MachineError::UnknownRotor`] if a name is not in the catalog
    /// - [`MachineError::DuplicateRotor`] if a name is used twice
    /// - [`MachineError::MisplacedReflector`] if slot 0 is not a reflector or
    ///   a reflector sits elsewhere
    /// - [`MachineError::RotorCountMismatch`] if the moving/fixed mix does not
    ///   match the pawl count
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), MachineError> {
        if names.len() != self.num_rotors {
            return Err(MachineError::SlotCountMismatch {
                expected: self.num_rotors,
                actual: names.len(),
            });
        }

        let mut slots = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let index = self
                .catalog
                .get_index_of(name)
                .ok_or_else(|| MachineError::UnknownRotor {
                    name: name.to_owned(),
                    suggestion: self.suggest(name),
                })?;
            if slots.contains(&index) {
                return Err(MachineError::DuplicateRotor {
                    name: name.to_owned(),
                });
            }
            slots.push(index);
        }

        for (slot, &index) in slots.iter().enumerate() {
            let rotor = &self.catalog[index];
            let reason = match (slot, rotor.reflecting()) {
                (0, false) => "the leftmost slot must hold a reflector",
                (1.., true) => "a reflector may only occupy the leftmost slot",
                _ => continue,
            };
            return Err(MachineError::MisplacedReflector {
                name: rotor.name().to_owned(),
                slot,
                reason,
            });
        }

        let moving = slots
            .iter()
            .filter(|&&index| self.catalog[index].rotates())
            .count();
        let fixed = slots.len() - moving;
        if moving != self.pawls || fixed != self.num_rotors - self.pawls {
            return Err(MachineError::RotorCountMismatch {
                expected_moving: self.pawls,
                expected_fixed: self.num_rotors - self.pawls,
                moving,
                fixed,
            });
        }

        for &index in &slots {
            self.catalog[index].set(0);
        }
        self.slots = slots;
        self.plugboard = Permutation::identity(Arc::clone(&self.alphabet));
        self.positions_set = false;
        self.plugboard_set = false;
        tracing::debug!(rotors = ?self.arrangement(), "rotors inserted");
        Ok(())
    }

    /// Sets the positions of slots 1..N-1 from `setting`, leftmost first.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::NotReady`] before any rotors are inserted,
    /// [`MachineError::SettingLength`] unless `setting` has `num_rotors - 1`
    /// symbols, and [`CipherError::UnknownSymbol`] (wrapped) for a symbol
    /// outside the alphabet. Nothing is changed on error.
    pub fn set_rotors(&mut self, setting: &str) -> Result<(), MachineError> {
        if self.slots.is_empty() {
            return Err(self.not_ready());
        }
        if setting.chars().count() != self.num_rotors - 1 {
            return Err(MachineError::SettingLength {
                setting: setting.to_owned(),
                expected: self.num_rotors - 1,
            });
        }

        let positions = setting
            .chars()
            .map(|c| self.alphabet.to_int(c))
            .collect::<Result<Vec<_>, CipherError>>()?;

        for (&index, position) in self.slots.iter().skip(1).zip(positions) {
            self.catalog[index].set(as_signed(position));
        }
        self.positions_set = true;
        Ok(())
    }

    /// Replaces the plugboard.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::AlphabetMismatch`] if the plugboard is wired
    /// over another alphabet.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<(), MachineError> {
        if **plugboard.alphabet() != *self.alphabet {
            return Err(MachineError::AlphabetMismatch {
                name: "plugboard".to_owned(),
            });
        }
        if !plugboard.is_involution() {
            tracing::warn!(
                plugboard = %plugboard.cycles(),
                "plugboard is not an involution; decoding will not mirror encoding"
            );
        }
        self.plugboard = plugboard;
        self.plugboard_set = true;
        Ok(())
    }

    /// Applies a setting directive: arrangement, positions, then plugboard.
    ///
    /// # Errors
    ///
    /// Returns whatever [`insert_rotors`](Self::insert_rotors) or
    /// [`set_rotors`](Self::set_rotors) return, or a wrapped
    /// [`CipherError::MalformedCycle`] for a bad plugboard.
    pub fn apply(&mut self, directive: &SettingDirective) -> Result<(), MachineError> {
        self.insert_rotors(&directive.rotors)?;
        self.set_rotors(&directive.positions)?;
        let plugboard = Permutation::new(&directive.plugboard, Arc::clone(&self.alphabet))?;
        self.set_plugboard(plugboard)?;
        tracing::info!(
            rotors = ?directive.rotors,
            positions = %directive.positions,
            plugboard = %self.plugboard.cycles(),
            "setting applied"
        );
        Ok(())
    }

    /// Advances the rotors and encodes index `c` (wrapped into range).
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::NotReady`] unless the machine is `Ready`.
    pub fn convert(&mut self, c: i64) -> Result<usize, MachineError> {
        self.ensure_ready()?;
        Ok(self.step(self.alphabet.wrap(c)))
    }

    /// Encodes every symbol of `msg`, advancing before each one.
    ///
    /// All symbols are checked before the first advance, so a message with
    /// a foreign symbol neither produces output nor moves any rotor.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::NotReady`] unless the machine is `Ready`, and a
    /// wrapped [`CipherError::UnknownSymbol`] for a symbol outside the
    /// alphabet.
    pub fn convert_message(&mut self, msg: &str) -> Result<String, MachineError> {
        self.ensure_ready()?;
        let indices = msg
            .chars()
            .map(|c| self.alphabet.to_int(c))
            .collect::<Result<Vec<_>, CipherError>>()?;

        Ok(indices
            .into_iter()
            .map(|c| {
                let out = self.step(c);
                self.alphabet.symbol(out)
            })
            .collect())
    }

    fn ensure_ready(&self) -> Result<(), MachineError> {
        if self.state() == MachineState::Ready {
            Ok(())
        } else {
            Err(self.not_ready())
        }
    }

    fn not_ready(&self) -> MachineError {
        MachineError::NotReady {
            state: self.state().to_string(),
        }
    }

    /// One tick: advance, then substitute.
    fn step(&mut self, c: usize) -> usize {
        self.advance_rotors();
        if self.sink.enabled() {
            let (output, trace) = self.substitute_traced(c);
            self.sink.record(&TraceEvent::Step(trace));
            output
        } else {
            self.substitute(c)
        }
    }

    /// Moves every slot the pawls engage, judged on pre-tick state.
    fn advance_rotors(&mut self) {
        let pawls: Vec<Pawl> = self
            .slots
            .iter()
            .map(|&index| Pawl::of(&self.catalog[index]))
            .collect();

        for (&index, advance) in self.slots.iter().zip(plan_advances(&pawls)) {
            if advance {
                self.catalog[index].advance();
            }
        }
    }

    fn substitute(&self, c: usize) -> usize {
        let mut c = self.plugboard.permute(as_signed(c));
        for &index in self.slots.iter().rev() {
            c = self.catalog[index].convert_forward(c);
        }
        for &index in self.slots.iter().skip(1) {
            c = self.catalog[index].convert_backward(c);
        }
        self.plugboard.permute(as_signed(c))
    }

    fn substitute_traced(&self, input: usize) -> (usize, StepTrace) {
        let symbol = |i: usize| self.alphabet.symbol(i);

        let mut c = self.plugboard.permute(as_signed(input));
        let plugged = c;
        let mut forward = Vec::with_capacity(self.slots.len());
        for &index in self.slots.iter().rev() {
            c = self.catalog[index].convert_forward(c);
            forward.push(symbol(c));
        }
        let mut backward = Vec::with_capacity(self.slots.len());
        for &index in self.slots.iter().skip(1) {
            c = self.catalog[index].convert_backward(c);
            backward.push(symbol(c));
        }
        let output = self.plugboard.permute(as_signed(c));

        let trace = StepTrace {
            positions: self.positions(),
            input: symbol(input),
            plugged: symbol(plugged),
            forward,
            backward,
            output: symbol(output),
        };
        (output, trace)
    }

    /// Closest catalog name to `name`, if any is near enough.
    fn suggest(&self, name: &str) -> Option<String> {
        self.catalog
            .keys()
            .map(|candidate| (candidate, strsim::damerau_levenshtein(name, candidate)))
            .filter(|(_, dist)| *dist <= SUGGESTION_DISTANCE)
            .min_by_key(|(_, dist)| *dist)
            .map(|(candidate, _)| candidate.clone())
    }
}

fn as_signed(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Rotor table in the conventional naval layout.
    const ROTORS: &[(&str, &str, &str)] = &[
        ("I", "MQ", "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)"),
        ("II", "ME", "(FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)"),
        ("III", "MV", "(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)"),
        ("IV", "MJ", "(AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)"),
        ("V", "MZ", "(AVOLDRWFIUQ)(BZKSMNHYC) (EGTJPX)"),
        ("VI", "MZM", "(AJQDVLEOZWIYTS) (CGMNHFUX) (BPRK)"),
        ("VII", "MZM", "(ANOUPFRIMBZTLWKSVEGCJYDHXQ)"),
        ("VIII", "MZM", "(AFLSETWUNDHOZVICQ) (BKJ) (GXY) (MPR)"),
        ("Beta", "N", "(ALBEVFCYODJWUGNMQTZSKPR) (HIX)"),
        ("Gamma", "N", "(AFNIRLBSQWVXGUZDKMTPCOYJHE)"),
        (
            "B",
            "R",
            "(AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)",
        ),
        (
            "C",
            "R",
            "(AR) (BD) (CO) (EJ) (FN) (GT) (HK) (IV) (LM) (PW) (QZ) (SX) (UY)",
        ),
    ];

    fn catalog(alphabet: &Arc<Alphabet>) -> Vec<Rotor> {
        ROTORS
            .iter()
            .map(|(name, kind, cycles)| {
                let perm = Permutation::new(cycles, Arc::clone(alphabet)).unwrap();
                match &kind[..1] {
                    "M" => Rotor::moving(*name, perm, &kind[1..]).unwrap(),
                    "R" => Rotor::reflector(*name, perm).unwrap(),
                    _ => Rotor::fixed(*name, perm),
                }
            })
            .collect()
    }

    fn machine(num_rotors: usize, pawls: usize) -> Machine {
        let alphabet = Arc::new(Alphabet::default());
        let rotors = catalog(&alphabet);
        Machine::new(alphabet, num_rotors, pawls, rotors).unwrap()
    }

    fn ready(names: &[&str], setting: &str, plugboard: &str) -> Machine {
        let mut m = machine(names.len(), names.len() - 2);
        m.insert_rotors(names).unwrap();
        m.set_rotors(setting).unwrap();
        let plug = Permutation::new(plugboard, Arc::clone(m.alphabet())).unwrap();
        m.set_plugboard(plug).unwrap();
        m
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<TraceEvent>>>);

    impl TraceSink for RecordingSink {
        fn record(&mut self, event: &TraceEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn state_machine_transitions() {
        let mut m = machine(5, 3);
        assert_eq!(m.state(), MachineState::Unarranged);
        assert!(matches!(
            m.convert_message("A"),
            Err(MachineError::NotReady { .. })
        ));

        m.insert_rotors(&["B", "Beta", "III", "IV", "I"]).unwrap();
        assert_eq!(m.state(), MachineState::ArrangedUnset);
        m.set_rotors("AXLE").unwrap();
        assert_eq!(m.state(), MachineState::ArrangedUnset);
        m.set_plugboard(Permutation::identity(Arc::clone(m.alphabet())))
            .unwrap();
        assert_eq!(m.state(), MachineState::Ready);

        m.insert_rotors(&["C", "Gamma", "VI", "VII", "VIII"]).unwrap();
        assert_eq!(m.state(), MachineState::ArrangedUnset);
        assert_eq!(m.positions(), "AAAA");
    }

    #[test]
    fn rotors_over_another_alphabet_are_rejected() {
        let letters = Arc::new(Alphabet::default());
        let short = Arc::new(Alphabet::new("ABCDEF").unwrap());
        let result = Machine::new(short, 3, 1, catalog(&letters));
        assert_eq!(
            result.map(|_| ()),
            Err(MachineError::AlphabetMismatch {
                name: "I".to_string()
            })
        );
    }

    #[test]
    fn plugboard_over_another_alphabet_is_rejected() {
        let mut m = machine(5, 3);
        m.insert_rotors(&["B", "Beta", "III", "IV", "I"]).unwrap();
        m.set_rotors("AAAA").unwrap();
        let wide = Arc::new(Alphabet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789").unwrap());
        let plug = Permutation::new("(A9)", wide).unwrap();
        assert_eq!(
            m.set_plugboard(plug),
            Err(MachineError::AlphabetMismatch {
                name: "plugboard".to_string()
            })
        );
        assert_eq!(m.state(), MachineState::ArrangedUnset);
    }

    #[test]
    fn set_rotors_before_insert_is_rejected() {
        let mut m = machine(5, 3);
        assert_eq!(
            m.set_rotors("AAAA"),
            Err(MachineError::NotReady {
                state: "unarranged".to_string()
            })
        );
    }

    #[test]
    fn invalid_shape_is_rejected() {
        let alphabet = Arc::new(Alphabet::default());
        assert!(matches!(
            Machine::new(Arc::clone(&alphabet), 1, 0, Vec::new()),
            Err(MachineError::InvalidShape { .. })
        ));
        assert!(matches!(
            Machine::new(alphabet, 3, 3, Vec::new()),
            Err(MachineError::InvalidShape { .. })
        ));
    }

    #[test]
    fn duplicate_catalog_names_are_rejected() {
        let alphabet = Arc::new(Alphabet::default());
        let perm = Permutation::identity(Arc::clone(&alphabet));
        let rotors = vec![Rotor::fixed("X", perm.clone()), Rotor::fixed("X", perm)];
        assert_eq!(
            Machine::new(alphabet, 3, 1, rotors).unwrap_err(),
            MachineError::DuplicateCatalogEntry {
                name: "X".to_string()
            }
        );
    }

    #[test]
    fn unknown_rotor_is_rejected_with_suggestion() {
        let mut m = machine(5, 3);
        let err = m
            .insert_rotors(&["B", "Betta", "III", "IV", "I"])
            .unwrap_err();
        assert_eq!(
            err,
            MachineError::UnknownRotor {
                name: "Betta".to_string(),
                suggestion: Some("Beta".to_string()),
            }
        );
        assert_eq!(m.state(), MachineState::Unarranged);
    }

    #[test]
    fn wrong_moving_count_is_rejected() {
        let mut m = machine(5, 3);
        let err = m
            .insert_rotors(&["B", "Beta", "Gamma", "IV", "I"])
            .unwrap_err();
        assert_eq!(
            err,
            MachineError::RotorCountMismatch {
                expected_moving: 3,
                expected_fixed: 2,
                moving: 2,
                fixed: 3,
            }
        );
    }

    #[test]
    fn wrong_slot_count_is_rejected() {
        let mut m = machine(5, 3);
        assert_eq!(
            m.insert_rotors(&["B", "III", "IV", "I"]),
            Err(MachineError::SlotCountMismatch {
                expected: 5,
                actual: 4
            })
        );
    }

    #[test]
    fn duplicate_rotor_in_arrangement_is_rejected() {
        let mut m = machine(5, 3);
        assert_eq!(
            m.insert_rotors(&["B", "Beta", "I", "IV", "I"]),
            Err(MachineError::DuplicateRotor {
                name: "I".to_string()
            })
        );
    }

    #[test]
    fn reflector_placement_is_enforced() {
        let mut m = machine(5, 3);
        assert!(matches!(
            m.insert_rotors(&["Beta", "B", "III", "IV", "I"]),
            Err(MachineError::MisplacedReflector { slot: 0, .. })
        ));
        assert!(matches!(
            m.insert_rotors(&["B", "C", "III", "IV", "I"]),
            Err(MachineError::MisplacedReflector { slot: 1, .. })
        ));
    }

    #[test]
    fn setting_length_and_symbols_are_checked() {
        let mut m = machine(5, 3);
        m.insert_rotors(&["B", "Beta", "III", "IV", "I"]).unwrap();
        assert_eq!(
            m.set_rotors("AXL"),
            Err(MachineError::SettingLength {
                setting: "AXL".to_string(),
                expected: 4
            })
        );
        assert_eq!(
            m.set_rotors("AXL3"),
            Err(MachineError::Cipher(CipherError::UnknownSymbol { symbol: '3' }))
        );
        assert_eq!(m.positions(), "AAAA");
    }

    #[test]
    fn single_letter_reference() {
        let mut m = ready(&["B", "Beta", "I"], "AA", "");
        assert_eq!(m.convert_message("A").unwrap(), "N");
        assert_eq!(m.positions(), "AB");
    }

    #[test]
    fn single_pawl_machine_only_turns_fast_rotor() {
        let mut m = ready(&["B", "Beta", "I"], "AA", "");
        assert_eq!(m.convert_message("AAAAAAAAAA").unwrap(), "NRNLINTKBN");
        assert_eq!(m.positions(), "AK");
    }

    #[test]
    fn published_message_with_plugboard() {
        let mut m = ready(
            &["B", "Beta", "III", "IV", "I"],
            "AXLE",
            "(HQ) (EX) (IP) (TR) (BY)",
        );
        assert_eq!(
            m.convert_message("FROMHISSHOULDERHIAWATHA").unwrap(),
            "QVPQSOKOILPUBKJZPISFXDW"
        );
    }

    #[test]
    fn four_rotor_naval_vector() {
        let mut m = ready(&["B", "Beta", "I", "II", "III"], "AAAA", "");
        assert_eq!(m.convert_message("HELLOWORLD").unwrap(), "ILBDAAMTAZ");
    }

    #[test]
    fn double_step_sequence() {
        let mut m = ready(&["B", "Beta", "I", "II", "III"], "AADU", "");
        let mut seen = Vec::new();
        for _ in 0..4 {
            m.convert(0).unwrap();
            seen.push(m.positions());
        }
        assert_eq!(seen, ["AADV", "AAEW", "ABFX", "ABFY"]);
    }

    #[test]
    fn leftmost_moving_rotor_carries_once() {
        let mut m = ready(&["B", "Beta", "I", "II", "III"], "AQEV", "");
        m.convert(0).unwrap();
        assert_eq!(m.positions(), "ARFW");
    }

    #[test]
    fn two_notch_rotors_carry_on_both() {
        let mut m = ready(&["B", "Beta", "VI", "VII", "VIII"], "AAZY", "");
        let mut seen = Vec::new();
        for _ in 0..4 {
            m.convert(0).unwrap();
            seen.push(m.positions());
        }
        assert_eq!(seen, ["ABAZ", "ABBA", "ABBB", "ABBC"]);
    }

    #[test]
    fn encoding_is_self_inverse_after_reset() {
        let plaintext = "THEQUICKBROWNFOXJUMPSOVERTHELAZYDOG";
        let mut m = ready(&["C", "Gamma", "VI", "VII", "VIII"], "QZMA", "(AB) (CD)");
        let ciphertext = m.convert_message(plaintext).unwrap();
        assert_eq!(ciphertext, "LPVXVVMQSGQFFEJUSDIRKQDODAYCRXFAOIK");

        m.set_rotors("QZMA").unwrap();
        assert_eq!(m.convert_message(&ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn foreign_symbol_leaves_rotors_untouched() {
        let mut m = ready(&["B", "Beta", "I", "II", "III"], "AAAA", "");
        assert_eq!(
            m.convert_message("HELLO WORLD"),
            Err(MachineError::Cipher(CipherError::UnknownSymbol { symbol: ' ' }))
        );
        assert_eq!(m.positions(), "AAAA");
    }

    #[test]
    fn state_persists_across_messages() {
        let mut m = ready(&["B", "Beta", "I", "II", "III"], "AAAA", "");
        let first = m.convert_message("HELLO").unwrap();
        let second = m.convert_message("WORLD").unwrap();
        assert_eq!(format!("{first}{second}"), "ILBDAAMTAZ");
    }

    #[test]
    fn convert_wraps_out_of_range_indices() {
        let mut a = ready(&["B", "Beta", "I"], "AA", "");
        let mut b = ready(&["B", "Beta", "I"], "AA", "");
        assert_eq!(a.convert(26).unwrap(), b.convert(0).unwrap());
        assert_eq!(a.convert(-1).unwrap(), b.convert(25).unwrap());
    }

    #[test]
    fn apply_directive() {
        let mut m = machine(5, 3);
        let directive = SettingDirective {
            rotors: ["B", "Beta", "III", "IV", "I"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            positions: "AXLE".to_string(),
            plugboard: "(HQ) (EX) (IP) (TR) (BY)".to_string(),
        };
        m.apply(&directive).unwrap();
        assert_eq!(m.state(), MachineState::Ready);
        assert_eq!(m.arrangement(), ["B", "Beta", "III", "IV", "I"]);
        assert_eq!(m.plugboard().cycles(), "(HQ) (EX) (IP) (TR) (BY)");
        assert_eq!(m.rotor(2).map(Rotor::name), Some("III"));
        assert_eq!(m.convert_message("FROM").unwrap(), "QVPQ");
    }

    #[test]
    fn apply_rejects_malformed_plugboard() {
        let mut m = machine(5, 3);
        let directive = SettingDirective {
            rotors: ["B", "Beta", "III", "IV", "I"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            positions: "AXLE".to_string(),
            plugboard: "(HQ".to_string(),
        };
        assert!(matches!(
            m.apply(&directive),
            Err(MachineError::Cipher(CipherError::MalformedCycle { .. }))
        ));
    }

    #[test]
    fn trace_sink_receives_each_step() {
        let sink = RecordingSink::default();
        let mut m = ready(&["B", "Beta", "III", "IV", "I"], "AXLE", "(HQ) (EX) (IP) (TR) (BY)")
            .with_sink(Box::new(sink.clone()));
        m.convert_message("FR").unwrap();

        let events = sink.0.lock().unwrap();
        assert_eq!(events.len(), 2);
        let TraceEvent::Step(first) = &events[0] else {
            panic!("expected a step event");
        };
        assert_eq!(first.positions, "AXLF");
        assert_eq!(first.input, 'F');
        assert_eq!(first.plugged, 'F');
        assert_eq!(first.forward.len(), 5);
        assert_eq!(first.backward.len(), 4);
        assert_eq!(first.output, 'Q');
    }

    #[test]
    fn catalog_keeps_configuration_order() {
        let m = machine(5, 3);
        let names: Vec<&str> = m.catalog().map(Rotor::name).collect();
        assert_eq!(names.first(), Some(&"I"));
        assert_eq!(names.last(), Some(&"C"));
        assert_eq!(names.len(), ROTORS.len());
    }
}
