//! Ratchet-and-pawl advance rule.
//!
//! The rule is evaluated on a snapshot of the arrangement taken before any
//! rotor moves, so no advance within a tick can influence another slot's
//! decision in the same tick. Slots are numbered from the reflector (0) to
//! the fastest rotor (N-1).

use crate::cipher::Rotor;

/// Pre-tick state of one slot, as seen by the pawls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pawl {
    /// The rotor in this slot is pawl-driven.
    pub rotates: bool,
    /// The rotor in this slot sits on one of its notches.
    pub at_notch: bool,
}

impl Pawl {
    /// Snapshot of `rotor`'s stepping state.
    #[must_use]
    pub fn of(rotor: &Rotor) -> Self {
        Self {
            rotates: rotor.rotates(),
            at_notch: rotor.at_notch(),
        }
    }
}

/// Decides which slots advance on this tick.
///
/// For each rotating slot `i`, in ascending order:
/// - the rightmost slot always advances;
/// - otherwise it advances if slot `i + 1` is at its notch (carry);
/// - otherwise it advances if slot `i - 1` also rotates and slot `i` is
///   itself at its notch (the double step).
///
/// Non-rotating slots never advance.
#[must_use]
pub fn plan_advances(slots: &[Pawl]) -> Vec<bool> {
    let last = slots.len().saturating_sub(1);

    slots
        .iter()
        .enumerate()
        .map(|(i, pawl)| {
            if !pawl.rotates {
                return false;
            }
            if i == last {
                return true;
            }
            if slots[i + 1].at_notch {
                return true;
            }
            i > 0 && slots[i - 1].rotates && pawl.at_notch
        })
        .collect()
}
