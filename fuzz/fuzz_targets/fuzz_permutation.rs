#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use enigma::cipher::{Alphabet, Permutation};

fuzz_target!(|data: &[u8]| {
    let Ok(cycles) = std::str::from_utf8(data) else {
        return;
    };
    let alphabet = Arc::new(Alphabet::default());
    if let Ok(perm) = Permutation::new(cycles, Arc::clone(&alphabet)) {
        for i in 0..26 {
            assert_eq!(perm.invert(perm.permute(i) as i64), i as usize);
        }
        let normalized = Permutation::new(&perm.cycles(), alphabet).unwrap();
        assert_eq!(normalized, perm);
    }
});
