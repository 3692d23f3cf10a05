#![no_main]

use libfuzzer_sys::fuzz_target;
use enigma::config::SettingDirective;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let num_rotors = usize::from(data[0] % 8);
    if let Ok(line) = std::str::from_utf8(&data[1..]) {
        if let Ok(directive) = SettingDirective::parse(line, num_rotors) {
            assert_eq!(directive.rotors.len(), num_rotors);
            let reparsed = SettingDirective::parse(&directive.to_string(), num_rotors);
            assert_eq!(reparsed.ok(), Some(directive));
        }
    }
});
