#![no_main]

use libfuzzer_sys::fuzz_target;
use enigma::config::ConfigLoader;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // A configuration that loads must also build.
        if let Ok(loaded) = ConfigLoader::with_defaults().load_from_str(text) {
            assert!(loaded.config.build().is_ok());
        }
    }
});
