//! Fuzz target for integration.json parsing.
//!
//! Parsing plus validation must return an error on bad input, never panic.
//! Accepted settings must survive a serialize/parse cycle unchanged.

#![no_main]

use ib_config::IntegrationSettings;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(settings) = IntegrationSettings::from_json_str(text) {
        let again = IntegrationSettings::from_json_str(&settings.to_json_pretty())
            .expect("accepted settings must reparse");
        assert_eq!(settings, again);
    }
});
