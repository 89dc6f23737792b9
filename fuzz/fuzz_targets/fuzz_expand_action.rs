#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(spec) = serde_json::from_slice::<serde_json::Value>(data) {
        if let Ok(action) = restspec::expand_action(&spec) {
            // The canonical form must expand to itself.
            let again =
                restspec::expand_action(&action.to_value()).expect("canonical form expands");
            assert_eq!(again, action);
        }
    }
});
