#![no_main]

use libfuzzer_sys::fuzz_target;

use faultline_rca::reason::extract::refinement_from_text;

// Arbitrary text must never panic the three-stage extraction, only yield
// Some(refinement) or None.
fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = refinement_from_text(text);
    }
});
