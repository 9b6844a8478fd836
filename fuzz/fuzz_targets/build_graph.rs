#![no_main]

use libfuzzer_sys::fuzz_target;

use faultline_core::model::SignalBatch;
use faultline_rca::GraphBuilder;

// Arbitrary bytes as log text: extraction, timestamp parsing, and edge
// inference must stay panic-free on any input.
fuzz_target!(|data: &[u8]| {
    let batch = SignalBatch {
        log_content: Some(String::from_utf8_lossy(data).into_owned()),
        ..SignalBatch::default()
    };
    let _ = GraphBuilder::default().build(&batch);
});
