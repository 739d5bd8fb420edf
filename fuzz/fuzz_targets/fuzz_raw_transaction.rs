#![no_main]

use libfuzzer_sys::fuzz_target;
use peervote_provider::RawTransaction;

// Explorer responses are untrusted: parsing them and extracting the data
// output must never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(tx) = serde_json::from_slice::<RawTransaction>(data) {
        let _ = tx.data();
        let _ = tx.is_mined();
    }
});
