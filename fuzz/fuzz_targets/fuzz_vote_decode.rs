#![no_main]

use libfuzzer_sys::fuzz_target;
use peervote_protocol::{decode_vote_cast, decode_vote_init, encode_vote_cast, encode_vote_init};

// Decoding arbitrary metadata must never panic, and anything that decodes
// must re-encode to bytes that decode to the same record.
fuzz_target!(|data: &[u8]| {
    if let Ok(record) = decode_vote_init(data) {
        let again = decode_vote_init(&encode_vote_init(&record)).expect("re-encoded init decodes");
        assert_eq!(again, record);
    }
    if let Ok(record) = decode_vote_cast(data) {
        let again = decode_vote_cast(&encode_vote_cast(&record)).expect("re-encoded cast decodes");
        assert_eq!(again, record);
    }
});
