#![no_main]

use libfuzzer_sys::fuzz_target;
use peervote_crypto::{base58, decode_address, encode_address};

// Base58 and address parsing must reject garbage without panicking; a
// parsed address must re-encode to the same string.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let _ = base58::decode_check(s);
    if let Ok(payload) = decode_address(s) {
        assert_eq!(encode_address(payload.network, &payload.pubkey_hash).as_str(), s);
    }
});
