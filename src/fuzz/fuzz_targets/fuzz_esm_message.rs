//! ESM Optional IE Fuzzer
//!
//! Feeds arbitrary input to the Deactivate EPS Bearer Context message
//! decoders and re-encodes whatever decodes successfully.
//!
//! Run with: cargo +nightly fuzz run fuzz_esm_message

#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use ogs_esm::prelude::*;

fuzz_target!(|data: &[u8]| {
    let input = Bytes::copy_from_slice(data);

    check::<DeactivateEpsBearerContextAccept>(input.clone(), &DecodeConfig::lenient());
    check::<DeactivateEpsBearerContextRequest>(input.clone(), &DecodeConfig::lenient());
    check::<DeactivateEpsBearerContextRequest>(input, &DecodeConfig::strict());
});

fn check<M: EsmMessageBody + PartialEq + std::fmt::Debug>(input: Bytes, config: &DecodeConfig) {
    let len = input.len();
    let mut buf = input;
    let mut msg = M::default();

    let Ok(consumed) = msg.decode_with(&mut buf, config) else {
        return;
    };
    assert_eq!(consumed, len);
    assert!(buf.is_empty());

    // Decoded messages re-encode and decode back to the same value
    let encoded = msg.to_bytes().expect("decoded message must encode");
    let decoded = M::from_bytes(encoded.freeze()).expect("encoded message must decode");
    assert_eq!(decoded, msg);
}
