//! Fuzz target for layout decoding.
//!
//! Arbitrary input must never panic, and whatever parses must render back
//! to the exact same text.

#![no_main]

use libfuzzer_sys::fuzz_target;
use muxsave::layout::{checksum, decode, encode, parse, render};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let _ = checksum(s);
    let _ = decode(s);

    if let Ok(node) = parse(s) {
        let body = render(&node).expect("parsed tree renders");
        assert_eq!(body, s);
        let layout = encode(&node).expect("parsed tree encodes");
        assert_eq!(decode(&layout).expect("encoded layout decodes"), node);
    }
});
