//! Fuzz target for session file rehydration.
//!
//! Arbitrary JSON must not panic when rebuilt into window trees, and any
//! session that rebuilds must flatten to records that rebuild to the same
//! session and flatten to the same records again.

#![no_main]

use libfuzzer_sys::fuzz_target;
use muxsave::session::{Session, SessionFile};

fuzz_target!(|data: &[u8]| {
    let Ok(file) = serde_json::from_slice::<SessionFile>(data) else {
        return;
    };
    let Ok(session) = Session::try_from(file) else {
        return;
    };

    let flattened = SessionFile::from(&session);
    let restored = Session::try_from(flattened.clone()).expect("flattened session rebuilds");
    assert_eq!(restored, session);
    assert_eq!(SessionFile::from(&restored), flattened);
    let _ = session.to_string();
});
