// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for ignore set parsing
//!
//! This fuzzes `IgnoreSet::from_json` with arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;

use logscrape_java::{GENERAL_BUCKET, IgnoreSet};

fuzz_target!(|data: &[u8]| {
    if let Ok(json) = std::str::from_utf8(data) {
        // Parsing should never panic, only return errors
        if let Ok(set) = IgnoreSet::from_json(json) {
            assert!(set.bucket(GENERAL_BUCKET).is_some());
        }
    }
});
