// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the Java log scanner
//!
//! Arbitrary log text must never panic, and every reported message must
//! carry a bad level.

#![no_main]

use libfuzzer_sys::fuzz_target;

use logscrape_java::{Associator, IgnoreSet, JavaMessageScanner};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let ignore = IgnoreSet::new();
        let mut associator = Associator::new(["test_a"]);

        JavaMessageScanner::scan_lines(input.lines(), &ignore, &mut associator);

        let associations = associator.finish();
        for message in associations
            .failed
            .iter()
            .chain(&associations.passed)
            .flat_map(|t| &t.messages)
            .chain(&associations.general)
        {
            assert!(message.severity.is_bad());
        }
    }
});
