// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the console scanner
//!
//! Arbitrary console text must never make a matcher panic, and the scan
//! must never inspect more lines than it was given.

#![no_main]

use libfuzzer_sys::fuzz_target;

use logscrape_console::ConsoleScanner;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let total = input.lines().count();
        let scan = ConsoleScanner::scan_lines(input.lines());
        assert!(scan.lines_scanned <= total);
    }
});
