// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

use criterion::{Criterion, criterion_group, criterion_main};
use logscrape_java::{Associator, IgnoreSet, JavaMessageScanner};

const PREFIX: &str = "10-14 02:13:55.123 10.0.0.7:54321 31337 FJ-1-13";

fn synthetic_log(tests: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for i in 0..tests {
        lines.push(format!("{PREFIX} INFO: STARTING TEST: pyunit_case_{i}.py"));
        lines.push(format!("{PREFIX} INFO: building model {i}"));
        if i % 3 == 0 {
            lines.push(format!("{PREFIX} WARN: Stale lock file found"));
        }
        if i % 7 == 0 {
            lines.push(format!("{PREFIX} ERRR: job {i} failed"));
            lines.push("java.lang.IllegalStateException: boom".to_string());
            lines.push("\tat water.MRTask.dfork(MRTask.java:540)".to_string());
        }
    }
    lines
}

fn java_benchmark(c: &mut Criterion) {
    let log = synthetic_log(2_000);
    let ignore = IgnoreSet::new().with_general(["Stale lock file found"]);
    c.bench_function("scan_java_log_2k_tests", |b| {
        b.iter(|| {
            let mut associator = Associator::new(["pyunit_case_14.py"]);
            let stats = JavaMessageScanner::scan_lines(&log, &ignore, &mut associator);
            std::hint::black_box((stats, associator.finish()))
        })
    });
}

criterion_group!(benches, java_benchmark);
criterion_main!(benches);
