//! Example demonstrating an instrumented hot loop.
//!
//! Run with counting disabled (the default):
//!
//! ```text
//! cargo run --example instrumented_loop
//! ```
//!
//! Or point `TALLY_COUNTERS` at a file to record counts:
//!
//! ```text
//! TALLY_COUNTERS=/tmp/loop.counters cargo run --example instrumented_loop
//! cargo run -p tally-cli -- dump /tmp/loop.counters --nonzero
//! ```

use tally::Recorder;

/// Labels for the instrumentation points in this program. In real use these
/// are assigned by whatever generates the instrumented code.
mod labels {
    pub const ITERATIONS: usize = 0;
    pub const EVEN_INPUT: usize = 1;
    pub const COLLATZ_STEP: usize = 2;
    pub const LONG_ORBIT: usize = 3;
}

const NCOUNTER: usize = 4;

fn main() {
    tracing_subscriber::fmt::init();

    // The one setup call, before any instrumented path runs.
    let recorder: Recorder<NCOUNTER> = Recorder::from_env();

    if recorder.is_enabled() {
        println!(
            "counting into {}",
            recorder.path().unwrap_or("<unknown>")
        );
    } else {
        println!("counting disabled (set TALLY_COUNTERS to enable)");
    }

    let mut longest = 0u32;
    for n in 1u64..10_000 {
        recorder.count(labels::ITERATIONS);
        if n % 2 == 0 {
            recorder.count(labels::EVEN_INPUT);
        }

        let steps = collatz_steps(n, &recorder);
        if steps > 150 {
            recorder.count(labels::LONG_ORBIT);
        }
        longest = longest.max(steps);
    }

    println!("longest orbit: {longest} steps");
    // No teardown: counts reach the file when the process exits.
}

/// Counts Collatz steps for `n`, bumping a counter per step.
fn collatz_steps(mut n: u64, recorder: &Recorder<NCOUNTER>) -> u32 {
    let mut steps = 0;
    while n != 1 {
        recorder.count(labels::COLLATZ_STEP);
        n = if n % 2 == 0 { n / 2 } else { 3 * n + 1 };
        steps += 1;
    }
    steps
}
