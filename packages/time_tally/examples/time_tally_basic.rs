//! Example demonstrating the key `time_tally` types working together.
//!
//! This example shows how to:
//! - time functions under their own names
//! - share one timer between several closures with an explicit key
//! - pre-define timers and restrict creation of new ones to catch typos
//!
//! Run with: `cargo run --example time_tally_basic`.
#![expect(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    reason = "this is example code that does not need production-level safety"
)]

use std::collections::HashMap;
use std::hint::black_box;

use time_tally::{Error, Registry};

fn build_index(words: &[&str]) -> HashMap<String, usize> {
    let mut index = HashMap::new();

    for word in words {
        *index.entry((*word).to_string()).or_insert(0) += 1;
    }

    index
}

fn checksum(data: &[u8]) -> u64 {
    data.iter()
        .fold(0_u64, |acc, &byte| acc.wrapping_mul(31).wrapping_add(u64::from(byte)))
}

fn main() -> time_tally::Result<()> {
    println!("=== Accumulating Timer Example ===");
    println!();

    // Timers "setup" and "teardown" are listed even if nothing ever records into them.
    let registry = Registry::builder().define(["setup", "teardown"]).build()?;

    // Timed under their own names: "build_index" and "checksum".
    let mut timed_build_index = registry.wrap(build_index)?;
    let mut timed_checksum = registry.wrap(checksum)?;

    let words = ["alpha", "beta", "gamma", "alpha", "delta", "beta", "alpha"];
    let payload: Vec<u8> = (0..100_000_u32).map(|i| (i % 251) as u8).collect();

    for _ in 0..100 {
        black_box(timed_build_index.call((words.as_slice(),))?);
        black_box(timed_checksum.call((payload.as_slice(),))?);
    }

    // Two different closures feeding one timer.
    let mut encode = registry.wrap_as("codec", |text: &str| {
        text.bytes().rev().collect::<Vec<_>>()
    })?;
    let mut decode = registry.wrap_as("codec", |bytes: Vec<u8>| {
        bytes.into_iter().rev().collect::<Vec<_>>()
    })?;

    for _ in 0..1000 {
        let encoded = encode.call(("hello timers",))?;
        black_box(decode.call((encoded,))?);
    }

    // From now on, only the timers that already exist can be updated.
    registry.restrict_dynamic_creation();

    let mut misspelled = registry.wrap_as("codex", |x: u32| x + 1)?;
    match misspelled.call((1,)) {
        Err(Error::UnknownTimerKey { key }) => println!("✓ Rejected unknown timer '{key}'"),
        other => println!("✗ Unexpected result: {other:?}"),
    }
    println!();

    registry.print_all();

    Ok(())
}
