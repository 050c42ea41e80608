#![deny(clippy::all, clippy::cargo, clippy::expect_used, clippy::unwrap_used)]
#![deny(clippy::pedantic, clippy::nursery, unsafe_code)]
#![warn(clippy::unimplemented, clippy::redundant_type_annotations)]

use anyhow::Result;
use std::io::BufRead;

pub mod algo;
pub mod core;
pub mod data;

/// Runs the given matcher on the instance read from the reader and writes the
/// mate assignment to stdout, one vertex per line, followed by the number of
/// matched pairs.
///
/// # Errors
/// - If the instance could not be read from the reader.
///
/// # Panics
/// - If the matching is invalid in debug mode.
pub fn run_reader(matcher: &mut dyn core::Matcher, reader: &mut impl BufRead) -> Result<()> {
    let instance: core::Instance = data::deserialize(reader)?;
    let matching = matcher.matching(&instance);

    debug_assert!(matching.verify(), "Matching is invalid: {matching:?}");

    print!("{matching}");
    println!("{}", matching.pairs());

    Ok(())
}
