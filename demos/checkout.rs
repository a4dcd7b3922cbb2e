//! Checkout Example
//!
//! Prices the orders of a fixture set and prints a receipt for each.
//!
//! Use `-f` to load a fixture set by name
//! Use `-o` to price a single named order from the set

use std::{io, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};

use tally::{fixtures::Fixture, utils::DemoCheckoutArgs};

/// Checkout Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = DemoCheckoutArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let engine = fixture.engine()?;

    let order_names: Vec<String> = match args.order {
        Some(name) => vec![name],
        None => fixture
            .order_names()
            .iter()
            .map(ToString::to_string)
            .collect(),
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for name in order_names {
        let order = fixture.order(&name)?;

        let start = Instant::now();
        let receipt = engine.price(order)?;
        let elapsed = start.elapsed();

        println!("\n{name}");
        receipt.write_to(&mut handle, &engine)?;
        println!("Priced in {}", elapsed.human(Truncate::Nano));
    }

    Ok(())
}
