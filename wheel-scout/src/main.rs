//! Discover and catalog published Python wheels.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::io::{IsTerminal, Write};
use std::io::{stderr, stdout};
use wheel_scout_lib::{Host, run};

/// Host backed by the real process streams.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

#[cfg_attr(coverage_nightly, coverage(off))]
impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn output_is_terminal(&self) -> bool {
        stdout().is_terminal()
    }
}

#[tokio::main]
#[cfg_attr(coverage_nightly, coverage(off))]
async fn main() -> Result<(), ohno::AppError> {
    run(&mut RealHost, std::env::args()).await
}
