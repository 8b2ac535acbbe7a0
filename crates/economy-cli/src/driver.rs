//! Randomized driver loop: repeatedly makes a randomly chosen item.

use economy_core::engine::ProductionEngine;
use economy_core::graph::GraphError;
use economy_core::observer::Observer;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::Duration;
use tracing::info;

/// How the driver loop runs.
#[derive(Debug, Clone, Default)]
pub struct DriverConfig {
    /// Stop after this many makes. Runs until killed when `None`.
    pub iterations: Option<u64>,
    /// Seed for reproducible item choices. Seeded from entropy when `None`.
    pub seed: Option<u64>,
    /// Pause between makes.
    pub delay: Duration,
}

/// Totals of a finished driver run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverSummary {
    pub makes: u64,
    /// Producer invocations across all makes.
    pub steps: u64,
}

/// Run the loop. Any resolution error stops it immediately.
pub fn run<O: Observer>(
    engine: &ProductionEngine<O>,
    config: &DriverConfig,
) -> Result<DriverSummary, GraphError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut names: Vec<&str> = engine.graph().items().map(|(_, node)| node.name()).collect();
    names.sort_unstable();

    let mut summary = DriverSummary::default();
    loop {
        if let Some(limit) = config.iterations
            && summary.makes >= limit
        {
            break;
        }
        let Some(&target) = names.choose(&mut rng) else {
            break;
        };

        let report = engine.make(target)?;
        summary.makes += 1;
        summary.steps += report.len() as u64;
        info!(iteration = summary.makes, item = target, steps = report.len(), "made item");

        if !config.delay.is_zero() {
            std::thread::sleep(config.delay);
        }
    }

    Ok(summary)
}
