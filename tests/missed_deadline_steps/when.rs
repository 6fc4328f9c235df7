//! When steps for missed deadline BDD scenarios.

use super::world::{DeadlineWorld, run_async};
use chrono::TimeDelta;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("{minutes:i64} minutes pass")]
fn minutes_pass(world: &mut DeadlineWorld, minutes: i64) {
    world.clock.advance(TimeDelta::minutes(minutes));
}

#[when("the deadline poller runs")]
fn poller_runs(world: &mut DeadlineWorld) -> Result<(), eyre::Report> {
    run_async(world.poller.tick()).wrap_err("run deadline poll")?;
    Ok(())
}
