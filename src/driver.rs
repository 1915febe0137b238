//! The benchmark driver
//!
//! Executes [`SweepPlan`]s strictly sequentially: drop the page cache once
//! per (repeat, grid point) block, settle, then run the external tool for
//! each dataset with a cooldown pause in between. Every launch blocks until
//! the child exits; there are no retries or timeouts, so a hung tool stalls
//! the remaining sweep.
//!
//! Wall-clock pauses and process launching sit behind the [`DelayPolicy`]
//! and [`CommandRunner`] seams so the full sweep logic runs in tests
//! without sleeping or spawning.

use std::process::Command;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{BenchConfig, ExitPolicy};
use crate::error::{Result, TrimbenchError};
use crate::sweep::{SweepPlan, SweepSpec};

/// Pausing capability between invocations.
pub trait DelayPolicy {
    fn pause(&self, duration: Duration);
}

/// Real wall-clock pauses.
pub struct WallClockDelay;

impl DelayPolicy for WallClockDelay {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// No-op pauses, for tests.
pub struct NoDelay;

impl DelayPolicy for NoDelay {
    fn pause(&self, _duration: Duration) {}
}

/// Process-launching capability.
///
/// Returns the child's exit code, or `None` when it was terminated by a
/// signal. Launch failure itself is an error.
pub trait CommandRunner {
    fn run(&mut self, shell_command: &str) -> Result<Option<i32>>;
}

/// Runs commands through `sh -c`, blocking until exit.
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&mut self, shell_command: &str) -> Result<Option<i32>> {
        let status = Command::new("sh")
            .arg("-c")
            .arg(shell_command)
            .status()
            .map_err(|e| TrimbenchError::spawn(shell_command, e))?;
        Ok(status.code())
    }
}

/// Counts for one completed (or printed) sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepSummary {
    /// Invocations the plan contained
    pub planned: usize,
    /// External benchmark processes actually launched
    pub executed: usize,
    /// Launches that ended with a non-zero exit or a signal
    pub failures: usize,
    /// Page-cache flushes attempted
    pub cache_flushes: usize,
}

/// Sequential sweep executor.
pub struct Driver<'a, R, D> {
    config: &'a BenchConfig,
    runner: R,
    delay: D,
}

impl<'a> Driver<'a, ShellRunner, WallClockDelay> {
    pub fn new(config: &'a BenchConfig) -> Self {
        Self::with_parts(config, ShellRunner, WallClockDelay)
    }
}

impl<'a, R: CommandRunner, D: DelayPolicy> Driver<'a, R, D> {
    pub fn with_parts(config: &'a BenchConfig, runner: R, delay: D) -> Self {
        Self {
            config,
            runner,
            delay,
        }
    }

    /// Run (or, in dry-run mode, print) every invocation of one suite.
    pub fn run_sweep(&mut self, spec: &SweepSpec) -> Result<SweepSummary> {
        let run = &self.config.run;
        let plan = SweepPlan::new(spec, &self.config.datasets, run.repeats);
        let mut summary = SweepSummary {
            planned: plan.len(),
            ..Default::default()
        };

        info!(
            suite = %spec.label,
            program = %spec.program,
            repeats = run.repeats,
            invocations = summary.planned,
            dry_run = run.dry_run,
            "starting sweep"
        );

        if !run.dry_run {
            std::fs::create_dir_all(&self.config.paths.log_dir)?;
        }

        let mut current_block = None;
        for inv in plan.iter() {
            if run.dry_run {
                println!("{}", inv.command_line(&self.config.paths, &run.time_wrapper));
                continue;
            }

            // New (repeat, grid point) block: evict cached file data so the
            // first read measures the disk, then let the system settle.
            if run.drop_cache && current_block != Some(inv.block()) {
                self.clear_cache();
                summary.cache_flushes += 1;
                self.delay.pause(run.settle_delay());
            }
            current_block = Some(inv.block());

            info!(
                label = %inv.label,
                dataset = %inv.record.name,
                run = inv.repeat,
                "running"
            );
            let shell = inv.shell_command(&self.config.paths, &run.time_wrapper);
            debug!(command = %shell);

            match self.runner.run(&shell) {
                Ok(Some(0)) => {}
                Ok(code) => {
                    summary.failures += 1;
                    match run.exit_policy {
                        ExitPolicy::Warn => warn!(
                            label = %inv.label,
                            dataset = %inv.record.name,
                            code = ?code,
                            "external tool exited abnormally"
                        ),
                        ExitPolicy::Ignore => {}
                    }
                }
                Err(e) => {
                    // Launch failure is also non-fatal: keep collecting the
                    // samples that still can be collected.
                    summary.failures += 1;
                    match run.exit_policy {
                        ExitPolicy::Warn => warn!(error = %e, "launch failed"),
                        ExitPolicy::Ignore => {}
                    }
                }
            }
            summary.executed += 1;

            println!("\n\n");
            self.delay.pause(run.cooldown_delay());
        }

        info!(
            suite = %spec.label,
            executed = summary.executed,
            failures = summary.failures,
            "sweep finished"
        );
        Ok(summary)
    }

    /// Run several suites back to back, in the given order.
    pub fn run_suites(&mut self, specs: &[&SweepSpec]) -> Result<Vec<SweepSummary>> {
        specs.iter().map(|spec| self.run_sweep(spec)).collect()
    }

    /// Ask the OS to drop the page cache.
    ///
    /// The flush command's exit status is reported but never propagated: a
    /// permission failure leaves timing skewed by cached data, which the
    /// operator has to judge from the warning.
    fn clear_cache(&mut self) {
        let cmd = &self.config.run.cache_flush_cmd;
        debug!(command = %cmd, "dropping page cache");
        match self.runner.run(cmd) {
            Ok(Some(0)) => {}
            Ok(code) => warn!(code = ?code, "cache flush exited abnormally"),
            Err(e) => warn!(error = %e, "cache flush could not be launched"),
        }
    }
}
