//! trimbench: a benchmark driver for external sequence-trimming tools
//!
//! Builds shell command lines for a fixed table of FASTQ datasets and runs
//! them strictly sequentially, dropping the OS page cache between timed
//! blocks and redirecting each tool's output into a per-run log file. The
//! trimming tools themselves (`diskSpeed`, `trimZeroOne`,
//! `trimZeroOneZerosAllowed`, `trimIntegerMean`) are external binaries and
//! not part of this crate.

pub mod command;
pub mod config;
pub mod dataset;
pub mod driver;
pub mod error;
pub mod logging;
pub mod sweep;

pub use command::Invocation;
pub use config::BenchConfig;
pub use dataset::DatasetRecord;
pub use driver::{Driver, SweepSummary};
pub use error::{Result, TrimbenchError};
pub use sweep::{SweepPlan, SweepSpec};
