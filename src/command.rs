//! Command-line construction for external tool invocations
//!
//! An [`Invocation`] is one fully resolved run of an external binary against
//! one dataset. Building the command string is pure: no path is checked for
//! existence here, a missing input file or executable surfaces only when the
//! shell launches the process.

use std::path::{Path, PathBuf};

use crate::config::PathSettings;
use crate::dataset::DatasetRecord;

/// One planned run of an external tool against one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Suite label, used in log file names (e.g. `ten-zeros-t30`)
    pub label: String,
    /// External executable name (e.g. `trimZeroOneZerosAllowed`)
    pub program: String,
    /// Dataset the tool runs against
    pub record: DatasetRecord,
    /// Whether the tool takes `-s <quality_shift>`
    pub uses_quality_shift: bool,
    /// Extra flag/value pairs appended verbatim, in order
    pub extra_flags: Vec<(String, String)>,
    /// 1-based repeat index
    pub repeat: u32,
    /// Index of the parameter set within the sweep grid
    pub param_index: usize,
}

impl Invocation {
    /// The (repeat, parameter-set) block this invocation belongs to.
    ///
    /// The page cache is dropped once per block, before the first dataset.
    pub fn block(&self) -> (u32, usize) {
        (self.repeat, self.param_index)
    }

    /// Log file for this invocation: `<label>_<name>_run_<repeat>.txt`.
    pub fn log_path(&self, log_dir: &Path) -> PathBuf {
        log_dir.join(format!(
            "{}_{}_run_{}.txt",
            self.label, self.record.name, self.repeat
        ))
    }

    /// The bare command: timing wrapper, executable path, and arguments.
    ///
    /// Deterministic string construction; identical inputs always yield an
    /// identical string.
    pub fn command_line(&self, paths: &PathSettings, time_wrapper: &str) -> String {
        let mut cmd = String::new();
        if !time_wrapper.is_empty() {
            cmd.push_str(time_wrapper);
            if !time_wrapper.ends_with(' ') {
                cmd.push(' ');
            }
        }
        cmd.push_str(&paths.exec_dir.join(&self.program).to_string_lossy());
        cmd.push_str(" -i ");
        cmd.push_str(&self.record.input_path(&paths.data_dir).to_string_lossy());
        cmd.push_str(&format!(" -l {}", self.record.read_length));
        cmd.push_str(&format!(" -r {}", self.record.reads));
        if self.uses_quality_shift {
            cmd.push_str(&format!(" -s {}", self.record.quality_shift));
        }
        for (flag, value) in &self.extra_flags {
            cmd.push_str(&format!(" {} {}", flag, value));
        }
        cmd
    }

    /// The command as handed to the shell in live mode, with stdout and
    /// stderr append-redirected into the per-run log file.
    pub fn shell_command(&self, paths: &PathSettings, time_wrapper: &str) -> String {
        format!(
            "{} >> {} 2>&1",
            self.command_line(paths, time_wrapper),
            self.log_path(&paths.log_dir).to_string_lossy()
        )
    }
}
