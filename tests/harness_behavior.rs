//! End-to-end behavior of the benchmark harness
//!
//! Exercises plan construction, command generation, and the driver loop
//! through the public API, with a recording runner in place of the shell
//! and zero-length pauses in place of the settle/cooldown sleeps.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use trimbench::config::BenchConfig;
use trimbench::dataset::DatasetRecord;
use trimbench::driver::{CommandRunner, Driver, NoDelay};
use trimbench::error::Result;
use trimbench::sweep::{builtin_suites, find_suite, ParamSet, SweepPlan, SweepSpec};

#[derive(Clone)]
struct RecordingRunner {
    commands: Arc<Mutex<Vec<String>>>,
}

impl RecordingRunner {
    fn new() -> Self {
        Self {
            commands: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, shell_command: &str) -> Result<Option<i32>> {
        self.commands.lock().unwrap().push(shell_command.to_string());
        Ok(Some(0))
    }
}

fn two_dataset_config() -> BenchConfig {
    let mut config = BenchConfig::default();
    config.paths.exec_dir = PathBuf::from("/opt/trimming");
    config.paths.data_dir = PathBuf::from("/space/fastq");
    config.paths.log_dir = std::env::temp_dir().join("trimbench-test-logs");
    config.run.drop_cache = false;
    config.run.time_wrapper = String::new();
    config.datasets = vec![
        DatasetRecord::new("SRR985867", 21_129_136, 50),
        DatasetRecord::new("SRR988190", 56_746_324, 202),
    ];
    config
}

fn threshold_suite() -> SweepSpec {
    SweepSpec {
        label: "zero-one".to_string(),
        program: "trimZeroOne".to_string(),
        uses_quality_shift: true,
        base_flags: Vec::new(),
        grid: vec![ParamSet::single("-t", 25), ParamSet::single("-t", 30)],
    }
}

#[test]
fn disk_speed_command_matches_convention() {
    let mut config = two_dataset_config();
    config.datasets = vec![DatasetRecord::new("SRR505743", 225_257_463, 101)];

    let suites = builtin_suites();
    let spec = find_suite(&suites, "diskSpeed").unwrap();
    let plan = SweepPlan::new(spec, &config.datasets, 1);
    let inv = plan.iter().next().unwrap();
    let cmd = inv.command_line(&config.paths, "");

    assert!(cmd.contains("-i /space/fastq/SRR505743.fastq"));
    assert!(cmd.contains("-l 101"));
    assert!(cmd.contains("-r 225257463"));
    assert_eq!(cmd.matches("-i ").count(), 1);
    assert_eq!(cmd.matches("-l ").count(), 1);
    assert_eq!(cmd.matches("-r ").count(), 1);
}

#[test]
fn sweep_issues_twelve_invocations() {
    // 3 repeats x 2 thresholds x 2 datasets
    let config = two_dataset_config();
    let spec = threshold_suite();
    let runner = RecordingRunner::new();
    let mut driver = Driver::with_parts(&config, runner.clone(), NoDelay);

    let summary = driver.run_sweep(&spec).unwrap();
    assert_eq!(summary.planned, 12);
    assert_eq!(summary.executed, 12);
    assert_eq!(runner.commands().len(), 12);
}

#[test]
fn dry_run_spawns_zero_processes() {
    let mut config = two_dataset_config();
    config.run.dry_run = true;
    config.run.drop_cache = true;
    config.run.repeats = 10;

    let spec = threshold_suite();
    let runner = RecordingRunner::new();
    let mut driver = Driver::with_parts(&config, runner.clone(), NoDelay);

    let summary = driver.run_sweep(&spec).unwrap();
    assert_eq!(summary.planned, 40);
    assert_eq!(summary.executed, 0);
    assert!(runner.commands().is_empty());
}

#[test]
fn generated_command_sequence_is_stable() {
    let config = two_dataset_config();
    let spec = threshold_suite();

    let sequence = |cfg: &BenchConfig| -> Vec<String> {
        let runner = RecordingRunner::new();
        let mut driver = Driver::with_parts(cfg, runner.clone(), NoDelay);
        driver.run_sweep(&spec).unwrap();
        runner.commands()
    };

    assert_eq!(sequence(&config), sequence(&config));
}

#[test]
fn log_redirection_uses_label_name_and_run_index() {
    let config = two_dataset_config();
    let spec = threshold_suite();
    let runner = RecordingRunner::new();
    let mut driver = Driver::with_parts(&config, runner.clone(), NoDelay);
    driver.run_sweep(&spec).unwrap();

    let commands = runner.commands();
    let log_dir = config.paths.log_dir.to_string_lossy().to_string();
    assert!(commands[0].contains(&format!(
        "{}/zero-one-t25_SRR985867_run_1.txt",
        log_dir
    )));
    assert!(commands.last().unwrap().contains(&format!(
        "{}/zero-one-t30_SRR988190_run_3.txt",
        log_dir
    )));
    assert!(commands.iter().all(|c| c.ends_with("2>&1")));
}

#[test]
fn config_file_drives_the_sweep() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bench.toml");
    std::fs::write(
        &path,
        r#"
[paths]
exec_dir = "/opt/trimming"
data_dir = "/space/fastq"
log_dir = "/space/logs"

[run]
repeats = 2
drop_cache = false
time_wrapper = ""

[[datasets]]
name = "SRR1029924"
reads = 87105048
read_length = 50
"#,
    )
    .unwrap();

    let mut config = BenchConfig::load_from_file(&path).unwrap();
    assert_eq!(config.datasets.len(), 1);
    assert_eq!(config.datasets[0].quality_shift, 33);
    assert_eq!(config.paths.log_dir, PathBuf::from("/space/logs"));
    // redirect the log dir somewhere writable before running
    config.paths.log_dir = dir.path().join("logs");

    let suites = builtin_suites();
    let spec = find_suite(&suites, "integer-mean").unwrap();
    let runner = RecordingRunner::new();
    let mut driver = Driver::with_parts(&config, runner.clone(), NoDelay);
    let summary = driver.run_sweep(spec).unwrap();

    // 2 repeats x 3 mean thresholds x 1 dataset
    assert_eq!(summary.executed, 6);
    let commands = runner.commands();
    assert!(commands[0].contains("trimIntegerMean"));
    assert!(commands[0].contains("-m 25"));
    assert!(commands[0].contains("-s 33"));
}

#[test]
fn parallel_suite_passes_worker_counts_through() {
    let config = two_dataset_config();
    let suites = builtin_suites();
    let spec = find_suite(&suites, "parallel-mean").unwrap();
    let runner = RecordingRunner::new();
    let mut driver = Driver::with_parts(&config, runner.clone(), NoDelay);
    driver.run_sweep(spec).unwrap();

    let commands = runner.commands();
    // worker counts appear in grid order, after the fixed -m 35
    assert!(commands[0].contains("-m 35"));
    assert!(commands[0].contains("-w 2"));
    let w4 = commands.iter().position(|c| c.contains("-w 4")).unwrap();
    let w8 = commands.iter().position(|c| c.contains("-w 8")).unwrap();
    assert!(w4 < w8);
}
