//! Parameter sweeps over datasets
//!
//! A [`SweepSpec`] describes what to run: one external program, its fixed
//! flags, and a grid of parameter sets to sweep over. A [`SweepPlan`] turns
//! a spec, a dataset table, and a repeat count into a lazy, finite,
//! restartable sequence of [`Invocation`]s in strict
//! repeat -> parameter-set -> dataset order. Planning is decoupled from
//! execution: the plan never spawns anything.

use serde::{Deserialize, Serialize};

use crate::command::Invocation;
use crate::dataset::DatasetRecord;

/// One point of a parameter grid: flags appended to the base command plus a
/// label suffix distinguishing the point in log file names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSet {
    /// Label suffix, e.g. `t25`
    pub suffix: String,
    /// Flag/value pairs, e.g. `[("-t", "25")]`
    pub flags: Vec<(String, String)>,
}

impl ParamSet {
    /// A single-flag parameter point; `-t`/`25` becomes suffix `t25`.
    pub fn single(flag: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        Self {
            suffix: format!("{}{}", flag.trim_start_matches('-'), value),
            flags: vec![(flag.to_string(), value)],
        }
    }
}

/// Description of one benchmark suite: which program to run and which
/// parameter grid to sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSpec {
    /// Suite name, used for CLI selection and as the log label prefix
    pub label: String,
    /// External executable name
    pub program: String,
    /// Whether the program takes `-s <quality_shift>`
    pub uses_quality_shift: bool,
    /// Flags present in every invocation of the suite, before grid flags
    #[serde(default)]
    pub base_flags: Vec<(String, String)>,
    /// Parameter grid; empty means one unparameterized run per dataset
    #[serde(default)]
    pub grid: Vec<ParamSet>,
}

impl SweepSpec {
    /// Number of grid points iterated per repeat (1 for an empty grid).
    pub fn grid_len(&self) -> usize {
        self.grid.len().max(1)
    }
}

/// A concrete, bounded execution plan for one suite.
pub struct SweepPlan<'a> {
    spec: &'a SweepSpec,
    records: &'a [DatasetRecord],
    repeats: u32,
}

impl<'a> SweepPlan<'a> {
    pub fn new(spec: &'a SweepSpec, records: &'a [DatasetRecord], repeats: u32) -> Self {
        Self {
            spec,
            records,
            repeats,
        }
    }

    /// Total number of invocations the plan will yield.
    pub fn len(&self) -> usize {
        self.repeats as usize * self.spec.grid_len() * self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the plan. The plan itself is not consumed; calling `iter`
    /// again restarts from the beginning and yields the identical sequence.
    pub fn iter(&self) -> PlanIter<'a> {
        PlanIter {
            spec: self.spec,
            records: self.records,
            repeats: self.repeats,
            repeat: 1,
            param_index: 0,
            record_index: 0,
        }
    }
}

fn build_invocation(
    spec: &SweepSpec,
    record: &DatasetRecord,
    repeat: u32,
    param_index: usize,
) -> Invocation {
    let param = spec.grid.get(param_index);
    let label = match param {
        Some(p) if !p.suffix.is_empty() => format!("{}-{}", spec.label, p.suffix),
        _ => spec.label.clone(),
    };
    let mut extra_flags = spec.base_flags.clone();
    if let Some(p) = param {
        extra_flags.extend(p.flags.iter().cloned());
    }
    Invocation {
        label,
        program: spec.program.clone(),
        record: record.clone(),
        uses_quality_shift: spec.uses_quality_shift,
        extra_flags,
        repeat,
        param_index,
    }
}

/// Lazy iterator over a [`SweepPlan`], in repeat -> grid point -> dataset
/// order.
pub struct PlanIter<'a> {
    spec: &'a SweepSpec,
    records: &'a [DatasetRecord],
    repeats: u32,
    repeat: u32,
    param_index: usize,
    record_index: usize,
}

impl<'a> Iterator for PlanIter<'a> {
    type Item = Invocation;

    fn next(&mut self) -> Option<Invocation> {
        if self.repeat > self.repeats || self.records.is_empty() {
            return None;
        }
        let inv = build_invocation(
            self.spec,
            &self.records[self.record_index],
            self.repeat,
            self.param_index,
        );

        self.record_index += 1;
        if self.record_index == self.records.len() {
            self.record_index = 0;
            self.param_index += 1;
            if self.param_index == self.spec.grid_len() {
                self.param_index = 0;
                self.repeat += 1;
            }
        }
        Some(inv)
    }
}

/// The suites run by the original measurement campaign.
pub fn builtin_suites() -> Vec<SweepSpec> {
    vec![
        SweepSpec {
            label: "diskSpeed".to_string(),
            program: "diskSpeed".to_string(),
            uses_quality_shift: false,
            base_flags: Vec::new(),
            grid: Vec::new(),
        },
        SweepSpec {
            label: "zero-one".to_string(),
            program: "trimZeroOne".to_string(),
            uses_quality_shift: true,
            base_flags: Vec::new(),
            grid: vec![ParamSet::single("-t", 25), ParamSet::single("-t", 30)],
        },
        SweepSpec {
            label: "five-zeros".to_string(),
            program: "trimZeroOneZerosAllowed".to_string(),
            uses_quality_shift: true,
            base_flags: vec![("-z".to_string(), "5".to_string())],
            grid: vec![ParamSet::single("-t", 25), ParamSet::single("-t", 30)],
        },
        SweepSpec {
            label: "ten-zeros".to_string(),
            program: "trimZeroOneZerosAllowed".to_string(),
            uses_quality_shift: true,
            base_flags: vec![("-z".to_string(), "10".to_string())],
            grid: vec![ParamSet::single("-t", 25), ParamSet::single("-t", 30)],
        },
        SweepSpec {
            label: "integer-mean".to_string(),
            program: "trimIntegerMean".to_string(),
            uses_quality_shift: true,
            base_flags: Vec::new(),
            grid: vec![
                ParamSet::single("-m", 25),
                ParamSet::single("-m", 30),
                ParamSet::single("-m", 35),
            ],
        },
        SweepSpec {
            label: "parallel-mean".to_string(),
            program: "trimIntegerMean".to_string(),
            uses_quality_shift: true,
            base_flags: vec![("-m".to_string(), "35".to_string())],
            grid: vec![
                ParamSet::single("-w", 2),
                ParamSet::single("-w", 4),
                ParamSet::single("-w", 8),
            ],
        },
    ]
}

/// Look up a suite by label among builtin and user-defined suites.
pub fn find_suite<'a>(suites: &'a [SweepSpec], label: &str) -> Option<&'a SweepSpec> {
    suites.iter().find(|s| s.label == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_records() -> Vec<DatasetRecord> {
        vec![
            DatasetRecord::new("SRR985867", 21_129_136, 50),
            DatasetRecord::new("SRR988190", 56_746_324, 202),
        ]
    }

    fn threshold_spec() -> SweepSpec {
        SweepSpec {
            label: "zero-one".to_string(),
            program: "trimZeroOne".to_string(),
            uses_quality_shift: true,
            base_flags: Vec::new(),
            grid: vec![ParamSet::single("-t", 25), ParamSet::single("-t", 30)],
        }
    }

    #[test]
    fn test_plan_len_with_grid() {
        let spec = threshold_spec();
        let records = two_records();
        let plan = SweepPlan::new(&spec, &records, 3);
        // 3 repeats x 2 grid points x 2 records
        assert_eq!(plan.len(), 12);
        assert_eq!(plan.iter().count(), 12);
    }

    #[test]
    fn test_plan_len_without_grid() {
        let spec = SweepSpec {
            label: "diskSpeed".to_string(),
            program: "diskSpeed".to_string(),
            uses_quality_shift: false,
            base_flags: Vec::new(),
            grid: Vec::new(),
        };
        let records = two_records();
        let plan = SweepPlan::new(&spec, &records, 5);
        assert_eq!(plan.len(), 10);
        assert_eq!(plan.iter().count(), 10);
    }

    #[test]
    fn test_iteration_order() {
        let spec = threshold_spec();
        let records = two_records();
        let plan = SweepPlan::new(&spec, &records, 2);
        let labels: Vec<(u32, String, String)> = plan
            .iter()
            .map(|inv| (inv.repeat, inv.label, inv.record.name))
            .collect();

        // repeat 1: t25 over both records, then t30 over both records
        assert_eq!(labels[0], (1, "zero-one-t25".into(), "SRR985867".into()));
        assert_eq!(labels[1], (1, "zero-one-t25".into(), "SRR988190".into()));
        assert_eq!(labels[2], (1, "zero-one-t30".into(), "SRR985867".into()));
        assert_eq!(labels[3], (1, "zero-one-t30".into(), "SRR988190".into()));
        assert_eq!(labels[4].0, 2);
    }

    #[test]
    fn test_plan_restartable() {
        let spec = threshold_spec();
        let records = two_records();
        let plan = SweepPlan::new(&spec, &records, 3);
        let first: Vec<Invocation> = plan.iter().collect();
        let second: Vec<Invocation> = plan.iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_base_flags_precede_grid_flags() {
        let spec = SweepSpec {
            label: "five-zeros".to_string(),
            program: "trimZeroOneZerosAllowed".to_string(),
            uses_quality_shift: true,
            base_flags: vec![("-z".to_string(), "5".to_string())],
            grid: vec![ParamSet::single("-t", 25)],
        };
        let records = two_records();
        let inv = SweepPlan::new(&spec, &records, 1).iter().next().unwrap();
        assert_eq!(
            inv.extra_flags,
            vec![
                ("-z".to_string(), "5".to_string()),
                ("-t".to_string(), "25".to_string())
            ]
        );
        assert_eq!(inv.label, "five-zeros-t25");
    }

    #[test]
    fn test_builtin_suites() {
        let suites = builtin_suites();
        assert_eq!(suites.len(), 6);
        assert!(find_suite(&suites, "diskSpeed").is_some());
        assert!(find_suite(&suites, "ten-zeros").is_some());
        assert!(find_suite(&suites, "no-such-suite").is_none());

        let parallel = find_suite(&suites, "parallel-mean").unwrap();
        assert_eq!(parallel.program, "trimIntegerMean");
        assert_eq!(parallel.base_flags, vec![("-m".to_string(), "35".to_string())]);
        assert_eq!(parallel.grid.len(), 3);
    }
}
