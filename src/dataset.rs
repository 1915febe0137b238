//! Sequencing dataset metadata
//!
//! One [`DatasetRecord`] per input FASTQ file: the identifying name plus the
//! read count, read length, and quality-score ASCII shift that the external
//! trimming tools need on their command line. The builtin table mirrors the
//! datasets used for the published runtime measurements.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::{Result, TrimbenchError};

/// Metadata for one sequencing dataset.
///
/// The record never touches the file itself; a missing or truncated FASTQ
/// surfaces only in the external tool's output at execution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DatasetRecord {
    /// File name without directory or `.fastq` extension
    pub name: String,

    /// Number of sequencing reads in the file
    #[validate(range(min = 1))]
    pub reads: u64,

    /// Read length in bases
    #[validate(range(min = 1))]
    pub read_length: u32,

    /// ASCII offset applied to quality scores
    #[serde(default = "default_quality_shift")]
    pub quality_shift: u32,
}

fn default_quality_shift() -> u32 {
    33
}

impl DatasetRecord {
    pub fn new(name: impl Into<String>, reads: u64, read_length: u32) -> Self {
        Self {
            name: name.into(),
            reads,
            read_length,
            quality_shift: default_quality_shift(),
        }
    }

    /// Absolute path of the input FASTQ under `data_dir`.
    pub fn input_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{}.fastq", self.name))
    }
}

/// Validate a record set: per-record field ranges plus name uniqueness.
pub fn validate_records(records: &[DatasetRecord]) -> Result<()> {
    let mut seen = HashSet::new();
    for record in records {
        record
            .validate()
            .map_err(|e| TrimbenchError::config(format!("dataset '{}': {}", record.name, e)))?;
        if record.name.is_empty() {
            return Err(TrimbenchError::config("dataset with empty name"));
        }
        if !seen.insert(record.name.as_str()) {
            return Err(TrimbenchError::config(format!(
                "duplicate dataset name '{}'",
                record.name
            )));
        }
    }
    Ok(())
}

/// The dataset table compiled into the original measurement scripts.
pub fn builtin_records() -> Vec<DatasetRecord> {
    vec![
        DatasetRecord::new("SRR505743", 225_257_463, 101),
        DatasetRecord::new("SRR505744", 244_674_787, 101),
        DatasetRecord::new("SRR505745", 226_165_495, 101),
        DatasetRecord::new("SRR505746", 252_345_156, 101),
        DatasetRecord::new("SRR557711", 36_037_705, 36),
        DatasetRecord::new("SRR557723", 37_525_647, 36),
        DatasetRecord::new("SRR639080_1", 16_099_716, 101),
        DatasetRecord::new("SRR985867", 21_129_136, 50),
        DatasetRecord::new("SRR988190", 56_746_324, 202),
        DatasetRecord::new("SRR988193", 48_330_712, 202),
        DatasetRecord::new("SRR1029924", 87_105_048, 50),
        DatasetRecord::new("SRR1029925", 83_487_348, 50),
        DatasetRecord::new("SRR1030717", 87_725_913, 97),
        DatasetRecord::new("SRR1163160_1", 82_517_320, 100),
        DatasetRecord::new("B1491_TAGCTT_L001_R1", 68_679_919, 101),
        DatasetRecord::new("B1492_AGTTCC_L001_R1", 97_358_268, 101),
    ]
}
