//! # Jobs
//!
//! External example jobs the harness knows how to launch, and the invocation
//! values that describe a single launch.
//!
//! Every job is identified by a [`JobId`]. The mapping from id to entry point
//! and to the component name used in storage paths is a static table, so no
//! lookup happens at runtime beyond a `match`.

pub mod process;
pub mod registry;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use process::ProcessJobRunner;
pub use registry::{JobRegistry, JobRunner};

/// Identifier of an external example job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobId {
    AvroExample,
    ParquetExample,
    SortMergeBucketWriteExample,
    SortMergeBucketJoinExample,
    SortMergeBucketTransformExample,
    TypedBigQueryTornadoes,
    TypedStorageBigQueryTornadoes,
    BigQueryTornadoes,
}

impl JobId {
    pub const ALL: [JobId; 8] = [
        JobId::AvroExample,
        JobId::ParquetExample,
        JobId::SortMergeBucketWriteExample,
        JobId::SortMergeBucketJoinExample,
        JobId::SortMergeBucketTransformExample,
        JobId::TypedBigQueryTornadoes,
        JobId::TypedStorageBigQueryTornadoes,
        JobId::BigQueryTornadoes,
    ];

    /// Simple name, used as the component segment of storage paths
    pub fn component_name(self) -> &'static str {
        match self {
            JobId::AvroExample => "AvroExample",
            JobId::ParquetExample => "ParquetExample",
            JobId::SortMergeBucketWriteExample => "SortMergeBucketWriteExample",
            JobId::SortMergeBucketJoinExample => "SortMergeBucketJoinExample",
            JobId::SortMergeBucketTransformExample => "SortMergeBucketTransformExample",
            JobId::TypedBigQueryTornadoes => "TypedBigQueryTornadoes",
            JobId::TypedStorageBigQueryTornadoes => "TypedStorageBigQueryTornadoes",
            JobId::BigQueryTornadoes => "BigQueryTornadoes",
        }
    }

    /// Fully qualified main entry point handed to the launcher
    pub fn entry_point(self) -> &'static str {
        match self {
            JobId::AvroExample => "com.spotify.scio.examples.extra.AvroExample",
            JobId::ParquetExample => "com.spotify.scio.examples.extra.ParquetExample",
            JobId::SortMergeBucketWriteExample => {
                "com.spotify.scio.examples.extra.SortMergeBucketWriteExample"
            }
            JobId::SortMergeBucketJoinExample => {
                "com.spotify.scio.examples.extra.SortMergeBucketJoinExample"
            }
            JobId::SortMergeBucketTransformExample => {
                "com.spotify.scio.examples.extra.SortMergeBucketTransformExample"
            }
            JobId::TypedBigQueryTornadoes => {
                "com.spotify.scio.examples.extra.TypedBigQueryTornadoes"
            }
            JobId::TypedStorageBigQueryTornadoes => {
                "com.spotify.scio.examples.extra.TypedStorageBigQueryTornadoes"
            }
            JobId::BigQueryTornadoes => "com.spotify.scio.examples.cookbook.BigQueryTornadoes",
        }
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.component_name())
    }
}

/// A single launch of an external job. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct JobInvocation {
    job: JobId,
    args: Vec<String>,
}

impl JobInvocation {
    pub fn new<I, S>(job: JobId, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            job,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn job(&self) -> JobId {
        self.job
    }

    /// Invocation-specific arguments
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Value of `--method=`, if the invocation selects one
    pub fn method(&self) -> Option<&str> {
        self.args
            .iter()
            .find_map(|arg| arg.strip_prefix("--method="))
    }

    /// Invocation arguments followed by the baseline runner arguments
    pub fn command_args(&self, baseline: &[String]) -> Vec<String> {
        self.args.iter().chain(baseline).cloned().collect()
    }

    /// Short label for log lines, e.g. `AvroExample#specificOut`
    pub fn label(&self) -> String {
        match self.method() {
            Some(method) => format!("{}#{method}", self.job),
            None => self.job.to_string(),
        }
    }
}
