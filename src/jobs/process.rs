//! Process-backed job runner
//!
//! Launches each job as a child process: the configured launcher command,
//! then the job's entry point, then the job arguments. The child's exit status
//! decides success.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::registry::JobRunner;
use super::JobId;
use crate::error::{JobError, JobResult};

#[derive(Debug, Clone)]
pub struct ProcessJobRunner {
    launcher: Vec<String>,
}

impl ProcessJobRunner {
    /// `launcher` is the command prefix, e.g. `["java", "-cp", "examples.jar"]`
    pub fn new(launcher: Vec<String>) -> Self {
        Self { launcher }
    }

    pub fn launcher(&self) -> &[String] {
        &self.launcher
    }
}

#[async_trait]
impl JobRunner for ProcessJobRunner {
    async fn run(&self, job: JobId, args: &[String]) -> JobResult<()> {
        let (program, prefix) = self.launcher.split_first().ok_or_else(|| {
            JobError::spawn_failed("<empty launcher>", "launcher command is empty")
        })?;

        let mut command = tokio::process::Command::new(program);
        command
            .args(prefix)
            .arg(job.entry_point())
            .args(args)
            .stdin(Stdio::null());

        debug!(job = %job, program = %program, ?args, "Spawning job process");
        let started = Instant::now();

        // Not killed on drop: an abandoned wait leaves the job running externally.
        let mut child = command
            .spawn()
            .map_err(|e| JobError::spawn_failed(program.clone(), e.to_string()))?;

        info!(job = %job, pid = ?child.id(), "Job process started");

        let status = child
            .wait()
            .await
            .map_err(|e| JobError::Other(format!("failed waiting on {job}: {e}")))?;

        let duration_ms = started.elapsed().as_millis() as u64;
        if status.success() {
            debug!(job = %job, duration_ms, "Job process exited cleanly");
            return Ok(());
        }

        warn!(job = %job, duration_ms, status = %status, "Job process failed");
        match status.code() {
            Some(code) => Err(JobError::NonZeroExit { code }),
            None => Err(JobError::Terminated),
        }
    }
}
