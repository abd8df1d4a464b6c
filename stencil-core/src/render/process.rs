use super::Error;
use std::time::Duration;
use tokio::process::{Child, ChildStdout};

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum ExitStatus {
    Successful,
    Failed(Option<i32>),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        self == &ExitStatus::Successful
    }

    pub fn check_status(&self) -> Result<(), Error> {
        match self {
            ExitStatus::Successful => Ok(()),
            ExitStatus::Failed(_) => Err(Error::RenderFailed(*self)),
        }
    }

    pub fn message(&self) -> String {
        match self {
            ExitStatus::Successful => "renderer exited successfully".to_owned(),
            ExitStatus::Failed(Some(code)) => {
                format!("renderer exited with error status {}", code)
            }
            ExitStatus::Failed(None) => "renderer exited with unknown error status".to_owned(),
        }
    }
}

#[cfg(unix)]
fn ask_to_terminate(child: &mut Child) -> Result<(), Error> {
    // no PID means the process has already exited
    if let Some(pid) = child.id() {
        unsafe { libc::kill(pid as i32, libc::SIGTERM) };
    }
    Ok(())
}

#[cfg(not(unix))]
fn ask_to_terminate(child: &mut Child) -> Result<(), Error> {
    child.start_kill().map_err(Error::SubprocessTerminateError)
}

#[derive(Debug)]
pub struct RenderProcess {
    child: Child,
    name: &'static str,
}

impl RenderProcess {
    const TERMINATE_GRACE_PERIOD: Duration = Duration::from_secs(5);

    pub(crate) fn new(child: Child, name: &'static str) -> Self {
        RenderProcess { child, name }
    }

    pub fn stdout(&mut self) -> &mut Option<ChildStdout> {
        &mut self.child.stdout
    }

    pub async fn wait(&mut self) -> Result<ExitStatus, Error> {
        let proc_status = self
            .child
            .wait()
            .await
            .map_err(Error::SubprocessStatusError)?;
        if proc_status.success() {
            Ok(ExitStatus::Successful)
        } else {
            Ok(ExitStatus::Failed(proc_status.code()))
        }
    }

    /// Waits for the process to exit; if the timeout expires first, the
    /// process is terminated and the expiry reported as an error.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<ExitStatus, Error> {
        match tokio::time::timeout(timeout, self.wait()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(backend = self.name, ?timeout, "render process timed out");
                self.terminate(Self::TERMINATE_GRACE_PERIOD).await?;
                Err(Error::TimedOut(self.name, timeout))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(pid = self.child.id(), grace_period_secs = grace_period.as_secs_f64()))]
    pub async fn terminate(&mut self, grace_period: Duration) -> Result<(), Error> {
        tracing::debug!("trying to terminate gracefully");
        ask_to_terminate(&mut self.child)?;
        match tokio::time::timeout(grace_period, self.wait()).await {
            Ok(result) => {
                tracing::debug!("process terminated before timeout");
                result?;
            }
            Err(_) => {
                tracing::debug!("process did not terminate before timeout, killing it instead");
                self.child
                    .kill()
                    .await
                    .map_err(Error::SubprocessTerminateError)?;
            }
        };
        Ok(())
    }
}
