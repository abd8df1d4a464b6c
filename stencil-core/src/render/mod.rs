use crate::config::{self, Size};
use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};
use tokio::process::Command;

pub use process::*;

mod process;
mod util;

#[derive(Debug, Default, Copy, Clone)]
pub enum Output {
    #[default]
    Null,
    Inherit,
    Capture,
}

impl From<Output> for Stdio {
    fn from(v: Output) -> Self {
        match v {
            Output::Null => Stdio::null(),
            Output::Inherit => Stdio::inherit(),
            Output::Capture => Stdio::piped(),
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct Options {
    pub stdout: Output,
    pub stderr: Output,
    pub timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            stdout: Output::Null,
            stderr: Output::Null,
            timeout: Duration::from_secs(60),
        }
    }
}

impl Options {
    pub fn inherit_output() -> Options {
        Options {
            stdout: Output::Inherit,
            stderr: Output::Inherit,
            ..Default::default()
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Options {
        Options { timeout, ..self }
    }
}

/// A single rasterization job: one source, one output file, one size.
#[derive(Debug, Copy, Clone)]
pub struct Request<'a> {
    pub source: &'a Path,
    pub output: &'a Path,
    pub size: Size,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("'{0}' is not installed")]
    Unavailable(&'static str),
    #[error("failed to start {0} process")]
    FailedToStart(&'static str, #[source] std::io::Error),
    #[error("error getting subprocess status")]
    SubprocessStatusError(#[source] std::io::Error),
    #[error("error reading from subprocess output")]
    SubprocessIoError(#[source] std::io::Error),
    #[error("error killing process")]
    SubprocessTerminateError(#[source] std::io::Error),
    #[error("{}", .0.message())]
    RenderFailed(ExitStatus),
    #[error("{} did not produce {}", .0, .1.display())]
    MissingArtifact(&'static str, PathBuf),
    #[error("i/o error renaming thumbnail to {}", .0.display())]
    ArtifactIoError(PathBuf, #[source] std::io::Error),
    #[error("{0} timed out after {1:?}")]
    TimedOut(&'static str, Duration),
    #[error("invalid path {}", .0.display())]
    InvalidPath(PathBuf),
    #[error("couldn't determine version from output")]
    FailedToGetVersion,
}

impl Error {
    /// True when the backend executable is missing entirely, as opposed to
    /// having run and failed.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Unavailable(_))
    }
}

/// One of the external rasterizers, in the order they are tried per size.
#[derive(Debug, Clone)]
pub enum Backend {
    RsvgConvert(PathBuf),
    Convert(PathBuf),
    Qlmanage(PathBuf),
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::RsvgConvert(_) => "rsvg-convert",
            Backend::Convert(_) => "convert",
            Backend::Qlmanage(_) => "qlmanage",
        }
    }

    pub fn bin(&self) -> &Path {
        match self {
            Backend::RsvgConvert(bin) | Backend::Convert(bin) | Backend::Qlmanage(bin) => bin,
        }
    }

    pub fn priority_list(backends: &config::Backends) -> Vec<Backend> {
        vec![
            Backend::RsvgConvert(backends.rsvg_convert.clone()),
            Backend::Convert(backends.convert.clone()),
            Backend::Qlmanage(backends.qlmanage.clone()),
        ]
    }

    pub async fn render(&self, request: &Request<'_>, options: &Options) -> Result<(), Error> {
        match self {
            Backend::RsvgConvert(_) => self.render_rsvg_convert(request, options).await,
            Backend::Convert(_) => self.render_convert(request, options).await,
            Backend::Qlmanage(_) => self.render_qlmanage(request, options).await,
        }
    }

    async fn render_rsvg_convert(
        &self,
        request: &Request<'_>,
        options: &Options,
    ) -> Result<(), Error> {
        let size = request.size.to_string();
        let mut cmd = self.command(options);
        cmd.arg("-w")
            .arg(&size)
            .arg("-h")
            .arg(&size)
            .arg(request.source)
            .arg("-o")
            .arg(request.output);
        self.spawn(cmd)?
            .wait_with_timeout(options.timeout)
            .await?
            .check_status()?;
        self.check_artifact(request.output).await
    }

    async fn render_convert(&self, request: &Request<'_>, options: &Options) -> Result<(), Error> {
        let mut cmd = self.command(options);
        cmd.arg("-background")
            .arg("none")
            .arg("-resize")
            .arg(request.size.geometry())
            .arg(request.source)
            .arg(request.output);
        self.spawn(cmd)?
            .wait_with_timeout(options.timeout)
            .await?
            .check_status()?;
        self.check_artifact(request.output).await
    }

    /// Quick Look can't write to an explicit file name, it drops a
    /// `<source-name>.png` thumbnail into the target directory. Render there,
    /// then move the thumbnail to the canonical output path.
    async fn render_qlmanage(&self, request: &Request<'_>, options: &Options) -> Result<(), Error> {
        let output_dir = match request.output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let file_name = request
            .source
            .file_name()
            .ok_or_else(|| Error::InvalidPath(request.source.to_owned()))?;

        let size = request.size.to_string();
        let mut cmd = self.command(options);
        cmd.arg("-t")
            .arg("-s")
            .arg(&size)
            .arg("-o")
            .arg(output_dir)
            .arg(request.source);
        // qlmanage is chatty even on success, keep its console output out of ours
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
        self.spawn(cmd)?
            .wait_with_timeout(options.timeout)
            .await?
            .check_status()?;

        let mut thumbnail_name = file_name.to_os_string();
        thumbnail_name.push(".png");
        let thumbnail = output_dir.join(&thumbnail_name);
        match tokio::fs::metadata(&thumbnail).await {
            Ok(_) => tokio::fs::rename(&thumbnail, request.output)
                .await
                .map_err(|e| Error::ArtifactIoError(request.output.to_owned(), e)),
            Err(_) => Err(Error::MissingArtifact(self.name(), thumbnail)),
        }
    }

    fn command(&self, options: &Options) -> Command {
        let mut cmd = Command::new(self.bin());
        cmd.stdin(Stdio::null())
            .stdout(options.stdout)
            .stderr(options.stderr)
            // kill-on-drop is a final fallback, normally the process gets terminated gracefully
            .kill_on_drop(true);
        cmd
    }

    fn spawn(&self, mut cmd: Command) -> Result<RenderProcess, Error> {
        let child = cmd.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::Unavailable(self.name()),
            _ => Error::FailedToStart(self.name(), e),
        })?;
        Ok(RenderProcess::new(child, self.name()))
    }

    async fn check_artifact(&self, output: &Path) -> Result<(), Error> {
        match tokio::fs::metadata(output).await {
            Ok(_) => Ok(()),
            Err(_) => Err(Error::MissingArtifact(self.name(), output.to_owned())),
        }
    }
}
