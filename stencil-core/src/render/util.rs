use super::{Backend, Error, Options, Output};
use tokio::io::{AsyncBufReadExt, BufReader};

impl Backend {
    /// Queries the backend's version string. Quick Look has no version flag,
    /// so for it this only reports that the tool is present.
    pub async fn version_string(&self) -> Result<String, Error> {
        match self {
            Backend::RsvgConvert(_) => self.probe_version(&["--version"]).await,
            Backend::Convert(_) => self.probe_version(&["-version"]).await,
            Backend::Qlmanage(_) => self.probe_presence().await,
        }
    }

    async fn probe_version(&self, args: &[&str]) -> Result<String, Error> {
        let options = Options {
            stdout: Output::Capture,
            ..Default::default()
        };
        let mut cmd = self.command(&options);
        cmd.args(args);
        let mut process = self.spawn(cmd)?;
        let mut lines = BufReader::new(
            process
                .stdout()
                .take()
                .expect("should be present because of params"),
        )
        .lines();
        let mut version = None;
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(Error::SubprocessIoError)?
        {
            if let Some(v) = version_line(&line) {
                version = Some(v.to_string());
                break;
            }
        }
        process.wait_with_timeout(options.timeout).await?;
        version.ok_or(Error::FailedToGetVersion)
    }

    async fn probe_presence(&self) -> Result<String, Error> {
        let options = Options::default();
        let cmd = self.command(&options);
        let mut process = self.spawn(cmd)?;
        // the exit status doesn't matter, spawning proves the tool exists
        process.wait_with_timeout(options.timeout).await?;
        Ok("present".to_owned())
    }
}

fn version_line(line: &str) -> Option<&str> {
    Some(line.trim()).filter(|s| !s.is_empty())
}
