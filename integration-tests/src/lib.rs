use std::{
    path::{Path, PathBuf},
    time::Duration,
};

mod test_binary;
pub use test_binary::test_binary_main;

// Adapted from
// https://github.com/rust-lang/cargo/blob/485670b3983b52289a2f353d589c57fae2f60f82/tests/testsuite/support/mod.rs#L507
// https://github.com/assert-rs/assert_cmd/blob/3ae01c9cf76e8b652c8ed4d2d64ff53149096339/src/cargo.rs#L192
fn target_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .map(|mut path| {
            path.pop();
            if path.ends_with("deps") {
                path.pop();
            }
            path
        })
        .unwrap()
}

fn exe_name(name: &str) -> String {
    format!("{}{}", name, std::env::consts::EXE_SUFFIX)
}

fn cargo_bin(name: &str) -> PathBuf {
    target_dir().join(exe_name(name))
}

/// A temporary directory holding a copy of the fake renderer binary plus
/// the files that script its behavior.
pub struct Workdir {
    dir: tempfile::TempDir,
}

impl Workdir {
    const TARGET_BINARY_NAME: &'static str = "test-binary";

    pub fn new() -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        // copied, not symlinked: the fake binary locates its workdir through
        // current_exe(), which resolves symlinks
        std::fs::copy(
            cargo_bin("integration-tests"),
            dir.path().join(exe_name(Self::TARGET_BINARY_NAME)),
        )
        .unwrap();
        Self { dir }
    }

    pub fn with_exit_status(self, exit_status: i32) -> Self {
        std::fs::write(self.path().join("exit-status"), exit_status.to_string()).unwrap();
        self
    }

    pub fn with_stdout(self, stdout: impl AsRef<[u8]>) -> Self {
        std::fs::write(self.path().join("stdout"), stdout.as_ref()).unwrap();
        self
    }

    /// Makes the fake renderer create a file at `path`, simulating a tool
    /// that actually produces its output.
    pub fn with_artifact(self, path: &Path) -> Self {
        std::fs::write(self.path().join("artifact"), path.to_str().unwrap()).unwrap();
        self
    }

    /// Makes the fake renderer hang for the given duration before exiting.
    pub fn with_sleep(self, duration: Duration) -> Self {
        std::fs::write(
            self.path().join("sleep-ms"),
            duration.as_millis().to_string(),
        )
        .unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn test_binary(&self) -> PathBuf {
        self.dir.path().join(exe_name(Self::TARGET_BINARY_NAME))
    }

    /// A path inside the workdir where no executable exists.
    pub fn missing_binary(&self) -> PathBuf {
        self.dir.path().join(exe_name("not-installed"))
    }

    pub fn was_invoked(&self) -> bool {
        self.path().join("args").exists()
    }

    pub fn assert_args(&self, args: &[impl AsRef<str>]) -> &Self {
        Args::new(&self.path().join("args")).unwrap().assert_args(args);
        self
    }
}

impl Default for Workdir {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Args {
    args: Vec<String>,
}

impl Args {
    fn new(args_file: &Path) -> std::io::Result<Args> {
        let args = std::fs::read_to_string(args_file)?
            .lines()
            .map(|s| s.to_owned())
            .collect();
        Ok(Args { args })
    }

    pub fn assert_args(&self, args: &[impl AsRef<str>]) -> &Self {
        let args = args.iter().map(|s| s.as_ref()).collect::<Vec<_>>();
        assert_eq!(&self.args, &args);
        self
    }
}
