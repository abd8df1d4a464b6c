use crate::{
    config::Size,
    render::{self, Backend, Options, Request},
};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Attempt {
    pub backend: &'static str,
    pub error: render::Error,
}

#[derive(Debug)]
pub enum Outcome {
    Generated { backend: &'static str },
    Failed { attempts: Vec<Attempt> },
}

/// What happened for a single size. A failed size carries every backend
/// attempt that actually ran; backends that weren't installed don't count
/// as attempts.
#[derive(Debug)]
pub struct Report {
    pub size: Size,
    pub output: PathBuf,
    pub outcome: Outcome,
}

impl Report {
    pub fn is_generated(&self) -> bool {
        matches!(self.outcome, Outcome::Generated { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("failed to create output directory {}", .0.display())]
    CreateOutputDir(PathBuf, #[source] std::io::Error),
}

/// Runs the per-size fallback loop over an ordered list of render backends.
#[derive(Debug)]
pub struct Generator {
    backends: Vec<Backend>,
    options: Options,
}

impl Generator {
    pub fn new(backends: Vec<Backend>, options: Options) -> Self {
        Generator { backends, options }
    }

    /// Generates one icon per size, trying each backend in order and
    /// stopping at the first success. A failed size never aborts the run,
    /// the remaining sizes are still processed.
    pub async fn run(
        &self,
        source: &Path,
        output_dir: &Path,
        sizes: &[Size],
    ) -> Result<Vec<Report>, GenerateError> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| GenerateError::CreateOutputDir(output_dir.to_owned(), e))?;

        let mut reports = Vec::with_capacity(sizes.len());
        for &size in sizes {
            reports.push(self.generate_size(source, output_dir, size).await);
        }
        Ok(reports)
    }

    async fn generate_size(&self, source: &Path, output_dir: &Path, size: Size) -> Report {
        let output = output_dir.join(size.file_name());
        let request = Request {
            source,
            output: &output,
            size,
        };

        let mut attempts = Vec::new();
        for backend in &self.backends {
            match backend.render(&request, &self.options).await {
                Ok(()) => {
                    tracing::info!(
                        backend = backend.name(),
                        output = %output.display(),
                        "generated icon"
                    );
                    return Report {
                        size,
                        output,
                        outcome: Outcome::Generated {
                            backend: backend.name(),
                        },
                    };
                }
                Err(err) if err.is_unavailable() => {
                    tracing::debug!(backend = backend.name(), "backend not installed, skipping");
                }
                Err(err) => {
                    tracing::warn!(backend = backend.name(), error = %err, "backend failed");
                    attempts.push(Attempt {
                        backend: backend.name(),
                        error: err,
                    });
                }
            }
        }
        Report {
            size,
            output,
            outcome: Outcome::Failed { attempts },
        }
    }
}
