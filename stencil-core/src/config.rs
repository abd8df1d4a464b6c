use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

/// Target pixel width and height (square) of a generated icon.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Size(pub u32);

impl Size {
    /// The canonical output file name for this size.
    pub fn file_name(&self) -> String {
        format!("icon{}.png", self.0)
    }

    /// The `<width>x<height>` geometry spec ImageMagick expects.
    pub fn geometry(&self) -> String {
        format!("{}x{}", self.0, self.0)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Backends {
    #[serde(rename = "rsvg-convert", alias = "rsvg_convert")]
    pub rsvg_convert: PathBuf,
    pub convert: PathBuf,
    pub qlmanage: PathBuf,
}

impl Default for Backends {
    fn default() -> Self {
        Backends {
            rsvg_convert: PathBuf::from("rsvg-convert"),
            convert: PathBuf::from("convert"),
            qlmanage: PathBuf::from("qlmanage"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: PathBuf,
    #[serde(rename = "output-dir", alias = "output_dir")]
    pub output_dir: PathBuf,
    pub sizes: Vec<Size>,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub backends: Backends,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: PathBuf::from("ic copy.svg"),
            output_dir: PathBuf::from("icons"),
            sizes: vec![Size(16), Size(48), Size(128)],
            timeout: Duration::from_secs(60),
            backends: Backends::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("invalid configuration string")]
    InvalidConfigString(String, #[source] eyre::Report),
    #[error("invalid configuration file {}", .0.display())]
    InvalidConfigFile(PathBuf, #[source] eyre::Report),
    #[error("i/o error reading configuration file {}", .0.display())]
    IoError(PathBuf, std::io::Error),
}

impl Config {
    pub fn parse(s: &str) -> Result<Config, ConfigLoadError> {
        toml::from_str(s).map_err(|e| ConfigLoadError::InvalidConfigString(s.to_owned(), e.into()))
    }

    pub async fn parse_file(p: &Path) -> Result<Config, ConfigLoadError> {
        let config_string = tokio::fs::read_to_string(p)
            .await
            .map_err(|e| ConfigLoadError::IoError(p.to_owned(), e))?;
        toml::from_str(&config_string)
            .map_err(|e| ConfigLoadError::InvalidConfigFile(p.to_owned(), e.into()))
    }
}
