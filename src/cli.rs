use std::path::PathBuf;

/// Generates PNG icons from an SVG source using installed external renderers.
#[derive(clap::Parser)]
pub struct Cli {
    /// Sets a custom configuration file path
    #[clap(short, long, env = "STENCIL_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Sets the configuration from a string
    #[clap(long, env = "STENCIL_CONFIG")]
    pub config_string: Option<String>,

    /// Enables debug logging
    #[clap(long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub subcommand: Option<Cmd>,
}

#[derive(clap::Subcommand)]
pub enum Cmd {
    /// Generates the configured icons (the default when no command is given)
    Generate(generate::Cli),

    /// Prints the active configuration
    Config,

    /// Prints version information for stencil and each render backend
    Version,
}

pub mod generate {
    use std::path::PathBuf;

    #[derive(clap::Args, Default)]
    pub struct Cli {
        /// The source SVG file
        #[clap(long)]
        pub source: Option<PathBuf>,

        /// The directory for generated icons
        #[clap(long)]
        pub output_dir: Option<PathBuf>,

        /// Icon sizes in pixels; can be given multiple times
        #[clap(long = "size")]
        pub sizes: Vec<u32>,

        /// Time limit per renderer invocation, e.g. "30s"
        #[clap(long)]
        pub timeout: Option<humantime::Duration>,
    }
}
