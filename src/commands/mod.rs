use crate::cli;
use stencil_core::{
    config::{Config, Size},
    generate::{Generator, Outcome, Report},
    render::{Backend, Options},
};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn write_color(text: &str, fg_color: Color) -> std::io::Result<()> {
    use std::io::Write as _;

    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    stdout.set_color(ColorSpec::new().set_fg(Some(fg_color)))?;
    let result = stdout.write_all(text.as_bytes());
    stdout.reset().ok();
    result
}

fn print_report(report: &Report) -> std::io::Result<()> {
    match &report.outcome {
        Outcome::Generated { backend } => {
            write_color("\u{2713}", Color::Green)?;
            println!(" Generated {} ({})", report.output.display(), backend);
        }
        Outcome::Failed { attempts } => {
            write_color("\u{2717}", Color::Red)?;
            println!(" Failed to generate {}", report.output.display());
            for attempt in attempts {
                println!("    {}: {}", attempt.backend, attempt.error);
            }
            println!("  Please install rsvg-convert: brew install librsvg");
            println!("  Or use an online converter: https://cloudconvert.com/svg-to-png");
        }
    }
    Ok(())
}

pub async fn generate(config: &Config, args: cli::generate::Cli) -> eyre::Result<()> {
    let source = args.source.unwrap_or_else(|| config.source.clone());
    let output_dir = args.output_dir.unwrap_or_else(|| config.output_dir.clone());
    let sizes = if args.sizes.is_empty() {
        config.sizes.clone()
    } else {
        args.sizes.into_iter().map(Size).collect()
    };
    let timeout = args.timeout.map(Into::into).unwrap_or(config.timeout);

    let generator = Generator::new(
        Backend::priority_list(&config.backends),
        Options::inherit_output().with_timeout(timeout),
    );
    let reports = generator.run(&source, &output_dir, &sizes).await?;

    let mut failures = 0;
    for report in &reports {
        print_report(report)?;
        if !report.is_generated() {
            failures += 1;
        }
    }
    if failures > 0 {
        eyre::bail!("failed to generate {} of {} icons", failures, reports.len());
    }
    Ok(())
}

pub fn config(config: &Config) -> eyre::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

pub async fn version(config: &Config) -> eyre::Result<()> {
    if let Some(version) = stencil_core::VERSION {
        println!("stencil: {}", version);
    } else {
        println!("stencil: [untagged build]")
    }

    for backend in Backend::priority_list(&config.backends) {
        match backend.version_string().await {
            Ok(version) => println!("{}: {}", backend.name(), version),
            Err(err) if err.is_unavailable() => println!("{}: not installed", backend.name()),
            Err(err) => println!(
                "{}: could not determine version ({}), is it installed correctly?",
                backend.name(),
                err
            ),
        }
    }
    Ok(())
}
