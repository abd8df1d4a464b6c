use crate::new_workdir;
use assert_cmd::Command;
use integration_tests::Workdir;
use std::path::{Path, PathBuf};
use stencil_core::config::{Backends, Config, Size};

fn svg_fixture(dir: &Path) -> PathBuf {
    let source = dir.join("ic copy.svg");
    std::fs::write(&source, "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();
    source
}

fn write_config(workdir: &Workdir, config: &Config) -> PathBuf {
    let path = workdir.path().join("stencil.toml");
    std::fs::write(&path, toml::to_string(config).unwrap()).unwrap();
    path
}

/// A config whose backends all point at controlled paths, so a test never
/// picks up renderers installed on the host.
fn isolated_config(workdir: &Workdir, source: PathBuf) -> Config {
    Config {
        source,
        output_dir: workdir.path().join("icons"),
        backends: Backends {
            rsvg_convert: workdir.missing_binary(),
            convert: workdir.missing_binary(),
            qlmanage: workdir.missing_binary(),
        },
        ..Config::default()
    }
}

#[test]
fn should_generate_icons_from_configured_source() {
    let workdir = new_workdir();
    let source = svg_fixture(workdir.path());
    let output = workdir.path().join("icons").join("icon16.png");
    let workdir = workdir.with_artifact(&output);
    let mut config = isolated_config(&workdir, source);
    config.sizes = vec![Size(16)];
    config.backends.rsvg_convert = workdir.test_binary();
    let config_file = write_config(&workdir, &config);

    Command::cargo_bin("stencil")
        .unwrap()
        .arg("--config-file")
        .arg(&config_file)
        .arg("generate")
        .assert()
        .success()
        .stdout(format!(
            "\u{2713} Generated {} (rsvg-convert)\n",
            output.display()
        ));
    assert!(output.exists());
}

#[test]
fn should_default_to_generating_icons_when_no_command_is_given() {
    let workdir = new_workdir();
    let source = svg_fixture(workdir.path());
    let output = workdir.path().join("icons").join("icon48.png");
    let workdir = workdir.with_artifact(&output);
    let mut config = isolated_config(&workdir, source);
    config.sizes = vec![Size(48)];
    config.backends.rsvg_convert = workdir.test_binary();
    let config_file = write_config(&workdir, &config);

    Command::cargo_bin("stencil")
        .unwrap()
        .arg("--config-file")
        .arg(&config_file)
        .assert()
        .success();
    assert!(output.exists());
}

#[test]
fn should_exit_nonzero_when_no_backend_is_available() {
    let workdir = new_workdir();
    let source = svg_fixture(workdir.path());
    let config = isolated_config(&workdir, source);
    let config_file = write_config(&workdir, &config);

    let mut expected = String::new();
    for size in &config.sizes {
        expected.push_str(&format!(
            "\u{2717} Failed to generate {}\n",
            config.output_dir.join(size.file_name()).display()
        ));
        expected.push_str("  Please install rsvg-convert: brew install librsvg\n");
        expected.push_str("  Or use an online converter: https://cloudconvert.com/svg-to-png\n");
    }

    Command::cargo_bin("stencil")
        .unwrap()
        .arg("--config-file")
        .arg(&config_file)
        .arg("generate")
        .assert()
        .failure()
        .stdout(expected);
    // the output directory is still created
    assert!(config.output_dir.is_dir());
}

#[test]
fn should_print_active_configuration() {
    let workdir = new_workdir();
    let source = svg_fixture(workdir.path());
    let config = isolated_config(&workdir, source);
    let config_file = write_config(&workdir, &config);

    Command::cargo_bin("stencil")
        .unwrap()
        .arg("--config-file")
        .arg(&config_file)
        .arg("config")
        .assert()
        .success()
        .stdout(toml::to_string_pretty(&config).unwrap());
}

#[test]
fn should_report_missing_backends_in_version_output() {
    let workdir = new_workdir();
    let source = svg_fixture(workdir.path());
    let config = isolated_config(&workdir, source);
    let config_file = write_config(&workdir, &config);

    Command::cargo_bin("stencil")
        .unwrap()
        .arg("--config-file")
        .arg(&config_file)
        .arg("version")
        .assert()
        .success()
        .stdout(
            "stencil: 0.1.0\n\
             rsvg-convert: not installed\n\
             convert: not installed\n\
             qlmanage: not installed\n",
        );
}
