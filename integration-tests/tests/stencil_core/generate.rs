use crate::new_workdir;
use std::path::{Path, PathBuf};
use stencil_core::{
    config::Size,
    generate::{Generator, Outcome},
    render::{Backend, Options},
};

fn svg_fixture(dir: &Path) -> PathBuf {
    let source = dir.join("ic copy.svg");
    std::fs::write(&source, "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();
    source
}

#[tokio::test]
async fn should_fall_back_to_next_backend_when_first_is_unavailable() {
    let workdir = new_workdir();
    let source = svg_fixture(workdir.path());
    let icons = workdir.path().join("icons");
    let output = icons.join("icon16.png");
    let workdir = workdir.with_artifact(&output);
    let generator = Generator::new(
        vec![
            Backend::RsvgConvert(workdir.missing_binary()),
            Backend::Convert(workdir.test_binary()),
        ],
        Options::default(),
    );

    let reports = generator
        .run(&source, &icons, &[Size(16)])
        .await
        .unwrap();

    assert_eq!(reports.len(), 1);
    assert!(matches!(
        reports[0].outcome,
        Outcome::Generated { backend: "convert" }
    ));
    workdir.assert_args(&[
        "-background",
        "none",
        "-resize",
        "16x16",
        source.to_str().unwrap(),
        output.to_str().unwrap(),
    ]);
    assert!(output.exists());
}

#[tokio::test]
async fn should_not_invoke_later_backends_after_first_success() {
    let first = new_workdir();
    let second = new_workdir();
    let source = svg_fixture(first.path());
    let icons = first.path().join("icons");
    let output = icons.join("icon16.png");
    let first = first.with_artifact(&output);
    let generator = Generator::new(
        vec![
            Backend::RsvgConvert(first.test_binary()),
            Backend::Convert(second.test_binary()),
        ],
        Options::default(),
    );

    let reports = generator
        .run(&source, &icons, &[Size(16)])
        .await
        .unwrap();

    assert!(matches!(
        reports[0].outcome,
        Outcome::Generated {
            backend: "rsvg-convert"
        }
    ));
    assert!(!second.was_invoked());
}

#[tokio::test]
async fn should_report_every_size_failed_when_no_backend_is_available() {
    let workdir = new_workdir();
    let source = svg_fixture(workdir.path());
    let icons = workdir.path().join("icons");
    let sizes = [Size(16), Size(48), Size(128)];
    let generator = Generator::new(
        vec![
            Backend::RsvgConvert(workdir.missing_binary()),
            Backend::Convert(workdir.missing_binary()),
            Backend::Qlmanage(workdir.missing_binary()),
        ],
        Options::default(),
    );

    let reports = generator.run(&source, &icons, &sizes).await.unwrap();

    assert_eq!(reports.len(), 3);
    for report in &reports {
        assert!(!report.is_generated());
        // not-installed backends are skipped, they never count as attempts
        match &report.outcome {
            Outcome::Failed { attempts } => assert!(attempts.is_empty()),
            Outcome::Generated { .. } => panic!("unexpected success"),
        }
    }
    // the output directory is still created, even if nothing could be generated
    assert!(icons.is_dir());
}

#[tokio::test]
async fn should_record_attempts_for_backends_that_ran_and_failed() {
    let workdir = new_workdir().with_exit_status(1);
    let source = svg_fixture(workdir.path());
    let icons = workdir.path().join("icons");
    let generator = Generator::new(
        vec![Backend::RsvgConvert(workdir.test_binary())],
        Options::default(),
    );

    let reports = generator
        .run(&source, &icons, &[Size(16)])
        .await
        .unwrap();

    match &reports[0].outcome {
        Outcome::Failed { attempts } => {
            assert_eq!(attempts.len(), 1);
            assert_eq!(attempts[0].backend, "rsvg-convert");
        }
        Outcome::Generated { .. } => panic!("unexpected success"),
    }
}

#[tokio::test]
async fn should_overwrite_existing_output_files() {
    let workdir = new_workdir();
    let source = svg_fixture(workdir.path());
    let icons = workdir.path().join("icons");
    std::fs::create_dir(&icons).unwrap();
    let output = icons.join("icon16.png");
    std::fs::write(&output, b"stale").unwrap();
    let workdir = workdir.with_artifact(&output);
    let generator = Generator::new(
        vec![Backend::RsvgConvert(workdir.test_binary())],
        Options::default(),
    );

    let reports = generator
        .run(&source, &icons, &[Size(16)])
        .await
        .unwrap();

    assert!(reports[0].is_generated());
    assert_eq!(std::fs::read(&output).unwrap(), b"png");
}
