use std::{error::Error, fs::File, io::Write, path::Path};

fn write_args(workdir: &Path) -> std::io::Result<()> {
    let mut file = File::create(workdir.join("args"))?;
    for arg in std::env::args().skip(1) {
        file.write_all(arg.as_bytes())?;
        file.write_all(b"\n")?;
    }
    Ok(())
}

fn sleep_if_requested(workdir: &Path) {
    if let Ok(millis) = std::fs::read_to_string(workdir.join("sleep-ms")) {
        if let Ok(millis) = millis.trim().parse() {
            std::thread::sleep(std::time::Duration::from_millis(millis));
        }
    }
}

fn copy_stdout(workdir: &Path) -> std::io::Result<()> {
    let mut file = File::open(workdir.join("stdout"))?;
    std::io::copy(&mut file, &mut std::io::stdout())?;
    Ok(())
}

fn create_artifact(workdir: &Path) -> std::io::Result<()> {
    let path = std::fs::read_to_string(workdir.join("artifact"))?;
    std::fs::write(path.trim(), b"png")?;
    Ok(())
}

fn get_exit_status(workdir: &Path) -> Result<i32, Box<dyn Error>> {
    let exit_status = std::fs::read_to_string(workdir.join("exit-status"))?
        .trim()
        .parse()?;
    Ok(exit_status)
}

pub fn test_binary_main() {
    let workdir = std::env::current_exe()
        .unwrap()
        .parent()
        .unwrap()
        .to_owned();
    let _ = write_args(&workdir);
    sleep_if_requested(&workdir);
    let _ = copy_stdout(&workdir);
    let _ = create_artifact(&workdir);

    let exit_status = get_exit_status(&workdir).unwrap_or(0);
    std::process::exit(exit_status);
}
