use std::process::{Command, Stdio};

fn run_headless(seed: &str) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_fishtank"))
        .args([
            "--headless",
            "--ticks",
            "30",
            "--seed",
            seed,
            "--width",
            "30",
            "--height",
            "10",
            "--fish",
            "6",
        ])
        .stdin(Stdio::null())
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch fishtank");

    assert!(
        output.status.success(),
        "fishtank exited with {:?}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("frame is utf8")
}

#[test]
fn headless_run_prints_the_final_tank() {
    let frame = run_headless("1");
    let lines: Vec<&str> = frame.lines().collect();

    assert_eq!(lines.len(), 12);
    assert!(lines[0].starts_with('+') && lines[0].ends_with('+'));
    assert!(lines[11].starts_with('+') && lines[11].ends_with('+'));
    for line in &lines[1..11] {
        assert!(line.starts_with('|') && line.ends_with('|'), "{line:?}");
        assert_eq!(line.chars().count(), 32);
    }
}

#[test]
fn same_seed_same_tank() {
    assert_eq!(run_headless("77"), run_headless("77"));
}

#[test]
fn zero_frame_rate_is_refused() {
    let output = Command::new(env!("CARGO_BIN_EXE_fishtank"))
        .args(["--headless", "--ticks", "1", "--fps", "0"])
        .stdin(Stdio::null())
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to launch fishtank");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("frame rate must be positive"), "{stderr}");
}

#[test]
fn unreadable_species_file_is_refused() {
    let output = Command::new(env!("CARGO_BIN_EXE_fishtank"))
        .args(["--headless", "--species", "/nonexistent/species.json"])
        .stdin(Stdio::null())
        .output()
        .expect("failed to launch fishtank");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read species file"), "{stderr}");
}
