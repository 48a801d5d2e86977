//! Exit status of the binary for failed runs.

use std::process::Command;

fn scout() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_niche-scout"));
    cmd.env("NICHE_SCOUT_CONFIG", "/nonexistent/niche_scout.toml")
        .env("NICHE_ENV_FILE", "/nonexistent/.env")
        .env("NICHE_TIMEOUT_MS", "2000")
        .env_remove("NICHE_API_URL")
        .env_remove("NICHE_OUTPUT_DIR");
    cmd
}

#[test]
fn health_against_unreachable_server_exits_with_2() {
    // nothing listens on the discard port
    let output = scout()
        .args(["--api-url", "http://127.0.0.1:9", "health"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot reach the server"), "{stderr}");
}

#[test]
fn generate_with_blank_niche_exits_with_1() {
    let output = scout()
        .args([
            "--api-url",
            "http://127.0.0.1:9",
            "--no-color",
            "generate",
            "--niche",
            " ",
            "--audience",
            "parents",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Please fill in the required fields"), "{stdout}");
}
