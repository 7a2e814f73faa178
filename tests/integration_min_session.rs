// Drives the compiled binary through a PTY so the real event loop and
// crossterm input handling are exercised end to end.
//
// Requires a TTY (expectrl allocates one), so it is Unix-only and ignored
// by default. Run with: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_race_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("neontype");
    let config = tempfile::tempdir()?;
    let cmd = format!(
        "{} -p hi --config {}",
        bin.display(),
        config.path().join("config.json").display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    // enter starts the race, then the prompt itself finishes it
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(100));
    p.send("hi")?;
    std::thread::sleep(Duration::from_millis(200));

    // esc quits from the results screen
    p.send("\x1b")?;

    p.expect(Eof)?;
    Ok(())
}
