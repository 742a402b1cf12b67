use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

const SOLE_OPENING: &str = r#"
[ocean_state]
width = 3
height = 1
mode = "preset"
field = "\nO *"

[prey_params]
reproduceCycle = 1

[predator_params]
reproduceCycle = 4
starveCycle = 2
"#;

fn write_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("wator-{}-{name}.toml", std::process::id()));
    fs::write(&path, contents).expect("write temporary configuration");
    path
}

fn wator(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wator"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to launch wator")
}

#[test]
fn frames_follow_the_starting_ocean() {
    let config = write_config("frames", SOLE_OPENING);

    let output = wator(&["-d", "-s", "5", "-c", config.to_str().expect("utf-8 path"), "2"]);
    let _ = fs::remove_file(&config);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "O *\n O*\nOO*\n");
}

#[test]
fn stats_mode_suppresses_frames() {
    let config = write_config("stats", SOLE_OPENING);

    let output = wator(&["--stats", "-c", config.to_str().expect("utf-8 path"), "4"]);
    let _ = fs::remove_file(&config);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());
}

#[test]
fn unknown_glyph_aborts_before_the_first_tick() {
    let config = write_config("glyph", &SOLE_OPENING.replace("O *", "OZ*"));

    let output = wator(&["-c", config.to_str().expect("utf-8 path"), "3"]);
    let _ = fs::remove_file(&config);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown glyph"));
}

#[test]
fn any_leading_delimiter_is_discarded() {
    let config = write_config("delimiter", &SOLE_OPENING.replace("\\nO *", "|O *"));

    let output = wator(&["-d", "-c", config.to_str().expect("utf-8 path"), "0"]);
    let _ = fs::remove_file(&config);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "O *\n");
}
