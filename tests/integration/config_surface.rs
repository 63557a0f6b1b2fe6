//! The persisted configuration surface is a compatibility contract: the
//! recognized keys and their defaults must not drift.

use runout::settings::{PullMode, Settings, SettingsStore};
use tempfile::TempDir;

#[test]
fn recognized_keys_parse_with_their_documented_names() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[sensor]
pin = 17
bounce = 250
switch = 1
mode = "down"
gcode = "M600"
pause_print = false
check_freq = 3

[printer]
api_url = "http://octopi.local"
api_key = "secret"
"#,
    )
    .expect("Failed to write config");

    let settings = SettingsStore::new(&path).load().expect("Failed to load");

    assert_eq!(settings.sensor.pin, 17);
    assert_eq!(settings.sensor.bounce, 250);
    assert_eq!(settings.sensor.switch, 1);
    assert_eq!(settings.sensor.mode, PullMode::Down);
    assert_eq!(settings.sensor.gcode, "M600");
    assert!(!settings.sensor.pause_print);
    assert_eq!(settings.sensor.check_freq, 3);
    assert_eq!(settings.printer.api_url, "http://octopi.local");
    assert_eq!(settings.printer.api_key, "secret");
}

#[test]
fn factory_defaults_match_the_documented_values() {
    let settings = Settings::default();
    assert_eq!(settings.sensor.pin, -1);
    assert_eq!(settings.sensor.bounce, 300);
    assert_eq!(settings.sensor.switch, 0);
    assert_eq!(settings.sensor.mode, PullMode::Up);
    assert_eq!(settings.sensor.gcode, "");
    assert!(settings.sensor.pause_print);
    assert_eq!(settings.sensor.check_freq, 5);
}

#[test]
fn saved_file_uses_the_documented_key_names() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    let store = SettingsStore::new(&path);

    store.save(&Settings::default()).expect("Failed to save");
    let content = std::fs::read_to_string(&path).expect("Failed to read back");

    for key in [
        "pin",
        "bounce",
        "switch",
        "mode",
        "gcode",
        "pause_print",
        "check_freq",
    ] {
        assert!(content.contains(key), "missing key {key} in:\n{content}");
    }
}

#[test]
fn settings_survive_a_save_load_cycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = SettingsStore::new(&temp_dir.path().join("config.toml"));

    let mut settings = Settings::default();
    settings.sensor.pin = 7;
    settings.sensor.mode = PullMode::None;
    settings.sensor.gcode = "M600\nM117 reload".to_string();
    settings.sensor.only_while_printing = true;

    store.save(&settings).expect("Failed to save");
    assert_eq!(store.load().expect("Failed to load"), settings);
}
