use hat_overlay::settings::{Settings, ThemeMode};
use tempfile::tempdir;

#[test]
fn missing_settings_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let settings = Settings::load(&path.to_string_lossy()).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn empty_settings_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "").unwrap();
    let settings = Settings::load(&path.to_string_lossy()).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn save_then_load_preserves_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let path = path.to_string_lossy();

    let settings = Settings {
        hats_path: Some("/tmp/custom-hats.json".into()),
        theme: ThemeMode::Light,
        marker_diameter: 5,
        ignored_path_fragments: vec![".git/".into(), "target/".into()],
        debug_logging: true,
        ..Settings::default()
    };
    settings.save(&path).unwrap();

    assert_eq!(Settings::load(&path).unwrap(), settings);
}

#[test]
fn corrupt_settings_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, b"not json").unwrap();
    assert!(Settings::load(&path.to_string_lossy()).is_err());
}
