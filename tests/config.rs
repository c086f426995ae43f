use std::sync::Mutex;

use tempfile::NamedTempFile;

use intellicam::config::IntellicamConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "INTELLICAM_CONFIG",
        "INTELLICAM_CAMERA_URL",
        "INTELLICAM_DISPLAY_TIMEOUT",
        "INTELLICAM_ALERT_COOLDOWN",
        "INTELLICAM_DANGEROUS_LABELS",
        "INTELLICAM_VOICE_ALERTS",
        "INTELLICAM_SCREENSHOTS",
    ] {
        std::env::remove_var(key);
    }
}

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp config");
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");
    file
}

#[test]
fn defaults_apply_without_a_config_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = IntellicamConfig::load().expect("load defaults");
    assert_eq!(cfg.display_timeout, 1.0);
    assert_eq!(cfg.alert_cooldown, 15.0);
    assert_eq!(cfg.alert_confidence_threshold, 0.5);
    assert!(cfg.dangerous_labels.contains(&"knife".to_string()));
    assert!(cfg.dangerous_labels.contains(&"hammer".to_string()));
    assert!(cfg.voice_alerts_enabled);
    assert!(cfg.screenshots_enabled);
    assert_eq!(cfg.camera.url, "stub://webcam");

    clear_env();
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_config(
        r#"{
            "display_timeout": 2.5,
            "alert_cooldown": 30,
            "alert_confidence_threshold": 0.6,
            "dangerous_labels": ["Knife", "Scissors"],
            "voice_alerts_enabled": false,
            "camera": {
                "url": "stub://garage",
                "target_fps": 15,
                "width": 800,
                "height": 600
            },
            "screenshot_dir": "shots",
            "alert_log_path": "alerts.log"
        }"#,
    );

    std::env::set_var("INTELLICAM_CONFIG", file.path());
    std::env::set_var("INTELLICAM_CAMERA_URL", "stub://front_door");
    std::env::set_var("INTELLICAM_ALERT_COOLDOWN", "45");

    let cfg = IntellicamConfig::load().expect("load config");

    assert_eq!(cfg.display_timeout, 2.5);
    assert_eq!(cfg.alert_cooldown, 45.0);
    assert_eq!(cfg.alert_confidence_threshold, 0.6);
    // File labels are canonicalized at validation time.
    assert_eq!(cfg.dangerous_labels.len(), 2);
    assert!(cfg.dangerous_labels.contains(&"knife".to_string()));
    assert!(cfg.dangerous_labels.contains(&"scissors".to_string()));
    assert!(!cfg.voice_alerts_enabled);
    assert_eq!(cfg.camera.url, "stub://front_door");
    assert_eq!(cfg.camera.target_fps, 15);
    assert_eq!(cfg.screenshot_dir.to_str().unwrap(), "shots");
    assert_eq!(cfg.alert_log_path.to_str().unwrap(), "alerts.log");

    clear_env();
}

#[test]
fn env_toggles_parse_booleans() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("INTELLICAM_VOICE_ALERTS", "off");
    std::env::set_var("INTELLICAM_SCREENSHOTS", "0");
    let cfg = IntellicamConfig::load().expect("load config");
    assert!(!cfg.voice_alerts_enabled);
    assert!(!cfg.screenshots_enabled);

    std::env::set_var("INTELLICAM_VOICE_ALERTS", "maybe");
    assert!(IntellicamConfig::load().is_err());

    clear_env();
}

#[test]
fn rejects_out_of_range_values_at_load_time() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    for json in [
        r#"{"display_timeout": -1.0}"#,
        r#"{"display_timeout": 0.0}"#,
        r#"{"alert_cooldown": -15}"#,
        r#"{"alert_confidence_threshold": 1.5}"#,
        r#"{"dangerous_labels": ["", "  "]}"#,
        r#"{"camera": {"width": 0}}"#,
    ] {
        let file = write_config(json);
        std::env::set_var("INTELLICAM_CONFIG", file.path());
        assert!(IntellicamConfig::load().is_err(), "accepted bad config: {json}");
    }

    clear_env();
}
