use job_tracker::config::{ConfigError, ConfigLoader};
use std::{
    env, fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
};
use tempfile::TempDir;

const KEYS: &[&str] = &[
    "JOB_TRACKER_PROFILE",
    "JOB_TRACKER_API_BIND_ADDR",
    "JOB_TRACKER_LOG_FORMAT",
    "JOB_TRACKER_UTC_OFFSET_MINUTES",
    "JOB_TRACKER_CACHE_JOBS_TTL_SECONDS",
    "JOB_TRACKER_LOGIN_PATH",
];

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn env_guard() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

fn clear_env() {
    unsafe {
        for key in KEYS {
            env::remove_var(key);
        }
    }
}

fn write_env_file(dir: &TempDir, name: &str, contents: &str) {
    let path = dir.path().join(name);
    fs::write(path, contents).unwrap();
}

fn loader_in(dir: &TempDir) -> ConfigLoader {
    ConfigLoader::with_base_dir(PathBuf::from(dir.path()))
}

#[test]
fn loads_defaults_when_no_env_present() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    let cfg = loader_in(&temp_dir)
        .load()
        .expect("config loads with defaults");

    assert_eq!(cfg.profile, "local");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8080");
    assert_eq!(cfg.login_path, "/login");
    assert_eq!(cfg.cache.achievements_ttl_seconds, 3600);
    assert!(cfg.utc_offset().is_none());
    cfg.bind_addr().expect("default bind addr parses");
}

#[test]
fn layered_env_files_apply_in_order() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "JOB_TRACKER_API_BIND_ADDR=127.0.0.1:3000\n",
    );
    write_env_file(
        &temp_dir,
        ".env.test",
        "JOB_TRACKER_API_BIND_ADDR=192.168.0.10:5000\nJOB_TRACKER_UTC_OFFSET_MINUTES=-480\n",
    );
    write_env_file(
        &temp_dir,
        ".env.test.local",
        "JOB_TRACKER_API_BIND_ADDR=10.0.0.5:6000\n",
    );

    // Select profile via .env.local before profile-specific files load.
    write_env_file(
        &temp_dir,
        ".env.local",
        "JOB_TRACKER_PROFILE=test\nJOB_TRACKER_API_BIND_ADDR=127.0.0.1:4000\n",
    );

    let cfg = loader_in(&temp_dir)
        .load()
        .expect("config loads with layered env files");

    assert_eq!(cfg.profile, "test");
    assert_eq!(cfg.api_bind_addr, "10.0.0.5:6000");
    assert_eq!(
        cfg.utc_offset().map(|offset| offset.local_minus_utc()),
        Some(-480 * 60)
    );
}

#[test]
fn keys_without_prefix_are_ignored() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "LOGIN_PATH=/elsewhere\n");

    let cfg = loader_in(&temp_dir).load().unwrap();
    assert_eq!(cfg.login_path, "/login");
}

#[test]
fn os_environment_has_highest_precedence() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "JOB_TRACKER_API_BIND_ADDR=127.0.0.1:3000\nJOB_TRACKER_LOGIN_PATH=/from-file\n",
    );

    unsafe {
        env::set_var("JOB_TRACKER_API_BIND_ADDR", "0.0.0.0:9090");
    }

    let cfg = loader_in(&temp_dir)
        .load()
        .expect("config loads with env override");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:9090");
    assert_eq!(cfg.login_path, "/from-file");

    clear_env();
}

#[test]
fn invalid_bind_addr_returns_error() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "JOB_TRACKER_API_BIND_ADDR=not-an-addr\n");

    let err = loader_in(&temp_dir).load().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
}

#[test]
fn invalid_values_are_rejected() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "JOB_TRACKER_LOG_FORMAT=xml\n");
    assert!(matches!(
        loader_in(&temp_dir).load().unwrap_err(),
        ConfigError::InvalidLogFormat { .. }
    ));

    write_env_file(&temp_dir, ".env", "JOB_TRACKER_CACHE_JOBS_TTL_SECONDS=soon\n");
    assert!(matches!(
        loader_in(&temp_dir).load().unwrap_err(),
        ConfigError::InvalidValue { .. }
    ));

    write_env_file(&temp_dir, ".env", "JOB_TRACKER_UTC_OFFSET_MINUTES=1440\n");
    assert!(matches!(
        loader_in(&temp_dir).load().unwrap_err(),
        ConfigError::InvalidUtcOffset { .. }
    ));
}
