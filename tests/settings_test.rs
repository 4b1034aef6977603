//! Tests for layered settings loading

use rstest::rstest;
use serial_test::serial;
use tempfile::TempDir;

use wireup::config::{DEFAULT_ENVIRONMENT, ENVIRONMENT_VAR};
use wireup::Settings;

fn write_settings(dir: &TempDir, name: &str, content: &str) {
    std::fs::write(dir.path().join(name), content).expect("write settings file");
}

#[test]
#[serial]
fn given_empty_directory_when_loading_then_compiled_defaults_apply() {
    std::env::remove_var(ENVIRONMENT_VAR);
    let temp = TempDir::new().unwrap();

    let settings = Settings::load_from(temp.path()).expect("load");

    assert_eq!(settings.environment, DEFAULT_ENVIRONMENT);
    assert!(settings.entries.is_empty());
}

#[test]
#[serial]
fn given_environment_file_when_loading_then_it_overrides_the_base_file() {
    std::env::set_var(ENVIRONMENT_VAR, "production");
    let temp = TempDir::new().unwrap();
    write_settings(
        &temp,
        "settings.toml",
        r#"
application_name = "demo"

[entries]
db = "sqlite::memory:"
log_level = "debug"
"#,
    );
    write_settings(
        &temp,
        "settings.production.toml",
        r#"
[entries]
log_level = "warn"
"#,
    );

    let settings = Settings::load_from(temp.path()).expect("load");

    assert_eq!(settings.environment, "production");
    assert_eq!(settings.application_name, "demo");
    assert_eq!(settings.get("db"), Some("sqlite::memory:"));
    assert_eq!(settings.get("log_level"), Some("warn"));

    std::env::remove_var(ENVIRONMENT_VAR);
}

#[rstest]
#[case("staging", "settings.staging.toml")]
#[case("qa", "settings.qa.toml")]
#[serial]
fn given_environment_name_when_loading_then_matching_file_is_consulted(
    #[case] env_name: &str,
    #[case] file_name: &str,
) {
    std::env::set_var(ENVIRONMENT_VAR, env_name);
    let temp = TempDir::new().unwrap();
    write_settings(
        &temp,
        file_name,
        r#"
[entries]
source = "env-file"
"#,
    );

    let settings = Settings::load_from(temp.path()).expect("load");

    assert_eq!(settings.environment, env_name);
    assert_eq!(settings.get("source"), Some("env-file"));

    std::env::remove_var(ENVIRONMENT_VAR);
}

#[test]
#[serial]
fn given_prefixed_env_var_when_loading_then_it_has_final_say() {
    std::env::remove_var(ENVIRONMENT_VAR);
    std::env::set_var("WIREUP_APPLICATION_NAME", "overridden");
    let temp = TempDir::new().unwrap();
    write_settings(&temp, "settings.toml", "application_name = \"from-file\"\n");

    let settings = Settings::load_from(temp.path()).expect("load");
    assert_eq!(settings.application_name, "overridden");

    std::env::remove_var("WIREUP_APPLICATION_NAME");
}

#[test]
fn given_settings_when_rendering_template_then_it_parses_as_toml() {
    let template = Settings::template();
    // Comments only, so parsing yields pure defaults.
    let parsed: Settings = toml::from_str(&template).expect("template parses");
    assert_eq!(parsed, Settings::default());
}
