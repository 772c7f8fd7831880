//! Tests for configuration file discovery.

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::discovery::ConfigDiscovery;
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

use crate::ai::RewriteError;
use crate::config::{APP_NAME, CONFIG_PATH_VAR, RewriterConfig, default_discovery, file_layer};

fn write_config(contents: &str) -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("product-rewriter.toml"))
        .expect("temp dir should be UTF-8");
    std::fs::write(&path, contents).expect("config should be written");
    (dir, path)
}

fn required(path: &Utf8Path) -> ConfigDiscovery {
    ConfigDiscovery::builder(APP_NAME)
        .add_required_path(path.as_std_path())
        .build()
}

#[rstest]
fn file_values_sit_between_defaults_and_environment() {
    let (_dir, path) = write_config(
        "input_column = \"Tekst\"\nai_model = \"file-model\"\nai_timeout_seconds = 45\n",
    );

    let layer = file_layer(&required(&path))
        .expect("file should load")
        .expect("file should be found");
    let config = RewriterConfig::from_layers(Some(layer), json!({"ai_model": "env-model"}), json!({}))
        .expect("merge should succeed");

    assert_eq!(config.input_column, "Tekst");
    assert_eq!(config.ai_model, "env-model");
    assert_eq!(config.ai_timeout_seconds, Some(45));
    assert_eq!(config.output_column, "Opdateret produkttekst");
}

#[rstest]
fn loaded_file_records_its_path() {
    let (_dir, path) = write_config("ai_model = \"file-model\"\n");

    let layer = file_layer(&required(&path))
        .expect("file should load")
        .expect("file should be found");

    assert_eq!(
        layer.path.as_deref().and_then(Utf8Path::file_name),
        Some("product-rewriter.toml")
    );
    assert_eq!(layer.value.get("ai_model"), Some(&json!("file-model")));
}

#[rstest]
fn config_path_variable_selects_the_file() {
    let (_dir, path) = write_config("status_column = \"Status\"\n");
    let _guard = env_lock::lock_env([(CONFIG_PATH_VAR, Some(path.as_str()))]);

    let layer = file_layer(&default_discovery())
        .expect("file should load")
        .expect("file should be found");

    assert_eq!(layer.value.get("status_column"), Some(&json!("Status")));
}

#[rstest]
fn absent_candidates_yield_no_layer() {
    let root = TempDir::new().expect("temp dir should be created");
    let discovery = ConfigDiscovery::builder("product-rewriter-absent")
        .config_file_name("absent.toml")
        .dotfile_name(".product-rewriter-absent.toml")
        .clear_project_roots()
        .add_project_root(root.path())
        .build();

    assert_eq!(file_layer(&discovery), Ok(None));
}

#[rstest]
#[case::missing_required_file(None)]
#[case::malformed_toml(Some("input_column = \n"))]
fn unusable_files_are_configuration_errors(#[case] contents: Option<&str>) {
    let (_dir, path) = write_config(contents.unwrap_or_default());
    if contents.is_none() {
        std::fs::remove_file(&path).expect("config should be removed");
    }

    let result = file_layer(&required(&path));

    assert!(
        matches!(result, Err(RewriteError::Configuration { ref message }) if message.contains("configuration file")),
        "unexpected result: {result:?}"
    );
}
