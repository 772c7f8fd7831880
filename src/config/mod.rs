//! Application configuration loaded from files, environment, and CLI.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – built-in application defaults
//! 2. **Configuration file** – `PRODUCT_REWRITER_CONFIG_PATH`, then
//!    `product-rewriter.toml` in the XDG config directory, then
//!    `.product-rewriter.toml` in the home or current directory
//! 3. **Environment variables** – `PRODUCT_REWRITER_*`, plus the legacy
//!    `OPENAI_API_KEY` for the credential
//! 4. **Command-line arguments** – `--input-column`, `--ai-model`, ...
//!
//! Layers are combined with ortho-config's [`MergeComposer`].
//!
//! # Configuration File
//!
//! ```toml
//! input_column = "Tekst"
//! status_column = "Status"
//! ai_model = "gpt-4o-mini"
//! ai_timeout_seconds = 60
//! ```

use std::env;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::discovery::{ConfigDiscovery, DiscoveryLoadOutcome};
use ortho_config::figment::Figment;
use ortho_config::figment::providers::Env;
use ortho_config::{MergeComposer, OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::ai::text_rewrite::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::ai::{DEFAULT_INSTRUCTIONS, OpenAiTextRewriteConfig, RewriteError};
use crate::table::{ColumnSelection, DEFAULT_INPUT_COLUMN, DEFAULT_OUTPUT_COLUMN};

/// Prefix shared by every configuration environment variable.
pub const ENV_PREFIX: &str = "PRODUCT_REWRITER_";

/// Variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "PRODUCT_REWRITER_CONFIG_PATH";

/// Application name used for configuration file discovery.
pub const APP_NAME: &str = "product-rewriter";

/// Legacy credential variable consulted when no other source sets a key.
pub const LEGACY_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Runtime configuration for a rewrite run.
///
/// # Environment Variables
///
/// - `PRODUCT_REWRITER_INPUT_COLUMN` or `--input-column`
/// - `PRODUCT_REWRITER_OUTPUT_COLUMN` or `--output-column`
/// - `PRODUCT_REWRITER_STATUS_COLUMN` or `--status-column`
/// - `PRODUCT_REWRITER_INSTRUCTIONS` or `--instructions`
/// - `PRODUCT_REWRITER_AI_BASE_URL` or `--ai-base-url`
/// - `PRODUCT_REWRITER_AI_MODEL` or `--ai-model`
/// - `PRODUCT_REWRITER_AI_API_KEY`, `OPENAI_API_KEY`, or `--ai-api-key`
/// - `PRODUCT_REWRITER_AI_TIMEOUT_SECONDS` or `--ai-timeout-seconds`
/// - `PRODUCT_REWRITER_TELEMETRY` or `--telemetry`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PRODUCT_REWRITER",
    discovery(
        dotfile_name = ".product-rewriter.toml",
        config_file_name = "product-rewriter.toml",
        app_name = "product-rewriter",
        env_var = "PRODUCT_REWRITER_CONFIG_PATH"
    )
)]
pub struct RewriterConfig {
    /// Column holding the original text; the first column is used when the
    /// table has no column of this name.
    pub input_column: String,

    /// Column receiving the rewritten text.
    pub output_column: String,

    /// Optional column receiving `generated` or `fallback` per row.
    pub status_column: Option<String>,

    /// System directive for the model; blank means the built-in default.
    pub instructions: Option<String>,

    /// Base URL of the OpenAI-compatible API.
    pub ai_base_url: String,

    /// Chat model identifier.
    pub ai_model: String,

    /// API key for bearer authentication.
    ///
    /// Falls back to `OPENAI_API_KEY` when unset.
    pub ai_api_key: Option<String>,

    /// HTTP timeout in seconds; unset keeps the HTTP client's default.
    pub ai_timeout_seconds: Option<u64>,

    /// Emits a JSON line describing the run on stderr.
    pub telemetry: bool,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            input_column: DEFAULT_INPUT_COLUMN.to_owned(),
            output_column: DEFAULT_OUTPUT_COLUMN.to_owned(),
            status_column: None,
            instructions: None,
            ai_base_url: DEFAULT_BASE_URL.to_owned(),
            ai_model: DEFAULT_MODEL.to_owned(),
            ai_api_key: None,
            ai_timeout_seconds: None,
            telemetry: false,
        }
    }
}

impl RewriterConfig {
    /// Merges defaults, the first discovered configuration file, the process
    /// environment, and a CLI layer.
    ///
    /// `cli` holds only the options the user actually passed.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] when a configuration file or
    /// environment value is malformed or the layers cannot be merged.
    pub fn load_with_cli(cli: Value) -> Result<Self, RewriteError> {
        let file = file_layer(&default_discovery())?;
        let environment = environment_layer()?;
        Self::from_layers(file, environment, cli)
    }

    /// Merges defaults with explicit file, environment, and CLI layers.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] when the layers cannot be
    /// merged into a valid configuration.
    pub fn from_layers(
        file: Option<FileLayer>,
        environment: Value,
        cli: Value,
    ) -> Result<Self, RewriteError> {
        let defaults =
            serde_json::to_value(Self::default()).map_err(|error| RewriteError::Configuration {
                message: format!("failed to encode defaults: {error}"),
            })?;

        let mut composer = MergeComposer::new();
        composer.push_defaults(defaults);
        if let Some(FileLayer { value, path }) = file {
            composer.push_file(value, path);
        }
        composer.push_environment(environment);
        composer.push_cli(cli);

        Self::merge_from_layers(composer.layers()).map_err(|error| RewriteError::Configuration {
            message: error.to_string(),
        })
    }

    /// Checks values that the merge cannot validate on its own.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] describing the first
    /// inconsistency found.
    pub fn validate(&self) -> Result<(), RewriteError> {
        if self.output_column.trim().is_empty() {
            return Err(configuration("output column name must not be blank"));
        }
        if let Some(status_column) = self.status_column.as_deref() {
            if status_column.trim().is_empty() {
                return Err(configuration("status column name must not be blank"));
            }
            if status_column == self.output_column {
                return Err(configuration(
                    "status column must differ from the output column",
                ));
            }
            if status_column == self.input_column {
                return Err(configuration(
                    "status column must differ from the input column",
                ));
            }
        }
        if self.ai_model.trim().is_empty() {
            return Err(configuration("AI model must not be blank"));
        }
        if self.ai_timeout_seconds == Some(0) {
            return Err(configuration("AI timeout must be at least one second"));
        }

        let base_url = Url::parse(&self.ai_base_url).map_err(|error| {
            configuration(&format!("AI base URL '{}' is invalid: {error}", self.ai_base_url))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(configuration(&format!(
                "AI base URL must use http or https, got '{}'",
                base_url.scheme()
            )));
        }

        Ok(())
    }

    /// Resolves the API key from configuration or `OPENAI_API_KEY`.
    ///
    /// Blank values count as missing.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::MissingApiKey`] when no source provides a key.
    pub fn resolve_ai_api_key(&self) -> Result<String, RewriteError> {
        self.ai_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| env::var(LEGACY_API_KEY_VAR).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or(RewriteError::MissingApiKey)
    }

    /// Instructions to send, falling back to the built-in directive.
    #[must_use]
    pub fn resolve_instructions(&self) -> &str {
        self.instructions
            .as_deref()
            .filter(|instructions| !instructions.trim().is_empty())
            .unwrap_or(DEFAULT_INSTRUCTIONS)
    }

    /// Column names used by the table adapter.
    #[must_use]
    pub fn columns(&self) -> ColumnSelection {
        ColumnSelection {
            input_column: self.input_column.clone(),
            output_column: self.output_column.clone(),
            status_column: self.status_column.clone(),
        }
    }

    /// HTTP adapter settings for the resolved API key.
    #[must_use]
    pub fn openai_config(&self, api_key: String) -> OpenAiTextRewriteConfig {
        OpenAiTextRewriteConfig::new(
            self.ai_base_url.clone(),
            self.ai_model.clone(),
            Some(api_key),
            self.ai_timeout_seconds.map(Duration::from_secs),
        )
    }
}

/// Values read from a configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileLayer {
    /// Parsed file contents.
    pub value: Value,
    /// File the values came from, when known.
    pub path: Option<Utf8PathBuf>,
}

const STRING_FIELDS: [&str; 7] = [
    "input_column",
    "output_column",
    "status_column",
    "instructions",
    "ai_base_url",
    "ai_model",
    "ai_api_key",
];

/// Discovery rules for `product-rewriter` configuration files.
#[must_use]
pub fn default_discovery() -> ConfigDiscovery {
    ConfigDiscovery::builder(APP_NAME)
        .env_var(CONFIG_PATH_VAR)
        .config_file_name("product-rewriter.toml")
        .dotfile_name(".product-rewriter.toml")
        .build()
}

/// Loads the first configuration file `discovery` finds.
///
/// Returns `Ok(None)` when no candidate exists.
///
/// # Errors
///
/// Returns [`RewriteError::Configuration`] when a required file is missing,
/// or when every existing candidate fails to parse.
pub fn file_layer(discovery: &ConfigDiscovery) -> Result<Option<FileLayer>, RewriteError> {
    let DiscoveryLoadOutcome {
        figment,
        mut required_errors,
        optional_errors,
    } = discovery.load_first_partitioned();

    if figment.is_none() {
        required_errors.extend(optional_errors);
    }
    if let Some(error) = OrthoError::try_aggregate(required_errors) {
        return Err(configuration(&format!("failed to load configuration file: {error}")));
    }

    let Some(figment) = figment else {
        return Ok(None);
    };
    let path = figment
        .metadata()
        .find_map(|metadata| metadata.source.as_ref()?.file_path().map(ToOwned::to_owned))
        .and_then(|path| Utf8PathBuf::from_path_buf(path).ok());
    let value = figment.extract::<Value>().map_err(|error| {
        configuration(&format!("failed to read configuration file: {error}"))
    })?;
    tracing::debug!(path = ?path, "loaded configuration file");

    Ok(Some(FileLayer { value, path }))
}

/// Builds the environment layer from `PRODUCT_REWRITER_*` variables.
///
/// Text fields keep numeric-looking values as text; the typed fields are
/// checked when the layers are merged.
///
/// # Errors
///
/// Returns [`RewriteError::Configuration`] when the variables cannot be
/// read as a configuration map.
pub fn environment_layer() -> Result<Value, RewriteError> {
    let provider = Env::prefixed(ENV_PREFIX).ignore(&["config_path"]);
    let mut layer = Figment::from(provider).extract::<Value>().map_err(|error| {
        configuration(&format!("failed to read {ENV_PREFIX}* variables: {error}"))
    })?;

    if let Value::Object(fields) = &mut layer {
        let text_fields = fields
            .iter_mut()
            .filter(|(field, _)| STRING_FIELDS.contains(&field.as_str()));
        for (_, value) in text_fields {
            if let Some(text) = scalar_text(value) {
                *value = Value::String(text);
            }
        }
    }

    Ok(layer)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn configuration(message: &str) -> RewriteError {
    RewriteError::Configuration {
        message: message.to_owned(),
    }
}

#[cfg(test)]
mod tests;
