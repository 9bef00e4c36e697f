//! Settings resolution from layered sources.
//!
//! Sources are applied in increasing precedence on top of
//! [`Settings::default`]. The standard stack is the optional env file, then
//! the live process environment. Keys are matched case-insensitively; when
//! one source carries several casings of a key, the all-uppercase one wins.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::config::coerce::{parse_bool, parse_list, parse_value};
use crate::config::schema::Settings;
use crate::config::validation::{validate_settings, ValidationError};

/// Error type for configuration resolution.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The env file exists but could not be read or parsed.
    #[error("failed to read env file {path}: {message}")]
    EnvFile { path: PathBuf, message: String },

    /// A value could not be coerced to its declared type.
    #[error("invalid value for {key} from {source_name}: {reason}")]
    Invalid {
        key: &'static str,
        source_name: &'static str,
        reason: String,
    },

    /// Resolved settings failed semantic validation.
    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A provider of raw `KEY=value` pairs.
pub trait SettingsSource: Send + Sync {
    /// Short label used in error messages and logs.
    fn name(&self) -> &'static str;

    /// Read all pairs from the source.
    fn collect(&self) -> Result<Vec<(String, String)>, ConfigError>;
}

/// Optional dotenv-style file. A missing file yields no pairs.
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

}

impl SettingsSource for EnvFile {
    fn name(&self) -> &'static str {
        "env file"
    }

    fn collect(&self) -> Result<Vec<(String, String)>, ConfigError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Env file not found, skipping");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(ConfigError::EnvFile {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
        };

        dotenvy::from_read_iter(file)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ConfigError::EnvFile {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }
}

/// The live process environment. Non-UTF-8 entries are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl SettingsSource for ProcessEnv {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn collect(&self) -> Result<Vec<(String, String)>, ConfigError> {
        Ok(std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect())
    }
}

/// Fixed pairs, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    name: &'static str,
    pairs: Vec<(String, String)>,
}

impl StaticSource {
    pub fn new<K, V>(name: &'static str, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name,
            pairs: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl SettingsSource for StaticSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn collect(&self) -> Result<Vec<(String, String)>, ConfigError> {
        Ok(self.pairs.clone())
    }
}

/// Resolves [`Settings`] once and hands out the same `Arc` afterwards.
pub struct SettingsResolver {
    sources: Vec<Box<dyn SettingsSource>>,
    resolved: OnceLock<Arc<Settings>>,
}

impl SettingsResolver {
    /// Resolver with no sources: defaults only.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            resolved: OnceLock::new(),
        }
    }

    /// Standard stack: optional env file, then process environment.
    pub fn standard(env_file: Option<&Path>) -> Self {
        let resolver = Self::new();
        let resolver = match env_file {
            Some(path) => resolver.with_source(EnvFile::new(path)),
            None => resolver,
        };
        resolver.with_source(ProcessEnv)
    }

    /// Add a source with higher precedence than all previously added ones.
    pub fn with_source<S: SettingsSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Resolve settings, reading sources only on the first successful call.
    pub fn get_settings(&self) -> Result<Arc<Settings>, ConfigError> {
        if let Some(settings) = self.resolved.get() {
            return Ok(Arc::clone(settings));
        }

        let settings = self.resolve()?;
        Ok(Arc::clone(self.resolved.get_or_init(|| Arc::new(settings))))
    }

    fn resolve(&self) -> Result<Settings, ConfigError> {
        let mut settings = Settings::default();

        for source in &self.sources {
            let pairs = in_apply_order(source.collect()?);
            let mut applied = 0usize;
            for (key, value) in &pairs {
                if apply(&mut settings, key, value, source.name())? {
                    applied += 1;
                }
            }
            tracing::debug!(source = source.name(), applied, "Configuration source applied");
        }

        validate_settings(&settings).map_err(ConfigError::Validation)?;
        Ok(settings)
    }
}

impl Default for SettingsResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Order pairs so that within one source the all-uppercase spelling of a
/// key is applied last and wins over other casings (`DEBUG` over `debug`).
/// Other casings are ordered by name. Repeats of an identical key keep their
/// source order, so the last one wins.
fn in_apply_order(mut pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    pairs.sort_by_cached_key(|(key, _)| {
        let upper = *key == key.to_ascii_uppercase();
        (key.to_ascii_lowercase(), upper, key.clone())
    });
    pairs
}

/// Apply one pair. Returns `false` for keys that match no field.
fn apply(
    settings: &mut Settings,
    key: &str,
    value: &str,
    source_name: &'static str,
) -> Result<bool, ConfigError> {
    let lowered = key.to_ascii_lowercase();
    let Some(field) = Settings::FIELDS.iter().copied().find(|f| *f == lowered) else {
        return Ok(false);
    };

    let invalid = |reason: String| ConfigError::Invalid {
        key: field,
        source_name,
        reason,
    };

    match field {
        "app_name" => settings.app_name = value.to_string(),
        "debug" => settings.debug = parse_bool(value).map_err(invalid)?,
        "database_url" => settings.database_url = value.trim().to_string(),
        "cors_origins" => settings.cors_origins = parse_list(value).map_err(invalid)?,
        "server_host" => settings.server_host = value.trim().to_string(),
        "server_port" => settings.server_port = parse_value(value).map_err(invalid)?,
        "request_timeout_secs" => settings.request_timeout_secs = parse_value(value).map_err(invalid)?,
        "db_max_connections" => settings.db_max_connections = parse_value(value).map_err(invalid)?,
        "db_min_connections" => settings.db_min_connections = parse_value(value).map_err(invalid)?,
        "db_connect_timeout_secs" => {
            settings.db_connect_timeout_secs = parse_value(value).map_err(invalid)?
        }
        "log_format" => settings.log_format = parse_value(value).map_err(invalid)?,
        _ => return Ok(false),
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        reads: Arc<AtomicUsize>,
        inner: StaticSource,
    }

    impl SettingsSource for CountingSource {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn collect(&self) -> Result<Vec<(String, String)>, ConfigError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.collect()
        }
    }

    fn temp_env_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "aceflow-{}-{}.env",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_only() {
        let settings = SettingsResolver::new().get_settings().unwrap();
        assert_eq!(*settings, Settings::default());
    }

    #[test]
    fn test_precedence_env_over_file_over_default() {
        let file = StaticSource::new("file", [("APP_NAME", "From File"), ("DEBUG", "false")]);
        let env = StaticSource::new("env", [("app_name", "From Env")]);

        let settings = SettingsResolver::new()
            .with_source(file.clone())
            .with_source(env)
            .get_settings()
            .unwrap();
        assert_eq!(settings.app_name, "From Env");
        assert!(!settings.debug);

        let settings = SettingsResolver::new().with_source(file).get_settings().unwrap();
        assert_eq!(settings.app_name, "From File");
        assert_eq!(settings.database_url, Settings::default().database_url);
    }

    #[test]
    fn test_memoized_instance_and_single_read() {
        let reads = Arc::new(AtomicUsize::new(0));
        let resolver = SettingsResolver::new().with_source(CountingSource {
            reads: reads.clone(),
            inner: StaticSource::new("counting", [("SERVER_PORT", "9001")]),
        });

        let first = resolver.get_settings().unwrap();
        let second = resolver.get_settings().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.server_port, 9001);
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_keys_case_insensitive_unknown_ignored() {
        let source = StaticSource::new(
            "env",
            [("Cors_Origins", "http://a.test,http://b.test"), ("PATH", "/usr/bin"), ("UNRELATED", "x")],
        );
        let settings = SettingsResolver::new().with_source(source).get_settings().unwrap();
        assert_eq!(settings.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_uppercase_spelling_wins_within_source() {
        for pairs in [
            [("DEBUG", "false"), ("debug", "true"), ("Debug", "true")],
            [("debug", "true"), ("Debug", "true"), ("DEBUG", "false")],
            [("Debug", "true"), ("DEBUG", "false"), ("debug", "true")],
        ] {
            let settings = SettingsResolver::new()
                .with_source(StaticSource::new("env", pairs))
                .get_settings()
                .unwrap();
            assert!(!settings.debug, "{pairs:?}");
        }
    }

    #[test]
    fn test_repeated_key_last_wins() {
        let source = StaticSource::new("file", [("APP_NAME", "First"), ("APP_NAME", "Second")]);
        let settings = SettingsResolver::new().with_source(source).get_settings().unwrap();
        assert_eq!(settings.app_name, "Second");
    }

    #[test]
    fn test_malformed_list_is_error() {
        let source = StaticSource::new("env", [("CORS_ORIGINS", "[\"http://a.test\"")]);
        let err = SettingsResolver::new().with_source(source).get_settings().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "cors_origins", .. }), "{err}");
    }

    #[test]
    fn test_bad_bool_is_error_and_not_cached() {
        let source = StaticSource::new("env", [("DEBUG", "sometimes")]);
        let resolver = SettingsResolver::new().with_source(source);
        assert!(matches!(resolver.get_settings(), Err(ConfigError::Invalid { key: "debug", .. })));
        assert!(resolver.get_settings().is_err());
    }

    #[test]
    fn test_validation_failure_surfaces() {
        let source = StaticSource::new("env", [("DATABASE_URL", "redis://localhost")]);
        let err = SettingsResolver::new().with_source(source).get_settings().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors[0].field == "database_url"));
    }

    #[test]
    fn test_env_file_source() {
        let path = temp_env_file(
            "source",
            "# comment\nAPP_NAME=\"File App\"\ncors_origins='[\"http://x.test\"]'\n",
        );
        let pairs = EnvFile::new(&path).collect().unwrap();
        std::fs::remove_file(&path).ok();

        assert!(pairs.contains(&("APP_NAME".to_string(), "File App".to_string())));
        let settings = SettingsResolver::new()
            .with_source(StaticSource::new("file", pairs))
            .get_settings()
            .unwrap();
        assert_eq!(settings.app_name, "File App");
        assert_eq!(settings.cors_origins, vec!["http://x.test"]);
    }

    #[test]
    fn test_missing_env_file_is_empty() {
        let source = EnvFile::new("/nonexistent/aceflow/.env");
        assert!(source.collect().unwrap().is_empty());
    }
}
