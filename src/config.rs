use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::plog;

/// Base name of the config file, looked up with each of [`CONFIG_EXTENSIONS`].
pub const CONFIG_NAME: &str = "pushy";

/// Tried in this order inside every search directory.
const CONFIG_EXTENSIONS: [&str; 4] = ["json", "toml", "yaml", "yml"];

pub const KEY_API_KEY: &str = "pushbullet_api_key";
pub const KEY_API_URL: &str = "pushbullet_api_url";

pub const DEFAULT_API_URL: &str = "https://api.pushbullet.com/v2";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no pushy config file found")]
    NotFound,

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

/// Known keys read from the config file. Every key is optional there.
#[derive(Debug, Default)]
struct FileConfig {
    pushbullet_api_key: Option<String>,
    pushbullet_api_url: Option<String>,
}

impl FileConfig {
    /// Keys are matched case-insensitively; unknown keys are ignored.
    fn from_table(path: &Path, table: BTreeMap<String, Value>) -> Result<Self, ConfigError> {
        let mut cfg = FileConfig::default();
        for (key, value) in table {
            let slot = match key.to_lowercase().as_str() {
                KEY_API_KEY => &mut cfg.pushbullet_api_key,
                KEY_API_URL => &mut cfg.pushbullet_api_url,
                _ => continue,
            };
            *slot = Some(scalar_to_string(value).ok_or_else(|| ConfigError::Parse {
                path: path.to_path_buf(),
                message: format!("{key} must be a string"),
            })?);
        }
        Ok(cfg)
    }
}

/// Numbers and booleans are accepted and read as their textual form.
fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// May be empty; the dispatcher decides whether that is fatal.
    pub api_key: String,
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
        }
    }
}

impl Config {
    /// Resolve against `$HOME/.config`, the working directory and the
    /// process environment.
    pub fn resolve() -> Result<Self, ConfigError> {
        Self::resolve_from(&Self::search_dirs(), |key| std::env::var(key).ok())
    }

    /// Load the first config file found in `dirs`, then overlay environment
    /// values for every known key. A missing file is not an error.
    pub fn resolve_from<F>(dirs: &[PathBuf], env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match load_file(dirs) {
            Ok(file) => file,
            Err(ConfigError::NotFound) => {
                plog!("no config file found, relying on environment");
                FileConfig::default()
            }
            Err(e) => return Err(e),
        };

        let api_key = overlay(KEY_API_KEY, file.pushbullet_api_key, &env).unwrap_or_default();
        let api_url = overlay(KEY_API_URL, file.pushbullet_api_url, &env)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(default_api_url);

        Ok(Self { api_key, api_url })
    }

    pub(crate) fn search_dirs() -> Vec<PathBuf> {
        let mut dirs = Vec::with_capacity(2);
        if let Some(home) = dirs::home_dir() {
            dirs.push(home.join(".config"));
        }
        dirs.push(PathBuf::from("."));
        dirs
    }
}

/// Environment wins over the file when it holds a non-empty value. The
/// upper-cased name is looked up first, then the exact key name.
fn overlay<F>(key: &str, from_file: Option<String>, env: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let from_env = env(&key.to_uppercase())
        .filter(|v| !v.is_empty())
        .or_else(|| env(key).filter(|v| !v.is_empty()));

    match from_env {
        Some(value) => {
            plog!("{key} taken from environment");
            Some(value)
        }
        None => from_file,
    }
}

fn find_file(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| {
            CONFIG_EXTENSIONS
                .iter()
                .map(move |ext| dir.join(format!("{CONFIG_NAME}.{ext}")))
        })
        .find(|path| path.is_file())
}

fn load_file(dirs: &[PathBuf]) -> Result<FileConfig, ConfigError> {
    let path = find_file(dirs).ok_or(ConfigError::NotFound)?;
    plog!("loading config from {}", path.display());

    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;

    parse(&path, &contents)
}

fn parse(path: &Path, contents: &str) -> Result<FileConfig, ConfigError> {
    type Table = BTreeMap<String, Value>;

    let parsed = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str::<Table>(contents).map_err(|e| e.to_string()),
        Some("yaml" | "yml") => {
            // An empty YAML document is null, not a mapping.
            serde_yaml::from_str::<Option<Table>>(contents)
                .map(Option::unwrap_or_default)
                .map_err(|e| e.to_string())
        }
        _ => toml::from_str::<Table>(contents).map_err(|e| e.to_string()),
    };

    let table = parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    FileConfig::from_table(path, table)
}
