use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use notebook_core::{EditorOptions, ResultRendering, SubmissionPolicy, TranscriptSettings};
use notebook_engine::{EvalError, EvalSettings};
use serde::{Deserialize, Serialize};

use super::cli::Cli;

const DEFAULT_CONFIG_FILENAME: &str = "notebook.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("unknown log level '{0}'")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotebookConfig {
    pub server: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_body_bytes: u64,
    pub theme: String,
    /// `None` renders the whole editor buffer.
    pub viewport_margin: Option<u32>,
    pub rendering: ResultRendering,
    pub submission: SubmissionPolicy,
    pub log_level: String,
    /// File the values were read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        let editor = EditorOptions::default();
        Self {
            server: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 5,
            max_body_bytes: 1024 * 1024,
            theme: editor.theme,
            viewport_margin: None,
            rendering: ResultRendering::default(),
            submission: SubmissionPolicy::default(),
            log_level: "info".to_string(),
            source: None,
        }
    }
}

impl NotebookConfig {
    /// Loads `path`, or `./notebook.ron` when no path is given and that file
    /// exists. An explicit path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let mut config: Self = ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.clone(),
            message: err.to_string(),
        })?;
        config.source = Some(path);
        Ok(config)
    }

    /// Command line flags win over file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(server) = &cli.server {
            self.server = server.clone();
        }
        if let Some(timeout_secs) = cli.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(level) = &cli.log_level {
            self.log_level = level.clone();
        }
        if cli.plain_text {
            self.rendering = ResultRendering::PlainText;
        }
        if cli.reject_empty {
            self.submission = SubmissionPolicy::RejectEmpty;
        }
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        notebook_logging::parse_level(&self.log_level)
            .ok_or_else(|| ConfigError::LogLevel(self.log_level.clone()))
    }

    pub fn eval_settings(&self) -> Result<EvalSettings, EvalError> {
        let mut settings = EvalSettings::for_server(&self.server)?;
        settings.request_timeout = Duration::from_secs(self.timeout_secs.max(1));
        settings.connect_timeout = Duration::from_secs(self.connect_timeout_secs.max(1));
        settings.max_bytes = self.max_body_bytes;
        Ok(settings)
    }

    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            theme: self.theme.clone(),
            viewport_margin: self.viewport_margin.unwrap_or(u32::MAX),
        }
    }

    pub fn transcript_settings(&self) -> TranscriptSettings {
        TranscriptSettings {
            rendering: self.rendering,
            submission: self.submission,
        }
    }
}
