use serde::Deserialize;

use crate::error::ReconError;
use crate::linker::LinkOptions;

pub const DEFAULT_THRESHOLD: f64 = 85.0;
pub const DEFAULT_MISSING_SENTINEL: &str = "nan";
pub const DEFAULT_TIMEPOINT_COLUMN: &str = "Timepoint";
pub const DEFAULT_BEFORE_LABEL: &str = "Baseline";
pub const DEFAULT_AFTER_LABEL: &str = "Endline";
pub const DEFAULT_ID_COLUMN: &str = "auto number";
pub const DEFAULT_OUTPUT_PATH: &str = "Name matching with auto number.xlsx";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run settings, usually read from a `.namelink.toml` file. Every field has a
/// default, so an empty document is a valid config.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    /// Inclusive lower bound on similarity for a pair to link.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Cell text treated as missing (case-insensitive), besides blanks.
    #[serde(default = "default_missing_sentinel")]
    pub missing_sentinel: String,
    #[serde(default = "default_timepoint_column")]
    pub timepoint_column: String,
    #[serde(default = "default_before_label")]
    pub before_label: String,
    #[serde(default = "default_after_label")]
    pub after_label: String,
    /// Name of the identifier column appended to the output.
    #[serde(default = "default_id_column")]
    pub id_column: String,
    /// Explicit key field. Skips name-column detection when set.
    #[serde(default)]
    pub name_column: Option<String>,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_missing_sentinel() -> String {
    DEFAULT_MISSING_SENTINEL.into()
}

fn default_timepoint_column() -> String {
    DEFAULT_TIMEPOINT_COLUMN.into()
}

fn default_before_label() -> String {
    DEFAULT_BEFORE_LABEL.into()
}

fn default_after_label() -> String {
    DEFAULT_AFTER_LABEL.into()
}

fn default_id_column() -> String {
    DEFAULT_ID_COLUMN.into()
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            missing_sentinel: default_missing_sentinel(),
            timepoint_column: default_timepoint_column(),
            before_label: default_before_label(),
            after_label: default_after_label(),
            id_column: default_id_column(),
            name_column: None,
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

impl OutputFormat {
    /// Guess the format from a file extension. Anything that is not
    /// `.csv`/`.tsv`/`.txt` is written as a workbook.
    pub fn from_path(path: &std::path::Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") | Some("tsv") | Some("txt") => Self::Csv,
            _ => Self::Xlsx,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xlsx => write!(f, "xlsx"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl OutputConfig {
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    pub fn format(&self) -> OutputFormat {
        self.format
            .unwrap_or_else(|| OutputFormat::from_path(std::path::Path::new(self.path())))
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl LinkConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: LinkConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if !(0.0..=100.0).contains(&self.threshold) {
            return Err(ReconError::InvalidThreshold(self.threshold));
        }

        if self.timepoint_column.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "timepoint_column must not be empty".into(),
            ));
        }

        if self.before_label == self.after_label {
            return Err(ReconError::ConfigValidation(format!(
                "before_label and after_label must differ, both are '{}'",
                self.before_label
            )));
        }

        if self.id_column.trim().is_empty() {
            return Err(ReconError::ConfigValidation("id_column must not be empty".into()));
        }

        if let Some(ref name) = self.name_column {
            if name == &self.timepoint_column {
                return Err(ReconError::ConfigValidation(format!(
                    "name_column cannot be the timepoint column '{name}'"
                )));
            }
        }

        Ok(())
    }

    pub fn link_options(&self) -> LinkOptions {
        LinkOptions {
            threshold: self.threshold,
            missing_sentinel: self.missing_sentinel.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
