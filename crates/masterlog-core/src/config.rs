//! Viewer configuration
//!
//! Everything the segmenter and chart renderer need to know about a logger
//! model: marker tokens, channel names, the ignore-list and chart scaling.
//! Defaults describe the logger the tool was written for; all of it can be
//! overridden from a JSON file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading or applying configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the config file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A scale rule pattern does not compile
    #[error("Invalid scale pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Regex compiler error
        #[source]
        source: regex::Error,
    },
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Log segmentation
    pub segmenter: SegmenterConfig,
    /// Chart rendering
    pub chart: ChartConfig,
}

impl ViewerConfig {
    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file. A missing file yields the defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Source channel names the derived-column transforms look for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelNames {
    /// Battery voltage in deci-volts
    pub battery: String,
    /// Temperatures in Kelvin (coolant, intake air, ...)
    pub temperatures: Vec<String>,
    /// Lambda channels in milli-lambda (measured, target)
    pub lambdas: Vec<String>,
    /// Closed-loop lambda correction, 1000 = none
    pub lambda_correction: String,
    /// Base VE table value
    pub ve_value: String,
    /// Closed-loop active indicator
    pub closed_loop: String,
    /// Output: corrected VE
    pub ve_corrected: String,
    /// Output: correction as a signed percentage string
    pub correction_percent: String,
}

impl Default for ChannelNames {
    fn default() -> Self {
        Self {
            battery: "Batt Volt.".to_string(),
            temperatures: vec!["CLT".to_string(), "IAT".to_string()],
            lambdas: vec!["Lambda 1".to_string(), "Lambda Target".to_string()],
            lambda_correction: "Lambda Corr".to_string(),
            ve_value: "VE Value".to_string(),
            closed_loop: "Lambda Loop".to_string(),
            ve_corrected: "VE Corrigido".to_string(),
            correction_percent: "Correção (%)".to_string(),
        }
    }
}

/// Log segmentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Field delimiter
    pub delimiter: char,
    /// Token opening an inline-header session ("Mess 1;RPM;...")
    pub inline_marker: String,
    /// Token opening a timestamped session, header on the next line
    pub timestamped_marker: String,
    /// Channels hidden from the display table
    pub ignored_columns: BTreeSet<String>,
    /// Source and output channels of the derived columns
    pub channels: ChannelNames,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        let ignored = [
            "Mess 1",
            "Knock",
            "A/C Input",
            "Start Input",
            "Outputs 1",
            "Outputs 2",
            "Lambda 2",
            "Mess 2",
            "Strobo Angle",
            "ACC %",
            "ACP %",
            "dACC %",
            "0",
            "0_1",
        ];
        Self {
            delimiter: ';',
            inline_marker: "Mess".to_string(),
            timestamped_marker: "NEW_LOG".to_string(),
            ignored_columns: ignored.iter().map(|s| s.to_string()).collect(),
            channels: ChannelNames::default(),
        }
    }
}

/// How primary-axis series are brought to a comparable magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Per-channel multipliers from `scale_rules` (magnitude comparison)
    #[default]
    FixedMultiplier,
    /// Every series stretched so its peak reaches `normalize_to` (shape comparison)
    NormalizeToMax,
}

/// A channel-name pattern and the display multiplier applied to matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleRule {
    /// Regular expression matched against the column name
    pub pattern: String,
    /// Display multiplier
    pub multiplier: f64,
}

impl ScaleRule {
    /// Rule applying `multiplier` to columns matching `pattern`
    pub fn new(pattern: impl Into<String>, multiplier: f64) -> Self {
        Self {
            pattern: pattern.into(),
            multiplier,
        }
    }
}

/// Figure margins in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Left margin
    pub left: u32,
    /// Right margin
    pub right: u32,
    /// Top margin
    pub top: u32,
    /// Bottom margin
    pub bottom: u32,
}

/// Presentation metadata passed through to the chart spec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLayout {
    /// Figure height in pixels
    pub height: u32,
    /// Figure margins
    pub margins: Margins,
    /// Plotly hover mode ("x unified")
    pub hover_mode: String,
    /// X axis title
    pub x_title: String,
    /// Primary y axis title
    pub y_title: String,
    /// Plotly template name
    pub template: String,
    /// Label preceding the physical value in hover text
    pub hover_label: String,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            height: 500,
            margins: Margins {
                left: 20,
                right: 20,
                top: 30,
                bottom: 40,
            },
            hover_mode: "x unified".to_string(),
            x_title: "Time (log samples)".to_string(),
            y_title: "Value".to_string(),
            template: "plotly_white".to_string(),
            hover_label: "Value".to_string(),
        }
    }
}

/// Chart rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Fixed multipliers or normalize-to-max
    pub scale_mode: ScaleMode,
    /// Peak value each series is stretched to in `NormalizeToMax` mode
    pub normalize_to: f64,
    /// First matching rule wins; unmatched channels use 1.0
    pub scale_rules: Vec<ScaleRule>,
    /// Line color of the secondary-axis speed series
    pub speed_color: String,
    /// Draw lines across missing samples
    pub connect_gaps: bool,
    /// Maximum number of plotted columns, extra selections are dropped
    pub max_columns: Option<usize>,
    /// Base VE column, plotted only where the corrected VE has a value
    pub ve_base_column: String,
    /// Corrected VE column whose mask the base VE follows
    pub ve_corrected_column: String,
    /// Presentation metadata
    pub layout: ChartLayout,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let channels = ChannelNames::default();
        Self {
            scale_mode: ScaleMode::FixedMultiplier,
            normalize_to: 100.0,
            scale_rules: vec![
                ScaleRule::new(r"^Lambda( \d+| Target)?$", 1000.0),
                ScaleRule::new(r"(?i)\b(map|boost)\b", 40.0),
            ],
            speed_color: "#d62728".to_string(),
            connect_gaps: false,
            max_columns: Some(4),
            ve_base_column: channels.ve_value,
            ve_corrected_column: channels.ve_corrected,
            layout: ChartLayout::default(),
        }
    }
}
