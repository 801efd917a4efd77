//! Machining parameters for PanelCAM
//!
//! Provides the parameter set consumed by the toolpath sequencer, its
//! documented defaults, and the flat key/value overlay used to customise
//! it per generation request. Parameter files may be JSON or TOML.
//!
//! A parameter value is built once per request and passed explicitly;
//! it is never mutated after the overlay has been applied.

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Flat key/value overlay applied onto a parameter set
pub type ParameterOverlay = serde_json::Map<String, Value>;

/// Order of the drilling and cutting blocks in a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessOrder {
    /// Drill every hole, then cut every outline
    #[default]
    DrillFirst,
    /// Cut every outline, then drill every hole
    CutFirst,
}

impl fmt::Display for ProcessOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DrillFirst => write!(f, "drill_first"),
            Self::CutFirst => write!(f, "cut_first"),
        }
    }
}

impl FromStr for ProcessOrder {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "drill_first" => Ok(Self::DrillFirst),
            "cut_first" => Ok(Self::CutFirst),
            other => Err(SettingsError::invalid(
                "process_order",
                format!("expected 'drill_first' or 'cut_first', got '{}'", other),
            )),
        }
    }
}

/// Machining parameters for one generation request
///
/// Linear values are millimeters, spindle speeds RPM, feed rate mm/min.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachiningParameters {
    /// Panel thickness (informational, not emitted)
    #[serde(alias = "thickness")]
    pub panel_thickness: f64,
    /// Spindle speed for the cutter tool (RPM)
    #[serde(alias = "cutter_speed")]
    pub cutter_spindle_speed: f64,
    /// Spindle speed for the drill tool (RPM)
    #[serde(alias = "drill_speed")]
    pub drill_spindle_speed: f64,
    /// Feed rate for contour moves (mm/min)
    pub feed_rate: f64,
    /// Z height that is always clear for rapid moves (mm)
    #[serde(alias = "safe_height")]
    pub safe_retract_height: f64,
    /// Z target for cutting plunges (mm)
    pub cut_depth: f64,
    /// Z target for drilling plunges (mm)
    pub drill_depth: f64,
    /// Whether holes or outlines come first
    pub process_order: ProcessOrder,
}

impl Default for MachiningParameters {
    fn default() -> Self {
        Self {
            panel_thickness: 18.0,
            cutter_spindle_speed: 18000.0,
            drill_spindle_speed: 18000.0,
            feed_rate: 12000.0,
            safe_retract_height: 48.0,
            cut_depth: 18.0,
            drill_depth: 7.0,
            process_order: ProcessOrder::DrillFirst,
        }
    }
}

/// Recognised overlay keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamKey {
    PanelThickness,
    CutterSpindleSpeed,
    DrillSpindleSpeed,
    FeedRate,
    SafeRetractHeight,
    CutDepth,
    DrillDepth,
    ProcessOrder,
}

impl ParamKey {
    /// Canonical names plus the short names used by the upload form
    fn parse(key: &str) -> Option<Self> {
        match key {
            "panel_thickness" | "thickness" => Some(Self::PanelThickness),
            "cutter_spindle_speed" | "cutter_speed" => Some(Self::CutterSpindleSpeed),
            "drill_spindle_speed" | "drill_speed" => Some(Self::DrillSpindleSpeed),
            "feed_rate" => Some(Self::FeedRate),
            "safe_retract_height" | "safe_height" => Some(Self::SafeRetractHeight),
            "cut_depth" => Some(Self::CutDepth),
            "drill_depth" => Some(Self::DrillDepth),
            "process_order" => Some(Self::ProcessOrder),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::PanelThickness => "panel_thickness",
            Self::CutterSpindleSpeed => "cutter_spindle_speed",
            Self::DrillSpindleSpeed => "drill_spindle_speed",
            Self::FeedRate => "feed_rate",
            Self::SafeRetractHeight => "safe_retract_height",
            Self::CutDepth => "cut_depth",
            Self::DrillDepth => "drill_depth",
            Self::ProcessOrder => "process_order",
        }
    }
}

/// Numeric overlay value; HTML forms send numbers as strings
fn numeric(key: &str, value: &Value) -> SettingsResult<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| SettingsError::invalid(key, format!("expected a number, got {}", value)))
}

impl MachiningParameters {
    /// Create parameters with the documented defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform location of the user's parameter file
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("panelcam").join("machining.toml"))
    }

    /// Apply a flat key/value overlay, returning the new parameter set
    ///
    /// Recognised keys replace the corresponding value; unknown keys are
    /// ignored. The result is validated before it is returned.
    pub fn with_overlay(&self, overlay: &ParameterOverlay) -> SettingsResult<Self> {
        let mut next = self.clone();
        for (key, value) in overlay {
            let Some(param) = ParamKey::parse(key) else {
                debug!(key = %key, "Ignoring unknown machining parameter");
                continue;
            };
            let name = param.name();
            match param {
                ParamKey::PanelThickness => next.panel_thickness = numeric(name, value)?,
                ParamKey::CutterSpindleSpeed => next.cutter_spindle_speed = numeric(name, value)?,
                ParamKey::DrillSpindleSpeed => next.drill_spindle_speed = numeric(name, value)?,
                ParamKey::FeedRate => next.feed_rate = numeric(name, value)?,
                ParamKey::SafeRetractHeight => next.safe_retract_height = numeric(name, value)?,
                ParamKey::CutDepth => next.cut_depth = numeric(name, value)?,
                ParamKey::DrillDepth => next.drill_depth = numeric(name, value)?,
                ParamKey::ProcessOrder => {
                    next.process_order = match value {
                        Value::String(s) => s.parse()?,
                        other => {
                            return Err(SettingsError::invalid(
                                name,
                                format!("expected a string, got {}", other),
                            ))
                        }
                    }
                }
            }
        }
        next.validate()?;
        Ok(next)
    }

    /// Build an overlay from `key=value` style string pairs
    pub fn overlay_from_pairs<I, K, V>(pairs: I) -> ParameterOverlay
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect()
    }

    /// Load parameters from file (JSON or TOML)
    ///
    /// The file is an overlay on the defaults: missing keys keep their
    /// default value and unknown keys are ignored.
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let overlay: ParameterOverlay = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            let table: toml::Table = toml::from_str(&content)?;
            match serde_json::to_value(table)? {
                Value::Object(map) => map,
                _ => ParameterOverlay::new(),
            }
        } else {
            return Err(SettingsError::UnsupportedFormat(format!(
                "{} (parameter files must be .json or .toml)",
                path.display()
            )));
        };

        let params = Self::default().with_overlay(&overlay)?;
        debug!(path = %path.display(), "Loaded machining parameters");
        Ok(params)
    }

    /// Save the full parameter set to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)?
        } else {
            return Err(SettingsError::UnsupportedFormat(format!(
                "{} (parameter files must be .json or .toml)",
                path.display()
            )));
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate the parameter set
    pub fn validate(&self) -> SettingsResult<()> {
        let values = [
            ("panel_thickness", self.panel_thickness),
            ("cutter_spindle_speed", self.cutter_spindle_speed),
            ("drill_spindle_speed", self.drill_spindle_speed),
            ("feed_rate", self.feed_rate),
            ("safe_retract_height", self.safe_retract_height),
            ("cut_depth", self.cut_depth),
            ("drill_depth", self.drill_depth),
        ];
        if let Some((key, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SettingsError::invalid(*key, "must be a finite number"));
        }

        if self.cutter_spindle_speed <= 0.0 {
            return Err(SettingsError::invalid("cutter_spindle_speed", "must be > 0"));
        }
        if self.drill_spindle_speed <= 0.0 {
            return Err(SettingsError::invalid("drill_spindle_speed", "must be > 0"));
        }
        if self.feed_rate <= 0.0 {
            return Err(SettingsError::invalid("feed_rate", "must be > 0"));
        }
        if self.safe_retract_height <= 0.0 {
            return Err(SettingsError::invalid("safe_retract_height", "must be > 0"));
        }
        if self.cut_depth < 0.0 || self.drill_depth < 0.0 {
            return Err(SettingsError::invalid("depth", "depths must be >= 0"));
        }

        Ok(())
    }
}
