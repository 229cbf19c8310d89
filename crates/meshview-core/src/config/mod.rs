use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// How the request is issued with respect to cross-origin policy.
///
/// A native client has no CORS machinery; the mode is carried so that a `no-cors` setup (which a
/// browser would answer with an opaque, unreadable body) stays visible in logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    #[default]
    NoCors,
    Cors,
    SameOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
        }
    }
}

/// Presentation attributes of the mesh `<path>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MeshStyle {
    pub class: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub fill: String,
}

impl Default for MeshStyle {
    fn default() -> Self {
        Self {
            class: "mesh".to_string(),
            stroke: "steelblue".to_string(),
            stroke_width: 1.5,
            fill: "none".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MeshViewConfig {
    pub endpoint: String,
    pub request_mode: RequestMode,
    /// `None` waits indefinitely.
    pub timeout_ms: Option<u64>,
    pub canvas: CanvasConfig,
    pub style: MeshStyle,
    /// D3 curve name (`linearClosed`, `basis`, `monotoneX`, ...).
    pub curve: String,
    /// Cells of padding on each side of the scale domains.
    pub padding_cells: f64,
    pub include_lattice: bool,
    pub include_neighborhoods: bool,
}

impl Default for MeshViewConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_mode: RequestMode::default(),
            timeout_ms: None,
            canvas: CanvasConfig::default(),
            style: MeshStyle::default(),
            curve: "linearClosed".to_string(),
            padding_cells: 2.0,
            include_lattice: false,
            include_neighborhoods: false,
        }
    }
}

impl MeshViewConfig {
    /// Builds a config by deep-merging `overrides` onto the defaults.
    ///
    /// Overrides are partial: `{"style": {"stroke": "red"}}` keeps every other default.
    pub fn from_overrides(overrides: &Value) -> Result<Self> {
        if !overrides.is_object() && !overrides.is_null() {
            return Err(Error::config("config root must be an object"));
        }
        let mut base =
            serde_json::to_value(Self::default()).map_err(|e| Error::config(e.to_string()))?;
        deep_merge_value(&mut base, overrides);
        let cfg: Self = serde_json::from_value(base).map_err(|e| Error::config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| Error::config(format!("JSON: {e}")))?;
        Self::from_overrides(&value)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: Value =
            serde_yaml::from_str(text).map_err(|e| Error::config(format!("YAML: {e}")))?;
        Self::from_overrides(&value)
    }

    /// Loads a config file; `.yaml`/`.yml` files are read as YAML, everything else as JSON.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        tracing::debug!(path = %path.display(), yaml = is_yaml, "loading config");
        if is_yaml {
            Self::from_yaml_str(&text)
        } else {
            Self::from_json_str(&text)
        }
    }

    pub fn endpoint_url(&self) -> Result<url::Url> {
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| Error::config(format!("endpoint `{}`: {e}", self.endpoint)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::config(format!(
                "endpoint `{}`: unsupported scheme `{other}`",
                self.endpoint
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.endpoint_url()?;
        let (width, height) = (self.canvas.width, self.canvas.height);
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(Error::config(format!(
                "canvas size must be positive (got {width}x{height})"
            )));
        }
        if !(self.style.stroke_width.is_finite() && self.style.stroke_width >= 0.0) {
            return Err(Error::config("style.strokeWidth must be a non-negative number"));
        }
        if !self.padding_cells.is_finite() {
            return Err(Error::config("paddingCells must be finite"));
        }
        if self.curve.trim().is_empty() {
            return Err(Error::config("curve must not be empty"));
        }
        Ok(())
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
