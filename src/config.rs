//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/probtree/probtree.toml`
//! 3. Explicit config file given with `--config`
//! 4. Environment variables: `PROBTREE_*` prefix (`__` separates nested keys)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::render::OutputFormat;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::layout::{DEFAULT_HORIZONTAL_SPACING, DEFAULT_VERTICAL_SPACING};
use crate::domain::{DEFAULT_MAX_NODES, DEFAULT_PROBABILITY_TOLERANCE, DEFAULT_SEPARATOR};

/// Spacing of the layered layout, in layout units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    /// Distance between neighbouring depth bands
    pub horizontal_spacing: f64,
    /// Distance between neighbouring nodes within a band
    pub vertical_spacing: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            horizontal_spacing: DEFAULT_HORIZONTAL_SPACING,
            vertical_spacing: DEFAULT_VERTICAL_SPACING,
        }
    }
}

/// Renderer options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderSettings {
    /// Format used when neither `--format` nor an output extension decides
    pub format: OutputFormat,
    /// SVG pixels per layout unit
    pub scale: f64,
    /// SVG margin around the drawing, in pixels
    pub margin: f64,
    /// SVG node circle radius, in pixels
    pub node_radius: f64,
    pub node_color: String,
    pub font_size: f64,
    /// Show full path labels (`Coin-Heads-Tails`) instead of outcome names
    pub full_labels: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Tree,
            scale: 60.0,
            margin: 80.0,
            node_radius: 18.0,
            node_color: "lightblue".into(),
            font_size: 11.0,
            full_labels: false,
        }
    }
}

/// Unified configuration for probtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Joins path segments of node labels
    pub separator: String,
    /// Largest tree (in nodes) that will be built
    pub max_nodes: u64,
    /// Allowed deviation of the outcome probability sum from 1.0
    pub probability_tolerance: f64,
    pub layout: LayoutSettings,
    pub render: RenderSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.into(),
            max_nodes: DEFAULT_MAX_NODES,
            probability_tolerance: DEFAULT_PROBABILITY_TOLERANCE,
            layout: LayoutSettings::default(),
            render: RenderSettings::default(),
        }
    }
}

/// Get the XDG config directory for probtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "probtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("probtree.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; must exist
    pub fn load(explicit: Option<&Path>) -> ApplicationResult<Self> {
        let mut builder = Config::builder().add_source(Self::defaults_source()?);

        // 2. Global config, if present
        if let Some(global_path) = global_config_path() {
            builder = builder.add_source(
                File::from(global_path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // 3. Explicit config file
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ApplicationError::Settings {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            builder = builder.add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }

        // 4. Environment variables
        builder = builder.add_source(
            Environment::with_prefix("PROBTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = builder
            .build()
            .map_err(config_err)?
            .try_deserialize()
            .map_err(config_err)?;
        settings.validate()?;

        Ok(settings)
    }

    /// Load only defaults and the given file (no global config, no env vars).
    pub fn load_file(path: &Path) -> ApplicationResult<Self> {
        let settings: Self = Config::builder()
            .add_source(Self::defaults_source()?)
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(true),
            )
            .build()
            .map_err(config_err)?
            .try_deserialize()
            .map_err(config_err)?;
        settings.validate()?;

        Ok(settings)
    }

    fn defaults_source() -> ApplicationResult<Config> {
        Config::try_from(&Self::default()).map_err(config_err)
    }

    /// Reject values that would make building or drawing meaningless.
    pub fn validate(&self) -> ApplicationResult<()> {
        let invalid = |message: String| Err(ApplicationError::Settings { message });

        if self.separator.is_empty() {
            return invalid("separator must not be empty".into());
        }
        if self.max_nodes == 0 {
            return invalid("max_nodes must be at least 1".into());
        }
        if !self.probability_tolerance.is_finite() || self.probability_tolerance < 0.0 {
            return invalid(format!(
                "probability_tolerance must be a non-negative number, got {}",
                self.probability_tolerance
            ));
        }
        for (name, value) in [
            ("layout.horizontal_spacing", self.layout.horizontal_spacing),
            ("layout.vertical_spacing", self.layout.vertical_spacing),
            ("render.scale", self.render.scale),
            ("render.font_size", self.render.font_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return invalid(format!("{name} must be positive, got {value}"));
            }
        }
        if !self.render.margin.is_finite() || self.render.margin < 0.0 {
            return invalid(format!("render.margin must not be negative, got {}", self.render.margin));
        }
        if !self.render.node_radius.is_finite() || self.render.node_radius < 0.0 {
            return invalid(format!(
                "render.node_radius must not be negative, got {}",
                self.render.node_radius
            ));
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Settings {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# probtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/probtree/probtree.toml
#   Explicit: probtree --config <file>
#   Env:      PROBTREE_* environment variables, e.g. PROBTREE_MAX_NODES=5000
#             or PROBTREE_LAYOUT__VERTICAL_SPACING=4

# Joins outcome names into node labels (Coin-Heads-Tails)
# separator = "-"

# Refuse to build trees with more nodes than this
# max_nodes = 100000

# Allowed deviation of the outcome probability sum from 1.0
# probability_tolerance = 1e-9

[layout]
# Distance between depth bands
# horizontal_spacing = 2.0
# Distance between nodes in the same band
# vertical_spacing = 3.0

[render]
# Default output format: "tree", "dot" or "svg"
# format = "tree"
# scale = 60.0
# margin = 80.0
# node_radius = 18.0
# node_color = "lightblue"
# font_size = 11.0
# full_labels = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Settings {
        message: e.to_string(),
    }
}
