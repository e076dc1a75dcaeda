//! Stub rendering configuration
//!
//! [`StubConfig`] is the value the renderer works with: indentation unit,
//! line-width threshold and the two type-name rewrites. It is passed explicitly
//! to every render call and is `Send + Sync`, so one config can serve many
//! threads.
//!
//! [`StubSettings`] is the serializable form. `defaults/pyxstub.default.toml` is
//! embedded into the binary; applications layer user files and overrides on top
//! of it via [`Loader`] before turning the result into a [`StubConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

const DEFAULT_TOML: &str = include_str!("../../defaults/pyxstub.default.toml");

/// Default indentation unit
pub const DEFAULT_INDENT: &str = "    ";

/// Default threshold above which parameter lists wrap
pub const DEFAULT_LINE_WIDTH: usize = 100;

/// A type-name rewrite
pub type TypeConverter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Rendering options
#[derive(Clone)]
pub struct StubConfig {
    pub indent: String,
    pub line_width: usize,
    component_converter: TypeConverter,
    complete_converter: TypeConverter,
}

impl StubConfig {
    pub fn new() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
            line_width: DEFAULT_LINE_WIDTH,
            component_converter: Arc::new(str::to_string),
            complete_converter: Arc::new(str::to_string),
        }
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    /// Rewrite applied to each type name component, recursively (`List` and
    /// `int` in `List[int]`)
    pub fn with_component_converter<F>(mut self, converter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.component_converter = Arc::new(converter);
        self
    }

    /// Rewrite applied once to the fully rendered annotation
    pub fn with_complete_converter<F>(mut self, converter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.complete_converter = Arc::new(converter);
        self
    }

    pub fn convert_component(&self, name: &str) -> String {
        (self.component_converter)(name)
    }

    pub fn convert_complete(&self, rendered: &str) -> String {
        (self.complete_converter)(rendered)
    }

    /// Build a config from deserialized settings; `type_aliases` becomes the
    /// component converter
    pub fn from_settings(settings: &StubSettings) -> Self {
        let config = Self::new()
            .with_indent(settings.indent.clone())
            .with_line_width(settings.line_width);
        if settings.type_aliases.is_empty() {
            return config;
        }

        let aliases = settings.type_aliases.clone();
        config.with_component_converter(move |name| {
            aliases
                .get(name)
                .or_else(|| aliases.get(&name.to_lowercase()))
                .cloned()
                .unwrap_or_else(|| name.to_string())
        })
    }
}

impl Default for StubConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubConfig")
            .field("indent", &self.indent)
            .field("line_width", &self.line_width)
            .finish_non_exhaustive()
    }
}

/// Serializable settings, as loaded from TOML
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StubSettings {
    pub indent: String,
    pub line_width: usize,
    #[serde(default)]
    pub type_aliases: BTreeMap<String, String>,
}

impl From<&StubSettings> for StubConfig {
    fn from(settings: &StubSettings) -> Self {
        StubConfig::from_settings(settings)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting settings.
    pub fn build(self) -> Result<StubSettings, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<StubSettings, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_settings() {
        let settings = load_defaults().expect("defaults to deserialize");
        assert_eq!(settings.indent, DEFAULT_INDENT);
        assert_eq!(settings.line_width, DEFAULT_LINE_WIDTH);
        assert!(settings.type_aliases.is_empty());
    }

    #[test]
    fn supports_overrides() {
        let settings = Loader::new()
            .set_override("indent", "\t")
            .expect("override to apply")
            .set_override("line_width", 80i64)
            .expect("override to apply")
            .build()
            .expect("settings to build");
        assert_eq!(settings.indent, "\t");
        assert_eq!(settings.line_width, 80);
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "line_width = 72\n\n[type_aliases]\nbint = \"bool\"").expect("write config");

        let settings = Loader::new()
            .with_file(file.path())
            .build()
            .expect("settings to build");
        assert_eq!(settings.line_width, 72);
        assert_eq!(settings.indent, DEFAULT_INDENT);
        assert_eq!(settings.type_aliases.get("bint").map(String::as_str), Some("bool"));
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let settings = Loader::new()
            .with_optional_file("/nonexistent/pyxstub.toml")
            .build()
            .expect("settings to build");
        assert_eq!(settings.line_width, DEFAULT_LINE_WIDTH);
    }

    #[test]
    fn aliases_become_component_converter() {
        let settings = StubSettings {
            indent: "  ".into(),
            line_width: 90,
            type_aliases: BTreeMap::from([("double".to_string(), "float".to_string())]),
        };
        let config = StubConfig::from(&settings);
        assert_eq!(config.indent, "  ");
        assert_eq!(config.line_width, 90);
        assert_eq!(config.convert_component("double"), "float");
        assert_eq!(config.convert_component("int"), "int");
    }

    #[test]
    fn default_converters_are_identity() {
        let config = StubConfig::default();
        assert_eq!(config.convert_component("np.ndarray"), "np.ndarray");
        assert_eq!(config.convert_complete("List[int]"), "List[int]");
    }

    #[test]
    fn config_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StubConfig>();
    }
}
