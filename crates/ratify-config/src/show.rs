//! Resolved configuration display.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::FieldSources;
use crate::types::Config;

/// Output format for [`ResolvedConfig::show`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShowFormat {
    /// TOML with a header naming where each field came from.
    #[default]
    Toml,
    /// JSON object with `config`, `sources` and `loaded_files`.
    Json,
}

/// A loaded configuration together with its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The final configuration.
    pub config: Config,
    /// Layer that set each leaf field.
    pub field_sources: FieldSources,
    /// Files that contributed, in merge order.
    pub loaded_files: Vec<String>,
}

#[derive(Serialize)]
struct ShowJson<'a> {
    config: &'a Config,
    sources: BTreeMap<&'a str, String>,
    loaded_files: &'a [String],
}

impl ResolvedConfig {
    /// Render the configuration for display.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SerializeError`] if rendering fails.
    pub fn show(&self, format: ShowFormat) -> ConfigResult<String> {
        match format {
            ShowFormat::Toml => {
                let body = toml::to_string_pretty(&self.config)
                    .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
                let mut out = String::new();
                for file in &self.loaded_files {
                    out.push_str(&format!("# loaded: {file}\n"));
                }
                for (field, layer) in &self.field_sources {
                    out.push_str(&format!("# {field}: {layer}\n"));
                }
                out.push('\n');
                out.push_str(&body);
                Ok(out)
            },
            ShowFormat::Json => {
                let view = ShowJson {
                    config: &self.config,
                    sources: self
                        .field_sources
                        .iter()
                        .map(|(field, layer)| (field.as_str(), layer.to_string()))
                        .collect(),
                    loaded_files: &self.loaded_files,
                };
                serde_json::to_string_pretty(&view)
                    .map_err(|e| ConfigError::SerializeError(e.to_string()))
            },
        }
    }
}
