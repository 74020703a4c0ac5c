// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Layered CLI settings
//!
//! Precedence, lowest first: built-in defaults < settings file (TOML) <
//! `TRIECONF_*` environment variables < command-line flags. Every layer is
//! turned into JSON, merged, and extracted into [`Settings`] in one go.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as J;
use std::path::{Path, PathBuf};

/// Prefix of environment variables read as a settings layer
pub const ENV_PREFIX: &str = "TRIECONF";

/// How command results are printed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Resolved settings for one CLI invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// JSON document holding the section trie, `-` for stdin
    pub source: Option<PathBuf>,
    /// Reject parents whose children share an identifier
    #[serde(default, deserialize_with = "flexible_bool")]
    pub unique_siblings: bool,
    #[serde(default)]
    pub output: OutputFormat,
}

/// Values given on the command line; `None` leaves lower layers untouched.
#[derive(Debug, Clone, Default)]
pub struct FlagOverrides {
    pub source: Option<PathBuf>,
    pub unique_siblings: bool,
    pub output: Option<OutputFormat>,
}

/// Where the settings file is looked up when none is given explicitly
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("trieconf").join("settings.toml"))
}

/// Resolve settings from every layer
///
/// An explicit `settings_file` must exist; the default location is only
/// read when present.
pub fn load(settings_file: Option<&Path>, flags: &FlagOverrides) -> Result<Settings> {
    let file_layer = match settings_file {
        Some(path) => Some(read_layer_from_file(path)?),
        None => default_settings_path()
            .filter(|path| path.exists())
            .map(|path| read_layer_from_file(&path))
            .transpose()?,
    };

    resolve(file_layer, env_overlay(None)?, flags_overlay(flags))
}

/// Merge already loaded layers and extract the typed settings
pub fn resolve(file_layer: Option<J>, env_layer: J, flags_layer: J) -> Result<Settings> {
    let mut json = serde_json::json!({});
    for layer in [file_layer, Some(env_layer), Some(flags_layer)].into_iter().flatten() {
        merge_two_json(&mut json, layer);
    }

    tracing::debug!(settings = %json, "merged settings layers");
    serde_path_to_error::deserialize(json).context("invalid trieconf settings")
}

/// Parse a TOML settings file into a JSON layer
pub fn read_layer_from_file(path: &Path) -> Result<J> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings file {:?}", path))?;
    parse_toml_to_json(&content).with_context(|| format!("parsing settings file {:?}", path))
}

pub fn parse_toml_to_json(toml_str: &str) -> Result<J> {
    let toml: toml::Value = toml_str.parse::<toml::Value>()?;
    Ok(serde_json::to_value(toml)?)
}

/// Create a JSON layer from `TRIECONF_*` environment variables
///
/// `TRIECONF_UNIQUE_SIBLINGS` becomes `unique-siblings`. `vars` replaces the
/// process environment when given. `TRIECONF_SETTINGS` names the settings
/// file itself and is not part of the layer.
pub fn env_overlay(vars: Option<config::Map<String, String>>) -> Result<J> {
    let built = config::Config::builder()
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .convert_case(config::Case::Kebab)
                .source(vars),
        )
        .build()?;

    let mut layer = built.try_deserialize::<serde_json::Map<String, J>>()?;
    layer.remove("settings");
    Ok(J::Object(layer))
}

/// Create a JSON layer from command-line flags
pub fn flags_overlay(flags: &FlagOverrides) -> J {
    let mut layer = serde_json::Map::new();
    if let Some(source) = &flags.source {
        layer.insert("source".into(), J::String(source.to_string_lossy().into_owned()));
    }
    // a bare switch can only turn the check on
    if flags.unique_siblings {
        layer.insert("unique-siblings".into(), J::Bool(true));
    }
    if let Some(output) = flags.output {
        layer.insert("output".into(), serde_json::json!(output));
    }
    J::Object(layer)
}

/// Merge two JSON values with deep object merging
///
/// Objects are merged recursively, scalars and arrays replace the left value,
/// and `null` on the right keeps the left value.
pub fn merge_two_json(base: &mut J, layer: J) {
    match (base, layer) {
        (J::Object(a), J::Object(b)) => {
            for (k, v) in b {
                merge_two_json(a.entry(k).or_insert(J::Null), v);
            }
        }
        (_, J::Null) => {}
        (a, b) => *a = b,
    }
}

/// Environment variables only carry strings, so accept `"true"`/`"false"` too.
fn flexible_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(serde::de::Error::custom(format!("expected a boolean, found {s:?}"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vars(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn test_defaults_without_layers() {
        let settings = resolve(None, serde_json::json!({}), serde_json::json!({})).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.output, OutputFormat::Text);
        assert!(!settings.unique_siblings);
    }

    #[test]
    fn test_toml_parsing() {
        let json = parse_toml_to_json(
            r#"
            source = "/etc/trieconf/sections.json"
            unique-siblings = true
            output = "json"
        "#,
        )
        .unwrap();
        let settings = resolve(Some(json), serde_json::json!({}), serde_json::json!({})).unwrap();
        assert_eq!(
            settings,
            Settings {
                source: Some(PathBuf::from("/etc/trieconf/sections.json")),
                unique_siblings: true,
                output: OutputFormat::Json,
            }
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected_with_their_path() {
        let json = parse_toml_to_json("sourse = \"typo.json\"").unwrap();
        let err = resolve(Some(json), serde_json::json!({}), serde_json::json!({})).unwrap_err();
        assert!(format!("{err:#}").contains("sourse"), "unexpected error: {err:#}");
    }

    #[test]
    fn test_env_overlay_maps_keys() {
        let overlay = env_overlay(vars(&[
            ("TRIECONF_UNIQUE_SIBLINGS", "true"),
            ("TRIECONF_OUTPUT", "json"),
            ("TRIECONF_SETTINGS", "/somewhere/settings.toml"),
            ("OTHER_VAR", "ignored"),
        ]))
        .unwrap();
        assert_eq!(
            overlay,
            serde_json::json!({"unique-siblings": "true", "output": "json"})
        );
    }

    #[test]
    fn test_env_overlay_empty_source() {
        let overlay = env_overlay(vars(&[])).unwrap();
        assert!(overlay.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_env_strings_become_booleans() {
        let env = env_overlay(vars(&[("TRIECONF_UNIQUE_SIBLINGS", "yes")])).unwrap();
        let settings = resolve(None, env, serde_json::json!({})).unwrap();
        assert!(settings.unique_siblings);

        let env = env_overlay(vars(&[("TRIECONF_UNIQUE_SIBLINGS", "maybe")])).unwrap();
        assert!(resolve(None, env, serde_json::json!({})).is_err());
    }

    #[test]
    fn test_precedence_file_env_flags() {
        let file = parse_toml_to_json(
            r#"
            source = "from-file.json"
            output = "json"
        "#,
        )
        .unwrap();
        let env = env_overlay(vars(&[("TRIECONF_SOURCE", "from-env.json")])).unwrap();
        let flags = flags_overlay(&FlagOverrides {
            output: Some(OutputFormat::Text),
            ..Default::default()
        });

        let settings = resolve(Some(file), env, flags).unwrap();
        assert_eq!(settings.source, Some(PathBuf::from("from-env.json")));
        assert_eq!(settings.output, OutputFormat::Text);
    }

    #[test]
    fn test_flags_overlay_only_sets_given_values() {
        assert_eq!(flags_overlay(&FlagOverrides::default()), serde_json::json!({}));
        assert_eq!(
            flags_overlay(&FlagOverrides {
                source: Some(PathBuf::from("-")),
                unique_siblings: true,
                output: Some(OutputFormat::Json),
            }),
            serde_json::json!({"source": "-", "unique-siblings": true, "output": "json"})
        );
    }

    #[test]
    fn test_merge_deep_objects_and_null() {
        let mut base = serde_json::json!({"a": {"b": 1}, "keep": "x"});
        merge_two_json(&mut base, serde_json::json!({"a": {"c": 2}, "keep": null}));
        assert_eq!(base, serde_json::json!({"a": {"b": 1, "c": 2}, "keep": "x"}));
    }

    #[test]
    fn test_read_layer_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "output = \"json\"\n").unwrap();
        assert_eq!(read_layer_from_file(&path).unwrap(), serde_json::json!({"output": "json"}));

        let missing = dir.path().join("missing.toml");
        let err = read_layer_from_file(&missing).unwrap_err();
        assert!(format!("{err:#}").contains("reading settings file"));
    }

    #[test]
    fn test_explicit_settings_file_is_required() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(load(Some(&missing), &FlagOverrides::default()).is_err());
    }
}
