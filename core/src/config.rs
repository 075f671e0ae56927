//! The configuration of one xir run. A `Config` is built once (by the `translate` CLI, or by
//! `Config::mock` in tests), validated, and then shared read-only as an `Arc<Config>` by the
//! interner and the synthesizer.

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use thiserror::Error;

/// The source language the reconstructed declarations are written in.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    #[default]
    Cxx,
}

/// Spellings used when a construct cannot be reconstructed faithfully.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Stands in for a pointee that is missing from the type table.
    pub incomplete_type: String,
    /// Stands in for a type kind that has no declarator shape.
    pub unsupported_type: String,
    /// Text of the comment emitted for a template argument that cannot be resolved.
    pub unresolved_argument: String,
    /// Prefix of the synthetic names given to anonymous records, enums and namespaces.
    pub anonymous_prefix: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        SynthesisConfig {
            incomplete_type: "INCOMPLETE_TYPE".into(),
            unsupported_type: "UNSUPPORTED_TYPE".into(),
            unresolved_argument: "unresolved template argument".into(),
            anonymous_prefix: "__xir_anon_".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Path to the JSON event stream describing the translation unit.
    pub input: PathBuf,

    /// Directory the IR and the reconstructed declarations are written to.
    pub output: PathBuf,

    /// Erase the output directory if it is nonempty.
    #[serde(default)]
    pub force: bool,

    #[serde(default)]
    pub language: Language,

    /// Maps a builtin type's spelling to its reserved type id (e.g. `unsigned int` to
    /// `unsigned`). Spellings missing from the map get their spaces replaced by underscores.
    #[serde(default = "default_reserved_names")]
    pub reserved_names: BTreeMap<String, String>,

    #[serde(default)]
    pub synthesis: SynthesisConfig,

    #[serde(flatten)]
    pub unknown: HashMap<String, Value>,
}

fn default_reserved_names() -> BTreeMap<String, String> {
    [
        ("void", "void"),
        ("bool", "bool"),
        ("_Bool", "bool"),
        ("char", "char"),
        ("signed char", "signed_char"),
        ("unsigned char", "unsigned_char"),
        ("wchar_t", "wchar_t"),
        ("char8_t", "char8_t"),
        ("char16_t", "char16_t"),
        ("char32_t", "char32_t"),
        ("short", "short"),
        ("unsigned short", "unsigned_short"),
        ("int", "int"),
        ("unsigned int", "unsigned"),
        ("long", "long"),
        ("unsigned long", "unsigned_long"),
        ("long long", "long_long"),
        ("unsigned long long", "unsigned_long_long"),
        ("__int128", "__int128"),
        ("unsigned __int128", "unsigned___int128"),
        ("float", "float"),
        ("double", "double"),
        ("long double", "long_double"),
        ("std::nullptr_t", "nullptr_t"),
    ]
    .into_iter()
    .map(|(spelling, name)| (spelling.to_string(), name.to_string()))
    .collect()
}

impl Config {
    /// Returns a config with every optional setting at its default, for tests.
    pub fn mock() -> Config {
        Config {
            input: PathBuf::from("events.json"),
            output: PathBuf::from("out"),
            force: false,
            language: Language::default(),
            reserved_names: default_reserved_names(),
            synthesis: SynthesisConfig::default(),
            unknown: HashMap::new(),
        }
    }

    /// Returns the reserved type id for a builtin spelling.
    pub fn reserved_name(&self, spelling: &str) -> String {
        match self.reserved_names.get(spelling) {
            Some(name) => name.clone(),
            None => spelling.split_whitespace().collect::<Vec<_>>().join("_"),
        }
    }

    /// Checks the invariants the interner and synthesizer rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let placeholders = [
            ("synthesis.incomplete_type", &self.synthesis.incomplete_type),
            ("synthesis.unsupported_type", &self.synthesis.unsupported_type),
            ("synthesis.unresolved_argument", &self.synthesis.unresolved_argument),
            ("synthesis.anonymous_prefix", &self.synthesis.anonymous_prefix),
        ];
        for (key, value) in placeholders {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyPlaceholder(key));
            }
        }
        for (spelling, name) in &self.reserved_names {
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(ConfigError::InvalidReservedName {
                    spelling: spelling.clone(),
                    name: name.clone(),
                });
            }
            if looks_like_minted_id(name) {
                return Err(ConfigError::ReservedNameShadowsId(name.clone()));
            }
        }
        Ok(())
    }
}

/// Minted ids are an uppercase kind letter followed by at least four digits, plus the
/// reserved `global` scope.
fn looks_like_minted_id(name: &str) -> bool {
    if name == "global" {
        return true;
    }
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let digits = chars.as_str();
    first.is_ascii_uppercase() && digits.len() >= 4 && digits.chars().all(|c| c.is_ascii_digit())
}

/// An error returned from [Config::validate].
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("config key {0} must not be empty")]
    EmptyPlaceholder(&'static str),
    #[error("reserved name {name:?} for builtin {spelling:?} is not a single identifier")]
    InvalidReservedName { spelling: String, name: String },
    #[error("reserved name {0:?} would collide with generated ids")]
    ReservedNameShadowsId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_is_valid() {
        assert_eq!(Config::mock().validate(), Ok(()));
    }

    #[test]
    fn reserved_name_substitution() {
        let config = Config::mock();
        assert_eq!(config.reserved_name("int"), "int");
        assert_eq!(config.reserved_name("unsigned int"), "unsigned");
        assert_eq!(config.reserved_name("long long"), "long_long");
        // Unlisted spellings fall back to joining words.
        assert_eq!(config.reserved_name("__bf16  vector"), "__bf16_vector");
    }

    #[test]
    fn rejects_bad_names() {
        let mut config = Config::mock();
        config.reserved_names.insert("int".into(), "P0001".into());
        assert_eq!(
            config.validate(),
            Err(ConfigError::ReservedNameShadowsId("P0001".into()))
        );

        let mut config = Config::mock();
        config.reserved_names.insert("int".into(), "two words".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidReservedName { .. })
        ));

        let mut config = Config::mock();
        config.synthesis.incomplete_type = " ".into();
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyPlaceholder("synthesis.incomplete_type"))
        );
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: Config = serde_json::from_str(
            r#"{ "input": "a.json", "output": "out", "language": "c", "colour": "blue" }"#,
        )
        .unwrap();
        assert_eq!(config.language, Language::C);
        assert_eq!(config.synthesis, SynthesisConfig::default());
        assert_eq!(config.reserved_name("unsigned long"), "unsigned_long");
        assert!(config.unknown.contains_key("colour"));
    }
}
