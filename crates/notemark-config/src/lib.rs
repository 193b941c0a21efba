use log::warn;
use notemark_engine::config::{EmojiTone, ExtendedSyntax, ParserConfig, PluginSet, UnderlineStyle, VerticalAlign};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid extended syntax {delimiter:?} in {config_path}: {reason}")]
    InvalidExtendedSyntax {
        config_path: PathBuf,
        delimiter: String,
        reason: String,
    },
}

/// Which content plugins run. Everything is on unless turned off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginFlags {
    pub emoji: bool,
    pub note_linking: bool,
    pub header_linking: bool,
}

impl Default for PluginFlags {
    fn default() -> Self {
        Self {
            emoji: true,
            note_linking: true,
            header_linking: true,
        }
    }
}

/// One `[[extended_syntax]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedSyntaxConfig {
    pub delimiter: String,
    pub open_tag: String,
    /// Defaults to `open_tag`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_tag: Option<String>,
    pub opts_index: u32,
    #[serde(default = "full_size")]
    pub size_scale: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub underline_style: UnderlineStyle,
}

fn full_size() -> u16 {
    100
}

impl From<&ExtendedSyntax> for ExtendedSyntaxConfig {
    fn from(s: &ExtendedSyntax) -> Self {
        Self {
            delimiter: s.delimiter.clone(),
            open_tag: s.open_tag.clone(),
            close_tag: (s.close_tag != s.open_tag).then(|| s.close_tag.clone()),
            opts_index: s.opts_index,
            size_scale: s.size_scale,
            foreground: s.foreground.clone(),
            background: s.background.clone(),
            vertical_align: s.vertical_align,
            bold: s.bold,
            italic: s.italic,
            strikethrough: s.strikethrough,
            underline: s.underline,
            underline_style: s.underline_style,
        }
    }
}

impl From<&ExtendedSyntaxConfig> for ExtendedSyntax {
    fn from(c: &ExtendedSyntaxConfig) -> Self {
        Self {
            delimiter: c.delimiter.clone(),
            open_tag: c.open_tag.clone(),
            close_tag: c.close_tag.clone().unwrap_or_else(|| c.open_tag.clone()),
            opts_index: c.opts_index,
            size_scale: c.size_scale,
            foreground: c.foreground.clone(),
            background: c.background.clone(),
            vertical_align: c.vertical_align,
            bold: c.bold,
            italic: c.italic,
            strikethrough: c.strikethrough,
            underline: c.underline,
            underline_style: c.underline_style,
        }
    }
}

fn default_extended_syntaxes() -> Vec<ExtendedSyntaxConfig> {
    ExtendedSyntax::defaults().iter().map(ExtendedSyntaxConfig::from).collect()
}

fn default_emoji_tone() -> String {
    "None".into()
}

fn default_category() -> String {
    "Notes".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub notes_path: PathBuf,
    /// A skin tone such as `"medium-dark"`, or `"None"`.
    #[serde(default = "default_emoji_tone")]
    pub emoji_tone: String,
    /// Display name of the hidden base category folder.
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default)]
    pub plugins: PluginFlags,
    #[serde(rename = "extended_syntax", default = "default_extended_syntaxes")]
    pub extended_syntaxes: Vec<ExtendedSyntaxConfig>,
}

impl Config {
    pub fn new(notes_path: impl Into<PathBuf>) -> Self {
        Self {
            notes_path: notes_path.into(),
            emoji_tone: default_emoji_tone(),
            default_category: default_category(),
            plugins: PluginFlags::default(),
            extended_syntaxes: default_extended_syntaxes(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.notes_path = Self::expand_path(&config.notes_path).unwrap_or(config.notes_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/notemark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Builds the engine configuration, rejecting unusable extended
    /// syntaxes. `config_path` only names the file in errors.
    ///
    /// An unknown emoji tone falls back to the default tone.
    pub fn parser_config(&self, config_path: &Path) -> Result<ParserConfig, ConfigError> {
        let emoji_tone = self.emoji_tone.parse::<EmojiTone>().unwrap_or_else(|e| {
            warn!("{e}, using the default skin tone");
            EmojiTone::Default
        });

        let mut extended_syntaxes: Vec<ExtendedSyntax> = Vec::with_capacity(self.extended_syntaxes.len());
        for entry in &self.extended_syntaxes {
            let syntax = ExtendedSyntax::from(entry);
            let invalid = |reason: &str| ConfigError::InvalidExtendedSyntax {
                config_path: config_path.to_path_buf(),
                delimiter: syntax.delimiter.clone(),
                reason: reason.to_string(),
            };
            if let Some(problem) = syntax.problem() {
                return Err(invalid(problem));
            }
            if extended_syntaxes.iter().any(|s| s.delimiter == syntax.delimiter) {
                return Err(invalid("delimiter repeated"));
            }
            if extended_syntaxes.iter().any(|s| s.opts_index == syntax.opts_index) {
                return Err(invalid("opts bit index repeated"));
            }
            extended_syntaxes.push(syntax);
        }

        Ok(ParserConfig {
            plugins: PluginSet {
                emoji: self.plugins.emoji,
                note_linking: self.plugins.note_linking,
                header_linking: self.plugins.header_linking,
            },
            emoji_tone,
            extended_syntaxes,
            default_category: self.default_category.clone(),
            ..ParserConfig::default()
        })
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    const CONFIG_FILE: &str = "config.toml";

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/notemark/config.toml"));
    }

    #[test]
    fn test_minimal_config_gets_defaults() {
        let config: Config = toml::from_str(r#"notes_path = "/tmp/notes""#).unwrap();

        assert_eq!(config, Config::new("/tmp/notes"));
        let delimiters: Vec<&str> = config.extended_syntaxes.iter().map(|s| s.delimiter.as_str()).collect();
        assert_eq!(delimiters, vec!["==", "--", "^"]);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut original = Config::new("/tmp/test-notes");
        original.emoji_tone = "medium-dark".into();
        original.plugins.header_linking = false;

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("NOTEMARK_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$NOTEMARK_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path);

        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/subdir")));

        unsafe {
            env::remove_var("NOTEMARK_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_with_absolute_path() {
        let path = PathBuf::from("/absolute/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&config_file, "notes_path = [").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join(CONFIG_FILE);
        let test_config = Config::new("/tmp/test-notes");

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_config_with_env_var_in_toml() {
        unsafe {
            env::set_var("NOTEMARK_NOTES_ROOT", "/custom/notes");
        }
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&config_file, "notes_path = \"$NOTEMARK_NOTES_ROOT/my-notes\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.notes_path, PathBuf::from("/custom/notes/my-notes"));
        unsafe {
            env::remove_var("NOTEMARK_NOTES_ROOT");
        }
    }

    #[test]
    fn test_parser_config_from_toml() {
        let config: Config = toml::from_str(
            r#"
notes_path = "/notes"
emoji_tone = "dark"
default_category = "Inbox"

[plugins]
emoji = false

[[extended_syntax]]
delimiter = "++"
open_tag = "ins"
opts_index = 4
underline = true
underline_style = "wavy"
vertical_align = "super"
"#,
        )
        .unwrap();

        let parser_config = config.parser_config(Path::new(CONFIG_FILE)).unwrap();

        assert_eq!(parser_config.emoji_tone, EmojiTone::Dark);
        assert_eq!(parser_config.default_category, "Inbox");
        assert!(!parser_config.plugins.emoji);
        assert!(parser_config.plugins.note_linking);
        assert_eq!(parser_config.extended_syntaxes.len(), 1);
        let ins = &parser_config.extended_syntaxes[0];
        assert_eq!(ins.close_tag, "ins");
        assert_eq!(ins.size_scale, 100);
        assert_eq!(ins.underline_style, UnderlineStyle::Wavy);
        assert_eq!(ins.vertical_align, VerticalAlign::Super);
    }

    #[test]
    fn test_unknown_tone_falls_back_to_default() {
        let mut config = Config::new("/notes");
        config.emoji_tone = "purple".into();

        let parser_config = config.parser_config(Path::new(CONFIG_FILE)).unwrap();

        assert_eq!(parser_config.emoji_tone, EmojiTone::Default);
    }

    #[test]
    fn test_invalid_extended_syntaxes_are_rejected() {
        let cases = [
            ("", 5, "delimiter is empty"),
            ("+ +", 5, "delimiter contains whitespace"),
            ("==", 5, "delimiter repeated"),
            ("++", 0, "opts bit index repeated"),
            ("++", 99, "opts bit index out of range"),
        ];
        for (delimiter, opts_index, reason) in cases {
            let mut config = Config::new("/notes");
            config.extended_syntaxes.push(ExtendedSyntaxConfig {
                delimiter: delimiter.into(),
                opts_index,
                ..config.extended_syntaxes[0].clone()
            });

            let err = config.parser_config(Path::new(CONFIG_FILE)).unwrap_err();

            match err {
                ConfigError::InvalidExtendedSyntax { reason: got, .. } => assert_eq!(got, reason, "{delimiter:?}"),
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
