//! CLI configuration.
//!
//! Settings come from environment variables, optionally from a `.env` file
//! in the working directory. Command-line flags take precedence over both.

use std::env;
use std::path::{Path, PathBuf};

use deckgen::{Error, Result, Theme};

/// Environment variable naming the default layout template.
pub const LAYOUT_TEMPLATE_VAR: &str = "DECKGEN_LAYOUT_TEMPLATE";
/// Environment variable overriding the theme of every request.
pub const THEME_VAR: &str = "DECKGEN_THEME";
/// Environment variable naming the default output directory.
pub const OUTPUT_DIR_VAR: &str = "DECKGEN_OUTPUT_DIR";

/// Template looked up in the working directory when nothing is configured.
const DEFAULT_TEMPLATE: &str = "layouts.yaml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Layout template path
    pub layout_template: Option<PathBuf>,
    /// Theme forced onto requests
    pub theme: Option<Theme>,
    /// Where built decks are written
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout_template: None,
            theme: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load configuration from `.env` and the environment.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from a variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup(LAYOUT_TEMPLATE_VAR).filter(|v| !v.trim().is_empty()) {
            config.layout_template = Some(expand(&path));
        }

        if let Some(theme) = lookup(THEME_VAR).filter(|v| !v.trim().is_empty()) {
            let theme = theme
                .parse()
                .map_err(|e| Error::Configuration(format!("{}: {}", THEME_VAR, e)))?;
            config.theme = Some(theme);
        }

        if let Some(dir) = lookup(OUTPUT_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            config.output_dir = expand(&dir);
        }

        Ok(config)
    }

    /// Pick the layout template: flag, then environment, then
    /// `layouts.yaml` in the working directory.
    pub fn template_path(&self, flag: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = flag {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.layout_template {
            return Ok(path.clone());
        }
        let fallback = PathBuf::from(DEFAULT_TEMPLATE);
        if fallback.is_file() {
            return Ok(fallback);
        }
        Err(Error::Configuration(format!(
            "no layout template given; pass --template or set {}",
            LAYOUT_TEMPLATE_VAR
        )))
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.trim()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_environment() {
        let config = Config::from_lookup(lookup(&[
            (LAYOUT_TEMPLATE_VAR, "/etc/deckgen/layouts.yaml"),
            (THEME_VAR, "Dark"),
            (OUTPUT_DIR_VAR, "out"),
        ]))
        .unwrap();
        assert_eq!(config.layout_template, Some(PathBuf::from("/etc/deckgen/layouts.yaml")));
        assert_eq!(config.theme, Some(Theme::Dark));
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_bad_theme() {
        assert!(Config::from_lookup(lookup(&[(THEME_VAR, "sepia")])).is_err());
    }

    #[test]
    fn test_tilde_expansion() {
        if env::var_os("HOME").is_none() {
            return;
        }
        let config = Config::from_lookup(lookup(&[(OUTPUT_DIR_VAR, "~/decks")])).unwrap();
        assert!(!config.output_dir.starts_with("~"));
        assert!(config.output_dir.ends_with("decks"));
    }

    #[test]
    fn test_flag_wins() {
        let config = Config {
            layout_template: Some(PathBuf::from("env.yaml")),
            ..Default::default()
        };
        assert_eq!(
            config.template_path(Some(Path::new("flag.yaml"))).unwrap(),
            PathBuf::from("flag.yaml")
        );
        assert_eq!(config.template_path(None).unwrap(), PathBuf::from("env.yaml"));
    }
}
