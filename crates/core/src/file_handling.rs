//! Reading theme override files.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::theme::ThemeOverride;

const THEME_FILE: &str = "theme";

fn read_file(file_description: &str, path: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::io_error(file_description.to_string(), path.to_string(), e))
}

/// Reads theme overrides from `path`.
///
/// A file that does not exist yields `Ok(None)` unless `explicit` is set, in
/// which case the user named the file and its absence is an error.
///
/// # Errors
///
/// Returns an error if:
/// - The file exists but cannot be read, or is missing and `explicit`
/// - The file contains invalid YAML
/// - The YAML doesn't match the theme structure
pub fn load_theme_override(path: &str, explicit: bool) -> Result<Option<ThemeOverride>> {
    if !explicit && !Path::new(path).exists() {
        debug!("No theme file at {path}, using the default theme");
        return Ok(None);
    }

    let contents = read_file(THEME_FILE, path)?;
    if contents.trim().is_empty() {
        return Ok(Some(ThemeOverride::default()));
    }

    let overrides: ThemeOverride = serde_yaml::from_str(&contents).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            THEME_FILE.to_string(),
            path.to_string(),
            e,
        )
    })?;

    debug!("Loaded theme overrides from {path}");
    Ok(Some(overrides))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::{NamedTempFile, TempDir};

    use super::*;
    use crate::theme::{ColorDefinition, Theme};

    fn theme_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_default_file_is_no_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("theme.yml");
        let result = load_theme_override(path.to_str().unwrap(), false).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("theme.yml");
        let result = load_theme_override(path.to_str().unwrap(), true);
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_loads_and_merges() {
        let file = theme_file("colors:\n  primary:\n    name: magenta\nsymbols:\n  pointer: '>'\n");
        let overrides = load_theme_override(file.path().to_str().unwrap(), true)
            .unwrap()
            .unwrap();

        let theme = Theme::default().merged(&overrides);
        assert_eq!(theme.colors.primary, ColorDefinition::named("magenta"));
        assert_eq!(theme.symbols.pointer, ">");
        assert_eq!(theme.colors.error, Theme::default().colors.error);
    }

    #[test]
    fn test_empty_file_is_empty_override() {
        let file = theme_file("");
        let overrides = load_theme_override(file.path().to_str().unwrap(), false).unwrap();
        assert_eq!(overrides, Some(ThemeOverride::default()));
    }

    #[test]
    fn test_invalid_yaml() {
        let file = theme_file("colors: [not, a, map]\n");
        let result = load_theme_override(file.path().to_str().unwrap(), true);
        match result {
            Err(Error::Yaml { action, path, .. }) => {
                assert_eq!(action, "reading");
                assert_eq!(path, file.path().to_str().unwrap());
            }
            other => panic!("expected a YAML error, got {other:?}"),
        }
    }
}
