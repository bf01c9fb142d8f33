//! Configuration path utilities.
//!
//! Theme overrides live in a YAML file, by default under `~/.promptkit`.

/// Default path for the theme override file
pub const DEFAULT_THEME_PATH: &str = "~/.promptkit/theme.yml";

/// Resolves the theme file path.
///
/// Uses `theme_path_arg` when given, otherwise [`DEFAULT_THEME_PATH`].
/// Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use promptkit_core::config::get_theme_path;
///
/// let default_path = get_theme_path(&None);
/// assert!(default_path.ends_with(".promptkit/theme.yml"));
///
/// let custom_path = get_theme_path(&Some("/etc/promptkit.yml".to_string()));
/// assert_eq!(custom_path, "/etc/promptkit.yml");
/// ```
pub fn get_theme_path(theme_path_arg: &Option<String>) -> String {
    let theme_path = match theme_path_arg {
        Some(theme_path) => theme_path,
        None => DEFAULT_THEME_PATH,
    };

    shellexpand::tilde(theme_path).to_string()
}
