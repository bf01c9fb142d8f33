//! Conversion of theme colours to crossterm colours.

use crossterm::style::Color;
use promptkit_core::error::{Error, Result};
use promptkit_core::theme::{ColorDefinition, Theme};

/// Trait for converting color definitions to terminal colors
pub trait AsTermColor {
    fn as_crossterm_color(&self) -> Result<Option<Color>>;
}

impl AsTermColor for ColorDefinition {
    fn as_crossterm_color(&self) -> Result<Option<Color>> {
        let defined_count = [self.rgb.is_some(), self.ansi.is_some(), self.name.is_some()]
            .iter()
            .filter(|&&x| x)
            .count();

        if defined_count > 1 {
            return Err(Error::MultipleColorTypes);
        }

        Ok(match (self.rgb, self.ansi, &self.name) {
            (Some((r, g, b)), None, None) => Some(Color::Rgb { r, g, b }),
            (None, Some(ansi), None) => Some(Color::AnsiValue(ansi)),
            (None, None, Some(name)) => Some(color_by_name(name)?),
            _ => None,
        })
    }
}

fn color_by_name(name: &str) -> Result<Color> {
    Ok(match name.to_lowercase().as_str() {
        "reset" | "default" => Color::Reset,
        "black" => Color::Black,
        "darkgrey" | "darkgray" => Color::DarkGrey,
        "red" => Color::Red,
        "darkred" => Color::DarkRed,
        "green" => Color::Green,
        "darkgreen" => Color::DarkGreen,
        "yellow" => Color::Yellow,
        "darkyellow" => Color::DarkYellow,
        "blue" => Color::Blue,
        "darkblue" => Color::DarkBlue,
        "magenta" => Color::Magenta,
        "darkmagenta" => Color::DarkMagenta,
        "cyan" => Color::Cyan,
        "darkcyan" => Color::DarkCyan,
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        _ => return Err(Error::UnknownColorName(name.to_string())),
    })
}

/// Checks every colour of `theme` converts, so a bad theme file fails before
/// any prompt is drawn.
pub fn validate_theme(theme: &Theme) -> Result<()> {
    let colors = &theme.colors;
    let all = [
        &colors.primary,
        &colors.success,
        &colors.warning,
        &colors.error,
        &colors.info,
        &colors.muted,
        &colors.text.primary,
        &colors.text.secondary,
        &colors.text.inverted,
        &colors.text.disabled,
        &colors.text.error,
        &colors.text.success,
        &colors.background.default,
        &colors.background.selected,
        &colors.background.error,
        &colors.background.success,
        &colors.background.warning,
        &colors.background.info,
        &colors.border.default,
        &colors.border.focus,
        &colors.border.error,
        &colors.border.success,
        &colors.border.warning,
        &colors.border.info,
    ];
    for color in all {
        color.as_crossterm_color()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_and_ansi() {
        assert_eq!(
            ColorDefinition::rgb(1, 2, 3).as_crossterm_color().unwrap(),
            Some(Color::Rgb { r: 1, g: 2, b: 3 })
        );
        assert_eq!(
            ColorDefinition::ansi(240).as_crossterm_color().unwrap(),
            Some(Color::AnsiValue(240))
        );
        assert_eq!(ColorDefinition::default().as_crossterm_color().unwrap(), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(
            ColorDefinition::named("DarkBlue").as_crossterm_color().unwrap(),
            Some(Color::DarkBlue)
        );
        assert_eq!(
            ColorDefinition::reset().as_crossterm_color().unwrap(),
            Some(Color::Reset)
        );
        assert!(matches!(
            ColorDefinition::named("mauve").as_crossterm_color(),
            Err(Error::UnknownColorName(name)) if name == "mauve"
        ));
    }

    #[test]
    fn test_multiple_types_rejected() {
        let color = ColorDefinition {
            rgb: Some((0, 0, 0)),
            ansi: Some(1),
            name: None,
        };
        assert!(matches!(
            color.as_crossterm_color(),
            Err(Error::MultipleColorTypes)
        ));
    }

    #[test]
    fn test_default_theme_is_valid() {
        assert!(validate_theme(&Theme::default()).is_ok());

        let mut theme = Theme::default();
        theme.colors.border.info = ColorDefinition::named("nope");
        assert!(validate_theme(&theme).is_err());
    }
}
