//! Colour, spacing, typography and symbol tokens.
//!
//! A [`Theme`] is an immutable, fully-resolved set of tokens. Partial
//! overrides come in as a [`ThemeOverride`] (all fields optional, loadable
//! from YAML) and are merged over the defaults with [`Theme::merged`]; every
//! prompt and primitive owns its own resolved copy.

use serde::{Deserialize, Serialize};

/// A terminal colour. Exactly one of the fields should be set.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorDefinition {
    pub rgb: Option<(u8, u8, u8)>,
    pub ansi: Option<u8>,
    pub name: Option<String>,
}

impl ColorDefinition {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            rgb: Some((r, g, b)),
            ansi: None,
            name: None,
        }
    }

    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            rgb: None,
            ansi: None,
            name: Some(name.to_string()),
        }
    }

    #[must_use]
    pub const fn ansi(value: u8) -> Self {
        Self {
            rgb: None,
            ansi: Some(value),
            name: None,
        }
    }

    /// The terminal's own default colour.
    #[must_use]
    pub fn reset() -> Self {
        Self::named("reset")
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default)]
pub struct TextStyle {
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextStyle {
    pub const PLAIN: Self = Self {
        bold: false,
        dim: false,
        italic: false,
        underline: false,
    };

    pub const BOLD: Self = Self {
        bold: true,
        ..Self::PLAIN
    };

    pub const DIM: Self = Self {
        dim: true,
        ..Self::PLAIN
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextColors {
    pub primary: ColorDefinition,
    pub secondary: ColorDefinition,
    pub inverted: ColorDefinition,
    pub disabled: ColorDefinition,
    pub error: ColorDefinition,
    pub success: ColorDefinition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundColors {
    pub default: ColorDefinition,
    pub selected: ColorDefinition,
    pub error: ColorDefinition,
    pub success: ColorDefinition,
    pub warning: ColorDefinition,
    pub info: ColorDefinition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BorderColors {
    pub default: ColorDefinition,
    pub focus: ColorDefinition,
    pub error: ColorDefinition,
    pub success: ColorDefinition,
    pub warning: ColorDefinition,
    pub info: ColorDefinition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Colors {
    pub primary: ColorDefinition,
    pub success: ColorDefinition,
    pub warning: ColorDefinition,
    pub error: ColorDefinition,
    pub info: ColorDefinition,
    pub muted: ColorDefinition,
    pub text: TextColors,
    pub background: BackgroundColors,
    pub border: BorderColors,
}

/// Spacing tokens, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spacing {
    pub xs: u16,
    pub sm: u16,
    pub md: u16,
    pub lg: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Typography {
    pub message: TextStyle,
    pub hint: TextStyle,
    pub highlight: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbols {
    pub pointer: String,
    pub checked: String,
    pub unchecked: String,
    pub required: String,
    pub gutter: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub colors: Colors,
    pub spacing: Spacing,
    pub typography: Typography,
    pub symbols: Symbols,
}

const BLUE: ColorDefinition = ColorDefinition::rgb(0x00, 0x7A, 0xFF);
const GREEN: ColorDefinition = ColorDefinition::rgb(0x34, 0xC7, 0x59);
const ORANGE: ColorDefinition = ColorDefinition::rgb(0xFF, 0x95, 0x00);
const RED: ColorDefinition = ColorDefinition::rgb(0xFF, 0x3B, 0x30);
const CYAN: ColorDefinition = ColorDefinition::rgb(0x5A, 0xC8, 0xFA);
const GREY: ColorDefinition = ColorDefinition::rgb(0x8E, 0x8E, 0x93);

impl Default for Theme {
    fn default() -> Self {
        Self {
            colors: Colors {
                primary: BLUE,
                success: GREEN,
                warning: ORANGE,
                error: RED,
                info: CYAN,
                muted: GREY,
                text: TextColors {
                    primary: ColorDefinition::reset(),
                    secondary: GREY,
                    inverted: ColorDefinition::rgb(0xFF, 0xFF, 0xFF),
                    disabled: GREY,
                    error: RED,
                    success: GREEN,
                },
                background: BackgroundColors {
                    default: ColorDefinition::reset(),
                    selected: ColorDefinition::rgb(0xF2, 0xF2, 0xF7),
                    error: ColorDefinition::rgb(0xFF, 0xE5, 0xE5),
                    success: ColorDefinition::rgb(0xE5, 0xF9, 0xE5),
                    warning: ColorDefinition::rgb(0xFF, 0xF4, 0xE5),
                    info: ColorDefinition::rgb(0xE5, 0xF5, 0xFF),
                },
                border: BorderColors {
                    default: ColorDefinition::rgb(0xC7, 0xC7, 0xCC),
                    focus: BLUE,
                    error: RED,
                    success: GREEN,
                    warning: ORANGE,
                    info: CYAN,
                },
            },
            spacing: Spacing {
                xs: 0,
                sm: 1,
                md: 2,
                lg: 4,
            },
            typography: Typography {
                message: TextStyle::BOLD,
                hint: TextStyle::DIM,
                highlight: TextStyle::BOLD,
            },
            symbols: Symbols {
                pointer: "❯".to_string(),
                checked: "◉".to_string(),
                unchecked: "◯".to_string(),
                required: "*".to_string(),
                gutter: "│".to_string(),
            },
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct TextColorsOverride {
    pub primary: Option<ColorDefinition>,
    pub secondary: Option<ColorDefinition>,
    pub inverted: Option<ColorDefinition>,
    pub disabled: Option<ColorDefinition>,
    pub error: Option<ColorDefinition>,
    pub success: Option<ColorDefinition>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct BackgroundColorsOverride {
    pub default: Option<ColorDefinition>,
    pub selected: Option<ColorDefinition>,
    pub error: Option<ColorDefinition>,
    pub success: Option<ColorDefinition>,
    pub warning: Option<ColorDefinition>,
    pub info: Option<ColorDefinition>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct BorderColorsOverride {
    pub default: Option<ColorDefinition>,
    pub focus: Option<ColorDefinition>,
    pub error: Option<ColorDefinition>,
    pub success: Option<ColorDefinition>,
    pub warning: Option<ColorDefinition>,
    pub info: Option<ColorDefinition>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ColorsOverride {
    pub primary: Option<ColorDefinition>,
    pub success: Option<ColorDefinition>,
    pub warning: Option<ColorDefinition>,
    pub error: Option<ColorDefinition>,
    pub info: Option<ColorDefinition>,
    pub muted: Option<ColorDefinition>,
    pub text: TextColorsOverride,
    pub background: BackgroundColorsOverride,
    pub border: BorderColorsOverride,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SpacingOverride {
    pub xs: Option<u16>,
    pub sm: Option<u16>,
    pub md: Option<u16>,
    pub lg: Option<u16>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct TypographyOverride {
    pub message: Option<TextStyle>,
    pub hint: Option<TextStyle>,
    pub highlight: Option<TextStyle>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SymbolsOverride {
    pub pointer: Option<String>,
    pub checked: Option<String>,
    pub unchecked: Option<String>,
    pub required: Option<String>,
    pub gutter: Option<String>,
}

/// Partial theme. Unset fields keep the value of the theme it is merged
/// over.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ThemeOverride {
    pub colors: ColorsOverride,
    pub spacing: SpacingOverride,
    pub typography: TypographyOverride,
    pub symbols: SymbolsOverride,
}

macro_rules! merge_fields {
    ($target:expr, $source:expr, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(value) = &$source.$field {
                $target.$field = value.clone();
            }
        )*
    };
}

impl Theme {
    /// Returns a copy of this theme with every field set in `overrides`
    /// replaced.
    #[must_use]
    pub fn merged(&self, overrides: &ThemeOverride) -> Self {
        let mut theme = self.clone();

        let colors = &overrides.colors;
        merge_fields!(
            theme.colors,
            colors,
            [primary, success, warning, error, info, muted]
        );
        merge_fields!(
            theme.colors.text,
            colors.text,
            [primary, secondary, inverted, disabled, error, success]
        );
        merge_fields!(
            theme.colors.background,
            colors.background,
            [default, selected, error, success, warning, info]
        );
        merge_fields!(
            theme.colors.border,
            colors.border,
            [default, focus, error, success, warning, info]
        );
        merge_fields!(theme.spacing, overrides.spacing, [xs, sm, md, lg]);
        merge_fields!(
            theme.typography,
            overrides.typography,
            [message, hint, highlight]
        );
        merge_fields!(
            theme.symbols,
            overrides.symbols,
            [pointer, checked, unchecked, required, gutter]
        );

        theme
    }
}
