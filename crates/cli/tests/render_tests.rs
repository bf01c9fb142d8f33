//! Rendering core components through the terminal painter.

use promptkit_cli::colors::validate_theme;
use promptkit_cli::commands::{parse_option, parse_row};
use promptkit_cli::terminal::Painter;
use promptkit_core::prompt::{Prompt, Select, SelectOption};
use promptkit_core::render::Table;
use promptkit_core::theme::{ColorDefinition, Theme, ThemeOverride};

fn paint_to_string(lines: &[promptkit_core::style::Line]) -> String {
    let mut painter = Painter::new(Vec::new());
    painter.paint(lines).unwrap();
    painter.finish().unwrap();
    String::from_utf8(painter.into_inner()).unwrap()
}

#[test]
fn test_prompt_frame_reaches_the_terminal() {
    let options = ["a=Apple", "b=Banana"]
        .iter()
        .map(|o| {
            let (value, label) = parse_option(o);
            SelectOption::new(value, label)
        })
        .collect();
    let prompt = Prompt::new("Fruit", Select::new(options));

    let output = paint_to_string(&prompt.render());
    assert!(output.contains("Fruit"));
    assert!(output.contains("❯ Apple"));
    assert!(output.contains("Banana"));
    assert!(output.ends_with("\r\n"));
}

#[test]
fn test_table_rows_from_arguments() {
    let table = Table::new(["Name,Age", "Ann,7"].into_iter().map(parse_row)).max_width(20);
    let output = paint_to_string(&table.render());
    assert!(output.contains("Name"));
    assert!(output.contains("┌────────┬────────┐"));
}

#[test]
fn test_theme_override_with_bad_colour_is_rejected() {
    let mut overrides = ThemeOverride::default();
    overrides.colors.primary = Some(ColorDefinition::named("not-a-colour"));
    let theme = Theme::default().merged(&overrides);
    assert!(validate_theme(&theme).is_err());
}
