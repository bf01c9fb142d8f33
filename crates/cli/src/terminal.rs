//! Raw-mode handling, key translation and inline frame painting.

use std::io::{stdout, Write};

use crossterm::cursor::{self, MoveToColumn, MoveUp};
use crossterm::event::{KeyCode as TermKeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{
    Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType};
use crossterm::{execute, queue};
use promptkit_core::error::Result;
use promptkit_core::key::{Key, KeyCode, Modifiers};
use promptkit_core::style::{Line, Span};

use crate::colors::AsTermColor;

/// Raw mode for as long as the guard lives. The cursor is hidden while it
/// is held.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        execute!(stdout(), cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Disable raw mode on drop
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), cursor::Show);
    }
}

/// Translates a terminal key event. Releases and repeats are dropped, as
/// are keys the prompts have no use for.
#[must_use]
pub fn to_key(event: &KeyEvent) -> Option<Key> {
    if event.kind != KeyEventKind::Press {
        return None;
    }

    let code = match event.code {
        TermKeyCode::Char(' ') => KeyCode::Space,
        TermKeyCode::Char(c) => KeyCode::Char(c),
        TermKeyCode::Up => KeyCode::Up,
        TermKeyCode::Down => KeyCode::Down,
        TermKeyCode::Left => KeyCode::Left,
        TermKeyCode::Right => KeyCode::Right,
        TermKeyCode::Enter => KeyCode::Return,
        TermKeyCode::Esc => KeyCode::Escape,
        TermKeyCode::Tab => KeyCode::Tab,
        TermKeyCode::Backspace => KeyCode::Backspace,
        TermKeyCode::Delete => KeyCode::Delete,
        TermKeyCode::Home => KeyCode::Home,
        TermKeyCode::End => KeyCode::End,
        TermKeyCode::PageUp => KeyCode::PageUp,
        TermKeyCode::PageDown => KeyCode::PageDown,
        _ => return None,
    };

    let modifiers = Modifiers {
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        meta: event.modifiers.contains(KeyModifiers::ALT),
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
    };

    Some(Key::new(code, modifiers))
}

fn queue_span<W: Write>(out: &mut W, span: &Span) -> Result<()> {
    if let Some(color) = span
        .foreground
        .as_ref()
        .map(AsTermColor::as_crossterm_color)
        .transpose()?
        .flatten()
    {
        queue!(out, SetForegroundColor(color))?;
    }
    if let Some(color) = span
        .background
        .as_ref()
        .map(AsTermColor::as_crossterm_color)
        .transpose()?
        .flatten()
    {
        queue!(out, SetBackgroundColor(color))?;
    }

    let style = span.style;
    for (enabled, attribute) in [
        (style.bold, Attribute::Bold),
        (style.dim, Attribute::Dim),
        (style.italic, Attribute::Italic),
        (style.underline, Attribute::Underlined),
        (span.inverse, Attribute::Reverse),
    ] {
        if enabled {
            queue!(out, SetAttribute(attribute))?;
        }
    }

    queue!(out, Print(&span.text), SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Draws frames in place below the cursor, replacing the previous frame.
///
/// `height` counts screen rows, so lines wider than `columns` count once per
/// row they wrap onto.
pub struct Painter<W: Write> {
    out: W,
    height: u16,
    columns: Option<usize>,
}

impl<W: Write> Painter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            height: 0,
            columns: None,
        }
    }

    /// A painter that knows the current terminal width.
    pub fn for_terminal(out: W) -> Result<Self> {
        let (columns, _) = terminal::size()?;
        Ok(Self::new(out).columns(columns))
    }

    /// Terminal width used to count wrapped rows.
    #[must_use]
    pub fn columns(mut self, columns: u16) -> Self {
        self.set_columns(columns);
        self
    }

    pub fn set_columns(&mut self, columns: u16) {
        self.columns = (columns > 0).then_some(usize::from(columns));
    }

    fn rows(&self, line: &Line) -> usize {
        match self.columns {
            Some(columns) => line.width().div_ceil(columns).max(1),
            None => 1,
        }
    }

    /// Replaces the previous frame with `lines`.
    pub fn paint(&mut self, lines: &[Line]) -> Result<()> {
        queue!(self.out, MoveToColumn(0))?;
        if self.height > 1 {
            queue!(self.out, MoveUp(self.height - 1))?;
        }
        queue!(self.out, Clear(ClearType::FromCursorDown))?;

        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                // Raw mode does not translate `\n`.
                queue!(self.out, Print("\r\n"))?;
            }
            for span in &line.spans {
                queue_span(&mut self.out, span)?;
            }
        }

        let rows: usize = lines.iter().map(|line| self.rows(line)).sum();
        self.height = u16::try_from(rows).unwrap_or(u16::MAX);
        self.out.flush()?;
        Ok(())
    }

    /// Leaves the last frame on screen and moves below it.
    pub fn finish(&mut self) -> Result<()> {
        if self.height > 0 {
            queue!(self.out, Print("\r\n"))?;
        }
        self.height = 0;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
