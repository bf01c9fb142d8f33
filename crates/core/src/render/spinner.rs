//! Frame-based activity indicator.

use std::time::{Duration, Instant};

use log::debug;

use crate::style::{Line, Span};
use crate::theme::{Theme, ThemeOverride};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(150);
pub const DEFAULT_STYLE: &str = "dots";

static FRAME_SETS: &[(&str, &[&str])] = &[
    ("dots", &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    ("dots2", &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"]),
    ("dots3", &["⠋", "⠙", "⠚", "⠞", "⠖", "⠦", "⠴", "⠲", "⠳", "⠓"]),
    ("dots4", &["⠄", "⠆", "⠇", "⠋", "⠙", "⠸", "⠰", "⠠", "⠰", "⠸", "⠙", "⠋", "⠇", "⠆"]),
    (
        "dots5",
        &[
            "⠋", "⠙", "⠚", "⠒", "⠂", "⠂", "⠒", "⠲", "⠴", "⠦", "⠖", "⠒", "⠐", "⠐", "⠒", "⠓", "⠋",
        ],
    ),
    (
        "dots6",
        &[
            "⠁", "⠉", "⠙", "⠚", "⠒", "⠂", "⠂", "⠒", "⠲", "⠴", "⠤", "⠄", "⠄", "⠤", "⠴", "⠲", "⠒",
            "⠂", "⠂", "⠒", "⠚", "⠙", "⠉", "⠁",
        ],
    ),
    (
        "dots7",
        &[
            "⠈", "⠉", "⠋", "⠓", "⠒", "⠐", "⠐", "⠒", "⠖", "⠦", "⠤", "⠠", "⠠", "⠤", "⠦", "⠖", "⠒",
            "⠐", "⠐", "⠒", "⠓", "⠋", "⠉", "⠈",
        ],
    ),
    (
        "dots8",
        &[
            "⠁", "⠁", "⠉", "⠙", "⠚", "⠒", "⠂", "⠂", "⠒", "⠲", "⠴", "⠤", "⠄", "⠄", "⠤", "⠠", "⠠",
            "⠤", "⠦", "⠖", "⠒", "⠐", "⠐", "⠒", "⠓", "⠋", "⠉", "⠈", "⠈",
        ],
    ),
    ("dots9", &["⢹", "⢺", "⢼", "⣸", "⣇", "⡧", "⡗", "⡏"]),
    ("dots10", &["⢄", "⢂", "⢁", "⡁", "⡈", "⡐", "⡠"]),
    ("dots11", &["⠁", "⠂", "⠄", "⡀", "⢀", "⠠", "⠐", "⠈"]),
    (
        "dots12",
        &[
            "⢀⠀", "⡀⠀", "⠄⠀", "⢂⠀", "⡂⠀", "⠅⠀", "⡃⠀", "⠍⠀", "⡉⠁", "⢉⠁", "⠉⠉", "⠉⠂", "⠉⢀", "⠈⠩",
            "⠈⡉", "⠋⠁", "⠋⠀", "⠍⢀", "⡋⠀", "⡍⠀", "⡉⠀", "⢈⠀", "⢂⠀", "⡂⠀",
        ],
    ),
    ("line", &["-", "\\", "|", "/"]),
    ("line2", &["⠂", "-", "–", "—", "–", "-"]),
    ("pipe", &["┤", "┘", "┴", "└", "├", "┌", "┬", "┐"]),
    ("simpleDots", &[".  ", ".. ", "...", "   "]),
    ("simpleDotsScrolling", &[".  ", ".. ", "...", " ..", "  .", "   "]),
    ("star", &["✶", "✵", "✴", "✳", "✺", "✹", "✸", "✷", "✶"]),
    ("star2", &["+", "x", "*"]),
    ("flip", &["_", "_", "_", "-", "`", "`", "'", "´", "-", "_", "_", "_"]),
    ("hamburger", &["☱", "☲", "☴", "☲"]),
    ("growVertical", &["▁", "▃", "▄", "▅", "▆", "▇", "█", "▇", "▆", "▅", "▄", "▃"]),
    ("growHorizontal", &["▏", "▎", "▍", "▌", "▋", "▊", "▉", "▊", "▋", "▌", "▍", "▎"]),
    ("balloon", &[" ", ".", "o", "O", "@", "*", " "]),
    ("balloon2", &[".", "o", "O", "°", "O", "o", "."]),
    ("noise", &["▓", "▒", "░"]),
    ("bounce", &["⠁", "⠂", "⠄", "⠂"]),
    ("boxBounce", &["▖", "▘", "▝", "▗"]),
    ("boxBounce2", &["▌", "▀", "▐", "▄"]),
    ("triangle", &["◢", "◣", "◤", "◥"]),
    ("arc", &["◜", "◠", "◝", "◞", "◡", "◟"]),
    ("circle", &["◡", "⊙", "◠"]),
    ("squareCorners", &["◰", "◳", "◲", "◱"]),
    ("circleQuarters", &["◴", "◷", "◶", "◵"]),
    ("circleHalves", &["◐", "◓", "◑", "◒"]),
    ("squish", &["╫", "╪"]),
    ("toggle", &["⊶", "⊷"]),
    ("toggle2", &["▫", "▪"]),
    ("toggle3", &["□", "■"]),
    ("toggle4", &["■", "□", "▪", "▫"]),
    ("toggle5", &["▮", "▯"]),
    ("toggle6", &["●", "○"]),
    ("toggle7", &["⦿", "○"]),
    ("toggle8", &["◉", "◎"]),
    ("toggle9", &["㊂", "㊀", "㊁"]),
    ("toggle10", &["⦾", "⦿"]),
    ("toggle11", &["◉", "◯"]),
    ("toggle12", &["⭘", "⭕"]),
    ("toggle13", &["⭕", "⭖"]),
    ("arrow", &["←", "↖", "↑", "↗", "→", "↘", "↓", "↙"]),
    ("arrow2", &["⬆️ ", "↗️ ", "➡️ ", "↘️ ", "⬇️ ", "↙️ ", "⬅️ ", "↖️ "]),
    ("arrow3", &["▹▹▹▹▹", "▸▹▹▹▹", "▹▸▹▹▹", "▹▹▸▹▹", "▹▹▹▸▹", "▹▹▹▹▸"]),
    (
        "bouncingBar",
        &[
            "[    ]", "[=   ]", "[==  ]", "[=== ]", "[ ===]", "[  ==]", "[   =]", "[    ]",
            "[   =]", "[  ==]", "[ ===]", "[====]", "[=== ]", "[==  ]", "[=   ]",
        ],
    ),
    (
        "bouncingBall",
        &[
            "( ●    )", "(  ●   )", "(   ●  )", "(    ● )", "(     ●)", "(    ● )", "(   ●  )",
            "(  ●   )", "( ●    )", "(●     )",
        ],
    ),
    ("smiley", &["😄", "😝"]),
    ("monkey", &["🙈", "🙈", "🙉", "🙊", "🙈", "🙉", "🙊"]),
    ("hearts", &["💛", "💙", "💜", "💚", "❤️"]),
    ("clock", &["🕐", "🕑", "🕒", "🕓", "🕔", "🕕", "🕖", "🕗", "🕘", "🕙", "🕚", "🕛"]),
    ("earth", &["🌍", "🌎", "🌏"]),
    ("moon", &["🌑", "🌒", "🌓", "🌔", "🌕", "🌖", "🌗", "🌘"]),
    ("runner", &["🚶", "🏃"]),
    (
        "pong",
        &[
            "▐⠂       ▌", "▐⠈       ▌", "▐ ⠂      ▌", "▐ ⠠      ▌", "▐  ⡀     ▌", "▐  ⠠     ▌",
            "▐   ⠂    ▌", "▐   ⠈    ▌", "▐    ⠂   ▌", "▐    ⠠   ▌", "▐     ⡀  ▌", "▐     ⠠  ▌",
            "▐      ⠂ ▌", "▐      ⠈ ▌", "▐       ⠂▌", "▐       ⠠▌", "▐       ⡀▌", "▐      ⠠ ▌",
            "▐      ⠂ ▌", "▐     ⠈  ▌", "▐     ⠂  ▌", "▐    ⠠   ▌", "▐    ⡀   ▌", "▐   ⠠    ▌",
            "▐   ⠂    ▌", "▐  ⠈     ▌", "▐  ⠂     ▌", "▐ ⠠      ▌", "▐ ⡀      ▌", "▐⠠       ▌",
        ],
    ),
    (
        "shark",
        &[
            "▐|____________▌", "▐_|___________▌", "▐__|__________▌", "▐___|_________▌",
            "▐____|________▌", "▐_____|_______▌", "▐______|______▌", "▐_______|_____▌",
            "▐________|____▌", "▐_________|___▌", "▐__________|__▌", "▐___________|_▌",
            "▐____________|▌", "▐____________/|▌", "▐___________/|_▌", "▐__________/|__▌",
            "▐_________/|___▌", "▐________/|____▌", "▐_______/|_____▌", "▐______/|______▌",
            "▐_____/|_______▌", "▐____/|________▌", "▐___/|_________▌", "▐__/|__________▌",
            "▐_/|___________▌", "▐/|____________▌",
        ],
    ),
    ("dqpb", &["d", "q", "p", "b"]),
    (
        "weather",
        &[
            "☀️ ", "☀️ ", "☀️ ", "🌤 ", "⛅️ ", "🌥 ", "☁️ ", "🌧 ", "🌨 ", "🌧 ", "🌨 ", "🌧 ", "🌨 ",
            "⛈ ", "🌨 ", "🌧 ", "🌨 ", "🌧 ", "🌨 ", "⛅️ ", "🌤 ", "☀️ ", "☀️ ",
        ],
    ),
    ("christmas", &["🌲", "🎄"]),
];

/// The frames of the named style, falling back to `dots`.
#[must_use]
pub fn frames(style: &str) -> &'static [&'static str] {
    FRAME_SETS
        .iter()
        .find(|(name, _)| *name == style)
        .map_or(FRAME_SETS[0].1, |(_, frames)| *frames)
}

/// Every known style name.
pub fn styles() -> impl Iterator<Item = &'static str> {
    FRAME_SETS.iter().map(|(name, _)| *name)
}

#[derive(Debug, Clone)]
pub struct Spinner {
    frames: &'static [&'static str],
    frame: usize,
    interval: Duration,
    label: String,
    last_frame: Option<Instant>,
    theme: Theme,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new(DEFAULT_STYLE)
    }
}

impl Spinner {
    pub fn new(style: &str) -> Self {
        if !styles().any(|name| name == style) {
            debug!("unknown spinner style {style:?}; using {DEFAULT_STYLE}");
        }
        Self {
            frames: frames(style),
            frame: 0,
            interval: DEFAULT_INTERVAL,
            label: String::new(),
            last_frame: None,
            theme: Theme::default(),
        }
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Time between frames. Zero is treated as one millisecond.
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn theme_override(mut self, overrides: &ThemeOverride) -> Self {
        self.theme = self.theme.merged(overrides);
        self
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    #[must_use]
    pub fn frame(&self) -> usize {
        self.frame
    }

    #[must_use]
    pub fn glyph(&self) -> &'static str {
        self.frames[self.frame]
    }

    pub fn advance(&mut self) {
        self.frame = (self.frame + 1) % self.frames.len();
    }

    /// Advances one frame per whole interval elapsed since the last frame.
    /// The first call only starts the clock. Returns `true` if the frame
    /// changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(last) = self.last_frame else {
            self.last_frame = Some(now);
            return false;
        };

        let elapsed = now.saturating_duration_since(last);
        let steps = elapsed.as_nanos() / self.interval.as_nanos();
        if steps == 0 {
            return false;
        }

        let len = self.frames.len() as u128;
        self.frame = ((self.frame as u128 + steps) % len) as usize;
        self.last_frame = Some(last + self.interval * u32::try_from(steps).unwrap_or(u32::MAX));
        true
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.last_frame.map(|last| last + self.interval)
    }

    pub fn render(&self) -> Line {
        let mut line = Line::from(Span::colored(self.glyph(), &self.theme.colors.primary));
        if !self.label.is_empty() {
            line.push(Span::plain(format!(" {}", self.label)));
        }
        line
    }
}
