//! Command-line argument parsing.
//!
//! Every subcommand demos one component; its flags map onto the
//! component's options.

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Command-line arguments for the `pk` binary.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use promptkit_cli::cli_args::{Args, PromptCommand};
///
/// let args = Args::parse_from(["pk", "confirm", "Continue?"]);
/// assert!(matches!(args.command, PromptCommand::Confirm { .. }));
/// ```
#[derive(Parser, Debug)]
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Path to a theme override YAML file.
    ///
    /// If not provided, `~/.promptkit/theme.yml` is used when it exists.
    #[arg(long, short = 't', global = true)]
    pub theme: Option<String>,

    #[command(subcommand)]
    pub command: PromptCommand,
}

/// Options shared by the list prompts.
#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct ListArgs {
    /// The question to ask.
    pub message: String,

    /// Options as `value=label` or just `label`.
    #[arg(required = true, num_args = 1..)]
    pub options: Vec<String>,

    /// Number of options visible at once.
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum PromptCommand {
    /// Ask for a line of text.
    Text {
        message: String,

        #[arg(long)]
        placeholder: Option<String>,

        /// Text the field starts with.
        #[arg(long)]
        initial: Option<String>,

        #[arg(long, short = 'r', action)]
        required: bool,

        /// Reject answers shorter than this many characters.
        #[arg(long)]
        min_length: Option<usize>,
    },

    /// Ask for a secret; the input is masked.
    Password {
        message: String,

        /// Ask a second time and require both entries to match.
        #[arg(long, short = 'c', action)]
        confirm: bool,

        #[arg(long)]
        mask: Option<String>,
    },

    /// Ask a yes/no question.
    Confirm {
        message: String,

        /// Start on "Yes".
        #[arg(long, short = 'y', action)]
        yes: bool,
    },

    /// Flip a switch between two labels.
    Toggle {
        message: String,

        #[arg(long, default_value = "Yes")]
        active: String,

        #[arg(long, default_value = "No")]
        inactive: String,

        /// Start switched on.
        #[arg(long, action)]
        on: bool,
    },

    /// Pick one option.
    Select(ListArgs),

    /// Pick any number of options.
    Multiselect {
        #[command(flatten)]
        list: ListArgs,

        #[arg(long)]
        min: Option<usize>,

        #[arg(long)]
        max: Option<usize>,

        #[arg(long, short = 'r', action)]
        required: bool,
    },

    /// Pick from options filtered as you type, or enter free text.
    Autocomplete {
        #[command(flatten)]
        list: ListArgs,

        /// Characters to type before suggestions show.
        #[arg(long, default_value_t = 0)]
        min_query_length: usize,

        /// Wait after the last keystroke before searching, in milliseconds.
        #[arg(long, default_value_t = 300)]
        debounce_ms: u64,
    },

    /// Show a spinner for a while.
    Spinner {
        /// Frame set to animate.
        #[arg(long, short = 's', default_value = "dots")]
        style: String,

        #[arg(long, default_value = "Loading...")]
        label: String,

        #[arg(long, default_value_t = 3000)]
        duration_ms: u64,

        /// Print the available styles and exit.
        #[arg(long, action)]
        list_styles: bool,
    },

    /// Animate a progress bar from 0 to 100%.
    Progress {
        #[arg(long, short = 'w', default_value_t = 50)]
        width: usize,

        #[arg(long, default_value_t = 2000)]
        duration_ms: u64,

        #[arg(long, default_value = "")]
        prefix: String,

        #[arg(long, default_value = "")]
        suffix: String,

        /// Layout such as `{prefix} [{bar}] {percent}%`.
        #[arg(long)]
        template: Option<String>,

        /// Also show `value/total`.
        #[arg(long, action)]
        show_value: bool,

        #[arg(long, default_value_t = 100)]
        total: u64,
    },

    /// Print a table. Each row is a comma separated list of cells.
    Table {
        #[arg(required = true, num_args = 1..)]
        rows: Vec<String>,

        /// Treat the first row as data rather than a header.
        #[arg(long, action)]
        no_header: bool,

        #[arg(long, action)]
        no_border: bool,

        #[arg(long, default_value_t = 1)]
        padding: usize,

        #[arg(long)]
        max_width: Option<usize>,

        /// Comma separated column weights, e.g. `0.7,0.3`.
        #[arg(long, value_delimiter = ',')]
        weights: Vec<f64>,
    },

    /// Run a list of simulated tasks.
    Tasks {
        #[arg(required = true, num_args = 1..)]
        titles: Vec<String>,

        /// Run every task at once.
        #[arg(long, action)]
        concurrent: bool,

        /// Keep going after a failure.
        #[arg(long, action)]
        keep_going: bool,

        /// Titles of tasks that fail.
        #[arg(long = "fail", action = clap::ArgAction::Append)]
        failing: Vec<String>,

        /// Titles of tasks that are skipped.
        #[arg(long = "skip", action = clap::ArgAction::Append)]
        skipped: Vec<String>,

        #[arg(long, default_value_t = 0)]
        retries: u32,

        /// How long each simulated task takes.
        #[arg(long, default_value_t = 800)]
        work_ms: u64,

        #[arg(long, default_value_t = 1000)]
        retry_delay_ms: u64,

        /// Hide how long each task took.
        #[arg(long, action)]
        no_timer: bool,

        /// Hide the summary line and bar.
        #[arg(long, action)]
        no_summary: bool,
    },
}
