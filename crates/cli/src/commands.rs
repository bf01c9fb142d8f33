//! Builds the component for each subcommand and runs it.

use std::fmt::Display;
use std::thread;
use std::time::Duration;

use itertools::Itertools;
use log::{debug, info};
use promptkit_core::error::Result;
use promptkit_core::prompt::{
    Answer, Autocomplete, AutocompleteOption, Completion, Confirm, MultiSelect, Password, Prompt,
    Select, SelectOption, TextInput, Toggle, Variant,
};
use promptkit_core::render::spinner::styles;
use promptkit_core::render::{ProgressBar, Spinner, Table};
use promptkit_core::tasks::{Task, TaskList};
use promptkit_core::theme::Theme;

use crate::cli_args::{ListArgs, PromptCommand};
use crate::driver;

/// How a subcommand ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
    Failed,
}

/// Splits `value=label`; a bare `label` is its own value.
#[must_use]
pub fn parse_option(option: &str) -> (String, String) {
    match option.split_once('=') {
        Some((value, label)) => (value.to_string(), label.to_string()),
        None => (option.to_string(), option.to_string()),
    }
}

fn select_options(list: &ListArgs) -> Vec<SelectOption<String>> {
    list.options
        .iter()
        .map(|o| {
            let (value, label) = parse_option(o);
            SelectOption::new(value, label)
        })
        .collect()
}

/// Splits a table row on commas, trimming each cell.
#[must_use]
pub fn parse_row(row: &str) -> Vec<String> {
    row.split(',').map(|cell| cell.trim().to_string()).collect()
}

fn min_length(length: usize) -> impl Fn(&String) -> std::result::Result<(), String> {
    move |value: &String| {
        if value.chars().count() < length {
            Err(format!("Must be at least {length} characters"))
        } else {
            Ok(())
        }
    }
}

fn ask<V, F>(prompt: Prompt<V>, print: F) -> Result<Outcome>
where
    V: Variant,
    F: FnOnce(V::Value) -> String,
{
    match driver::run_prompt(prompt)? {
        Answer::Submitted(value) => {
            println!("{}", print(value));
            Ok(Outcome::Completed)
        }
        Answer::Cancelled => {
            info!("Prompt cancelled");
            Ok(Outcome::Cancelled)
        }
    }
}

fn show<T: Display>(value: T) -> String {
    value.to_string()
}

/// Runs the subcommand with `theme` applied.
pub fn execute(command: PromptCommand, theme: &Theme) -> Result<Outcome> {
    debug!("Running {command:?}");

    match command {
        PromptCommand::Text {
            message,
            placeholder,
            initial,
            required,
            min_length: minimum,
        } => {
            let mut input = TextInput::new();
            if let Some(placeholder) = placeholder {
                input = input.placeholder(placeholder);
            }
            if let Some(initial) = initial {
                input = input.initial(&initial);
            }
            let mut prompt = Prompt::new(message, input)
                .required(required)
                .theme(theme.clone());
            if let Some(minimum) = minimum {
                prompt = prompt.validate(min_length(minimum));
            }
            ask(prompt, show)
        }
        PromptCommand::Password {
            message,
            confirm,
            mask,
        } => {
            let mut password = Password::new().confirm(confirm);
            if let Some(mask) = mask {
                password = password.mask(mask);
            }
            // The secret itself is never echoed.
            ask(Prompt::new(message, password).theme(theme.clone()), |value| {
                "*".repeat(value.chars().count())
            })
        }
        PromptCommand::Confirm { message, yes } => ask(
            Prompt::new(message, Confirm::new().initial(yes)).theme(theme.clone()),
            show,
        ),
        PromptCommand::Toggle {
            message,
            active,
            inactive,
            on,
        } => ask(
            Prompt::new(message, Toggle::new().labels(active, inactive).initial(on))
                .theme(theme.clone()),
            show,
        ),
        PromptCommand::Select(list) => {
            let mut select = Select::new(select_options(&list));
            if let Some(limit) = list.limit {
                select = select.limit(limit);
            }
            ask(Prompt::new(list.message, select).theme(theme.clone()), show)
        }
        PromptCommand::Multiselect {
            list,
            min,
            max,
            required,
        } => {
            let mut select = MultiSelect::new(select_options(&list));
            if let Some(limit) = list.limit {
                select = select.limit(limit);
            }
            if let Some(min) = min {
                select = select.min_selected(min);
            }
            if let Some(max) = max {
                select = select.max_selected(max);
            }
            ask(
                Prompt::new(list.message, select)
                    .required(required)
                    .theme(theme.clone()),
                |values| values.iter().join(", "),
            )
        }
        PromptCommand::Autocomplete {
            list,
            min_query_length,
            debounce_ms,
        } => {
            let options = list
                .options
                .iter()
                .map(|o| {
                    let (value, label) = parse_option(o);
                    AutocompleteOption::new(value, label)
                })
                .collect();
            let mut autocomplete = Autocomplete::from_options(options)
                .min_query_length(min_query_length)
                .debounce(Duration::from_millis(debounce_ms));
            if let Some(limit) = list.limit {
                autocomplete = autocomplete.limit(limit);
            }
            ask(
                Prompt::new(list.message, autocomplete).theme(theme.clone()),
                |completion| match completion {
                    Completion::Option(value) | Completion::FreeText(value) => value,
                },
            )
        }
        PromptCommand::Spinner {
            style,
            label,
            duration_ms,
            list_styles,
        } => {
            if list_styles {
                for name in styles() {
                    println!("{name}");
                }
                return Ok(Outcome::Completed);
            }
            let spinner = Spinner::new(&style).label(label).theme(theme.clone());
            driver::run_spinner(spinner, Duration::from_millis(duration_ms))?;
            Ok(Outcome::Completed)
        }
        PromptCommand::Progress {
            width,
            duration_ms,
            prefix,
            suffix,
            template,
            show_value,
            total,
        } => {
            let mut bar = ProgressBar::new(0.0)
                .width(width)
                .prefix(prefix)
                .suffix(suffix)
                .show_value(show_value)
                .total(total)
                .theme(theme.clone());
            if let Some(template) = template {
                bar = bar.template(template);
            }
            driver::run_progress(bar, Duration::from_millis(duration_ms))?;
            Ok(Outcome::Completed)
        }
        PromptCommand::Table {
            rows,
            no_header,
            no_border,
            padding,
            max_width,
            weights,
        } => {
            let mut table = Table::new(rows.iter().map(String::as_str).map(parse_row))
                .header(!no_header)
                .border(!no_border)
                .padding(padding)
                .theme(theme.clone());
            if let Some(max_width) = max_width {
                table = table.max_width(max_width);
            }
            if !weights.is_empty() {
                table = table.column_weights(weights);
            }
            let mut painter = crate::terminal::Painter::for_terminal(std::io::stdout())?;
            painter.paint(&table.render())?;
            painter.finish()?;
            Ok(Outcome::Completed)
        }
        PromptCommand::Tasks {
            titles,
            concurrent,
            keep_going,
            failing,
            skipped,
            retries,
            work_ms,
            retry_delay_ms,
            no_timer,
            no_summary,
        } => {
            let tasks = titles
                .into_iter()
                .map(|title| {
                    let fails = failing.contains(&title);
                    let skip = skipped.contains(&title);
                    let work = Duration::from_millis(work_ms);
                    Task::new(title, move || {
                        thread::sleep(work);
                        if fails {
                            Err("Simulated failure")
                        } else {
                            Ok(())
                        }
                    })
                    .skip(skip)
                    .retry(retries)
                })
                .collect();

            let mut list = TaskList::new(tasks)
                .concurrent(concurrent)
                .exit_on_error(!keep_going)
                .show_timer(!no_timer)
                .show_summary(!no_summary)
                .retry_delay(Duration::from_millis(retry_delay_ms))
                .theme(theme.clone());

            let report = driver::run_tasks(&mut list)?;
            Ok(if report.success {
                Outcome::Completed
            } else {
                Outcome::Failed
            })
        }
    }
}
