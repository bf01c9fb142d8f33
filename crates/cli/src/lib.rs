//! Promptkit CLI Library
//!
//! This crate puts the components of `promptkit-core` on a real terminal
//! with crossterm, and backs the `pk` demo binary.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`commands`]: One runner per subcommand
//! - [`driver`]: Event loops for prompts, spinners, progress bars and task lists
//! - [`terminal`]: Raw mode, key translation and frame painting
//! - [`colors`]: Theme colours as crossterm colours
//!
//! # Examples
//!
//! ```bash
//! # Ask a question and print the answer
//! pk text "Project name" --placeholder my-app --required
//!
//! # Pick from a list with a custom theme
//! pk --theme ~/dark.yml select "Fruit" a=Apple b=Banana
//!
//! # Run simulated tasks side by side
//! pk tasks build test deploy --concurrent --fail test --summary
//! ```

pub mod cli_args;
pub mod colors;
pub mod commands;
pub mod driver;
pub mod terminal;
