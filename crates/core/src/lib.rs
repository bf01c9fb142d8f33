//! Promptkit Core Library
//!
//! This crate provides the terminal-independent core of promptkit: interactive
//! prompts driven by abstract key events, rendering primitives and a task
//! runner. Everything renders to styled [`style::Line`]s; painting them on a
//! real terminal is left to the driver (see the `promptkit-cli` crate).
//!
//! # Key Features
//!
//! - **Prompts**: text, password, confirm, toggle, select, multi-select and
//!   autocomplete, sharing one lifecycle (validation, required fields,
//!   cancellation)
//! - **Rendering**: spinners, progress bars and tables
//! - **Tasks**: sequential or concurrent task lists with retries and a summary
//! - **Theming**: a default theme with partial overrides loaded from YAML
//!
//! # Examples
//!
//! Driving a text prompt with key events:
//!
//! ```
//! use std::time::Instant;
//!
//! use promptkit_core::key::{keys_for, KeyCode};
//! use promptkit_core::prompt::{Prompt, Step, TextInput};
//!
//! let mut prompt = Prompt::new("Name", TextInput::new()).validate(|name: &String| {
//!     if name.len() < 3 {
//!         Err("too short".to_string())
//!     } else {
//!         Ok(())
//!     }
//! });
//!
//! let now = Instant::now();
//! for key in keys_for("Ada") {
//!     prompt.handle_key(key, now);
//! }
//! prompt.handle_key(KeyCode::Return.into(), now);
//! assert_eq!(prompt.run_jobs_inline(), Step::Submitted("Ada".to_string()));
//! ```

pub mod cancel;
pub mod config;
pub mod debounce;
pub mod error;
pub mod event_emitter;
pub mod file_handling;
pub mod key;
pub mod navigation;
pub mod prompt;
pub mod render;
pub mod state;
pub mod style;
pub mod tasks;
pub mod theme;
