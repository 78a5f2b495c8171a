// src/lib.rs
#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod util;
pub mod config;

pub mod diff_line;
pub mod diff;
pub mod markers;

pub mod search;
pub mod scan;

pub mod commands;

pub use diff::{diff_lines, diff_text, DiffLines};
pub use diff_line::{DiffKind, DiffLine, DiffStats};
pub use search::{search, search_with, FuzzyScorer, Searchable, SearchableItem};
pub use scan::{enumerate_submenu_items, DirectoryWalker, SubmenuItem};
