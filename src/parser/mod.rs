//! Parsing for level files.
//!
//! Level files are read in two passes. The first accepts only literal
//! syntax (mappings, tuples, lists, strings, numbers, `True`/`False`/`None`)
//! and never evaluates anything. The second checks the result against the
//! eight-layer shape and produces a [`LevelDocument`](crate::document::LevelDocument).
//!
//! # Usage
//!
//! ```ignore
//! use shoal::parser::parse_level;
//!
//! let source = std::fs::read_to_string("levels/level_20231114_221320.txt")?;
//! let doc = parse_level(&source)?;
//! println!("{} land tiles", doc.land.len());
//! ```

mod level;
mod literal;
pub mod span;

pub use level::{decode_level, parse_level};
pub use literal::{parse_literal, Literal, MAX_DEPTH};
pub use span::{Location, Span, Spanned};
