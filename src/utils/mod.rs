//! Generic utility primitives with zero domain knowledge.
//!
//! - `io` - File I/O with consistent error handling
//! - `paths` - Command-line path expansion and display

pub mod io;
pub mod paths;
