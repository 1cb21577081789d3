//! Input handling for segfeat.
//!
//! Turns whitespace-separated text rows from stdin or a file into samples
//! for the engine.

pub mod parser;
pub mod reader;

// Re-export commonly used types
pub use parser::{InputError, RowLayout, RowParser};
pub use reader::{CollectorError, InputLine, InputSource, RowCollector};
