//! Style/render engine: output sinks and their options.

mod escape;
mod options;
mod writer;

pub use escape::{escape_string, quote_char, quote_string, quote_text_block, unescape};
pub use options::{ConfigError, StyleOptions, StyleOptionsBuilder, MAX_INDENT, MIN_WRAP_COLUMN};
pub use writer::{literal_text, StandardStyleWriter, StringStyleWriter, StyleWriter};
