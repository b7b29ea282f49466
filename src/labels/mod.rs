//! Display labels for pivot headers: the code table and the formatter built on it.

mod capitalize;
mod formatter;
mod mapping;

pub use capitalize::{capitalize_words, is_acronym, title_case, uppercase_acronyms};
pub use formatter::LabelFormatter;
pub use mapping::{normalize_key, LabelMap};
