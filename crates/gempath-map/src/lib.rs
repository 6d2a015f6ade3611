//! gempath map parser.
//!
//! Map text is one grid row per line, cells separated by tabs. Short rows
//! are padded with empty floor cells up to the widest row.

mod describe;
mod options;
mod parse;

pub use describe::describe_cell;
pub use options::MapOptions;
pub use parse::parse_map;
