// Query side of the dictionary
//
// This module parses user queries and evaluates them against the direction
// stores in exact, pattern and full-text mode.

pub mod query;
pub mod query_engine;

pub use query::{Query, QueryMode, PATTERN_SIGIL, FULLTEXT_SIGIL};
pub use query_engine::{CompiledQuery, QueryEngine};
