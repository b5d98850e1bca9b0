//! Exchange rate acquisition: the source interface and payload parsing.

pub mod source;
