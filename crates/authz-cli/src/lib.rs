//! Library side of the `authz` binary: input parsing, command runners,
//! output writers and summaries.

pub mod commands;
pub mod ingest;
pub mod logging;
pub mod output;
pub mod summary;
