//! CLI output: JSON envelopes, colored reports, exit codes.

mod response;

pub use response::*;
