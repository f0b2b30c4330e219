//! Library side of the `pzfx` command-line tool.

pub mod logging;
pub mod workflow;
