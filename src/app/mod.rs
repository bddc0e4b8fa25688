//! Interactive application layer: the line-oriented command loop.

mod command_loop;

pub use command_loop::{AppError, EXIT_COMMAND, LoopExit, PROMPT, run_command_loop, run_session};
