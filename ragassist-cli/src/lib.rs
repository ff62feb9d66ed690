//! # ragassist-cli
//!
//! The `ragassist` binary: loads a folder of documents into a local vector
//! database and answers questions about them in an interactive loop.
//!
//! The library half exposes the pieces the binary is built from so they can be
//! exercised without a terminal or network access.

pub mod bootstrap;
pub mod config;
pub mod repl;

pub use bootstrap::{assemble, bootstrap};
pub use config::{AppConfig, ErrorPolicy};
pub use repl::{Answerer, LineSource, ScriptedInput, SessionEnd, TerminalInput, is_exit_command, run_loop};
