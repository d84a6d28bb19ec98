//! # Listsqre CLI Architecture
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/listsqre/`: core library, UI agnostic
//! - `crates/listsqre-cli/`: this CLI tool, depends on the `listsqre` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/listsqre-cli/src/cli/)                   │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal and JSON rendering (render.rs)                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/listsqre/src/api.rs)                     │
//! │  - Cascading deletes across stores                          │
//! │  - Central failure logging                                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Stores (crates/listsqre/src/store/*)                       │
//! │  - SQLite tables, flat files                                │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward returns normal Rust values. The CLI layer is
//! responsible for **all** user-facing concerns: argument parsing, logging
//! setup, context initialization, dispatch, error reporting and rendering.
//!
//! ## Logging
//!
//! Library code logs through `tracing`. The CLI installs a
//! `tracing-subscriber` writing to stderr: `warn` by default, `-v` for
//! `debug`, `-vv` for `trace`. `RUST_LOG` overrides both.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
