//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `runtime.rs` — precheck/swap/report/status/guilds/maps.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*` and `document`.
//! - Keep behavior and output schema stable.

pub mod runtime;

pub use runtime::handle_command;
