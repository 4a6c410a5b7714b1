//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep catalog/plan/report structs in one place.
//! - Avoid cyclic imports and duplicated type definitions.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `constants.rs` — authoritative target-map table, helper base URL.
//! - `models.rs` — catalog, requirements, ledger, plan, report structs.
//! - `error.rs` — user-facing error taxonomy with stable codes.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` outputs and the persisted
//! session-state schema. Keep schema-impacting changes explicit and
//! synchronized with `docs/contracts/*`.

pub mod constants;
pub mod error;
pub mod models;
