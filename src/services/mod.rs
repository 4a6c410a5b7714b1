//! Service layer containing the reconciliation logic and side-effect helpers.
//!
//! ## Service map
//! - `names.rs` — pure decoration-name normalization.
//! - `aggregate.rs` — requirement aggregation over a document.
//! - `allocate.rs` — keep/drop allocation + ownership-deficit report.
//! - `plan.rs` — swap-plan state machine with generation tokens.
//! - `apply.rs` — pure apply of a validated plan to a document.
//! - `report.rs` — plain-text pre-check and swap report assembly.
//! - `storage.rs` — session state persistence + audit log + fingerprinting.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod aggregate;
pub mod allocate;
pub mod apply;
pub mod names;
pub mod output;
pub mod plan;
pub mod report;
pub mod storage;
