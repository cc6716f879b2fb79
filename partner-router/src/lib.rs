//! Partner routing for telemetry event streams.
//!
//! This crate separates:
//! - **Classification**: whether an event belongs to a recognized partner and
//!   which event kind it is.
//! - **Policy**: whether the event may leave the pipeline and which payload
//!   fields are removed or redacted before it does.
//!
//! The [`Router`] ties both together for one message at a time: it parses the
//! inbound envelope into an [`Event`], runs the partner, schema-version and
//! allow/skip gates, cleans the payload in place and hands it to a
//! [`MessageSink`] on `<prefix>.<partner segment>`.
//!
//! Key rules:
//! - Events that fail a gate are dropped, not errored. They still count
//!   towards the seen-message counter.
//! - Cleaning is idempotent: cleaning an already-cleaned payload changes nothing.
//! - The partner registry and cleaning policy are immutable once built.
//!
//! What this crate does not do:
//! - talk to a message broker (the sink is a trait)
//! - install a metrics recorder or a log drain

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

// Module declarations
mod classification;
mod cleaning;
mod config;
mod counter;
mod error;
mod event;
pub mod logging;
mod partner;
mod router;
mod transport;

// Re-exports
pub use classification::Classification;
pub use cleaning::{
    normalize_event_id, CleaningPolicy, FieldAction, FieldPath, FieldRule, KeepConfig,
    MaskConfig, TextRedactionPolicy, REDACTED_PLACEHOLDER,
};
pub use config::{
    RouterConfig, DEFAULT_SUCCESS_TOPIC_PREFIX, KEY_EVENTS_TO_ALLOW, KEY_EVENTS_TO_SKIP,
    KEY_PARTNERS, KEY_REDACT_FIELDS, KEY_REMOVE_FIELDS, KEY_SUCCESS_TOPIC_PREFIX,
};
pub use counter::{MessageCounter, MESSAGE_COUNT_GAUGE};
pub use error::{ConfigError, Result, RouterError, SendError};
pub use event::{Event, LEGACY_SCHEMA_VERSION, PARTNER_EVENT_TYPE};
pub use partner::{Partner, PartnerRegistry, DEFAULT_PARTNER_IDS};
pub use router::{BatchReport, DropReason, Outcome, Router};
pub use transport::{
    IncomingEnvelope, MemorySink, MessageSink, OutgoingEnvelope, SystemStream, OUTPUT_SYSTEM,
};
