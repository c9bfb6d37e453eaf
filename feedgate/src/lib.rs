//! A headless reconciliation engine for live, incrementally fetched feeds.
//!
//! For adapter-level utilities (scroll snapshots, restoration episodes), see
//! the `feedgate-adapter` crate.
//!
//! This crate keeps a visible feed **stable** while its paginated/streaming
//! source pushes late, out-of-order, or reordered results: session pinning of
//! the local user's fresh items, a windowed reveal gate that hides head/tail
//! items until their content loads, and a chat-mode thread-line classifier.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - the source's current item list on every change
//! - per-item "content finished loading" acknowledgments
//! - a monotonic `now_ms` clock, driving `tick` once per frame/timer tick
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod chat;
mod engine;
mod gate;
mod key;
mod options;
mod pinning;
mod source;
mod types;


pub use chat::{for_each_line_kind, line_kinds};
pub use engine::FeedEngine;
pub use gate::RevealGate;
pub use options::{EngineOptions, GateOptions, OnRevealCallback};
pub use pinning::PinReconciler;
pub use source::{
    FeedSource, FetchPage, InjectPosition, LateResults, LiveMerge, SourceError,
};
pub use types::{AuthorKey, FeedItem, HiddenWindow, LineKind, ViewMode};

pub use key::FeedKey;
