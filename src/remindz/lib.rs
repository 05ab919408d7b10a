//! # Remindz Architecture
//!
//! Remindz keeps a derived index of reminders found in a set of documents and
//! persists it across restarts, together with the user's settings. The core is
//! a library; the `remindz` binary is one thin client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, prints results, owns the logger        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Wires settings, store and coordinator together           │
//! │  - Decides when to load, retries a corrupt cache once       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic, returns CmdResult                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Persistence Core (persistence.rs)                          │
//! │  - Dirty tracking, restore, two-tier save                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StorageBackend trait                                     │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two storage tiers
//!
//! Settings and flags live in a durable blob ([`data::PluginData`]). The
//! reminder index is derived data and goes to a fast key-value tier under a
//! single key; losing it only costs a rescan. See [`persistence`] for the
//! rules that tie the two together.
//!
//! ## No I/O assumptions in the core
//!
//! Everything from `api.rs` inward returns `Result<CmdResult>` and never writes
//! to stdout or stderr. Diagnostics go through the `log` facade; the binary
//! decides where they end up.

pub mod api;
pub mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod observable;
pub mod persistence;
pub mod settings;
pub mod store;
pub mod time;
