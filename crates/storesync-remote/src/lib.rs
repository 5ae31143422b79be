//! # storesync-remote: Remote Document-Store Contract
//!
//! The boundary between StoreSync and the managed document store.
//!
//! ## What the Store Provides
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Remote Store Primitives                                │
//! │                                                                         │
//! │  • Durable collections of loosely typed documents                      │
//! │  • Atomic single-document writes (success/failure only)                │
//! │  • Single-field equality queries                                       │
//! │  • Subscribe-for-changes delivering FULL snapshots, in order,          │
//! │    per collection (no ordering across collections)                     │
//! │                                                                         │
//! │  Reconnection/backoff is the store's own concern; consumers see a      │
//! │  stream that either yields snapshots, yields an error event, or ends.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`document`] - Loosely typed documents with tolerant accessors
//! - [`store`] - The `RemoteStore` trait, snapshots, subscription streams
//! - [`memory`] - In-process implementation for tests and demos
//! - [`error`] - Remote error types

pub mod document;
pub mod error;
pub mod memory;
pub mod store;

pub use document::Document;
pub use error::{RemoteError, RemoteResult};
pub use memory::MemoryStore;
pub use store::{RemoteStore, Snapshot, SnapshotEvent, SubscriptionStream};
