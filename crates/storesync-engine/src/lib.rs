//! # storesync-engine: Sync and Invoice Lifecycle Engine
//!
//! The orchestration tier of StoreSync. Keeps a normalized entity cache
//! current via change subscriptions, drives the barcode scan workflow, and
//! owns the invoice draft and its single-write submission.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Engine Architecture                               │
//! │                                                                         │
//! │   remote document store (RemoteStore seam)                             │
//! │        │ snapshots                    │ writes                          │
//! │        ▼                              ▲                                 │
//! │  ┌──────────────────┐     ┌───────────┴──────────────────┐             │
//! │  │ SubscriptionMgr  │     │ Scan / Billing / Inventory / │             │
//! │  │ (one watch per   │     │ Catalog / Reporting services │             │
//! │  │  collection)     │     └───────────┬──────────────────┘             │
//! │  └────────┬─────────┘                 │ reads                           │
//! │           ▼                           ▼                                 │
//! │       ┌────────────────────────────────────┐                           │
//! │       │            EntityStore             │                           │
//! │       │  (snapshot-replaced, never merged) │                           │
//! │       └────────────────────────────────────┘                           │
//! │                                                                         │
//! │  Writes loop back through the store: no service applies its own        │
//! │  write locally. The watch is the single source of local truth.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - The wired facade a host application holds
//! - [`store`] - Normalized entity cache and its event emitter seam
//! - [`subscription`] - Per-collection watches with liveness tokens
//! - [`barcode`] - Scan/resolve/create-on-miss state machine
//! - [`billing`] - Invoice draft and single-write submission
//! - [`inventory`] / [`catalog`] - Collection write paths
//! - [`reporting`] - Sales summary, forecast, recent invoices, low stock
//! - [`mapping`] - Loose document ⇄ typed entity normalization
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Engine error types

pub mod barcode;
pub mod billing;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod mapping;
pub mod reporting;
pub mod store;
pub mod subscription;

pub use barcode::{ScanState, ScanWorkflow};
pub use billing::{BillingService, SubmittedInvoice};
pub use catalog::CatalogService;
pub use config::{EngineConfig, ReportingSettings};
pub use engine::SyncEngine;
pub use error::{EngineError, EngineResult};
pub use inventory::InventoryService;
pub use reporting::ReportingService;
pub use store::{EntityStore, NoOpEmitter, StoreEventEmitter};
pub use subscription::{SubscriptionManager, WatchStatus};
