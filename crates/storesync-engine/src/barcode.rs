//! # Barcode Scan Workflow
//!
//! State machine driving the scan screen: capture, decode, catalog lookup,
//! and the create-on-miss path.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Scan Workflow States                               │
//! │                                                                         │
//! │   Idle ──begin_capture──► Capturing ──deliver_decode──► Decoded        │
//! │    ▲                          │                            │            │
//! │    │                     cancel_capture                 resolve        │
//! │    │                          │                            ▼            │
//! │    │                          └────────► Idle          Resolving       │
//! │    │                                                   │        │      │
//! │    │                                              catalog hit  miss    │
//! │    │                                                   ▼        ▼      │
//! │    ├────────────dismiss──────────────────────────── Found   NotFound   │
//! │    │                                                            │      │
//! │    └──────────────create_missing (seeds inventory) ─────────────┘      │
//! │                                                                         │
//! │  DECODE LATCH                                                          │
//! │  ────────────                                                          │
//! │  Camera decoders fire repeatedly for one physical code. Only the       │
//! │  FIRST decode (in Capturing) advances the machine; every later one     │
//! │  is dropped until the workflow returns to Capturing. The prompt        │
//! │  states (Found/NotFound) are therefore re-entry proof by               │
//! │  construction, not by a flag.                                          │
//! │                                                                         │
//! │  RESOLUTION FAILURE                                                    │
//! │  ──────────────────                                                    │
//! │  A remote error during lookup returns the machine to Decoded so the    │
//! │  same barcode can be resolved again without rescanning.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use storesync_core::money::Money;
use storesync_core::types::{CatalogProduct, Collection, InventoryItem};
use storesync_core::validation::{validate_barcode, validate_required};
use storesync_remote::RemoteStore;

use crate::error::{EngineError, EngineResult};
use crate::mapping::{catalog_product_from_doc, inventory_to_fields};

// =============================================================================
// Scan State
// =============================================================================

/// The scan screen's current state. Every UI decision (camera on/off,
/// prompt visible, spinner) is a pure function of this value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScanState {
    /// Nothing in progress; camera off.
    #[default]
    Idle,

    /// Camera running, waiting for the first decode.
    Capturing,

    /// A barcode was decoded and latched; lookup not yet started.
    Decoded { barcode: String },

    /// Catalog lookup in flight.
    Resolving { barcode: String },

    /// Lookup hit: the product is ready to prefill an invoice line.
    Found { product: CatalogProduct },

    /// Lookup miss: the operator is prompted to create the item.
    NotFound { barcode: String },
}

impl ScanState {
    /// Whether the camera should be running.
    pub fn is_capturing(&self) -> bool {
        matches!(self, ScanState::Capturing)
    }

    /// Whether a blocking prompt (found/not-found) is on screen.
    pub fn is_prompting(&self) -> bool {
        matches!(self, ScanState::Found { .. } | ScanState::NotFound { .. })
    }
}

// =============================================================================
// Scan Workflow
// =============================================================================

/// Drives one scan screen. All transitions funnel through the shared state
/// so concurrent decode callbacks cannot race past the latch.
pub struct ScanWorkflow {
    remote: Arc<dyn RemoteStore>,
    state: Mutex<ScanState>,
}

impl ScanWorkflow {
    /// Creates a workflow in `Idle`.
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        ScanWorkflow {
            remote,
            state: Mutex::new(ScanState::Idle),
        }
    }

    /// Current state (cloned).
    pub fn state(&self) -> ScanState {
        self.state.lock().expect("scan state poisoned").clone()
    }

    /// Turns the camera on. Only valid from `Idle`.
    pub fn begin_capture(&self) -> EngineResult<()> {
        let mut state = self.state.lock().expect("scan state poisoned");
        match *state {
            ScanState::Idle => {
                *state = ScanState::Capturing;
                debug!("Scan capture started");
                Ok(())
            }
            ref other => Err(EngineError::InvalidState(format!(
                "cannot begin capture from {:?}",
                other
            ))),
        }
    }

    /// Abandons an in-progress capture or latched decode.
    pub fn cancel_capture(&self) {
        let mut state = self.state.lock().expect("scan state poisoned");
        if matches!(
            *state,
            ScanState::Capturing | ScanState::Decoded { .. }
        ) {
            debug!("Scan capture cancelled");
            *state = ScanState::Idle;
        }
    }

    /// Delivers one decoder callback.
    ///
    /// Returns `true` if the decode was latched. Decodes arriving in any
    /// state but `Capturing` (repeat fires, prompt on screen, lookup in
    /// flight) are dropped.
    pub fn deliver_decode(&self, barcode: &str) -> bool {
        let mut state = self.state.lock().expect("scan state poisoned");
        match *state {
            ScanState::Capturing => {
                if validate_barcode(barcode).is_err() {
                    warn!(barcode, "Dropping undecodable barcode payload");
                    return false;
                }
                debug!(barcode, "Barcode latched");
                *state = ScanState::Decoded {
                    barcode: barcode.trim().to_string(),
                };
                true
            }
            _ => {
                debug!(barcode, "Decode dropped (not capturing)");
                false
            }
        }
    }

    /// Resolves the latched barcode against the catalog.
    ///
    /// `Decoded → Resolving → Found | NotFound`. Deactivated products are
    /// ignored, so their barcodes take the NotFound path. A remote failure
    /// returns the machine to `Decoded` and surfaces a retryable error. If
    /// the workflow was reset while the lookup was in flight, the result
    /// is discarded.
    pub async fn resolve(&self) -> EngineResult<ScanState> {
        let barcode = {
            let mut state = self.state.lock().expect("scan state poisoned");
            match state.clone() {
                ScanState::Decoded { barcode } => {
                    *state = ScanState::Resolving {
                        barcode: barcode.clone(),
                    };
                    barcode
                }
                other => {
                    return Err(EngineError::InvalidState(format!(
                        "cannot resolve from {:?}",
                        other
                    )))
                }
            }
        };

        let lookup = self
            .remote
            .query_eq(Collection::Products, "barcode", &barcode)
            .await;

        let mut state = self.state.lock().expect("scan state poisoned");

        // The workflow may have been reset mid-flight; only a Resolving
        // state for the same barcode may consume this result.
        match *state {
            ScanState::Resolving { barcode: ref b } if *b == barcode => {}
            _ => {
                debug!(barcode, "Discarding stale lookup result");
                return Ok(state.clone());
            }
        }

        match lookup {
            Ok(docs) => {
                // First ACTIVE match in server order wins; deactivated
                // products must scan like they never existed.
                let mut products = docs
                    .iter()
                    .filter_map(catalog_product_from_doc)
                    .filter(|p| p.is_active);
                match products.next() {
                    Some(product) => {
                        if products.next().is_some() {
                            warn!(barcode, "Multiple catalog matches, taking first");
                        }
                        info!(barcode, product = %product.name, "Barcode resolved");
                        *state = ScanState::Found { product };
                    }
                    None => {
                        info!(barcode, "Barcode not in catalog");
                        *state = ScanState::NotFound { barcode };
                    }
                }
                Ok(state.clone())
            }
            Err(e) => {
                warn!(barcode, error = %e, "Barcode lookup failed, returning to Decoded");
                *state = ScanState::Decoded { barcode };
                Err(e.into())
            }
        }
    }

    /// Creates a seed inventory item for a barcode the catalog does not
    /// know. Only valid from `NotFound`.
    ///
    /// On success the workflow returns to `Idle` and the new document key
    /// is returned; the inventory watch delivers the item like any other
    /// remote change. On failure the prompt stays up so the operator can
    /// retry.
    pub async fn create_missing(&self, name: &str, price: Money) -> EngineResult<String> {
        let barcode = {
            let state = self.state.lock().expect("scan state poisoned");
            match *state {
                ScanState::NotFound { ref barcode } => barcode.clone(),
                ref other => {
                    return Err(EngineError::InvalidState(format!(
                        "cannot create item from {:?}",
                        other
                    )))
                }
            }
        };

        validate_required("product name", name)?;

        let seed = InventoryItem {
            id: String::new(), // key assigned by the store
            name: name.trim().to_string(),
            quantity: 0,
            price,
            expiration_date: None,
            category: "Uncategorized".to_string(),
            barcode: Some(barcode.clone()),
        };

        let id = self
            .remote
            .add(Collection::Inventory, inventory_to_fields(&seed))
            .await?;

        info!(barcode, id = %id, "Seeded inventory item for unknown barcode");
        *self.state.lock().expect("scan state poisoned") = ScanState::Idle;
        Ok(id)
    }

    /// Dismisses the found/not-found prompt, returning to `Idle`.
    pub fn dismiss(&self) {
        let mut state = self.state.lock().expect("scan state poisoned");
        if state.is_prompting() {
            debug!("Scan prompt dismissed");
            *state = ScanState::Idle;
        }
    }

    /// Forces the workflow back to `Idle` from any state.
    pub fn reset(&self) {
        *self.state.lock().expect("scan state poisoned") = ScanState::Idle;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storesync_remote::{Document, MemoryStore};

    fn catalog_doc(barcode: &str, name: &str) -> Document {
        Document::new(format!("p-{barcode}"))
            .set("barcode", barcode)
            .set("name", name)
            .set("price", 25000)
            .set("category", "Groceries")
    }

    async fn seeded_workflow() -> (Arc<MemoryStore>, ScanWorkflow) {
        let remote = Arc::new(MemoryStore::new());
        remote.seed(
            Collection::Products,
            vec![catalog_doc("111", "Basmati Rice")],
        );
        let workflow = ScanWorkflow::new(remote.clone());
        (remote, workflow)
    }

    #[tokio::test]
    async fn test_happy_path_found() {
        let (_remote, workflow) = seeded_workflow().await;

        workflow.begin_capture().unwrap();
        assert!(workflow.deliver_decode("111"));

        let state = workflow.resolve().await.unwrap();
        match state {
            ScanState::Found { product } => assert_eq!(product.name, "Basmati Rice"),
            other => panic!("expected Found, got {:?}", other),
        }

        workflow.dismiss();
        assert_eq!(workflow.state(), ScanState::Idle);
    }

    #[tokio::test]
    async fn test_unknown_barcode_leaves_store_untouched() {
        let (remote, workflow) = seeded_workflow().await;

        workflow.begin_capture().unwrap();
        assert!(workflow.deliver_decode("8901030875021"));

        let state = workflow.resolve().await.unwrap();
        assert_eq!(
            state,
            ScanState::NotFound {
                barcode: "8901030875021".into()
            }
        );

        // Resolution alone writes nothing
        assert_eq!(remote.write_count(Collection::Products), 0);
        assert_eq!(remote.write_count(Collection::Inventory), 0);
    }

    #[tokio::test]
    async fn test_deactivated_product_scans_as_not_found() {
        let remote = Arc::new(MemoryStore::new());
        remote.seed(
            Collection::Products,
            vec![catalog_doc("111", "Basmati Rice").set("isActive", false)],
        );
        let workflow = ScanWorkflow::new(remote.clone());

        workflow.begin_capture().unwrap();
        workflow.deliver_decode("111");

        // A soft-deleted product must scan like it never existed
        let state = workflow.resolve().await.unwrap();
        assert_eq!(
            state,
            ScanState::NotFound {
                barcode: "111".into()
            }
        );
    }

    #[tokio::test]
    async fn test_decode_latch_drops_repeat_fires() {
        let (_remote, workflow) = seeded_workflow().await;

        workflow.begin_capture().unwrap();
        assert!(workflow.deliver_decode("111"));
        // Repeats of the same physical code are dropped
        assert!(!workflow.deliver_decode("111"));
        assert!(!workflow.deliver_decode("222"));

        assert_eq!(
            workflow.state(),
            ScanState::Decoded {
                barcode: "111".into()
            }
        );
    }

    #[tokio::test]
    async fn test_decode_dropped_while_prompting() {
        let (_remote, workflow) = seeded_workflow().await;

        workflow.begin_capture().unwrap();
        workflow.deliver_decode("111");
        workflow.resolve().await.unwrap();
        assert!(workflow.state().is_prompting());

        // Decoder still firing against the open prompt
        assert!(!workflow.deliver_decode("111"));
        assert!(workflow.state().is_prompting());
    }

    #[tokio::test]
    async fn test_lookup_failure_returns_to_decoded() {
        let (remote, workflow) = seeded_workflow().await;

        workflow.begin_capture().unwrap();
        workflow.deliver_decode("111");

        remote.set_offline(true);
        let err = workflow.resolve().await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(
            workflow.state(),
            ScanState::Decoded {
                barcode: "111".into()
            }
        );

        // Same latched barcode resolves once connectivity returns
        remote.set_offline(false);
        let state = workflow.resolve().await.unwrap();
        assert!(matches!(state, ScanState::Found { .. }));
    }

    #[tokio::test]
    async fn test_create_missing_seeds_inventory() {
        let (remote, workflow) = seeded_workflow().await;

        workflow.begin_capture().unwrap();
        workflow.deliver_decode("999");
        workflow.resolve().await.unwrap();

        let id = workflow
            .create_missing("New Snack", Money::from_rupees(20))
            .await
            .unwrap();

        assert_eq!(workflow.state(), ScanState::Idle);
        assert_eq!(remote.write_count(Collection::Inventory), 1);

        let docs = remote.list(Collection::Inventory).await.unwrap();
        assert_eq!(docs[0].id, id);
        assert_eq!(docs[0].str_field("barcode"), Some("999"));
        assert_eq!(docs[0].raw("quantity"), Some(&json!(0)));
    }

    #[tokio::test]
    async fn test_begin_capture_requires_idle() {
        let (_remote, workflow) = seeded_workflow().await;
        workflow.begin_capture().unwrap();
        assert!(workflow.begin_capture().is_err());

        workflow.reset();
        assert!(workflow.begin_capture().is_ok());
    }
}
