//! # Validation Module
//!
//! Input validation utilities for StoreSync.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine boundary (Rust)                                       │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │                                                                         │
//! │  A validation failure blocks the operation, surfaces to the user,      │
//! │  and mutates NO state — zero remote writes happen on failure.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required free-text field (name, category, brand, ...).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use storesync_core::validation::validate_required;
///
/// assert!(validate_required("name", "Basmati Rice").is_ok());
/// assert!(validate_required("name", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a customer mobile number.
///
/// ## Rules
/// - Must not be empty
/// - Must contain at least 10 digits once separators are stripped
///
/// The outbound messaging collaborator addresses the customer by this
/// number, so a digit-free value would produce an undeliverable payload.
pub fn validate_mobile(mobile: &str) -> ValidationResult<()> {
    let mobile = mobile.trim();

    if mobile.is_empty() {
        return Err(ValidationError::Required {
            field: "customer mobile".to_string(),
        });
    }

    let digits = mobile.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < 10 {
        return Err(ValidationError::InvalidFormat {
            field: "customer mobile".to_string(),
            reason: "must contain at least 10 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a barcode string.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 64 characters (longest supported symbology payload)
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if barcode.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 64,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// The upper bound (MAX_LINE_QUANTITY) is a draft-assembly rule and lives
/// in `InvoiceDraft::add_line`.
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be strictly positive; a zero or negative price on a line item is
///   always a data-entry error at this counter.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Attribute Validators
// =============================================================================

/// Validates catalog attribute pairs: both sides filled or both empty.
///
/// Mirrors the catalog form rule — a key without a value (or the reverse)
/// is rejected before the remote write; fully empty rows are dropped by
/// the caller.
pub fn validate_attribute_pair(key: &str, value: &str) -> ValidationResult<()> {
    let key_filled = !key.trim().is_empty();
    let value_filled = !value.trim().is_empty();

    if key_filled != value_filled {
        return Err(ValidationError::UnpairedAttribute {
            key: key.trim().to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
