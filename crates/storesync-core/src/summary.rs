//! # Sales Summary & Forecast
//!
//! Pure aggregation math over bulk-read invoice records.
//!
//! ## Computation Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sales Summary Pipeline                               │
//! │                                                                         │
//! │  Bulk read of `invoices` ──► [InvoiceRecord] ──► compute_summary(now)  │
//! │                                                        │                │
//! │              ┌─────────────────────────────────────────┤                │
//! │              ▼                     ▼                   ▼                │
//! │        total (Σ all)         count (all)      last 7 days (Σ where     │
//! │                                               now − created < 7d,      │
//! │                                               STRICT boundary)          │
//! │                                                                         │
//! │  forecast_next_30_days = (total / count) × 30                          │
//! │                                                                         │
//! │  This is a naive mean-daily-rate projection, not a time-series model.  │
//! │  Intentionally simple.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recomputed on demand/refresh; the invoices collection is not watched
//! live.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::InventoryItem;

/// Width of the trailing sales window.
pub const TRAILING_WINDOW_DAYS: i64 = 7;

/// Projection horizon for the naive forecast.
pub const FORECAST_HORIZON_DAYS: i64 = 30;

// =============================================================================
// Invoice Record
// =============================================================================

/// The slice of an invoice document the aggregation needs.
///
/// `created_at` is optional because historic documents written by older
/// clients may lack a parseable timestamp; such invoices still count
/// toward the overall total but can never fall inside the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceRecord {
    pub invoice_no: String,
    pub customer_mobile: String,
    pub total: Money,
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Sales Summary
// =============================================================================

/// Aggregated sales figures for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    /// Sum of all invoice totals.
    pub total: Money,
    /// Number of invoices seen.
    pub count: u32,
    /// Sum of totals for invoices strictly inside the trailing 7-day window.
    pub last_seven_days: Money,
}

impl SalesSummary {
    /// Naive 30-day projection: mean invoice value × 30.
    ///
    /// Returns zero when no invoices exist (no rate to project).
    pub fn forecast_next_30_days(&self) -> Money {
        if self.count == 0 {
            return Money::zero();
        }
        self.total
            .divide_by(self.count as i64)
            .multiply_quantity(FORECAST_HORIZON_DAYS as u32)
    }
}

/// Single pass over bulk-read invoice records.
///
/// ## Window Boundary
/// Membership test is `now − created_at < 7 days` with STRICT inequality:
/// an invoice created at exactly `now − 7 days` (to the millisecond) is
/// excluded.
pub fn compute_summary(invoices: &[InvoiceRecord], now: DateTime<Utc>) -> SalesSummary {
    let window = Duration::days(TRAILING_WINDOW_DAYS);

    let mut total = Money::zero();
    let mut count = 0u32;
    let mut last_seven_days = Money::zero();

    for invoice in invoices {
        total += invoice.total;
        count += 1;

        if let Some(created) = invoice.created_at {
            if now - created < window {
                last_seven_days += invoice.total;
            }
        }
    }

    SalesSummary {
        total,
        count,
        last_seven_days,
    }
}

// =============================================================================
// Low Stock
// =============================================================================

/// Items under the low-stock threshold, for the dashboard card.
pub fn low_stock<'a>(items: &'a [InventoryItem]) -> Vec<&'a InventoryItem> {
    items.iter().filter(|i| i.is_low_stock()).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(total_paise: i64, created_at: Option<DateTime<Utc>>) -> InvoiceRecord {
        InvoiceRecord {
            invoice_no: "INV1-aaaa".into(),
            customer_mobile: "9999999999".into(),
            total: Money::from_paise(total_paise),
            created_at,
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = compute_summary(&[], Utc::now());
        assert_eq!(summary.total, Money::zero());
        assert_eq!(summary.count, 0);
        assert_eq!(summary.last_seven_days, Money::zero());
        assert_eq!(summary.forecast_next_30_days(), Money::zero());
    }

    #[test]
    fn test_seven_recent_three_old() {
        let now = Utc::now();
        let mut invoices = Vec::new();

        // 7 invoices of ₹100 inside the window
        for d in 0..7 {
            invoices.push(record(10000, Some(now - Duration::days(d))));
        }
        // 3 invoices of ₹100 outside it
        for d in 10..13 {
            invoices.push(record(10000, Some(now - Duration::days(d))));
        }

        let summary = compute_summary(&invoices, now);
        assert_eq!(summary.total, Money::from_rupees(1000));
        assert_eq!(summary.count, 10);
        assert_eq!(summary.last_seven_days, Money::from_rupees(700));
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let now = Utc::now();
        let exactly_boundary = now - Duration::days(TRAILING_WINDOW_DAYS);
        let just_inside = exactly_boundary + Duration::milliseconds(1);

        let summary = compute_summary(
            &[
                record(10000, Some(exactly_boundary)),
                record(20000, Some(just_inside)),
            ],
            now,
        );

        // Both count toward total, only the strictly-inside one toward last7
        assert_eq!(summary.total, Money::from_paise(30000));
        assert_eq!(summary.last_seven_days, Money::from_paise(20000));
    }

    #[test]
    fn test_missing_timestamp_counts_in_total_only() {
        let now = Utc::now();
        let summary = compute_summary(&[record(10000, None)], now);

        assert_eq!(summary.total, Money::from_paise(10000));
        assert_eq!(summary.count, 1);
        assert_eq!(summary.last_seven_days, Money::zero());
    }

    #[test]
    fn test_forecast_is_mean_times_thirty() {
        let now = Utc::now();
        let invoices = vec![
            record(10000, Some(now)),
            record(20000, Some(now)),
        ];
        let summary = compute_summary(&invoices, now);

        // mean = ₹150, × 30 = ₹4500
        assert_eq!(summary.forecast_next_30_days(), Money::from_rupees(4500));
    }

    #[test]
    fn test_low_stock_filter() {
        let items = vec![
            InventoryItem {
                id: "a".into(),
                name: "Rice".into(),
                quantity: 2,
                price: Money::from_rupees(50),
                expiration_date: None,
                category: "Groceries".into(),
                barcode: None,
            },
            InventoryItem {
                id: "b".into(),
                name: "Soap".into(),
                quantity: 50,
                price: Money::from_rupees(25),
                expiration_date: None,
                category: "Household".into(),
                barcode: None,
            },
        ];

        let low = low_stock(&items);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Rice");
    }
}
