//! # mercato-analytics: Analytics & Reporting Engine
//!
//! Derived intelligence over the Mercato store. Every report here is a pure
//! function of persisted state plus parameters; the engine performs **no
//! writes** and holds no caches.
//!
//! ## Report Families
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        AnalyticsEngine                                  │
//! │                                                                         │
//! │   ┌─────────────┐  ┌─────────────┐  ┌───────────────┐                  │
//! │   │     abc     │  │  rotation   │  │ replenishment │                  │
//! │   │ A/B/C bands │  │ idle stock  │  │ days-to-empty │                  │
//! │   │ by revenue  │  │ ranking     │  │ + urgency     │                  │
//! │   └─────────────┘  └─────────────┘  └───────────────┘                  │
//! │                                                                         │
//! │   ┌─────────────┐  ┌─────────────┐  ┌───────────────┐  ┌────────────┐ │
//! │   │   pricing   │  │  forecast   │  │    alerts     │  │seasonality │ │
//! │   │ suggestions │  │ projection  │  │  rule-based   │  │ weekday /  │ │
//! │   │ per product │  │ + confidence│  │  advisories   │  │ month/hour │ │
//! │   └─────────────┘  └─────────────┘  └───────────────┘  └────────────┘ │
//! │                                                                         │
//! │             all read through mercato-db repositories                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Model
//! Engine methods return `Result<_, DbError>`: only the underlying reads can
//! fail. Absent entities yield `Ok(None)`, empty histories yield zeroed
//! reports, and malformed per-record data (a bad sale timestamp) is skipped
//! with a `warn!` log instead of aborting the whole report.
//!
//! ## Usage
//! ```rust,ignore
//! use mercato_analytics::AnalyticsEngine;
//! use mercato_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("mercato.db")).await?;
//! let engine = AnalyticsEngine::new(db);
//!
//! let abc = engine.abc_classification().await?;
//! let alerts = engine.alerts().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod abc;
pub mod alerts;
pub mod engine;
pub mod forecast;
pub mod pricing;
pub mod replenishment;
pub mod rotation;
pub mod seasonality;

// =============================================================================
// Re-exports
// =============================================================================

pub use abc::{AbcClass, AbcEntry, AbcReport};
pub use alerts::{Alert, AlertKind, Priority};
pub use engine::AnalyticsEngine;
pub use forecast::{SalesForecast, Trend};
pub use pricing::{PriceSuggestion, Recommendation};
pub use replenishment::{ReplenishmentEntry, Urgency};
pub use rotation::RotationEntry;
pub use seasonality::{SeasonalityReport, SeasonalitySeries};
