//! # Seasonality Breakdown
//!
//! Revenue summed into weekday, month and hour-of-day buckets over the
//! entire sales history. Raw sums, no averaging: the point is to show the
//! shape of the week/year/day, not normalized rates.
//!
//! Sale timestamps are stored as text; a record whose timestamp does not
//! parse is skipped with a warning and the rest of the report still comes
//! out. One bad row must not blank the chart.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::AnalyticsEngine;
use mercato_db::DbResult;

/// Monday-first weekday labels.
const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Calendar month labels.
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One labeled series, chart-ready.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalitySeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl SeasonalitySeries {
    fn new(labels: Vec<String>, values: Vec<f64>) -> Self {
        SeasonalitySeries { labels, values }
    }
}

/// Revenue by weekday (Monday first), calendar month and hour of day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalityReport {
    pub by_weekday: SeasonalitySeries,
    pub by_month: SeasonalitySeries,
    pub by_hour: SeasonalitySeries,
}

impl AnalyticsEngine {
    /// Seasonality breakdown over all recorded sales.
    ///
    /// With no sales at all the report comes back with every bucket at zero.
    pub async fn seasonality(&self) -> DbResult<SeasonalityReport> {
        let mut by_weekday = [0.0_f64; 7];
        let mut by_month = [0.0_f64; 12];
        let mut by_hour = [0.0_f64; 24];

        for sale in self.db().sales().list(None, None).await? {
            let Some(dt) = sale.sold_at_parsed() else {
                warn!(
                    sale_id = sale.id,
                    sold_at = %sale.sold_at,
                    "Skipping sale with unparseable timestamp"
                );
                continue;
            };

            by_weekday[dt.weekday().num_days_from_monday() as usize] += sale.total;
            by_month[dt.month0() as usize] += sale.total;
            by_hour[dt.hour() as usize] += sale.total;
        }

        Ok(SeasonalityReport {
            by_weekday: SeasonalitySeries::new(
                WEEKDAY_LABELS.iter().map(|l| l.to_string()).collect(),
                by_weekday.to_vec(),
            ),
            by_month: SeasonalitySeries::new(
                MONTH_LABELS.iter().map(|l| l.to_string()).collect(),
                by_month.to_vec(),
            ),
            by_hour: SeasonalitySeries::new(
                (0..24).map(|h| format!("{h}h")).collect(),
                by_hour.to_vec(),
            ),
        })
    }
}
