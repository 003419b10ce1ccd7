//! Integration tests for the analytics engine against an in-memory store.
//!
//! Sales are raw-inserted at explicit timestamps (bypassing the stock
//! decrement of the normal write path) so each test controls exactly what
//! falls inside a lookback window and what the shelf stock reads.

use chrono::{Duration, Utc};

use mercato_analytics::{
    AbcClass, AlertKind, AnalyticsEngine, Priority, Recommendation, Trend, Urgency,
};
use mercato_core::{NewProduct, SALE_TIMESTAMP_FORMAT};
use mercato_db::{Database, DbConfig};

async fn test_engine() -> AnalyticsEngine {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    AnalyticsEngine::new(db)
}

async fn insert_product(
    db: &Database,
    name: &str,
    cost_price: f64,
    sale_price: f64,
    stock: i64,
) -> i64 {
    db.products()
        .insert(&NewProduct {
            name: name.to_string(),
            description: None,
            category_id: None,
            cost_price,
            sale_price,
            stock,
            min_stock: 5,
            image_path: None,
        })
        .await
        .unwrap()
        .id
}

/// Raw sale insert at an explicit timestamp. Does not touch stock.
async fn insert_sale_at(
    db: &Database,
    product_id: i64,
    quantity: i64,
    unit_price: f64,
    sold_at: &str,
) {
    sqlx::query(
        "INSERT INTO sales (product_id, quantity, unit_price, total, sold_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(product_id)
    .bind(quantity)
    .bind(unit_price)
    .bind(quantity as f64 * unit_price)
    .bind(sold_at)
    .execute(db.pool())
    .await
    .unwrap();
}

fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days))
        .format(SALE_TIMESTAMP_FORMAT)
        .to_string()
}

// =============================================================================
// ABC Classification
// =============================================================================

#[tokio::test]
async fn test_abc_classifies_by_revenue_not_quantity() {
    let engine = test_engine().await;
    let db = engine.db();

    // Quantity order (p3 > p2 > p1) is the opposite of revenue order
    let p1 = insert_product(db, "Premium", 50.0, 100.0, 10).await;
    let p2 = insert_product(db, "Mid", 5.0, 10.0, 10).await;
    let p3 = insert_product(db, "Cheap", 0.5, 1.0, 10).await;
    let p4 = insert_product(db, "Unsold", 1.0, 2.0, 10).await;

    insert_sale_at(db, p1, 8, 100.0, &days_ago(3)).await; // revenue 800
    insert_sale_at(db, p2, 15, 10.0, &days_ago(3)).await; // revenue 150
    insert_sale_at(db, p3, 50, 1.0, &days_ago(3)).await; // revenue  50

    let report = engine.abc_classification().await.unwrap();

    // Exact boundary landings: 80% → A, 95% → B, 100% → C
    assert_eq!(report.a.len(), 1);
    assert_eq!(report.a[0].product_id, p1);
    assert_eq!(report.a[0].class, AbcClass::A);
    assert_eq!(report.a[0].cumulative_pct, 80.0);

    assert_eq!(report.b.len(), 1);
    assert_eq!(report.b[0].product_id, p2);
    assert_eq!(report.b[0].cumulative_pct, 95.0);

    assert_eq!(report.c.len(), 1);
    assert_eq!(report.c[0].product_id, p3);

    assert_eq!(report.no_sales.len(), 1);
    assert_eq!(report.no_sales[0].id, p4);

    // Every product accounted for exactly once
    assert_eq!(report.classified_count() + report.no_sales.len(), 4);
}

#[tokio::test]
async fn test_abc_cumulative_share_is_monotonic() {
    let engine = test_engine().await;
    let db = engine.db();

    for i in 0..6 {
        let id = insert_product(db, &format!("P{i}"), 1.0, 2.0, 10).await;
        insert_sale_at(db, id, 1 + i, 2.0 + i as f64, &days_ago(2)).await;
    }

    let report = engine.abc_classification().await.unwrap();
    let all: Vec<_> = report
        .a
        .iter()
        .chain(&report.b)
        .chain(&report.c)
        .collect();

    let mut previous = 0.0;
    for entry in &all {
        assert!(entry.cumulative_pct >= previous);
        assert!(entry.share_pct > 0.0);
        previous = entry.cumulative_pct;
    }
    assert!((previous - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_abc_empty_history_yields_empty_buckets() {
    let engine = test_engine().await;
    // A catalog exists but nothing ever sold
    insert_product(engine.db(), "Lonely", 1.0, 2.0, 3).await;

    let report = engine.abc_classification().await.unwrap();
    assert!(report.a.is_empty());
    assert!(report.b.is_empty());
    assert!(report.c.is_empty());
    assert!(report.no_sales.is_empty());
}

// =============================================================================
// Low Rotation
// =============================================================================

#[tokio::test]
async fn test_rotation_threshold_is_strict() {
    let engine = test_engine().await;
    let db = engine.db();

    // Exactly 10% rotation: NOT flagged
    let at_threshold = insert_product(db, "AtThreshold", 1.0, 2.0, 100).await;
    insert_sale_at(db, at_threshold, 10, 2.0, &days_ago(5)).await;

    // 9% rotation: flagged
    let below = insert_product(db, "Below", 1.0, 2.0, 100).await;
    insert_sale_at(db, below, 9, 2.0, &days_ago(5)).await;

    // Zero stock: cannot be parked
    insert_product(db, "OutOfStock", 1.0, 2.0, 0).await;

    // No sales at all: 0% rotation, highest idle value
    let dead = insert_product(db, "Dead", 10.0, 20.0, 50).await;

    let parked = engine.low_rotation(30).await.unwrap();
    assert_eq!(parked.len(), 2);

    // Ranked by idle capital descending: Dead (500) before Below (100)
    assert_eq!(parked[0].product_id, dead);
    assert_eq!(parked[0].quantity_sold, 0);
    assert_eq!(parked[0].rotation_pct, 0.0);
    assert_eq!(parked[0].idle_value, 500.0);

    assert_eq!(parked[1].product_id, below);
    assert_eq!(parked[1].rotation_pct, 9.0);
}

// =============================================================================
// Replenishment Forecast
// =============================================================================

#[tokio::test]
async fn test_replenishment_urgency_and_ordering() {
    let engine = test_engine().await;
    let db = engine.db();

    // daily 1.0, 5 days of stock → HIGH
    let urgent = insert_product(db, "Urgent", 1.0, 2.0, 5).await;
    insert_sale_at(db, urgent, 90, 2.0, &days_ago(10)).await;

    // daily 1.0, 10 days of stock → MEDIUM, suggested 30
    let medium = insert_product(db, "Medium", 1.0, 2.0, 10).await;
    insert_sale_at(db, medium, 90, 2.0, &days_ago(10)).await;

    // daily 0.1, 1000 days of stock → LOW
    let slow = insert_product(db, "Slow", 1.0, 2.0, 100).await;
    insert_sale_at(db, slow, 9, 2.0, &days_ago(10)).await;

    // Never sold → omitted entirely
    insert_product(db, "Unsold", 1.0, 2.0, 10).await;

    let forecast = engine.replenishment_forecast(90).await.unwrap();
    assert_eq!(forecast.len(), 3);

    // Ascending by days remaining
    assert_eq!(forecast[0].product_id, urgent);
    assert_eq!(forecast[0].urgency, Urgency::High);
    assert_eq!(forecast[1].product_id, medium);
    assert_eq!(forecast[1].urgency, Urgency::Medium);
    assert!((forecast[1].days_remaining - 10.0).abs() < 1e-9);
    assert_eq!(forecast[1].suggested_quantity, 30);
    assert_eq!(forecast[2].product_id, slow);
    assert_eq!(forecast[2].urgency, Urgency::Low);
}

#[tokio::test]
async fn test_replenishment_divides_by_full_window() {
    let engine = test_engine().await;
    let db = engine.db();

    // 45 units in a single day still average over the whole 90-day window.
    // Dividing by days-with-sales would read 45/day; the fixed window reads
    // 0.5/day. The short-window alert rule depends on this.
    let id = insert_product(db, "Bursty", 1.0, 2.0, 30).await;
    insert_sale_at(db, id, 45, 2.0, &days_ago(1)).await;

    let forecast = engine.replenishment_forecast(90).await.unwrap();
    assert_eq!(forecast.len(), 1);
    assert!((forecast[0].daily_average - 0.5).abs() < 1e-9);
    assert!((forecast[0].days_remaining - 60.0).abs() < 1e-9);
}

// =============================================================================
// Price Suggestion
// =============================================================================

#[tokio::test]
async fn test_price_suggestion_unknown_product_is_none() {
    let engine = test_engine().await;
    assert!(engine.price_suggestion(4242).await.unwrap().is_none());
}

#[tokio::test]
async fn test_price_suggestion_without_history() {
    let engine = test_engine().await;
    let id = insert_product(engine.db(), "Fresh", 10.0, 20.0, 5).await;

    let s = engine.price_suggestion(id).await.unwrap().unwrap();
    assert_eq!(s.current_price, 20.0);
    assert_eq!(s.current_margin_pct, 100.0);
    assert!(s.historical_mean_price.is_none());
    assert!(s.recent_sale_count.is_none());

    // Margin ± 5 points on cost 10: 105% → 20.5, 95% → 19.5
    assert!((s.suggestion_increase - 20.5).abs() < 1e-9);
    assert!((s.suggestion_reduce - 19.5).abs() < 1e-9);
    // Competitive target: 30% margin on cost
    assert!((s.suggestion_competitive - 13.0).abs() < 1e-9);
    assert_eq!(s.recommendation, Recommendation::Maintain);
}

#[tokio::test]
async fn test_price_suggestion_with_history_and_slow_sales() {
    let engine = test_engine().await;
    let db = engine.db();
    let id = insert_product(db, "Seasoned", 10.0, 20.0, 50).await;

    db.price_history()
        .append(id, Some(10.0), Some(10.0), Some(16.0), Some(18.0), None)
        .await
        .unwrap();
    db.price_history()
        .append(id, Some(10.0), Some(10.0), Some(18.0), Some(22.0), None)
        .await
        .unwrap();

    // Three transactions in the trailing month: below the "few sales" bar
    for day in 1..=3 {
        insert_sale_at(db, id, 1, 20.0, &days_ago(day)).await;
    }

    let s = engine.price_suggestion(id).await.unwrap().unwrap();
    assert_eq!(s.historical_mean_price, Some(20.0));
    assert_eq!(s.recent_sale_count, Some(3));
    assert_eq!(s.recommendation, Recommendation::Reduce);

    // Price ± 10% of the current price
    assert!((s.suggestion_increase - 22.0).abs() < 1e-9);
    assert!((s.suggestion_reduce - 18.0).abs() < 1e-9);
    // Competitive target drops to 25% margin once history exists
    assert!((s.suggestion_competitive - 12.5).abs() < 1e-9);
}

// =============================================================================
// Sales Forecast
// =============================================================================

#[tokio::test]
async fn test_forecast_empty_window_is_zeroed_no_data() {
    let engine = test_engine().await;
    insert_product(engine.db(), "Idle", 1.0, 2.0, 10).await;

    let f = engine.sales_forecast(30).await.unwrap();
    assert_eq!(f.projected_revenue, 0.0);
    assert_eq!(f.projected_profit, 0.0);
    assert_eq!(f.daily_average_revenue, 0.0);
    assert_eq!(f.confidence_pct, 0.0);
    assert_eq!(f.trend, Trend::NoData);
    assert_eq!(f.days_analyzed, 0);
}

#[tokio::test]
async fn test_forecast_constant_revenue_has_full_confidence() {
    let engine = test_engine().await;
    let db = engine.db();
    let id = insert_product(db, "Steady", 40.0, 100.0, 500).await;

    // 100 revenue on each of four distinct days
    for day in 1..=4 {
        insert_sale_at(db, id, 1, 100.0, &days_ago(day)).await;
    }

    let f = engine.sales_forecast(30).await.unwrap();
    assert_eq!(f.days_analyzed, 4);
    assert!((f.daily_average_revenue - 100.0).abs() < 1e-9);
    assert!((f.projected_revenue - 3000.0).abs() < 1e-9);
    // Profit: (100 - 40) per day × 30
    assert!((f.projected_profit - 1800.0).abs() < 1e-9);
    assert_eq!(f.confidence_pct, 100.0);
    assert_eq!(f.trend, Trend::Stable);
}

#[tokio::test]
async fn test_forecast_detects_growth_chronologically() {
    let engine = test_engine().await;
    let db = engine.db();
    let id = insert_product(db, "Riser", 1.0, 100.0, 500).await;

    // Older half at 100/day, recent half at 200/day
    insert_sale_at(db, id, 1, 100.0, &days_ago(4)).await;
    insert_sale_at(db, id, 1, 100.0, &days_ago(3)).await;
    insert_sale_at(db, id, 2, 100.0, &days_ago(2)).await;
    insert_sale_at(db, id, 2, 100.0, &days_ago(1)).await;

    let f = engine.sales_forecast(30).await.unwrap();
    assert_eq!(f.trend, Trend::Growth);
    // Confidence stays within bounds even with real variance
    assert!(f.confidence_pct >= 0.0 && f.confidence_pct <= 100.0);
}

// =============================================================================
// Alerts
// =============================================================================

#[tokio::test]
async fn test_alert_rules_and_priority_ordering() {
    let engine = test_engine().await;
    let db = engine.db();

    // Sold 30 vs stock 10 → high demand (30 > 20)
    let hot = insert_product(db, "Hot", 10.0, 20.0, 10).await;
    for day in 1..=3 {
        insert_sale_at(db, hot, 10, 20.0, &days_ago(day)).await;
    }

    // No sales, stock 50 → idle
    let idle = insert_product(db, "Idle", 10.0, 20.0, 50).await;

    // No sales but stock 5: below the idle guard, no alert at all
    let small = insert_product(db, "Small", 10.0, 20.0, 5).await;

    // Margin 10% on sales velocity that trips no other rule
    let thin = insert_product(db, "Thin", 10.0, 11.0, 8).await;
    insert_sale_at(db, thin, 3, 11.0, &days_ago(2)).await;

    // Zero cost reads as 0% margin and must trip the low-margin rule
    let free = insert_product(db, "Free", 0.0, 5.0, 2).await;
    insert_sale_at(db, free, 1, 5.0, &days_ago(2)).await;

    let alerts = engine.alerts().await.unwrap();

    // Most urgent first, and the order is monotone in priority rank
    for window in alerts.windows(2) {
        assert!(window[0].priority.rank() <= window[1].priority.rank());
    }

    assert!(alerts
        .iter()
        .any(|a| a.kind == AlertKind::HighDemand && a.product_id == hot));
    assert!(alerts
        .iter()
        .any(|a| a.kind == AlertKind::IdleProduct && a.product_id == idle));
    assert!(alerts
        .iter()
        .any(|a| a.kind == AlertKind::LowMargin && a.product_id == thin));
    assert!(alerts
        .iter()
        .any(|a| a.kind == AlertKind::LowMargin && a.product_id == free));
    assert!(!alerts.iter().any(|a| a.product_id == small));

    // Hot sells 1/day against stock 10 → 10 days remaining, not a stock-out
    assert!(!alerts.iter().any(|a| a.kind == AlertKind::StockRunningOut));
}

#[tokio::test]
async fn test_stock_running_out_alert_uses_short_window() {
    let engine = test_engine().await;
    let db = engine.db();

    // 30 units over 30 days, 2 left → runs out in 2 days
    let runout = insert_product(db, "Runout", 1.0, 2.0, 2).await;
    insert_sale_at(db, runout, 15, 2.0, &days_ago(20)).await;
    insert_sale_at(db, runout, 15, 2.0, &days_ago(5)).await;

    let alerts = engine.alerts().await.unwrap();
    let stockout: Vec<_> = alerts
        .iter()
        .filter(|a| a.kind == AlertKind::StockRunningOut)
        .collect();
    assert_eq!(stockout.len(), 1);
    assert_eq!(stockout[0].product_id, runout);
    assert_eq!(stockout[0].priority, Priority::High);

    // The same velocity also reads as high demand (30 > 2 × 2)
    assert!(alerts
        .iter()
        .any(|a| a.kind == AlertKind::HighDemand && a.product_id == runout));
}

// =============================================================================
// Seasonality
// =============================================================================

#[tokio::test]
async fn test_seasonality_buckets_and_malformed_timestamp_skip() {
    let engine = test_engine().await;
    let db = engine.db();
    let id = insert_product(db, "Clock", 1.0, 10.0, 100).await;

    // Monday 2026-03-02 15:30 → 40, Tuesday 2026-03-03 09:00 → 10
    insert_sale_at(db, id, 4, 10.0, "2026-03-02 15:30:00").await;
    insert_sale_at(db, id, 1, 10.0, "2026-03-03 09:00:00").await;
    // One corrupt row: skipped, never fatal
    insert_sale_at(db, id, 9, 10.0, "not-a-timestamp").await;

    let report = engine.seasonality().await.unwrap();

    assert_eq!(report.by_weekday.labels[0], "Mon");
    assert_eq!(report.by_weekday.values[0], 40.0);
    assert_eq!(report.by_weekday.values[1], 10.0);

    // March
    assert_eq!(report.by_month.values[2], 50.0);

    assert_eq!(report.by_hour.labels[15], "15h");
    assert_eq!(report.by_hour.values[15], 40.0);
    assert_eq!(report.by_hour.values[9], 10.0);

    // The corrupt row's 90 revenue appears in no bucket
    let weekday_total: f64 = report.by_weekday.values.iter().sum();
    assert_eq!(weekday_total, 50.0);
}

#[tokio::test]
async fn test_seasonality_empty_history_is_all_zero() {
    let engine = test_engine().await;
    let report = engine.seasonality().await.unwrap();
    assert_eq!(report.by_weekday.values.len(), 7);
    assert_eq!(report.by_month.values.len(), 12);
    assert_eq!(report.by_hour.values.len(), 24);
    assert!(report.by_hour.values.iter().all(|&v| v == 0.0));
}

// =============================================================================
// Serialization
// =============================================================================

#[tokio::test]
async fn test_reports_serialize_to_json() {
    let engine = test_engine().await;
    let id = insert_product(engine.db(), "Widget", 1.0, 2.0, 10).await;
    insert_sale_at(engine.db(), id, 1, 2.0, &days_ago(1)).await;

    let abc = engine.abc_classification().await.unwrap();
    let forecast = engine.sales_forecast(30).await.unwrap();
    let alerts = engine.alerts().await.unwrap();

    // Report structs cross the presentation boundary as plain data
    assert!(serde_json::to_string(&abc).is_ok());
    assert!(serde_json::to_string(&forecast).is_ok());
    assert!(serde_json::to_string(&alerts).is_ok());
}
