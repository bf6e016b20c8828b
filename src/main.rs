use anyhow::Context;
use chrono::Duration;
use tracing::info;

use supplier_performance::analytics::DateWindow;
use supplier_performance::features::PoRequest;
use supplier_performance::models::{Category, Region};
use supplier_performance::{config, TrainedPipeline};

fn main() -> anyhow::Result<()> {
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(&cfg.log_level);

    let window = DateWindow {
        start: cfg.generation.window_start,
        end: cfg.generation.window_end,
    };

    let pipeline = TrainedPipeline::train(cfg).context("pipeline training failed")?;
    let summary = pipeline.summary();
    info!(
        suppliers = summary.suppliers,
        purchase_orders = summary.purchase_orders,
        rmse = summary.regression.rmse,
        mae = summary.regression.mae,
        auc = summary.classification.auc,
        accuracy = summary.classification.accuracy,
        "training complete"
    );

    let otif = pipeline.otif();
    if let Some(rate) = otif.overall(window) {
        info!(otif = format!("{:.1}%", rate * 100.0), "overall OTIF");
    }
    use strum::IntoEnumIterator;
    for region in Region::iter() {
        if let Some(rate) = otif.for_region(region, window) {
            info!(region = %region, otif = format!("{:.1}%", rate * 100.0), "regional OTIF");
        }
    }
    for category in Category::iter() {
        if let Some(rate) = otif.for_category(category, window) {
            info!(category = %category, otif = format!("{:.1}%", rate * 100.0), "category OTIF");
        }
    }

    // Sample prediction for the first supplier in the population.
    if let Some(supplier) = pipeline.dataset().suppliers.first() {
        let order_date = window.end;
        let request = PoRequest {
            supplier_id: supplier.id.clone(),
            order_date,
            expected_delivery_date: order_date + Duration::days(14),
            quantity_ordered: 500,
        };
        let prediction = pipeline.predict(&request)?;
        info!(
            supplier = %supplier.id,
            predicted_lead_time_days = format!("{:.1}", prediction.predicted_lead_time_days),
            late_probability = format!("{:.1}%", prediction.predicted_late_probability * 100.0),
            risk_tier = %prediction.risk_tier,
            "sample prediction"
        );
        info!("{}", prediction.recommendation);
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to render summary")?
    );
    Ok(())
}
