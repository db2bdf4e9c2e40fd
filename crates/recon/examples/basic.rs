//! Basic example demonstrating reconstruction anomaly detection
//!
//! Run with: cargo run --example basic -p recon

use chrono::{Days, NaiveDate};
use recon::{AnomalyPipeline, MovingAverageReconstructor, PipelineConfig, Reconstructor, Series};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== recon Basic Example ===\n");

    // Two sectors of daily returns; Energy turns volatile near the end.
    let start = NaiveDate::from_ymd_opt(2010, 1, 4).ok_or("bad start date")?;
    let len = 600;
    let dates = (0..len as u64).map(|i| start + Days::new(i)).collect();
    let rows = (0..len)
        .map(|t| {
            let x = t as f64;
            let burst = if (520..560).contains(&t) { 15.0 } else { 1.0 };
            vec![(x * 1.7).sin() * burst, (x * 0.9).cos() * 0.5]
        })
        .collect();
    let series = Series::new(vec!["Energy".into(), "Utilities".into()], dates, rows)?;
    println!("Series: {} rows x {} sectors", series.len(), series.sector_count());

    let config = PipelineConfig::builder()
        .sequence_length(20)
        .quantile(0.95)
        .no_exclusion()
        .build()?;
    let model = MovingAverageReconstructor::new(5)?;
    println!("Model: {} (span {})\n", model.name(), model.span());

    let report = AnomalyPipeline::new(model, config)?.run(&series)?;

    println!("Thresholds (q={}):", report.thresholds.quantile());
    for (sector, value) in report.thresholds.iter() {
        println!("   {:<10} {:.4}", sector, value);
    }

    for dataset in [&report.in_sample, &report.out_of_sample] {
        println!("\n{}:", dataset.label);
        println!("   samples: {}", dataset.sample_count());
        println!("   flagged samples: {}", dataset.anomalous_samples());
        for sector in dataset.points.to_sparse() {
            println!("   {:<10} {} point anomalies", sector.sector, sector.indices.len());
            if let (Some(first), Some(last)) = (sector.dates.first(), sector.dates.last()) {
                println!("              {} .. {}", first, last);
            }
        }
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
