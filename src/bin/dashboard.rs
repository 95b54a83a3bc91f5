//! Command-line dashboard: loads one dashboard from the service and prints the
//! selected chart as JSON.
//!
//! Usage: `cargo run --bin dashboard -- <drawing|design-change> [chart]`
//!
//! Reads `DASHBOARD_API_URL` (default `http://localhost:3030`, reads .env).

use anyhow::bail;
use shipdash::client::dashboards::{
    ChartView, DesignChangeChart, DesignChangeDashboard, DrawingChart, DrawingDashboard,
};
use shipdash::client::DashboardClient;
use shipdash::config::ClientConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shipdash=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let dashboard = args.next().unwrap_or_else(|| "drawing".to_string());
    let chart = args.next();

    let config = ClientConfig::from_env();
    let client = DashboardClient::new(&config.api_url)?;
    tracing::info!(api = %client.base_url(), %dashboard, "Loading dashboard");

    let view = match dashboard.as_str() {
        "drawing" => {
            let mut board = DrawingDashboard::new();
            board.load(&client).await;
            if let Some(chart) = chart {
                board.select(chart.parse::<DrawingChart>().map_err(anyhow::Error::msg)?);
            }
            board.view()
        }
        "design-change" => {
            let mut board = DesignChangeDashboard::new();
            board.load(&client).await;
            if let Some(chart) = chart {
                board.select(chart.parse::<DesignChangeChart>().map_err(anyhow::Error::msg)?);
            }
            board.view()
        }
        other => bail!("unknown dashboard: {other} (expected drawing or design-change)"),
    };

    print_view(&view)
}

fn print_view(view: &ChartView) -> anyhow::Result<()> {
    if let Some(placeholder) = view.placeholder() {
        eprintln!("{placeholder}");
    }
    println!("{}", serde_json::to_string_pretty(view)?);
    Ok(())
}
