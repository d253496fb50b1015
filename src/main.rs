use chrono::Local;
use habit_tracker::{FileBackend, HabitTracker, ReportConfig, YearMonth};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = ReportConfig::from_env()?;
    let backend = FileBackend::new(&config.data_dir);
    let tracker = HabitTracker::open(backend, config.tracker.clone())?;

    let today = Local::now().date_naive();
    let month = config.month.unwrap_or_else(|| YearMonth::of(today));
    let report = tracker.report_at(month, today);

    info!(
        month = %month,
        dir = %config.data_dir.display(),
        percent = report.stats.percent,
        "built habit report"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
