use anyhow::Context;
use masterlog_core::chart::ChartRenderer;
use masterlog_core::config::ViewerConfig;
use masterlog_core::datalog::LogSegmenter;
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: view_log <log.csv> [column ...] [--config viewer.json] [--fuel 1.0]");
        return Ok(());
    }

    let mut columns = Vec::new();
    let mut config_path = None;
    let mut fuel_factor = 1.0;
    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--config" => config_path = rest.next().cloned(),
            "--fuel" => {
                let value = rest.next().context("--fuel needs a value")?;
                fuel_factor = value.parse().context("--fuel must be a number")?;
            }
            _ => columns.push(arg.clone()),
        }
    }

    let config = match config_path {
        Some(path) => ViewerConfig::from_json_file(Path::new(&path))?,
        None => ViewerConfig::default(),
    };

    let path = &args[1];
    let raw = std::fs::read(path).with_context(|| format!("reading {}", path))?;
    let sessions = LogSegmenter::new(config.segmenter).segment(&raw, fuel_factor)?;
    if sessions.is_empty() {
        println!("No logs found in {}", path);
        return Ok(());
    }

    let renderer = ChartRenderer::new(config.chart)?;
    for session in &sessions {
        println!(
            "{} [{}]: {} rows, columns: {}",
            session.name(),
            session.key(),
            session.row_count(),
            session.display_table().column_names().join(", ")
        );
        if !columns.is_empty() {
            let spec = renderer.render(session.full_table(), &columns, Some("RPM"));
            println!("{}", spec.to_json()?);
        }
    }

    Ok(())
}
