mod bootstrap;

use std::io;

use anyhow::{Context, Result};
use macbar_core::settings::Settings;
use macbar_data::aggregator::{AggregateOptions, HourlyFill};
use macbar_data::reader::month_files;
use macbar_runtime::cache::load_cached;
use macbar_runtime::session::DashboardSession;
use macbar_ui::app::App;
use macbar_ui::render::{JsonRenderer, Renderer, TextRenderer};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    let app_dir = bootstrap::ensure_directories()?;
    // The terminal dashboard owns the screen, so it logs to a file by default.
    let log_file = settings.log_file.clone().or_else(|| {
        (settings.output == "tui").then(|| bootstrap::default_log_file(&app_dir))
    });
    bootstrap::setup_logging(&settings.log_level, log_file.as_ref())?;

    tracing::info!("Mac Bar dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Year: {}, Output: {}, Theme: {}",
        settings.year,
        settings.output,
        settings.theme
    );

    let encoding = settings.text_encoding()?;
    let selections = settings.selections()?;

    let data_dir = bootstrap::discover_data_path(settings.data_dir.as_deref())
        .unwrap_or_else(bootstrap::fallback_data_path);
    tracing::info!("Reading exports from {}", data_dir.display());

    let files = month_files(&data_dir, settings.year);
    let table = load_cached(&files, encoding)
        .with_context(|| format!("Failed to load sales exports from {}", data_dir.display()))?;

    let options = AggregateOptions {
        hourly_fill: if settings.zero_fill_hours {
            HourlyFill::ZeroFilled
        } else {
            HourlyFill::Sparse
        },
        ..AggregateOptions::default()
    };
    let mut session = DashboardSession::with_options(table, options);
    session.select_month(selections.month);
    session.select_day(selections.day);

    match settings.output.as_str() {
        "text" => {
            TextRenderer::new(io::stdout().lock())
                .render(&session.aggregates(), &session.selections())?;
        }
        "json" => {
            JsonRenderer::new(io::stdout().lock())
                .render(&session.aggregates(), &session.selections())?;
        }
        _ => {
            let app = App::new(&settings.theme, session);
            // Raw mode delivers Ctrl+C as a key press, so the blocking loop
            // handles its own shutdown.
            tokio::task::spawn_blocking(move || app.run())
                .await
                .context("Dashboard event loop panicked")??;
        }
    }

    Ok(())
}
