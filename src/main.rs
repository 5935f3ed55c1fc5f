mod app;
mod chart;
mod config;
mod export;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser, ValueHint};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

use crate::app::{BubbleApp, BubbleRenderer};
use crate::chart::{ChartVariant, collect_chart};
use crate::config::Settings;
use crate::export::{ExportOptions, render_svg, write_output_svg};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON rows: an array, or an object with a `rows` array
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    #[arg(short, long, value_enum, default_value_t = ChartVariant::Strategy)]
    variant: ChartVariant,

    /// TOML settings file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Write one frame as SVG instead of opening a window
    #[arg(long, value_hint = ValueHint::FilePath)]
    export: Option<PathBuf>,

    #[arg(long, default_value_t = 800.0, requires = "export")]
    width: f32,

    #[arg(long, default_value_t = 800.0, requires = "export")]
    height: f32,

    #[arg(long, default_value_t = 1.0, requires = "export")]
    pixel_ratio: f32,

    /// Bubble name to frame in the export
    #[arg(long, requires = "export")]
    focus: Option<String>,

    /// -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count)]
    debug: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.debug);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error:#}");
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let settings = Settings::load(args.config.as_deref())?;
    let style = settings
        .chart_style()
        .context("invalid chart settings")?;

    if let Some(output) = &args.export {
        let source = collect_chart(&args.input, args.variant)?;
        let mut renderer = BubbleRenderer::new(args.variant, style);
        renderer.set_data(source.root);

        let svg = render_svg(
            &mut renderer,
            &ExportOptions {
                width: args.width,
                height: args.height,
                pixel_ratio: args.pixel_ratio,
                focus: args.focus.clone(),
            },
        )?;
        return write_output_svg(&svg, output);
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size(settings.window_size()),
        ..Default::default()
    };

    let input = args.input;
    let variant = args.variant;
    eframe::run_native(
        "relevance-bubbles",
        options,
        Box::new(move |cc| Ok(Box::new(BubbleApp::new(cc, input, variant, style)))),
    )
    .map_err(|error| anyhow!("failed to start the viewer: {error}"))
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
