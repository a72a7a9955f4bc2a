use std::path::PathBuf;

use clap::Parser;
use common::{
    config::{ChartStyle, DEFAULT_EXTENSION, DEFAULT_OUTPUT, DEFAULT_RESULTS_DIR, Settings},
    loader::load_results,
    metrics::extract_metrics,
    plot::{Plot, version_labels},
};
use evolution_basic::EvolutionBasic;
use eyre::Result;
use tracing::{debug, error};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

mod summary;

const LOG_MODULES: &[&str] = &["common", "evolution_basic"];

/// Plot how payment processor load-test results evolve across versions
#[derive(Parser)]
struct Cli {
    /// Directory searched recursively for result files
    #[arg(short, long, default_value = DEFAULT_RESULTS_DIR)]
    results_dir: PathBuf,
    /// Extension of result files
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,
    /// Image to write the charts to
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
    /// YAML file overriding the chart style
    #[arg(short, long)]
    style: Option<PathBuf>,
    #[arg(short, long)]
    log: Vec<String>,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let style = match &self.style {
            Some(path) => ChartStyle::from_yaml_file(path)?,
            None => ChartStyle::default(),
        };
        Ok(Settings {
            results_dir: self.results_dir.clone(),
            extension: self.extension.clone(),
            output: self.output.clone(),
            style,
        })
    }
}

fn init_tracing(directives: &[String]) -> Result<WorkerGuard> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let file_appender = tracing_appender::rolling::never(".", "analyzer.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let mut env_filter = EnvFilter::new(format!("results_analyzer={log_level}"));
    for directive in directives {
        env_filter = env_filter.add_directive(directive.parse()?);
    }
    for module in LOG_MODULES {
        if !directives.iter().any(|x| x.starts_with(module)) {
            env_filter = env_filter.add_directive(format!("{module}={log_level}").parse()?);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_writer(std::io::stderr)
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .compact(),
        )
        .with(layer().with_ansi(false).with_writer(non_blocking))
        .init();
    Ok(guard)
}

/// Every plot must be able to draw before any file is touched.
fn check_backends(plots: &[Box<dyn Plot>], style: &ChartStyle) -> Result<()> {
    for plot in plots {
        plot.check_backend(style)?;
        debug!("Backend for {} is ready", plot.name());
    }
    Ok(())
}

/// Loads, summarizes and plots. Returns whether an image was written.
fn run(settings: &Settings, plots: &[Box<dyn Plot>]) -> Result<bool> {
    println!("🔍 Payment Processor Results Analyzer - Simple Graphics");
    println!("{}", "=".repeat(60));

    let records = load_results(&settings.results_dir, &settings.extension);
    if records.is_empty() {
        println!("❌ No data found to analyze!");
        return Ok(false);
    }
    println!("\n✅ Loaded {} result files", records.len());

    print!("{}", summary::render_summary(&records));

    println!("\n📊 Creating evolution plots...");
    let labels = version_labels(&records);
    let series = extract_metrics(&records);
    common::plot::plot(plots, &labels, &series, &settings.output, &settings.style)?;
    println!(
        "✓ Evolution plots saved as '{}'",
        settings.output.display()
    );

    println!("\n✅ Analysis complete!");
    println!("📁 Generated file: {}", settings.output.display());
    Ok(true)
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let _guard = init_tracing(&args.log)?;
    let settings = args.settings()?;
    debug!("Settings: {settings:?}");

    let plots: Vec<Box<dyn Plot>> = vec![Box::new(EvolutionBasic)];
    if let Err(err) = check_backends(&plots, &settings.style) {
        println!("❌ Missing plotting backend: {err}");
        println!(
            "\nCharts are drawn with the {:?} font family. Install a matching system font or set font_family in a --style file.",
            settings.style.font_family
        );
        error!("{err:#?}");
        return Err(err);
    }

    if let Err(err) = run(&settings, &plots) {
        error!("{err:#?}");
        return Err(err);
    }
    Ok(())
}
