use clap::{CommandFactory, Parser};
use dragometer_core::{dashboard_channel, DashboardSettings};
use dragometer_gui::{run_gui, GuiConfig};
use dragometer_runtime::{resolve_producer, spawn_producer, ProducerError};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dragometer", version, about = "Live plots fed by a producer module")]
struct Cli {
    /// Producer to run: a built-in name or a library path, extension optional
    producer: String,
    /// Settings file (defaults to ./dragometer.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Also installs the `log` bridge used by the library crates.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("dragometer: {message}");
    process::exit(1);
}

fn report_producer_exit(result: Result<(), ProducerError>) {
    match result {
        Ok(()) => tracing::info!("producer finished; close the window to exit"),
        Err(err) => fail(err),
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version are not failures
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    };
    init_logging();

    let settings = DashboardSettings::load_or_default(cli.config.as_deref(), Path::new("."))
        .unwrap_or_else(|err| fail(err));

    let producer = match resolve_producer(&cli.producer) {
        Ok(producer) => producer,
        Err(err @ ProducerError::InvalidIdentifier(_)) => {
            eprintln!("dragometer: {err}");
            eprintln!("{}", Cli::command().render_usage());
            process::exit(1);
        }
        Err(err) => fail(err),
    };
    tracing::info!("starting producer {}", producer.name());

    let (controller, pump) = dashboard_channel(&settings.queue.connection_config());
    let config = GuiConfig::from(&settings);
    let result = run_gui(config, pump, move || {
        if let Err(err) = spawn_producer(producer, controller, report_producer_exit) {
            fail(format!("failed to start producer thread: {err}"));
        }
    });
    if let Err(err) = result {
        fail(err);
    }
}
