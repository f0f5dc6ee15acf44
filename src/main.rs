use std::io::Write;
use std::path::PathBuf;

use chrome_guard::config::{Config, config_path, load_config, load_config_from_path};
use chrome_guard::devtools::TabEstimator;
use chrome_guard::logging::{LogFormat, init_tracing};
use chrome_guard::monitor::{Monitor, MonitorSnapshot, feed, stop_signal};
use chrome_guard::notify::{DesktopNotifier, LogNotifier, Notifier};
use chrome_guard::report::{render_json, render_text};
use chrome_guard::system::sampler::Sampler;
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "chrome-guard",
    about = "Watch a Chromium browser for sustained CPU overload and attribute it to tabs"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tick period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Alert when the whole process family exceeds this CPU percentage
    #[arg(long)]
    total_threshold: Option<f32>,

    /// Alert when a single process exceeds this CPU percentage
    #[arg(long)]
    single_threshold: Option<f32>,

    /// Consecutive over-threshold ticks before alerting
    #[arg(long)]
    sustained_hits: Option<u32>,

    /// Remote-debugging origin, e.g. http://localhost:9222
    #[arg(long)]
    devtools_url: Option<String>,

    /// Skip per-tab estimation.
    #[arg(long, default_value_t = false)]
    no_tabs: bool,

    /// Log alerts instead of raising desktop notifications.
    #[arg(long, default_value_t = false)]
    no_notify: bool,

    /// Print one JSON object per snapshot.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Run a single tick and exit.
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Log level or filter directive (RUST_LOG takes precedence).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format: text, json
    #[arg(long, default_value = "text")]
    log_format: LogFormat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format)?;
    let config = load_config_for_cli(&cli)?;

    let sampler = Sampler::new(config.browser.process_names.iter().cloned());
    let estimator = TabEstimator::new(&config.devtools).wrap_err("cannot build devtools client")?;
    let notifier: Box<dyn Notifier> = if config.notify.enabled {
        Box::new(DesktopNotifier)
    } else {
        Box::new(LogNotifier)
    };

    info!(
        endpoint = estimator.endpoint(),
        tabs = config.devtools.enabled,
        total_threshold = config.monitor.cpu_threshold_total,
        single_threshold = config.monitor.cpu_threshold_single,
        sustained_hits = config.monitor.sustained_hits,
        "chrome-guard starting"
    );

    let mut monitor = Monitor::new(
        sampler,
        estimator,
        notifier,
        config.monitor.thresholds(),
        config.monitor.period(),
    );

    if cli.once {
        let snapshot = monitor.tick().await;
        return print_snapshot(&snapshot, cli.json);
    }

    let (feed, mut snapshots) = feed::channel(config.monitor.feed_capacity);
    let (stop_handle, stop) = stop_signal();
    let producer = tokio::spawn(monitor.run(feed, stop));

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("interrupt received, stopping"),
            Err(e) => warn!(error = %e, "cannot listen for ctrl-c"),
        }
        stop_handle.stop();
    });

    while let Some(snapshot) = snapshots.recv().await {
        print_snapshot(&snapshot, cli.json)?;
    }

    producer.await?;
    Ok(())
}

fn print_snapshot(snapshot: &MonitorSnapshot, json: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if json {
        writeln!(stdout, "{}", render_json(snapshot)?)?;
    } else {
        write!(stdout, "{}", render_text(snapshot))?;
    }
    stdout.flush()?;
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path)?,
        None => load_config()?,
    };
    config.apply_env(|key| std::env::var(key).ok())?;

    if let Some(tick) = cli.tick_ms {
        config.monitor.tick_ms = tick;
    }
    if let Some(total) = cli.total_threshold {
        config.monitor.cpu_threshold_total = total;
    }
    if let Some(single) = cli.single_threshold {
        config.monitor.cpu_threshold_single = single;
    }
    if let Some(hits) = cli.sustained_hits {
        config.monitor.sustained_hits = hits;
    }
    if let Some(ref url) = cli.devtools_url {
        config.devtools.endpoint = url.clone();
    }
    if cli.no_tabs {
        config.devtools.enabled = false;
    }
    if cli.no_notify {
        config.notify.enabled = false;
    }

    config
        .validate()
        .wrap_err_with(|| match config_path() {
            Some(path) if cli.config.is_none() => {
                format!("invalid configuration (default file {})", path.display())
            }
            _ => "invalid configuration".to_string(),
        })?;
    Ok(config)
}
