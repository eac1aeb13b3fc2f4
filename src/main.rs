use clap::Parser;
use ding::{
    config::{Config, ConfigStore, FileConfigStore},
    history::{CsvSessionLog, NullLog, SessionLog},
    notify::{BellNotifier, Notifier, SilentNotifier, SoundBackend, SoundNotifier},
    runtime::{FixedTicker, InterruptEventSource, Runner, SystemClock},
    session::{ConfigError, SessionConfig},
    style::StyleName,
    timer::{SessionLoop, Timer},
};
use std::{error::Error, io, path::PathBuf, process};
use tracing_subscriber::EnvFilter;

/// terminal interval timer: dings every INTERVAL seconds until you stop it
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A stopwatch that dings at regular intervals. Add --duration for a countdown, --count to stop after a number of dings. Every session is appended to ~/.ding-log.csv.",
    after_help = "Example: ding 30 --duration 25m --task \"Deep work\""
)]
pub struct Cli {
    /// seconds between dings (fractions allowed)
    #[clap(allow_negative_numbers = true)]
    interval: f64,

    /// label shown in the header, the summary and the session log
    #[clap(short, long)]
    task: Option<String>,

    /// color style (plain when omitted)
    #[clap(short, long, value_enum)]
    color: Option<StyleName>,

    /// no sound; the visual flash still shows
    #[clap(short, long)]
    quiet: bool,

    /// count down and stop after this long, e.g. 90s, 25m, 1h or plain seconds
    #[clap(short, long)]
    duration: Option<String>,

    /// stop after this many dings
    #[clap(short = 'n', long)]
    count: Option<u64>,

    /// celebrate the 10th, 50th, 100th and 500th ding
    #[clap(short, long)]
    milestones: bool,

    /// drain the progress bar instead of filling it (always on for countdowns)
    #[clap(short, long)]
    reverse: bool,

    /// append the session record here instead of ~/.ding-log.csv
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// do not record this session
    #[clap(long)]
    no_log: bool,

    /// remember --color, --quiet, --milestones and --log-file as defaults
    #[clap(long)]
    save_defaults: bool,
}

impl Cli {
    /// Merge flags over the stored defaults and validate.
    fn to_session_config(&self, defaults: &Config) -> Result<SessionConfig, ConfigError> {
        let mut config = SessionConfig::new(self.interval)?
            .with_style(self.color.or(defaults.color))
            .quiet(self.quiet || defaults.quiet)
            .with_milestones(self.milestones || defaults.milestones)
            .with_reverse(self.reverse)
            .with_flash(defaults.flash())
            .with_tick(defaults.tick());

        if let Some(task) = &self.task {
            config = config.with_task(task.clone());
        }
        if let Some(duration) = &self.duration {
            config = config.with_duration(duration)?;
        }
        if let Some(count) = self.count {
            config = config.with_max_dings(count)?;
        }

        let log_path = if self.no_log {
            None
        } else {
            self.log_file.clone().or_else(|| defaults.log_path())
        };
        Ok(config.with_log_path(log_path))
    }

    fn to_defaults(&self, current: &Config) -> Config {
        Config {
            color: self.color.or(current.color),
            quiet: self.quiet || current.quiet,
            milestones: self.milestones || current.milestones,
            log_file: self.log_file.clone().or_else(|| current.log_file.clone()),
            ..current.clone()
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DING_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let defaults = store.load();

    let config = match cli.to_session_config(&defaults) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if cli.save_defaults {
        if let Err(e) = store.save(&cli.to_defaults(&defaults)) {
            tracing::warn!(path = %store.path().display(), error = %e, "could not save defaults");
        }
    }

    let events = InterruptEventSource::install()?;
    let runner = Runner::new(events, FixedTicker::new(config.tick));

    let notifier: Box<dyn Notifier> = if config.quiet {
        Box::new(SilentNotifier)
    } else {
        match SoundNotifier::spawn(SoundBackend::detect()) {
            Ok(notifier) => Box::new(notifier),
            Err(e) => {
                tracing::debug!(error = %e, "no sound worker, falling back to the bell");
                Box::new(BellNotifier)
            }
        }
    };

    let log: Box<dyn SessionLog> = match &config.log_path {
        Some(path) => Box::new(CsvSessionLog::with_path(path)),
        None => Box::new(NullLog),
    };

    let term_width = crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(80);

    let clock = SystemClock::start();
    let session = SessionLoop {
        runner,
        clock: &clock,
        notifier: notifier.as_ref(),
        log: log.as_ref(),
        term_width,
    };

    let mut timer = Timer::new(config);
    session.run(&mut timer, &mut io::stdout())?;

    Ok(())
}
