use std::io;
use std::path::PathBuf;
use std::process;
use std::thread;

use clap::Parser;
use log::{debug, info};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use logseek::{CancelToken, LogReader, ReaderConfig, Result};

#[derive(Parser)]
#[command(name = "logseek", version, about = "Emit access-log lines from the last N minutes")]
struct Cli {
    /// Directory where the rotated log files are stored
    #[arg(short = 'd', default_value = ".")]
    directory: PathBuf,

    /// Window length in minutes
    #[arg(short = 't', default_value_t = 1)]
    minutes: u32,
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cancel = CancelToken::new();
    setup_signal_handlers(cancel.clone())?;

    let cfg = ReaderConfig::new()
        .with_directory(&cli.directory)
        .with_last_n_minutes(cli.minutes);

    let reader = LogReader::new(cfg)?;
    let stdout = io::stdout();
    reader.read(&cancel, stdout.lock())?;

    debug!("{:?}", reader.metrics().snapshot());
    Ok(())
}

/// Signal the cancel token on SIGINT or SIGTERM so an interrupted read
/// stops between files instead of being cut off mid-line.
fn setup_signal_handlers(cancel: CancelToken) -> io::Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;

    thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            info!("received signal {signal}, cancelling");
            cancel.cancel();
        }
    });

    Ok(())
}
