use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::SystemTime;

use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use log::info;

use logseek::index::DATE_TIME_FORMAT;
use logseek::Result;

const DATA_DIR: &str = "testdata";

/// Generate rotated access-log test data: one giant file followed by a
/// series of smaller files continuing its timeline, each stamped with its
/// last line's timestamp as the modification time.
#[derive(Parser)]
#[command(name = "loggen", version, about = "Generate rotated access-log test data")]
struct Cli {
    /// Directory to store the generated testdata in
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Seconds between consecutive log lines
    #[arg(long, default_value_t = 10)]
    interval: u64,

    /// Total number of log files
    #[arg(long = "max-files", default_value_t = 10)]
    max_files: usize,

    /// Lines in the first, giant log file (the default is roughly 5 GB)
    #[arg(long = "max-lines", default_value_t = 50_000_000)]
    max_lines: usize,

    /// Lines in each of the smaller rotated files
    #[arg(long = "min-lines", default_value_t = 100)]
    min_lines: usize,
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
    let data_dir = cli.dir.join(DATA_DIR);
    fs::create_dir_all(&data_dir)?;

    let interval = Duration::seconds(cli.interval as i64);
    let now = Utc::now();
    let started = std::time::Instant::now();

    info!("generating the giant log file");
    let mut stamp = now;
    let path = data_dir.join("http-1.log");
    let mut writer = BufWriter::new(File::create(&path)?);
    for i in 0..cli.max_lines {
        stamp = now - interval * (cli.max_lines - i) as i32;
        writer.write_all(log_line(&stamp).as_bytes())?;
        if (i + 1) % 5_000_000 == 0 {
            info!("wrote {} lines", i + 1);
        }
    }
    writer.flush()?;
    drop(writer);
    set_mod_time(&path, stamp)?;

    info!(
        "generating {} smaller log files",
        cli.max_files.saturating_sub(1)
    );
    let per_file = cli.min_lines;
    // One-interval gap between the end of each file and the start of the
    // next, matching a rotation that cuts over between writes.
    stamp = stamp + interval * per_file as i32 + interval;
    for file_index in 1..cli.max_files {
        let path = data_dir.join(format!("http-{}.log", file_index + 1));
        let mut writer = BufWriter::new(File::create(&path)?);
        for j in 0..per_file {
            let line_stamp = stamp - interval * (per_file - j) as i32;
            writer.write_all(log_line(&line_stamp).as_bytes())?;
        }
        writer.flush()?;
        drop(writer);
        set_mod_time(&path, stamp - interval)?;
        stamp = stamp + interval * per_file as i32;
    }

    info!("elapsed {:?}", started.elapsed());
    Ok(())
}

fn log_line(stamp: &DateTime<Utc>) -> String {
    format!(
        "127.0.0.1 user-identifier frank [{}] \"GET /api/endpoint HTTP/1.0\" 500 123\n",
        stamp.format(DATE_TIME_FORMAT)
    )
}

fn set_mod_time(path: &Path, stamp: DateTime<Utc>) -> Result<()> {
    let file = OpenOptions::new().write(true).open(path)?;
    file.set_modified(SystemTime::from(stamp))?;
    Ok(())
}
