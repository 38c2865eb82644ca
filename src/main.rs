mod pipeline;
mod scan;
mod swap;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossbeam_channel::bounded;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;

use swap::{SwapJob, SwapResult};

#[derive(Parser)]
#[command(
    name = "media-swapper",
    version,
    about = "Swap mkv/m4a containers to mp4/mp3 with a pool of transcoder workers"
)]
struct Cli {
    /// The location of the ffmpeg or avconv binary
    #[arg(long)]
    bin: Option<PathBuf>,

    /// The source directory of mkv/m4a files or an individual mkv/m4a file to
    /// swap to mp4/mp3
    #[arg(long)]
    src: Option<PathBuf>,

    /// Optional override for the worker count. Default: half the file count,
    /// with a floor for small runs.
    #[arg(long)]
    workers: Option<usize>,
}

/// Immutable run configuration, built once from the CLI.
struct Config {
    bin: PathBuf,
    src: PathBuf,
    workers: Option<usize>,
}

impl Config {
    fn from_cli(cli: Cli) -> Result<Self> {
        let Some(bin) = cli.bin else {
            bail!("the --bin flag must be specified");
        };
        let Some(src) = cli.src else {
            bail!("the --src flag must be specified");
        };
        Ok(Self {
            bin,
            src,
            workers: cli.workers,
        })
    }
}

fn main() -> Result<()> {
    let config = Config::from_cli(Cli::parse())?;

    let files = scan::swappable_files(&config.src).with_context(|| {
        format!(
            "could not find mkv/m4a files under {}",
            config.src.display()
        )
    })?;
    if files.is_empty() {
        bail!("no mkv/m4a files found under {}", config.src.display());
    }

    let workers = config
        .workers
        .unwrap_or_else(|| pipeline::worker_count(files.len()))
        .max(1);
    let jobs = build_jobs(&config.bin, &files);

    println!("Swapping {} videos:", jobs.len());

    let progress = ProgressBar::new(jobs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {wide_bar} {pos}/{len} {msg}")
            .expect("valid progress template"),
    );

    let (job_tx, job_rx) = bounded::<SwapJob>(0);
    let (result_tx, result_rx) = bounded::<SwapResult>(0);

    let sink = thread::spawn(move || pipeline::results(result_rx, progress));
    let pool = thread::spawn(move || pipeline::pool(workers, job_rx, result_tx));
    let dispatcher = thread::spawn(move || pipeline::dispatch(jobs, job_tx));

    // The sink only returns once the results channel closes, which in turn
    // only happens after every worker has exited.
    sink.join().expect("result sink thread panicked");
    pool.join().expect("pool thread panicked");
    dispatcher.join().expect("dispatcher thread panicked");

    Ok(())
}

fn build_jobs(bin: &Path, files: &[PathBuf]) -> Vec<SwapJob> {
    files
        .iter()
        .filter_map(|file| {
            if scan::is_swappable_video(file) {
                Some(swap::mp4_command(bin, file))
            } else if scan::is_swappable_audio(file) {
                Some(swap::mp3_command(bin, file))
            } else {
                None
            }
        })
        .collect()
}
