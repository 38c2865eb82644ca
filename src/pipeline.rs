use crate::swap::{SwapError, SwapJob, SwapResult};

use crossbeam_channel::{Receiver, Sender};
use indicatif::ProgressBar;
use std::thread;

/// The confirmation prompt ffmpeg/avconv writes to stderr when the
/// destination file already exists and no -y was given.
const OVERWRITE_PROMPT: &str = "already exists. Overwrite ? [y/N]";

const FALLBACK_WORKERS: usize = 5;

/// Half the file count, so short queues don't spawn idle threads; tiny runs
/// fall back to a fixed pool size.
pub fn worker_count(file_count: usize) -> usize {
    let workers = file_count / 2;
    if workers == 0 {
        FALLBACK_WORKERS
    } else {
        workers
    }
}

/// Publish jobs in discovery order, then drop the sender so workers detect
/// end-of-work by channel disconnection rather than a sentinel.
pub fn dispatch(jobs: Vec<SwapJob>, tx: Sender<SwapJob>) {
    for job in jobs {
        if tx.send(job).is_err() {
            break;
        }
    }
}

/// Spawn the workers and keep the results channel open until every one of
/// them has exited.
pub fn pool(workers: usize, rx: Receiver<SwapJob>, tx: Sender<SwapResult>) {
    let handles = (0..workers)
        .map(|_| {
            let rx = rx.clone();
            let tx = tx.clone();
            thread::spawn(move || worker(rx, tx))
        })
        .collect::<Vec<_>>();
    drop(tx);

    for handle in handles {
        handle.join().expect("swap worker thread panicked");
    }
}

fn worker(rx: Receiver<SwapJob>, tx: Sender<SwapResult>) {
    for job in rx.iter() {
        let result = execute(job);
        if tx.send(result).is_err() {
            break;
        }
    }
}

/// Run one transcoder invocation to completion and classify the outcome.
/// Failures are data for the report; they never abort the pool.
fn execute(mut job: SwapJob) -> SwapResult {
    let outcome = match job.command.output() {
        Err(err) => Err(SwapError::Execution(err.to_string())),
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains(OVERWRITE_PROMPT) {
                Err(SwapError::DestinationExists)
            } else {
                let raw = stderr.trim();
                let message = if raw.is_empty() {
                    output.status.to_string()
                } else {
                    raw.to_string()
                };
                Err(SwapError::Execution(message))
            }
        }
    };

    SwapResult {
        input: job.input,
        outcome,
    }
}

/// Drain results as they complete and print one report line per job. Print
/// order follows completion, not submission.
pub fn results(rx: Receiver<SwapResult>, progress: ProgressBar) {
    let mut swapped = 0usize;
    let mut failed = 0usize;

    for result in rx.iter() {
        match &result.outcome {
            Ok(()) => {
                swapped += 1;
                println!(" - Swapped: {}", result.input.display());
            }
            Err(err) => {
                failed += 1;
                println!(" - Failed: {}: {}", result.input.display(), err);
            }
        }
        progress.inc(1);
    }

    progress.finish_with_message(format!("done ({} swapped, {} failed)", swapped, failed));
}
