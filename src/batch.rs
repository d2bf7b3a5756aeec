//! Interpreting many instructions at once.
//!
//! Since [`interpret`] is pure and the instruction catalog is immutable,
//! instructions can be interpreted on several threads without any locking.
//! [`interpret_all`] distributes instructions to a pool of worker threads
//! over channels and collects the results back in input order.

use std::num::NonZeroUsize;
use std::thread;

use crossbeam_channel as cbc;

use crate::err::MipsErr;
use crate::{interpret, Interpretation};

/// Configuration flags for [`interpret_all`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BatchFlags {
    /// The number of worker threads to use.
    ///
    /// By default, this is the available parallelism of the machine (or 1 if that is unknown).
    pub workers: NonZeroUsize,
}
impl Default for BatchFlags {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Interprets every instruction, returning the results in the same order as the input.
///
/// The results are identical to calling [`interpret`] on each instruction in turn.
///
/// # Example
/// ```
/// use mips_interpret::batch::{interpret_all, BatchFlags};
///
/// let results = interpret_all(["add $t0, $s1, $s2", "foo", "j 0x400020"], BatchFlags::default());
/// assert_eq!(results.len(), 3);
/// assert_eq!(results[0].as_ref().unwrap().hex, "0x02324020");
/// assert!(results[1].is_err());
/// assert_eq!(results[2].as_ref().unwrap().hex, "0x08100008");
/// ```
pub fn interpret_all<I>(instructions: I, flags: BatchFlags) -> Vec<Result<Interpretation, MipsErr>>
    where I: IntoIterator,
          I::Item: AsRef<str>
{
    let jobs: Vec<String> = instructions.into_iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    let workers = flags.workers.get().min(jobs.len());
    log::debug!("interpreting {} instructions on {workers} workers", jobs.len());

    if workers <= 1 {
        return jobs.iter().map(|s| interpret(s)).collect();
    }

    let (job_tx, job_rx) = cbc::unbounded::<(usize, String)>();
    let (out_tx, out_rx) = cbc::unbounded();

    let n_jobs = jobs.len();
    for job in jobs.into_iter().enumerate() {
        // Receiver is alive until the end of this function.
        let _ = job_tx.send(job);
    }
    drop(job_tx);

    thread::scope(|s| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let out_tx = out_tx.clone();
            s.spawn(move || {
                for (i, instr) in job_rx {
                    if out_tx.send((i, interpret(&instr))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(out_tx);

    let mut results: Vec<_> = out_rx.into_iter().collect();
    debug_assert_eq!(results.len(), n_jobs);
    results.sort_unstable_by_key(|&(i, _)| i);
    results.into_iter().map(|(_, r)| r).collect()
}
