//! Bounded parallel task runner with first-error cancellation.

use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use notecards_lilypond::{CancelFlag, RenderError};
use rayon::prelude::*;

/// Runs `task(0..n)` on a pool of `parallel` workers.
///
/// The first failing task sets `cancel`; tasks that have not started yet are
/// skipped and that first error is returned. Tasks already running observe
/// the flag through their renderer. If `cancel` is set from outside (a
/// signal) and no task failed, the run fails with [`RenderError::Cancelled`].
pub fn run_in_parallel<F>(cancel: &CancelFlag, n: usize, parallel: usize, task: F) -> Result<()>
where
    F: Fn(usize) -> Result<()> + Sync,
{
    if cancel.is_cancelled() {
        return Err(RenderError::Cancelled.into());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallel.max(1))
        .thread_name(|idx| format!("notecards-render-{}", idx))
        .build()
        .context("Failed to build render thread pool")?;

    let first_error: Mutex<Option<anyhow::Error>> = Mutex::new(None);

    pool.install(|| {
        (0..n).into_par_iter().with_max_len(1).for_each(|idx| {
            if cancel.is_cancelled() {
                return;
            }
            if let Err(e) = task(idx) {
                let mut slot = first_error.lock().unwrap_or_else(PoisonError::into_inner);
                if slot.is_none() {
                    *slot = Some(e);
                }
                cancel.cancel();
            }
        });
    });

    if let Some(e) = first_error
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
    {
        return Err(e);
    }
    if cancel.is_cancelled() {
        return Err(RenderError::Cancelled.into());
    }
    Ok(())
}
