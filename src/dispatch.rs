//! Per-cell map primitive every solver pass runs through.

use rayon::prelude::*;
use std::sync::OnceLock;

const PAR_THRESHOLD_DEFAULT: usize = 65_536;
const PAR_MIN_WORK_PER_THREAD: usize = 4096;

fn parallel_threshold() -> usize {
    static THRESHOLD: OnceLock<usize> = OnceLock::new();
    *THRESHOLD.get_or_init(|| {
        std::env::var("SIM_PAR_THRESHOLD")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(PAR_THRESHOLD_DEFAULT)
    })
}

fn should_parallel(len: usize) -> bool {
    if len < parallel_threshold() {
        return false;
    }
    let threads = rayon::current_num_threads().max(1);
    len / threads >= PAR_MIN_WORK_PER_THREAD
}

/// How a pass distributes its cells.
///
/// A pass writes each output cell exactly once from inputs it does not
/// write, so every variant yields the same bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dispatch {
    /// Rayon above `SIM_PAR_THRESHOLD` cells, a plain loop below it.
    #[default]
    Auto,
    Serial,
    Parallel,
}

impl Dispatch {
    pub fn is_parallel(self, len: usize) -> bool {
        match self {
            Dispatch::Auto => should_parallel(len),
            Dispatch::Serial => false,
            Dispatch::Parallel => true,
        }
    }

    /// Replaces every cell of a row-major buffer with `f(x, y, old)`.
    pub fn update_indexed(
        self,
        data: &mut [f32],
        width: usize,
        f: impl Fn(usize, usize, f32) -> f32 + Sync,
    ) {
        if self.is_parallel(data.len()) {
            data.par_iter_mut().enumerate().for_each(|(i, value)| {
                let x = i % width;
                let y = i / width;
                *value = f(x, y, *value);
            });
        } else {
            for (i, value) in data.iter_mut().enumerate() {
                let x = i % width;
                let y = i / width;
                *value = f(x, y, *value);
            }
        }
    }

    /// Combines `data` with a same-sized read-only buffer cell by cell.
    pub fn zip_update(self, data: &mut [f32], other: &[f32], f: impl Fn(f32, f32) -> f32 + Sync) {
        assert_eq!(data.len(), other.len(), "buffer length mismatch");
        if self.is_parallel(data.len()) {
            data.par_iter_mut()
                .zip(other.par_iter())
                .for_each(|(value, other)| {
                    *value = f(*value, *other);
                });
        } else {
            for (value, other) in data.iter_mut().zip(other.iter()) {
                *value = f(*value, *other);
            }
        }
    }
}
