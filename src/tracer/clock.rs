//! Microsecond clocks an instrumentation source can stamp events with.
//!
//! Process CPU time is read via `clock_gettime(CLOCK_PROCESS_CPUTIME_ID)`.
//! It ignores sleeps and I/O waits, which makes self times comparable
//! across runs. Platforms without it fall back to the monotonic clock.

use crate::utils::config::MICROS_PER_SEC;
use std::time::Instant;

/// Which time source to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// CPU time consumed by the whole process
    #[default]
    ProcessCpu,

    /// Wall time since the stopwatch was created
    Monotonic,
}

/// Reads a [`Clock`] in microseconds
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    clock: Clock,
    epoch: Instant,
}

impl Stopwatch {
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            epoch: Instant::now(),
        }
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Current reading in microseconds
    pub fn now_micros(&self) -> u64 {
        match self.clock {
            Clock::ProcessCpu => process_cpu_micros().unwrap_or_else(|| self.monotonic_micros()),
            Clock::Monotonic => self.monotonic_micros(),
        }
    }

    fn monotonic_micros(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new(Clock::default())
    }
}

#[cfg(unix)]
fn process_cpu_micros() -> Option<u64> {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `ts` is a valid, writable timespec for the duration of the call.
    let ret = unsafe { libc::clock_gettime(libc::CLOCK_PROCESS_CPUTIME_ID, &mut ts) };
    if ret != 0 {
        return None;
    }
    let secs = u64::try_from(ts.tv_sec).ok()?;
    let nanos = u64::try_from(ts.tv_nsec).ok()?;
    Some(secs * MICROS_PER_SEC + nanos / 1_000)
}

#[cfg(not(unix))]
fn process_cpu_micros() -> Option<u64> {
    None
}
