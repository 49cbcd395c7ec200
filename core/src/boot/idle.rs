//! Terminal idle state
//!
//! Returning from the boot task is not allowed on the target, so once
//! loading is done the task yields to the scheduler forever. Handlers the
//! scripts registered keep running on their own.

use std::thread;
use std::time::Duration;

use super::{BootReport, BootState};

/// Gives up the CPU for one interval
pub trait Scheduler {
    fn yield_for(&mut self, interval: Duration);
}

/// Sleeps the current thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    fn yield_for(&mut self, interval: Duration) {
        thread::sleep(interval);
    }
}

/// The boot has finished loading; nothing leaves this state
#[derive(Debug)]
pub struct Idle {
    interval: Duration,
    report: BootReport,
    ticks: u64,
}

impl Idle {
    pub(super) fn new(interval: Duration, report: BootReport) -> Self {
        Self {
            interval,
            report,
            ticks: 0,
        }
    }

    pub fn state(&self) -> BootState {
        BootState::Idle
    }

    pub fn report(&self) -> &BootReport {
        &self.report
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of yields so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Yield once
    pub fn tick<S: Scheduler>(&mut self, scheduler: &mut S) {
        scheduler.yield_for(self.interval);
        self.ticks = self.ticks.wrapping_add(1);
    }

    /// Yield forever
    pub fn park<S: Scheduler>(mut self, mut scheduler: S) -> ! {
        loop {
            self.tick(&mut scheduler);
        }
    }
}
