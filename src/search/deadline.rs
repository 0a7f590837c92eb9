use std::time::{
    Duration,
    Instant,
};

/// Wall-clock budget of a search, polled cooperatively.
///
/// The clock is only read on every `check_interval`-th poll, starting with the first.
#[derive(Debug, Clone)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
    check_interval: u64,
    polls: u64,
    expired: bool,
}

impl Deadline {
    /// Starts the clock for the given time limit.
    ///
    /// A check interval of zero is treated as one.
    pub fn start(limit: Duration, check_interval: u64) -> Self {
        Self {
            started: Instant::now(),
            limit,
            check_interval: check_interval.max(1),
            polls: 0,
            expired: false,
        }
    }

    /// Returns the time spent since the clock has been started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Returns `true` once the time limit has been reached.
    ///
    /// Stays expired once expiry has been observed.
    pub fn poll(&mut self) -> bool {
        if !self.expired && self.polls % self.check_interval == 0 {
            self.expired = self.elapsed() >= self.limit;
        }
        self.polls += 1;
        self.expired
    }
}
