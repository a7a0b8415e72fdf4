use std::time::{Duration, Instant};

/// 手番ごとの持ち時間。手番開始時に一度だけ作り、探索中は読み取りのみ
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    pub fn starting_now(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget: Some(budget),
        }
    }

    pub fn unlimited() -> Self {
        Self {
            started: Instant::now(),
            budget: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    /// 経過時間が持ち時間以上なら true (持ち時間 0 は開始時点で切れている)
    pub fn expired(&self) -> bool {
        match self.budget {
            Some(budget) => self.elapsed() >= budget,
            None => false,
        }
    }
}
