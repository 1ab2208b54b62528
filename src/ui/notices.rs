//! Toasts and notice history.
//!
//! The core reports operator-facing messages through the `Notifier` trait.
//! `NoticeBoard` keeps the most recent one on screen for a configured time
//! and records every notice with a local timestamp for the activity tab.

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::planner::surface::{Notice, NoticeLevel, Notifier};

/// Maximum notice history kept for the activity tab. Oldest entries drop first.
pub const NOTICE_HISTORY_CAPACITY: usize = 500;

#[derive(Debug, Clone)]
pub struct NoticeRecord {
    pub notice: Notice,
    pub at: DateTime<Local>,
}

pub struct NoticeBoard {
    toast: Option<(Notice, Instant)>,
    history: VecDeque<NoticeRecord>,
    duration: Duration,
}

impl NoticeBoard {
    pub fn new(duration: Duration) -> Self {
        Self { toast: None, history: VecDeque::new(), duration }
    }

    /// The toast still on screen at `now`, if any.
    pub fn active_toast(&self, now: Instant) -> Option<&Notice> {
        match &self.toast {
            Some((notice, expiry)) if *expiry > now => Some(notice),
            _ => None,
        }
    }

    /// Time until the current toast expires, used to schedule a repaint.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.toast.as_ref().and_then(|(_, expiry)| expiry.checked_duration_since(now)).filter(|d| !d.is_zero())
    }

    pub fn history(&self) -> &VecDeque<NoticeRecord> {
        &self.history
    }
}

impl Notifier for NoticeBoard {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => log::warn!("Notice: {}", notice.message),
            NoticeLevel::Info | NoticeLevel::Success => log::info!("Notice: {}", notice.message),
        }
        if self.history.len() >= NOTICE_HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(NoticeRecord { notice: notice.clone(), at: Local::now() });
        self.toast = Some((notice, Instant::now() + self.duration));
    }
}
