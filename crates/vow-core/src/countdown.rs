//! Time remaining until the wedding, recomputed on a fixed cadence.
//!
//! [`TimeRemaining`] is the pure computation. [`CountdownTicker`] is the
//! scheduled task that republishes it every second for whoever owns the
//! target instant.
//!
//! A target in the past clamps to zero and sets `is_past`; the values never go
//! negative and never freeze at a stale reading.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

/// Recompute cadence for [`CountdownTicker`].
pub const TICK: Duration = Duration::from_millis(1000);

/// Shortest accepted tick period.
pub const MIN_TICK: Duration = Duration::from_millis(1);

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

// ─── Clock ───────────────────────────────────────────────────────────────────

/// Source of the current instant.
pub trait Clock: Send + Sync + 'static {
  fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

// ─── Computation ─────────────────────────────────────────────────────────────

/// `max(target - now, 0)` split into calendar-free units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRemaining {
  pub days:    u64,
  pub hours:   u8,
  pub minutes: u8,
  pub seconds: u8,
  /// The target instant has been reached.
  pub is_past: bool,
}

impl TimeRemaining {
  /// Whole units between `now` and `target`, truncating fractional seconds.
  pub fn between(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
    let millis = (target - now).num_milliseconds();
    if millis <= 0 {
      return Self { is_past: true, ..Self::default() };
    }

    let secs = millis / 1000;
    Self {
      days:    (secs / SECS_PER_DAY) as u64,
      hours:   ((secs % SECS_PER_DAY) / SECS_PER_HOUR) as u8,
      minutes: ((secs % SECS_PER_HOUR) / SECS_PER_MINUTE) as u8,
      seconds: (secs % SECS_PER_MINUTE) as u8,
      is_past: false,
    }
  }

  /// Like [`Self::between`], but an absent target reads as all zeroes and not
  /// past.
  pub fn until(target: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
    target.map_or_else(Self::default, |t| Self::between(t, now))
  }

  /// Zero-padded display form.
  pub fn padded(&self) -> Countdown {
    Countdown {
      days:    format!("{:02}", self.days),
      hours:   format!("{:02}", self.hours),
      minutes: format!("{:02}", self.minutes),
      seconds: format!("{:02}", self.seconds),
      is_past: self.is_past,
    }
  }
}

/// The countdown tuple as shown to users. Every field is at least two digits;
/// days may be longer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
  pub days:    String,
  pub hours:   String,
  pub minutes: String,
  pub seconds: String,
  pub is_past: bool,
}

impl Default for Countdown {
  fn default() -> Self { TimeRemaining::default().padded() }
}

impl From<TimeRemaining> for Countdown {
  fn from(t: TimeRemaining) -> Self { t.padded() }
}

// ─── Ticker ──────────────────────────────────────────────────────────────────

/// A cancellable 1-second task publishing [`TimeRemaining`] for one target.
///
/// Each tick recomputes from the clock rather than decrementing, so a late
/// tick never accumulates drift. The task stops by itself once the target is
/// reached, and is cancelled by [`Self::stop`], [`Self::retarget`] and drop.
///
/// Must be started from within a tokio runtime.
pub struct CountdownTicker {
  clock:  Arc<dyn Clock>,
  period: Duration,
  target: Option<DateTime<Utc>>,
  tx:     watch::Sender<TimeRemaining>,
  task:   Option<JoinHandle<()>>,
}

impl CountdownTicker {
  pub fn new(clock: Arc<dyn Clock>) -> Self {
    let (tx, _) = watch::channel(TimeRemaining::default());
    Self { clock, period: TICK, target: None, tx, task: None }
  }

  /// Override the tick period. Periods below [`MIN_TICK`] are raised to it.
  pub fn with_period(mut self, period: Duration) -> Self {
    self.period = period.max(MIN_TICK);
    self
  }

  /// Observe published values. The receiver sees the latest value at once.
  pub fn subscribe(&self) -> watch::Receiver<TimeRemaining> { self.tx.subscribe() }

  /// The most recently published value.
  pub fn current(&self) -> TimeRemaining { *self.tx.borrow() }

  pub fn target(&self) -> Option<DateTime<Utc>> { self.target }

  pub fn is_running(&self) -> bool {
    self.task.as_ref().is_some_and(|t| !t.is_finished())
  }

  /// Begin counting down to `target`, replacing any running countdown.
  ///
  /// The first value is published before this returns. With no target, or a
  /// target already reached, nothing is scheduled.
  pub fn start(&mut self, target: Option<DateTime<Utc>>) {
    self.stop();
    self.target = target;

    let first = TimeRemaining::until(target, self.clock.now());
    self.tx.send_replace(first);

    let Some(target) = target else { return };
    if first.is_past {
      tracing::debug!(%target, "countdown target already reached");
      return;
    }

    let tx     = self.tx.clone();
    let clock  = Arc::clone(&self.clock);
    let period = self.period;

    self.task = Some(tokio::spawn(async move {
      let mut interval = tokio::time::interval(period);
      interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
      // The first tick completes immediately; that value is already out.
      interval.tick().await;

      loop {
        interval.tick().await;
        let remaining = TimeRemaining::between(target, clock.now());
        tx.send_replace(remaining);
        if remaining.is_past {
          tracing::debug!(%target, "countdown reached zero");
          break;
        }
      }
    }));
  }

  /// Rebind to a new target. Keeps the running task if the target is
  /// unchanged.
  pub fn retarget(&mut self, target: Option<DateTime<Utc>>) {
    if target == self.target && self.is_running() {
      return;
    }
    self.start(target);
  }

  /// Cancel the scheduled task. Safe to call any number of times.
  pub fn stop(&mut self) {
    if let Some(task) = self.task.take() {
      task.abort();
    }
  }
}

impl Drop for CountdownTicker {
  fn drop(&mut self) { self.stop(); }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicI64, Ordering};

  use chrono::{Duration as ChronoDuration, TimeZone};

  use super::*;

  fn base() -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap() }

  /// A clock that only moves when told to.
  struct ManualClock {
    offset_secs: AtomicI64,
  }

  impl ManualClock {
    fn new() -> Arc<Self> { Arc::new(Self { offset_secs: AtomicI64::new(0) }) }

    fn advance(&self, secs: i64) { self.offset_secs.fetch_add(secs, Ordering::SeqCst); }
  }

  impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
      base() + ChronoDuration::seconds(self.offset_secs.load(Ordering::SeqCst))
    }
  }

  #[test]
  fn one_of_each_unit() {
    let target = base() + ChronoDuration::seconds(90_061);
    let padded = TimeRemaining::between(target, base()).padded();
    assert_eq!(padded.days, "01");
    assert_eq!(padded.hours, "01");
    assert_eq!(padded.minutes, "01");
    assert_eq!(padded.seconds, "01");
    assert!(!padded.is_past);
  }

  #[test]
  fn days_are_unbounded_above_99() {
    let target = base() + ChronoDuration::days(123) + ChronoDuration::seconds(5);
    let padded = TimeRemaining::between(target, base()).padded();
    assert_eq!(padded.days, "123");
    assert_eq!(padded.hours, "00");
    assert_eq!(padded.seconds, "05");
  }

  #[test]
  fn fractional_seconds_truncate() {
    let target = base() + ChronoDuration::milliseconds(1_999);
    assert_eq!(TimeRemaining::between(target, base()).seconds, 1);
  }

  #[test]
  fn past_target_clamps_to_zero() {
    let target = base() - ChronoDuration::hours(5);
    let remaining = TimeRemaining::between(target, base());
    assert!(remaining.is_past);
    assert_eq!(remaining.padded(), Countdown {
      days:    "00".into(),
      hours:   "00".into(),
      minutes: "00".into(),
      seconds: "00".into(),
      is_past: true,
    });
  }

  #[test]
  fn reaching_the_target_exactly_counts_as_past() {
    assert!(TimeRemaining::between(base(), base()).is_past);
  }

  #[test]
  fn absent_target_reads_zero_and_not_past() {
    let remaining = TimeRemaining::until(None, base());
    assert_eq!(remaining, TimeRemaining::default());
    assert_eq!(Countdown::default().days, "00");
    assert!(!remaining.is_past);
  }

  #[tokio::test]
  async fn start_publishes_immediately() {
    let clock = ManualClock::new();
    let mut ticker = CountdownTicker::new(clock.clone());
    ticker.start(Some(base() + ChronoDuration::seconds(61)));

    let rx = ticker.subscribe();
    assert_eq!(rx.borrow().minutes, 1);
    assert_eq!(rx.borrow().seconds, 1);
    assert!(ticker.is_running());
    ticker.stop();
  }

  #[tokio::test]
  async fn ticks_recompute_from_the_clock() {
    let clock = ManualClock::new();
    let mut ticker = CountdownTicker::new(clock.clone())
      .with_period(Duration::from_millis(5));
    ticker.start(Some(base() + ChronoDuration::seconds(100)));
    let mut rx = ticker.subscribe();

    clock.advance(40);
    let seen = tokio::time::timeout(Duration::from_secs(2), async {
      loop {
        rx.changed().await.unwrap();
        let value = *rx.borrow_and_update();
        if value.seconds == 0 && value.minutes == 1 {
          return value;
        }
      }
    })
    .await
    .expect("tick after clock advance");
    assert!(!seen.is_past);
    ticker.stop();
  }

  #[tokio::test]
  async fn ticker_finishes_once_target_is_reached() {
    let clock = ManualClock::new();
    let mut ticker = CountdownTicker::new(clock.clone())
      .with_period(Duration::from_millis(5));
    ticker.start(Some(base() + ChronoDuration::seconds(3)));
    let mut rx = ticker.subscribe();

    clock.advance(10);
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|r| r.is_past))
      .await
      .expect("reaches zero")
      .unwrap();

    tokio::time::timeout(Duration::from_secs(2), async {
      while ticker.is_running() {
        tokio::time::sleep(Duration::from_millis(5)).await;
      }
    })
    .await
    .expect("task ends by itself");
    assert_eq!(ticker.current().days, 0);
  }

  #[tokio::test]
  async fn zero_period_is_raised_to_the_minimum() {
    let clock = ManualClock::new();
    let mut ticker = CountdownTicker::new(clock.clone()).with_period(Duration::ZERO);
    assert_eq!(ticker.period, MIN_TICK);

    ticker.start(Some(base() + ChronoDuration::seconds(3)));
    let mut rx = ticker.subscribe();
    clock.advance(5);
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|r| r.is_past))
      .await
      .expect("ticks with a raised period")
      .unwrap();
  }

  #[tokio::test]
  async fn past_target_schedules_nothing() {
    let mut ticker = CountdownTicker::new(ManualClock::new());
    ticker.start(Some(base() - ChronoDuration::days(1)));
    assert!(!ticker.is_running());
    assert!(ticker.current().is_past);
  }

  #[tokio::test]
  async fn retarget_rebinds_and_stop_is_idempotent() {
    let clock = ManualClock::new();
    let mut ticker = CountdownTicker::new(clock);
    ticker.start(Some(base() + ChronoDuration::days(2)));
    assert_eq!(ticker.current().days, 2);

    ticker.retarget(Some(base() + ChronoDuration::days(5)));
    assert_eq!(ticker.current().days, 5);
    assert!(ticker.is_running());

    ticker.retarget(None);
    assert!(!ticker.is_running());
    assert_eq!(ticker.current(), TimeRemaining::default());

    ticker.stop();
    ticker.stop();
    assert!(!ticker.is_running());
  }
}
