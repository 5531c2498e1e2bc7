use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::exchange_rate::ExchangeRate;

/// Where the holder is in its refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshState {
    Idle,
    Refreshing,
    /// A refresh just succeeded; reverts to `Idle` after the display window.
    JustUpdated,
}

/// Identifies one refresh attempt. Results carrying an old ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

/// What happened to a refresh request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefreshOutcome {
    Updated(ExchangeRate),
    /// Fetch failed; the previous rate is kept.
    Failed,
    /// Another refresh was already in flight.
    Ignored,
    /// The attempt was cancelled or superseded before it finished.
    Stale,
}

/// The exchange-rate state machine, free of timers and I/O.
///
/// Invariants: there is always a valid rate, and at most one refresh is
/// in flight. A failed refresh never touches the stored rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RateState {
    rate: ExchangeRate,
    state: RefreshState,
    generation: u64,
}

impl RateState {
    pub fn new(initial: ExchangeRate) -> Self {
        Self {
            rate: initial,
            state: RefreshState::Idle,
            generation: 0,
        }
    }

    pub fn rate(&self) -> ExchangeRate {
        self.rate
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn is_refreshing(&self) -> bool {
        self.state == RefreshState::Refreshing
    }

    pub fn is_just_updated(&self) -> bool {
        self.state == RefreshState::JustUpdated
    }

    /// Enter `Refreshing`. Returns `None` if a refresh is already in flight.
    pub fn begin_refresh(&mut self) -> Option<RefreshTicket> {
        if self.state == RefreshState::Refreshing {
            return None;
        }
        self.generation += 1;
        self.state = RefreshState::Refreshing;
        Some(RefreshTicket(self.generation))
    }

    /// Apply the result of the fetch started with `ticket`.
    pub fn complete(
        &mut self,
        ticket: RefreshTicket,
        result: Result<ExchangeRate, CoreError>,
    ) -> RefreshOutcome {
        if !self.is_current(ticket) || self.state != RefreshState::Refreshing {
            return RefreshOutcome::Stale;
        }
        match result {
            Ok(rate) if rate.is_valid() => {
                self.rate = rate;
                self.state = RefreshState::JustUpdated;
                RefreshOutcome::Updated(rate)
            }
            _ => {
                self.state = RefreshState::Idle;
                RefreshOutcome::Failed
            }
        }
    }

    /// Abandon whatever refresh is in flight. Its result will be dropped.
    pub fn cancel(&mut self) -> bool {
        if self.state != RefreshState::Refreshing {
            return false;
        }
        self.generation += 1;
        self.state = RefreshState::Idle;
        true
    }

    /// Drop the refresh for `ticket` if it is still the one in flight.
    pub fn abandon(&mut self, ticket: RefreshTicket) -> bool {
        if self.is_current(ticket) && self.state == RefreshState::Refreshing {
            self.state = RefreshState::Idle;
            return true;
        }
        false
    }

    /// End the display window opened by the refresh for `ticket`.
    pub fn settle(&mut self, ticket: RefreshTicket) -> bool {
        if self.is_current(ticket) && self.state == RefreshState::JustUpdated {
            self.state = RefreshState::Idle;
            return true;
        }
        false
    }

    fn is_current(&self, ticket: RefreshTicket) -> bool {
        ticket.0 == self.generation
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use self::handle::ExchangeRateService;

#[cfg(not(target_arch = "wasm32"))]
mod handle {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::watch;
    use tokio::task::JoinHandle;
    use tokio::time::{self, Instant, MissedTickBehavior};

    use crate::models::exchange_rate::{ExchangeRate, DEFAULT_USD_JPY_RATE};
    use crate::models::settings::RateRefreshSettings;
    use crate::providers::traits::{Clock, RateProvider};

    use super::{RateState, RefreshOutcome, RefreshTicket};

    /// Shared handle to the current USD→JPY rate.
    ///
    /// Cheap to clone; all clones see the same state. Consumers can read the
    /// snapshot and flags directly or `subscribe()` to be woken on change.
    #[derive(Clone)]
    pub struct ExchangeRateService {
        inner: Arc<Inner>,
    }

    struct Inner {
        provider: Arc<dyn RateProvider>,
        settings: RateRefreshSettings,
        state: watch::Sender<RateState>,
    }

    impl ExchangeRateService {
        /// Start with the configured default rate, stamped with `clock.now()`.
        pub fn new(
            provider: Arc<dyn RateProvider>,
            settings: RateRefreshSettings,
            clock: &dyn Clock,
        ) -> Self {
            let mut initial = ExchangeRate::new(settings.default_rate, clock.now());
            if !initial.is_valid() {
                log::warn!(
                    "Configured default rate {} is invalid, using {DEFAULT_USD_JPY_RATE}",
                    settings.default_rate
                );
                initial.rate = DEFAULT_USD_JPY_RATE;
            }
            Self::with_initial(provider, settings, initial)
        }

        /// Start from a known rate (e.g. the last one persisted by the caller).
        pub fn with_initial(
            provider: Arc<dyn RateProvider>,
            settings: RateRefreshSettings,
            initial: ExchangeRate,
        ) -> Self {
            let (state, _) = watch::channel(RateState::new(initial));
            Self {
                inner: Arc::new(Inner {
                    provider,
                    settings,
                    state,
                }),
            }
        }

        pub fn snapshot(&self) -> ExchangeRate {
            self.inner.state.borrow().rate()
        }

        pub fn state(&self) -> RateState {
            self.inner.state.borrow().clone()
        }

        pub fn is_refreshing(&self) -> bool {
            self.inner.state.borrow().is_refreshing()
        }

        pub fn is_just_updated(&self) -> bool {
            self.inner.state.borrow().is_just_updated()
        }

        pub fn subscribe(&self) -> watch::Receiver<RateState> {
            self.inner.state.subscribe()
        }

        /// Fetch a fresh rate unless one is already being fetched.
        ///
        /// Failures are logged and leave the current rate in place; they are
        /// never returned as errors. Dropping the returned future before it
        /// completes abandons the attempt.
        pub async fn refresh(&self, manual: bool) -> RefreshOutcome {
            let mut ticket = None;
            self.inner.state.send_if_modified(|s| {
                ticket = s.begin_refresh();
                ticket.is_some()
            });
            let Some(ticket) = ticket else {
                log::debug!("Exchange rate refresh already in flight, ignoring request");
                return RefreshOutcome::Ignored;
            };

            log::debug!("Refreshing exchange rate (manual: {manual})");
            let mut guard = AbandonGuard {
                state: &self.inner.state,
                ticket,
                armed: true,
            };

            let result = self.inner.provider.fetch_rate(manual).await;
            guard.armed = false;

            match &result {
                Err(e) => log::warn!(
                    "Exchange rate refresh failed, keeping {}: {e}",
                    self.snapshot().rate
                ),
                Ok(rate) if !rate.is_valid() => log::warn!(
                    "Exchange rate provider returned unusable rate {}, keeping {}",
                    rate.rate,
                    self.snapshot().rate
                ),
                Ok(_) => {}
            }

            let mut outcome = RefreshOutcome::Stale;
            self.inner.state.send_if_modified(|s| {
                outcome = s.complete(ticket, result);
                outcome != RefreshOutcome::Stale
            });

            match outcome {
                RefreshOutcome::Updated(rate) => {
                    log::info!("Exchange rate updated: USD/JPY {}", rate.rate);
                    self.schedule_settle(ticket);
                }
                RefreshOutcome::Stale => {
                    log::debug!("Discarding exchange rate result from a superseded refresh");
                }
                RefreshOutcome::Failed | RefreshOutcome::Ignored => {}
            }
            outcome
        }

        /// Abandon the refresh in flight, if any.
        pub fn cancel(&self) -> bool {
            self.inner.state.send_if_modified(|s| s.cancel())
        }

        /// Run scheduled refreshes until the returned task is aborted.
        ///
        /// Refreshes immediately when `auto_update_on_load` is set, then
        /// once per `refresh_interval`.
        pub fn spawn_polling(&self) -> JoinHandle<()> {
            let service = self.clone();
            let period = self
                .inner
                .settings
                .refresh_interval()
                .max(Duration::from_secs(1));
            let start = if self.inner.settings.auto_update_on_load {
                Instant::now()
            } else {
                Instant::now() + period
            };

            tokio::spawn(async move {
                let mut ticker = time::interval_at(start, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    service.refresh(false).await;
                }
            })
        }

        fn schedule_settle(&self, ticket: RefreshTicket) {
            let inner = Arc::clone(&self.inner);
            let window = inner.settings.just_updated_window();
            tokio::spawn(async move {
                time::sleep(window).await;
                inner.state.send_if_modified(|s| s.settle(ticket));
            });
        }
    }

    /// Returns the state to `Idle` if the refresh future is dropped mid-fetch.
    struct AbandonGuard<'a> {
        state: &'a watch::Sender<RateState>,
        ticket: RefreshTicket,
        armed: bool,
    }

    impl Drop for AbandonGuard<'_> {
        fn drop(&mut self) {
            if self.armed {
                let ticket = self.ticket;
                self.state.send_if_modified(|s| s.abandon(ticket));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn rate(value: f64) -> ExchangeRate {
        ExchangeRate::new(value, Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap())
    }

    #[test]
    fn starts_idle_with_initial_rate() {
        let state = RateState::new(rate(150.0));
        assert_eq!(state.state(), RefreshState::Idle);
        assert_eq!(state.rate().rate, 150.0);
    }

    #[test]
    fn second_begin_is_rejected_while_refreshing() {
        let mut state = RateState::new(rate(150.0));
        assert!(state.begin_refresh().is_some());
        assert!(state.begin_refresh().is_none());
    }

    #[test]
    fn success_moves_to_just_updated() {
        let mut state = RateState::new(rate(150.0));
        let ticket = state.begin_refresh().unwrap();
        let outcome = state.complete(ticket, Ok(rate(155.2)));
        assert_eq!(outcome, RefreshOutcome::Updated(rate(155.2)));
        assert!(state.is_just_updated());
        assert_eq!(state.rate().rate, 155.2);
    }

    #[test]
    fn failure_keeps_previous_rate() {
        let mut state = RateState::new(rate(150.0));
        let ticket = state.begin_refresh().unwrap();
        let outcome = state.complete(ticket, Err(CoreError::Network("timeout".into())));
        assert_eq!(outcome, RefreshOutcome::Failed);
        assert_eq!(state.state(), RefreshState::Idle);
        assert_eq!(state.rate().rate, 150.0);
    }

    #[test]
    fn invalid_rate_is_treated_as_failure() {
        let mut state = RateState::new(rate(150.0));
        let ticket = state.begin_refresh().unwrap();
        assert_eq!(state.complete(ticket, Ok(rate(0.0))), RefreshOutcome::Failed);
        assert_eq!(state.rate().rate, 150.0);
    }

    #[test]
    fn cancelled_result_is_stale() {
        let mut state = RateState::new(rate(150.0));
        let ticket = state.begin_refresh().unwrap();
        assert!(state.cancel());
        assert_eq!(state.complete(ticket, Ok(rate(160.0))), RefreshOutcome::Stale);
        assert_eq!(state.rate().rate, 150.0);
    }

    #[test]
    fn old_settle_does_not_end_newer_window() {
        let mut state = RateState::new(rate(150.0));
        let first = state.begin_refresh().unwrap();
        state.complete(first, Ok(rate(151.0)));
        let second = state.begin_refresh().unwrap();
        state.complete(second, Ok(rate(152.0)));
        assert!(!state.settle(first));
        assert!(state.is_just_updated());
        assert!(state.settle(second));
        assert_eq!(state.state(), RefreshState::Idle);
    }
}
