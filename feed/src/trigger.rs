//! Debounced "load more" trigger driven by sentinel visibility.
//!
//! [`ScrollTrigger`] holds the decisions; the caller owns the platform
//! pieces. In the browser that is an `IntersectionObserver` feeding
//! [`ScrollTrigger::on_visibility`] and timers that call back into
//! [`ScrollTrigger::fire`] after the debounce and [`ScrollTrigger::finish`]
//! after the cooldown:
//!
//! ```text
//! visible ──on_visibility──▶ Ticket ──(debounce)──▶ fire(ticket)
//!                                                     │ true
//!                                                     ▼
//!                                        on_trigger(); (cooldown) finish()
//! ```
//!
//! A newer ticket supersedes older ones, so a burst of visibility changes
//! collapses into one trigger.

use std::time::Duration;

pub const DEFAULT_THRESHOLD: f64 = 0.1;
pub const DEFAULT_ROOT_MARGIN: &str = "0px 0px 100px 0px";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub struct TriggerConfig {
    /// Fraction of the sentinel that must be visible, in `[0, 1]`.
    pub threshold: f64,
    /// CSS margin grown around the viewport before intersecting.
    pub root_margin: String,
    pub enabled: bool,
    /// Quiet period after the last visibility change before triggering.
    pub debounce: Duration,
    /// Time after a trigger during which new triggers are suppressed.
    pub cooldown: Duration,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            root_margin: DEFAULT_ROOT_MARGIN.to_string(),
            enabled: true,
            debounce: DEFAULT_DEBOUNCE,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

impl TriggerConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = if threshold.is_nan() {
            DEFAULT_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// A live observation of a sentinel.
pub trait Observation {
    /// Stop delivering visibility events.
    fn disconnect(&mut self);
}

/// Identifies one scheduled trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

pub struct ScrollTrigger<O: Observation> {
    config: TriggerConfig,
    observation: Option<O>,
    pending: Option<Ticket>,
    issued: u64,
    processing: bool,
    intersecting: bool,
}

impl<O: Observation> ScrollTrigger<O> {
    pub fn new(config: TriggerConfig) -> Self {
        Self {
            config,
            observation: None,
            pending: None,
            issued: 0,
            processing: false,
            intersecting: false,
        }
    }

    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    pub fn is_attached(&self) -> bool {
        self.observation.is_some()
    }

    pub fn is_intersecting(&self) -> bool {
        self.intersecting
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Start observing with the observation built by `observe`. Any
    /// previous observation is disconnected first. Nothing is built while
    /// disabled.
    pub fn attach(&mut self, observe: impl FnOnce() -> O) -> bool {
        self.detach();
        if !self.config.enabled {
            return false;
        }
        self.observation = Some(observe());
        true
    }

    /// Stop observing and cancel any pending trigger.
    pub fn detach(&mut self) {
        if let Some(mut observation) = self.observation.take() {
            observation.disconnect();
        }
        self.pending = None;
        self.intersecting = false;
    }

    /// Swap the configuration, detaching first. A trigger still in its
    /// cooldown stays processing until [`finish`](Self::finish).
    pub fn set_config(&mut self, config: TriggerConfig) {
        self.detach();
        self.config = config;
    }

    /// Disabling detaches; enabling takes effect on the next `attach`.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        if !enabled {
            self.detach();
        }
    }

    /// Record a visibility change. Returns a ticket when the caller should
    /// schedule [`fire`](Self::fire) after `config().debounce`.
    pub fn on_visibility(&mut self, visible: bool) -> Option<Ticket> {
        if !self.is_attached() {
            return None;
        }
        self.intersecting = visible;
        if !visible {
            return None;
        }
        if self.processing {
            tracing::debug!("Load more blocked: already processing");
            return None;
        }
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// Claim the trigger for `ticket`. True only for the most recent
    /// ticket, while attached and not already processing; the caller then
    /// runs its callback and schedules [`finish`](Self::finish) after
    /// `config().cooldown`.
    pub fn fire(&mut self, ticket: Ticket) -> bool {
        if self.pending != Some(ticket) || self.processing || !self.is_attached()
        {
            return false;
        }
        self.pending = None;
        self.processing = true;
        true
    }

    /// End the processing window opened by a successful `fire`.
    pub fn finish(&mut self) {
        self.processing = false;
    }
}

impl<O: Observation> Drop for ScrollTrigger<O> {
    fn drop(&mut self) {
        self.detach();
    }
}
