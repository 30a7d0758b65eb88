//! Per-channel debouncing of raw digital levels.
//!
//! A channel's reported level only changes after the raw level has differed
//! from it, without interruption, for `threshold` ticks. Any tick where the
//! raw level matches the reported level again abandons the pending change.

use crate::config::ChannelId;
use crate::Tick;

/// Debounce state of one channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceTimer {
    stable: bool,
    /// Tick at which the raw level first differed from `stable`.
    pending_since: Option<Tick>,
}

impl DebounceTimer {
    #[must_use]
    pub const fn new(initial: bool) -> Self {
        Self {
            stable: initial,
            pending_since: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn stable(&self) -> bool {
        self.stable
    }

    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    fn sample(&mut self, raw: bool, now: Tick, threshold: Tick) -> bool {
        if raw == self.stable {
            self.pending_since = None;
            return self.stable;
        }

        let since = *self.pending_since.get_or_insert(now);
        if now.wrapping_sub(since) >= threshold {
            self.stable = raw;
            self.pending_since = None;
        }
        self.stable
    }
}

/// Debouncer for up to `N` channels, indexed by [`ChannelId`].
///
/// Channels are independent; each keeps its own timer.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitalDebouncer<const N: usize> {
    timers: [DebounceTimer; N],
    threshold: Tick,
}

impl<const N: usize> DigitalDebouncer<N> {
    /// Create a debouncer with every channel reporting `initial`.
    ///
    /// Pulled-up inputs idle high, so `initial` is normally `true`.
    #[must_use]
    pub const fn new(threshold: Tick, initial: bool) -> Self {
        Self {
            timers: [DebounceTimer::new(initial); N],
            threshold,
        }
    }

    /// Feed one raw reading and return the channel's stable level.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is outside this debouncer's `N` channels.
    pub fn sample(&mut self, channel: ChannelId, raw_level: bool, now: Tick) -> bool {
        let threshold = self.threshold;
        self.timer_mut(channel).sample(raw_level, now, threshold)
    }

    /// The stable level without feeding a new reading.
    ///
    /// # Panics
    ///
    /// Panics if `channel` is outside this debouncer's `N` channels.
    #[must_use]
    pub fn stable(&self, channel: ChannelId) -> bool {
        self.timer(channel).stable()
    }

    #[inline]
    #[must_use]
    pub const fn threshold(&self) -> Tick {
        self.threshold
    }

    fn timer(&self, channel: ChannelId) -> &DebounceTimer {
        match self.timers.get(channel.index()) {
            Some(timer) => timer,
            None => panic!("channel outside debouncer range"),
        }
    }

    fn timer_mut(&mut self, channel: ChannelId) -> &mut DebounceTimer {
        match self.timers.get_mut(channel.index()) {
            Some(timer) => timer,
            None => panic!("channel outside debouncer range"),
        }
    }
}
