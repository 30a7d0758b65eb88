//! Bootloader re-entry on a held select line.

use crate::config::BootloaderRequest;
use crate::Tick;

/// Platform call that restarts the chip into its USB bootloader.
///
/// On hardware this does not return. Test doubles may return; the monitor
/// treats the request as final either way.
pub trait BootloaderEntry {
    fn enter_bootloader(&mut self, indicator_mask: u32, disposition: u32);
}

/// Monitor state. `Triggered` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootselState {
    #[default]
    Normal,
    Triggered,
}

/// Watches the bootloader-select line.
///
/// The line must be active for `hold_ticks` consecutive ticks; with a hold
/// of 0 the first active tick triggers. Once triggered the monitor never
/// calls the entry again and reports [`BootselState::Triggered`] forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootselMonitor {
    hold_ticks: Tick,
    active_since: Option<Tick>,
    state: BootselState,
}

impl BootselMonitor {
    #[must_use]
    pub const fn new(hold_ticks: Tick) -> Self {
        Self {
            hold_ticks,
            active_since: None,
            state: BootselState::Normal,
        }
    }

    /// Feed the line level (`true` = active) for tick `now`.
    pub fn check<E: BootloaderEntry>(
        &mut self,
        active: bool,
        now: Tick,
        request: &BootloaderRequest,
        entry: &mut E,
    ) -> BootselState {
        if self.state == BootselState::Triggered {
            return self.state;
        }
        if !active {
            self.active_since = None;
            return self.state;
        }

        let since = *self.active_since.get_or_insert(now);
        if now.wrapping_sub(since) >= self.hold_ticks {
            warn!(
                "bootsel held: entering USB bootloader (mask {=u32:#x})",
                request.indicator_mask
            );
            self.state = BootselState::Triggered;
            entry.enter_bootloader(request.indicator_mask, request.disposition);
        }
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> BootselState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.state == BootselState::Triggered
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    #[derive(Default)]
    struct MockEntry {
        calls: Vec<(u32, u32)>,
    }

    impl BootloaderEntry for MockEntry {
        fn enter_bootloader(&mut self, indicator_mask: u32, disposition: u32) {
            self.calls.push((indicator_mask, disposition));
        }
    }

    const REQUEST: BootloaderRequest = BootloaderRequest {
        indicator_mask: 1 << 25,
        disposition: 0,
    };

    #[test]
    fn test_single_active_tick_triggers_once() {
        let mut monitor = BootselMonitor::new(0);
        let mut entry = MockEntry::default();

        assert_eq!(monitor.check(false, 0, &REQUEST, &mut entry), BootselState::Normal);
        assert_eq!(monitor.check(true, 1, &REQUEST, &mut entry), BootselState::Triggered);
        assert_eq!(monitor.check(false, 2, &REQUEST, &mut entry), BootselState::Triggered);
        assert_eq!(monitor.check(true, 3, &REQUEST, &mut entry), BootselState::Triggered);

        assert_eq!(entry.calls, [(1 << 25, 0)]);
    }

    #[test]
    fn test_hold_requires_consecutive_ticks() {
        let mut monitor = BootselMonitor::new(3);
        let mut entry = MockEntry::default();

        for now in 0..3 {
            monitor.check(true, now, &REQUEST, &mut entry);
        }
        monitor.check(false, 3, &REQUEST, &mut entry);
        assert!(!monitor.is_triggered());

        for now in 4..7 {
            monitor.check(true, now, &REQUEST, &mut entry);
        }
        assert!(!monitor.is_triggered());
        monitor.check(true, 7, &REQUEST, &mut entry);
        assert!(monitor.is_triggered());
        assert_eq!(entry.calls.len(), 1);
    }

    #[test]
    fn test_inactive_line_never_triggers() {
        let mut monitor = BootselMonitor::new(0);
        let mut entry = MockEntry::default();
        for now in 0..100 {
            monitor.check(false, now, &REQUEST, &mut entry);
        }
        assert_eq!(monitor.state(), BootselState::Normal);
        assert!(entry.calls.is_empty());
    }
}
