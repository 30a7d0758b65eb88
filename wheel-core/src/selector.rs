//! Report layout selection.
//!
//! The layout is chosen once and then held: host drivers bind report fields
//! by position and do not cope with the layout changing mid-stream.

use crate::config::LayoutSelection;
use wheel_report::ReportKind;

/// Debounced mode-select lines; `true` means active (pulled low).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeLines {
    pub line0: bool,
    pub line1: bool,
}

impl ModeLines {
    /// Layout strapped by the lines.
    ///
    /// | line0 | line1 | Layout |
    /// |-------|-------|--------|
    /// | -     | -     | CombinedControls |
    /// | x     | -     | SteeringPad |
    /// | -     | x     | GamePad |
    /// | x     | x     | CombinedControls |
    #[must_use]
    pub const fn decode(self) -> ReportKind {
        match (self.line0, self.line1) {
            (true, false) => ReportKind::SteeringPad,
            (false, true) => ReportKind::GamePad,
            _ => ReportKind::CombinedControls,
        }
    }
}

/// Chooses and latches the active report layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportSelector {
    selection: LayoutSelection,
    latched: Option<ReportKind>,
}

impl ReportSelector {
    #[must_use]
    pub const fn new(selection: LayoutSelection) -> Self {
        Self {
            selection,
            latched: None,
        }
    }

    /// Return the active layout, latching it from `lines` if none is held.
    ///
    /// A fixed selection ignores `lines`.
    pub fn select(&mut self, lines: ModeLines) -> ReportKind {
        if let Some(kind) = self.latched {
            return kind;
        }
        let kind = match self.selection {
            LayoutSelection::Fixed(kind) => kind,
            LayoutSelection::ModeLines => lines.decode(),
        };
        info!("report layout latched: {:?}", kind);
        self.latched = Some(kind);
        kind
    }

    /// The latched layout, if one has been selected.
    #[inline]
    #[must_use]
    pub const fn active(&self) -> Option<ReportKind> {
        self.latched
    }

    /// Release the latch so the next [`select`](Self::select) reads the
    /// lines again.
    pub fn reevaluate(&mut self) {
        self.latched = None;
    }

    #[inline]
    #[must_use]
    pub const fn selection(&self) -> LayoutSelection {
        self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn lines(line0: bool, line1: bool) -> ModeLines {
        ModeLines { line0, line1 }
    }

    #[test]
    fn test_mode_line_decoding() {
        assert_eq!(lines(false, false).decode(), ReportKind::CombinedControls);
        assert_eq!(lines(true, false).decode(), ReportKind::SteeringPad);
        assert_eq!(lines(false, true).decode(), ReportKind::GamePad);
        assert_eq!(lines(true, true).decode(), ReportKind::CombinedControls);
    }

    #[test]
    fn test_selection_is_latched() {
        let mut selector = ReportSelector::new(LayoutSelection::ModeLines);
        assert_eq!(selector.active(), None);
        assert_eq!(selector.select(lines(false, true)), ReportKind::GamePad);
        assert_eq!(selector.select(lines(true, false)), ReportKind::GamePad);
        assert_eq!(selector.active(), Some(ReportKind::GamePad));
    }

    #[test]
    fn test_reevaluate_reads_lines_again() {
        let mut selector = ReportSelector::new(LayoutSelection::ModeLines);
        selector.select(lines(false, true));
        selector.reevaluate();
        assert_eq!(selector.active(), None);
        assert_eq!(selector.select(lines(true, false)), ReportKind::SteeringPad);
    }

    #[test]
    fn test_fixed_selection_ignores_lines() {
        let mut selector = ReportSelector::new(LayoutSelection::Fixed(ReportKind::SteeringPad));
        assert_eq!(selector.select(lines(false, true)), ReportKind::SteeringPad);
        selector.reevaluate();
        assert_eq!(selector.select(lines(true, true)), ReportKind::SteeringPad);
    }
}
