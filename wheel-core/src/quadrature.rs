//! Quadrature decoding of the steering encoder.
//!
//! The two phases form a 2-bit Gray code `(a << 1) | b`. Moving forward the
//! code steps `00 -> 01 -> 11 -> 10 -> 00`; moving backward it runs the same
//! cycle the other way. A sample where both bits changed means at least one
//! edge was missed, so the direction is unknown and the step is dropped.

/// Result of comparing two consecutive phase pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    Forward,
    Backward,
    Still,
    /// Both phases changed between samples.
    Illegal,
}

impl Transition {
    /// Step contributed to the position counter.
    #[inline]
    #[must_use]
    pub const fn delta(self) -> i32 {
        match self {
            Transition::Forward => 1,
            Transition::Backward => -1,
            Transition::Still | Transition::Illegal => 0,
        }
    }
}

use Transition::{Backward as B, Forward as F, Illegal as X, Still as S};

/// Indexed by `(previous << 2) | next`.
const TRANSITIONS: [Transition; 16] = [
    // prev 00: next 00, 01, 10, 11
    S, F, B, X,
    // prev 01
    B, S, X, F,
    // prev 10
    F, X, S, B,
    // prev 11
    X, B, F, S,
];

#[inline]
const fn phase_pair(a: bool, b: bool) -> u8 {
    ((a as u8) << 1) | b as u8
}

/// Classify the move from `previous` to `next` (both 2-bit phase pairs).
#[inline]
#[must_use]
pub const fn classify(previous: u8, next: u8) -> Transition {
    TRANSITIONS[(((previous & 0b11) << 2) | (next & 0b11)) as usize]
}

/// Encoder position and the last sampled phase pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderState {
    /// Net steps since start or the last reset.
    pub position: i32,
    /// Previous `(a << 1) | b`.
    pub phases: u8,
}

/// Polling quadrature decoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadratureDecoder {
    state: EncoderState,
    illegal: u32,
}

impl QuadratureDecoder {
    /// Decoder at position 0 with both phases assumed low.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: EncoderState {
                position: 0,
                phases: 0,
            },
            illegal: 0,
        }
    }

    /// Adopt the current phases without counting a step.
    pub fn sync(&mut self, phase_a: bool, phase_b: bool) {
        self.state.phases = phase_pair(phase_a, phase_b);
    }

    /// Feed one sample and return the step since the previous one.
    ///
    /// Returns `+1`, `-1` or `0`. Illegal transitions return `0`, leave the
    /// position untouched and are counted in [`illegal_transitions`].
    ///
    /// [`illegal_transitions`]: Self::illegal_transitions
    pub fn update(&mut self, phase_a: bool, phase_b: bool) -> i32 {
        let next = phase_pair(phase_a, phase_b);
        let transition = classify(self.state.phases, next);
        self.state.phases = next;

        if transition == Transition::Illegal {
            self.illegal = self.illegal.wrapping_add(1);
            trace!("encoder: illegal transition dropped");
        }

        let delta = transition.delta();
        self.state.position = self.state.position.wrapping_add(delta);
        delta
    }

    /// Zero the position counter. The phase history is kept.
    pub fn reset_position(&mut self) {
        self.state.position = 0;
    }

    #[inline]
    #[must_use]
    pub const fn position(&self) -> i32 {
        self.state.position
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> EncoderState {
        self.state
    }

    /// Number of dropped illegal transitions.
    #[inline]
    #[must_use]
    pub const fn illegal_transitions(&self) -> u32 {
        self.illegal
    }
}
