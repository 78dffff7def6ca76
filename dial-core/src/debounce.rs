//! Single-threshold debounce filter for one digital line.

/// Debounced state of one raw digital input line.
///
/// The raw line is sampled once per tick. While the sample agrees with the
/// current stable value, nothing happens. Once samples disagree for more
/// than the configured threshold of consecutive ticks, the stable value is
/// committed to the new level.
///
/// This is a low-pass filter with a single threshold, not a majority
/// filter: a glitch that persists past the threshold is accepted as real.
/// That trade-off is fine for the slow (≥10 ms) transitions of a rotary
/// dial when the poll tick is orders of magnitude shorter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebouncedLine {
    stable: bool,
    disagreement: u16,
}

impl DebouncedLine {
    /// New line with the given initial stable level.
    #[must_use]
    pub const fn new(initial: bool) -> Self {
        Self {
            stable: initial,
            disagreement: 0,
        }
    }

    /// Feed one raw sample; returns the (possibly updated) stable value.
    ///
    /// Deterministic and infallible: a pure function of the previous
    /// state, the counter, and the new sample.
    pub fn update(&mut self, raw: bool, threshold: u16) -> bool {
        if raw == self.stable {
            self.disagreement = 0;
        } else {
            self.disagreement = self.disagreement.saturating_add(1);
            if self.disagreement > threshold {
                self.stable = raw;
                self.disagreement = 0;
            }
        }
        self.stable
    }

    /// Current stable value without feeding a sample.
    #[inline]
    #[must_use]
    pub const fn stable(&self) -> bool {
        self.stable
    }
}
