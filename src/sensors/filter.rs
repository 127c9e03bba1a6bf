//! Moving-average filter for raw PPG samples.
//!
//! Fixed-capacity ring buffer with a maintained running sum, so each push is
//! O(1) regardless of window size.  The invariant `sum == Σ buffer` is kept
//! by subtracting the evicted slot before adding the new sample.

/// Largest supported window.  The backing array is this size; the active
/// window length is chosen at construction.
pub const MAX_WINDOW: usize = 32;

/// Fixed-window moving average over unsigned ADC counts.
///
/// The window starts zero-filled, so the first `size` outputs are means over
/// implicit leading zeros.  Sums are exact: `u16` samples into a `u32`
/// accumulator cannot overflow at `MAX_WINDOW`.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    buf: [u16; MAX_WINDOW],
    size: usize,
    head: usize,
    sum: u32,
}

impl MovingAverage {
    /// Create a filter with the given window length, clamped to
    /// `1..=MAX_WINDOW`.
    pub fn new(size: usize) -> Self {
        Self {
            buf: [0; MAX_WINDOW],
            size: size.clamp(1, MAX_WINDOW),
            head: 0,
            sum: 0,
        }
    }

    /// Insert a raw sample and return the mean of the last `size` samples.
    pub fn push(&mut self, raw: u16) -> f32 {
        self.sum -= u32::from(self.buf[self.head]);
        self.buf[self.head] = raw;
        self.sum += u32::from(raw);
        self.head = (self.head + 1) % self.size;
        self.sum as f32 / self.size as f32
    }

    /// Active window length.
    pub fn window(&self) -> usize {
        self.size
    }

    /// Zero-fill the window and clear the sum (boot-time state).
    pub fn reset(&mut self) {
        self.buf = [0; MAX_WINDOW];
        self.head = 0;
        self.sum = 0;
    }
}
