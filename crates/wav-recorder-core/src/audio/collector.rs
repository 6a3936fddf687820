/// Fixed-length sample sink filled from the audio callback.
///
/// Accepts samples until `target_len` is reached and drops the rest, so a
/// callback that fires after completion cannot grow the buffer.
pub(crate) struct FrameCollector<T> {
    samples: Vec<T>,
    target_len: usize,
}

impl<T> FrameCollector<T> {
    pub fn new(target_len: usize) -> Self {
        Self {
            samples: Vec::with_capacity(target_len),
            target_len,
        }
    }

    /// Appends samples up to the target length.
    ///
    /// Returns `true` only on the call that fills the collector, so the
    /// completion signal is sent exactly once.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, data: I) -> bool {
        if self.is_full() {
            return false;
        }

        let remaining = self.target_len - self.samples.len();
        self.samples.extend(data.into_iter().take(remaining));

        self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.target_len
    }

    pub fn take(&mut self) -> Vec<T> {
        std::mem::take(&mut self.samples)
    }
}
