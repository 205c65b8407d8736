/// Counts behind a "question n of m" indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// 1-based position of the current question; equals `total` once finished.
    pub position: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Share of questions answered, in `0.0..=1.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.answered as f64 / self.total as f64
    }
}
