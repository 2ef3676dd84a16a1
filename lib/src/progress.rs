use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Helper struct for passing progress information to external callers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressStat {
    /// The current amount of work that has been done
    pub current: usize,
    /// The total amount of work to do
    pub total: usize,
}

impl ProgressStat {
    /// The progress as a percentage in `0..=100`
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.current.min(self.total) as u64 * 100) / self.total as u64) as u32
    }
}

/// Allows a fill run to update external callers with its progress
pub trait FillProgress {
    fn update(&mut self, stat: ProgressStat);
}

impl<G> FillProgress for G
where
    G: FnMut(ProgressStat) + Send,
{
    fn update(&mut self, stat: ProgressStat) {
        self(stat)
    }
}

/// A cooperative cancellation flag shared between the caller and a running
/// fill. Cloning shares the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn percent() {
        assert_eq!(ProgressStat { current: 0, total: 7 }.percent(), 0);
        assert_eq!(ProgressStat { current: 7, total: 7 }.percent(), 100);
        assert_eq!(ProgressStat { current: 1, total: 3 }.percent(), 33);
        assert_eq!(ProgressStat { current: 0, total: 0 }.percent(), 100);
    }

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_canceled());

        token.cancel();
        assert!(other.is_canceled());
    }
}
