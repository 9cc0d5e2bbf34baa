use std::time::{Duration, Instant};

/// Restart-on-edit timer: every `arm` pushes the deadline out again, so the
/// action only fires once the edits have been quiet for the full delay.
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(Duration::from_millis(400))
    }
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// True exactly once, when the armed deadline has passed.
    pub fn fire(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the deadline, for scheduling a repaint.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn does_not_fire_unarmed() {
        let mut debounce = Debounce::default();
        assert!(!debounce.fire());
    }

    #[test]
    fn rearming_pushes_the_deadline() {
        let mut debounce = Debounce::new(Duration::from_millis(30));
        debounce.arm();
        std::thread::sleep(Duration::from_millis(15));
        debounce.arm();
        assert!(!debounce.fire());
        std::thread::sleep(Duration::from_millis(40));
        assert!(debounce.fire());
        assert!(!debounce.fire(), "fires only once per arm");
    }
}
