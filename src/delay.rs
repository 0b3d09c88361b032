use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::time::Duration;

/// Shortest wait before the square turns green (inclusive)
pub const MIN_DELAY_MS: u64 = 2_000;
/// Upper bound of the wait (exclusive)
pub const MAX_DELAY_MS: u64 = 6_000;

/// Supplies the wait before each session turns ready
pub trait DelaySource {
    fn next_delay(&mut self) -> Duration;
}

/// Draw one delay uniformly from the delay window
pub fn sample_delay<R: Rng + ?Sized>(rng: &mut R) -> Duration {
    Duration::from_millis(rng.gen_range(MIN_DELAY_MS..MAX_DELAY_MS))
}

/// Random delays, one independent draw per session
#[derive(Debug, Clone)]
pub struct UniformDelay<R: Rng> {
    rng: R,
}

impl<R: Rng> UniformDelay<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl UniformDelay<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible sequence of delays
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DelaySource for UniformDelay<R> {
    fn next_delay(&mut self) -> Duration {
        sample_delay(&mut self.rng)
    }
}

/// Fixed delays handed out in order; the last one repeats once the queue runs dry
#[derive(Debug, Clone)]
pub struct ScriptedDelays {
    queue: VecDeque<Duration>,
    last: Duration,
}

impl ScriptedDelays {
    pub fn new<I: IntoIterator<Item = Duration>>(delays: I) -> Self {
        Self {
            queue: delays.into_iter().collect(),
            last: Duration::from_millis(MIN_DELAY_MS),
        }
    }

    pub fn from_millis<I: IntoIterator<Item = u64>>(delays: I) -> Self {
        Self::new(delays.into_iter().map(Duration::from_millis))
    }
}

impl DelaySource for ScriptedDelays {
    fn next_delay(&mut self) -> Duration {
        if let Some(delay) = self.queue.pop_front() {
            self.last = delay;
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scripted_delays_in_order_then_repeat_last() {
        let mut delays = ScriptedDelays::from_millis([3_000, 4_500]);

        assert_eq!(delays.next_delay(), Duration::from_millis(3_000));
        assert_eq!(delays.next_delay(), Duration::from_millis(4_500));
        assert_eq!(delays.next_delay(), Duration::from_millis(4_500));
    }

    #[test]
    fn empty_script_falls_back_to_minimum() {
        let mut delays = ScriptedDelays::new(Vec::<Duration>::new());
        assert_eq!(delays.next_delay(), Duration::from_millis(MIN_DELAY_MS));
    }

    #[test]
    fn seeded_delays_are_reproducible() {
        let mut a = UniformDelay::seeded(7);
        let mut b = UniformDelay::seeded(7);

        let first: Vec<Duration> = (0..20).map(|_| a.next_delay()).collect();
        let second: Vec<Duration> = (0..20).map(|_| b.next_delay()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn draws_vary_between_sessions() {
        let mut delays = UniformDelay::seeded(1234);
        let draws: Vec<Duration> = (0..50).map(|_| delays.next_delay()).collect();

        assert!(draws.windows(2).any(|w| w[0] != w[1]));
    }

    proptest! {
        #[test]
        fn uniform_delay_stays_in_window(seed in any::<u64>()) {
            let mut delays = UniformDelay::seeded(seed);
            for _ in 0..16 {
                let ms = delays.next_delay().as_millis() as u64;
                prop_assert!((MIN_DELAY_MS..MAX_DELAY_MS).contains(&ms));
            }
        }
    }
}
