//! Property-Based Tests for the Limiter Module

use proptest::prelude::*;
use std::sync::{Arc, Barrier};
use std::time::{Duration, Instant};

use crate::limiter::{Axis, SlidingWindowLimiter};

fn axis_strategy() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::Client), Just(Axis::Resource)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // A fresh key admits exactly max_events checks inside one window.
    #[test]
    fn prop_fresh_key_admits_exactly_max(
        max_events in 0usize..50,
        attempts in 0usize..100,
        axis in axis_strategy()
    ) {
        let limiter = SlidingWindowLimiter::new(max_events, Duration::from_secs(60));
        let now = Instant::now();

        let admitted = (0..attempts)
            .filter(|_| limiter.is_allowed_at(axis, "key", now))
            .count();

        prop_assert_eq!(admitted, attempts.min(max_events));
    }

    // Over any increasing sequence of instants, no window ever holds more than
    // max_events admitted events.
    #[test]
    fn prop_window_never_overfills(
        max_events in 1usize..10,
        window_ms in 10u64..500,
        gaps in prop::collection::vec(0u64..200, 1..80)
    ) {
        let window = Duration::from_millis(window_ms);
        let limiter = SlidingWindowLimiter::new(max_events, window);
        let start = Instant::now();
        let mut offset = 0u64;
        let mut admitted_at: Vec<u64> = Vec::new();

        for gap in gaps {
            offset += gap;
            if limiter.is_allowed_at(Axis::Client, "c", start + Duration::from_millis(offset)) {
                admitted_at.push(offset);
            }
            let in_window = admitted_at
                .iter()
                .filter(|&&t| offset - t < window_ms)
                .count();
            prop_assert!(in_window <= max_events);
        }
    }

    // An override on one resource never changes decisions for another.
    #[test]
    fn prop_override_is_isolated(
        override_max in 0usize..20,
        default_max in 1usize..40,
        attempts in 1usize..60
    ) {
        let limiter = SlidingWindowLimiter::new(default_max, Duration::from_secs(60));
        limiter.set_path_config("/overridden", override_max, Duration::from_secs(60));
        let now = Instant::now();

        let overridden = (0..attempts)
            .filter(|_| limiter.is_allowed_at(Axis::Resource, "/overridden", now))
            .count();
        let plain = (0..attempts)
            .filter(|_| limiter.is_allowed_at(Axis::Resource, "/plain", now))
            .count();

        prop_assert_eq!(overridden, attempts.min(override_max));
        prop_assert_eq!(plain, attempts.min(default_max));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // M simultaneous checks against one fresh key admit exactly min(M, N).
    #[test]
    fn prop_concurrent_admission_is_exact(max_events in 1usize..20, threads in 2usize..40) {
        let limiter = Arc::new(SlidingWindowLimiter::new(max_events, Duration::from_secs(60)));
        let barrier = Arc::new(Barrier::new(threads));

        let admitted: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    let limiter = Arc::clone(&limiter);
                    let barrier = Arc::clone(&barrier);
                    scope.spawn(move || {
                        barrier.wait();
                        limiter.is_client_allowed("203.0.113.9")
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap() as usize).sum()
        });

        prop_assert_eq!(admitted, threads.min(max_events));
    }
}
