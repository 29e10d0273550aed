//! Backoff schedule and attempt accounting for any retry policy.

use std::cell::RefCell;
use std::time::Duration;

use proptest::prelude::*;

use lookalike_core::retry::RetryPolicy;

fn policy() -> impl Strategy<Value = RetryPolicy> {
    (0u32..8, 0u64..10_000, 1.0f64..4.0).prop_map(|(max_attempts, base_ms, multiplier)| {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(base_ms),
            backoff_multiplier: multiplier,
        }
    })
}

proptest! {
    #[test]
    fn delays_never_shrink(policy in policy(), retry in 0u32..10) {
        prop_assert!(policy.delay_for(retry + 1) >= policy.delay_for(retry));
    }

    #[test]
    fn retryable_failures_use_every_attempt(policy in policy()) {
        let slept = RefCell::new(Vec::new());
        let mut attempts = Vec::new();
        let result: Result<(), String> = policy.run_with_sleep(
            &mut |attempt| {
                attempts.push(attempt);
                Err(format!("busy {attempt}"))
            },
            |_| true,
            |d| slept.borrow_mut().push(d),
        );

        let expected = policy.max_attempts.max(1);
        prop_assert_eq!(attempts, (1..=expected).collect::<Vec<_>>());
        prop_assert_eq!(result.unwrap_err(), format!("busy {expected}"));
        let schedule: Vec<Duration> = (0..expected - 1).map(|n| policy.delay_for(n)).collect();
        prop_assert_eq!(slept.into_inner(), schedule);
    }

    #[test]
    fn fatal_failure_stops_after_one_call(policy in policy()) {
        let mut calls = 0u32;
        let result: Result<(), String> = policy.run_with_sleep(
            &mut |_| {
                calls += 1;
                Err("fatal".to_string())
            },
            |_| false,
            |_| panic!("no backoff for a fatal failure"),
        );
        prop_assert_eq!(calls, 1);
        prop_assert!(result.is_err());
    }
}
