use std::cell::Cell;
use std::time::Duration;

use anyhow::anyhow;
use hoopsnap::retry::RetryPolicy;

#[test]
fn success_short_circuits_after_early_failures() {
    let calls = Cell::new(0u32);
    let policy = RetryPolicy::new(5, Duration::ZERO);

    let result = policy.run("flaky fetch", || {
        calls.set(calls.get() + 1);
        if calls.get() <= 2 {
            Err(anyhow!("service hiccup"))
        } else {
            Ok("payload")
        }
    });

    assert_eq!(result.expect("third attempt succeeds"), "payload");
    assert_eq!(calls.get(), 3);
}

#[test]
fn first_attempt_success_makes_one_call() {
    let calls = Cell::new(0u32);
    let policy = RetryPolicy::new(5, Duration::ZERO);

    let result = policy.run("steady fetch", || {
        calls.set(calls.get() + 1);
        Ok(42)
    });

    assert_eq!(result.expect("should succeed"), 42);
    assert_eq!(calls.get(), 1);
}

#[test]
fn exhausted_attempts_fail_terminally_with_the_operation_name() {
    let calls = Cell::new(0u32);
    let policy = RetryPolicy::new(4, Duration::ZERO);

    let result: anyhow::Result<()> = policy.run("shot locations fetch", || {
        calls.set(calls.get() + 1);
        Err(anyhow!("service down"))
    });

    assert_eq!(calls.get(), 4);
    let message = format!("{:#}", result.expect_err("should exhaust attempts"));
    assert!(message.contains("shot locations fetch"));
    assert!(message.contains("4 attempts"));
    assert!(message.contains("service down"));
}

#[test]
fn attempt_count_is_clamped_to_at_least_one() {
    let calls = Cell::new(0u32);
    let policy = RetryPolicy::new(0, Duration::ZERO);
    assert_eq!(policy.max_attempts(), 1);

    let result: anyhow::Result<()> = policy.run("single shot", || {
        calls.set(calls.get() + 1);
        Err(anyhow!("nope"))
    });

    assert!(result.is_err());
    assert_eq!(calls.get(), 1);
}
