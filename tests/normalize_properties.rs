use chrome_guard::devtools::session::TaskDurationReadings;
use chrome_guard::devtools::estimator::TabWork;
use chrome_guard::devtools::{normalize_shares, task_delta};
use proptest::prelude::*;

fn works(values: &[f64]) -> Vec<TabWork> {
    values
        .iter()
        .enumerate()
        .map(|(i, &work)| TabWork {
            title: format!("tab {i}"),
            url: format!("https://t{i}.example.com/"),
            work,
        })
        .collect()
}

proptest! {
    #[test]
    fn shares_sum_to_zero_or_hundred(
        values in prop::collection::vec(0.0f64..10_000.0, 0..40),
    ) {
        let shares = normalize_shares(works(&values));
        prop_assert_eq!(shares.len(), values.len());
        let sum: f64 = shares.iter().map(|s| s.cpu_percent).sum();
        prop_assert!(sum == 0.0 || (sum - 100.0).abs() < 1e-6, "sum {}", sum);
        for s in &shares {
            prop_assert!((0.0..=100.0 + 1e-9).contains(&s.cpu_percent));
        }
    }

    #[test]
    fn clamped_deltas_never_go_negative(
        pairs in prop::collection::vec((0.0f64..1e6, 0.0f64..1e6), 1..40),
    ) {
        let deltas: Vec<f64> = pairs
            .iter()
            .map(|&(first, second)| task_delta(TaskDurationReadings { first, second }))
            .collect();
        prop_assert!(deltas.iter().all(|d| *d >= 0.0));
        let shares = normalize_shares(works(&deltas));
        prop_assert!(shares.iter().all(|s| s.cpu_percent >= 0.0));
    }

    #[test]
    fn order_is_preserved(
        values in prop::collection::vec(0.0f64..100.0, 1..20),
    ) {
        let shares = normalize_shares(works(&values));
        for (i, share) in shares.iter().enumerate() {
            prop_assert_eq!(&share.title, &format!("tab {i}"));
        }
    }
}

#[test]
fn counter_reset_pair_contributes_nothing() {
    let reset = task_delta(TaskDurationReadings {
        first: 40.0,
        second: 0.5,
    });
    let busy = task_delta(TaskDurationReadings {
        first: 1.0,
        second: 3.0,
    });
    let shares = normalize_shares(works(&[reset, busy]));
    assert_eq!(shares[0].cpu_percent, 0.0);
    assert!((shares[1].cpu_percent - 100.0).abs() < 1e-9);
}
