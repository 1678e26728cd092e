//! Property tests for break computation, classification and selection.

use proptest::prelude::*;

use choropleth_kernel::{
    ClassIndex, ClassificationMethod, ClassificationPolicy, Extent, Feature, FeatureClassifier,
    FeatureId, SelectionController, Viewport,
};

fn method() -> impl Strategy<Value = ClassificationMethod> {
    prop::sample::select(ClassificationMethod::ALL.to_vec())
}

/// Log-uniform over 1..1e10, the span of per-region case counts.
fn magnitude() -> impl Strategy<Value = f64> {
    (0.0f64..10.0).prop_map(|e| 10f64.powf(e))
}

fn observations() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(magnitude(), 6..80)
}

fn sorted_distinct(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v.dedup();
    v
}

fn ssd(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean) * (v - mean)).sum()
}

/// Within-class SSD of sorted `values` split at `thresholds`.
fn partition_ssd(values: &[f64], thresholds: &[f64]) -> f64 {
    let mut total = 0.0;
    let mut start = 0;
    for upper in thresholds {
        let end = values.partition_point(|v| v <= upper);
        total += ssd(&values[start..end]);
        start = end;
    }
    total
}

/// Minimum SSD over every partition of sorted `values` into `k` classes.
fn exhaustive_min(values: &[f64], k: usize) -> f64 {
    if k == 1 {
        return ssd(values);
    }
    (1..=values.len() - (k - 1))
        .map(|cut| ssd(&values[..cut]) + exhaustive_min(&values[cut..], k - 1))
        .fold(f64::INFINITY, f64::min)
}

fn distinct_count(values: &[f64]) -> usize {
    sorted_distinct(values).len()
}

proptest! {
    #[test]
    fn prop_compute_is_deterministic(obs in observations(), k in 2usize..=6, m in method()) {
        prop_assume!(distinct_count(&obs) >= k);
        let a = m.compute(&obs, k).unwrap();
        let b = m.compute(&obs, k).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_max_falls_in_last_class(obs in observations(), k in 2usize..=6, m in method()) {
        prop_assume!(distinct_count(&obs) >= k);
        let breaks = m.compute(&obs, k).unwrap();
        let max = obs.iter().copied().fold(f64::MIN, f64::max);

        prop_assert_eq!(breaks.len(), k);
        prop_assert_eq!(breaks.class_of(max), ClassIndex::new(k - 1));
        if m == ClassificationMethod::Pretty {
            prop_assert!(breaks.upper() >= max);
        } else {
            prop_assert_eq!(breaks.upper(), max);
        }
    }

    #[test]
    fn prop_natural_breaks_is_optimal(
        obs in prop::collection::vec(
            prop_oneof![
                (0.0f64..50.0).prop_map(|d| 1e8 + d.floor()),
                (0.0f64..50.0).prop_map(|d| 1.1e9 + d.floor()),
                magnitude(),
            ],
            3..=12,
        ),
        k in 2usize..=5,
    ) {
        let values = sorted_distinct(&obs);
        prop_assume!(values.len() >= k);
        let breaks = ClassificationMethod::NaturalBreaks.compute(&obs, k).unwrap();

        let found = partition_ssd(&values, breaks.thresholds());
        let best = exhaustive_min(&values, k);
        prop_assert!(found <= best * (1.0 + 1e-9) + 1e-6, "found={} best={}", found, best);
    }

    #[test]
    fn prop_class_of_is_monotonic(
        obs in observations(),
        k in 2usize..=6,
        m in method(),
        mut lookups in prop::collection::vec(
            prop_oneof![-10.0f64..1.0, (-1.0f64..11.0).prop_map(|e| 10f64.powf(e))],
            2..40,
        ),
    ) {
        prop_assume!(distinct_count(&obs) >= k);
        let breaks = m.compute(&obs, k).unwrap();
        lookups.sort_by(|a, b| a.total_cmp(b));

        let classes: Vec<ClassIndex> = lookups.iter().map(|&v| breaks.class_of(v)).collect();
        prop_assert!(classes.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(classes.iter().all(|c| c.get() < k));
    }

    #[test]
    fn prop_every_feature_is_assigned(
        values in prop::collection::vec(prop::option::of(magnitude()), 0..40),
        m in method(),
    ) {
        let features: Vec<Feature> = values
            .iter()
            .enumerate()
            .map(|(i, v)| Feature {
                id: FeatureId::new(format!("F{i}")),
                extent: Extent::new(0.0, 0.0, 1.0, 1.0),
                observation: *v,
            })
            .collect();
        let classifier = FeatureClassifier::new(ClassificationPolicy::with_method(m)).unwrap();
        let classification = classifier.classify_or_no_data(&features);

        prop_assert_eq!(classification.len(), features.len());
        if classification.table().is_some() {
            for f in &features {
                let assigned = classification.get(&f.id).unwrap();
                prop_assert_eq!(assigned.is_no_data(), f.observation.is_none());
            }
        }
    }

    #[test]
    fn prop_at_most_one_selection(ops in prop::collection::vec(prop::option::of(0usize..5), 1..30)) {
        let mut selection = SelectionController::default();
        let viewport = Viewport::new(500.0, 400.0);

        for op in ops {
            match op {
                Some(i) => {
                    let x = i as f64 * 10.0;
                    let feature = Feature::without_data(
                        format!("F{i}"),
                        Extent::new(x, 0.0, x + 3.0, 2.0),
                    );
                    let changed = selection.request_select(feature, &viewport).unwrap();
                    prop_assert_eq!(selection.selected_id(), Some(&changed.feature));
                }
                None => {
                    selection.clear();
                    prop_assert!(selection.selected().is_none());
                }
            }
        }
    }
}
