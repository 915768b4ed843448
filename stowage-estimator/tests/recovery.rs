use stowage_core::{GeneratorParams, Instance};
use stowage_estimator::{build_linear_system, SolveMode, VolumeEstimator};

fn params(noise_stddev: f64) -> GeneratorParams {
    GeneratorParams {
        num_items: 25,
        num_packages: 300,
        items_per_package: 5,
        noise_stddev,
        capacity: 30.0,
    }
}

#[test]
fn noiseless_system_recovers_true_volumes() {
    let instance = Instance::generate(&[11u8; 32], &params(0.0)).unwrap();
    let system = build_linear_system(&instance.catalog, &instance.packages);
    let estimates = VolumeEstimator::default().estimate(&system).unwrap();
    for (name, &truth) in &instance.true_volumes {
        assert!(
            (estimates[name] - truth).abs() < 1e-8,
            "{}: estimated {}, true {}",
            name,
            estimates[name],
            truth
        );
    }
}

#[test]
fn noisy_system_stays_finite_and_close() {
    let instance = Instance::generate(&[12u8; 32], &params(0.1)).unwrap();
    let system = build_linear_system(&instance.catalog, &instance.packages);
    let estimates = VolumeEstimator::default().estimate(&system).unwrap();
    assert_eq!(estimates.len(), instance.catalog.len());
    for (name, &truth) in &instance.true_volumes {
        let estimate = estimates[name];
        assert!(estimate.is_finite());
        // 300 observations of sigma 0.1 noise pin each volume well inside
        // a tenth of a unit.
        assert!(
            (estimate - truth).abs() < 0.1,
            "{}: estimated {}, true {}",
            name,
            estimate,
            truth
        );
    }
}

#[test]
fn both_modes_agree_when_the_interior_solution_is_positive() {
    // True volumes are >= 0.5, so with mild noise the unconstrained solve
    // already lands in the positive orthant and NNLS must not move it.
    let instance = Instance::generate(&[13u8; 32], &params(0.05)).unwrap();
    let system = build_linear_system(&instance.catalog, &instance.packages);
    let unconstrained = VolumeEstimator::new(SolveMode::Unconstrained)
        .estimate(&system)
        .unwrap();
    let non_negative = VolumeEstimator::new(SolveMode::NonNegative)
        .estimate(&system)
        .unwrap();
    for (name, &u) in &unconstrained {
        assert!(u > 0.0);
        assert!((u - non_negative[name]).abs() < 1e-8, "mode mismatch on {}", name);
    }
}
