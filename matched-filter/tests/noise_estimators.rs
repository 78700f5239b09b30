use assert_approx_eq::assert_approx_eq;
use matched_filter::{MeanMethod, NoiseSettings, StdMethod, noise::estimate};
use ndarray::{Array1, Axis, concatenate};
use profile_simulator::{NoiseSource, SimulationConfig, simulate_with_rng};
use rand::{SeedableRng, rngs::StdRng};

fn gaussian_noise(seed: u64, num_bins: usize, mean: f64, sd: f64) -> Array1<f64> {
    let config =
        SimulationConfig::new(1, num_bins).with_noise(NoiseSource::Gaussian { mean, sd });
    simulate_with_rng(&config, &mut StdRng::seed_from_u64(seed))
        .unwrap()
        .row(0)
        .to_owned()
}

#[test]
fn robust_to_outliers() {
    let clean = gaussian_noise(17, 1000, 5.0, 2.0);
    let profile = concatenate![Axis(0), clean, Array1::from_elem(10, 1000.0)];

    let noise = estimate(profile.view(), &NoiseSettings::default()).unwrap();
    assert_approx_eq!(noise.mu, 5.0, 0.25);
    assert_approx_eq!(noise.sigma, 2.0, 0.3);
    // The sample mean and deviation are dragged far away by the outliers.
    assert!(profile.mean().unwrap() > 10.0);
    assert!(profile.std(1.0) > 20.0);
}

#[test]
fn every_scale_estimator_recovers_sigma() {
    let profile = gaussian_noise(31, 5000, -3.0, 2.0);
    for std in [StdMethod::Iqr, StdMethod::Mad, StdMethod::DiffCov] {
        let settings = NoiseSettings::new(MeanMethod::Median, std);
        let noise = estimate(profile.view(), &settings).unwrap();
        assert_approx_eq!(noise.mu, -3.0, 0.1);
        assert_approx_eq!(noise.sigma, 2.0, 0.12);
    }
}

#[test]
fn difference_covariance_ignores_slow_baseline() {
    let noise = gaussian_noise(8, 4096, 0.0, 1.0);
    let profile = Array1::from_shape_fn(4096, |i| 50.0 * (i as f64 / 4096.0) + noise[i]);
    let settings = NoiseSettings::new(MeanMethod::Median, StdMethod::DiffCov);
    let result = estimate(profile.view(), &settings).unwrap();
    assert_approx_eq!(result.sigma, 1.0, 0.1);
}
