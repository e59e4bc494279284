mod support;

use pod_foreman::risk::risk_score;
use pod_foreman::scoring::dynamic_radius;
use pod_foreman::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn radius_is_bounded_and_non_increasing(a in 0u64..2_000_000, b in 0u64..2_000_000) {
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        let r_small = dynamic_radius(small);
        let r_large = dynamic_radius(large);

        prop_assert!((20.0..=80.0).contains(&r_small));
        prop_assert!((20.0..=80.0).contains(&r_large));
        prop_assert!(r_small >= r_large);
    }

    #[test]
    fn severity_raises_risk(
        population in 1_000u64..450_000,
        low in 0.5f64..2.0,
        step in 0.05f64..1.0,
        kind in prop_oneof![
            Just(ScenarioType::Pandemic),
            Just(ScenarioType::SevereWeather),
            Just(ScenarioType::InfrastructureFailure),
        ],
    ) {
        let point = DemandPoint::new("Town", "County", 45.0, -93.0, population);
        let mild = Scenario::new(kind, low).unwrap();
        let severe = Scenario::new(kind, low + step).unwrap();

        let mild_risk = risk_score(&point, Some(&mild));
        let severe_risk = risk_score(&point, Some(&severe));

        prop_assert!((0.0..=1.0).contains(&severe_risk));
        if severe_risk < 1.0 {
            prop_assert!(severe_risk > mild_risk);
        } else {
            prop_assert!(severe_risk >= mild_risk);
        }
    }

    #[test]
    fn fallback_matches_haversine(
        lat1 in 43.0f64..49.5, lon1 in -97.5f64..-89.0,
        lat2 in 43.0f64..49.5, lon2 in -97.5f64..-89.0,
    ) {
        let a = GeoLocation::new(lat1, lon1);
        let b = GeoLocation::new(lat2, lon2);
        let mut estimator = DriveTimeEstimator::closed_form(60.0);

        let minutes = estimator.estimate(a, b);
        prop_assert!((minutes - haversine_km(lat1, lon1, lat2, lon2)).abs() < 1e-9);
    }

    #[test]
    fn out_of_region_points_are_clamped(lat in -90.0f64..90.0, lon in -180.0f64..180.0) {
        let region = Region::minnesota();
        let clamped = region.bounds.clamp(GeoLocation::new(lat, lon));
        prop_assert!(region.bounds.contains(clamped));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn selection_respects_exclusion_and_count(count in 0usize..=12) {
        let data = support::minnesota_cities();
        let request = OptimizationRequest {
            num_facilities: count,
            enable_redundancy: false,
            ..OptimizationRequest::default()
        };

        let result = optimize_with(&request, &OptimizerConfig::default(), &data, &mut support::closed_form()).unwrap();

        prop_assert_eq!(result.pods.len() + result.shortfall, count);
        for (i, a) in result.pods.iter().enumerate() {
            for b in &result.pods[i + 1..] {
                prop_assert!(haversine_km(a.lat, a.lon, b.lat, b.lon) > 30.0);
            }
        }
    }
}
