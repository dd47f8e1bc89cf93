//! Property tests for scenario splitting, stream construction and signatures

use dronesig_core::{
    signature_dimension, DroneScenario, PathStream, SignatureBackend, StreamTransform,
    TensorSignature,
};
use proptest::prelude::*;

fn stream_rows(width: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(prop::collection::vec(-2.0f64..2.0, width), 2..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_split_counts_add_up(n in 0usize..5000, proportion in 0.0f64..=1.0) {
        let drone = DroneScenario::new(6000.0, 5.0, 0.3, 100.0, proportion);
        let split = drone.split(n);

        prop_assert_eq!(split.n_propeller + split.n_body, n);
        prop_assert_eq!(split.n_body, (n as f64 * proportion).floor() as usize);
    }

    #[test]
    fn prop_lead_lag_shape(samples in 1usize..300) {
        let x: Vec<f64> = (0..samples).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..samples).map(|i| -(i as f64)).collect();

        let stream = StreamTransform::PartialLeadLag.apply(&x, &y).unwrap();
        prop_assert_eq!(stream.width(), 3);
        prop_assert_eq!(stream.len(), 2 * samples - 1);

        for (j, row) in stream.rows().enumerate() {
            prop_assert_eq!(row[0], x[(j + 1) / 2]);
            prop_assert_eq!(row[1], y[(j + 1) / 2]);
            prop_assert_eq!(row[2], y[j / 2]);
        }
    }

    #[test]
    fn prop_signature_length(rows in stream_rows(3), level in 1usize..4) {
        let stream = PathStream::from_rows(&rows).unwrap();
        let signature = TensorSignature.compute_signature(&stream, level).unwrap();

        prop_assert_eq!(signature.len(), signature_dimension(3, level));
        prop_assert_eq!(signature.as_slice()[0], 1.0);
    }

    #[test]
    fn prop_first_level_is_total_increment(rows in stream_rows(2)) {
        let stream = PathStream::from_rows(&rows).unwrap();
        let signature = TensorSignature.compute_signature(&stream, 2).unwrap();
        let level_one = signature.level(1).unwrap();

        for channel in 0..2 {
            let increment = rows[rows.len() - 1][channel] - rows[0][channel];
            prop_assert!((level_one[channel] - increment).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_symmetric_part_of_level_two(rows in stream_rows(2)) {
        // S(ij) + S(ji) = Δi·Δj for any path
        let stream = PathStream::from_rows(&rows).unwrap();
        let signature = TensorSignature.compute_signature(&stream, 2).unwrap();
        let level_one = signature.level(1).unwrap();
        let level_two = signature.level(2).unwrap();

        for i in 0..2 {
            for j in 0..2 {
                let symmetric = level_two[i * 2 + j] + level_two[j * 2 + i];
                let product = level_one[i] * level_one[j];
                prop_assert!((symmetric - product).abs() < 1e-8 * product.abs().max(1.0));
            }
        }
    }
}
