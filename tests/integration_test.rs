use ndarray::{arr1, arr2};

use convnet::activations::Activation;
use convnet::builders::CnnBuilder;
use convnet::network::Cnn;
use convnet::rng::RandomSource;
use convnet::types::{Matrix1d, Matrix2d};

/// A hollow square, labeled 0.
fn digit_zero() -> Matrix2d {
    arr2(&[
        [1.0, 1.0, 1.0, 1.0],
        [1.0, 0.0, 0.0, 1.0],
        [1.0, 0.0, 0.0, 1.0],
        [1.0, 1.0, 1.0, 1.0],
    ])
}

/// A vertical bar, labeled 1.
fn digit_one() -> Matrix2d {
    arr2(&[
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
    ])
}

#[test]
fn test_train_and_predict_digits() {
    let mut rng = RandomSource::from_seed(42);
    let mut cnn = Cnn::new(
        4,
        2,
        Activation::Identity,
        2,
        1,
        Activation::Identity,
        &mut rng,
    )
    .unwrap();

    let inputs = vec![digit_zero(), digit_one()];
    let targets: Vec<Matrix1d> = vec![arr1(&[0.0]), arr1(&[1.0])];

    cnn.train(&inputs, &targets, 2000, 0.01, &mut rng).unwrap();

    // Directional correctness: each prediction lands closer to its own label
    // than to the other label.
    let zero_pred = cnn.predict(&inputs[0]).unwrap()[0];
    let one_pred = cnn.predict(&inputs[1]).unwrap()[0];
    assert!(
        zero_pred.abs() < (zero_pred - 1.0).abs(),
        "prediction for the hollow square was {}, not closer to 0",
        zero_pred
    );
    assert!(
        (one_pred - 1.0).abs() < one_pred.abs(),
        "prediction for the vertical bar was {}, not closer to 1",
        one_pred
    );
}

#[test]
fn test_train_and_predict_with_hidden_dense_layer() {
    let mut rng = RandomSource::from_seed(7);
    let mut cnn = CnnBuilder::new()
        .conv_input(4)
        .conv_kernel(2)
        .conv_activation(Activation::Identity)
        .pool_size(2)
        .dense_output(3)
        .dense_activation(Activation::Identity)
        .build(&mut rng)
        .unwrap();
    cnn.add_dense_layer(1, Activation::Identity, &mut rng)
        .unwrap();
    assert_eq!(cnn.output_size(), 1);

    let inputs = vec![digit_zero(), digit_one()];
    let targets: Vec<Matrix1d> = vec![arr1(&[0.0]), arr1(&[1.0])];

    // The hidden-layer backpropagation path runs on every example.
    cnn.train(&inputs, &targets, 100, 0.001, &mut rng).unwrap();

    let prediction = cnn.predict(&inputs[0]).unwrap();
    assert_eq!(prediction.len(), 1);
    assert!(prediction[0].is_finite());
}

#[test]
fn test_training_is_reproducible_under_a_fixed_seed() {
    let run = |seed: u64| -> f32 {
        let mut rng = RandomSource::from_seed(seed);
        let mut cnn = Cnn::new(
            4,
            2,
            Activation::Identity,
            2,
            1,
            Activation::Identity,
            &mut rng,
        )
        .unwrap();
        let inputs = vec![digit_zero(), digit_one()];
        let targets: Vec<Matrix1d> = vec![arr1(&[0.0]), arr1(&[1.0])];
        cnn.train(&inputs, &targets, 50, 0.01, &mut rng).unwrap();
        cnn.predict(&inputs[1]).unwrap()[0]
    };

    assert_eq!(run(3), run(3));
}
