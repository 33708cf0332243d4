//! Backpropagation and gradient-descent behaviour of `train_step`.

use approx::assert_abs_diff_eq;
use backprop_nn::data::builtin;
use backprop_nn::{train_step, Matrix, MseLoss, NetError, Network};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Single sigmoid unit with weight and bias forced to zero.
fn zeroed_unit() -> Network {
    let mut net = Network::new(&[1, 1], &["sigmoid"], &mut rng(0)).unwrap();
    net.layers_mut()[0].weights = Matrix::zeros(1, 1);
    net
}

fn cost(net: &Network, input: &Matrix, expected: &Matrix) -> f64 {
    MseLoss::loss(&net.evaluate(input).unwrap(), expected).unwrap()
}

#[test]
fn single_unit_step_matches_hand_derivation() {
    // z = 0, a = 0.5, dC/dA = -0.5, dA/dZ = 0.25, dC/dZ = -0.125
    let mut net = zeroed_unit();
    let c = train_step(&mut net, &Matrix::column(&[1.0]), &Matrix::column(&[1.0]), 1.0).unwrap();
    assert_abs_diff_eq!(c, 0.125, epsilon = 1e-15);
    assert_abs_diff_eq!(net.layers()[0].weights.get(0, 0), 0.125, epsilon = 1e-15);
    assert_abs_diff_eq!(net.layers()[0].biases.get(0, 0), 0.125, epsilon = 1e-15);
}

#[test]
fn bias_gradient_sums_over_batch() {
    let mut net = zeroed_unit();
    let input = Matrix::from_rows(&[vec![1.0, 2.0]]).unwrap();
    let expected = Matrix::from_rows(&[vec![1.0, 1.0]]).unwrap();
    let c = train_step(&mut net, &input, &expected, 1.0).unwrap();

    // Cost is summed, not averaged, over the two samples.
    assert_abs_diff_eq!(c, 0.25, epsilon = 1e-15);
    assert_abs_diff_eq!(net.layers()[0].weights.get(0, 0), 0.375, epsilon = 1e-15);
    assert_abs_diff_eq!(net.layers()[0].biases.get(0, 0), 0.25, epsilon = 1e-15);
}

#[test]
fn gradients_match_finite_differences() {
    let net = Network::new(&[3, 4, 3, 2], &["tanh", "sigmoid", "sigmoid"], &mut rng(21)).unwrap();
    let mut r = rng(22);
    let input = Matrix::random_uniform(3, 5, -1.0, 1.0, &mut r);
    let expected = Matrix::random_uniform(2, 5, 0.0, 1.0, &mut r);

    // With a learning rate of 1 the parameter change is exactly the gradient.
    let mut stepped = net.clone();
    train_step(&mut stepped, &input, &expected, 1.0).unwrap();

    let h = 1e-5;
    for l in 0..net.layers().len() {
        let (rows, cols) = net.layers()[l].weights.shape();
        for i in 0..rows {
            for j in 0..cols {
                let w = net.layers()[l].weights.get(i, j);
                let mut plus = net.clone();
                plus.layers_mut()[l].weights.set(i, j, w + h);
                let mut minus = net.clone();
                minus.layers_mut()[l].weights.set(i, j, w - h);
                let numeric = (cost(&plus, &input, &expected) - cost(&minus, &input, &expected)) / (2.0 * h);
                let analytic = w - stepped.layers()[l].weights.get(i, j);
                assert_abs_diff_eq!(analytic, numeric, epsilon = 1e-7);
            }

            let b = net.layers()[l].biases.get(i, 0);
            let mut plus = net.clone();
            plus.layers_mut()[l].biases.set(i, 0, b + h);
            let mut minus = net.clone();
            minus.layers_mut()[l].biases.set(i, 0, b - h);
            let numeric = (cost(&plus, &input, &expected) - cost(&minus, &input, &expected)) / (2.0 * h);
            let analytic = b - stepped.layers()[l].biases.get(i, 0);
            assert_abs_diff_eq!(analytic, numeric, epsilon = 1e-7);
        }
    }
}

#[test]
fn returned_cost_is_pre_update_half_squared_error() {
    let mut net = Network::new(&[4, 5, 3], &["relu", "sigmoid"], &mut rng(30)).unwrap();
    let mut r = rng(31);
    let input = Matrix::random_uniform(4, 6, 0.0, 1.0, &mut r);
    let expected = Matrix::random_uniform(3, 6, 0.0, 1.0, &mut r);

    let before = cost(&net, &input, &expected);
    let returned = train_step(&mut net, &input, &expected, 0.1).unwrap();
    assert_abs_diff_eq!(returned, before, epsilon = 1e-12);
    assert!(returned >= 0.0);
}

#[test]
fn step_changes_weights_and_leaves_inputs_alone() {
    let mut net = Network::new(&[2, 3, 1], &["sigmoid", "sigmoid"], &mut rng(40)).unwrap();
    let before = net.clone();
    let (input, expected) = builtin::xor();
    let (input_copy, expected_copy) = (input.clone(), expected.clone());

    train_step(&mut net, &input, &expected, 0.5).unwrap();

    let changed = net
        .layers()
        .iter()
        .zip(before.layers())
        .any(|(a, b)| a.weights != b.weights);
    assert!(changed);
    assert_eq!(input, input_copy);
    assert_eq!(expected, expected_copy);
}

#[test]
fn zero_learning_rate_is_a_no_op() {
    let mut net = Network::new(&[2, 3, 1], &["tanh", "sigmoid"], &mut rng(41)).unwrap();
    let before = net.clone();
    let (input, expected) = builtin::xor();
    train_step(&mut net, &input, &expected, 0.0).unwrap();
    for (a, b) in net.layers().iter().zip(before.layers()) {
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.biases, b.biases);
    }
}

#[test]
fn cost_is_never_negative() {
    let mut r = rng(50);
    let mut net = Network::new(&[3, 4, 2], &["relu", "tanh"], &mut r).unwrap();
    for _ in 0..20 {
        let input = Matrix::random_uniform(3, 4, -3.0, 3.0, &mut r);
        let expected = Matrix::random_uniform(2, 4, -3.0, 3.0, &mut r);
        assert!(train_step(&mut net, &input, &expected, 0.05).unwrap() >= 0.0);
    }
}

#[test]
fn shape_errors_leave_network_unchanged() {
    let mut net = Network::new(&[2, 3, 1], &["sigmoid", "sigmoid"], &mut rng(60)).unwrap();
    let before = net.clone();
    let (input, _) = builtin::xor();

    let wrong_batch = Matrix::zeros(1, 3);
    assert!(matches!(
        train_step(&mut net, &input, &wrong_batch, 0.5),
        Err(NetError::DimensionMismatch { op: "train_step", .. })
    ));
    let wrong_features = Matrix::zeros(3, 4);
    assert!(train_step(&mut net, &wrong_features, &Matrix::zeros(1, 4), 0.5).is_err());

    for (a, b) in net.layers().iter().zip(before.layers()) {
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.biases, b.biases);
    }
}

#[test]
fn learns_xor() {
    let mut net = Network::new(&[2, 3, 1], &["sigmoid", "sigmoid"], &mut rng(1)).unwrap();
    let (input, expected) = builtin::xor();

    let first = train_step(&mut net, &input, &expected, 0.5).unwrap();
    let mut last = first;
    for _ in 0..20_000 {
        last = train_step(&mut net, &input, &expected, 0.5).unwrap();
    }
    assert!(last < first);

    let out = net.evaluate(&input).unwrap();
    // Columns are [0,0], [0,1], [1,0], [1,1].
    assert!(out.get(0, 0) < 0.5, "{}", out);
    assert!(out.get(0, 1) > 0.5, "{}", out);
    assert!(out.get(0, 2) > 0.5, "{}", out);
    assert!(out.get(0, 3) < 0.5, "{}", out);
}
