// Tests for backpropagation and the mini-batch update: finite-difference
// gradient checks, batch splitting, parallel reduction and weight decay.

use approx::assert_relative_eq;
use digit_scanner::{CrossEntropyLoss, Example, FnnError, Gradients, Matrix, Network};

fn loss(net: &Network, example: &Example) -> f64 {
    let out = net.feedforward(&example.input).unwrap();
    CrossEntropyLoss::loss(&out, &example.output)
}

fn batch() -> Vec<Example> {
    vec![
        Example::from_vecs(vec![0.1, 0.9, 0.3], vec![1.0, 0.0]),
        Example::from_vecs(vec![0.8, 0.2, 0.5], vec![0.0, 1.0]),
        Example::from_vecs(vec![0.4, 0.4, 0.9], vec![1.0, 0.0]),
        Example::from_vecs(vec![0.0, 0.7, 0.1], vec![0.0, 1.0]),
    ]
}

#[test]
fn weight_gradients_match_finite_differences() {
    let net = Network::with_seed(&[2, 3, 1], 21).unwrap();
    let example = Example::from_vecs(vec![0.3, -0.7], vec![1.0]);
    let grads = net.backpropagation(&example).unwrap();
    let eps = 1e-5;

    for k in 0..net.nb_fully_connected_layers() {
        let (rows, cols) = net.fully_connected_layer(k).weights().shape();
        for i in 0..rows {
            for j in 0..cols {
                let mut plus = net.clone();
                plus.fully_connected_layer_mut(k).weights_mut()[(i, j)] += eps;
                let mut minus = net.clone();
                minus.fully_connected_layer_mut(k).weights_mut()[(i, j)] -= eps;

                let numeric = (loss(&plus, &example) - loss(&minus, &example)) / (2.0 * eps);
                assert_relative_eq!(grads.weights[k][(i, j)], numeric, epsilon = 1e-7);
            }
        }
    }
}

#[test]
fn bias_gradients_match_finite_differences() {
    let net = Network::with_seed(&[3, 4, 2], 4).unwrap();
    let example = Example::from_vecs(vec![0.5, 0.1, -0.2], vec![0.0, 1.0]);
    let grads = net.backpropagation(&example).unwrap();
    let eps = 1e-5;

    for k in 0..net.nb_fully_connected_layers() {
        for i in 0..net.fully_connected_layer(k).biases().rows() {
            let mut plus = net.clone();
            plus.fully_connected_layer_mut(k).biases_mut()[(i, 0)] += eps;
            let mut minus = net.clone();
            minus.fully_connected_layer_mut(k).biases_mut()[(i, 0)] -= eps;

            let numeric = (loss(&plus, &example) - loss(&minus, &example)) / (2.0 * eps);
            assert_relative_eq!(grads.biases[k][(i, 0)], numeric, epsilon = 1e-7);
        }
    }
}

#[test]
fn split_batches_sum_to_the_full_batch() {
    let net = Network::with_seed(&[3, 5, 2], 10).unwrap();
    let examples = batch();
    let refs: Vec<&Example> = examples.iter().collect();

    let full = net.batch_gradients(&refs).unwrap();
    let mut halves = net.batch_gradients(&refs[..2]).unwrap();
    halves.accumulate(&net.batch_gradients(&refs[2..]).unwrap());

    for (a, b) in full.weights.iter().chain(&full.biases).zip(halves.weights.iter().chain(&halves.biases)) {
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
    }
}

#[test]
fn worker_pool_gives_the_serial_sum() {
    let serial = Network::with_seed(&[3, 5, 2], 12).unwrap();
    let parallel = serial.clone().with_threads(3).unwrap();
    assert_eq!(parallel.threads(), 3);

    let examples = batch();
    let refs: Vec<&Example> = examples.iter().collect();
    assert_eq!(
        serial.batch_gradients(&refs).unwrap(),
        parallel.batch_gradients(&refs).unwrap()
    );
}

#[test]
fn batch_gradients_are_raw_sums() {
    let net = Network::with_seed(&[3, 4, 2], 2).unwrap();
    let examples = batch();
    let refs: Vec<&Example> = examples.iter().collect();

    let mut expected = Gradients::zeros(net.layer_sizes());
    for example in &examples {
        expected.accumulate(&net.backpropagation(example).unwrap());
    }
    assert_eq!(net.batch_gradients(&refs).unwrap(), expected);
}

#[test]
fn sgd_batch_applies_scaled_gradients() {
    let mut net = Network::with_seed(&[3, 4, 2], 6).unwrap();
    let examples = batch();
    let refs: Vec<&Example> = examples.iter().collect();
    let (eta, alpha, n) = (0.3, 0.2, 40);

    let before = net.clone();
    let grads = before.batch_gradients(&refs).unwrap();
    net.sgd_batch(&refs, n, eta, alpha).unwrap();

    let decay = 1.0 - alpha * eta / n as f64;
    let scale = eta / refs.len() as f64;
    for k in 0..net.nb_fully_connected_layers() {
        let w0 = before.fully_connected_layer(k).weights().as_slice();
        let w1 = net.fully_connected_layer(k).weights().as_slice();
        for ((a, b), g) in w0.iter().zip(w1).zip(grads.weights[k].as_slice()) {
            assert_relative_eq!(*b, a * decay - scale * g, epsilon = 1e-12);
        }
        let b0 = before.fully_connected_layer(k).biases().as_slice();
        let b1 = net.fully_connected_layer(k).biases().as_slice();
        for ((a, b), g) in b0.iter().zip(b1).zip(grads.biases[k].as_slice()) {
            assert_relative_eq!(*b, a - scale * g, epsilon = 1e-12);
        }
    }
}

#[test]
fn weight_decay_shrinks_weights_geometrically() {
    let mut net = Network::with_seed(&[3, 4, 2], 31).unwrap();
    let input = Matrix::column(vec![0.2, 0.6, 0.4]);
    let (eta, alpha, n) = (0.1, 0.5, 10);
    let factor = 1.0 - alpha * eta / n as f64;

    let w_start: Vec<Matrix> = (0..2).map(|k| net.fully_connected_layer(k).weights().clone()).collect();
    let b_start: Vec<Matrix> = (0..2).map(|k| net.fully_connected_layer(k).biases().clone()).collect();

    let steps = 5;
    for _ in 0..steps {
        // Expecting exactly what the network outputs makes every gradient zero.
        let target = net.feedforward(&input).unwrap();
        let example = Example::new(input.clone(), target);
        net.sgd_batch(&[&example], n, eta, alpha).unwrap();
    }

    for k in 0..2 {
        let layer = net.fully_connected_layer(k);
        for (w, w0) in layer.weights().as_slice().iter().zip(w_start[k].as_slice()) {
            assert_relative_eq!(*w, w0 * factor.powi(steps), epsilon = 1e-12);
        }
        assert_eq!(layer.biases(), &b_start[k]);
    }
}

#[test]
fn invalid_batches_leave_network_untouched() {
    let mut net = Network::with_seed(&[3, 2], 3).unwrap();
    let before = net.fully_connected_layer(0).weights().clone();

    assert!(matches!(
        net.sgd_batch(&[], 10, 0.1, 0.0),
        Err(FnnError::InvalidTrainingInput(_))
    ));

    let good = Example::from_vecs(vec![0.1, 0.2, 0.3], vec![1.0, 0.0]);
    let bad = Example::from_vecs(vec![0.1, 0.2, 0.3], vec![1.0, 0.0, 0.0]);
    assert!(matches!(
        net.sgd_batch(&[&good, &bad], 10, 0.1, 0.0),
        Err(FnnError::InvalidTrainingInput(_))
    ));
    assert!(matches!(
        net.sgd_batch(&[&good], 0, 0.1, 0.0),
        Err(FnnError::InvalidTrainingInput(_))
    ));

    assert_eq!(net.fully_connected_layer(0).weights(), &before);
}
