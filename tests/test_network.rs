// Tests for network construction and inference.

use digit_scanner::{Example, FnnError, Matrix, Network, NodeCount};

fn column(values: &[f64]) -> Matrix {
    Matrix::column(values.to_vec())
}

#[test]
fn layer_shapes_follow_sizes() {
    let sizes = [7, 5, 4, 3];
    let net = Network::with_seed(&sizes, 42).unwrap();
    assert_eq!(net.layer_sizes(), &sizes);
    assert_eq!(net.nb_fully_connected_layers(), 3);
    assert_eq!(net.input_layer().nb_nodes(), 7);
    for k in 0..net.nb_fully_connected_layers() {
        let layer = net.fully_connected_layer(k);
        assert_eq!(layer.weights().shape(), (sizes[k + 1], sizes[k]));
        assert_eq!(layer.biases().shape(), (sizes[k + 1], 1));
        assert_eq!(layer.nb_nodes(), sizes[k + 1]);
        assert_eq!(net.previous_layer(k).nb_nodes(), sizes[k]);
    }
}

#[test]
fn construction_rejects_bad_topologies() {
    for sizes in [vec![], vec![5], vec![3, 0, 2], vec![0, 2]] {
        match Network::new(&sizes) {
            Err(FnnError::InvalidTopology(_)) => {}
            other => panic!("sizes {:?} gave {:?}", sizes, other.map(|n| n.layer_sizes().to_vec())),
        }
    }
}

#[test]
fn same_seed_same_network() {
    let a = Network::with_seed(&[4, 6, 2], 99).unwrap();
    let b = Network::with_seed(&[4, 6, 2], 99).unwrap();
    let c = Network::with_seed(&[4, 6, 2], 100).unwrap();
    for k in 0..2 {
        assert_eq!(a.fully_connected_layer(k).weights(), b.fully_connected_layer(k).weights());
        assert_eq!(a.fully_connected_layer(k).biases(), b.fully_connected_layer(k).biases());
    }
    assert_ne!(a.fully_connected_layer(0).weights(), c.fully_connected_layer(0).weights());
}

#[test]
fn feedforward_is_deterministic() {
    let net = Network::with_seed(&[3, 4, 2], 5).unwrap();
    let x = column(&[0.2, -0.4, 0.9]);
    let first = net.feedforward(&x).unwrap();
    for _ in 0..5 {
        assert_eq!(net.feedforward(&x).unwrap(), first);
    }
}

#[test]
fn outputs_lie_strictly_inside_unit_interval() {
    let net = Network::with_seed(&[10, 8, 5], 17).unwrap();
    for s in 0..20 {
        let x = Matrix::column((0..10).map(|i| ((i * 7 + s * 3) % 11) as f64 / 5.0 - 1.0).collect());
        let y = net.feedforward(&x).unwrap();
        assert_eq!(y.shape(), (5, 1));
        assert!(y.as_slice().iter().all(|&v| v > 0.0 && v < 1.0));
    }
}

#[test]
fn complete_trace_starts_with_input_and_ends_with_output() {
    let net = Network::with_seed(&[3, 4, 4, 2], 8).unwrap();
    let x = column(&[1.0, 0.0, 0.5]);
    let trace = net.feedforward_complete(&x).unwrap();
    assert_eq!(trace.len(), 4);
    assert_eq!(trace[0], x);
    assert_eq!(trace[1].shape(), (4, 1));
    assert_eq!(trace[3], net.feedforward(&x).unwrap());
}

#[test]
fn inference_rejects_wrong_input_shape() {
    let net = Network::with_seed(&[3, 2], 1).unwrap();
    assert!(matches!(
        net.feedforward(&column(&[1.0, 2.0])),
        Err(FnnError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        net.feedforward_complete(&Matrix::zeros(1, 3)),
        Err(FnnError::ShapeMismatch { .. })
    ));
}

#[test]
fn known_parameters_give_known_output() {
    let net = Network::from_parameters(
        &[2, 1],
        vec![Matrix::from_data(vec![vec![1.0, -1.0]])],
        vec![Matrix::column(vec![0.5])],
    )
    .unwrap();
    let y = net.feedforward(&column(&[2.0, 2.5])).unwrap();
    assert_eq!(y[(0, 0)], 0.5);
}

#[test]
fn from_parameters_checks_chain_consistency() {
    let err = Network::from_parameters(
        &[2, 3, 1],
        vec![Matrix::zeros(3, 2), Matrix::zeros(1, 2)],
        vec![Matrix::zeros(3, 1), Matrix::zeros(1, 1)],
    );
    assert!(matches!(err, Err(FnnError::ShapeMismatch { .. })));

    let err = Network::from_parameters(&[2, 3, 1], vec![Matrix::zeros(3, 2)], vec![Matrix::zeros(3, 1)]);
    assert!(matches!(err, Err(FnnError::InvalidTopology(_))));
}

#[test]
fn check_example_flags_wrong_output() {
    let net = Network::with_seed(&[2, 3], 1).unwrap();
    let bad = Example::from_vecs(vec![0.0, 1.0], vec![1.0, 0.0]);
    assert!(matches!(net.check_example(&bad), Err(FnnError::InvalidTrainingInput(_))));
    let good = Example::one_hot(column(&[0.0, 1.0]), 2, 3);
    assert!(net.check_example(&good).is_ok());
}
