use digit_scanner::{CrossEntropyLoss, Example, Network, TrainConfig, train_loop};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut network = Network::with_seed(&[2, 3, 1], 7).expect("valid topology");

    let examples = vec![
        Example::from_vecs(vec![1.0, 0.0], vec![1.0]),
        Example::from_vecs(vec![1.0, 1.0], vec![0.0]),
        Example::from_vecs(vec![0.0, 1.0], vec![1.0]),
        Example::from_vecs(vec![0.0, 0.0], vec![0.0]),
    ];

    let config = TrainConfig::new(1000, 4, 2.0, 0.0).with_seed(1);

    for round in 0..10 {
        train_loop(&mut network, &examples, &config).expect("examples fit the network");
        let loss = CrossEntropyLoss::mean_loss(&network, &examples).expect("examples fit the network");
        println!("Epoch {}: loss = {:.6}", (round + 1) * config.epochs, loss);
    }

    for example in &examples {
        let output = network.feedforward(&example.input).expect("input fits the network");
        println!(
            "Input: {:?} -> Output: {:.4}",
            example.input.as_slice(),
            output[(0, 0)]
        );
    }
}
