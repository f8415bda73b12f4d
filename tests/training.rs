use ami_nn::{
    assert_rel_eq_arr2, Error, Layer, Linear, MeanSquaredError, Network, Relu, TrainingConfig,
};
use approx::assert_relative_eq;
use ndarray::arr2;

fn first_weights(network: &Network) -> ndarray::Array2<f64> {
    match network.trainable_layers().next() {
        Some(Layer::Linear(linear)) => linear.weights().clone(),
        _ => panic!("network has no linear layer"),
    }
}

#[test]
fn one_step_from_config() {
    let linear = Linear::with_weights(2, 2, arr2(&[[1.0, 0.0], [0.0, 1.0]])).unwrap();
    let mut network = Network::new(vec![linear.into()], MeanSquaredError::new());
    let config = TrainingConfig::from_json(r#"{"learning_rate": 0.1}"#).unwrap();

    let loss = network
        .train_step(arr2(&[[1.0], [1.0]]).view(), arr2(&[[0.0], [0.0]]).view(), &config)
        .unwrap();
    assert_relative_eq!(2.0, loss);
    assert_rel_eq_arr2!(first_weights(&network), arr2(&[[0.8, -0.2], [-0.2, 0.8]]));

    // The step moved toward the target.
    let loss = network
        .forward(arr2(&[[1.0], [1.0]]).view(), arr2(&[[0.0], [0.0]]).view())
        .unwrap();
    assert_relative_eq!(0.72, loss, epsilon = 1e-12);
}

#[test]
fn linear_regression_converges() {
    let linear = Linear::with_weights(2, 1, arr2(&[[0.5, -0.5]])).unwrap();
    let mut network = Network::new(vec![linear.into()], MeanSquaredError::new());
    let input = arr2(&[[1.0], [2.0]]);
    let target = arr2(&[[3.0]]);

    let mut previous = f64::INFINITY;
    for _ in 0..100 {
        let loss = network.forward(input.view(), target.view()).unwrap();
        assert!(loss < previous);
        previous = loss;
        network.backward().unwrap();
        network.update(0.01).unwrap();
    }
    assert!(previous < 1e-6);

    let prediction = network.predict(input.view()).unwrap();
    assert_relative_eq!(3.0, prediction[[0, 0]], epsilon = 1e-3);
}

#[test]
fn hidden_relu_network_learns() {
    let mut network = Network::new(
        vec![
            Linear::with_weights(2, 3, arr2(&[[1.0, 0.0], [0.0, 1.0], [0.5, 0.5]]))
                .unwrap()
                .into(),
            Relu::new().into(),
            Linear::with_weights(3, 1, arr2(&[[0.1, 0.1, 0.1]])).unwrap().into(),
        ],
        MeanSquaredError::new(),
    );
    let input = arr2(&[[1.0], [2.0]]);
    let target = arr2(&[[2.0]]);
    let config = TrainingConfig::new(0.01);

    let first = network.train_step(input.view(), target.view(), &config).unwrap();
    let mut last = first;
    for _ in 0..500 {
        last = network.train_step(input.view(), target.view(), &config).unwrap();
    }
    assert!(last < first);
    assert!(last < 1e-4);
    assert_eq!(network.trainable_layers().count(), 2);
}

#[test]
fn miswired_network_fails() {
    let mut network = Network::new(
        vec![
            Linear::new(3, 4).into(),
            Relu::new().into(),
            Linear::new(2, 1).into(),
        ],
        MeanSquaredError::new(),
    );
    let err = network
        .forward(arr2(&[[1.0], [0.0], [1.0]]).view(), arr2(&[[0.0]]).view())
        .unwrap_err();
    assert!(matches!(err, Error::Shape(_)));
}
