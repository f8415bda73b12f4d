//! A small feedforward network engine with hand-written backpropagation.
//!
//! Networks are built from [`layer::Linear`] and [`layer::Relu`] layers followed by
//! a [`loss::LossCriterion`]. One sample flows through as a column vector.

pub mod config;
pub mod error;
pub mod layer;
pub mod loss;
pub mod matrix;
pub mod network;
pub mod optimizer;

pub use config::{load_config, TrainingConfig};
pub use error::{Error, Result, ShapeError};
pub use layer::{Layer, Linear, Relu};
pub use loss::{LossCriterion, MeanSquaredError};
pub use matrix::Matrix;
pub use network::Network;
pub use optimizer::{GradientDescent, Optimizer, UpdateDirection};

#[macro_export]
macro_rules! assert_rel_eq_arr1 {
    ($actual:expr, $expected:expr) => {
        assert_eq!($actual.shape(), $expected.shape());
        ndarray::Zip::from(&$actual)
            .and(&$expected)
            .for_each(|v, w| {
                assert_relative_eq!(v, w);
            });
    };
}

#[macro_export]
macro_rules! assert_rel_eq_arr2 {
    ($actual:expr, $expected:expr) => {
        assert_eq!($actual.shape(), $expected.shape());
        ndarray::Zip::from(&$actual)
            .and(&$expected)
            .for_each(|v, w| {
                assert_relative_eq!(v, w);
            });
    };
}
