mod gradient_descent;

use crate::{
    error::ShapeError,
    matrix::{Matrix, MatrixView},
};

pub use gradient_descent::{GradientDescent, UpdateDirection};

/// Trait to abstract optimizers.
/// `update` must leave `weights` untouched when it returns an error.
pub trait Optimizer {
    fn update(&self, weights: &mut Matrix, gradient: MatrixView) -> Result<(), ShapeError>;
}
