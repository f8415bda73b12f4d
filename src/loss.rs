use ndarray::Zip;

use crate::{
    error::ShapeError,
    matrix::{Matrix, MatrixView},
};

/// Terminal stage of a network: reduces a prediction to a scalar and seeds backward.
pub trait LossCriterion {
    fn forward(&mut self, prediction: MatrixView, target: MatrixView) -> Result<f64, ShapeError>;

    /// Loss of the last forward call.
    fn value(&self) -> Option<f64>;

    /// Derivative of the loss w.r.t. each component of the last prediction.
    fn grad(&self) -> Option<&Matrix>;

    /// Forget the last forward call.
    fn reset(&mut self);
}

/// Sum of squared errors of a single sample, `sum_i (p_i - t_i)^2`.
#[derive(Debug, Clone, Default)]
pub struct MeanSquaredError {
    value: Option<f64>,
    grad: Option<Matrix>,
}

impl MeanSquaredError {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LossCriterion for MeanSquaredError {
    fn forward(&mut self, prediction: MatrixView, target: MatrixView) -> Result<f64, ShapeError> {
        if prediction.dim() != target.dim() {
            return Err(ShapeError::new("mse", prediction.dim(), target.dim()));
        }

        let loss = Zip::from(&prediction)
            .and(&target)
            .fold(0.0, |loss, &p, &t| loss + (p - t).powi(2));
        let grad = Zip::from(&prediction)
            .and(&target)
            .map_collect(|&p, &t| 2.0 * (p - t));

        self.value = Some(loss);
        self.grad = Some(grad);
        Ok(loss)
    }

    fn value(&self) -> Option<f64> {
        self.value
    }

    fn grad(&self) -> Option<&Matrix> {
        self.grad.as_ref()
    }

    fn reset(&mut self) {
        self.value = None;
        self.grad = None;
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_rel_eq_arr2;

    use super::*;

    use approx::assert_relative_eq;
    use ndarray::arr2;

    #[test]
    fn compute_mse() {
        let mut loss = MeanSquaredError::new();
        let value = loss
            .forward(arr2(&[[1.0], [2.0]]).view(), arr2(&[[0.0], [0.0]]).view())
            .unwrap();
        assert_relative_eq!(5.0, value);
        assert_relative_eq!(5.0, loss.value().unwrap());
        assert_rel_eq_arr2!(loss.grad().unwrap().clone(), arr2(&[[2.0], [4.0]]));
    }

    #[test]
    fn grad_sign_follows_difference() {
        let mut loss = MeanSquaredError::new();
        loss.forward(arr2(&[[0.5], [-1.0], [3.0]]).view(), arr2(&[[1.0], [-1.0], [1.0]]).view())
            .unwrap();
        assert_relative_eq!(4.25, loss.value().unwrap());
        assert_rel_eq_arr2!(loss.grad().unwrap().clone(), arr2(&[[-1.0], [0.0], [4.0]]));
    }

    #[test]
    fn reset_clears_state() {
        let mut loss = MeanSquaredError::new();
        loss.forward(arr2(&[[1.0]]).view(), arr2(&[[0.0]]).view()).unwrap();
        loss.reset();
        assert!(loss.value().is_none());
        assert!(loss.grad().is_none());
    }

    #[test]
    fn mismatched_lengths() {
        let mut loss = MeanSquaredError::new();
        let err = loss
            .forward(Matrix::zeros((3, 1)).view(), Matrix::zeros((2, 1)).view())
            .unwrap_err();
        assert_eq!(err, ShapeError::new("mse", (3, 1), (2, 1)));
        assert!(loss.value().is_none());
        assert!(loss.grad().is_none());
    }
}
