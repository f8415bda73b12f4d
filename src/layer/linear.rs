use ndarray::Array;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

use crate::{
    error::{Error, Result, ShapeError},
    matrix::{self, Matrix, MatrixView},
    optimizer::{GradientDescent, Optimizer},
};

/// Dense layer computing `y = W x` for a single column-vector sample.
///
/// `weights` has shape `(out_features, in_features)`.
#[derive(Debug, Clone)]
pub struct Linear {
    in_features: usize,
    out_features: usize,
    weights: Matrix,
    // Jacobian of the output w.r.t. the input, i.e. `W^T`.
    local_grad: Option<Matrix>,
    // The forward input broadcast to `(out_features, in_features)`, each row is `x^T`.
    inputs_broadcast: Option<Matrix>,
    weight_grad: Option<Matrix>,
}

impl Linear {
    pub fn new(in_features: usize, out_features: usize) -> Self {
        let weights = Array::random((out_features, in_features), Uniform::new(-1.0, 1.0));
        Self::from_parts(in_features, out_features, weights)
    }

    pub fn with_weights(
        in_features: usize,
        out_features: usize,
        weights: Matrix,
    ) -> std::result::Result<Self, ShapeError> {
        if weights.dim() != (out_features, in_features) {
            return Err(ShapeError::new(
                "linear_weights",
                weights.dim(),
                (out_features, in_features),
            ));
        }
        Ok(Self::from_parts(in_features, out_features, weights))
    }

    fn from_parts(in_features: usize, out_features: usize, weights: Matrix) -> Self {
        Self {
            in_features,
            out_features,
            weights,
            local_grad: None,
            inputs_broadcast: None,
            weight_grad: None,
        }
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn local_grad(&self) -> Option<&Matrix> {
        self.local_grad.as_ref()
    }

    /// Derivative of the loss w.r.t. the weights, available once the network has run backward.
    pub fn weight_grad(&self) -> Option<&Matrix> {
        self.weight_grad.as_ref()
    }

    /// `(out_features, 1)` for an `(in_features, 1)` input.
    pub fn output_dim(&self, input: (usize, usize)) -> std::result::Result<(usize, usize), ShapeError> {
        if input != (self.in_features, 1) {
            return Err(ShapeError::new("linear_forward", input, (self.in_features, 1)));
        }
        Ok((self.out_features, 1))
    }

    /// `inputs` must be a `(in_features, 1)` column.
    /// Overwrites every gradient cache from the previous step.
    pub fn forward(&mut self, inputs: MatrixView) -> Result<Matrix> {
        self.output_dim(inputs.dim())?;

        let outputs = matrix::matrix_multiply(self.weights.view(), inputs)?;
        let inputs_broadcast =
            matrix::repeat_column(matrix::transpose(inputs).view(), self.out_features)?;

        self.local_grad = Some(matrix::transpose(self.weights.view()));
        self.inputs_broadcast = Some(inputs_broadcast);
        self.weight_grad = None;
        Ok(outputs)
    }

    /// Maps the gradient w.r.t. this layer's output to the gradient w.r.t. its input.
    pub fn backward(&self, upstream: MatrixView) -> Result<Matrix> {
        let local_grad = self
            .local_grad
            .as_ref()
            .ok_or(Error::NotForwarded { layer: "Linear" })?;
        Ok(matrix::matrix_multiply(local_grad.view(), upstream)?)
    }

    /// Combine the gradient w.r.t. this layer's output with the recorded input,
    /// giving the outer product `upstream x^T`.
    pub fn set_grad(&mut self, upstream: MatrixView) -> Result<()> {
        let inputs_broadcast = self
            .inputs_broadcast
            .as_ref()
            .ok_or(Error::NotForwarded { layer: "Linear" })?;
        let upstream_broadcast = matrix::repeat_row(upstream, self.in_features)?;
        let weight_grad =
            matrix::multiply_elementwise(inputs_broadcast.view(), upstream_broadcast.view())?;
        self.weight_grad = Some(weight_grad);
        Ok(())
    }

    /// Plain gradient descent step with `learning_rate`.
    pub fn update_weight(&mut self, learning_rate: f64) -> Result<()> {
        self.update_with(&GradientDescent::new(learning_rate))
    }

    pub fn update_with<O: Optimizer>(&mut self, optimizer: &O) -> Result<()> {
        let weight_grad = self
            .weight_grad
            .as_ref()
            .ok_or(Error::NotForwarded { layer: "Linear" })?;
        optimizer.update(&mut self.weights, weight_grad.view())?;
        Ok(())
    }
}
