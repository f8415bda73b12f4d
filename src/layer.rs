mod linear;
mod relu;

pub use linear::Linear;
pub use relu::Relu;

use crate::{
    error::{Result, ShapeError},
    matrix::{Matrix, MatrixView},
    optimizer::Optimizer,
};

/// A unit of the network placed between the input and the loss.
#[derive(Debug, Clone)]
pub enum Layer {
    Linear(Linear),
    Relu(Relu),
}

impl Layer {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear(_) => "Linear",
            Self::Relu(_) => "Relu",
        }
    }

    /// Whether the layer owns weights touched by the update pass.
    pub fn is_trainable(&self) -> bool {
        matches!(self, Self::Linear(_))
    }

    /// Output shape for an input of shape `input`, without touching any state.
    pub fn output_dim(&self, input: (usize, usize)) -> std::result::Result<(usize, usize), ShapeError> {
        match self {
            Self::Linear(linear) => linear.output_dim(input),
            Self::Relu(_) => Ok(input),
        }
    }

    pub fn forward(&mut self, inputs: MatrixView) -> Result<Matrix> {
        match self {
            Self::Linear(linear) => linear.forward(inputs),
            Self::Relu(relu) => Ok(relu.forward(inputs)),
        }
    }

    pub fn backward(&self, upstream: MatrixView) -> Result<Matrix> {
        match self {
            Self::Linear(linear) => linear.backward(upstream),
            Self::Relu(relu) => relu.backward(upstream),
        }
    }

    /// Derivative of the layer's output w.r.t. its input recorded at forward time:
    /// `W^T` for `Linear`, the 0/1 mask for `Relu`.
    pub fn local_grad(&self) -> Option<&Matrix> {
        match self {
            Self::Linear(linear) => linear.local_grad(),
            Self::Relu(relu) => relu.mask(),
        }
    }

    /// Hand the gradient w.r.t. this layer's output to the layer. Only `Linear` keeps it.
    pub fn set_grad(&mut self, upstream: MatrixView) -> Result<()> {
        match self {
            Self::Linear(linear) => linear.set_grad(upstream),
            Self::Relu(_) => Ok(()),
        }
    }

    pub fn weight_grad(&self) -> Option<&Matrix> {
        match self {
            Self::Linear(linear) => linear.weight_grad(),
            Self::Relu(_) => None,
        }
    }

    pub fn update_weight(&mut self, learning_rate: f64) -> Result<()> {
        match self {
            Self::Linear(linear) => linear.update_weight(learning_rate),
            Self::Relu(_) => Ok(()),
        }
    }

    pub fn update_with<O: Optimizer>(&mut self, optimizer: &O) -> Result<()> {
        match self {
            Self::Linear(linear) => linear.update_with(optimizer),
            Self::Relu(_) => Ok(()),
        }
    }
}

impl From<Linear> for Layer {
    fn from(linear: Linear) -> Self {
        Self::Linear(linear)
    }
}

impl From<Relu> for Layer {
    fn from(relu: Relu) -> Self {
        Self::Relu(relu)
    }
}
