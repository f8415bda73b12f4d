use log::trace;
use ndarray::Zip;
use serde::Deserialize;

use crate::{
    config::TrainingConfig,
    error::ShapeError,
    matrix::{Matrix, MatrixView},
    optimizer::Optimizer,
};

/// Sign applied to the gradient when stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateDirection {
    /// `w <- w - lr * g`, minimizes the loss.
    #[default]
    Descent,
    /// `w <- w + lr * g`, maximizes the loss.
    Ascent,
}

impl UpdateDirection {
    fn sign(self) -> f64 {
        match self {
            Self::Descent => -1.0,
            Self::Ascent => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    learning_rate: f64,
    direction: UpdateDirection,
}

impl GradientDescent {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            direction: UpdateDirection::Descent,
        }
    }

    pub fn from_config(config: &TrainingConfig) -> Self {
        Self::new(config.learning_rate).with_direction(config.direction)
    }

    pub fn with_direction(self, direction: UpdateDirection) -> Self {
        Self { direction, ..self }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn direction(&self) -> UpdateDirection {
        self.direction
    }
}

impl Optimizer for GradientDescent {
    fn update(&self, weights: &mut Matrix, gradient: MatrixView) -> Result<(), ShapeError> {
        if weights.dim() != gradient.dim() {
            return Err(ShapeError::new("gradient_descent", weights.dim(), gradient.dim()));
        }

        let step = self.direction.sign() * self.learning_rate;
        trace!("{:?} step of {} over {:?} weights", self.direction, step, weights.dim());
        Zip::from(weights)
            .and(&gradient)
            .for_each(|w, &g| *w += step * g);
        Ok(())
    }
}
