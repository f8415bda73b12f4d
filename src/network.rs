use log::{debug, info, trace};

use crate::{
    config::TrainingConfig,
    error::{Error, Result, ShapeError},
    layer::Layer,
    loss::{LossCriterion, MeanSquaredError},
    matrix::{Matrix, MatrixView},
    optimizer::{GradientDescent, Optimizer},
};

/// Ordered layers terminated by a loss.
///
/// A training step is `forward` → `backward` → `update`, always in that order.
#[derive(Debug)]
pub struct Network<L = MeanSquaredError> {
    layers: Vec<Layer>,
    // Positions of the `Linear` layers in `layers`, in increasing order.
    trainable: Vec<usize>,
    loss: L,
}

impl<L: LossCriterion> Network<L> {
    pub fn new(layers: Vec<Layer>, loss: L) -> Self {
        let trainable = layers
            .iter()
            .enumerate()
            .filter(|(_, layer)| layer.is_trainable())
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        info!(
            "network with {} layers ({} trainable)",
            layers.len(),
            trainable.len()
        );

        Self {
            layers,
            trainable,
            loss,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The `Linear` layers in execution order.
    pub fn trainable_layers(&self) -> impl Iterator<Item = &Layer> + '_ {
        self.trainable.iter().map(|&index| &self.layers[index])
    }

    pub fn loss(&self) -> &L {
        &self.loss
    }

    /// Shape of the final activation for an input of shape `input`.
    pub fn output_dim(&self, input: (usize, usize)) -> Result<(usize, usize)> {
        let mut dim = input;
        for layer in &self.layers {
            dim = layer.output_dim(dim)?;
        }
        Ok(dim)
    }

    /// Run the layers without the loss. Layer caches are refreshed as in `forward`,
    /// and the loss gradient of the previous step is discarded, so `backward` needs
    /// a new `forward` afterwards.
    pub fn predict(&mut self, input: MatrixView) -> Result<Matrix> {
        self.loss.reset();
        self.output_dim(input.dim())?;
        self.run_layers(input)
    }

    /// Returns the loss of `input` against `target`.
    /// On error no layer state is touched and the previous loss gradient is discarded.
    pub fn forward(&mut self, input: MatrixView, target: MatrixView) -> Result<f64> {
        self.loss.reset();
        let output_dim = self.output_dim(input.dim())?;
        if output_dim != target.dim() {
            return Err(ShapeError::new("network_target", output_dim, target.dim()).into());
        }

        let prediction = self.run_layers(input)?;
        let loss = self.loss.forward(prediction.view(), target)?;
        debug!("forward loss: {}", loss);
        Ok(loss)
    }

    fn run_layers(&mut self, input: MatrixView) -> Result<Matrix> {
        let mut activation = input.to_owned();
        for layer in self.layers.iter_mut() {
            activation = layer.forward(activation.view())?;
        }
        Ok(activation)
    }

    /// Propagate the loss gradient through the layers in reverse and fill in
    /// the weight gradient of every `Linear` layer.
    pub fn backward(&mut self) -> Result<()> {
        let seed = self
            .loss
            .grad()
            .ok_or(Error::NotForwarded { layer: "Loss" })?
            .clone();

        // upstreams[i] is the gradient w.r.t. the output of layers[i].
        let mut upstreams = Vec::with_capacity(self.layers.len());
        let mut upstream = seed;
        for (index, layer) in self.layers.iter().enumerate().rev() {
            let downstream = layer.backward(upstream.view())?;
            trace!(
                "backward {}#{}: {:?} -> {:?}",
                layer.name(),
                index,
                upstream.dim(),
                downstream.dim()
            );
            upstreams.push(upstream);
            upstream = downstream;
        }
        upstreams.reverse();

        for &index in &self.trainable {
            self.layers[index].set_grad(upstreams[index].view())?;
        }
        debug!("weight gradients set for {} layers", self.trainable.len());
        Ok(())
    }

    /// Gradient descent on every `Linear` layer with `learning_rate`.
    pub fn update(&mut self, learning_rate: f64) -> Result<()> {
        self.update_with(&GradientDescent::new(learning_rate))
    }

    pub fn update_with<O: Optimizer>(&mut self, optimizer: &O) -> Result<()> {
        // All gradients must be present before any weight moves.
        if self
            .trainable
            .iter()
            .any(|&index| self.layers[index].weight_grad().is_none())
        {
            return Err(Error::NotForwarded { layer: "Linear" });
        }

        for &index in &self.trainable {
            self.layers[index].update_with(optimizer)?;
        }
        debug!("updated {} layers", self.trainable.len());
        Ok(())
    }

    /// One full step: `forward`, `backward`, then `update` as described by `config`.
    pub fn train_step(
        &mut self,
        input: MatrixView,
        target: MatrixView,
        config: &TrainingConfig,
    ) -> Result<f64> {
        let loss = self.forward(input, target)?;
        self.backward()?;
        self.update_with(&GradientDescent::from_config(config))?;
        Ok(loss)
    }
}
