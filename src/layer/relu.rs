use crate::{
    error::{Error, Result},
    matrix::{self, Matrix, MatrixView},
};

/// Rectified linear unit. Has no parameters, only the mask of the last forward input.
#[derive(Debug, Clone, Default)]
pub struct Relu {
    mask: Option<Matrix>,
}

impl Relu {
    pub fn new() -> Self {
        Self::default()
    }

    /// `1.0` where the last forward input was non-negative, `0.0` elsewhere.
    pub fn mask(&self) -> Option<&Matrix> {
        self.mask.as_ref()
    }

    pub fn forward(&mut self, inputs: MatrixView) -> Matrix {
        let (outputs, mask) = matrix::relu_forward(inputs);
        self.mask = Some(mask);
        outputs
    }

    pub fn backward(&self, upstream: MatrixView) -> Result<Matrix> {
        let mask = self.mask.as_ref().ok_or(Error::NotForwarded { layer: "Relu" })?;
        Ok(matrix::multiply_elementwise(upstream, mask.view())?)
    }
}

#[cfg(test)]
mod tests {
    use crate::assert_rel_eq_arr2;

    use super::*;
    use approx::assert_relative_eq;
    use ndarray::arr2;

    #[test]
    fn masks_negative_inputs() {
        let mut relu = Relu::new();
        let outputs = relu.forward(arr2(&[[-1.0], [2.0], [-3.0], [4.0]]).view());
        assert_rel_eq_arr2!(outputs, arr2(&[[0.0], [2.0], [0.0], [4.0]]));
        assert_rel_eq_arr2!(relu.mask().unwrap().clone(), arr2(&[[0.0], [1.0], [0.0], [1.0]]));

        let downstream = relu.backward(arr2(&[[5.0], [6.0], [7.0], [8.0]]).view()).unwrap();
        assert_rel_eq_arr2!(downstream, arr2(&[[0.0], [6.0], [0.0], [8.0]]));
    }

    #[test]
    fn zero_passes_gradient() {
        let mut relu = Relu::new();
        let outputs = relu.forward(arr2(&[[0.0]]).view());
        assert_rel_eq_arr2!(outputs, arr2(&[[0.0]]));
        let downstream = relu.backward(arr2(&[[3.0]]).view()).unwrap();
        assert_rel_eq_arr2!(downstream, arr2(&[[3.0]]));
    }

    #[test]
    fn backward_shape_mismatch() {
        let mut relu = Relu::new();
        relu.forward(Matrix::ones((3, 1)).view());
        let err = relu.backward(Matrix::ones((2, 1)).view()).unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
    }

    #[test]
    fn backward_before_forward() {
        let err = Relu::new().backward(Matrix::ones((1, 1)).view()).unwrap_err();
        assert!(matches!(err, Error::NotForwarded { layer: "Relu" }));
    }
}
