use crate::error::{Error, Result};
use ndarray::{Array1, Array2, Array4, ArrayView1, ArrayView2, ArrayView4};
use serde::{Deserialize, Serialize};

/// Weights of a fully connected layer.
///
/// The weight has shape `(inputs, outputs)` and the bias `(outputs,)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dense {
    weight: Array2<f32>,
    bias: Array1<f32>,
}

impl Dense {
    /// Creates a new [`Dense`] from `weight` and `bias`.
    ///
    /// **Errors**
    ///
    /// The bias length must equal the weight's output dimension.
    pub fn new(weight: Array2<f32>, bias: Array1<f32>) -> Result<Self> {
        if weight.ncols() != bias.len() {
            return Err(Error::ShapeMismatch {
                expected: weight.ncols(),
                found: bias.len(),
            });
        }
        Ok(Self { weight, bias })
    }
    /// The number of output units.
    pub fn units(&self) -> usize {
        self.weight.ncols()
    }
    /// The number of inputs.
    pub fn inputs(&self) -> usize {
        self.weight.nrows()
    }
    pub fn weight(&self) -> ArrayView2<f32> {
        self.weight.view()
    }
    pub fn bias(&self) -> ArrayView1<f32> {
        self.bias.view()
    }
    /// Consumes the layer, returning `(weight, bias)`.
    pub fn into_parts(self) -> (Array2<f32>, Array1<f32>) {
        (self.weight, self.bias)
    }
}

/// Weights of a 2d convolutional layer.
///
/// The weight has shape `(outputs, inputs, kernel_h, kernel_w)` and the bias
/// `(outputs,)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conv2d {
    weight: Array4<f32>,
    bias: Array1<f32>,
}

impl Conv2d {
    /// Creates a new [`Conv2d`] from `weight` and `bias`.
    ///
    /// **Errors**
    ///
    /// The bias length must equal the weight's output dimension.
    pub fn new(weight: Array4<f32>, bias: Array1<f32>) -> Result<Self> {
        if weight.shape()[0] != bias.len() {
            return Err(Error::ShapeMismatch {
                expected: weight.shape()[0],
                found: bias.len(),
            });
        }
        Ok(Self { weight, bias })
    }
    /// The number of output units (filters).
    pub fn units(&self) -> usize {
        self.weight.shape()[0]
    }
    /// The number of input channels.
    pub fn inputs(&self) -> usize {
        self.weight.shape()[1]
    }
    pub fn weight(&self) -> ArrayView4<f32> {
        self.weight.view()
    }
    pub fn bias(&self) -> ArrayView1<f32> {
        self.bias.view()
    }
    /// Consumes the layer, returning `(weight, bias)`.
    pub fn into_parts(self) -> (Array4<f32>, Array1<f32>) {
        (self.weight, self.bias)
    }
}

/// Weights of either layer kind, as stored in a [`WeightMap`](crate::WeightMap).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LayerWeights {
    Dense(Dense),
    Conv2d(Conv2d),
}

impl LayerWeights {
    /// The number of output units.
    pub fn units(&self) -> usize {
        match self {
            Self::Dense(dense) => dense.units(),
            Self::Conv2d(conv) => conv.units(),
        }
    }
}

impl From<Dense> for LayerWeights {
    fn from(dense: Dense) -> Self {
        Self::Dense(dense)
    }
}

impl From<Conv2d> for LayerWeights {
    fn from(conv: Conv2d) -> Self {
        Self::Conv2d(conv)
    }
}

/// Asserts that `next_weight` can consume `layer`'s output.
///
/// **Errors**
///
/// [`ShapeMismatch`](Error::ShapeMismatch) if `layer`'s output-unit count
/// differs from `next_weight`'s input dimension.
pub fn check_connected_dense(layer: &Dense, next_weight: &ArrayView2<f32>) -> Result<()> {
    if layer.units() != next_weight.nrows() {
        return Err(Error::ShapeMismatch {
            expected: layer.units(),
            found: next_weight.nrows(),
        });
    }
    Ok(())
}

/// Asserts that `next_weight` can consume `layer`'s output.
///
/// **Errors**
///
/// [`ShapeMismatch`](Error::ShapeMismatch) if `layer`'s filter count differs
/// from `next_weight`'s channel dimension.
pub fn check_connected_conv2d(layer: &Conv2d, next_weight: &ArrayView4<f32>) -> Result<()> {
    if layer.units() != next_weight.shape()[1] {
        return Err(Error::ShapeMismatch {
            expected: layer.units(),
            found: next_weight.shape()[1],
        });
    }
    Ok(())
}
