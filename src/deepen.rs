use crate::error::{Error, Result};
use ndarray::{Array1, Array2, Array4, ArrayView4};

/// Builds the weights for an identity convolution inserted directly after the
/// layer owning `weight`.
///
/// Given a kernel of shape `(units, inputs, kh, kw)`, returns a kernel of
/// shape `(units, units, kh, kw)` that is zero everywhere except a single 1
/// per channel at the spatial center, plus a zero bias. Convolved (with same
/// padding) against its own input, the new layer reproduces that input
/// exactly, so inserting it leaves the network's function unchanged.
///
/// **Errors**
///
/// [`UnsupportedKernelGeometry`](Error::UnsupportedKernelGeometry) if `kh` or
/// `kw` is even; such a kernel has no center and cannot be an identity.
pub fn deepen_conv2d(weight: ArrayView4<f32>) -> Result<(Array4<f32>, Array1<f32>)> {
    let (units, _, kh, kw) = weight.dim();
    if kh % 2 == 0 || kw % 2 == 0 {
        return Err(Error::UnsupportedKernelGeometry(kh, kw));
    }
    let mut kernel = Array4::zeros((units, units, kh, kw));
    for i in 0..units {
        kernel[[i, i, (kh - 1) / 2, (kw - 1) / 2]] = 1.;
    }
    Ok((kernel, Array1::zeros(units)))
}

/// Builds the weights for an identity fully connected layer of `units` units:
/// the identity matrix and a zero bias.
///
/// Function preservation additionally requires the activation applied to the
/// inserted layer to be idempotent on the incoming range. With ReLU this
/// holds exactly when the insertion point follows another ReLU, since the
/// incoming values are already non-negative. The caller is responsible for
/// that precondition; it is not checked here.
pub fn deepen_dense(units: usize) -> (Array2<f32>, Array1<f32>) {
    (Array2::eye(units), Array1::zeros(units))
}
