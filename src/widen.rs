use crate::error::{Error, Result};
use crate::layer::{check_connected_conv2d, check_connected_dense, Conv2d, Dense};
use ndarray::{s, Array1, Array2, Array4, ArrayView2, ArrayView4, Axis};
use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Initializer for the new units of a widened layer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum WidenInit {
    /// Pads with weights drawn from `Normal(0, 0.1)` and biases fixed at 0.1.
    ///
    /// Does not preserve the teacher's function; the baseline to compare
    /// [`Net2Wider`](Self::Net2Wider) against.
    RandomPad,
    /// Replicates existing units and rescales their downstream contributions
    /// so the student computes the same function as the teacher.
    Net2Wider,
}

impl FromStr for WidenInit {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "random-pad" => Ok(Self::RandomPad),
            "net2wider" => Ok(Self::Net2Wider),
            _ => Err(Error::UnknownInit(s.to_string())),
        }
    }
}

fn check_width(width: usize, new_width: usize) -> Result<usize> {
    if new_width <= width {
        return Err(Error::InvalidWidth { width, new_width });
    }
    Ok(new_width - width)
}

/// Draws `n` unit indices uniformly with replacement from `[0, width)`.
fn replication_index<R: Rng>(width: usize, n: usize, rng: &mut R) -> Vec<usize> {
    Uniform::new(0, width)
        .sample_iter(rng)
        .take(n)
        .collect()
}

/// Per-unit downstream scale divisors, `occurrences + 1`.
///
/// A unit never drawn keeps divisor 1; a unit drawn `m` times contributes
/// through `m + 1` positions, each holding the original value divided by
/// `m + 1`, so the sum over all of them reconstructs the teacher's
/// contribution.
fn replication_factors(index: &[usize], width: usize) -> Vec<f32> {
    let mut counts = vec![0usize; width];
    for &i in index {
        counts[i] += 1;
    }
    counts.iter().map(|&c| (c + 1) as f32).collect()
}

/// Source unit for output position `j` of the widened layer.
///
/// Positions below the old width map to themselves, appended positions to the
/// replicated unit, in draw order.
fn source_unit(j: usize, width: usize, index: &[usize]) -> usize {
    if j < width {
        j
    } else {
        index[j - width]
    }
}

/// Widens a fully connected layer to `new_width` output units.
///
/// Returns the widened layer and the replacement weight for the immediately
/// downstream layer, shape `(new_width, next_outputs)`. The downstream bias
/// is unaffected. Inputs are never mutated.
///
/// With [`WidenInit::Net2Wider`] the student computes the same function as
/// the teacher; with [`WidenInit::RandomPad`] it does not.
///
/// **Errors**
///
/// [`ShapeMismatch`](Error::ShapeMismatch) if `next_weight` is not connected
/// to `layer`, [`InvalidWidth`](Error::InvalidWidth) if `new_width` does not
/// exceed the current width.
pub fn widen_dense<R: Rng>(
    layer: &Dense,
    next_weight: ArrayView2<f32>,
    new_width: usize,
    init: WidenInit,
    rng: &mut R,
) -> Result<(Dense, Array2<f32>)> {
    check_connected_dense(layer, &next_weight)?;
    let width = layer.units();
    let n = check_width(width, new_width)?;
    let inputs = layer.inputs();
    let next_outputs = next_weight.ncols();
    let mut weight = Array2::zeros((inputs, new_width));
    let mut bias = Array1::zeros(new_width);
    let mut next = Array2::zeros((new_width, next_outputs));
    match init {
        WidenInit::RandomPad => {
            let normal = Normal::new(0., 0.1).unwrap();
            weight.slice_mut(s![.., ..width]).assign(&layer.weight());
            weight
                .slice_mut(s![.., width..])
                .iter_mut()
                .zip(normal.sample_iter(&mut *rng))
                .for_each(|(x, r)| *x = r);
            bias.slice_mut(s![..width]).assign(&layer.bias());
            bias.slice_mut(s![width..]).fill(0.1);
            next.slice_mut(s![..width, ..]).assign(&next_weight);
            next.slice_mut(s![width.., ..])
                .iter_mut()
                .zip(normal.sample_iter(&mut *rng))
                .for_each(|(x, r)| *x = r);
        }
        WidenInit::Net2Wider => {
            let index = replication_index(width, n, rng);
            let factors = replication_factors(&index, width);
            for j in 0..new_width {
                let src = source_unit(j, width, &index);
                weight.column_mut(j).assign(&layer.weight().column(src));
                bias[j] = layer.bias()[src];
                next.row_mut(j)
                    .assign(&next_weight.row(src).mapv(|x| x / factors[src]));
            }
        }
    }
    Ok((Dense::new(weight, bias)?, next))
}

/// Widens a convolutional layer to `new_width` filters.
///
/// Returns the widened layer and the replacement kernel for the immediately
/// downstream convolution, shape `(next_filters, new_width, kh, kw)`. The
/// downstream bias is unaffected. Inputs are never mutated.
///
/// **Errors**
///
/// [`ShapeMismatch`](Error::ShapeMismatch) if `next_weight` is not connected
/// to `layer`, [`InvalidWidth`](Error::InvalidWidth) if `new_width` does not
/// exceed the current filter count.
pub fn widen_conv2d<R: Rng>(
    layer: &Conv2d,
    next_weight: ArrayView4<f32>,
    new_width: usize,
    init: WidenInit,
    rng: &mut R,
) -> Result<(Conv2d, Array4<f32>)> {
    check_connected_conv2d(layer, &next_weight)?;
    let width = layer.units();
    let n = check_width(width, new_width)?;
    let (_, inputs, kh, kw) = layer.weight().dim();
    let (next_filters, _, next_kh, next_kw) = next_weight.dim();
    let mut weight = Array4::zeros((new_width, inputs, kh, kw));
    let mut bias = Array1::zeros(new_width);
    let mut next = Array4::zeros((next_filters, new_width, next_kh, next_kw));
    match init {
        WidenInit::RandomPad => {
            let normal = Normal::new(0., 0.1).unwrap();
            weight
                .slice_mut(s![..width, .., .., ..])
                .assign(&layer.weight());
            weight
                .slice_mut(s![width.., .., .., ..])
                .iter_mut()
                .zip(normal.sample_iter(&mut *rng))
                .for_each(|(x, r)| *x = r);
            bias.slice_mut(s![..width]).assign(&layer.bias());
            bias.slice_mut(s![width..]).fill(0.1);
            next.slice_mut(s![.., ..width, .., ..]).assign(&next_weight);
            next.slice_mut(s![.., width.., .., ..])
                .iter_mut()
                .zip(normal.sample_iter(&mut *rng))
                .for_each(|(x, r)| *x = r);
        }
        WidenInit::Net2Wider => {
            let index = replication_index(width, n, rng);
            let factors = replication_factors(&index, width);
            for j in 0..new_width {
                let src = source_unit(j, width, &index);
                weight
                    .index_axis_mut(Axis(0), j)
                    .assign(&layer.weight().index_axis(Axis(0), src));
                bias[j] = layer.bias()[src];
                next.index_axis_mut(Axis(1), j).assign(
                    &next_weight
                        .index_axis(Axis(1), src)
                        .mapv(|x| x / factors[src]),
                );
            }
        }
    }
    Ok((Conv2d::new(weight, bias)?, next))
}
