/*!
Function-preserving network morphisms ("Net2Net", after Chen, Goodfellow &
Shlens, [arXiv:1511.05641](https://arxiv.org/abs/1511.05641)).

A trained "teacher" network can be grown into a larger "student" network whose
output function is identical to the teacher's at initialization:
- [`widen_dense`] / [`widen_conv2d`] increase a layer's output-unit count and
  compensate the immediately downstream layer.
- [`deepen_dense`] / [`deepen_conv2d`] build identity-preserving weights for a
  newly inserted layer.
- [`copy_weights`] carries the untouched layers over verbatim.

The crate operates purely on [`ndarray`] weight tensors. Model construction,
training and the forward pass belong to the caller, which supplies weights as
a name keyed [`WeightMap`] and installs the returned tensors into the student.

Randomized transforms take an explicit [`Rng`](rand::Rng), so callers own
seeding and reproducibility.

# Example
```
use ndarray::array;
use rand::{rngs::StdRng, SeedableRng};
use net2net::{widen_dense, Dense, WidenInit};

let layer = Dense::new(array![[0.5_f32, -1.], [0.25, 2.]], array![0., 0.1])?;
let next = array![[1.0_f32], [2.]];
let mut rng = StdRng::seed_from_u64(7);
let (wider, next) = widen_dense(&layer, next.view(), 3, WidenInit::Net2Wider, &mut rng)?;
assert_eq!(wider.weight().dim(), (2, 3));
assert_eq!(next.dim(), (3, 1));
# Ok::<(), net2net::Error>(())
```
*/

pub mod deepen;
pub mod error;
pub mod layer;
pub mod transfer;
pub mod widen;

pub use deepen::{deepen_conv2d, deepen_dense};
pub use error::{Error, Result};
pub use layer::{Conv2d, Dense, LayerWeights};
pub use transfer::{copy_weights, WeightMap};
pub use widen::{widen_conv2d, widen_dense, WidenInit};
