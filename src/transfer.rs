use crate::error::{Error, Result};
use crate::layer::LayerWeights;
use std::collections::HashMap;

/// Named layer weights of one model, as supplied by the assembly layer.
///
/// The map is a plain snapshot keyed by layer name; the crate never holds a
/// reference into a live model graph.
pub type WeightMap = HashMap<String, LayerWeights>;

/// Installs the teacher's weights into the student for every layer in
/// `names`, leaving all other student entries untouched.
///
/// Used for the layers a morphism does not touch. Shapes are not re-checked
/// here; a structurally incompatible pairing is caught when the transformed
/// layers are assembled, not by this copy.
///
/// **Errors**
///
/// [`UnknownLayer`](Error::UnknownLayer) if either map lacks one of `names`.
pub fn copy_weights<S: AsRef<str>>(
    teacher: &WeightMap,
    student: &mut WeightMap,
    names: &[S],
) -> Result<()> {
    for name in names {
        let name = name.as_ref();
        let weights = teacher
            .get(name)
            .ok_or_else(|| Error::UnknownLayer(name.to_string()))?;
        let slot = student
            .get_mut(name)
            .ok_or_else(|| Error::UnknownLayer(name.to_string()))?;
        *slot = weights.clone();
    }
    Ok(())
}
