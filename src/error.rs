use derive_more::Display;

/// The crate result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Contract violations raised by the transforms.
///
/// All of these signal caller bugs (wrong layer pairing, bad target width,
/// unsupported geometry). None are transient; the caller fixes the call site
/// or falls back to a different strategy.
#[derive(Clone, Debug, Display, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// Connected layers' dimensions disagree, or a bias does not match its
    /// layer's output-unit count.
    #[display(fmt = "shape mismatch, expected {} units, found {}", expected, found)]
    ShapeMismatch { expected: usize, found: usize },
    /// The target width of a widen does not exceed the current width.
    #[display(fmt = "new width {} must exceed the current width {}", new_width, width)]
    InvalidWidth { width: usize, new_width: usize },
    /// Unrecognized widen initializer name.
    #[display(fmt = "unknown widen initializer {:?}", _0)]
    UnknownInit(String),
    /// An identity kernel needs odd spatial dimensions to have a center.
    #[display(fmt = "identity kernel requires odd dimensions, got {}x{}", _0, _1)]
    UnsupportedKernelGeometry(usize, usize),
    /// A requested layer name is absent from a weight map.
    #[display(fmt = "no layer named {:?}", _0)]
    UnknownLayer(String),
}
