//! Model capability definition.

use crate::error::Result;
use crate::model::{Reconstruction, Window};

/// A pretrained model that reconstructs a window.
///
/// Implementations must be pure: the same weights and the same window always
/// produce the same reconstruction, and reconstructing never mutates the
/// model. The returned reconstruction must have the window's shape.
pub trait Reconstructor: Send + Sync {
    /// Reconstruct a sector-major window.
    fn reconstruct(&self, window: &Window) -> Result<Reconstruction>;

    /// Short model name used in logs and reports.
    fn name(&self) -> &str;
}

impl<R: Reconstructor + ?Sized> Reconstructor for Box<R> {
    fn reconstruct(&self, window: &Window) -> Result<Reconstruction> {
        (**self).reconstruct(window)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<R: Reconstructor + ?Sized> Reconstructor for &R {
    fn reconstruct(&self, window: &Window) -> Result<Reconstruction> {
        (**self).reconstruct(window)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
