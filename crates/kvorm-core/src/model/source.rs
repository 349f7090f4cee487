use crate::model::meta::ModelMeta;
use std::sync::Arc;

///
/// ModelSource
///
/// Lazy producer of finalized models for bulk registration.
///
/// Package/module scanning lives outside the core; whatever mechanism
/// discovers model declarations presents them through this trait and the
/// registry consumes the sequence. The core performs no filesystem or
/// package logic itself.
///

pub trait ModelSource {
    /// Iterator over finalized models, in discovery order.
    fn models(&self) -> Box<dyn Iterator<Item = Arc<ModelMeta>> + '_>;
}

///
/// SliceSource
///
/// Source over an in-memory slice of finalized models. Sufficient for
/// explicit registration lists and tests.
///

pub struct SliceSource<'a> {
    models: &'a [Arc<ModelMeta>],
}

impl<'a> SliceSource<'a> {
    #[must_use]
    pub const fn new(models: &'a [Arc<ModelMeta>]) -> Self {
        Self { models }
    }
}

impl ModelSource for SliceSource<'_> {
    fn models(&self) -> Box<dyn Iterator<Item = Arc<ModelMeta>> + '_> {
        Box::new(self.models.iter().cloned())
    }
}
