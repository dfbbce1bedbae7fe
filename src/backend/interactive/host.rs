use crate::error::ChartResult;

use super::Bundle;

/// Embedding region that can load an interactive bundle (a web view, a
/// browser frame). Loading a bundle replaces whatever was loaded before.
pub trait BundleHost {
    fn load(&mut self, bundle: &Bundle) -> ChartResult<()>;

    /// Releases the loaded bundle. Must be safe to call when nothing is loaded.
    fn unload(&mut self);

    fn is_loaded(&self) -> bool;
}

impl<H: BundleHost + ?Sized> BundleHost for Box<H> {
    fn load(&mut self, bundle: &Bundle) -> ChartResult<()> {
        (**self).load(bundle)
    }

    fn unload(&mut self) {
        (**self).unload();
    }

    fn is_loaded(&self) -> bool {
        (**self).is_loaded()
    }
}

/// In-memory host used headless and in tests: keeps the last loaded bundle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryBundleHost {
    current: Option<Bundle>,
    pub load_count: usize,
    pub unload_count: usize,
}

impl MemoryBundleHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Option<&Bundle> {
        self.current.as_ref()
    }
}

impl BundleHost for MemoryBundleHost {
    fn load(&mut self, bundle: &Bundle) -> ChartResult<()> {
        self.current = Some(bundle.clone());
        self.load_count += 1;
        Ok(())
    }

    fn unload(&mut self) {
        if self.current.take().is_some() {
            self.unload_count += 1;
        }
    }

    fn is_loaded(&self) -> bool {
        self.current.is_some()
    }
}
