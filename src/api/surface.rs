use tracing::debug;

use crate::backend::{BundleHost, MemoryBundleHost, StaticRender};
use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{NullRenderer, Renderer};

/// Creates and releases the drawable/embeddable regions a `ChartView` owns.
///
/// The host toolkit implements this. `create_interactive` returns a
/// `ChartError::Capability` when the host cannot embed interactive bundles,
/// which makes the view fall back to an enlarged static surface.
pub trait SurfaceProvider {
    type Renderer: Renderer;
    type Host: BundleHost;

    fn create_static(&mut self, size: Viewport) -> ChartResult<Self::Renderer>;

    fn create_interactive(&mut self, size: Viewport) -> ChartResult<Self::Host>;

    fn release_static(&mut self, renderer: Self::Renderer);

    fn release_interactive(&mut self, mut host: Self::Host) {
        host.unload();
    }
}

/// Which kind of surface is currently live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    CompactStatic,
    /// Expanded view drawn by the static backend after an interactive fallback.
    EnlargedStatic,
    Interactive,
}

impl SurfaceKind {
    #[must_use]
    pub const fn is_static(self) -> bool {
        matches!(self, Self::CompactStatic | Self::EnlargedStatic)
    }
}

/// The single live surface of a chart view.
pub(crate) enum LiveSurface<P: SurfaceProvider> {
    Static {
        kind: SurfaceKind,
        size: Viewport,
        renderer: P::Renderer,
        render: StaticRender,
    },
    Interactive {
        size: Viewport,
        host: P::Host,
    },
}

impl<P: SurfaceProvider> LiveSurface<P> {
    pub(crate) fn kind(&self) -> SurfaceKind {
        match self {
            Self::Static { kind, .. } => *kind,
            Self::Interactive { .. } => SurfaceKind::Interactive,
        }
    }

    pub(crate) fn size(&self) -> Viewport {
        match self {
            Self::Static { size, .. } | Self::Interactive { size, .. } => *size,
        }
    }

    pub(crate) fn release(self, provider: &mut P) {
        let kind = self.kind();
        match self {
            Self::Static { renderer, .. } => provider.release_static(renderer),
            Self::Interactive { host, .. } => provider.release_interactive(host),
        }
        debug!(?kind, "surface released");
    }
}

/// Provider without a windowing system: frames go to a `NullRenderer` and
/// bundles to a `MemoryBundleHost`.
///
/// Tracks how many surfaces are alive so hosts and tests can check that a
/// view never holds more than one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessSurfaceProvider {
    interactive_available: bool,
    live: usize,
    peak_live: usize,
    created: usize,
    released: usize,
}

impl Default for HeadlessSurfaceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessSurfaceProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            interactive_available: true,
            live: 0,
            peak_live: 0,
            created: 0,
            released: 0,
        }
    }

    /// Provider whose host cannot embed interactive bundles.
    #[must_use]
    pub fn static_only() -> Self {
        Self {
            interactive_available: false,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn live_surfaces(&self) -> usize {
        self.live
    }

    #[must_use]
    pub fn peak_live_surfaces(&self) -> usize {
        self.peak_live
    }

    #[must_use]
    pub fn created_surfaces(&self) -> usize {
        self.created
    }

    #[must_use]
    pub fn released_surfaces(&self) -> usize {
        self.released
    }

    fn acquire(&mut self) {
        self.live += 1;
        self.created += 1;
        self.peak_live = self.peak_live.max(self.live);
    }

    fn release(&mut self) {
        self.live = self.live.saturating_sub(1);
        self.released += 1;
    }
}

impl SurfaceProvider for HeadlessSurfaceProvider {
    type Renderer = NullRenderer;
    type Host = MemoryBundleHost;

    fn create_static(&mut self, size: Viewport) -> ChartResult<NullRenderer> {
        if !size.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: size.width,
                height: size.height,
            });
        }
        self.acquire();
        Ok(NullRenderer::default())
    }

    fn create_interactive(&mut self, size: Viewport) -> ChartResult<MemoryBundleHost> {
        if !self.interactive_available {
            return Err(ChartError::capability(
                "interactive-surface",
                "headless host has no bundle viewer",
            ));
        }
        if !size.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: size.width,
                height: size.height,
            });
        }
        self.acquire();
        Ok(MemoryBundleHost::new())
    }

    fn release_static(&mut self, _renderer: NullRenderer) {
        self.release();
    }

    fn release_interactive(&mut self, mut host: MemoryBundleHost) {
        host.unload();
        self.release();
    }
}
