use std::cell::RefCell;

use report_chart::api::{
    ChartView, ChartViewConfig, HeadlessSurfaceProvider, SurfaceKind, SurfaceProvider, ViewState,
};
use report_chart::backend::MemoryBundleHost;
use report_chart::core::{ChartSpec, ChartType, ThemeContext, Viewport};
use report_chart::render::NullRenderer;
use report_chart::{ChartError, ChartResult};

/// Headless provider that refuses static surfaces of the listed widths.
struct FlakyStaticProvider {
    inner: HeadlessSurfaceProvider,
    rejected_widths: RefCell<Vec<u32>>,
}

impl FlakyStaticProvider {
    fn new() -> Self {
        Self {
            inner: HeadlessSurfaceProvider::static_only(),
            rejected_widths: RefCell::new(Vec::new()),
        }
    }

    fn reject_widths(&self, widths: &[u32]) {
        *self.rejected_widths.borrow_mut() = widths.to_vec();
    }
}

impl SurfaceProvider for FlakyStaticProvider {
    type Renderer = NullRenderer;
    type Host = MemoryBundleHost;

    fn create_static(&mut self, size: Viewport) -> ChartResult<NullRenderer> {
        if self.rejected_widths.borrow().contains(&size.width) {
            return Err(ChartError::Surface(format!(
                "cannot allocate {}x{} surface",
                size.width, size.height
            )));
        }
        self.inner.create_static(size)
    }

    fn create_interactive(&mut self, size: Viewport) -> ChartResult<MemoryBundleHost> {
        self.inner.create_interactive(size)
    }

    fn release_static(&mut self, renderer: NullRenderer) {
        self.inner.release_static(renderer);
    }

    fn release_interactive(&mut self, host: MemoryBundleHost) {
        self.inner.release_interactive(host);
    }
}

fn flaky_view() -> ChartView<FlakyStaticProvider> {
    let mut view = ChartView::new(
        ChartViewConfig::default(),
        FlakyStaticProvider::new(),
        ThemeContext::light(),
    )
    .expect("view init");
    view.set_spec(ChartSpec::categories(
        ChartType::Bar,
        &["A", "B", "C"],
        &[10.0, 30.0, 20.0],
    ))
    .expect("set spec");
    view
}

#[test]
fn failed_expand_keeps_the_compact_surface_and_can_be_retried() {
    let mut view = flaky_view();
    let expanded_width = view.config().expanded_size.width;
    view.provider().reject_widths(&[expanded_width]);

    assert!(matches!(view.expand(), Err(ChartError::Surface(_))));
    assert_eq!(view.view_state(), ViewState::Compact);
    assert_eq!(view.surface_kind(), Some(SurfaceKind::CompactStatic));
    assert_eq!(view.surface_size(), Some(view.config().compact_size));
    assert_eq!(view.provider().inner.live_surfaces(), 1);

    view.provider().reject_widths(&[]);
    view.expand().expect("retry expand");
    assert_eq!(view.view_state(), ViewState::Expanded);
    assert_eq!(view.surface_kind(), Some(SurfaceKind::EnlargedStatic));
    assert_eq!(view.provider().inner.live_surfaces(), 1);
    assert_eq!(view.provider().inner.peak_live_surfaces(), 1);
}

#[test]
fn failed_collapse_restores_the_expanded_surface() {
    let mut view = flaky_view();
    view.expand().expect("expand");
    let compact_width = view.config().compact_size.width;
    view.provider().reject_widths(&[compact_width]);

    assert!(view.collapse().is_err());
    assert_eq!(view.view_state(), ViewState::Expanded);
    assert_eq!(view.surface_kind(), Some(SurfaceKind::EnlargedStatic));
    assert_eq!(view.provider().inner.live_surfaces(), 1);

    view.provider().reject_widths(&[]);
    view.collapse().expect("retry collapse");
    assert_eq!(view.view_state(), ViewState::Compact);
    assert_eq!(view.surface_kind(), Some(SurfaceKind::CompactStatic));
}

#[test]
fn view_left_without_a_surface_rebuilds_on_the_next_transition() {
    let mut view = flaky_view();
    let compact_width = view.config().compact_size.width;
    let expanded_width = view.config().expanded_size.width;
    view.provider().reject_widths(&[compact_width, expanded_width]);

    assert!(view.expand().is_err());
    assert_eq!(view.view_state(), ViewState::Compact);
    assert_eq!(view.surface_kind(), None);
    assert_eq!(view.provider().inner.live_surfaces(), 0);

    view.provider().reject_widths(&[]);
    view.collapse().expect("collapse rebuilds the compact surface");
    assert_eq!(view.view_state(), ViewState::Compact);
    assert_eq!(view.surface_kind(), Some(SurfaceKind::CompactStatic));
    assert_eq!(view.provider().inner.live_surfaces(), 1);
}
