//! GTK4 host for a `ChartView`: a `DrawingArea` painted from the live static
//! surface, with pointer controllers and a redraw tick wired to the view.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use gtk4 as gtk;
use gtk::glib;
use gtk::prelude::*;
use tracing::warn;

use crate::api::{ChartView, ChartViewConfig, SurfaceProvider};
use crate::backend::MemoryBundleHost;
use crate::core::{ThemeContext, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::CairoRenderer;

/// Surfaces for a GTK window: offscreen Cairo images for static charts.
///
/// GTK4 alone has no embeddable web view, so interactive surfaces report a
/// capability error and expanded charts use the enlarged static backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct GtkSurfaceProvider;

impl SurfaceProvider for GtkSurfaceProvider {
    type Renderer = CairoRenderer;
    type Host = MemoryBundleHost;

    fn create_static(&mut self, size: Viewport) -> ChartResult<CairoRenderer> {
        let invalid = || ChartError::InvalidViewport {
            width: size.width,
            height: size.height,
        };
        let width = i32::try_from(size.width).map_err(|_| invalid())?;
        let height = i32::try_from(size.height).map_err(|_| invalid())?;
        CairoRenderer::new(width, height)
    }

    fn create_interactive(&mut self, _size: Viewport) -> ChartResult<MemoryBundleHost> {
        Err(ChartError::capability(
            "interactive-surface",
            "gtk4 adapter has no embedded web view",
        ))
    }

    fn release_static(&mut self, _renderer: CairoRenderer) {}
}

/// Shared handle to a chart view living inside a GTK widget.
pub type SharedChartView = Rc<RefCell<ChartView<GtkSurfaceProvider>>>;

pub struct GtkChartAdapter {
    area: gtk::DrawingArea,
    view: SharedChartView,
}

impl GtkChartAdapter {
    pub fn new(config: ChartViewConfig, theme: ThemeContext) -> ChartResult<Self> {
        let tick_interval = config.redraw_interval();
        let view = Rc::new(RefCell::new(ChartView::new(
            config,
            GtkSurfaceProvider,
            theme,
        )?));
        let area = gtk::DrawingArea::new();
        let adapter = Self { area, view };
        adapter.sync_content_size();
        adapter.install_draw_func();
        adapter.install_controllers(tick_interval);
        Ok(adapter)
    }

    #[must_use]
    pub fn widget(&self) -> &gtk::DrawingArea {
        &self.area
    }

    #[must_use]
    pub fn view(&self) -> SharedChartView {
        Rc::clone(&self.view)
    }

    pub fn expand(&self) -> ChartResult<()> {
        self.view.borrow_mut().expand()?;
        self.sync_content_size();
        self.area.queue_draw();
        Ok(())
    }

    pub fn collapse(&self) -> ChartResult<()> {
        self.view.borrow_mut().collapse()?;
        self.sync_content_size();
        self.area.queue_draw();
        Ok(())
    }

    fn sync_content_size(&self) {
        let Some(size) = self.view.borrow().surface_size() else {
            return;
        };
        self.area
            .set_content_width(i32::try_from(size.width).unwrap_or(i32::MAX));
        self.area
            .set_content_height(i32::try_from(size.height).unwrap_or(i32::MAX));
    }

    fn install_draw_func(&self) {
        let view = Rc::clone(&self.view);
        self.area.set_draw_func(move |_, context, _, _| {
            let view = view.borrow();
            let Some(renderer) = view.static_renderer() else {
                return;
            };
            let painted = context
                .set_source_surface(renderer.surface(), 0.0, 0.0)
                .and_then(|()| context.paint());
            if let Err(err) = painted {
                warn!(error = %err, "failed to paint chart surface");
            }
        });
    }

    fn install_controllers(&self, tick_interval: Duration) {
        let origin = Instant::now();

        let motion = gtk::EventControllerMotion::new();
        let view = Rc::clone(&self.view);
        let area = self.area.clone();
        motion.connect_motion(move |_, x, y| {
            match view.borrow_mut().pointer_move(x, y, origin.elapsed()) {
                Ok(response) if response.redraw_now() => area.queue_draw(),
                Ok(_) => {}
                Err(err) => warn!(error = %err, "pointer move failed"),
            }
        });
        let view = Rc::clone(&self.view);
        let area = self.area.clone();
        motion.connect_leave(move |_| {
            match view.borrow_mut().pointer_leave(origin.elapsed()) {
                Ok(response) if response.redraw_now() => area.queue_draw(),
                Ok(_) => {}
                Err(err) => warn!(error = %err, "pointer leave failed"),
            }
        });
        self.area.add_controller(motion);

        let click = gtk::GestureClick::new();
        let view = Rc::clone(&self.view);
        let area = self.area.clone();
        click.connect_released(move |_, _, x, y| {
            match view.borrow_mut().click(x, y, origin.elapsed()) {
                Ok(response) if response.redraw_now() => area.queue_draw(),
                Ok(_) => {}
                Err(err) => warn!(error = %err, "click failed"),
            }
        });
        self.area.add_controller(click);

        let view = Rc::downgrade(&self.view);
        let area = self.area.downgrade();
        glib::timeout_add_local(tick_interval, move || {
            let (Some(view), Some(area)) = (view.upgrade(), area.upgrade()) else {
                return glib::ControlFlow::Break;
            };
            match view.borrow_mut().tick(origin.elapsed()) {
                Ok(true) => area.queue_draw(),
                Ok(false) => {}
                Err(err) => warn!(error = %err, "chart tick failed"),
            }
            glib::ControlFlow::Continue
        });
    }
}
