use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use crate::backend::{BridgeMessage, BundleHost, InteractiveBackend, StaticBackend, StaticRender};
use crate::core::{
    ChartSpec, ChartType, DataSourceMetadata, SeriesData, ThemeContext, Viewport,
    resolve_visible_items,
};
use crate::error::{ChartError, ChartResult};
use crate::extract::{ExtractedChart, extract_chart};
use crate::interaction::{
    AnimationDescriptor, Easing, EngineResponse, InteractionEngine, InteractionState, SlotMove,
    SortOrder, Timeline, ToggleOutcome,
};

use super::export::{self, DataFormat, ExportedImage, ImageFormat};
use super::surface::{LiveSurface, SurfaceKind, SurfaceProvider};
use super::view_config::ChartViewConfig;
use super::viewer::{JobStatus, ViewerCompletion, ViewerJob, ViewerLauncher};

/// Compact/expanded state of a chart view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Compact,
    Expanded,
}

/// One chart instance: owns its data, interaction state and exactly one
/// live surface.
///
/// `ChartView` is the only place that decides which backend is live. Every
/// transition releases the current surface before the replacement is
/// constructed, so at most one surface exists at any time.
pub struct ChartView<P: SurfaceProvider> {
    config: ChartViewConfig,
    provider: P,
    spec: ChartSpec,
    theme: ThemeContext,
    state: InteractionState,
    metadata: Option<DataSourceMetadata>,
    view_state: ViewState,
    surface: Option<LiveSurface<P>>,
    static_backend: StaticBackend,
    interactive_backend: InteractiveBackend,
    engine: InteractionEngine,
    sort_transition: Timeline<SlotMove>,
    slot_positions: Vec<(usize, f64)>,
    capability_logged: bool,
    generation: u64,
    viewer: Option<ViewerJob>,
    last_event: Duration,
    redraw_count: u64,
}

impl<P: SurfaceProvider> ChartView<P> {
    /// Creates a compact view showing the no-data placeholder.
    pub fn new(config: ChartViewConfig, provider: P, theme: ThemeContext) -> ChartResult<Self> {
        config.validate()?;
        theme.validate()?;
        let options = config.render_options();
        let mut view = Self {
            static_backend: StaticBackend::new(options.clone()),
            interactive_backend: InteractiveBackend::new(options, config.transition()),
            engine: InteractionEngine::new(config.redraw_interval()),
            config,
            provider,
            spec: ChartSpec::empty(ChartType::Bar),
            theme,
            state: InteractionState::default(),
            metadata: None,
            view_state: ViewState::Compact,
            surface: None,
            sort_transition: Timeline::new(),
            slot_positions: Vec::new(),
            capability_logged: false,
            generation: 0,
            viewer: None,
            last_event: Duration::ZERO,
            redraw_count: 0,
        };
        let size = view.config.compact_size;
        let surface = view.build_static(SurfaceKind::CompactStatic, size)?;
        view.surface = Some(surface);
        view.redraw_count += 1;
        Ok(view)
    }

    #[must_use]
    pub fn config(&self) -> &ChartViewConfig {
        &self.config
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    #[must_use]
    pub fn theme(&self) -> &ThemeContext {
        &self.theme
    }

    #[must_use]
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    #[must_use]
    pub fn metadata(&self) -> Option<&DataSourceMetadata> {
        self.metadata.as_ref()
    }

    #[must_use]
    pub fn view_state(&self) -> ViewState {
        self.view_state
    }

    #[must_use]
    pub fn surface_kind(&self) -> Option<SurfaceKind> {
        self.surface.as_ref().map(LiveSurface::kind)
    }

    #[must_use]
    pub fn surface_size(&self) -> Option<Viewport> {
        self.surface.as_ref().map(LiveSurface::size)
    }

    /// Latest static render, when a static surface is live.
    #[must_use]
    pub fn static_render(&self) -> Option<&StaticRender> {
        match &self.surface {
            Some(LiveSurface::Static { render, .. }) => Some(render),
            _ => None,
        }
    }

    #[must_use]
    pub fn static_renderer(&self) -> Option<&P::Renderer> {
        match &self.surface {
            Some(LiveSurface::Static { renderer, .. }) => Some(renderer),
            _ => None,
        }
    }

    #[must_use]
    pub fn interactive_host(&self) -> Option<&P::Host> {
        match &self.surface {
            Some(LiveSurface::Interactive { host, .. }) => Some(host),
            _ => None,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &InteractionEngine {
        &self.engine
    }

    /// Redraws performed on live surfaces since creation, throttled or not.
    #[must_use]
    pub fn redraw_count(&self) -> u64 {
        self.redraw_count
    }

    /// Bumped on every expand/collapse transition.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_sort_animating(&self) -> bool {
        !self.sort_transition.is_idle()
    }

    /// Replaces the chart data wholesale, keeping the title.
    pub fn set_chart(
        &mut self,
        chart_type: ChartType,
        data: SeriesData,
        subtitle: Option<String>,
    ) -> ChartResult<()> {
        let spec = ChartSpec::new(chart_type, data)
            .with_title(self.spec.title.clone())
            .with_subtitle(subtitle)
            .with_theme_mode(self.theme.mode());
        self.set_spec(spec)
    }

    /// Replaces the whole spec. Interaction state resets to its defaults,
    /// which become the snapshot `reset` restores.
    pub fn set_spec(&mut self, spec: ChartSpec) -> ChartResult<()> {
        self.spec = spec.sanitized();
        self.state = InteractionState::default();
        self.cancel_sort_transition();
        debug!(
            chart_type = self.spec.chart_type.as_str(),
            items = self.spec.series.len(),
            view_state = ?self.view_state,
            "chart data set"
        );
        self.forced_redraw()
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> ChartResult<()> {
        self.spec.title = title.into();
        self.forced_redraw()
    }

    /// Replaces the theme wholesale and re-renders the live backend.
    pub fn set_theme(&mut self, theme: ThemeContext) -> ChartResult<()> {
        theme.validate()?;
        self.spec.theme_mode = theme.mode();
        self.theme = theme;
        debug!(mode = ?self.theme.mode(), "theme switched");
        self.forced_redraw()
    }

    /// Metadata shown by the interactive overlay.
    pub fn set_data_source(&mut self, metadata: Option<DataSourceMetadata>) -> ChartResult<()> {
        self.metadata = metadata;
        if self.surface_kind() == Some(SurfaceKind::Interactive) {
            return self.forced_redraw();
        }
        Ok(())
    }

    /// COMPACT -> EXPANDED. No-op when already expanded with a live surface.
    ///
    /// If no expanded surface can be built the compact surface is rebuilt,
    /// the view stays COMPACT and the build error is returned.
    pub fn expand(&mut self) -> ChartResult<()> {
        if self.view_state == ViewState::Expanded && self.surface.is_some() {
            debug!("expand ignored: already expanded");
            return Ok(());
        }
        self.transition_to(ViewState::Expanded)
    }

    /// EXPANDED -> COMPACT, rebuilt from the current spec and state.
    /// No-op when already compact with a live surface. A failed rebuild
    /// restores the expanded surface.
    pub fn collapse(&mut self) -> ChartResult<()> {
        if self.view_state == ViewState::Compact && self.surface.is_some() {
            debug!("collapse ignored: already compact");
            return Ok(());
        }
        self.transition_to(ViewState::Compact)
    }

    /// Hover on a static surface. Interactive surfaces handle hover in the
    /// bundle and report it through `handle_bundle_message`.
    pub fn pointer_move(&mut self, x: f64, y: f64, now: Duration) -> ChartResult<EngineResponse> {
        self.last_event = now;
        let Some(LiveSurface::Static { render, .. }) = &self.surface else {
            return Ok(EngineResponse::default());
        };
        let response = self
            .engine
            .pointer_move(&mut self.state, &self.spec, render, x, y, now);
        self.apply_response(&response)?;
        Ok(response)
    }

    pub fn pointer_leave(&mut self, now: Duration) -> ChartResult<EngineResponse> {
        self.last_event = now;
        if !self.has_static_surface() {
            return Ok(EngineResponse::default());
        }
        let response = self.engine.pointer_leave(&mut self.state, now);
        self.apply_response(&response)?;
        Ok(response)
    }

    /// Click-to-toggle on a static surface.
    pub fn click(&mut self, x: f64, y: f64, now: Duration) -> ChartResult<EngineResponse> {
        self.last_event = now;
        let Some(LiveSurface::Static { render, .. }) = &self.surface else {
            return Ok(EngineResponse::default());
        };
        let response = self
            .engine
            .click(&mut self.state, &self.spec, render, x, y, now);
        self.apply_response(&response)?;
        Ok(response)
    }

    /// Toggles a category (or named series) in the hidden set.
    pub fn toggle_category(&mut self, key: &str, now: Duration) -> ChartResult<ToggleOutcome> {
        self.last_event = now;
        let response = self.engine.toggle_key(&mut self.state, &self.spec, key, now);
        self.apply_response(&response)?;
        Ok(response.toggle.unwrap_or(ToggleOutcome::UnknownKey))
    }

    /// Two-state sort toggle {descending, ascending}. Bars slide to their new
    /// slots over the transition duration when a static surface is live.
    pub fn toggle_sort(&mut self, now: Duration) -> ChartResult<EngineResponse> {
        let next = self.state.sort_order().toggled();
        self.set_sort(next, now)
    }

    pub fn set_sort(&mut self, order: SortOrder, now: Duration) -> ChartResult<EngineResponse> {
        self.last_event = now;
        let before = self.display_slots();
        let response = self.engine.set_sort(&mut self.state, order, now);
        if response.redraw.is_some() {
            self.start_sort_transition(&before, now);
        }
        self.apply_response(&response)?;
        Ok(response)
    }

    /// Restores the state captured at the last `set_spec`.
    pub fn reset(&mut self, now: Duration) -> ChartResult<EngineResponse> {
        self.last_event = now;
        self.cancel_sort_transition();
        let response = self.engine.reset(&mut self.state, now);
        self.apply_response(&response)?;
        Ok(response)
    }

    /// Applies a message posted by a loaded bundle.
    ///
    /// The bundle has already updated itself, so an interactive surface is not
    /// reloaded. The state change survives the next collapse.
    pub fn handle_bundle_message(&mut self, message: BridgeMessage, now: Duration) -> ChartResult<()> {
        self.last_event = now;
        let changed = match message {
            BridgeMessage::Hover { index } => {
                let index = index.filter(|index| *index < self.spec.series.len());
                self.state.set_hover_index(index)
            }
            BridgeMessage::Toggle { key } => {
                let outcome = self.state.toggle_hidden(&key, &self.spec.keys());
                debug!(key = %key, ?outcome, "bundle toggled category");
                outcome.changed()
            }
            BridgeMessage::Sort { order } => {
                let changed = self.state.sort_order() != order;
                self.state.set_sort_order(order);
                changed
            }
            BridgeMessage::Reset => {
                self.state.reset();
                true
            }
        };
        if changed && self.has_static_surface() {
            return self.forced_redraw();
        }
        Ok(())
    }

    /// Parses and applies a raw JSON bridge message.
    pub fn handle_bundle_json(&mut self, input: &str, now: Duration) -> ChartResult<()> {
        let message = BridgeMessage::from_json_str(input)?;
        self.handle_bundle_message(message, now)
    }

    /// Advances sort animation and flushes a due throttled redraw.
    ///
    /// Hosts call this from their frame or timer callback. Returns `true` when
    /// the surface was redrawn.
    pub fn tick(&mut self, now: Duration) -> ChartResult<bool> {
        self.last_event = now;
        let mut redraw = false;
        if !self.sort_transition.is_idle() {
            let slots = &mut self.slot_positions;
            self.sort_transition.advance(now, |slot_move, progress| {
                set_slot(slots, slot_move.original_index, slot_move.slot_at(progress));
            });
            if self.sort_transition.is_idle() {
                self.slot_positions.clear();
            }
            redraw = true;
        }
        if self.engine.poll(&mut self.state, now) {
            redraw = true;
        }
        if redraw {
            self.redraw()?;
        }
        Ok(redraw)
    }

    /// Next instant `tick` has work to do, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        if !self.sort_transition.is_idle() {
            return Some(self.last_event);
        }
        self.engine.throttle().pending_due()
    }

    /// Image of the chart as currently shown, without hover decoration.
    pub fn export_image(&self, format: ImageFormat) -> ChartResult<ExportedImage> {
        let size = self.surface_size().unwrap_or(self.config.compact_size);
        export::export_image(
            &self.static_backend,
            &self.spec,
            &self.theme,
            &self.state,
            size,
            format,
        )
    }

    pub fn export_data(&self, format: DataFormat) -> ChartResult<String> {
        export::export_data(&self.spec, &self.state, format)
    }

    /// Reads the chart back out of a static rendering of the current view.
    #[must_use]
    pub fn reconstruct_spec(&self) -> ExtractedChart {
        let mut state = self.state.clone();
        state.set_hover_index(None);
        let size = match self.surface_kind() {
            Some(SurfaceKind::CompactStatic) | None => self.config.compact_size,
            Some(_) => self.config.expanded_size,
        };
        let render = self
            .static_backend
            .render(&self.spec, &self.theme, &state, size);
        extract_chart(render.frame())
    }

    /// Persists the interactive bundle and opens it on a background worker.
    ///
    /// Returns the bundle path. The outcome arrives through
    /// `poll_external_viewer`; a launch still pending from an earlier call is
    /// abandoned.
    pub fn open_in_external_viewer<L: ViewerLauncher>(&mut self, launcher: L) -> ChartResult<PathBuf> {
        let bundle = self.interactive_backend.generate(
            &self.spec,
            &self.theme,
            &self.state,
            self.metadata.as_ref(),
            self.config.expanded_size,
        );
        let path = bundle.persist_to_temp()?;
        self.viewer = Some(ViewerJob::spawn(launcher, path.clone(), self.generation));
        Ok(path)
    }

    /// Non-blocking. Completions requested before the latest expand/collapse
    /// are discarded.
    pub fn poll_external_viewer(&mut self) -> Option<ViewerCompletion> {
        let status = self.viewer.as_ref()?.status();
        match status {
            JobStatus::Running => None,
            JobStatus::Lost => {
                self.viewer = None;
                None
            }
            JobStatus::Done(completion) => {
                self.viewer = None;
                if completion.generation != self.generation {
                    debug!(
                        requested = completion.generation,
                        current = self.generation,
                        "discarding stale external viewer completion"
                    );
                    return None;
                }
                debug!(outcome = ?completion.outcome, "external viewer completed");
                Some(completion)
            }
        }
    }

    #[must_use]
    pub fn has_pending_viewer(&self) -> bool {
        self.viewer.is_some()
    }

    fn has_static_surface(&self) -> bool {
        self.surface_kind().is_some_and(SurfaceKind::is_static)
    }

    fn transition_to(&mut self, target: ViewState) -> ChartResult<()> {
        let previous = self.view_state;
        self.generation += 1;
        self.cancel_sort_transition();
        self.state.set_hover_index(None);
        self.engine.cancel_pending();
        self.release_surface();

        match self.build_surface(target) {
            Ok(surface) => {
                debug!(
                    target = ?target,
                    surface = ?surface.kind(),
                    generation = self.generation,
                    "view transition complete"
                );
                self.view_state = target;
                self.install(surface);
                Ok(())
            }
            Err(err) => {
                warn!(
                    error = %err,
                    target = ?target,
                    "view transition failed; restoring previous surface"
                );
                match self.build_surface(previous) {
                    Ok(surface) => self.install(surface),
                    Err(restore_err) => {
                        warn!(error = %restore_err, "previous surface could not be restored");
                    }
                }
                Err(err)
            }
        }
    }

    fn build_surface(&mut self, target: ViewState) -> ChartResult<LiveSurface<P>> {
        match target {
            ViewState::Compact => {
                self.build_static(SurfaceKind::CompactStatic, self.config.compact_size)
            }
            ViewState::Expanded => {
                let size = self.config.expanded_size;
                if self.config.interactive_enabled {
                    match self.build_interactive(size) {
                        Ok(surface) => return Ok(surface),
                        Err(err) => self.log_fallback(&err),
                    }
                }
                self.build_static(SurfaceKind::EnlargedStatic, size)
            }
        }
    }

    fn install(&mut self, surface: LiveSurface<P>) {
        self.surface = Some(surface);
        self.redraw_count += 1;
        self.engine.note_forced_redraw(&mut self.state, self.last_event);
    }

    fn release_surface(&mut self) {
        if let Some(surface) = self.surface.take() {
            surface.release(&mut self.provider);
        }
    }

    fn log_fallback(&mut self, err: &ChartError) {
        if err.is_capability() {
            if !self.capability_logged {
                warn!(error = %err, "interactive surface unavailable; using enlarged static chart");
                self.capability_logged = true;
            }
        } else {
            warn!(error = %err, "interactive surface failed; using enlarged static chart");
        }
    }

    fn build_static(&mut self, kind: SurfaceKind, size: Viewport) -> ChartResult<LiveSurface<P>> {
        let mut renderer = self.provider.create_static(size)?;
        let render = self.static_backend.render_with_slots(
            &self.spec,
            &self.theme,
            &self.state,
            size,
            &self.slot_positions,
        );
        if let Err(err) = render.draw(&mut renderer) {
            self.provider.release_static(renderer);
            return Err(err);
        }
        Ok(LiveSurface::Static {
            kind,
            size,
            renderer,
            render,
        })
    }

    fn build_interactive(&mut self, size: Viewport) -> ChartResult<LiveSurface<P>> {
        let mut host = self.provider.create_interactive(size)?;
        let bundle = self.interactive_backend.generate(
            &self.spec,
            &self.theme,
            &self.state,
            self.metadata.as_ref(),
            size,
        );
        if let Err(err) = host.load(&bundle) {
            self.provider.release_interactive(host);
            return Err(err);
        }
        Ok(LiveSurface::Interactive { size, host })
    }

    fn forced_redraw(&mut self) -> ChartResult<()> {
        self.engine.note_forced_redraw(&mut self.state, self.last_event);
        self.redraw()
    }

    fn apply_response(&mut self, response: &EngineResponse) -> ChartResult<()> {
        if response.redraw_now() {
            self.redraw()?;
        }
        Ok(())
    }

    fn redraw(&mut self) -> ChartResult<()> {
        match &mut self.surface {
            Some(LiveSurface::Static {
                renderer,
                render,
                size,
                ..
            }) => {
                *render = self.static_backend.render_with_slots(
                    &self.spec,
                    &self.theme,
                    &self.state,
                    *size,
                    &self.slot_positions,
                );
                render.draw(renderer)?;
            }
            Some(LiveSurface::Interactive { size, host }) => {
                let bundle = self.interactive_backend.generate(
                    &self.spec,
                    &self.theme,
                    &self.state,
                    self.metadata.as_ref(),
                    *size,
                );
                host.load(&bundle)?;
            }
            None => return Ok(()),
        }
        self.redraw_count += 1;
        Ok(())
    }

    /// Display slot of each visible category, keyed by original index.
    fn display_slots(&self) -> Vec<(usize, f64)> {
        resolve_visible_items(&self.spec, &self.state)
            .iter()
            .enumerate()
            .map(|(slot, item)| (item.original_index, slot as f64))
            .collect()
    }

    fn start_sort_transition(&mut self, before: &[(usize, f64)], now: Duration) {
        let animates = self.config.animate_static_sort
            && self.config.transition_ms > 0
            && self.has_static_surface()
            && matches!(
                self.spec.chart_type,
                ChartType::Bar | ChartType::HorizontalBar
            );
        if !animates {
            self.cancel_sort_transition();
            return;
        }
        let current: Vec<(usize, f64)> = before
            .iter()
            .map(|&(index, slot)| (index, slot_of(&self.slot_positions, index).unwrap_or(slot)))
            .collect();
        self.sort_transition.clear();
        for (to_slot, (original_index, _)) in self.display_slots().into_iter().enumerate() {
            let from_slot = slot_of(&current, original_index).unwrap_or(to_slot as f64);
            self.sort_transition.push(AnimationDescriptor::new(
                now,
                self.config.transition(),
                Easing::EaseInOutCubic,
                SlotMove {
                    original_index,
                    from_slot,
                    to_slot: to_slot as f64,
                },
            ));
        }
        self.slot_positions = current;
        debug!(
            tracks = self.sort_transition.tracks().len(),
            order = ?self.state.sort_order(),
            "sort transition started"
        );
    }

    fn cancel_sort_transition(&mut self) {
        self.sort_transition.clear();
        self.slot_positions.clear();
    }
}

impl<P: SurfaceProvider> Drop for ChartView<P> {
    fn drop(&mut self) {
        self.release_surface();
    }
}

fn slot_of(slots: &[(usize, f64)], original_index: usize) -> Option<f64> {
    slots
        .iter()
        .find(|(index, _)| *index == original_index)
        .map(|(_, slot)| *slot)
}

fn set_slot(slots: &mut Vec<(usize, f64)>, original_index: usize, slot: f64) {
    match slots.iter_mut().find(|(index, _)| *index == original_index) {
        Some(entry) => entry.1 = slot,
        None => slots.push((original_index, slot)),
    }
}
