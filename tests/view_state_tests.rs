use std::path::Path;
use std::time::Duration;

use report_chart::api::{
    ChartView, ChartViewConfig, HeadlessSurfaceProvider, SurfaceKind, ViewState, ViewerOutcome,
};
use report_chart::backend::{BridgeMessage, BundleHost, PLACEHOLDER_TEXT, read_embedded_payload};
use report_chart::core::{ChartSpec, ChartType, SeriesData, ThemeContext};
use report_chart::interaction::SortOrder;
use report_chart::{ChartError, ChartResult};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn view_with(provider: HeadlessSurfaceProvider) -> ChartView<HeadlessSurfaceProvider> {
    let mut view = ChartView::new(ChartViewConfig::default(), provider, ThemeContext::light())
        .expect("view init");
    view.set_spec(
        ChartSpec::categories(ChartType::Bar, &["A", "B", "C"], &[10.0, 30.0, 20.0])
            .with_title("Orders"),
    )
    .expect("set spec");
    view
}

#[test]
fn new_view_is_compact_with_placeholder() {
    let view = ChartView::new(
        ChartViewConfig::default(),
        HeadlessSurfaceProvider::new(),
        ThemeContext::light(),
    )
    .expect("view init");
    assert_eq!(view.view_state(), ViewState::Compact);
    assert_eq!(view.surface_kind(), Some(SurfaceKind::CompactStatic));
    let render = view.static_render().expect("static surface");
    assert!(render.is_placeholder());
    assert!(
        render
            .frame()
            .texts
            .iter()
            .any(|text| text.text == PLACEHOLDER_TEXT)
    );
    assert_eq!(view.provider().live_surfaces(), 1);
}

#[test]
fn expand_swaps_to_interactive_surface_and_destroys_compact_first() {
    let mut view = view_with(HeadlessSurfaceProvider::new());
    view.expand().expect("expand");

    assert_eq!(view.view_state(), ViewState::Expanded);
    assert_eq!(view.surface_kind(), Some(SurfaceKind::Interactive));
    assert_eq!(view.surface_size(), Some(view.config().expanded_size));
    let host = view.interactive_host().expect("interactive host");
    assert!(host.is_loaded());
    assert_eq!(host.load_count, 1);

    let provider = view.provider();
    assert_eq!(provider.live_surfaces(), 1);
    assert_eq!(provider.peak_live_surfaces(), 1);
    assert_eq!(provider.created_surfaces(), 2);
    assert_eq!(provider.released_surfaces(), 1);
}

#[test]
fn expanding_twice_is_a_no_op() {
    let mut view = view_with(HeadlessSurfaceProvider::new());
    view.expand().expect("first expand");
    let generation = view.generation();
    view.expand().expect("second expand");

    assert_eq!(view.view_state(), ViewState::Expanded);
    assert_eq!(view.generation(), generation);
    assert_eq!(view.provider().created_surfaces(), 2);
    assert_eq!(view.provider().live_surfaces(), 1);
}

#[test]
fn collapsing_while_compact_is_a_no_op() {
    let mut view = view_with(HeadlessSurfaceProvider::new());
    view.collapse().expect("collapse");
    assert_eq!(view.view_state(), ViewState::Compact);
    assert_eq!(view.generation(), 0);
    assert_eq!(view.provider().created_surfaces(), 1);
}

#[test]
fn missing_interactive_capability_falls_back_to_enlarged_static() {
    let mut view = view_with(HeadlessSurfaceProvider::static_only());
    view.expand().expect("expand falls back");

    assert_eq!(view.view_state(), ViewState::Expanded);
    assert_eq!(view.surface_kind(), Some(SurfaceKind::EnlargedStatic));
    let render = view.static_render().expect("static surface");
    assert_eq!(render.frame().viewport, view.config().expanded_size);
    assert!(!render.is_placeholder());
    assert_eq!(view.provider().live_surfaces(), 1);

    view.collapse().expect("collapse");
    view.expand().expect("expand again");
    assert_eq!(view.surface_kind(), Some(SurfaceKind::EnlargedStatic));
    assert_eq!(view.provider().peak_live_surfaces(), 1);
}

#[test]
fn interactive_backend_can_be_disabled_by_config() {
    let config = ChartViewConfig::default().with_interactive_enabled(false);
    let mut view = ChartView::new(config, HeadlessSurfaceProvider::new(), ThemeContext::dark())
        .expect("view init");
    view.expand().expect("expand");
    assert_eq!(view.surface_kind(), Some(SurfaceKind::EnlargedStatic));
}

#[test]
fn state_changed_while_expanded_survives_collapse() {
    let mut view = view_with(HeadlessSurfaceProvider::new());
    view.expand().expect("expand");

    view.handle_bundle_message(BridgeMessage::Toggle { key: "A".to_owned() }, ms(100))
        .expect("toggle");
    view.handle_bundle_json(r#"{"type":"sort","order":"descending"}"#, ms(200))
        .expect("sort");
    assert_eq!(
        view.interactive_host().expect("host").load_count,
        1,
        "bundle messages do not reload the bundle"
    );

    view.collapse().expect("collapse");
    assert_eq!(view.surface_kind(), Some(SurfaceKind::CompactStatic));
    assert!(view.state().is_hidden("A"));
    assert_eq!(view.state().sort_order(), SortOrder::Descending);
    let mut shown: Vec<usize> = view
        .static_render()
        .expect("static surface")
        .regions()
        .iter()
        .map(|region| region.original_index)
        .collect();
    shown.sort_unstable();
    assert_eq!(shown, [1, 2]);
}

#[test]
fn set_chart_while_expanded_reloads_in_place() {
    let mut view = view_with(HeadlessSurfaceProvider::new());
    view.expand().expect("expand");
    let created = view.provider().created_surfaces();

    view.set_chart(
        ChartType::Donut,
        SeriesData::from_pairs(&["X", "Y"], &[1.0, 3.0]),
        Some("Q3".to_owned()),
    )
    .expect("set chart");

    assert_eq!(view.provider().created_surfaces(), created);
    let host = view.interactive_host().expect("host");
    assert_eq!(host.load_count, 2);
    let payload = read_embedded_payload(host.current().expect("bundle").content()).expect("payload");
    assert_eq!(payload.chart_type, ChartType::Donut);
    assert_eq!(payload.title, "Orders");
    assert_eq!(payload.subtitle.as_deref(), Some("Q3"));
    assert_eq!(payload.items.len(), 2);
}

#[test]
fn set_chart_resets_interaction_state() {
    let mut view = view_with(HeadlessSurfaceProvider::new());
    view.toggle_category("A", ms(100)).expect("toggle");
    view.toggle_sort(ms(200)).expect("sort");
    view.set_chart(
        ChartType::Bar,
        SeriesData::from_pairs(&["A", "B"], &[1.0, 2.0]),
        None,
    )
    .expect("set chart");
    assert!(view.state().hidden_items().is_empty());
    assert_eq!(view.state().sort_order(), SortOrder::Original);
    assert!(!view.is_sort_animating());
}

#[test]
fn theme_switch_rerenders_live_surface() {
    let mut view = view_with(HeadlessSurfaceProvider::new());
    let before = view.redraw_count();
    view.set_theme(ThemeContext::dark()).expect("theme");
    assert_eq!(view.redraw_count(), before + 1);
    assert_eq!(view.theme(), &ThemeContext::dark());
    assert_eq!(
        view.static_renderer().expect("renderer").render_count,
        3,
        "init, set_spec and theme switch each draw once"
    );
}

#[test]
fn pointer_hover_and_click_drive_the_static_surface() {
    let mut view = view_with(HeadlessSurfaceProvider::new());
    let (x, y) = view
        .static_render()
        .expect("static")
        .regions()
        .iter()
        .find(|region| region.original_index == 1)
        .expect("region for B")
        .anchor();

    let hover = view.pointer_move(x, y, ms(100)).expect("hover");
    assert!(hover.redraw_now());
    assert_eq!(view.state().hover_index(), Some(1));
    assert_eq!(hover.tooltip.expect("tooltip").label, "B");

    let click = view.click(x, y, ms(200)).expect("click");
    assert!(click.toggle.is_some());
    assert!(view.state().is_hidden("B"));

    view.pointer_leave(ms(300)).expect("leave");
    assert_eq!(view.state().hover_index(), None);
}

#[test]
fn throttled_hover_is_flushed_by_tick() {
    let mut view = view_with(HeadlessSurfaceProvider::new());
    let anchors: Vec<(f64, f64)> = view
        .static_render()
        .expect("static")
        .regions()
        .iter()
        .map(|region| region.anchor())
        .collect();

    let first = view.pointer_move(anchors[0].0, anchors[0].1, ms(100)).expect("hover");
    assert!(first.redraw_now());
    let second = view.pointer_move(anchors[1].0, anchors[1].1, ms(110)).expect("hover");
    assert!(!second.redraw_now());
    assert_eq!(view.next_deadline(), Some(ms(150)));

    let before = view.redraw_count();
    assert!(!view.tick(ms(140)).expect("early tick"));
    assert!(view.tick(ms(150)).expect("due tick"));
    assert_eq!(view.redraw_count(), before + 1);
}

#[test]
fn static_sort_animates_bar_slots_then_settles() {
    let mut view = view_with(HeadlessSurfaceProvider::new());
    view.toggle_sort(ms(100)).expect("sort");
    assert!(view.is_sort_animating());

    view.tick(ms(250)).expect("mid tick");
    assert!(view.is_sort_animating());
    view.tick(ms(400)).expect("final tick");
    assert!(!view.is_sort_animating());

    let regions = view.static_render().expect("static").regions();
    let mut by_x: Vec<(f64, usize)> = regions
        .iter()
        .map(|region| (region.anchor().0, region.original_index))
        .collect();
    by_x.sort_by(|left, right| left.0.total_cmp(&right.0));
    let order: Vec<usize> = by_x.into_iter().map(|(_, index)| index).collect();
    assert_eq!(order, [1, 2, 0]);
}

#[test]
fn hiding_the_last_category_through_the_view_is_rejected() {
    let mut view = view_with(HeadlessSurfaceProvider::new());
    view.toggle_category("A", ms(100)).expect("hide A");
    view.toggle_category("B", ms(200)).expect("hide B");
    let outcome = view.toggle_category("C", ms(300)).expect("hide C");
    assert!(!outcome.changed());
    assert!(!view.state().is_hidden("C"));
}

#[test]
fn external_viewer_completion_is_delivered_once() {
    let mut view = view_with(HeadlessSurfaceProvider::new());
    let path = view
        .open_in_external_viewer(|path: &Path| -> ChartResult<()> {
            assert!(path.exists());
            Ok(())
        })
        .expect("launch");

    let completion = wait_for_completion(&mut view).expect("completion");
    assert_eq!(completion.outcome, ViewerOutcome::Opened);
    assert_eq!(completion.path, path);
    assert!(view.poll_external_viewer().is_none());
    let _ = std::fs::remove_file(path);
}

#[test]
fn external_viewer_completion_from_before_a_transition_is_discarded() {
    let mut view = view_with(HeadlessSurfaceProvider::new());
    let (release, gate) = release_gate();
    let path = view
        .open_in_external_viewer(move |_: &Path| -> ChartResult<()> {
            let _ = gate.recv();
            Err(ChartError::Surface("viewer closed".to_owned()))
        })
        .expect("launch");

    view.expand().expect("expand");
    release();
    for _ in 0..200 {
        if !view.has_pending_viewer() {
            break;
        }
        assert!(view.poll_external_viewer().is_none());
        std::thread::sleep(ms(5));
    }
    assert!(!view.has_pending_viewer());
    let _ = std::fs::remove_file(path);
}

fn wait_for_completion(
    view: &mut ChartView<HeadlessSurfaceProvider>,
) -> Option<report_chart::api::ViewerCompletion> {
    for _ in 0..200 {
        if let Some(completion) = view.poll_external_viewer() {
            return Some(completion);
        }
        std::thread::sleep(ms(5));
    }
    None
}

fn release_gate() -> (impl FnOnce(), std::sync::mpsc::Receiver<()>) {
    let (sender, receiver) = std::sync::mpsc::channel();
    (
        move || {
            let _ = sender.send(());
        },
        receiver,
    )
}
