use report_chart::core::Viewport;
use report_chart::render::{
    Color, LinePrimitive, NullRenderer, PolylinePrimitive, RectPrimitive, RenderFrame, Renderer,
    TextHAlign, TextPrimitive, WedgePrimitive, frame_to_svg,
};

fn sample_frame() -> RenderFrame {
    let ink = Color::rgb(0.1, 0.1, 0.1);
    RenderFrame::new(Viewport::new(400, 300))
        .with_rect(RectPrimitive::new(10.0, 20.0, 30.0, 100.0, ink).with_corner_radius(2.0))
        .with_line(LinePrimitive::new(0.0, 250.0, 400.0, 250.0, 1.0, ink))
        .with_polyline(PolylinePrimitive::new(vec![(0.0, 0.0), (50.0, 40.0)], 2.0, ink))
        .with_wedge(WedgePrimitive {
            center_x: 200.0,
            center_y: 150.0,
            inner_radius: 40.0,
            outer_radius: 60.0,
            start_angle_deg: -90.0,
            sweep_deg: 120.0,
            fill_color: ink,
        })
        .with_text(TextPrimitive::new("A & B", 20.0, 260.0, 11.0, ink, TextHAlign::Center))
}

#[test]
fn null_renderer_receives_frame_counts() {
    let frame = sample_frame();
    frame.validate().expect("valid frame");
    assert_eq!(frame.primitive_count(), 5);

    let mut renderer = NullRenderer::default();
    renderer.render(&frame).expect("render");
    assert_eq!(renderer.render_count, 1);
    assert_eq!(renderer.last_rect_count, 1);
    assert_eq!(renderer.last_line_count, 1);
    assert_eq!(renderer.last_polyline_count, 1);
    assert_eq!(renderer.last_wedge_count, 1);
    assert_eq!(renderer.last_text_count, 1);
}

#[test]
fn invalid_primitives_are_rejected_before_drawing() {
    let ink = Color::rgb(0.0, 0.0, 0.0);
    let frame = RenderFrame::new(Viewport::new(100, 100))
        .with_rect(RectPrimitive::new(0.0, 0.0, -4.0, 10.0, ink));
    assert!(frame.validate().is_err());

    let mut renderer = NullRenderer::default();
    assert!(renderer.render(&frame).is_err());
    assert_eq!(renderer.render_count, 0);

    let empty_text = RenderFrame::new(Viewport::new(100, 100))
        .with_text(TextPrimitive::new("", 0.0, 0.0, 10.0, ink, TextHAlign::Left));
    assert!(empty_text.validate().is_err());
}

#[test]
fn svg_writer_escapes_text_and_keeps_every_primitive() {
    let svg = frame_to_svg(&sample_frame(), Color::rgb(1.0, 1.0, 1.0), "Inter");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("A &amp; B"));
    assert!(svg.contains("<polyline"));
    assert!(svg.contains("<path"));
    assert!(svg.trim_end().ends_with("</svg>"));
}
