use criterion::{Criterion, criterion_group, criterion_main};
use report_chart::backend::{InteractiveBackend, StaticBackend};
use report_chart::core::{ChartSpec, ChartType, ThemeContext, Viewport};
use report_chart::extract_chart;
use report_chart::interaction::InteractionState;
use std::hint::black_box;

fn category_spec(chart_type: ChartType, count: usize) -> ChartSpec {
    let labels: Vec<String> = (0..count).map(|i| format!("Region {i}")).collect();
    let values: Vec<f64> = (0..count)
        .map(|i| 100.0 + ((i * 37) % 211) as f64 * 3.5)
        .collect();
    ChartSpec::categories(chart_type, &labels, &values).with_title("Revenue by region")
}

fn bench_static_bar_frame_200(c: &mut Criterion) {
    let backend = StaticBackend::default();
    let theme = ThemeContext::light();
    let state = InteractionState::default();
    let spec = category_spec(ChartType::Bar, 200);
    let viewport = Viewport::new(1600, 900);

    c.bench_function("static_bar_frame_200", |b| {
        b.iter(|| {
            let _ = backend.render(
                black_box(&spec),
                black_box(&theme),
                black_box(&state),
                black_box(viewport),
            );
        })
    });
}

fn bench_interactive_bundle_200(c: &mut Criterion) {
    let backend = InteractiveBackend::default();
    let theme = ThemeContext::dark();
    let state = InteractionState::default();
    let spec = category_spec(ChartType::Donut, 200);
    let viewport = Viewport::new(1200, 760);

    c.bench_function("interactive_bundle_200", |b| {
        b.iter(|| {
            let _ = backend.generate(
                black_box(&spec),
                black_box(&theme),
                black_box(&state),
                None,
                black_box(viewport),
            );
        })
    });
}

fn bench_extract_bar_frame_50(c: &mut Criterion) {
    let theme = ThemeContext::light();
    let state = InteractionState::default();
    let spec = category_spec(ChartType::Bar, 50);
    let render = StaticBackend::default().render(&spec, &theme, &state, Viewport::new(1600, 900));

    c.bench_function("extract_bar_frame_50", |b| {
        b.iter(|| {
            let _ = extract_chart(black_box(render.frame()));
        })
    });
}

criterion_group!(
    benches,
    bench_static_bar_frame_200,
    bench_interactive_bundle_200,
    bench_extract_bar_frame_50
);
criterion_main!(benches);
