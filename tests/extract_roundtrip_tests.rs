use approx::assert_relative_eq;
use report_chart::backend::StaticBackend;
use report_chart::core::{
    ChartSpec, ChartType, DataPoint, NamedSeries, SeriesData, ThemeContext, Viewport,
};
use report_chart::interaction::{InteractionState, SortOrder};
use report_chart::{ExtractedChart, extract_chart};

fn round_trip(spec: &ChartSpec, state: &InteractionState) -> ChartSpec {
    let render = StaticBackend::default().render(
        spec,
        &ThemeContext::light(),
        state,
        Viewport::new(800, 500),
    );
    match extract_chart(render.frame()) {
        ExtractedChart::Known(spec) => spec,
        ExtractedChart::Unknown { texts, .. } => panic!("frame not recognized: {texts:?}"),
    }
}

fn categories(spec: &ChartSpec) -> Vec<(String, f64)> {
    match &spec.series {
        SeriesData::Categories(categories) => categories
            .iter()
            .map(|category| (category.label.clone(), category.value))
            .collect(),
        SeriesData::Multi(series) => panic!("expected categories, got {} series", series.len()),
    }
}

fn assert_categories(actual: &ChartSpec, expected: &[(&str, f64)]) {
    let actual = categories(actual);
    assert_eq!(actual.len(), expected.len());
    for ((label, value), (expected_label, expected_value)) in actual.iter().zip(expected) {
        assert_eq!(label, expected_label);
        assert_relative_eq!(*value, *expected_value, epsilon = 1e-4);
    }
}

#[test]
fn vertical_bars_round_trip_with_title_and_subtitle() {
    let spec = ChartSpec::categories(ChartType::Bar, &["A", "B", "C"], &[10.0, 30.0, 20.0])
        .with_title("Orders by region")
        .with_subtitle(Some("Last 30 days".to_owned()));
    let extracted = round_trip(&spec, &InteractionState::default());

    assert_eq!(extracted.chart_type, ChartType::Bar);
    assert_eq!(extracted.title, "Orders by region");
    assert_eq!(extracted.subtitle.as_deref(), Some("Last 30 days"));
    assert_categories(&extracted, &[("A", 10.0), ("B", 30.0), ("C", 20.0)]);
}

#[test]
fn sorted_bars_extract_in_display_order() {
    let spec = ChartSpec::categories(ChartType::Bar, &["A", "B", "C"], &[10.0, 30.0, 20.0]);
    let mut state = InteractionState::default();
    state.set_sort_order(SortOrder::Descending);
    let extracted = round_trip(&spec, &state);
    assert_categories(&extracted, &[("B", 30.0), ("C", 20.0), ("A", 10.0)]);
}

#[test]
fn horizontal_bars_round_trip() {
    let spec = ChartSpec::categories(
        ChartType::HorizontalBar,
        &["North", "South", "East", "West"],
        &[120.0, 45.5, 80.0, 10.0],
    );
    let extracted = round_trip(&spec, &InteractionState::default());
    assert_eq!(extracted.chart_type, ChartType::HorizontalBar);
    assert_categories(
        &extracted,
        &[("North", 120.0), ("South", 45.5), ("East", 80.0), ("West", 10.0)],
    );
}

#[test]
fn donut_round_trip_recovers_values_from_angles_and_total() {
    let spec = ChartSpec::categories(ChartType::Donut, &["A", "B", "C"], &[10.0, 30.0, 20.0]);
    let extracted = round_trip(&spec, &InteractionState::default());
    assert_eq!(extracted.chart_type, ChartType::Donut);
    assert_categories(&extracted, &[("A", 10.0), ("B", 30.0), ("C", 20.0)]);
}

#[test]
fn donut_without_labels_falls_back_to_generic_names() {
    let spec = ChartSpec::categories(ChartType::Donut, &["A", "B"], &[1.0, 3.0]);
    let render = StaticBackend::default().render(
        &spec,
        &ThemeContext::light(),
        &InteractionState::default(),
        Viewport::new(600, 400),
    );
    let mut frame = render.into_frame();
    frame.texts.clear();
    let extracted = extract_chart(&frame).into_spec().expect("known");
    let labels: Vec<String> = categories(&extracted).into_iter().map(|(label, _)| label).collect();
    assert_eq!(labels, ["Category 1", "Category 2"]);
}

#[test]
fn single_line_round_trips_as_categories() {
    let spec = ChartSpec::categories(
        ChartType::Line,
        &["Jan", "Feb", "Mar", "Apr"],
        &[5.0, 12.0, 8.0, 20.0],
    );
    let extracted = round_trip(&spec, &InteractionState::default());
    assert_eq!(extracted.chart_type, ChartType::Line);
    assert_categories(
        &extracted,
        &[("Jan", 5.0), ("Feb", 12.0), ("Mar", 8.0), ("Apr", 20.0)],
    );
}

#[test]
fn multi_series_area_round_trips_named_series() {
    let spec = ChartSpec::new(
        ChartType::Area,
        SeriesData::Multi(vec![
            NamedSeries::new(
                "Online",
                vec![
                    DataPoint::new(0.0, 4.0),
                    DataPoint::new(1.0, 9.0),
                    DataPoint::new(2.0, 6.0),
                ],
            ),
            NamedSeries::new(
                "Retail",
                vec![
                    DataPoint::new(0.0, 2.0),
                    DataPoint::new(1.0, 3.0),
                    DataPoint::new(2.0, 7.0),
                ],
            ),
        ]),
    );
    let extracted = round_trip(&spec, &InteractionState::default());
    assert_eq!(extracted.chart_type, ChartType::Area);
    let SeriesData::Multi(series) = &extracted.series else {
        panic!("expected named series");
    };
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].name, "Online");
    assert_eq!(series[1].name, "Retail");
    for (actual, expected) in series[1].points.iter().zip([(0.0, 2.0), (1.0, 3.0), (2.0, 7.0)]) {
        assert_relative_eq!(actual.x, expected.0, epsilon = 1e-4);
        assert_relative_eq!(actual.y, expected.1, epsilon = 1e-4);
    }
}

#[test]
fn placeholder_frame_extracts_as_unknown() {
    let spec = ChartSpec::empty(ChartType::Bar).with_title("Nothing yet");
    let render = StaticBackend::default().render(
        &spec,
        &ThemeContext::light(),
        &InteractionState::default(),
        Viewport::new(400, 300),
    );
    let extracted = extract_chart(render.frame());
    assert!(extracted.is_unknown());
    match extracted {
        ExtractedChart::Unknown { title, texts } => {
            assert_eq!(title, "Nothing yet");
            assert!(texts.iter().any(|text| text == "No data to display"));
        }
        ExtractedChart::Known(spec) => panic!("unexpected spec {spec:?}"),
    }
}
