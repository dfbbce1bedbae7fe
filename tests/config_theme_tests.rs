use std::time::Duration;

use report_chart::api::{ChartView, ChartViewConfig, HeadlessSurfaceProvider};
use report_chart::core::{ThemeContext, ThemeMode, Viewport};
use report_chart::ChartError;

#[test]
fn default_config_is_valid() {
    let config = ChartViewConfig::default();
    config.validate().expect("defaults validate");
    assert_eq!(config.redraw_interval(), Duration::from_millis(50));
    assert_eq!(config.transition(), Duration::from_millis(300));
    assert!(config.interactive_enabled);
    assert!((0.6..=0.7).contains(&config.donut_hole_ratio));
}

#[test]
fn partial_json_config_takes_defaults_for_missing_fields() {
    let config = ChartViewConfig::from_json_str(
        r#"{ "redraw_interval_ms": 16, "expanded_size": { "width": 1600, "height": 900 } }"#,
    )
    .expect("config");
    assert_eq!(config.redraw_interval(), Duration::from_millis(16));
    assert_eq!(config.expanded_size, Viewport::new(1600, 900));
    assert_eq!(config.compact_size, ChartViewConfig::default().compact_size);

    let json = config.to_json_pretty().expect("serialize");
    assert_eq!(ChartViewConfig::from_json_str(&json).expect("reload"), config);
}

#[test]
fn invalid_configs_are_rejected() {
    let hole = ChartViewConfig::default().with_donut_hole_ratio(0.9);
    assert!(matches!(hole.validate(), Err(ChartError::InvalidData(_))));

    let interval = ChartViewConfig::default().with_redraw_interval(Duration::ZERO);
    assert!(matches!(interval.validate(), Err(ChartError::InvalidData(_))));

    let viewport = ChartViewConfig::default().with_compact_size(Viewport::new(0, 10));
    assert!(matches!(
        viewport.validate(),
        Err(ChartError::InvalidViewport { width: 0, height: 10 })
    ));

    assert!(ChartViewConfig::from_json_str(r#"{ "donut_hole_ratio": 0.2 }"#).is_err());
    assert!(ChartViewConfig::from_json_str("not json").is_err());
}

#[test]
fn view_construction_validates_config() {
    let config = ChartViewConfig::default().with_redraw_interval(Duration::ZERO);
    let result = ChartView::new(config, HeadlessSurfaceProvider::new(), ThemeContext::light());
    assert!(result.is_err());
}

#[test]
fn builtin_themes_differ_only_in_mode_dependent_tokens() {
    let light = ThemeContext::light();
    let dark = ThemeContext::dark();
    light.validate().expect("light");
    dark.validate().expect("dark");
    assert_eq!(light.mode(), ThemeMode::Light);
    assert_eq!(dark.mode(), ThemeMode::Dark);
    assert_eq!(light.palette(), dark.palette());
    assert_ne!(light.tokens().background, dark.tokens().background);
    assert_eq!(ThemeContext::for_mode(ThemeMode::Dark), dark);
    assert_eq!(light.typography().font_family, "Inter");
}

#[test]
fn palette_wraps_around() {
    let theme = ThemeContext::light();
    let len = theme.palette().len();
    assert_eq!(theme.color_for_index(len), theme.color_for_index(0));
    assert_eq!(theme.color_for_index(len + 3), theme.palette()[3]);
}

#[test]
fn theme_json_round_trips_and_validates() {
    let json = serde_json::to_string(&ThemeContext::dark()).expect("serialize");
    assert_eq!(ThemeContext::from_json_str(&json).expect("parse"), ThemeContext::dark());

    let mut value: serde_json::Value = serde_json::from_str(&json).expect("value");
    value["palette"] = serde_json::json!([]);
    let err = ThemeContext::from_json_str(&value.to_string()).expect_err("empty palette");
    assert!(matches!(err, ChartError::InvalidData(_)));
}
