use report_chart::core::{LinearScale, format_value, parse_value};

#[test]
fn scale_round_trip_within_tolerance() {
    let scale = LinearScale::new(10.0, 110.0, 0.0, 1000.0).expect("valid scale");

    let original = 42.5;
    let px = scale.domain_to_pixel(original);
    let recovered = scale.pixel_to_domain(px);

    let epsilon = 1e-9;
    assert!((recovered - original).abs() <= epsilon);
}

#[test]
fn degenerate_domain_is_rejected() {
    assert!(LinearScale::new(5.0, 5.0, 0.0, 100.0).is_err());
    assert!(LinearScale::new(f64::NAN, 1.0, 0.0, 100.0).is_err());
    assert!(LinearScale::new(0.0, 1.0, 0.0, f64::INFINITY).is_err());
}

#[test]
fn value_scale_covers_negative_values_with_headroom() {
    let scale = LinearScale::for_values([-20.0, 40.0], 1.1, 500.0, 0.0).expect("scale");
    let (start, end) = scale.domain();
    assert!((start + 22.0).abs() < 1e-9);
    assert!((end - 44.0).abs() < 1e-9);
    assert!(scale.domain_to_pixel(0.0) < 500.0);
}

#[test]
fn all_negative_values_end_the_domain_at_zero() {
    let scale = LinearScale::for_values([-5.0, -10.0], 1.15, 0.0, 100.0).expect("scale");
    let (start, end) = scale.domain();
    assert!(start < 0.0);
    assert_eq!(end, 0.0);
}

#[test]
fn extent_from_zero_is_symmetric_for_signed_values() {
    let scale = LinearScale::new(-50.0, 50.0, 0.0, 200.0).expect("scale");
    assert!((scale.extent_from_zero(25.0) - scale.extent_from_zero(-25.0)).abs() < 1e-9);
    assert!((scale.extent_from_zero(50.0) - 100.0).abs() < 1e-9);
}

#[test]
fn tick_labels_parse_back_to_tick_values() {
    let scale = LinearScale::for_values([0.0, 1234.5], 1.15, 400.0, 0.0).expect("scale");
    for tick in scale.ticks(5) {
        let label = format_value(tick);
        let parsed = parse_value(&label).expect("numeric tick label");
        assert!((parsed - tick).abs() < 1e-6, "{label} != {tick}");
    }
}
