use approx::assert_abs_diff_eq;
use chart_drawings::core::{
    CoordinateMapper, DataPoint, PixelPoint, PriceScale, PriceScaleMode, TimeScale, Viewport,
};

fn linear_mapper() -> CoordinateMapper {
    CoordinateMapper::new(
        TimeScale::new(0.0, 100.0).expect("time scale"),
        PriceScale::new(0.0, 200.0).expect("price scale"),
        Viewport::new(1000, 500),
    )
}

#[test]
fn data_point_maps_to_expected_pixel() {
    let mapper = linear_mapper();
    let pixel = mapper
        .to_pixel(DataPoint::new(10.0, 100.0))
        .expect("to pixel");
    assert_abs_diff_eq!(pixel.x, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(pixel.y, 250.0, epsilon = 1e-9);
}

#[test]
fn round_trip_within_tolerance() {
    let mapper = linear_mapper();
    let original = DataPoint::new(42.25, 137.5);
    let recovered = mapper
        .to_data(mapper.to_pixel(original).expect("to pixel"))
        .expect("to data");
    assert_abs_diff_eq!(recovered.x, original.x, epsilon = 1e-9);
    assert_abs_diff_eq!(recovered.y, original.y, epsilon = 1e-9);
}

#[test]
fn mapping_is_monotonic_on_both_axes() {
    let mapper = linear_mapper();
    let low = mapper.to_pixel(DataPoint::new(5.0, 50.0)).expect("low");
    let high = mapper.to_pixel(DataPoint::new(6.0, 51.0)).expect("high");
    assert!(high.x > low.x);
    // Screen Y grows downwards: a higher price sits higher on screen.
    assert!(high.y < low.y);
}

#[test]
fn bars_outside_loaded_range_extrapolate_linearly() {
    let mapper = linear_mapper();
    assert_abs_diff_eq!(mapper.bar_to_x(-10.0).expect("left"), -100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(mapper.bar_to_x(150.0).expect("right"), 1500.0, epsilon = 1e-9);
    assert_abs_diff_eq!(mapper.price_to_y(300.0).expect("above"), -250.0, epsilon = 1e-9);
}

#[test]
fn pixel_delta_converts_to_data_delta() {
    let mapper = linear_mapper();
    let delta = mapper
        .pixel_delta_to_data(PixelPoint::new(100.0, 250.0), 50.0, -25.0)
        .expect("delta");
    assert_abs_diff_eq!(delta.dx, 5.0, epsilon = 1e-9);
    assert_abs_diff_eq!(delta.dy, 10.0, epsilon = 1e-9);
}

#[test]
fn visible_range_drives_horizontal_mapping() {
    let mut time_scale = TimeScale::new(0.0, 100.0).expect("time scale");
    time_scale
        .set_visible_range(50.0, 100.0)
        .expect("visible range");
    let mapper = CoordinateMapper::new(
        time_scale,
        PriceScale::new(0.0, 200.0).expect("price scale"),
        Viewport::new(1000, 500),
    );
    assert_abs_diff_eq!(mapper.bar_to_x(75.0).expect("x"), 500.0, epsilon = 1e-9);
}

#[test]
fn log_scale_round_trip() {
    let mapper = CoordinateMapper::new(
        TimeScale::new(0.0, 100.0).expect("time scale"),
        PriceScale::new_with_mode(1.0, 10_000.0, PriceScaleMode::Log).expect("log scale"),
        Viewport::new(800, 600),
    );
    let original = DataPoint::new(12.0, 250.0);
    let recovered = mapper
        .to_data(mapper.to_pixel(original).expect("to pixel"))
        .expect("to data");
    assert_abs_diff_eq!(recovered.y, original.y, epsilon = 1e-6);

    // Decades are evenly spaced on a log axis.
    let y1 = mapper.price_to_y(10.0).expect("10");
    let y2 = mapper.price_to_y(100.0).expect("100");
    let y3 = mapper.price_to_y(1_000.0).expect("1000");
    assert_abs_diff_eq!(y1 - y2, y2 - y3, epsilon = 1e-9);
}

#[test]
fn margins_shrink_the_plot_band() {
    let price_scale = PriceScale::new(0.0, 100.0)
        .expect("price scale")
        .with_margins(0.1, 0.2)
        .expect("margins");
    let mapper = CoordinateMapper::new(
        TimeScale::new(0.0, 10.0).expect("time scale"),
        price_scale,
        Viewport::new(400, 1000),
    );
    assert_abs_diff_eq!(mapper.price_to_y(100.0).expect("top"), 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(mapper.price_to_y(0.0).expect("bottom"), 800.0, epsilon = 1e-9);
}

#[test]
fn degenerate_viewport_is_rejected() {
    let mapper = CoordinateMapper::new(
        TimeScale::new(0.0, 100.0).expect("time scale"),
        PriceScale::new(0.0, 200.0).expect("price scale"),
        Viewport::new(0, 0),
    );
    assert!(mapper.to_pixel(DataPoint::new(1.0, 1.0)).is_err());
    assert!(mapper.to_data(PixelPoint::new(1.0, 1.0)).is_err());
}

#[test]
fn non_finite_input_is_rejected() {
    let mapper = linear_mapper();
    assert!(mapper.to_pixel(DataPoint::new(f64::NAN, 1.0)).is_err());
    assert!(mapper.to_data(PixelPoint::new(1.0, f64::INFINITY)).is_err());
}
