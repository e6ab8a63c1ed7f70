use chart_drawings::core::{
    CoordinateMapper, DataPoint, PriceScale, PriceScaleMode, TimeScale, Viewport,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn linear_round_trip_for_any_view_window(
        bar_start in -5_000.0f64..5_000.0,
        bar_span in 2.0f64..10_000.0,
        price_min in -10_000.0f64..10_000.0,
        price_span in 0.01f64..50_000.0,
        width in 50u32..4_000,
        height in 50u32..3_000,
        bar_factor in -1.0f64..2.0,
        price_factor in -1.0f64..2.0
    ) {
        let mapper = CoordinateMapper::new(
            TimeScale::new(bar_start, bar_start + bar_span).expect("time scale"),
            PriceScale::new(price_min, price_min + price_span).expect("price scale"),
            Viewport::new(width, height),
        );
        let original = DataPoint::new(
            bar_start + bar_span * bar_factor,
            price_min + price_span * price_factor,
        );
        let recovered = mapper
            .to_data(mapper.to_pixel(original).expect("to pixel"))
            .expect("to data");

        let bar_tolerance = 1e-9 * (1.0 + original.x.abs() + bar_span);
        let price_tolerance = 1e-9 * (1.0 + original.y.abs() + price_span);
        prop_assert!((recovered.x - original.x).abs() <= bar_tolerance);
        prop_assert!((recovered.y - original.y).abs() <= price_tolerance);
    }

    #[test]
    fn log_round_trip_for_positive_prices(
        price_min in 0.01f64..1_000.0,
        price_ratio in 1.5f64..1_000.0,
        price_factor in 0.0f64..1.0,
        bar in 0.0f64..500.0
    ) {
        let price_max = price_min * price_ratio;
        let mapper = CoordinateMapper::new(
            TimeScale::new(0.0, 500.0).expect("time scale"),
            PriceScale::new_with_mode(price_min, price_max, PriceScaleMode::Log)
                .expect("log scale"),
            Viewport::new(1200, 700),
        );
        let price = price_min + (price_max - price_min) * price_factor;
        let original = DataPoint::new(bar, price);
        let recovered = mapper
            .to_data(mapper.to_pixel(original).expect("to pixel"))
            .expect("to data");

        prop_assert!((recovered.x - original.x).abs() <= 1e-9 * (1.0 + bar));
        prop_assert!((recovered.y - original.y).abs() <= 1e-9 * price_max);
    }

    #[test]
    fn mapping_preserves_order(
        a in 0.0f64..100.0,
        b in 0.0f64..100.0
    ) {
        prop_assume!((a - b).abs() > 1e-6);
        let mapper = CoordinateMapper::new(
            TimeScale::new(0.0, 100.0).expect("time scale"),
            PriceScale::new(0.0, 100.0).expect("price scale"),
            Viewport::new(640, 480),
        );
        let pa = mapper.to_pixel(DataPoint::new(a, a)).expect("a");
        let pb = mapper.to_pixel(DataPoint::new(b, b)).expect("b");
        prop_assert_eq!(a < b, pa.x < pb.x);
        prop_assert_eq!(a < b, pa.y > pb.y);
    }
}
