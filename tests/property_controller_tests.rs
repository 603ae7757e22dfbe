mod common;

use bike_dash::app::controller::{ControlEvent, Controller};
use bike_dash::app::pipeline::run_render;
use bike_dash::chart::{Trace, render};
use bike_dash::domain::{ChartKind, GroupingMode, Selection};
use bike_dash::view::resolve;
use proptest::prelude::*;

const NUMERIC_X: [&str; 2] = ["Hour", "Temperature(C)"];
const CATEGORICAL_X: [&str; 2] = ["Holiday", "Functioning Day"];

fn any_kind() -> impl Strategy<Value = ChartKind> {
    prop::sample::select(ChartKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn numeric_to_categorical_resets_kind_to_bar(
        from in prop::sample::select(NUMERIC_X.to_vec()),
        to in prop::sample::select(CATEGORICAL_X.to_vec()),
        kind in any_kind()
    ) {
        let ds = common::fixture();
        let mut c = Controller::new(&ds).expect("controller");
        c.apply(ControlEvent::SetXField(from.to_string())).expect("numeric x");
        // Kinds the numeric field does not offer are rejected; either way the
        // current kind is some numeric option.
        let _ = c.apply(ControlEvent::SetChartKind(kind));
        c.apply(ControlEvent::SetXField(to.to_string())).expect("categorical x");
        prop_assert_eq!(c.state().chart_kind, ChartKind::Bar);
        prop_assert_eq!(c.chart().kind, ChartKind::Bar);
    }

    #[test]
    fn categorical_to_numeric_resets_kind_to_scatter(
        from in prop::sample::select(CATEGORICAL_X.to_vec()),
        to in prop::sample::select(NUMERIC_X.to_vec()),
        pie in any::<bool>()
    ) {
        let ds = common::fixture();
        let mut c = Controller::new(&ds).expect("controller");
        c.apply(ControlEvent::SetXField(from.to_string())).expect("categorical x");
        if pie {
            c.apply(ControlEvent::SetChartKind(ChartKind::Pie)).expect("pie is offered");
        }
        c.apply(ControlEvent::SetXField(to.to_string())).expect("numeric x");
        prop_assert_eq!(c.state().chart_kind, ChartKind::Scatter);
    }

    #[test]
    fn grouping_round_trip_restores_view(month in 0usize..3, season in 0usize..2) {
        let ds = common::fixture();
        let mut c = Controller::new(&ds).expect("controller");
        c.apply(ControlEvent::SetMonthIndex(month)).expect("month");
        let before = run_render(&ds, c.state()).expect("render").view.rows().to_vec();
        let chart_before = c.chart().clone();

        c.apply(ControlEvent::SetGrouping(GroupingMode::Season)).expect("season mode");
        c.apply(ControlEvent::SetSeasonIndex(season)).expect("season");
        c.apply(ControlEvent::SetGrouping(GroupingMode::Month)).expect("month mode");

        prop_assert_eq!(c.state().month_index, month);
        let after = run_render(&ds, c.state()).expect("render").view.rows().to_vec();
        prop_assert_eq!(before, after);
        prop_assert_eq!(&chart_before, c.chart());
    }

    #[test]
    fn histogram_ignores_y(x in prop::sample::select(NUMERIC_X.to_vec()), month in 0usize..3) {
        let ds = common::fixture();
        let view = resolve(&ds, Selection::Month(month)).expect("view");
        let a = render(&view, x, "Rented Bike Count", ChartKind::Histogram).expect("render");
        let b = render(&view, x, "Temperature(C)", ChartKind::Histogram).expect("render");
        let is_histogram = matches!(a.trace, Trace::Histogram { .. });
        prop_assert!(is_histogram);
        prop_assert_eq!(a.trace, b.trace);
    }
}
