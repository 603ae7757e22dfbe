mod common;

use approx::assert_relative_eq;
use bike_dash::app::controller::{ControlEvent, Controller};
use bike_dash::chart::{NO_DATA_MESSAGE, Trace, options_for, render};
use bike_dash::data::{SampleConfig, generate_sample, write_sample_csv};
use bike_dash::domain::{ChartKind, GroupingMode, Selection};
use bike_dash::error::DataLoadError;
use bike_dash::io::{load_dataset, read_dataset};
use bike_dash::view::{View, resolve};
use chrono::NaiveDate;

fn has_winter_record(ds: &bike_dash::data::Dataset, rows: &[usize]) -> bool {
    rows.iter().any(|&r| {
        ds.date(r) == NaiveDate::from_ymd_opt(2017, 12, 1).unwrap()
            && ds.season(r) == "Winter"
            && ds.numeric("Rented Bike Count").unwrap()[r] == 254.0
    })
}

#[test]
fn december_winter_record_follows_the_active_selection() {
    let ds = common::fixture();
    let dec = ds
        .month_keys()
        .iter()
        .position(|k| k.year == 2017 && k.month == 12)
        .unwrap();
    let winter = ds.season_labels().iter().position(|s| s == "Winter").unwrap();

    let mut c = Controller::new(&ds).unwrap();
    c.apply(ControlEvent::SetMonthIndex(dec)).unwrap();
    let view = resolve(&ds, c.state().selection()).unwrap();
    assert!(has_winter_record(&ds, view.rows()));

    c.apply(ControlEvent::SetGrouping(GroupingMode::Season)).unwrap();
    c.apply(ControlEvent::SetSeasonIndex(winter)).unwrap();
    let view = resolve(&ds, c.state().selection()).unwrap();
    assert!(has_winter_record(&ds, view.rows()));

    for other in (0..ds.month_keys().len()).filter(|&i| i != dec) {
        let view = resolve(&ds, Selection::Month(other)).unwrap();
        assert!(!has_winter_record(&ds, view.rows()));
    }
}

#[test]
fn chart_options_follow_field_kind() {
    let ds = common::fixture();

    let holiday = options_for(&ds, "Holiday");
    assert_eq!(holiday.kinds, &[ChartKind::Bar, ChartKind::Pie]);
    assert_eq!(holiday.default, ChartKind::Bar);

    let hour = options_for(&ds, "Hour");
    assert_eq!(
        hour.kinds,
        &[
            ChartKind::Scatter,
            ChartKind::Heatmap,
            ChartKind::Bar,
            ChartKind::Box,
            ChartKind::Histogram
        ]
    );
    assert_eq!(hour.default, ChartKind::Scatter);
}

#[test]
fn selectable_fields_skip_excluded_columns() {
    let ds = common::fixture();
    assert_eq!(
        ds.available_fields(),
        &["Hour", "Temperature(C)", "Holiday", "Functioning Day"]
    );
}

#[test]
fn codes_are_recoded_to_labels() {
    let ds = common::fixture();
    let holiday = ds.categorical("Holiday").unwrap();
    assert_eq!(holiday[2], "Holiday");
    assert_eq!(holiday[0], "No Holiday");
    let fd = ds.categorical("Functioning Day").unwrap();
    assert_eq!(fd[0], "Yes");
    assert_eq!(fd[3], "No");
}

#[test]
fn empty_view_renders_every_kind_with_annotation() {
    let ds = common::fixture();
    let view = View::from_rows(&ds, Selection::Month(0), "2017-12", Vec::new());

    for kind in ChartKind::ALL {
        let x = if matches!(kind, ChartKind::Pie) { "Holiday" } else { "Hour" };
        let spec = render(&view, x, "Rented Bike Count", kind).unwrap();
        assert!(spec.is_empty(), "{kind} should be empty");
        assert_eq!(spec.annotation.as_deref(), Some(NO_DATA_MESSAGE));
    }
}

#[test]
fn pie_shares_sum_to_one() {
    let ds = common::fixture();
    let view = resolve(&ds, Selection::Month(0)).unwrap();
    let spec = render(&view, "Holiday", "Rented Bike Count", ChartKind::Pie).unwrap();
    let Trace::Pie { slices } = &spec.trace else {
        panic!("expected pie");
    };
    let total: f64 = slices.iter().map(|s| s.share).sum();
    assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    assert_eq!(slices[0].label, "No Holiday");
    assert_relative_eq!(slices[0].value, 458.0);
}

#[test]
fn scatter_trend_matches_exact_line() {
    let data = "\
Date,Rented Bike Count,Hour,Seasons,Holiday,Functioning Day
01/06/2018,10,0,Summer,0,0
01/06/2018,13,1,Summer,0,0
01/06/2018,16,2,Summer,0,0
01/06/2018,19,3,Summer,0,0
";
    let ds = read_dataset(data.as_bytes()).unwrap();
    let view = resolve(&ds, Selection::Month(0)).unwrap();
    let spec = render(&view, "Hour", "Rented Bike Count", ChartKind::Scatter).unwrap();
    let Trace::Scatter { trend: Some(fit), .. } = &spec.trace else {
        panic!("expected scatter with trend");
    };
    assert_relative_eq!(fit.intercept, 10.0, epsilon = 1e-9);
    assert_relative_eq!(fit.slope, 3.0, epsilon = 1e-9);
    assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-9);
}

#[test]
fn load_rejects_bad_input() {
    let missing = "Date,Hour,Seasons,Holiday,Functioning Day\n01/12/2017,0,Winter,0,0\n";
    assert!(matches!(
        read_dataset(missing.as_bytes()),
        Err(DataLoadError::MissingColumn(c)) if c == "Rented Bike Count"
    ));

    let bad_date = "Date,Rented Bike Count,Hour,Seasons,Holiday,Functioning Day\n2017-12-01,1,0,Winter,0,0\n";
    assert!(matches!(
        read_dataset(bad_date.as_bytes()),
        Err(DataLoadError::InvalidDate { .. })
    ));

    let bad_code = "Date,Rented Bike Count,Hour,Seasons,Holiday,Functioning Day\n01/12/2017,1,0,Winter,7,0\n";
    assert!(matches!(
        read_dataset(bad_code.as_bytes()),
        Err(DataLoadError::UnknownCode { .. })
    ));

    assert!(matches!(
        load_dataset(std::path::Path::new("does/not/exist.csv")),
        Err(DataLoadError::Open { .. })
    ));
}

#[test]
fn synthetic_sample_loads_back() {
    let config = SampleConfig {
        start: NaiveDate::from_ymd_opt(2017, 12, 1).unwrap(),
        days: 45,
        seed: 7,
    };
    let rows = generate_sample(&config).unwrap();
    let path = std::env::temp_dir().join(format!("bikedash-sample-{}.csv", std::process::id()));
    write_sample_csv(&path, &rows).unwrap();

    let ds = load_dataset(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(ds.len(), 45 * 24);
    assert_eq!(ds.month_keys().len(), 2);
    assert_eq!(ds.season_labels(), &["Winter"]);
    assert!(ds.available_fields().iter().any(|f| f == "Hour"));
    assert!(!ds.available_fields().iter().any(|f| f == "Winter"));

    let c = Controller::new(&ds).unwrap();
    assert_eq!(c.state().chart_kind, ChartKind::Scatter);
    assert!(!c.chart().is_empty());
}
