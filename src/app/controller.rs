//! Reactive controller.
//!
//! Holds the control state and the chart derived from it. Each `ControlEvent`
//! is applied to completion before the next one:
//!
//! 1. an x-field change recomputes the chart options and resets the kind
//! 2. a grouping change flips slider visibility (indices are kept)
//! 3. every change re-resolves the view and re-renders the chart
//!
//! Rejected events leave state and chart untouched.

use tracing::{debug, warn};

use crate::chart::{ChartOptions, ChartSpec, options_for};
use crate::data::Dataset;
use crate::data::dataset::DEFAULT_X_FIELD;
use crate::domain::{ChartKind, ControlState, GroupingMode, InitialControls, SliderVisibility};
use crate::error::{ControlError, SelectionError};

/// One user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    SetXField(String),
    SetYField(String),
    SetChartKind(ChartKind),
    SetGrouping(GroupingMode),
    SetMonthIndex(usize),
    SetSeasonIndex(usize),
}

pub struct Controller<'a> {
    dataset: &'a Dataset,
    state: ControlState,
    options: ChartOptions,
    sliders: SliderVisibility,
    chart: ChartSpec,
}

impl<'a> Controller<'a> {
    /// Controller with the dashboard defaults: x = "Hour" (or the first
    /// selectable field), y = the response, grouping by month on the most
    /// recent month, first season.
    pub fn new(dataset: &'a Dataset) -> Result<Self, ControlError> {
        let x_field = if dataset.available_fields().iter().any(|f| f == DEFAULT_X_FIELD) {
            DEFAULT_X_FIELD.to_string()
        } else {
            dataset
                .available_fields()
                .first()
                .cloned()
                .ok_or_else(|| ControlError::UnknownXField(DEFAULT_X_FIELD.to_string()))?
        };
        let options = options_for(dataset, &x_field);
        let state = ControlState {
            x_field,
            y_field: dataset.response_field().to_string(),
            chart_kind: options.default,
            grouping: GroupingMode::Month,
            month_index: dataset.month_keys().len().saturating_sub(1),
            season_index: 0,
        };
        let chart = crate::app::pipeline::build_chart(dataset, &state)?;

        Ok(Self {
            dataset,
            sliders: SliderVisibility::for_mode(state.grouping),
            state,
            options,
            chart,
        })
    }

    /// Defaults, then any overrides applied as ordinary events.
    ///
    /// Overrides go in control order (x before kind), so an explicit kind is
    /// checked against the options of the requested x field.
    pub fn with_controls(dataset: &'a Dataset, initial: &InitialControls) -> Result<Self, ControlError> {
        let mut controller = Self::new(dataset)?;

        let mut events = Vec::new();
        if let Some(x) = &initial.x_field {
            events.push(ControlEvent::SetXField(x.clone()));
        }
        if let Some(y) = &initial.y_field {
            events.push(ControlEvent::SetYField(y.clone()));
        }
        if let Some(kind) = initial.chart_kind {
            events.push(ControlEvent::SetChartKind(kind));
        }
        if let Some(mode) = initial.grouping {
            events.push(ControlEvent::SetGrouping(mode));
        }
        if let Some(i) = initial.month_index {
            events.push(ControlEvent::SetMonthIndex(i));
        }
        if let Some(i) = initial.season_index {
            events.push(ControlEvent::SetSeasonIndex(i));
        }

        for event in events {
            controller.apply(event)?;
        }
        Ok(controller)
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn options(&self) -> ChartOptions {
        self.options
    }

    pub fn sliders(&self) -> SliderVisibility {
        self.sliders
    }

    pub fn chart(&self) -> &ChartSpec {
        &self.chart
    }

    /// Fields offered by the y selector (only the response variable).
    pub fn y_options(&self) -> [&'static str; 1] {
        [self.dataset.response_field()]
    }

    /// Apply one control change and return the freshly rendered chart.
    pub fn apply(&mut self, event: ControlEvent) -> Result<&ChartSpec, ControlError> {
        debug!(?event, "control event");
        let mut next = self.state.clone();
        let mut options = self.options;

        match &event {
            ControlEvent::SetXField(field) => {
                if !self.dataset.available_fields().iter().any(|f| f == field) {
                    return Err(self.reject(ControlError::UnknownXField(field.clone())));
                }
                next.x_field = field.clone();
                options = options_for(self.dataset, field);
                // The new default always wins, even if the old kind is still listed.
                next.chart_kind = options.default;
            }
            ControlEvent::SetYField(field) => {
                if !self.y_options().contains(&field.as_str()) {
                    return Err(self.reject(ControlError::UnknownYField(field.clone())));
                }
                next.y_field = field.clone();
            }
            ControlEvent::SetChartKind(kind) => {
                if !options.contains(*kind) {
                    return Err(self.reject(ControlError::UnsupportedKind {
                        kind: kind.to_string(),
                        field: next.x_field.clone(),
                    }));
                }
                next.chart_kind = *kind;
            }
            ControlEvent::SetGrouping(mode) => {
                next.grouping = *mode;
            }
            ControlEvent::SetMonthIndex(index) => {
                let len = self.dataset.month_keys().len();
                if *index >= len {
                    return Err(self.reject(SelectionError::MonthOutOfRange { index: *index, len }.into()));
                }
                next.month_index = *index;
            }
            ControlEvent::SetSeasonIndex(index) => {
                let len = self.dataset.season_labels().len();
                if *index >= len {
                    return Err(self.reject(SelectionError::SeasonOutOfRange { index: *index, len }.into()));
                }
                next.season_index = *index;
            }
        }

        let chart = crate::app::pipeline::build_chart(self.dataset, &next)?;

        self.sliders = SliderVisibility::for_mode(next.grouping);
        self.options = options;
        self.state = next;
        self.chart = chart;
        Ok(&self.chart)
    }

    /// Move the active slider by `delta`, clamped to its bounds.
    pub fn step_active_slider(&mut self, delta: i64) -> Result<&ChartSpec, ControlError> {
        let event = match self.state.grouping {
            GroupingMode::Month => {
                ControlEvent::SetMonthIndex(step(self.state.month_index, delta, self.dataset.month_keys().len()))
            }
            GroupingMode::Season => {
                ControlEvent::SetSeasonIndex(step(self.state.season_index, delta, self.dataset.season_labels().len()))
            }
        };
        self.apply(event)
    }

    fn reject(&self, err: ControlError) -> ControlError {
        warn!(error = %err, "rejected control event");
        err
    }
}

fn step(current: usize, delta: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let max = (len - 1) as i64;
    (current as i64 + delta).clamp(0, max) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Selection;
    use crate::io::read_dataset;

    const DATA: &str = "\
Date,Rented Bike Count,Hour,Seasons,Holiday,Functioning Day
01/12/2017,254,0,Winter,0,0
01/01/2018,90,2,Winter,1,0
01/03/2018,300,3,Spring,0,0
";

    #[test]
    fn starts_with_dashboard_defaults() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        let c = Controller::new(&ds).unwrap();
        assert_eq!(c.state().x_field, "Hour");
        assert_eq!(c.state().y_field, "Rented Bike Count");
        assert_eq!(c.state().chart_kind, ChartKind::Scatter);
        assert_eq!(c.state().selection(), Selection::Month(2));
        assert_eq!(c.sliders(), SliderVisibility { month: true, season: false });
    }

    #[test]
    fn x_change_resets_kind_to_new_default() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        let mut c = Controller::new(&ds).unwrap();
        c.apply(ControlEvent::SetChartKind(ChartKind::Heatmap)).unwrap();
        c.apply(ControlEvent::SetXField("Holiday".into())).unwrap();
        assert_eq!(c.state().chart_kind, ChartKind::Bar);
        c.apply(ControlEvent::SetChartKind(ChartKind::Pie)).unwrap();
        c.apply(ControlEvent::SetXField("Hour".into())).unwrap();
        assert_eq!(c.state().chart_kind, ChartKind::Scatter);
    }

    #[test]
    fn numeric_to_numeric_x_change_still_resets_kind() {
        let data = "\
Date,Rented Bike Count,Hour,Temperature(C),Seasons,Holiday,Functioning Day
01/12/2017,254,0,-5.2,Winter,0,0
01/12/2017,204,1,-5.5,Winter,0,0
";
        let ds = read_dataset(data.as_bytes()).unwrap();
        let mut c = Controller::new(&ds).unwrap();
        c.apply(ControlEvent::SetChartKind(ChartKind::Heatmap)).unwrap();
        // Heatmap is offered for both fields; the x change still resets it.
        c.apply(ControlEvent::SetXField("Temperature(C)".into())).unwrap();
        assert_eq!(c.state().chart_kind, ChartKind::Scatter);
        assert_eq!(c.chart().kind, ChartKind::Scatter);
    }

    #[test]
    fn grouping_toggle_keeps_slider_indices() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        let mut c = Controller::new(&ds).unwrap();
        c.apply(ControlEvent::SetMonthIndex(0)).unwrap();
        c.apply(ControlEvent::SetGrouping(GroupingMode::Season)).unwrap();
        assert_eq!(c.sliders(), SliderVisibility { month: false, season: true });
        c.apply(ControlEvent::SetSeasonIndex(1)).unwrap();
        c.apply(ControlEvent::SetGrouping(GroupingMode::Month)).unwrap();
        assert_eq!(c.state().month_index, 0);
        assert_eq!(c.state().season_index, 1);
    }

    #[test]
    fn invalid_events_leave_state_untouched() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        let mut c = Controller::new(&ds).unwrap();
        let before = c.state().clone();
        assert!(c.apply(ControlEvent::SetChartKind(ChartKind::Pie)).is_err());
        assert!(c.apply(ControlEvent::SetXField("Seasons".into())).is_err());
        assert!(c.apply(ControlEvent::SetYField("Hour".into())).is_err());
        assert!(c.apply(ControlEvent::SetMonthIndex(3)).is_err());
        assert!(c.apply(ControlEvent::SetSeasonIndex(2)).is_err());
        assert_eq!(c.state(), &before);
    }

    #[test]
    fn slider_steps_clamp_to_bounds() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        let mut c = Controller::new(&ds).unwrap();
        c.step_active_slider(5).unwrap();
        assert_eq!(c.state().month_index, 2);
        c.step_active_slider(-10).unwrap();
        assert_eq!(c.state().month_index, 0);
    }

    #[test]
    fn overrides_apply_in_control_order() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        let initial = InitialControls {
            x_field: Some("Holiday".into()),
            chart_kind: Some(ChartKind::Pie),
            grouping: Some(GroupingMode::Season),
            ..Default::default()
        };
        let c = Controller::with_controls(&ds, &initial).unwrap();
        assert_eq!(c.state().chart_kind, ChartKind::Pie);
        assert_eq!(c.chart().kind, ChartKind::Pie);
        assert_eq!(c.state().selection(), Selection::Season(0));
    }
}
