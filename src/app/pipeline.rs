//! Shared "state → view → chart" pipeline used by the controller, the CLI and
//! the TUI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! control state -> selection -> filtered view -> chart spec

use crate::chart::{ChartSpec, render};
use crate::data::Dataset;
use crate::domain::ControlState;
use crate::error::ControlError;
use crate::view::{View, resolve};

/// Everything computed for one control state.
#[derive(Debug, Clone)]
pub struct RenderOutput<'a> {
    pub view: View<'a>,
    pub chart: ChartSpec,
}

pub fn run_render<'a>(dataset: &'a Dataset, state: &ControlState) -> Result<RenderOutput<'a>, ControlError> {
    let view = resolve(dataset, state.selection())?;
    let chart = render(&view, &state.x_field, &state.y_field, state.chart_kind)?;
    Ok(RenderOutput { view, chart })
}

pub fn build_chart(dataset: &Dataset, state: &ControlState) -> Result<ChartSpec, ControlError> {
    run_render(dataset, state).map(|out| out.chart)
}
