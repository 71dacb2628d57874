use super::Classes;
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

fn default_gap() -> f64 {
    2.0
}

fn default_radius() -> f64 {
    2.0
}

/// Cell styling shared by both heatmap kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapStyle {
    /// Gap between adjacent cells.
    #[serde(default = "default_gap")]
    pub offset: f64,
    /// Corner radius of each cell.
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default)]
    pub zero_classes: Classes,
    #[serde(default)]
    pub nan_classes: Classes,
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        Self {
            offset: default_gap(),
            radius: default_radius(),
            zero_classes: Classes::default(),
            nan_classes: Classes::default(),
        }
    }
}

/// `nature: "heatmap"`: a grid of rounded cells shaded by value.
///
/// The element width/height act as maxima: cells stay square and the grid is centred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapSpec {
    pub data: Vec<Vec<Option<f64>>>,
    #[serde(flatten)]
    pub style: HeatmapStyle,
}

impl HeatmapSpec {
    pub fn new(data: Vec<Vec<Option<f64>>>) -> Self {
        Self {
            data,
            style: HeatmapStyle::default(),
        }
    }

    pub fn rows(&self) -> usize {
        self.data.len()
    }

    pub fn cols(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_matrix(&self.data)?;
        validate_style(&self.style)
    }
}

pub(crate) fn validate_matrix(data: &[Vec<Option<f64>>]) -> Result<()> {
    let Some(first) = data.first() else {
        return Err(Error::invalid_config("heatmap data must have at least one row"));
    };
    if first.is_empty() {
        return Err(Error::invalid_config(
            "heatmap data must have at least one column",
        ));
    }
    if let Some((i, row)) = data.iter().enumerate().find(|(_, r)| r.len() != first.len()) {
        return Err(Error::invalid_config(format!(
            "heatmap row {i} has {} cells, expected {}",
            row.len(),
            first.len()
        )));
    }
    Ok(())
}

fn validate_style(style: &HeatmapStyle) -> Result<()> {
    if !(style.offset.is_finite() && style.offset >= 0.0) {
        return Err(Error::invalid_config(format!(
            "heatmap offset must be a non-negative number, got {}",
            style.offset
        )));
    }
    Ok(())
}

/// `nature: "calendar_heatmap"`: one month laid out as Monday-first weeks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarHeatmapSpec {
    pub year: i32,
    /// 1-12.
    pub month: u32,
    /// One value per day of the month; missing days count as 0.
    #[serde(default)]
    pub values: Vec<f64>,
    #[serde(flatten)]
    pub style: HeatmapStyle,
}

impl CalendarHeatmapSpec {
    /// The week-by-weekday matrix this calendar renders.
    pub fn matrix(&self) -> Result<Vec<Vec<Option<f64>>>> {
        build_calendar_matrix(self.year, self.month, &self.values)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.matrix()?;
        validate_style(&self.style)
    }
}

/// Builds a `weeks x 7` matrix (Monday first) for `year`/`month`.
///
/// Cells outside the month are `None`; days beyond `values` get `0`.
pub fn build_calendar_matrix(
    year: i32,
    month: u32,
    values: &[f64],
) -> Result<Vec<Vec<Option<f64>>>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::invalid_config(format!("invalid calendar month {year}-{month}")))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| Error::invalid_config(format!("calendar month {year}-{month} out of range")))?;

    let days_in_month = (next - first).num_days() as usize;
    let lead = first.weekday().num_days_from_monday() as usize;
    let weeks = (lead + days_in_month).div_ceil(7);

    let mut matrix = vec![vec![None; 7]; weeks];
    for day in 0..days_in_month {
        let cell = lead + day;
        matrix[cell / 7][cell % 7] = Some(values.get(day).copied().unwrap_or(0.0));
    }
    Ok(matrix)
}
