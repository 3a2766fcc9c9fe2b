// SensorConsole
// Supplied without warranty.
// Use at your own risk.

use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::ShapeStyle;
use plotters_iced::{Chart, DrawingBackend};

use sensor_console::history::ReadingHistory;
use sensor_console::Category;

use crate::app::Message;

pub struct ReadingChart<'a> {
    pub history: &'a ReadingHistory,
    pub category: Category,
}

impl ReadingChart<'_> {
    fn draw<DB: DrawingBackend>(
        &self,
        mut builder: plotters_iced::ChartBuilder<DB>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let points: Vec<(f32, f32)> = self.history.series(self.category).collect();

        let (base_t, span) = match (points.first(), points.last()) {
            (Some(first), Some(last)) if points.len() >= 2 => (first.0, (last.0 - first.0).max(1.0)),
            _ => (0.0f32, 60.0f32),
        };
        let (lo, hi) = self.category.display_range();

        let mut chart = builder
            .caption(
                format!(
                    "{} ({}), last {}",
                    self.category,
                    self.category.unit(),
                    self.history.len(self.category)
                ),
                ("sans-serif", 18),
            )
            .margin(10)
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(0f64..span as f64, lo as f64..hi as f64)?;

        chart
            .configure_mesh()
            .x_desc("Time (s)")
            .axis_desc_style(("sans-serif", 15))
            .draw()?;

        if !points.is_empty() {
            chart.draw_series(LineSeries::new(
                points.iter().map(|&(t, v)| ((t - base_t) as f64, v as f64)),
                &BLUE,
            ))?;
        }

        let thin_red = ShapeStyle::from(&RED).stroke_width(1);
        for limit in self.category.band_limits() {
            chart.draw_series(LineSeries::new(
                vec![(0f64, limit as f64), (span as f64, limit as f64)],
                thin_red,
            ))?;
        }

        Ok(())
    }
}

impl Chart<Message> for ReadingChart<'_> {
    type State = ();

    fn build_chart<DB: DrawingBackend>(
        &self,
        _state: &Self::State,
        builder: plotters_iced::ChartBuilder<DB>,
    ) {
        if let Err(e) = self.draw(builder) {
            log::warn!("chart draw failed: {e}");
        }
    }
}
