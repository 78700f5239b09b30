use super::{Bounds, GraphSaver, ProfilePlot};
use miette::IntoDiagnostic;
use plotters::{
    chart::{ChartBuilder, ChartContext},
    coord::{Shift, types::RangedCoordf64},
    prelude::{Cartesian2d, DrawingArea, IntoDrawingArea, PathElement, SVGBackend},
    series::LineSeries,
    style::{BLUE, IntoFont, RED, WHITE},
};
use pulse_snr_common::Real;
use std::path::PathBuf;
use tracing::instrument;

type ProfileDrawingArea<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type ProfileChartContext<'a> =
    ChartContext<'a, SVGBackend<'a>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

trait ProfileBuilder<'a>: Sized {
    fn build_profile_graph(
        root: &ProfileDrawingArea<'a>,
        title: &str,
        bounds: Bounds,
    ) -> miette::Result<Self>;
    fn draw_line_to_chart(
        &mut self,
        values: &[Real],
        label: &str,
        colour: &'static plotters::style::RGBColor,
    ) -> miette::Result<()>;
}

#[derive(Default)]
pub(crate) struct SvgSaver {}

impl<'a> ProfileBuilder<'a> for ProfileChartContext<'a> {
    #[instrument(skip_all, level = "debug")]
    fn build_profile_graph(
        root: &ProfileDrawingArea<'a>,
        title: &str,
        bounds: Bounds,
    ) -> miette::Result<ProfileChartContext<'a>> {
        let mut chart = ChartBuilder::on(root)
            .x_label_area_size(35)
            .y_label_area_size(60)
            .margin(5)
            .caption(title, ("sans-serif", 30.0).into_font())
            .build_cartesian_2d(
                bounds.bin.min..bounds.bin.max,
                bounds.value.min..bounds.value.max,
            )
            .into_diagnostic()?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc("Bin")
            .y_desc("Intensity")
            .draw()
            .into_diagnostic()?;

        Ok(chart)
    }

    #[instrument(skip_all, level = "debug")]
    fn draw_line_to_chart(
        &mut self,
        values: &[Real],
        label: &str,
        colour: &'static plotters::style::RGBColor,
    ) -> miette::Result<()> {
        let data = values
            .iter()
            .copied()
            .enumerate()
            .map(|(x, y)| (x as Real, y));

        self.draw_series(LineSeries::new(data, colour))
            .into_diagnostic()?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x - 10, y), (x + 10, y)], colour));
        Ok(())
    }
}

impl GraphSaver for SvgSaver {
    fn save_as_svg(
        plot: &ProfilePlot,
        path: PathBuf,
        (width, height): (u32, u32),
        bounds: Bounds,
    ) -> miette::Result<()> {
        let root = SVGBackend::new(&path, (width, height)).into_drawing_area();

        root.fill(&WHITE).into_diagnostic()?;

        let mut chart = ProfileChartContext::build_profile_graph(&root, &plot.title, bounds)?;
        chart.draw_line_to_chart(plot.data, "data", &BLUE)?;
        chart.draw_line_to_chart(plot.model, "model", &RED)?;

        chart
            .configure_series_labels()
            .background_style(WHITE)
            .draw()
            .into_diagnostic()?;

        root.present().into_diagnostic()?;
        Ok(())
    }
}
