use crate::base::Quantity;
use crate::solver::TestOutput;
use crate::StrError;
use plotpy::{Curve, Plot};
use std::ffi::OsStr;

/// Plots one quantity versus another along the committed states of a test
///
/// # Input
///
/// * `output` -- the results of the test
/// * `x` -- the quantity on the horizontal axis
/// * `y` -- the quantity on the vertical axis
/// * `figure_path` -- may be a String, &str, or Path
pub fn plot_results<S>(output: &TestOutput, x: Quantity, y: Quantity, figure_path: &S) -> Result<(), StrError>
where
    S: AsRef<OsStr> + ?Sized,
{
    let plot = results_plot(output, x, y)?;
    plot.save(figure_path)
}

/// Draws the curve of a plot of the results
fn results_plot(output: &TestOutput, x: Quantity, y: Quantity) -> Result<Plot, StrError> {
    let (_, xx) = output.series(x)?;
    let (_, yy) = output.series(y)?;
    let x_label = output.name(x).ok_or("cannot find the name of the x quantity")?;
    let y_label = output.name(y).ok_or("cannot find the name of the y quantity")?;
    let mut curve = Curve::new();
    curve.set_marker_style("o");
    curve.draw(&xx, &yy);
    let mut plot = Plot::new();
    plot.add(&curve).grid_and_labels(x_label, y_label);
    Ok(plot)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
