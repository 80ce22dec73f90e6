use plotters::prelude::*;

/// Line chart of accuracy (percent) per tested epoch, with the best epoch
/// marked. Saved as a PNG at `filename`.
pub fn plot_accuracy_over_epochs(
    accuracies: &[f64],
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(filename, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let last_epoch = accuracies.len().saturating_sub(1).max(1);
    let worst = accuracies.iter().cloned().fold(100.0, f64::min);
    let y_min = (worst - 5.0).clamp(0.0, 90.0).floor();

    let mut chart = ChartBuilder::on(&root)
        .caption("Accuracy per Epoch", ("sans-serif", 28).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(0..last_epoch, y_min..100.0)?;

    chart
        .configure_mesh()
        .x_desc("Epoch")
        .y_desc("Accuracy")
        .y_label_formatter(&|y| format!("{:.0}%", y))
        .draw()?;

    let points = accuracies.iter().cloned().enumerate();
    chart
        .draw_series(LineSeries::new(points, &BLUE))?
        .label("Accuracy on training data")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    if let Some((best_epoch, best)) = accuracies
        .iter()
        .cloned()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
    {
        chart
            .draw_series(std::iter::once(Circle::new((best_epoch, best), 4, RED.filled())))?
            .label(format!("Best: {:.2}% (epoch {})", best, best_epoch))
            .legend(|(x, y)| Circle::new((x + 10, y), 4, RED.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;

    Ok(())
}
