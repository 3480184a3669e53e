use crate::domain::model::{ItemRevenue, SimulationResult};
use crate::utils::error::{AnalysisError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const REVENUE_CHART_SIZE: (u32, u32) = (1200, 600);
const CONSUMPTION_CHART_SIZE: (u32, u32) = (1200, 600);
const ORANGE: RGBColor = RGBColor(255, 165, 0);
const BAR_ALPHA: f64 = 0.7;

// 第 1 個情境用紅色實線，第 2 個用綠色虛線，之後輪流使用
const SCENARIO_COLORS: [RGBColor; 6] = [RED, GREEN, BLUE, MAGENTA, CYAN, BLACK];

fn chart_error<E: std::fmt::Display>(e: E) -> AnalysisError {
    AnalysisError::ChartError {
        message: e.to_string(),
    }
}

/// 左右兩張長條圖：不打折與打折後的各 SKU 營收
pub fn render_revenue_chart(without: &[ItemRevenue], with: &[ItemRevenue]) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, REVENUE_CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let panels = root.split_evenly((1, 2));
        draw_revenue_panel(
            &panels[0],
            "Revenue by Top Selling Items (Without Discount)",
            without,
            BLUE,
            "Without Discount",
        )?;
        draw_revenue_panel(
            &panels[1],
            "Revenue by Top Selling Items (With Discount)",
            with,
            ORANGE,
            "With Discount",
        )?;

        root.present().map_err(chart_error)?;
    }
    Ok(svg)
}

fn draw_revenue_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    caption: &str,
    rows: &[ItemRevenue],
    color: RGBColor,
    label: &str,
) -> Result<()> {
    let max_revenue = rows.iter().map(|r| r.revenue).fold(0.0, f64::max);
    // 留空間給長條上方的數值
    let y_max = if max_revenue > 0.0 {
        max_revenue * 1.15
    } else {
        1.0
    };
    let slots = rows.len().max(1);

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(110)
        .y_label_area_size(70)
        .build_cartesian_2d((0..slots).into_segmented(), 0f64..y_max)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("SKU")
        .y_desc("Total Revenue")
        .x_labels(slots)
        .x_label_formatter(&|v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => rows.get(*i).map(|r| r.sku.clone()).unwrap_or_default(),
            _ => String::new(),
        })
        .x_label_style(
            ("sans-serif", 11)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .y_label_formatter(&|v: &f64| format!("{:.0}k", v / 1000.0))
        .draw()
        .map_err(chart_error)?;

    let fill = color.mix(BAR_ALPHA).filled();
    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(fill)
                .margin(8)
                .data(rows.iter().enumerate().map(|(i, r)| (i, r.revenue))),
        )
        .map_err(chart_error)?
        .label(label)
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], fill));

    let value_style = TextStyle::from(("sans-serif", 12).into_font())
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart
        .draw_series(rows.iter().enumerate().map(|(i, r)| {
            Text::new(
                format!("{:.0}k", r.revenue / 1000.0),
                (SegmentValue::CenterOf(i), r.revenue),
                value_style.clone(),
            )
        }))
        .map_err(chart_error)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_error)?;

    Ok(())
}

/// 每個 SKU 在各情境下的累計消耗曲線
pub fn render_consumption_chart(simulations: &[SimulationResult]) -> Result<String> {
    let horizon = simulations
        .iter()
        .map(|s| s.horizon_days)
        .max()
        .unwrap_or(0);
    let y_max = simulations
        .iter()
        .flat_map(|s| s.items.iter())
        .filter_map(|item| item.cumulative.last().copied())
        .max()
        .unwrap_or(0)
        .max(1);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CONSUMPTION_CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Inventory Consumption Over {} Days", horizon),
                ("sans-serif", 22),
            )
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(1u32..horizon.max(2), 0u32..y_max)
            .map_err(chart_error)?;

        chart
            .configure_mesh()
            .x_desc("Days")
            .y_desc("Cumulative Inventory Consumed")
            .draw()
            .map_err(chart_error)?;

        for (index, simulation) in simulations.iter().enumerate() {
            let style = SCENARIO_COLORS[index % SCENARIO_COLORS.len()].stroke_width(2);
            let dashed = index % 2 == 1;

            for item in &simulation.items {
                let points = item
                    .cumulative
                    .iter()
                    .enumerate()
                    .map(|(day, &consumed)| (day as u32 + 1, consumed));

                let series = if dashed {
                    chart.draw_series(DashedLineSeries::new(points, 6, 4, style))
                } else {
                    chart.draw_series(LineSeries::new(points, style))
                }
                .map_err(chart_error)?;

                series
                    .label(format!("{} - {}", simulation.scenario.name, item.sku))
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::simulation::simulate_consumption;
    use crate::domain::model::Scenario;

    fn revenue(sku: &str, revenue: f64) -> ItemRevenue {
        ItemRevenue {
            sku: sku.to_string(),
            revenue,
        }
    }

    #[test]
    fn test_revenue_chart_contains_labels() {
        let without = vec![revenue("JNE3781-KR-XXXL", 12600.0), revenue("SET389", 4000.0)];
        let with = vec![revenue("JNE3781-KR-XXXL", 11000.0), revenue("SET389", 3900.0)];

        let svg = render_revenue_chart(&without, &with).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("JNE3781-KR-XXXL"));
        assert!(svg.contains("13k"));
        assert!(svg.contains("Without Discount"));
        assert!(svg.contains("With Discount"));
    }

    #[test]
    fn test_revenue_bars_are_blue_and_orange_with_alpha() {
        let rows = vec![revenue("A", 5000.0), revenue("B", 2500.0)];

        let svg = render_revenue_chart(&rows, &rows).unwrap();
        assert!(svg.contains(r##"fill="#0000FF""##));
        assert!(svg.contains(r##"fill="#FFA500""##));
        assert!(svg.contains(r#"opacity="0.7""#));
    }

    #[test]
    fn test_revenue_chart_with_all_zero_revenue() {
        let rows = vec![revenue("A", 0.0)];
        assert!(render_revenue_chart(&rows, &rows).is_ok());
    }

    #[test]
    fn test_consumption_chart_labels_every_series() {
        let skus = vec!["A".to_string(), "B".to_string()];
        let simulations = vec![
            simulate_consumption(&skus, 30, 30, &Scenario::without_discount(1)),
            simulate_consumption(&skus, 30, 30, &Scenario::with_discount(2)),
        ];

        let svg = render_consumption_chart(&simulations).unwrap();
        assert!(svg.contains("Inventory Consumption Over 30 Days"));
        assert!(svg.contains("Without Discount - A"));
        assert!(svg.contains("With Discount - B"));
    }

    #[test]
    fn test_consumption_lines_solid_red_then_dashed_green() {
        let skus = vec!["A".to_string(), "B".to_string()];
        let simulations = vec![
            simulate_consumption(&skus, 30, 30, &Scenario::without_discount(1)),
            simulate_consumption(&skus, 30, 30, &Scenario::with_discount(2)),
        ];

        let svg = render_consumption_chart(&simulations).unwrap();
        let red = svg.matches(r##"stroke="#FF0000""##).count();
        let green = svg.matches(r##"stroke="#00FF00""##).count();

        // 實線每個 SKU 一條 polyline (加上圖例)，虛線會切成許多小段
        assert!(red > 0 && red <= 4, "red strokes: {}", red);
        assert!(green > 20, "green strokes: {}", green);
    }
}
