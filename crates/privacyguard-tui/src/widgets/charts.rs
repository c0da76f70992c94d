//! Report charts: network activity timeline, privacy usage distribution
//! and automation rule executions.
//!
//! Each renderer draws whatever instance currently occupies its registry
//! slot; a slot that is absent or disposed shows a placeholder.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Chart, Dataset, GraphType, Paragraph},
};

use privacyguard_core::{ChartData, ChartSlot};

use crate::theme::Palette;

const NO_DATA: &str = "  No report data yet";

/// `(index, count)` pairs for the line chart, plus the first and last labels.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn timeline_points(data: &ChartData) -> Option<(Vec<(f64, f64)>, String, String)> {
    let ChartData::Timeline(points) = data else {
        return None;
    };
    let first = points.first()?.time.clone();
    let last = points.last().map_or_else(|| first.clone(), |p| p.time.clone());
    let series = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.count as f64))
        .collect();
    Some((series, first, last))
}

fn placeholder(frame: &mut Frame, area: Rect, block: Block<'_>, palette: &Palette) {
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(NO_DATA).style(palette.muted()), inner);
}

/// Network activity: one line over the non-empty time buckets.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn render_timeline(
    frame: &mut Frame,
    area: Rect,
    slot: &ChartSlot,
    block: Block<'_>,
    palette: &Palette,
) {
    let Some((series, first, last)) = slot.live().and_then(|c| timeline_points(&c.data)) else {
        placeholder(frame, area, block, palette);
        return;
    };

    let x_max = (series.len().saturating_sub(1) as f64).max(1.0);
    let y_max = series.iter().map(|&(_, y)| y).fold(0.0_f64, f64::max) * 1.2;
    let y_max = y_max.max(1.0);

    // A lone bucket has no segment to draw
    let graph_type = if series.len() == 1 {
        GraphType::Scatter
    } else {
        GraphType::Line
    };

    let dataset = Dataset::default()
        .name("Events")
        .marker(Marker::Braille)
        .graph_type(graph_type)
        .style(Style::default().fg(palette.series[0]))
        .data(&series);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::styled(first, palette.muted()),
                    Span::styled(last, palette.muted()),
                ])
                .style(palette.muted()),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::styled("0", palette.muted()),
                    Span::styled(format!("{y_max:.0}"), palette.muted()),
                ])
                .style(palette.muted()),
        );

    frame.render_widget(chart, area);
}

/// Privacy usage: one bar per feature, in feature order.
pub fn render_distribution(
    frame: &mut Frame,
    area: Rect,
    slot: &ChartSlot,
    block: Block<'_>,
    palette: &Palette,
) {
    let Some(ChartData::Distribution(counts)) = slot.live().map(|c| &c.data) else {
        placeholder(frame, area, block, palette);
        return;
    };

    let bars: Vec<Bar<'_>> = counts
        .iter()
        .enumerate()
        .map(|(i, (feature, count))| {
            let color = palette.series[i % palette.series.len()];
            Bar::default()
                .label(Line::from(feature.to_string()))
                .value(*count)
                .style(Style::default().fg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(7)
        .bar_gap(2)
        .value_style(palette.text())
        .label_style(palette.muted());

    frame.render_widget(chart, area);
}

/// Automation rules: executions per rule, in report order.
pub fn render_rules(
    frame: &mut Frame,
    area: Rect,
    slot: &ChartSlot,
    block: Block<'_>,
    palette: &Palette,
) {
    let Some(ChartData::Bars(rules)) = slot.live().map(|c| &c.data) else {
        placeholder(frame, area, block, palette);
        return;
    };
    if rules.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new("  No automation rules executed").style(palette.muted()),
            inner,
        );
        return;
    }

    let bars: Vec<Bar<'_>> = rules
        .iter()
        .map(|(name, executions)| {
            Bar::default()
                .label(Line::from(name.clone()))
                .value(*executions)
                .style(Style::default().fg(palette.series[2]))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(6)
        .bar_gap(1)
        .value_style(palette.text())
        .label_style(palette.muted());

    frame.render_widget(chart, area);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use privacyguard_core::model::TimelinePoint;

    use super::*;

    #[test]
    fn single_bucket_timeline() {
        let data = ChartData::Timeline(vec![TimelinePoint {
            time: "09:00".into(),
            count: 5,
        }]);
        let (series, first, last) = timeline_points(&data).unwrap();
        assert_eq!(series, vec![(0.0, 5.0)]);
        assert_eq!(first, "09:00");
        assert_eq!(last, "09:00");
    }

    #[test]
    fn empty_or_foreign_data_has_no_points() {
        assert!(timeline_points(&ChartData::Timeline(Vec::new())).is_none());
        assert!(timeline_points(&ChartData::Bars(vec![("r1".into(), 2)])).is_none());
    }
}
