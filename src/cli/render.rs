//! Renders summary rows and bucket averages as terminal tables.

use crate::models::{MeasurementSummary, Pollutant, SummaryRow};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};

fn level_color(level: u8) -> Color {
    match level {
        1 => Color::Cyan,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Red,
        5 => Color::DarkRed,
        6 => Color::Magenta,
        _ => Color::Grey,
    }
}

fn level_cell(level: Option<u8>) -> Cell {
    match level {
        Some(level) => Cell::new(level).fg(level_color(level)),
        None => Cell::new("-"),
    }
}

fn diff_cell(diff: Option<&str>) -> Cell {
    match diff {
        Some(diff) if diff.starts_with('+') => Cell::new(diff).fg(Color::Red),
        Some(diff) if diff.starts_with('-') => Cell::new(diff).fg(Color::Blue),
        Some(diff) => Cell::new(diff),
        None => Cell::new("-"),
    }
}

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// One line per location: overall levels, difference, then forecast/measured per pollutant.
pub fn summary_table(rows: &[SummaryRow]) -> Table {
    let mut header: Vec<String> = ["Location", "Forecast AQI", "Measured AQI", "Diff"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(Pollutant::ALL.iter().map(|p| format!("{} fc / meas", p.display_name())));
    let mut table = new_table(header);

    for row in rows {
        let mut cells = vec![
            Cell::new(&row.location_name),
            level_cell(Some(row.forecast.aqi_level)),
            level_cell(row.measurements.as_ref().map(|m| m.aqi_level)),
            diff_cell(row.aqi_difference.as_deref()),
        ];
        for pollutant in Pollutant::ALL {
            let forecast = row.forecast.per_pollutant.get(&pollutant);
            let measured = row
                .measurements
                .as_ref()
                .and_then(|m| m.per_pollutant.get(&pollutant));
            let text = match (forecast, measured) {
                (Some(f), Some(m)) => format!(
                    "{:.1} ({}) / {:.1} ({}) @ {}",
                    f.value,
                    f.aqi_level,
                    m.value,
                    m.aqi_level,
                    f.time.format("%d %H:%M")
                ),
                (Some(f), None) => format!(
                    "{:.1} ({}) @ {}",
                    f.value,
                    f.aqi_level,
                    f.time.format("%d %H:%M")
                ),
                _ => "-".to_string(),
            };
            cells.push(Cell::new(text));
        }
        table.add_row(cells);
    }
    table
}

/// One line per hourly bucket of a location.
pub fn bucket_table(series: &[MeasurementSummary]) -> Table {
    let mut header = vec!["Time (UTC)".to_string(), "Mean AQI".to_string()];
    header.extend(Pollutant::ALL.iter().map(|p| p.display_name().to_string()));
    let mut table = new_table(header);

    for summary in series {
        let mut cells = vec![
            Cell::new(summary.timestamp.format("%Y-%m-%d %H:%M")),
            level_cell(Some(summary.overall_aqi_level)),
        ];
        for pollutant in Pollutant::ALL {
            cells.push(match summary.pollutants.get(&pollutant) {
                Some(reading) => Cell::new(format!("{:.1} ({})", reading.value, reading.aqi_level)),
                None => Cell::new("-"),
            });
        }
        table.add_row(cells);
    }
    table
}
