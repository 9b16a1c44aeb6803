//! Plain-text rendering of the weather screen

use crate::screen::ScreenState;
use std::fmt::{self, Write};

/// Render the whole screen as terminal text
#[must_use]
pub fn render_screen(state: &ScreenState) -> String {
    let mut out = String::new();
    // Writing into a String never fails
    write_screen(&mut out, state).ok();
    out
}

fn write_screen(out: &mut String, state: &ScreenState) -> fmt::Result {
    let unit = state.unit;

    writeln!(out, "{}", state.city)?;
    writeln!(out, "{}", "=".repeat(state.city.chars().count().max(1)))?;

    match &state.current {
        Some(current) => {
            writeln!(out, "{}  {}", current.icon().glyph, current.format_temperature(unit))?;
            writeln!(out, "{}", current.description)?;
            if let Some(feels_like) = current.format_feels_like(unit) {
                writeln!(out, "Feels like {feels_like}")?;
            }

            let mut details = Vec::new();
            if let Some(humidity) = current.format_humidity() {
                details.push(format!("Humidity {humidity}"));
            }
            details.push(format!("Wind {}", current.format_wind()));
            if let Some(sunrise) = current.format_sunrise() {
                details.push(format!("Sunrise {sunrise}"));
            }
            if let Some(sunset) = current.format_sunset() {
                details.push(format!("Sunset {sunset}"));
            }
            writeln!(out, "{}", details.join("  |  "))?;
        }
        None => writeln!(out, "No data yet")?,
    }

    writeln!(out)?;
    writeln!(out, "5-Day Forecast")?;

    if state.loading {
        writeln!(out, "Loading...")?;
    } else if state.forecast.is_empty() {
        writeln!(out, "No forecast available")?;
    } else {
        for day in &state.forecast {
            writeln!(
                out,
                "{:<4}{}  {}",
                day.day_name(),
                day.icon().glyph,
                day.format_range(unit)
            )?;
        }
    }

    if let Some(notice) = &state.notice {
        writeln!(out)?;
        writeln!(out, "[{}] {}", notice.title, notice.message)?;
    }

    Ok(())
}
