//! Formatting helpers shared across front ends.

use chrono::NaiveDate;

use crate::care::{CareStatus, Urgency};

/// Format the last watering relative to `today` (e.g., "3 days ago").
///
/// Plants that were never watered show "Never watered".
pub fn format_last_watered(last: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(last) = last else {
        return "Never watered".to_string();
    };

    match (today - last).num_days() {
        d if d < 0 => last.format("%b %d").to_string(),
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d if d < 7 => format!("{} days ago", d),
        _ => last.format("%b %d").to_string(),
    }
}

/// Format when a plant is due (e.g., "Due in 5 days", "2 days overdue").
pub fn format_due(status: &CareStatus) -> String {
    match status.urgency {
        Urgency::Overdue => status.label.clone(),
        Urgency::DueToday => "Due today".to_string(),
        Urgency::DueSoon | Urgency::Healthy => match status.days_until {
            1 => "Due tomorrow".to_string(),
            d => format!("Due in {} days", d),
        },
    }
}

/// Render a progress fraction as a fixed-width bar (e.g., `[######----]`).
pub fn format_progress_bar(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let filled = (fraction * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
