//! Plain-text rendering of care snapshots, calendars and streaks.

use std::collections::HashMap;

use chrono::NaiveDate;
use plantcare_core::care::{CareSnapshot, CareStatus, StreakResult, Urgency};
use plantcare_core::format::{format_due, format_last_watered, format_progress_bar};
use plantcare_core::PlantCareRecord;

const PROGRESS_WIDTH: usize = 10;

fn tier_heading(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Overdue => "OVERDUE",
        Urgency::DueToday => "DUE TODAY",
        Urgency::DueSoon => "DUE SOON",
        Urgency::Healthy => "HEALTHY",
    }
}

pub fn print_added(plant: &PlantCareRecord, status: &CareStatus) {
    println!("Added {} ({})", plant.display_name(), plant.id);
    println!(
        "   Every {} day{}, next watering {} ({})",
        plant.watering_interval_days,
        plural(plant.watering_interval_days),
        plant.next_due_at,
        format_due(status)
    );
}

pub fn print_watered(plant: &PlantCareRecord, occurred_at: NaiveDate, status: &CareStatus) {
    println!("Watered {} on {}", plant.display_name(), occurred_at);
    println!(
        "   Next watering {} ({})",
        plant.next_due_at,
        format_due(status)
    );
}

pub fn print_rescheduled(plant: &PlantCareRecord, status: &CareStatus) {
    println!(
        "{} now every {} day{}",
        plant.display_name(),
        plant.watering_interval_days,
        plural(plant.watering_interval_days)
    );
    println!(
        "   Next watering {} ({})",
        plant.next_due_at,
        format_due(status)
    );
}

pub fn print_status(snapshot: &CareSnapshot) {
    let summary = &snapshot.summary;
    println!("Plant care for {}", snapshot.today);
    println!(
        "   {} overdue, {} due today, {} due soon, {} healthy",
        summary.overdue, summary.due_today, summary.due_soon, summary.healthy
    );
    println!();

    if snapshot.entries.is_empty() {
        println!("  No plants yet. Add one with 'plantcare add <name> --interval <days>'.");
        return;
    }

    for urgency in Urgency::ALL {
        if summary.count(urgency) == 0 {
            continue;
        }
        println!("{}", tier_heading(urgency));
        for entry in snapshot.in_tier(urgency) {
            println!(
                "   {:<20} {:<16} {}  last watered: {}",
                entry.display_name,
                format_due(&entry.status),
                format_progress_bar(entry.status.progress_fraction, PROGRESS_WIDTH),
                format_last_watered(entry.plant.last_watered_at, snapshot.today)
            );
        }
        println!();
    }
}

pub fn print_calendar(snapshot: &CareSnapshot) {
    let names: HashMap<&str, &str> = snapshot
        .entries
        .iter()
        .map(|e| (e.plant.id.as_str(), e.display_name.as_str()))
        .collect();
    let name_list = |ids: &std::collections::BTreeSet<String>| -> String {
        let mut list: Vec<&str> = ids
            .iter()
            .map(|id| names.get(id.as_str()).copied().unwrap_or(id.as_str()))
            .collect();
        list.sort_unstable();
        list.join(", ")
    };

    println!("{}", snapshot.month.display_name());

    let mut any = false;
    for bucket in snapshot.calendar.iter().filter(|b| !b.is_empty()) {
        any = true;
        let marker = if bucket.date == snapshot.today { "*" } else { " " };
        let mut parts = Vec::new();
        if !bucket.plants_due.is_empty() {
            parts.push(format!("due: {}", name_list(&bucket.plants_due)));
        }
        if !bucket.plants_watered.is_empty() {
            parts.push(format!("watered: {}", name_list(&bucket.plants_watered)));
        }
        println!(
            " {}{}  {}",
            marker,
            bucket.date.format("%b %d"),
            parts.join("  |  ")
        );
    }

    if !any {
        println!("   Nothing due or watered this month.");
    }
}

pub fn print_streak(plant: &PlantCareRecord, streak: &StreakResult, today: NaiveDate) {
    println!(
        "{} (every {} day{})",
        plant.display_name(),
        plant.watering_interval_days,
        plural(plant.watering_interval_days)
    );
    println!(
        "   Current streak: {} interval{}",
        streak.current_streak_days,
        plural(streak.current_streak_days)
    );
    println!(
        "   Best streak:    {} interval{}",
        streak.best_streak_days,
        plural(streak.best_streak_days)
    );
    println!(
        "   Last watered:   {}",
        format_last_watered(streak.last_watered_at, today)
    );
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
