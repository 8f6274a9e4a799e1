//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `healthflow_core` linkage.
//! - Optionally print today's dashboard for a database file.
//!
//! Usage: `healthflow_cli [DB_PATH]`

use chrono::Local;
use healthflow_core::db::open_db;
use healthflow_core::{SqliteKeyValueStore, SummaryService};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("healthflow_core ping={}", healthflow_core::ping());
    println!("healthflow_core version={}", healthflow_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };
    match print_dashboard(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("dashboard failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_dashboard(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let summary = SummaryService::new(SqliteKeyValueStore::new(&conn));
    let today = Local::now().date_naive();

    let dashboard = summary.dashboard(today, &Local)?;
    println!(
        "habits completed={}/{} percent={}",
        dashboard.habits_completed, dashboard.habits_total, dashboard.habit_percentage
    );
    match &dashboard.today_mood {
        Some(mood) => println!(
            "mood latest={} {} entries_today={}",
            mood.latest.emoji, mood.latest.mood_name, mood.count
        ),
        None => println!("mood latest=none entries_today=0"),
    }
    println!(
        "steps today={} goal={} percent={}",
        dashboard.steps_today, dashboard.step_goal, dashboard.step_percentage
    );

    let stats = summary.profile_stats()?;
    println!(
        "lifetime habits={} moods={} steps={}",
        stats.habits_created, stats.mood_entries, stats.lifetime_steps
    );
    Ok(())
}
