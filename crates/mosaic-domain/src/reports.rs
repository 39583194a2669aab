//! Aggregation reports over visible journal entries and tasks.
//!
//! Every report is computed in SQL scoped to the requesting user, so the
//! numbers never include entries or tasks the user could not read one by
//! one. Date bounds arrive as `YYYY-MM-DD` strings and group by UTC
//! calendar day, matching the stored timestamp format.

use chrono::NaiveDate;
use mosaic_db::repositories::{
    DailyMoodRow, HeatmapCellRow, ListSummaryRow, MoodPointRow, ReportsRepo, TaskMoodRow,
};
use rusqlite::Connection;

use crate::errors::{DomainError, Result};
use crate::visibility::{require_board, require_task};

/// Read-only aggregate queries, all scoped to the acting user.
pub struct ReportsService;

impl ReportsService {
    /// Per-day mood averages over visible entries, ascending by day.
    pub fn mood_statistics(
        conn: &Connection,
        user_id: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<DailyMoodRow>> {
        check_date("from", from)?;
        check_date("to", to)?;
        Ok(ReportsRepo::daily_mood(conn, user_id, from, to)?)
    }

    /// One cell per non-empty `(priority, complexity)` pair over the
    /// user's accessible tasks.
    pub fn heatmap_data(conn: &Connection, user_id: &str) -> Result<Vec<HeatmapCellRow>> {
        Ok(ReportsRepo::heatmap(conn, user_id)?)
    }

    /// Mood aggregate for one task's visible entries.
    pub fn task_mood_statistics(
        conn: &Connection,
        user_id: &str,
        task_id: &str,
    ) -> Result<TaskMoodRow> {
        let _ = require_task(conn, user_id, task_id)?;
        Ok(ReportsRepo::task_mood(conn, user_id, task_id)?)
    }

    /// Raw ascending mood points for one task's visible entries.
    pub fn task_mood_history(
        conn: &Connection,
        user_id: &str,
        task_id: &str,
    ) -> Result<Vec<MoodPointRow>> {
        let _ = require_task(conn, user_id, task_id)?;
        Ok(ReportsRepo::task_history(conn, user_id, task_id)?)
    }

    /// Per-list task and mood rollup for a board the user belongs to.
    pub fn project_overview(
        conn: &Connection,
        user_id: &str,
        board_id: &str,
    ) -> Result<Vec<ListSummaryRow>> {
        let _ = require_board(conn, user_id, board_id)?;
        Ok(ReportsRepo::project_overview(conn, user_id, board_id)?)
    }
}

fn check_date(field: &'static str, value: Option<&str>) -> Result<()> {
    if let Some(raw) = value {
        if NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_err() {
            return Err(DomainError::validation(format!(
                "{field} must be a YYYY-MM-DD date"
            )));
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
