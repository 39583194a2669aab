//! Aggregate mood reporting.
//!
//! Every query here is visibility-scoped through the shared predicate and
//! aggregates in SQL, so report cost stays linear in the rows involved and
//! never fans out per task or per list.

use std::fmt::Write as _;

use rusqlite::{Connection, params};
use serde::Serialize;

use crate::errors::Result;
use crate::repositories::{ENTRY_VISIBLE_SQL, TASK_ACCESSIBLE_SQL};

/// One calendar day of mood averages.
#[derive(Debug, Clone, Serialize)]
pub struct DailyMoodRow {
    /// UTC calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Mean valence over the day's visible entries.
    pub avg_valence: f64,
    /// Mean arousal over the day's visible entries.
    pub avg_arousal: f64,
    /// Number of visible entries that day.
    pub entry_count: i64,
}

/// One `(priority, complexity)` cell of the workload heatmap.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapCellRow {
    /// Task priority, 1..=3.
    pub priority: i64,
    /// Task complexity, 1..=3.
    pub complexity: i64,
    /// Accessible tasks in the cell.
    pub task_count: i64,
    /// Mean valence of visible entries attached to the cell's tasks.
    pub avg_valence: Option<f64>,
    /// Mean arousal of visible entries attached to the cell's tasks.
    pub avg_arousal: Option<f64>,
}

/// Aggregate mood for a single task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskMoodRow {
    /// Visible entries referencing the task.
    pub entry_count: i64,
    /// Mean valence, absent when no entries.
    pub avg_valence: Option<f64>,
    /// Mean arousal, absent when no entries.
    pub avg_arousal: Option<f64>,
    /// Timestamp of the earliest visible entry.
    pub first_entry_at: Option<String>,
    /// Timestamp of the latest visible entry.
    pub last_entry_at: Option<String>,
}

/// One raw mood sample in a task's history.
#[derive(Debug, Clone, Serialize)]
pub struct MoodPointRow {
    /// Entry creation time.
    pub created_at: String,
    /// Entry valence.
    pub valence: f64,
    /// Entry arousal.
    pub arousal: f64,
}

/// Per-list rollup for a board overview.
#[derive(Debug, Clone, Serialize)]
pub struct ListSummaryRow {
    /// List ID.
    pub list_id: String,
    /// List name.
    pub list_name: String,
    /// Tasks on the list.
    pub task_count: i64,
    /// Visible entries attached to the list's tasks.
    pub entry_count: i64,
    /// Mean valence of those entries.
    pub avg_valence: Option<f64>,
    /// Mean arousal of those entries.
    pub avg_arousal: Option<f64>,
}

/// Reporting repository — stateless, every method takes `&Connection`.
pub struct ReportsRepo;

impl ReportsRepo {
    /// Daily mood averages over the viewer's visible entries, ascending by
    /// day. `from`/`to` are inclusive `YYYY-MM-DD` bounds.
    pub fn daily_mood(
        conn: &Connection,
        viewer_id: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<DailyMoodRow>> {
        let mut sql = format!(
            "SELECT date(je.created_at) AS day,
                    AVG(je.valence), AVG(je.arousal), COUNT(*)
             FROM journal_entries je
             WHERE {ENTRY_VISIBLE_SQL}"
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> =
            vec![Box::new(viewer_id.to_string())];

        // Aliases are not usable in WHERE, so the filters repeat date().
        if let Some(from) = from {
            let _ = write!(sql, " AND date(je.created_at) >= ?{}", param_values.len() + 1);
            param_values.push(Box::new(from.to_string()));
        }
        if let Some(to) = to {
            let _ = write!(sql, " AND date(je.created_at) <= ?{}", param_values.len() + 1);
            param_values.push(Box::new(to.to_string()));
        }
        sql.push_str(" GROUP BY day ORDER BY day ASC");

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(AsRef::as_ref).collect();
        let rows = stmt
            .query_map(params_refs.as_slice(), |row| {
                Ok(DailyMoodRow {
                    date: row.get(0)?,
                    avg_valence: row.get(1)?,
                    avg_arousal: row.get(2)?,
                    entry_count: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Heatmap over the viewer's accessible tasks: one row per occupied
    /// `(priority, complexity)` cell, with mood means over visible entries
    /// attached to the cell's tasks.
    pub fn heatmap(conn: &Connection, viewer_id: &str) -> Result<Vec<HeatmapCellRow>> {
        let sql = format!(
            "SELECT t.priority, t.complexity,
                    COUNT(DISTINCT t.id), AVG(je.valence), AVG(je.arousal)
             FROM tasks t
             LEFT JOIN journal_entries je ON je.task_id = t.id AND {ENTRY_VISIBLE_SQL}
             WHERE {TASK_ACCESSIBLE_SQL}
             GROUP BY t.priority, t.complexity
             ORDER BY t.priority ASC, t.complexity ASC"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![viewer_id], |row| {
                Ok(HeatmapCellRow {
                    priority: row.get(0)?,
                    complexity: row.get(1)?,
                    task_count: row.get(2)?,
                    avg_valence: row.get(3)?,
                    avg_arousal: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Aggregate mood for one task over the viewer's visible entries.
    /// Always one row; zero entries yields count 0 and `None` means.
    pub fn task_mood(conn: &Connection, viewer_id: &str, task_id: &str) -> Result<TaskMoodRow> {
        let sql = format!(
            "SELECT COUNT(*), AVG(je.valence), AVG(je.arousal),
                    MIN(je.created_at), MAX(je.created_at)
             FROM journal_entries je
             WHERE je.task_id = ?2 AND {ENTRY_VISIBLE_SQL}"
        );
        let row = conn.query_row(&sql, params![viewer_id, task_id], |row| {
            Ok(TaskMoodRow {
                entry_count: row.get(0)?,
                avg_valence: row.get(1)?,
                avg_arousal: row.get(2)?,
                first_entry_at: row.get(3)?,
                last_entry_at: row.get(4)?,
            })
        })?;
        Ok(row)
    }

    /// Raw mood samples for one task, ascending by time.
    pub fn task_history(
        conn: &Connection,
        viewer_id: &str,
        task_id: &str,
    ) -> Result<Vec<MoodPointRow>> {
        let sql = format!(
            "SELECT je.created_at, je.valence, je.arousal
             FROM journal_entries je
             WHERE je.task_id = ?2 AND {ENTRY_VISIBLE_SQL}
             ORDER BY je.created_at ASC, je.id ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![viewer_id, task_id], |row| {
                Ok(MoodPointRow {
                    created_at: row.get(0)?,
                    valence: row.get(1)?,
                    arousal: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Per-list rollup for one board, in list position order. Lists with
    /// no tasks still appear with zero counts.
    pub fn project_overview(
        conn: &Connection,
        viewer_id: &str,
        board_id: &str,
    ) -> Result<Vec<ListSummaryRow>> {
        let sql = format!(
            "SELECT l.id, l.name,
                    COUNT(DISTINCT t.id), COUNT(je.id), AVG(je.valence), AVG(je.arousal)
             FROM lists l
             LEFT JOIN tasks t ON t.list_id = l.id
             LEFT JOIN journal_entries je ON je.task_id = t.id AND {ENTRY_VISIBLE_SQL}
             WHERE l.board_id = ?2
             GROUP BY l.id, l.name
             ORDER BY l.position ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![viewer_id, board_id], |row| {
                Ok(ListSummaryRow {
                    list_id: row.get(0)?,
                    list_name: row.get(1)?,
                    task_count: row.get(2)?,
                    entry_count: row.get(3)?,
                    avg_valence: row.get(4)?,
                    avg_arousal: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
