//! Stateless repositories over the Mosaic schema.
//!
//! Every method takes a `&Connection` so the caller decides transaction
//! boundaries — move renumbering in the domain layer wraps several
//! repository calls in one transaction.
//!
//! Two SQL fragments are shared across queries:
//!
//! - [`ENTRY_VISIBLE_SQL`] — journal entry visibility for a viewer, on a
//!   `journal_entries` alias `je`
//! - [`TASK_ACCESSIBLE_SQL`] — task reachability through board membership,
//!   on a `tasks` alias `t`
//!
//! Both bind the viewer's user id as `?1`; queries embedding them must
//! reserve that index.

pub mod boards;
pub mod journal;
pub mod lists;
pub mod reports;
pub mod tasks;
pub mod users;

pub use boards::BoardRepo;
pub use journal::{EntryCreateOptions, EntryRepo, EntryUpdateOptions};
pub use lists::ListRepo;
pub use reports::{
    DailyMoodRow, HeatmapCellRow, ListSummaryRow, MoodPointRow, ReportsRepo, TaskMoodRow,
};
pub use tasks::{TaskCreateOptions, TaskRepo, TaskUpdateOptions};
pub use users::UserRepo;

/// Predicate: the entry aliased `je` is readable by the viewer bound at `?1`.
///
/// The author always sees their own entries. Anyone else sees an entry only
/// when it is shared AND attached to a task whose board they belong to —
/// a shared entry without a task has no board to scope by and stays
/// author-only.
pub(crate) const ENTRY_VISIBLE_SQL: &str = "(je.author_id = ?1 OR (
    je.visibility = 'shared'
    AND je.task_id IS NOT NULL
    AND EXISTS (
      SELECT 1 FROM tasks vt
      JOIN lists vl ON vl.id = vt.list_id
      JOIN board_members vb ON vb.board_id = vl.board_id
      WHERE vt.id = je.task_id AND vb.user_id = ?1)))";

/// Predicate: the task aliased `t` sits on a board the viewer at `?1` belongs to.
pub(crate) const TASK_ACCESSIBLE_SQL: &str = "EXISTS (
    SELECT 1 FROM lists al
    JOIN board_members ab ON ab.board_id = al.board_id
    WHERE al.id = t.list_id AND ab.user_id = ?1)";
