//! # mosaic-domain
//!
//! Business services for the Mosaic backend, sitting between the HTTP
//! layer and the repositories in `mosaic-db`.
//!
//! Every operation takes the acting user's id and a `&Connection`, and
//! enforces three rules uniformly:
//!
//! - **Membership scoping**: boards, lists, and tasks exist for a user
//!   only through board membership; anything outside it is `NotFound`
//! - **Entry visibility**: journal entries are author-only unless shared
//!   through a task on a common board
//! - **Contiguous ordering**: list and task positions stay zero-based and
//!   gap-free across create, delete, and move
//!
//! Multi-step writes run inside a single transaction. Errors carry the
//! HTTP classification (validation, unauthorized, not-found) so the
//! server layer maps them without inspecting message text.

#![deny(unsafe_code)]

pub mod accounts;
pub mod boards;
pub mod errors;
pub mod journal;
pub mod lists;
pub mod ordering;
pub mod reports;
pub mod tasks;
pub mod visibility;

pub use accounts::AccountService;
pub use boards::{BoardDetail, BoardService, BoardSummary};
pub use errors::{DomainError, Result};
pub use journal::{EntryCreate, EntryDetail, EntryFilter, EntryUpdate, JournalService};
pub use lists::{ListDetail, ListService};
pub use ordering::{move_list, move_task};
pub use reports::ReportsService;
pub use tasks::{TaskCreate, TaskDetail, TaskService, TaskUpdate};
