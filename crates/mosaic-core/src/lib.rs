//! # mosaic-core
//!
//! Foundation types and shared vocabulary for the Mosaic backend.
//!
//! This crate provides the pieces every other Mosaic crate depends on:
//!
//! - **Branded IDs**: `UserId`, `BoardId`, `ListId`, `TaskId`, `EntryId` as
//!   prefixed UUID v7 newtypes for type safety
//! - **Timestamps**: UTC ISO-8601 helpers (`now_iso`, `parse_iso`, `is_past`)
//! - **Model vocabulary**: journal [`Visibility`], the priority/complexity
//!   scale, and the valence/arousal mood range

#![deny(unsafe_code)]

pub mod ids;
pub mod model;
pub mod time;

pub use ids::{BoardId, EntryId, ListId, TaskId, UserId};
pub use model::{MOOD_MAX, MOOD_MIN, SCALE_MAX, SCALE_MIN, Visibility, mood_in_range, scale_in_range};
pub use time::{is_past, now_iso, parse_iso, to_iso};
