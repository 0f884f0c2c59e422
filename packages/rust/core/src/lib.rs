//! Content aggregation for the site's informational pages.
//!
//! This crate reads raw records (document store or same-origin API), fills
//! defaults, classifies them, and returns page shapes that are always fully
//! populated: a failed read renders as an empty page, never an error.

pub mod about;
pub mod classify;
pub mod faculty;
pub mod messages;
pub mod normalize;

pub use about::{fetch_about_page, get_about_page};
pub use classify::{find_by_role, partition_teaching};
pub use faculty::{fetch_faculty_page, get_faculty_page};
pub use messages::{AboutView, LeadershipMessage, leadership_messages};
pub use normalize::normalize_about;
