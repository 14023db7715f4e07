// Shared helpers: calendar-month arithmetic and small numeric routines
pub mod maths_utils;
pub mod time_utils;

pub use time_utils::TimeUtils;
