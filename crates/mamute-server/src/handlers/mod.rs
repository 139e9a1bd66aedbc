//! One module per API resource.

pub mod announcements;
pub mod attendance;
pub mod checkin;
pub mod links;
pub mod register;
pub mod schedules;
pub mod settings;
pub mod students;
