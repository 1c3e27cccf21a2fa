//! This crate implements the bin collection tracker and the service status
//! checker behind cjber.dev.
//!
//! Collection dates are scraped from
//! <https://onlineservices.glasgow.gov.uk/forms/refuseandrecyclingcalendar/PrintCalendar.aspx>.

pub use ical;

pub mod bins_client;
pub mod ics;
pub mod schedule_view;
pub mod status_client;
