//! Feedback intake and reporting service for the marketing site.
//!
//! Submissions arrive from the site's own form or a form-builder webhook, land
//! in a [`store::SubmissionStore`], and are read back as dashboard analytics or
//! a CSV export.

pub mod app;
pub mod config;
pub mod error;
pub mod feedback;
pub mod maintenance;
pub mod reports;
pub mod state;
pub mod store;
