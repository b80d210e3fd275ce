//! One service per resource family. Each method is exactly one transport
//! call, and errors come back exactly as the transport classified them.

mod assignment;
mod auth;
mod final_defense;
mod progress_report;
mod topic;

pub use assignment::AssignmentService;
pub use auth::AuthService;
pub use final_defense::FinalDefenseService;
pub use progress_report::ProgressReportService;
pub use topic::TopicService;

use thesis_core::{Pagination, RequestOptions};

fn paged(pagination: Pagination) -> RequestOptions {
    RequestOptions {
        query: pagination.to_query(),
        ..RequestOptions::default()
    }
}
