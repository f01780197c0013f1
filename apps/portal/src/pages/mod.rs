//! List pages. Both re-fetch from the server after every mutation instead of
//! patching their local copy.

pub mod job_board;
pub mod my_jobs;

pub use job_board::{JobBoard, JobFilters};
pub use my_jobs::MyJobs;
