//! Entity access for companies and jobs.

pub mod company;
pub mod job;

pub use company::{Company, CompanyDetail, CompanyFilter, CompanyUpdate, NewCompany};
pub use job::{Job, JobDetail, JobFilter, JobSummary, JobUpdate, NewJob};
