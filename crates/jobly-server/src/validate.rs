//! Request payload checks applied before anything reaches the store.

use crate::error::ApiError;
use jobly::{CompanyUpdate, JobUpdate, NewCompany, NewJob};
use rust_decimal::Decimal;

pub trait Validate {
    /// Every rule the payload breaks, in field order.
    fn problems(&self) -> Vec<String>;

    fn validate(&self) -> Result<(), ApiError> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ApiError::BadRequest(problems.join("; ")))
        }
    }
}

fn non_empty(field: &str, value: &str, out: &mut Vec<String>) {
    if value.trim().is_empty() {
        out.push(format!("{field} must not be empty"));
    }
}

fn non_negative(field: &str, value: Option<i32>, out: &mut Vec<String>) {
    if value.is_some_and(|v| v < 0) {
        out.push(format!("{field} must be >= 0"));
    }
}

fn fraction(field: &str, value: Option<Decimal>, out: &mut Vec<String>) {
    if value.is_some_and(|v| !(Decimal::ZERO..=Decimal::ONE).contains(&v)) {
        out.push(format!("{field} must be between 0 and 1"));
    }
}

fn absolute_url(field: &str, value: Option<&str>, out: &mut Vec<String>) {
    if let Some(v) = value {
        if url::Url::parse(v).is_err() {
            out.push(format!("{field} must be an absolute URL"));
        }
    }
}

impl Validate for NewCompany {
    fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        non_empty("handle", &self.handle, &mut out);
        if self.handle.chars().count() > 25 {
            out.push("handle must be at most 25 characters".to_string());
        }
        non_empty("name", &self.name, &mut out);
        non_negative("numEmployees", self.num_employees, &mut out);
        absolute_url("logoUrl", self.logo_url.as_deref(), &mut out);
        out
    }
}

impl Validate for CompanyUpdate {
    fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(name) = &self.name {
            non_empty("name", name, &mut out);
        }
        non_negative("numEmployees", self.num_employees, &mut out);
        absolute_url("logoUrl", self.logo_url.as_deref(), &mut out);
        out
    }
}

impl Validate for NewJob {
    fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        non_empty("title", &self.title, &mut out);
        non_negative("salary", self.salary, &mut out);
        fraction("equity", self.equity, &mut out);
        non_empty("company_handle", &self.company_handle, &mut out);
        out
    }
}

impl Validate for JobUpdate {
    fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(title) = &self.title {
            non_empty("title", title, &mut out);
        }
        non_negative("salary", self.salary, &mut out);
        fraction("equity", self.equity, &mut out);
        out
    }
}
