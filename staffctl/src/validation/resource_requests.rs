//! Business rules for resource requests.

use super::{MAX_TEXT_BYTES, Validator, unique};
use crate::db::models::resource_requests::{ResourceRequestCreateDBRequest, ResourceRequestDBResponse};
use chrono::NaiveDate;

/// Upper bound on weekly hours a single request can demand.
pub const MAX_HOURS_PER_WEEK: i32 = 168;

#[derive(Debug, Clone, Copy)]
pub struct ResourceRequestCandidate<'a> {
    pub customer: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hours_per_week: i32,
    pub skills: &'a [String],
}

impl<'a> From<&'a ResourceRequestCreateDBRequest> for ResourceRequestCandidate<'a> {
    fn from(r: &'a ResourceRequestCreateDBRequest) -> Self {
        Self {
            customer: &r.customer,
            start_date: r.start_date,
            end_date: r.end_date,
            hours_per_week: r.hours_per_week,
            skills: &r.skills,
        }
    }
}

impl<'a> From<&'a ResourceRequestDBResponse> for ResourceRequestCandidate<'a> {
    fn from(r: &'a ResourceRequestDBResponse) -> Self {
        Self {
            customer: &r.customer,
            start_date: r.start_date,
            end_date: r.end_date,
            hours_per_week: r.hours_per_week,
            skills: &r.skills,
        }
    }
}

pub fn validate_customer(v: &mut Validator, customer: &str) {
    v.check(!customer.is_empty(), "customer", "must be provided");
    v.check(customer.len() <= MAX_TEXT_BYTES, "customer", "must not be more than 256 bytes");
}

pub fn validate_skills(v: &mut Validator, skills: &[String]) {
    v.check(!skills.is_empty(), "skills", "at least one must be provided");
    v.check(unique(skills), "skills", "must not contain duplicate values");
}

pub fn validate_window(v: &mut Validator, start_date: NaiveDate, end_date: NaiveDate) {
    v.check(end_date >= start_date, "endDate", "must not be before startDate");
}

pub fn validate_hours_per_week(v: &mut Validator, hours: i32) {
    v.check(hours > 0, "hoursPerWeek", "must be greater than zero");
    v.check(hours <= MAX_HOURS_PER_WEEK, "hoursPerWeek", "must not be more than 168");
}

pub fn validate_resource_request<'a>(v: &mut Validator, request: impl Into<ResourceRequestCandidate<'a>>) {
    let rr = request.into();

    validate_customer(v, rr.customer);
    validate_skills(v, rr.skills);
    validate_window(v, rr.start_date, rr.end_date);
    validate_hours_per_week(v, rr.hours_per_week);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn valid_request() -> ResourceRequestCreateDBRequest {
        ResourceRequestCreateDBRequest {
            customer: "Department of Examples".to_string(),
            start_date: date(2024, 7, 1),
            end_date: date(2024, 12, 20),
            hours_per_week: 40,
            skills: vec!["vsphere".to_string(), "nsx".to_string()],
            opportunity_id: None,
            engagement_id: Some("ENG-1001".to_string()),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let mut v = Validator::new();
        validate_resource_request(&mut v, &valid_request());
        assert!(v.valid(), "unexpected errors: {:?}", v.errors());
    }

    #[test]
    fn test_customer_must_be_provided() {
        let mut request = valid_request();
        request.customer = String::new();

        let mut v = Validator::new();
        validate_resource_request(&mut v, &request);
        assert_eq!(v.errors()["customer"], "must be provided");
    }

    #[test]
    fn test_skills_empty_reports_first_failure_only() {
        let mut request = valid_request();
        request.skills.clear();

        let mut v = Validator::new();
        validate_resource_request(&mut v, &request);
        assert_eq!(v.errors()["skills"], "at least one must be provided");
    }

    #[test]
    fn test_duplicate_skills_fail() {
        let mut request = valid_request();
        request.skills = vec!["nsx".into(), "vsan".into(), "nsx".into()];

        let mut v = Validator::new();
        validate_resource_request(&mut v, &request);
        assert_eq!(v.errors()["skills"], "must not contain duplicate values");
    }

    #[test]
    fn test_window_and_hours() {
        let mut request = valid_request();
        request.end_date = date(2024, 6, 30);
        request.hours_per_week = 0;

        let mut v = Validator::new();
        validate_resource_request(&mut v, &request);
        assert_eq!(v.errors()["endDate"], "must not be before startDate");
        assert_eq!(v.errors()["hoursPerWeek"], "must be greater than zero");

        // Single-day engagements are allowed
        let mut request = valid_request();
        request.end_date = request.start_date;
        request.hours_per_week = MAX_HOURS_PER_WEEK;
        let mut v = Validator::new();
        validate_resource_request(&mut v, &request);
        assert!(v.valid());
    }
}
