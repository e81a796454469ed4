//! API types for the order management HTTP API.
//!
//! This module defines the problem-detail error payload returned by every
//! failing endpoint, following the RFC 7807 shape: `type`, `title`,
//! `status`, `detail`, and an optional `field` naming the offending request
//! field for validation failures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URI prefix for problem type identifiers.
const PROBLEM_TYPE_BASE: &str = "https://api.example.com/problems";

/// Structured problem description returned on API errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetail {
	/// URI identifying the problem type.
	#[serde(rename = "type")]
	pub problem_type: String,
	/// Short human-readable summary of the problem type.
	pub title: String,
	/// HTTP status code this problem maps to.
	pub status: u16,
	/// Human-readable explanation specific to this occurrence.
	pub detail: String,
	/// Request field the problem applies to, for validation failures.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<String>,
}

impl ProblemDetail {
	/// Problem for a request that failed shape validation (400).
	pub fn validation(detail: impl Into<String>, field: Option<&str>) -> Self {
		Self {
			problem_type: format!("{}/validation-error", PROBLEM_TYPE_BASE),
			title: "Validation Error".to_string(),
			status: 400,
			detail: detail.into(),
			field: field.map(str::to_string),
		}
	}

	/// Problem for a request that is well-formed but not allowed (400).
	pub fn bad_request(detail: impl Into<String>) -> Self {
		Self {
			problem_type: format!("{}/bad-request", PROBLEM_TYPE_BASE),
			title: "Bad Request".to_string(),
			status: 400,
			detail: detail.into(),
			field: None,
		}
	}

	/// Problem for a missing resource (404).
	pub fn not_found(detail: impl Into<String>) -> Self {
		Self {
			problem_type: format!("{}/not-found", PROBLEM_TYPE_BASE),
			title: "Resource Not Found".to_string(),
			status: 404,
			detail: detail.into(),
			field: None,
		}
	}

	/// Problem for an unexpected server fault (500).
	///
	/// The detail is fixed; internal error messages are logged, never
	/// returned to the caller.
	pub fn internal() -> Self {
		Self {
			problem_type: format!("{}/internal-error", PROBLEM_TYPE_BASE),
			title: "Internal Server Error".to_string(),
			status: 500,
			detail: "An unexpected error occurred".to_string(),
			field: None,
		}
	}

	/// Get the HTTP status code for this problem.
	pub fn status_code(&self) -> axum::http::StatusCode {
		axum::http::StatusCode::from_u16(self.status)
			.unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
	}
}

impl fmt::Display for ProblemDetail {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.title, self.detail)
	}
}

impl std::error::Error for ProblemDetail {}

impl axum::response::IntoResponse for ProblemDetail {
	fn into_response(self) -> axum::response::Response {
		let status = self.status_code();
		(status, axum::response::Json(self)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_codes_map_to_http() {
		assert_eq!(ProblemDetail::validation("x", None).status, 400);
		assert_eq!(ProblemDetail::bad_request("x").status, 400);
		assert_eq!(ProblemDetail::not_found("x").status, 404);
		assert_eq!(ProblemDetail::internal().status, 500);
	}

	#[test]
	fn internal_problem_has_fixed_detail() {
		let problem = ProblemDetail::internal();
		assert_eq!(problem.detail, "An unexpected error occurred");
		assert!(problem.field.is_none());
	}

	#[test]
	fn serializes_with_type_and_field() {
		let problem = ProblemDetail::validation("Reason required", Some("reason"));
		let json = serde_json::to_value(&problem).unwrap();
		assert_eq!(json["type"], "https://api.example.com/problems/validation-error");
		assert_eq!(json["field"], "reason");
	}

	#[test]
	fn field_is_omitted_when_absent() {
		let json = serde_json::to_value(ProblemDetail::not_found("gone")).unwrap();
		assert!(json.get("field").is_none());
	}
}
