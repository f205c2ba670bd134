//! Wire types for the dashboard API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, AppError};

/// Envelope wrapping every successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ResourceResponse<T> {
    pub fn into_data(self) -> Result<T, ApiError> {
        self.data.ok_or(ApiError::MissingData)
    }
}

/// Signed-in user as the server reports it. Timestamps are kept verbatim;
/// the API does not commit to a single format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub email_verified_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthLoginReturn {
    /// Token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub token: String,
    pub user_data: UserData,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub address: String,
    pub departement: String,
    pub position: String,
    pub status: String,
}

impl Employee {
    /// Calendar date of birth. Accepts `Y-m-d` alone or as the prefix of a
    /// timestamp such as `Y-m-d H:i:s` or RFC 3339.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        let date = self.date_of_birth.get(..10)?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeePage {
    #[serde(default)]
    pub current_page: u32,
    pub list: Vec<Employee>,
    pub total: u64,
    pub total_page: u32,
}

/// Body of the create and update employee calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub address: String,
    pub department_id: Option<i64>,
    pub job_position_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosition {
    pub id: i64,
    pub title: String,
}

/// What an edit form collects before it is turned into a payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeForm {
    pub name: String,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: String,
    pub department: Option<Department>,
    pub job_position: Option<JobPosition>,
}

impl EmployeeForm {
    /// Builds the wire payload. `id` is set for updates and left out for creates.
    pub fn into_payload(self, id: Option<i64>) -> Result<EmployeePayload, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::ValidationError("name is required".into()));
        }
        if !self.email.contains('@') {
            return Err(AppError::ValidationError(format!("invalid email: {}", self.email)));
        }
        let date_of_birth = self
            .date_of_birth
            .ok_or_else(|| AppError::ValidationError("date of birth is required".into()))?;

        Ok(EmployeePayload {
            id,
            name: self.name,
            email: self.email,
            gender: self.gender,
            date_of_birth,
            phone: self.phone,
            address: self.address,
            department_id: self.department.map(|d| d.id),
            job_position_id: self.job_position.map(|p| p.id),
        })
    }
}

/// List filters. `page` is zero-based here and one-based on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub page: u32,
    pub limit: u32,
    pub search: String,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            page: 0,
            limit: 10,
            search: String::new(),
        }
    }
}

impl Filters {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.saturating_add(1).to_string()),
            ("limit", self.limit.to_string()),
            ("search", self.search.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> EmployeeForm {
        EmployeeForm {
            name: "Ayu Lestari".into(),
            gender: "female".into(),
            email: "ayu@example.com".into(),
            phone: "08123456789".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1994, 3, 12),
            address: "Jl. Sudirman 1".into(),
            department: Some(Department { id: 2, title: "Finance".into() }),
            job_position: Some(JobPosition { id: 7, title: "Analyst".into() }),
        }
    }

    #[test]
    fn test_filters_page_is_one_based_on_the_wire() {
        let filters = Filters::default();
        assert_eq!(
            filters.query(),
            vec![
                ("page", "1".to_string()),
                ("limit", "10".to_string()),
                ("search", String::new()),
            ]
        );
    }

    #[test]
    fn test_filters_last_page_does_not_wrap() {
        let filters = Filters {
            page: u32::MAX,
            ..Default::default()
        };
        assert_eq!(filters.query()[0], ("page", u32::MAX.to_string()));
    }

    #[test]
    fn test_employee_birth_date_formats() {
        let employee = |dob: &str| -> Employee {
            serde_json::from_value(json!({
                "id": 1,
                "name": "Ayu",
                "gender": "female",
                "email": "ayu@example.com",
                "phone": "0812",
                "date_of_birth": dob,
                "address": "Jl. Sudirman 1",
                "departement": "Finance",
                "position": "Analyst",
                "status": "active"
            }))
            .unwrap()
        };
        let expected = NaiveDate::from_ymd_opt(1994, 3, 12);

        assert_eq!(employee("1994-03-12").birth_date(), expected);
        assert_eq!(employee("1994-03-12 00:00:00").birth_date(), expected);
        assert_eq!(employee("1994-03-12T00:00:00.000000Z").birth_date(), expected);
        assert_eq!(employee("12/03/1994").birth_date(), None);
        assert_eq!(employee("").birth_date(), None);
        // Kept exactly as received.
        assert_eq!(employee("1994-03-12 00:00:00").date_of_birth, "1994-03-12 00:00:00");
    }

    #[test]
    fn test_form_into_payload() {
        let payload = form().into_payload(None).unwrap();
        assert_eq!(payload.department_id, Some(2));
        assert_eq!(payload.job_position_id, Some(7));

        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body["date_of_birth"], json!("1994-03-12"));
        assert!(body.get("id").is_none());

        let body = serde_json::to_value(form().into_payload(Some(11)).unwrap()).unwrap();
        assert_eq!(body["id"], json!(11));
    }

    #[test]
    fn test_form_validation() {
        let mut missing_name = form();
        missing_name.name = "  ".into();
        assert!(matches!(
            missing_name.into_payload(None),
            Err(AppError::ValidationError(_))
        ));

        let mut missing_date = form();
        missing_date.date_of_birth = None;
        assert!(matches!(
            missing_date.into_payload(None),
            Err(AppError::ValidationError(_))
        ));

        let mut no_department = form();
        no_department.department = None;
        let body = serde_json::to_value(no_department.into_payload(None).unwrap()).unwrap();
        assert_eq!(body["department_id"], serde_json::Value::Null);
    }

    #[test]
    fn test_login_return_parses_server_body() {
        let body = json!({
            "success": true,
            "data": {
                "expires_in": 3600,
                "token": "T1",
                "user_data": {
                    "id": 1,
                    "name": "Admin",
                    "email": "a@b.com",
                    "email_verified_at": null,
                    "created_at": "2024-05-01T08:00:00.000000Z",
                    "updated_at": "2024-05-01T08:00:00.000000Z"
                }
            }
        });
        let response: ResourceResponse<AuthLoginReturn> = serde_json::from_value(body).unwrap();
        let data = response.into_data().unwrap();
        assert_eq!(data.token, "T1");
        assert_eq!(data.user_data.id, 1);
        assert!(data.user_data.email_verified_at.is_none());
        assert_eq!(data.user_data.created_at.as_deref(), Some("2024-05-01T08:00:00.000000Z"));
    }

    #[test]
    fn test_login_return_keeps_sql_timestamps() {
        let body = json!({
            "data": {
                "token": "T1",
                "user_data": {
                    "id": 1,
                    "name": "Admin",
                    "email": "a@b.com",
                    "email_verified_at": "2024-05-01 07:59:00",
                    "created_at": "2024-05-01 08:00:00",
                    "updated_at": "2024-05-01 08:00:00"
                }
            }
        });
        let response: ResourceResponse<AuthLoginReturn> = serde_json::from_value(body).unwrap();
        let user = response.into_data().unwrap().user_data;
        assert_eq!(user.created_at.as_deref(), Some("2024-05-01 08:00:00"));
        assert_eq!(user.email_verified_at.as_deref(), Some("2024-05-01 07:59:00"));
    }

    #[test]
    fn test_missing_data() {
        let response: ResourceResponse<Vec<Department>> =
            serde_json::from_value(json!({"success": true})).unwrap();
        assert!(matches!(response.into_data(), Err(ApiError::MissingData)));
    }
}
