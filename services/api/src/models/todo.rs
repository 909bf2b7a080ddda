//! ToDo model and related payloads

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Lifecycle label of a ToDo. Any status may be replaced by any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Pending,
        Status::InProgress,
        Status::Completed,
        Status::Cancelled,
    ];

    /// Literal name used on the wire and in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "PENDING",
            Status::InProgress => "IN_PROGRESS",
            Status::Completed => "COMPLETED",
            Status::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// ToDo entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToDo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: Status,
    pub due_date: NaiveDate,
    pub user_id: i64,
    pub category_id: Option<i64>,
}

/// Validated ToDo fields, ready to be persisted under a fresh id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToDoDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: Status,
    pub due_date: NaiveDate,
    pub user_id: i64,
    pub category_id: Option<i64>,
}

impl ToDoDraft {
    pub fn with_id(self, id: i64) -> ToDo {
        ToDo {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            due_date: self.due_date,
            user_id: self.user_id,
            category_id: self.category_id,
        }
    }
}

/// Raw ToDo fields as received from a client.
///
/// Creation reads these from the query string, where `dueDate` is
/// `dd/MM/yyyy`. Replacement reads them from a JSON body and also accepts
/// the ISO form returned by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToDoInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: Status,
    pub due_date: String,
    pub user_id: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToDoResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: Status,
    /// Serialized as `yyyy-MM-dd`
    pub due_date: NaiveDate,
    pub user_id: i64,
    pub category_id: Option<i64>,
}

impl From<ToDo> for ToDoResponse {
    fn from(todo: ToDo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            status: todo.status,
            due_date: todo.due_date,
            user_id: todo.user_id,
            category_id: todo.category_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_literal_names() {
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(
            serde_json::from_str::<Status>("\"CANCELLED\"").unwrap(),
            Status::Cancelled
        );
        assert!(serde_json::from_str::<Status>("\"in_progress\"").is_err());
    }

    #[test]
    fn status_parses_from_database_text() {
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>(), Ok(status));
        }
        assert_eq!(
            "DONE".parse::<Status>(),
            Err(UnknownStatus("DONE".to_string()))
        );
    }

    #[test]
    fn response_renders_iso_due_date_and_camel_case_keys() {
        let todo = ToDo {
            id: 3,
            title: "Buy gifts".to_string(),
            description: None,
            status: Status::Pending,
            due_date: NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
            user_id: 1,
            category_id: Some(2),
        };

        let json = serde_json::to_value(ToDoResponse::from(todo)).unwrap();
        assert_eq!(json["dueDate"], "2024-12-25");
        assert_eq!(json["userId"], 1);
        assert_eq!(json["categoryId"], 2);
        assert_eq!(json["status"], "PENDING");
    }

    #[test]
    fn input_accepts_missing_optional_fields() {
        let input: ToDoInput = serde_json::from_str(
            r#"{"title":"Read","status":"PENDING","dueDate":"01/02/2025","userId":4}"#,
        )
        .unwrap();

        assert_eq!(input.description, None);
        assert_eq!(input.category_id, None);
        assert_eq!(input.due_date, "01/02/2025");
    }
}
