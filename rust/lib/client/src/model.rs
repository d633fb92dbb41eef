//! Wire models returned by the grading service.
//!
//! The service emits localized field names; each field also accepts its
//! English name so fixtures and other servers can use either.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Current user, from `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawProfile")]
pub struct UserProfile {
    pub name: String,
    pub role: String,
    /// Study group; only students carry one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// The server sends either `name` or the three name parts.
#[derive(Deserialize)]
struct RawProfile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    middle_name: Option<String>,
    role: String,
    #[serde(default)]
    group: Option<String>,
}

impl From<RawProfile> for UserProfile {
    fn from(raw: RawProfile) -> Self {
        let name = match raw.name.filter(|n| !n.is_empty()) {
            Some(name) => name,
            None => [raw.last_name, raw.first_name, raw.middle_name]
                .into_iter()
                .flatten()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        };
        Self { name, role: raw.role, group: raw.group }
    }
}

/// One of the caller's own grades, from `GET /my_grades`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    #[serde(alias = "Дисциплина")]
    pub discipline: String,
    #[serde(alias = "Оценка", default)]
    pub grade: serde_json::Value,
    #[serde(alias = "Учитель", default)]
    pub teacher: String,
    #[serde(alias = "Дата оценки", default)]
    pub graded_date: Option<String>,
}

/// A row of `GET /teacher/grades/{group}`. Students without a grade come
/// back with null `grade` and `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupGradeRecord {
    #[serde(alias = "Студент")]
    pub student: String,
    #[serde(alias = "Оценка", default)]
    pub grade: serde_json::Value,
    #[serde(alias = "Дата", default)]
    pub date: Option<String>,
}

/// Echo of a grade written by `PATCH /teacher/mass-grades/{group}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeChange {
    #[serde(alias = "Студент")]
    pub student: String,
    #[serde(alias = "Оценка", default)]
    pub grade: serde_json::Value,
    #[serde(alias = "Дисциплина", default)]
    pub discipline: String,
    #[serde(alias = "Сессия", default)]
    pub session: Option<String>,
}

/// Body of `PATCH /teacher/mass-grades/{group}`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct MassGrades<'a> {
    pub group_name: &'a str,
    pub students: &'a [String],
    pub grades: &'a [i64],
}

/// `{ "message": "..." }` replies from the service.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ServerMessage {
    pub message: String,
}

/// List endpoints answer `{ "message": ... }` instead of `[]` when there is
/// nothing to return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListBody<T> {
    Items(Vec<T>),
    Message(ServerMessage),
}

impl<T> ListBody<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListBody::Items(items) => items,
            ListBody::Message(_) => Vec::new(),
        }
    }
}

/// Text for a grade value; null renders as a dash.
pub fn format_grade(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render a server timestamp as `YYYY-MM-DD`.
///
/// Unrecognized input is returned verbatim; a missing value is a dash.
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return "-".to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.format("%Y-%m-%d").to_string();
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_prefers_name() {
        let p: UserProfile = serde_json::from_value(json!({
            "name": "alice", "role": "Student"
        }))
        .unwrap();
        assert_eq!(p.name, "alice");
        assert_eq!(p.role, "Student");
        assert!(p.group.is_none());
    }

    #[test]
    fn profile_joins_name_parts() {
        let p: UserProfile = serde_json::from_value(json!({
            "last_name": "Ivanov",
            "first_name": "Ivan",
            "middle_name": "Ivanovich",
            "password": "********",
            "role": "Студент",
            "group": "IVT-21"
        }))
        .unwrap();
        assert_eq!(p.name, "Ivanov Ivan Ivanovich");
        assert_eq!(p.group.as_deref(), Some("IVT-21"));
    }

    #[test]
    fn grade_record_accepts_localized_keys() {
        let g: GradeRecord = serde_json::from_value(json!({
            "Дисциплина": "Math",
            "Оценка": 5,
            "Учитель": "Petrov P P",
            "Дата оценки": "2024-01-15 10:30:00"
        }))
        .unwrap();
        assert_eq!(g.discipline, "Math");
        assert_eq!(g.grade, json!(5));
        assert_eq!(g.teacher, "Petrov P P");
        assert_eq!(g.graded_date.as_deref(), Some("2024-01-15 10:30:00"));
    }

    #[test]
    fn grade_record_accepts_english_keys() {
        let g: GradeRecord = serde_json::from_value(json!({
            "discipline": "Physics",
            "grade": 4,
            "teacher": "Sidorov",
            "gradedDate": "2024-02-01T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(g.discipline, "Physics");
        assert_eq!(g.graded_date.as_deref(), Some("2024-02-01T08:00:00Z"));
    }

    #[test]
    fn group_record_allows_null_grade_and_date() {
        let g: GroupGradeRecord = serde_json::from_value(json!({
            "Студент": "Ivanov Ivan Ivanovich",
            "Оценка": null,
            "Дата": null
        }))
        .unwrap();
        assert_eq!(format_grade(&g.grade), "-");
        assert_eq!(format_date(g.date.as_deref()), "-");
    }

    #[test]
    fn list_body_message_is_empty() {
        let body: ListBody<GradeRecord> =
            serde_json::from_value(json!({ "message": "no grades" })).unwrap();
        assert!(body.into_items().is_empty());

        let body: ListBody<GroupGradeRecord> =
            serde_json::from_value(json!([{ "student": "a", "grade": 3, "date": null }])).unwrap();
        assert_eq!(body.into_items().len(), 1);
    }

    #[test]
    fn format_date_variants() {
        assert_eq!(format_date(Some("2024-01-15 10:30:00")), "2024-01-15");
        assert_eq!(format_date(Some("2024-01-15T10:30:00.123456")), "2024-01-15");
        assert_eq!(format_date(Some("2024-01-15T10:30:00+03:00")), "2024-01-15");
        assert_eq!(format_date(Some("2024-01-15")), "2024-01-15");
        assert_eq!(format_date(Some("yesterday")), "yesterday");
        assert_eq!(format_date(Some("  ")), "-");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn format_grade_variants() {
        assert_eq!(format_grade(&json!(5)), "5");
        assert_eq!(format_grade(&json!("pass")), "pass");
        assert_eq!(format_grade(&json!(null)), "-");
    }
}
