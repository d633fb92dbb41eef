//! View model rendered by a [`Frontend`].
//!
//! The controller never touches widgets. It updates a [`ViewState`] and
//! hands the whole value to the front end, which decides how to draw it.

use std::fmt;
use std::str::FromStr;

use crate::model::{format_date, format_grade, GradeRecord, GroupGradeRecord, UserProfile};

/// Shown instead of an empty personal grade list.
pub const NO_GRADES_MESSAGE: &str = "You have no grades yet";

/// Shown instead of an empty group grade list.
pub const NO_GROUP_GRADES_MESSAGE: &str = "No grades in this group yet";

/// Roles that unlock the group-grades view. Compared case-insensitively.
pub const DEFAULT_PRIVILEGED_ROLES: &[&str] = &["Teacher", "Admin", "Преподаватель", "Админ"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    LoggedOut,
    LoggedIn,
}

/// Named UI sections. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Login,
    /// Landing page after login; shows the profile.
    Main,
    Grades,
    Teacher,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Login, Section::Main, Section::Grades, Section::Teacher];

    pub fn name(self) -> &'static str {
        match self {
            Section::Login => "login",
            Section::Main => "main",
            Section::Grades => "grades",
            Section::Teacher => "teacher",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "login" => Ok(Section::Login),
            "main" | "profile" => Ok(Section::Main),
            "grades" => Ok(Section::Grades),
            "teacher" => Ok(Section::Teacher),
            other => Err(format!("unknown section: {}", other)),
        }
    }
}

/// A list panel: not fetched yet, fetched and empty, or fetched entries.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Idle,
    Empty(&'static str),
    Entries(Vec<T>),
}

impl<T> Panel<T> {
    /// `Empty(message)` for an empty list, `Entries` otherwise.
    pub fn from_items(items: Vec<T>, empty_message: &'static str) -> Self {
        if items.is_empty() {
            Panel::Empty(empty_message)
        } else {
            Panel::Entries(items)
        }
    }
}

/// One rendered personal grade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeEntry {
    pub discipline: String,
    pub value: String,
    pub teacher: String,
    pub date: String,
}

impl From<&GradeRecord> for GradeEntry {
    fn from(r: &GradeRecord) -> Self {
        Self {
            discipline: r.discipline.clone(),
            value: format_grade(&r.grade),
            teacher: r.teacher.clone(),
            date: format_date(r.graded_date.as_deref()),
        }
    }
}

/// One rendered group grade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupGradeEntry {
    pub student: String,
    pub value: String,
    pub date: String,
}

impl From<&GroupGradeRecord> for GroupGradeEntry {
    fn from(r: &GroupGradeRecord) -> Self {
        Self {
            student: r.student.clone(),
            value: format_grade(&r.grade),
            date: format_date(r.date.as_deref()),
        }
    }
}

/// Group grades plus the group they were fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPanel {
    pub group: String,
    pub panel: Panel<GroupGradeEntry>,
}

impl GroupPanel {
    pub fn heading(&self) -> String {
        format!("Grades for group {}", self.group)
    }
}

/// Everything a front end needs to draw the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub phase: Phase,
    pub section: Section,
    /// Name shown in the header; the login name until the profile arrives.
    pub user_name: Option<String>,
    pub profile: Option<UserProfile>,
    /// Whether the group-grades action is offered.
    pub teacher_action: bool,
    pub grades: Panel<GradeEntry>,
    pub group_grades: Option<GroupPanel>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            phase: Phase::LoggedOut,
            section: Section::Login,
            user_name: None,
            profile: None,
            teacher_action: false,
            grades: Panel::Idle,
            group_grades: None,
        }
    }
}

impl ViewState {
    pub fn is_visible(&self, section: Section) -> bool {
        self.section == section
    }

    pub fn visible_sections(&self) -> Vec<Section> {
        Section::ALL.into_iter().filter(|s| self.is_visible(*s)).collect()
    }
}

/// Message surfaced to the user outside the regular view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Info(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Error(m) | Notice::Info(m) => m,
        }
    }
}

/// Rendering side of the client.
pub trait Frontend {
    /// Called after every state change with the full view.
    fn render(&mut self, view: &ViewState);

    fn notify(&mut self, notice: &Notice);
}

/// Whether `role` is one of `privileged` (case-insensitive).
pub fn is_privileged(role: &str, privileged: &[String]) -> bool {
    let role = role.trim().to_lowercase();
    privileged.iter().any(|p| p.to_lowercase() == role)
}
