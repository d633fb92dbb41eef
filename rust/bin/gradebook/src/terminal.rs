//! Terminal front end.
//!
//! Keeps the latest view and prints only the visible section once the
//! command is done. Notices go to stderr as they arrive.

use std::fmt::Write as _;

use gradebook_client::{Frontend, Notice, Panel, Section, ViewState};

#[derive(Default)]
pub struct Terminal {
    last: Option<ViewState>,
}

impl Terminal {
    /// Print the last rendered view, if any.
    pub fn flush(&mut self) {
        if let Some(view) = self.last.take() {
            print!("{}", draw(&view));
        }
    }
}

impl Frontend for Terminal {
    fn render(&mut self, view: &ViewState) {
        self.last = Some(view.clone());
    }

    fn notify(&mut self, notice: &Notice) {
        match notice {
            Notice::Error(m) => eprintln!("error: {}", m),
            Notice::Info(m) => eprintln!("{}", m),
        }
    }
}

/// Text for the visible section.
pub fn draw(view: &ViewState) -> String {
    let mut out = String::new();
    match view.section {
        Section::Login => {
            out.push_str("Not logged in. Run `gradebook login`.\n");
        }
        Section::Main => {
            if let Some(name) = &view.user_name {
                let _ = writeln!(out, "Logged in as {}", name);
            }
            if let Some(p) = &view.profile {
                let _ = writeln!(out, "Name:  {}", p.name);
                let _ = writeln!(out, "Role:  {}", p.role);
                if let Some(g) = &p.group {
                    let _ = writeln!(out, "Group: {}", g);
                }
            }
            if view.teacher_action {
                out.push_str("Group grades: gradebook group <NAME>\n");
            }
        }
        Section::Grades => {
            out.push_str("My grades\n");
            match &view.grades {
                Panel::Idle => {}
                Panel::Empty(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                Panel::Entries(rows) => {
                    for g in rows {
                        let _ = writeln!(out, "\n{}", g.discipline);
                        let _ = writeln!(out, "  Grade:   {}", g.value);
                        let _ = writeln!(out, "  Teacher: {}", g.teacher);
                        let _ = writeln!(out, "  Date:    {}", g.date);
                    }
                }
            }
        }
        Section::Teacher => match &view.group_grades {
            None => out.push_str("Group grades\n"),
            Some(group) => {
                let _ = writeln!(out, "{}", group.heading());
                match &group.panel {
                    Panel::Idle => {}
                    Panel::Empty(msg) => {
                        let _ = writeln!(out, "{}", msg);
                    }
                    Panel::Entries(rows) => {
                        for g in rows {
                            let _ = writeln!(out, "  {}: {} ({})", g.student, g.value, g.date);
                        }
                    }
                }
            }
        },
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_client::{GradeEntry, GroupGradeEntry, GroupPanel, Phase, NO_GRADES_MESSAGE};

    #[test]
    fn login_section() {
        assert_eq!(draw(&ViewState::default()), "Not logged in. Run `gradebook login`.\n");
    }

    #[test]
    fn empty_grades_show_message() {
        let view = ViewState {
            phase: Phase::LoggedIn,
            section: Section::Grades,
            grades: Panel::Empty(NO_GRADES_MESSAGE),
            ..ViewState::default()
        };
        assert_eq!(draw(&view), "My grades\nYou have no grades yet\n");
    }

    #[test]
    fn grade_rows() {
        let view = ViewState {
            phase: Phase::LoggedIn,
            section: Section::Grades,
            grades: Panel::Entries(vec![GradeEntry {
                discipline: "Math".into(),
                value: "5".into(),
                teacher: "Petrov".into(),
                date: "2024-01-15".into(),
            }]),
            ..ViewState::default()
        };
        let text = draw(&view);
        assert!(text.contains("\nMath\n"));
        assert!(text.contains("Grade:   5"));
        assert!(text.contains("Date:    2024-01-15"));
    }

    #[test]
    fn group_rows_under_heading() {
        let view = ViewState {
            phase: Phase::LoggedIn,
            section: Section::Teacher,
            group_grades: Some(GroupPanel {
                group: "IVT-21".into(),
                panel: Panel::Entries(vec![GroupGradeEntry {
                    student: "Ivanov".into(),
                    value: "4".into(),
                    date: "2024-01-15".into(),
                }]),
            }),
            ..ViewState::default()
        };
        assert_eq!(draw(&view), "Grades for group IVT-21\n  Ivanov: 4 (2024-01-15)\n");
    }

    #[test]
    fn flush_consumes_last_view() {
        let mut term = Terminal::default();
        term.render(&ViewState::default());
        assert!(term.last.is_some());
        term.flush();
        assert!(term.last.is_none());
    }
}
