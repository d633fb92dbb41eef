//! View controller.
//!
//! Each public method is one user action. Actions update the [`ViewState`],
//! hand it to the [`Frontend`], and return the typed outcome. Failures are
//! both returned and shown through [`Frontend::notify`]; a 401 from any
//! call also drops back to the login section.

use std::sync::Arc;

use tracing::{debug, info};

use crate::api::ApiClient;
use crate::auth::Auth;
use crate::error::ClientError;
use crate::session::{Session, TokenStorage};
use crate::view::{
    is_privileged, Frontend, GradeEntry, GroupGradeEntry, GroupPanel, Notice, Panel, Phase,
    Section, ViewState, DEFAULT_PRIVILEGED_ROLES, NO_GRADES_MESSAGE, NO_GROUP_GRADES_MESSAGE,
};

pub struct App<F: Frontend> {
    session: Arc<Session>,
    api: ApiClient,
    auth: Auth,
    view: ViewState,
    frontend: F,
    privileged_roles: Vec<String>,
}

impl<F: Frontend> App<F> {
    /// Wire a session, API client and auth flow against `base_url`.
    pub fn new(base_url: &str, storage: Arc<dyn TokenStorage>, frontend: F) -> Self {
        let session = Arc::new(Session::new(storage));
        Self {
            api: ApiClient::new(base_url, Arc::clone(&session)),
            auth: Auth::new(base_url, Arc::clone(&session)),
            session,
            view: ViewState::default(),
            frontend,
            privileged_roles: DEFAULT_PRIVILEGED_ROLES.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn with_privileged_roles(mut self, roles: Vec<String>) -> Self {
        self.privileged_roles = roles;
        self
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    pub fn phase(&self) -> Phase {
        self.view.phase
    }

    /// Load the persisted token into the session and set the phase to
    /// match. No request is sent. A storage failure is notified and leaves
    /// the client logged out.
    pub fn restore_session(&mut self) -> Result<bool, ClientError> {
        match self.session.restore() {
            Ok(Some(_)) => {
                info!("restored saved session");
                self.view.phase = Phase::LoggedIn;
                Ok(true)
            }
            Ok(None) => {
                debug!("no saved session");
                self.view.phase = Phase::LoggedOut;
                Ok(false)
            }
            Err(e) => {
                self.enter_logged_out();
                Err(self.fail("failed to restore session", e))
            }
        }
    }

    /// Restore a persisted token. With one, go straight to the main section
    /// and load the profile; without, show login.
    pub async fn startup(&mut self) -> Result<(), ClientError> {
        if self.restore_session()? {
            self.view.section = Section::Main;
            self.render();
            self.load_profile().await
        } else {
            self.enter_logged_out();
            Ok(())
        }
    }

    /// Make `section` the only visible one.
    ///
    /// Without a session every section but login is off limits.
    pub fn show_section(&mut self, section: Section) {
        if section != Section::Login && !self.session.is_active() {
            debug!(%section, "no session, staying on login");
            self.enter_logged_out();
            return;
        }
        self.view.section = section;
        self.render();
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        if let Err(e) = self.auth.login(username, password).await {
            return Err(self.fail("login failed", e));
        }

        // Panels from an earlier session must not leak into this one.
        self.view = ViewState {
            phase: Phase::LoggedIn,
            section: Section::Main,
            user_name: Some(username.to_string()),
            ..ViewState::default()
        };
        self.render();
        self.load_profile().await
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        let result = self.auth.logout();
        self.enter_logged_out();
        result.map_err(|e| self.fail("logout failed", e))
    }

    pub async fn load_profile(&mut self) -> Result<(), ClientError> {
        let profile = match self.api.me().await {
            Ok(p) => p,
            Err(e) => return Err(self.fail("failed to load profile", e)),
        };

        self.view.teacher_action = is_privileged(&profile.role, &self.privileged_roles);
        if self.view.user_name.is_none() {
            self.view.user_name = Some(profile.name.clone());
        }
        debug!(role = %profile.role, teacher = self.view.teacher_action, "profile loaded");
        self.view.profile = Some(profile);
        self.render();
        Ok(())
    }

    pub async fn load_my_grades(&mut self) -> Result<(), ClientError> {
        self.show_section(Section::Grades);
        let records = match self.api.my_grades().await {
            Ok(r) => r,
            Err(e) => return Err(self.fail("failed to load grades", e)),
        };

        let entries = records.iter().map(GradeEntry::from).collect();
        self.view.grades = Panel::from_items(entries, NO_GRADES_MESSAGE);
        self.render();
        Ok(())
    }

    pub async fn load_group_grades(&mut self, group: &str) -> Result<(), ClientError> {
        let group = group.trim();
        if group.is_empty() {
            return Err(self.fail("", ClientError::validation("enter a group name")));
        }

        self.show_section(Section::Teacher);
        let records = match self.api.group_grades(group).await {
            Ok(r) => r,
            Err(e) => return Err(self.fail("failed to load group grades", e)),
        };

        let entries = records.iter().map(GroupGradeEntry::from).collect();
        self.view.group_grades = Some(GroupPanel {
            group: group.to_string(),
            panel: Panel::from_items(entries, NO_GROUP_GRADES_MESSAGE),
        });
        self.render();
        Ok(())
    }

    pub async fn change_password(&mut self, password: &str) -> Result<(), ClientError> {
        self.require_session("failed to change password")?;
        match self.api.change_password(password).await {
            Ok(message) => {
                self.frontend.notify(&Notice::Info(message));
                Ok(())
            }
            Err(e) => Err(self.fail("failed to change password", e)),
        }
    }

    /// Write grades for a group, then reload it so the teacher section
    /// shows the stored values.
    pub async fn put_group_grades(
        &mut self,
        group: &str,
        students: &[String],
        grades: &[i64],
    ) -> Result<(), ClientError> {
        self.require_session("failed to save grades")?;
        let changes = match self.api.put_group_grades(group, students, grades).await {
            Ok(c) => c,
            Err(e) => return Err(self.fail("failed to save grades", e)),
        };
        let group = group.trim();
        info!(group, count = changes.len(), "grades saved");
        self.frontend.notify(&Notice::Info(format!(
            "saved {} grade(s) for group {}",
            changes.len(),
            group
        )));
        self.load_group_grades(group).await
    }

    /// Writes need a session; without one nothing is sent.
    fn require_session(&mut self, context: &str) -> Result<(), ClientError> {
        if self.session.is_active() {
            return Ok(());
        }
        self.enter_logged_out();
        Err(self.fail(context, ClientError::validation("log in first")))
    }

    fn render(&mut self) {
        self.frontend.render(&self.view);
    }

    fn enter_logged_out(&mut self) {
        self.view = ViewState::default();
        self.render();
    }

    /// Show `err` to the user and hand it back. Unauthorized also resets
    /// the view to login; the API client already dropped the session.
    fn fail(&mut self, context: &str, err: ClientError) -> ClientError {
        if err.is_unauthorized() {
            self.enter_logged_out();
        }
        let message = match &err {
            ClientError::Validation(msg) => msg.clone(),
            other if context.is_empty() => other.to_string(),
            other => format!("{}: {}", context, other),
        };
        debug!(error = %err, "surfacing error");
        self.frontend.notify(&Notice::Error(message));
        err
    }
}
