//! Profile and grade commands.
//!
//! Each one starts the client the way a fresh page load would: restore the
//! session and load the profile, then run the action.

use std::path::Path;

use anyhow::Result;
use gradebook_client::{App, Phase, Section};

use super::open;
use crate::terminal::Terminal;

/// Open and start the client. A missing session prints the login section
/// and fails.
async fn started(config_path: &Path, server: Option<&str>) -> Result<App<Terminal>> {
    let mut app = open(config_path, server)?;
    let result = app.startup().await;
    if app.phase() == Phase::LoggedOut {
        app.frontend_mut().flush();
        result?;
        anyhow::bail!("not logged in");
    }
    result?;
    Ok(app)
}

/// Show the main (profile) section.
pub async fn profile(config_path: &Path, server: Option<&str>) -> Result<()> {
    let mut app = started(config_path, server).await?;
    app.show_section(Section::Main);
    app.frontend_mut().flush();
    Ok(())
}

/// Show the caller's own grades.
pub async fn mine(config_path: &Path, server: Option<&str>) -> Result<()> {
    let mut app = started(config_path, server).await?;
    let result = app.load_my_grades().await;
    app.frontend_mut().flush();
    Ok(result?)
}

/// Show grades for one group.
pub async fn group(name: &str, config_path: &Path, server: Option<&str>) -> Result<()> {
    let mut app = started(config_path, server).await?;
    if !app.view().teacher_action {
        anyhow::bail!("group grades are only available to teachers and administrators");
    }
    let result = app.load_group_grades(name).await;
    app.frontend_mut().flush();
    Ok(result?)
}

/// Write one grade per student for a group.
pub async fn put(
    group: &str,
    students: &[String],
    grades: &[i64],
    config_path: &Path,
    server: Option<&str>,
) -> Result<()> {
    let mut app = started(config_path, server).await?;
    let result = app.put_group_grades(group, students, grades).await;
    app.frontend_mut().flush();
    Ok(result?)
}
