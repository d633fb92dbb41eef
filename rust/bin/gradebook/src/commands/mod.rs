//! Subcommand implementations.

pub mod grades;
pub mod login;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use gradebook_client::{App, FileStorage};
use tracing::debug;

use crate::config::ClientConfig;
use crate::terminal::Terminal;

/// Build the client from config, with an optional server override.
pub fn open(config_path: &Path, server: Option<&str>) -> Result<App<Terminal>> {
    let config = ClientConfig::load(config_path)?;
    let server = server.unwrap_or(&config.server);
    let session_path = config.session_path();
    debug!(server, session = %session_path.display(), "opening client");

    let storage = Arc::new(FileStorage::new(session_path));
    Ok(App::new(server, storage, Terminal::default())
        .with_privileged_roles(config.privileged_roles))
}
