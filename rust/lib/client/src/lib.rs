//! Gradebook client.
//!
//! Talks to the grading service over HTTP: signs in with a username and
//! password, keeps the issued bearer token in a [`Session`], and drives a
//! small view model ([`ViewState`]) that a front end renders.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use gradebook_client::{App, FileStorage};
//!
//! let storage = Arc::new(FileStorage::new("/home/me/.gradebook/session.toml"));
//! let mut app = App::new("http://127.0.0.1:8000", storage, my_frontend);
//! app.startup().await?;
//! app.login("alice", "pw1").await?;
//! app.load_my_grades().await?;
//! ```

pub mod api;
pub mod app;
pub mod auth;
pub mod error;
pub mod model;
pub mod session;
pub mod view;

pub use api::{ApiClient, RequestOptions};
pub use app::App;
pub use auth::Auth;
pub use error::ClientError;
pub use model::{GradeChange, GradeRecord, GroupGradeRecord, UserProfile};
pub use session::{FileStorage, MemoryStorage, Session, TokenStorage};
pub use view::{
    Frontend, GradeEntry, GroupGradeEntry, GroupPanel, Notice, Panel, Phase, Section, ViewState,
    DEFAULT_PRIVILEGED_ROLES, NO_GRADES_MESSAGE, NO_GROUP_GRADES_MESSAGE,
};

/// Default service address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
