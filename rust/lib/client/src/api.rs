//! HTTP client for the grading service.
//!
//! Every call goes through [`ApiClient::request`], which attaches the
//! session's bearer token and maps the response status onto
//! [`ClientError`]. A 401 clears the session before the error is returned.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::model::{
    GradeChange, GradeRecord, GroupGradeRecord, ListBody, MassGrades, ServerMessage, UserProfile,
};
use crate::session::Session;

/// Per-call knobs for [`ApiClient::request`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Merged over the default `Content-Type: application/json`; entries
    /// here win.
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn with_method(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Bearer-authenticated client bound to one service address.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<Session>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and return the decoded JSON body.
    ///
    /// `endpoint` is a path starting with `/`, appended to the base URL
    /// as is. Callers escape their own path segments.
    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<serde_json::Value, ClientError> {
        let raw = format!("{}{}", self.base_url, endpoint);
        let url = Url::parse(&raw)
            .map_err(|e| ClientError::validation(format!("invalid URL {}: {}", raw, e)))?;
        self.send(url, options).await
    }

    /// Base URL with `segments` appended, each one percent-encoded as a
    /// single path segment.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let invalid = || ClientError::validation(format!("invalid server URL: {}", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|_| invalid())?.pop_if_empty().extend(segments);
        Ok(url)
    }

    async fn send(&self, url: Url, options: RequestOptions) -> Result<serde_json::Value, ClientError> {
        // Only the path is logged; the query may carry a password.
        let path = url.path().to_string();
        debug!(method = %options.method, %path, "api request");

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(options.headers);
        if let Some(token) = self.session.get() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                ClientError::Storage("stored token is not a valid header value".into())
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = self.http.request(options.method, url).headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = options.body {
            let bytes = serde_json::to_vec(&body)
                .map_err(|e| ClientError::Decode(format!("request body: {}", e)))?;
            builder = builder.body(bytes);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        debug!(status = status.as_u16(), %path, "api response");

        if status == StatusCode::UNAUTHORIZED {
            warn!(%path, "unauthorized, dropping session");
            if let Err(e) = self.session.clear() {
                warn!(error = %e, "failed to clear stored session");
            }
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Http { status: status.as_u16(), body });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::Decode(format!("response body: {}", e)))
    }

    async fn fetch<R: DeserializeOwned>(
        &self,
        segments: &[&str],
        options: RequestOptions,
    ) -> Result<R, ClientError> {
        let url = self.url(segments)?;
        let path = url.path().to_string();
        let value = self.send(url, options).await?;
        serde_json::from_value(value).map_err(|e| ClientError::Decode(format!("{}: {}", path, e)))
    }

    /// `GET /users/me`.
    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        self.fetch(&["users", "me"], RequestOptions::get()).await
    }

    /// `GET /my_grades`.
    pub async fn my_grades(&self) -> Result<Vec<GradeRecord>, ClientError> {
        let body: ListBody<GradeRecord> = self.fetch(&["my_grades"], RequestOptions::get()).await?;
        Ok(body.into_items())
    }

    /// `GET /teacher/grades/{group}`.
    pub async fn group_grades(&self, group: &str) -> Result<Vec<GroupGradeRecord>, ClientError> {
        let body: ListBody<GroupGradeRecord> =
            self.fetch(&["teacher", "grades", group], RequestOptions::get()).await?;
        Ok(body.into_items())
    }

    /// `GET /student/edit-password`. Returns the server's confirmation.
    pub async fn change_password(&self, password: &str) -> Result<String, ClientError> {
        if password.is_empty() {
            return Err(ClientError::validation("enter a new password"));
        }
        let options = RequestOptions::get().query("password", password);
        let reply: ServerMessage = self.fetch(&["student", "edit-password"], options).await?;
        Ok(reply.message)
    }

    /// `PATCH /teacher/mass-grades/{group}`: one grade per student, paired
    /// by position.
    pub async fn put_group_grades(
        &self,
        group: &str,
        students: &[String],
        grades: &[i64],
    ) -> Result<Vec<GradeChange>, ClientError> {
        if group.trim().is_empty() {
            return Err(ClientError::validation("enter a group name"));
        }
        if students.is_empty() || grades.is_empty() {
            return Err(ClientError::validation("student and grade lists must not be empty"));
        }
        if students.len() != grades.len() {
            return Err(ClientError::validation(format!(
                "got {} students but {} grades",
                students.len(),
                grades.len()
            )));
        }

        let group = group.trim();
        let body = serde_json::to_value(MassGrades { group_name: group, students, grades })
            .map_err(|e| ClientError::Decode(format!("request body: {}", e)))?;
        let options = RequestOptions::with_method(Method::PATCH).json(body);
        self.fetch(&["teacher", "mass-grades", group], options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStorage;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Arc::new(Session::new(Arc::new(MemoryStorage::new()))))
    }

    #[test]
    fn url_keeps_unreserved_segments() {
        let url = client("http://127.0.0.1:8000").url(&["teacher", "grades", "IVT-21_a.b~c"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/teacher/grades/IVT-21_a.b~c");
    }

    #[test]
    fn url_escapes_spaces_slashes_and_utf8() {
        let c = client("http://127.0.0.1:8000");
        assert_eq!(c.url(&["g", "IVT 21"]).unwrap().path(), "/g/IVT%2021");
        assert_eq!(c.url(&["g", "a/b"]).unwrap().path(), "/g/a%2Fb");
        assert_eq!(c.url(&["g", "ИВТ"]).unwrap().path(), "/g/%D0%98%D0%92%D0%A2");
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let url = client("http://example.test/api/").url(&["users", "me"]).unwrap();
        assert_eq!(url.as_str(), "http://example.test/api/users/me");
    }

    #[test]
    fn url_rejects_unparseable_base() {
        let err = client("not a url").url(&["users", "me"]).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        assert_eq!(client("http://127.0.0.1:8000/").base_url(), "http://127.0.0.1:8000");
    }
}
