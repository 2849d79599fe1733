//! REST API client.
//!
//! Holds the bearer token returned by register/login and attaches it to every
//! protected call. Error responses (`{ "error": ... }`) become `ClientError::Api`.

use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::ClientError;
use crate::models::*;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    /// e.g. `http://localhost:3001`, no trailing slash
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Restore a token saved from an earlier session.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Forget the token. Tokens are not revoked server-side.
    pub fn sign_out(&mut self) {
        self.token = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        };
        tracing::debug!("API error {}: {}", status, message);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(request: RequestBuilder) -> Result<(), ClientError> {
        Self::check(request.send().await?).await?;
        Ok(())
    }

    // ── public endpoints ──

    pub async fn health(&self) -> Result<Value, ClientError> {
        Self::send(self.http.get(self.url("/health"))).await
    }

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let request = self
            .http
            .post(self.url("/auth/register"))
            .json(&RegisterBody { name, email, password });
        let auth: AuthResponse = Self::send(request).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let request = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginBody { email, password });
        let auth: AuthResponse = Self::send(request).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    // ── protected endpoints ──

    pub async fn me(&self) -> Result<UserResponse, ClientError> {
        Self::send(self.authorized(self.http.get(self.url("/auth/me")))?).await
    }

    pub async fn list_deadlines(&self) -> Result<Vec<Deadline>, ClientError> {
        Self::send(self.authorized(self.http.get(self.url("/deadlines")))?).await
    }

    pub async fn create_deadline(&self, req: &CreateDeadlineRequest) -> Result<Deadline, ClientError> {
        Self::send(self.authorized(self.http.post(self.url("/deadlines")))?.json(req)).await
    }

    pub async fn update_deadline(
        &self,
        id: &str,
        req: &UpdateDeadlineRequest,
    ) -> Result<Deadline, ClientError> {
        let url = self.url(&format!("/deadlines/{id}"));
        Self::send(self.authorized(self.http.put(url))?.json(req)).await
    }

    pub async fn delete_deadline(&self, id: &str) -> Result<(), ClientError> {
        let url = self.url(&format!("/deadlines/{id}"));
        Self::send_empty(self.authorized(self.http.delete(url))?).await
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, ClientError> {
        Self::send(self.authorized(self.http.get(self.url("/courses")))?).await
    }

    pub async fn create_course(&self, req: &CreateCourseRequest) -> Result<Course, ClientError> {
        Self::send(self.authorized(self.http.post(self.url("/courses")))?.json(req)).await
    }

    pub async fn update_course(&self, id: &str, req: &UpdateCourseRequest) -> Result<Course, ClientError> {
        let url = self.url(&format!("/courses/{id}"));
        Self::send(self.authorized(self.http.put(url))?.json(req)).await
    }

    pub async fn delete_course(&self, id: &str) -> Result<(), ClientError> {
        let url = self.url(&format!("/courses/{id}"));
        Self::send_empty(self.authorized(self.http.delete(url))?).await
    }

    pub async fn list_study_sessions(&self) -> Result<Vec<StudySession>, ClientError> {
        Self::send(self.authorized(self.http.get(self.url("/study-sessions")))?).await
    }

    pub async fn create_study_session(
        &self,
        req: &CreateStudySessionRequest,
    ) -> Result<StudySession, ClientError> {
        Self::send(self.authorized(self.http.post(self.url("/study-sessions")))?.json(req)).await
    }

    pub async fn study_data(&self) -> Result<StudyData, ClientError> {
        Self::send(self.authorized(self.http.get(self.url("/study-data")))?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:3001/");
        assert_eq!(client.url("/deadlines"), "http://localhost:3001/api/deadlines");
    }

    #[tokio::test]
    async fn protected_calls_need_a_token() {
        let mut client = ApiClient::new("http://127.0.0.1:9");
        assert!(matches!(client.list_courses().await, Err(ClientError::NotAuthenticated)));

        client.set_token("abc");
        assert!(client.is_authenticated());
        client.sign_out();
        assert!(matches!(client.study_data().await, Err(ClientError::NotAuthenticated)));
    }
}
