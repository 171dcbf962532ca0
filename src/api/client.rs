//! API client for the admin dashboard's remote REST backend.
//!
//! Every response is wrapped in a `{status, message, data}` envelope.
//! This module unwraps it, maps HTTP failures onto `ApiError`, and
//! exposes typed methods for the auth endpoints and the resource
//! collections (users, roles, FAQs, CMS pages, customers, settings).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::auth::guard::RefreshTokens;
use crate::auth::session::{Session, TokenPair};
use crate::models::{
    ApiCmsPage, ApiCustomer, ApiFaq, ApiRole, ApiUser, ChangePasswordInput, CmsInput, CmsPage,
    CmsPayload, Customer, CustomersPayload, DeleteRequest, Faq, FaqInput, FaqsPayload, ListQuery,
    Pagination, ProfileInput, Role, RoleInput, RolesPayload, SequenceUpdate, SiteSettings,
    StatusUpdate, User, UserInput, UsersPayload,
};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Header carrying the refresh token on refresh/logout calls.
const REFRESH_TOKEN_HEADER: &str = "refresh-token";

/// Response envelope used by every backend endpoint. The `Option`
/// fields deserialize to `None` when the backend omits them; no
/// `serde(default)` here, since that would demand `T: Default`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    status: bool,
    message: Option<String>,
    data: Option<T>,
}

/// `data` payload of a successful login.
#[derive(Debug, Deserialize)]
struct LoginData {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
    #[serde(rename = "accessTokenExpiresIn")]
    access_token_expires_in: i64,
    #[serde(rename = "refreshTokenExpiresIn")]
    refresh_token_expires_in: i64,
}

/// `data` payload of a refresh. Only the access token is guaranteed;
/// everything else falls back to the session's current values.
#[derive(Debug, Deserialize)]
struct RefreshData {
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
    #[serde(rename = "accessTokenExpiresIn")]
    access_token_expires_in: Option<i64>,
    #[serde(rename = "refreshTokenExpiresIn")]
    refresh_token_expires_in: Option<i64>,
}

fn expiry_from_millis(ms: Option<i64>) -> Result<Option<DateTime<Utc>>, ApiError> {
    match ms {
        None => Ok(None),
        Some(ms) => DateTime::from_timestamp_millis(ms)
            .map(Some)
            .ok_or_else(|| {
                ApiError::InvalidResponse(format!("Token expiry timestamp out of range: {}", ms))
            }),
    }
}

/// Map a raw login response onto token data or a failure. A login
/// failure is `Rejected` with the backend's message, never the
/// session-expired sentinel; 401 here means bad credentials, not a
/// lapsed session.
fn parse_login_body(status: reqwest::StatusCode, body: &str) -> Result<LoginData, ApiError> {
    let envelope = match serde_json::from_str::<Envelope<LoginData>>(body) {
        Ok(envelope) => envelope,
        Err(_) if status == reqwest::StatusCode::UNAUTHORIZED => {
            return Err(ApiError::Rejected("Invalid credentials".to_string()));
        }
        Err(_) if !status.is_success() => return Err(ApiError::from_status(status, body)),
        Err(_) => {
            return Err(ApiError::InvalidResponse(
                "Failed to parse login response".to_string(),
            ));
        }
    };

    if !status.is_success() || !envelope.status {
        return Err(ApiError::Rejected(
            envelope
                .message
                .unwrap_or_else(|| "Invalid credentials".to_string()),
        ));
    }

    envelope
        .data
        .ok_or_else(|| ApiError::InvalidResponse("Login response missing token data".to_string()))
}

fn token_pair_from_refresh(data: RefreshData) -> Result<TokenPair, ApiError> {
    let access_token = data.access_token.ok_or_else(|| {
        ApiError::InvalidResponse("Refresh response missing accessToken".to_string())
    })?;
    Ok(TokenPair {
        access_token,
        refresh_token: data.refresh_token,
        access_token_expires_at: expiry_from_millis(data.access_token_expires_in)?,
        refresh_token_expires_at: expiry_from_millis(data.refresh_token_expires_in)?,
    })
}

/// API client for the dashboard backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    locale: String,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, locale: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            locale: locale.into(),
            access_token: None,
            refresh_token: None,
        })
    }

    /// A client carrying the given token pair, sharing the connection pool.
    pub fn with_tokens(
        &self,
        access_token: Option<String>,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            locale: self.locale.clone(),
            access_token,
            refresh_token,
        }
    }

    /// A client authorized as the given session.
    pub fn for_session(&self, session: &Session) -> Self {
        self.with_tokens(
            Some(session.access_token.clone()),
            Some(session.refresh_token.clone()),
        )
    }

    fn headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_str(&self.locale)
                .map_err(|_| ApiError::InvalidResponse("Invalid locale header".to_string()))?,
        );
        if let Some(ref token) = self.access_token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| ApiError::InvalidResponse("Invalid token header".to_string()))?,
            );
        }
        if let Some(ref token) = self.refresh_token {
            headers.insert(
                header::HeaderName::from_static(REFRESH_TOKEN_HEADER),
                header::HeaderValue::from_str(token)
                    .map_err(|_| ApiError::InvalidResponse("Invalid token header".to_string()))?,
            );
        }
        Ok(headers)
    }

    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Envelope<T>, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    /// Unwrap a successful envelope's `data`, converting a business
    /// rejection (`status: false`) into `ApiError::Rejected`.
    async fn parse_data<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let envelope: Envelope<T> = Self::read_envelope(response).await?;
        if !envelope.status {
            return Err(ApiError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "Request rejected".to_string()),
            ));
        }
        envelope
            .data
            .ok_or_else(|| ApiError::InvalidResponse("Response envelope missing data".to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url).headers(self.headers()?);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        Self::parse_data(response).await
    }

    /// Fire a mutation and return the backend's success message.
    async fn mutate<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .request(method, &url)
            .headers(self.headers()?)
            .json(body)
            .send()
            .await?;

        let envelope: Envelope<serde_json::Value> = Self::read_envelope(response).await?;
        if !envelope.status {
            return Err(ApiError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "Request rejected".to_string()),
            ));
        }
        Ok(envelope.message.unwrap_or_default())
    }

    // ===== Auth =====

    /// Exchange credentials for a session. Any failure, HTTP-level or
    /// envelope-level, surfaces the backend's message ("Invalid
    /// credentials" and friends) rather than the session-expired sentinel.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let url = format!("{}/auth/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let data = parse_login_body(status, &body)?;

        let session = Session::from_login(
            data.access_token,
            data.refresh_token,
            data.access_token_expires_in,
            data.refresh_token_expires_in,
        )
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        debug!(user_id = session.user_id, "Login succeeded");
        Ok(session)
    }

    /// Exchange an expired access token for a new pair. One attempt,
    /// no retry; the session guard owns the failure policy.
    pub async fn refresh(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<TokenPair, ApiError> {
        let url = format!("{}/auth/refresh", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .header(REFRESH_TOKEN_HEADER, refresh_token)
            .send()
            .await?;

        let data: RefreshData = Self::parse_data(response).await?;
        token_pair_from_refresh(data)
    }

    /// Best-effort server-side logout. Local sign-out never waits on it.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.mutate(Method::POST, "/auth/logout", &json!({}))
            .await
            .map(|_| ())
    }

    /// Out-of-band invalidation of a refresh token from an external link.
    pub async fn force_logout(&self, token: &str) -> Result<(), ApiError> {
        let url = format!("{}/auth/force-logout", self.base_url);
        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .query(&[("token", token)])
            .send()
            .await?;

        let envelope: Envelope<serde_json::Value> = Self::read_envelope(response).await?;
        if !envelope.status {
            warn!("Force-logout rejected by backend");
            return Err(ApiError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "Force logout failed".to_string()),
            ));
        }
        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<String, ApiError> {
        self.mutate(
            Method::POST,
            "/auth/forgot-password",
            &json!({ "email": email }),
        )
        .await
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<String, ApiError> {
        self.mutate(
            Method::POST,
            "/auth/reset-password",
            &json!({ "token": token, "password": password }),
        )
        .await
    }

    // ===== Users =====

    pub async fn list_users(&self, query: &ListQuery) -> Result<(Vec<User>, Pagination), ApiError> {
        let payload: UsersPayload = self.get_json("/users", &query.params()).await?;
        let users = payload.users.iter().map(|u| u.to_user()).collect();
        Ok((users, payload.pagination))
    }

    pub async fn view_user(&self, id: i64) -> Result<ApiUser, ApiError> {
        self.get_json(&format!("/users/{}", id), &[]).await
    }

    pub async fn create_user(&self, input: &UserInput) -> Result<String, ApiError> {
        self.mutate(Method::POST, "/users", input).await
    }

    pub async fn update_user(&self, id: i64, input: &UserInput) -> Result<String, ApiError> {
        self.mutate(Method::PUT, &format!("/users/{}", id), input)
            .await
    }

    // ===== Roles =====

    pub async fn list_roles(&self, query: &ListQuery) -> Result<(Vec<Role>, Pagination), ApiError> {
        let payload: RolesPayload = self.get_json("/roles", &query.params()).await?;
        let roles = payload.roles.iter().map(|r| r.to_role()).collect();
        Ok((roles, payload.pagination))
    }

    pub async fn view_role(&self, id: i64) -> Result<ApiRole, ApiError> {
        self.get_json(&format!("/roles/{}", id), &[]).await
    }

    pub async fn create_role(&self, input: &RoleInput) -> Result<String, ApiError> {
        self.mutate(Method::POST, "/roles", input).await
    }

    pub async fn update_role(&self, id: i64, input: &RoleInput) -> Result<String, ApiError> {
        self.mutate(Method::PUT, &format!("/roles/{}", id), input)
            .await
    }

    // ===== FAQs =====

    pub async fn list_faqs(&self, query: &ListQuery) -> Result<(Vec<Faq>, Pagination), ApiError> {
        let payload: FaqsPayload = self.get_json("/faqs", &query.params()).await?;
        let faqs = payload.faqs.iter().map(|f| f.to_faq()).collect();
        Ok((faqs, payload.pagination))
    }

    pub async fn view_faq(&self, id: i64) -> Result<ApiFaq, ApiError> {
        self.get_json(&format!("/faqs/{}", id), &[]).await
    }

    pub async fn create_faq(&self, input: &FaqInput) -> Result<String, ApiError> {
        self.mutate(Method::POST, "/faqs", input).await
    }

    pub async fn update_faq(&self, id: i64, input: &FaqInput) -> Result<String, ApiError> {
        self.mutate(Method::PUT, &format!("/faqs/{}", id), input)
            .await
    }

    // ===== CMS pages =====

    pub async fn list_cms(&self, query: &ListQuery) -> Result<(Vec<CmsPage>, Pagination), ApiError> {
        let payload: CmsPayload = self.get_json("/cms", &query.params()).await?;
        let pages = payload.cms.iter().map(|p| p.to_page()).collect();
        Ok((pages, payload.pagination))
    }

    pub async fn view_cms(&self, id: i64) -> Result<ApiCmsPage, ApiError> {
        self.get_json(&format!("/cms/{}", id), &[]).await
    }

    pub async fn create_cms(&self, input: &CmsInput) -> Result<String, ApiError> {
        self.mutate(Method::POST, "/cms", input).await
    }

    pub async fn update_cms(&self, id: i64, input: &CmsInput) -> Result<String, ApiError> {
        self.mutate(Method::PUT, &format!("/cms/{}", id), input)
            .await
    }

    // ===== Customers =====

    pub async fn list_customers(
        &self,
        query: &ListQuery,
    ) -> Result<(Vec<Customer>, Pagination), ApiError> {
        let payload: CustomersPayload = self.get_json("/customers", &query.params()).await?;
        let customers = payload.customers.iter().map(|c| c.to_customer()).collect();
        Ok((customers, payload.pagination))
    }

    pub async fn view_customer(&self, id: i64) -> Result<ApiCustomer, ApiError> {
        self.get_json(&format!("/customers/{}", id), &[]).await
    }

    // ===== Site settings =====

    pub async fn get_site_settings(&self) -> Result<SiteSettings, ApiError> {
        self.get_json("/site-settings", &[]).await
    }

    pub async fn update_site_settings(&self, settings: &SiteSettings) -> Result<String, ApiError> {
        self.mutate(Method::PUT, "/site-settings", settings).await
    }

    // ===== Profile =====

    pub async fn get_profile(&self) -> Result<ApiUser, ApiError> {
        self.get_json("/profile", &[]).await
    }

    pub async fn update_profile(&self, input: &ProfileInput) -> Result<String, ApiError> {
        self.mutate(Method::PUT, "/profile", input).await
    }

    pub async fn change_password(&self, input: &ChangePasswordInput) -> Result<String, ApiError> {
        self.mutate(Method::PUT, "/profile/change-password", input)
            .await
    }

    // ===== Common operations =====

    /// Toggle a record's status in any module.
    pub async fn update_status(&self, update: &StatusUpdate) -> Result<String, ApiError> {
        self.mutate(Method::PUT, "/common/status", update).await
    }

    /// Persist the drag-reorder sequence for one page of rows.
    pub async fn update_sequence(&self, update: &SequenceUpdate) -> Result<String, ApiError> {
        self.mutate(Method::PUT, "/common/sequence", update).await
    }

    /// Delete a record in any module.
    pub async fn delete_record(&self, request: &DeleteRequest) -> Result<String, ApiError> {
        self.mutate(Method::DELETE, "/common/delete", request).await
    }
}

#[async_trait]
impl RefreshTokens for ApiClient {
    async fn refresh_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<TokenPair, ApiError> {
        self.refresh(access_token, refresh_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_envelope() {
        let json = r#"{
            "status": true,
            "message": "Login successful",
            "data": {
                "accessToken": "A1",
                "refreshToken": "R1",
                "accessTokenExpiresIn": 1700000010000,
                "refreshTokenExpiresIn": 1700000100000
            }
        }"#;

        let envelope: Envelope<LoginData> = serde_json::from_str(json).expect("parse envelope");
        assert!(envelope.status);
        let data = envelope.data.expect("login data");
        assert_eq!(data.access_token, "A1");
        assert!(data.access_token_expires_in < data.refresh_token_expires_in);
    }

    #[test]
    fn test_parse_envelope_without_data_field() {
        // Mutation responses omit `data` entirely; the envelope must
        // still deserialize even though LoginData has no default.
        let json = r#"{"status": true, "message": "Updated"}"#;
        let envelope: Envelope<LoginData> = serde_json::from_str(json).expect("parse envelope");
        assert!(envelope.status);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("Updated"));
    }

    #[test]
    fn test_login_unauthorized_is_rejected_not_expired() {
        // A 401 from the login endpoint is bad credentials, not a
        // lapsed session, even when the body is not an envelope.
        let result = parse_login_body(reqwest::StatusCode::UNAUTHORIZED, "Unauthorized");
        match result {
            Err(ApiError::Rejected(message)) => assert_eq!(message, "Invalid credentials"),
            other => panic!("expected Rejected, got {:?}", other.err()),
        }

        let body = r#"{"status": false, "message": "Invalid email or password"}"#;
        let result = parse_login_body(reqwest::StatusCode::UNAUTHORIZED, body);
        match result {
            Err(ApiError::Rejected(message)) => assert_eq!(message, "Invalid email or password"),
            other => panic!("expected Rejected, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_login_server_error_keeps_status_mapping() {
        let result = parse_login_body(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(result, Err(ApiError::ServerError(_))));
    }

    #[test]
    fn test_refresh_falls_back_for_omitted_fields() {
        let json = r#"{"accessToken": "A2"}"#;
        let data: RefreshData = serde_json::from_str(json).expect("parse refresh data");
        let pair = token_pair_from_refresh(data).expect("token pair");

        assert_eq!(pair.access_token, "A2");
        assert!(pair.refresh_token.is_none());
        assert!(pair.access_token_expires_at.is_none());
        assert!(pair.refresh_token_expires_at.is_none());
    }

    #[test]
    fn test_refresh_requires_access_token() {
        let json = r#"{"refreshToken": "R2"}"#;
        let data: RefreshData = serde_json::from_str(json).expect("parse refresh data");
        let result = token_pair_from_refresh(data);
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
    }

    #[test]
    fn test_refresh_converts_millis_expiries() {
        let json = r#"{
            "accessToken": "A2",
            "refreshToken": "R2",
            "accessTokenExpiresIn": 1700000010000,
            "refreshTokenExpiresIn": 1700000100000
        }"#;
        let data: RefreshData = serde_json::from_str(json).expect("parse refresh data");
        let pair = token_pair_from_refresh(data).expect("token pair");

        let access = pair.access_token_expires_at.expect("access expiry");
        let refresh = pair.refresh_token_expires_at.expect("refresh expiry");
        assert_eq!(access.timestamp_millis(), 1_700_000_010_000);
        assert!(access < refresh);
    }

    #[test]
    fn test_rejected_envelope_surfaces_message() {
        let json = r#"{"status": false, "message": "Email already taken", "data": null}"#;
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(json).expect("parse envelope");
        assert!(!envelope.status);
        assert_eq!(envelope.message.as_deref(), Some("Email already taken"));
    }
}
