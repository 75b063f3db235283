//! Typed HTTP client for the gymdesk API.
//!
//! Used by dashboards that run outside the server process. Authentication is
//! an explicit [`Session`] value: it is created by [`GymClient::login`], passed
//! to every call that needs a bearer token, and consumed by [`Session::logout`].

use std::time::Duration;

use chrono::{DateTime, TimeZone};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::class::GymClass;
use crate::models::pagination::PagedResult;
use crate::models::payment::Payment;
use crate::models::trainer::Trainer;
use crate::models::user::{MemberResponse, UserRole};
use crate::services::auth::AuthResponse;
use crate::services::dashboard::{
    compute_summary, DashboardSummary, Fetched, MemberRow, PaymentRow, SummaryInputs,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Largest page the server hands out.
const MEMBER_PAGE_SIZE: i64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{status} {code}: {message}")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
    },

    #[error("Response carried no data")]
    EmptyResponse,

    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Response envelope as seen from the client side.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    error: Option<EnvelopeError>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeError {
    code: String,
    message: String,
}

/// An authenticated session. Holds the tokens and the signed-in profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    access_token: String,
    refresh_token: String,
    pub user: MemberResponse,
}

impl Session {
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == UserRole::Administrator
    }

    /// End the session. The server revokes both tokens when it can.
    pub async fn logout(self, client: &GymClient) -> Result<(), ClientError> {
        let body = json!({ "refresh_token": self.refresh_token });
        client
            .send::<String>(Method::POST, "/auth/logout", Some(&self), Some(&body))
            .await?;
        tracing::debug!(user_id = %self.user.id, "Session closed");
        Ok(())
    }

    /// Swap the refresh token for a fresh access token.
    pub async fn refresh(&mut self, client: &GymClient) -> Result<(), ClientError> {
        #[derive(Deserialize)]
        struct Refreshed {
            access_token: String,
            refresh_token: String,
        }

        let body = json!({ "refresh_token": self.refresh_token });
        let tokens: Refreshed = client
            .send(Method::POST, "/auth/refresh", None, Some(&body))
            .await?;
        self.access_token = tokens.access_token;
        self.refresh_token = tokens.refresh_token;
        Ok(())
    }
}

/// Client for the `/api/v1` surface of a gymdesk server.
#[derive(Debug, Clone)]
pub struct GymClient {
    http: reqwest::Client,
    api_base: String,
}

impl GymClient {
    /// `base_url` is the server origin, e.g. `http://localhost:5000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_base: format!("{}/api/v1", base_url.trim_end_matches('/')),
        })
    }

    /// Sign in and open a session.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        login_type: Option<UserRole>,
    ) -> Result<Session, ClientError> {
        let body = json!({
            "email": email,
            "password": password,
            "login_type": login_type,
        });
        let auth: AuthResponse = self.send(Method::POST, "/auth/login", None, Some(&body)).await?;
        Ok(Session {
            access_token: auth.tokens.access_token,
            refresh_token: auth.tokens.refresh_token,
            user: auth.user,
        })
    }

    /// Compute the administrator summary from the collection endpoints.
    ///
    /// All five reads run concurrently and every one is awaited. A read that
    /// fails contributes nothing; the others are still used.
    pub async fn admin_summary<Tz: TimeZone>(
        &self,
        session: &Session,
        now: &DateTime<Tz>,
    ) -> DashboardSummary {
        let (members, trainers, payments, classes, today) = tokio::join!(
            self.all_members(session),
            self.get_value(session, "/trainers"),
            self.get_value(session, "/payments"),
            self.get_value(session, "/classes"),
            self.get_value(session, "/attendance/today"),
        );

        let inputs = SummaryInputs {
            members: Fetched::from_rows("members", members),
            trainers: normalize::<Trainer>("trainers", trainers),
            payments: normalize::<Payment>("payments", payments).map(|p| PaymentRow::from(&p)),
            classes: normalize::<GymClass>("classes", classes),
            today_attendance: normalize("attendance_today", today),
        };

        compute_summary(&inputs, now)
    }

    /// Every member, walking the pages until the last one.
    pub async fn all_members(&self, session: &Session) -> Result<Vec<MemberRow>, ClientError> {
        let mut rows = Vec::new();
        let mut page = 1;
        loop {
            let path = format!("/members?page={page}&limit={MEMBER_PAGE_SIZE}");
            let result: PagedResult<MemberResponse> =
                self.send(Method::GET, &path, Some(session), None).await?;
            rows.extend(result.items.iter().map(MemberRow::from));
            if !result.has_next() || result.items.is_empty() {
                break;
            }
            page += 1;
        }
        Ok(rows)
    }

    async fn get_value(&self, session: &Session, path: &str) -> Result<Value, ClientError> {
        self.send(Method::GET, path, Some(session), None).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        session: Option<&Session>,
        body: Option<&Value>,
    ) -> Result<T, ClientError> {
        let mut request = self.http.request(method, format!("{}{path}", self.api_base));
        if let Some(session) = session {
            request = request.bearer_auth(&session.access_token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let envelope: Envelope<T> = response.json().await?;

        if let Some(error) = envelope.error {
            return Err(ClientError::Api {
                status,
                code: error.code,
                message: error.message,
            });
        }
        envelope.data.ok_or(ClientError::EmptyResponse)
    }
}

/// Normalize whatever a collection endpoint returned.
///
/// Accepts a bare list, a page (`{ items: [...] }`) or a count (`{ count: n }`).
/// Anything else, including a failed request, becomes [`Fetched::Missing`].
pub fn normalize<T: DeserializeOwned>(
    source: &'static str,
    response: Result<Value, ClientError>,
) -> Fetched<T> {
    let value = match response {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(source, error = %e, "Dashboard read failed, using empty collection");
            return Fetched::Missing;
        }
    };

    let decoded = match value {
        Value::Array(_) => serde_json::from_value::<Vec<T>>(value).map(Fetched::Collection),
        Value::Object(mut map) => {
            if let Some(items) = map.remove("items") {
                serde_json::from_value::<Vec<T>>(items).map(Fetched::Collection)
            } else if let Some(count) = map.get("count").and_then(Value::as_u64) {
                Ok(Fetched::Count(count))
            } else {
                tracing::warn!(source, "Dashboard read returned an unrecognized object");
                return Fetched::Missing;
            }
        }
        _ => {
            tracing::warn!(source, "Dashboard read returned a scalar");
            return Fetched::Missing;
        }
    };

    decoded.unwrap_or_else(|e| {
        tracing::warn!(source, error = %e, "Dashboard read did not decode");
        Fetched::Missing
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::Attendance;
    use crate::models::payment::PaymentStatus;

    fn payment_json(amount: i64, status: &str) -> Value {
        json!({
            "id": "7f1f6a52-2c1c-4c55-9a52-0d0d2b7c0a11",
            "member_id": "00000000-0000-0000-0000-000000000000",
            "member_name": "Priya Sharma",
            "email": "priya@example.com",
            "plan": "Premium",
            "amount": amount,
            "method": "UPI",
            "status": status,
            "transaction_id": null,
            "date": "2024-06-03T09:00:00Z",
            "created_at": "2024-06-03T09:00:00Z",
            "updated_at": "2024-06-03T09:00:00Z"
        })
    }

    #[test]
    fn bare_list_becomes_collection() {
        let body = json!([payment_json(999, "completed"), payment_json(2499, "pending")]);
        let fetched: Fetched<Payment> = normalize("payments", Ok(body));
        let rows = fetched.map(|p| PaymentRow::from(&p));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.items()[1].status, PaymentStatus::Pending);
    }

    #[test]
    fn count_object_becomes_count() {
        let fetched: Fetched<Attendance> = normalize("attendance_today", Ok(json!({ "count": 12 })));
        assert_eq!(fetched.len(), 12);
        assert!(fetched.items().is_empty());
    }

    #[test]
    fn paged_object_uses_items() {
        let body = json!({
            "items": [payment_json(500, "failed")],
            "total": 1,
            "page": 1,
            "limit": 100,
            "total_pages": 1
        });
        let fetched: Fetched<Payment> = normalize("payments", Ok(body));
        assert_eq!(fetched.len(), 1);
    }

    #[test]
    fn failure_and_odd_shapes_become_missing() {
        let failed: Fetched<Payment> = normalize("payments", Err(ClientError::EmptyResponse));
        assert_eq!(failed.len(), 0);

        let scalar: Fetched<Payment> = normalize("payments", Ok(json!("nope")));
        assert!(scalar.is_empty());

        let unknown: Fetched<Payment> = normalize("payments", Ok(json!({ "rows": [] })));
        assert!(unknown.is_empty());

        let malformed: Fetched<Payment> = normalize("payments", Ok(json!([{ "amount": "ten" }])));
        assert!(malformed.is_empty());
    }

    #[test]
    fn api_base_strips_trailing_slash() {
        let client = GymClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.api_base, "http://localhost:5000/api/v1");
    }

    #[test]
    fn admin_flag_follows_role() {
        let user: MemberResponse = serde_json::from_value(json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "Admin",
            "email": "admin@gym.com",
            "role": "administrator",
            "phone": null,
            "membership_type": "VIP",
            "address": null,
            "emergency_contact": null,
            "status": "Active",
            "join_date": "2024-01-01T00:00:00Z",
            "membership_expiry": null,
            "last_login": null,
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        let session = Session {
            access_token: "a".into(),
            refresh_token: "r".into(),
            user,
        };
        assert!(session.is_admin());
    }
}
