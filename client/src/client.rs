//! reqwest implementation of [`AttendeeApi`]

use crate::{
    api::AttendeeApi,
    error::ApiError,
    types::{
        AssignBidderNumberRequest, AssignBidderNumberResponse, AttendeeRecord, BidderNumber,
        CancelAttendeesPayload, EventId, GuestId, GuestUpsert, RegistrationId,
    },
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`ApiClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to (e.g. `https://host/api`)
    pub base_url: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Per-request timeout enforced by the transport
    pub timeout: Duration,
}

impl ClientConfig {
    /// Config with no token and the default timeout
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Attach a bearer token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the per-request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Error bodies the backend is known to send
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        [self.message, self.detail, self.error]
            .into_iter()
            .flatten()
            .map(|m| m.trim().to_string())
            .find(|m| !m.is_empty())
    }
}

/// Auction backend client
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client from its config
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] if the base URL cannot be parsed or
    /// cannot carry path segments, or if the HTTP client fails to build.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidConfig(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidConfig(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: config.token,
        })
    }

    /// The base URL requests are sent to
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidConfig(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorize(request).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message);

        tracing::debug!(status = status.as_u16(), backend_message = ?message, "Backend rejected request");
        Err(ApiError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
    }
}

#[async_trait]
impl AttendeeApi for ApiClient {
    #[tracing::instrument(skip_all, fields(event_id = %event_id, guest_id = %guest_id, number = %number))]
    async fn assign_bidder_number(
        &self,
        event_id: &EventId,
        guest_id: &GuestId,
        number: BidderNumber,
    ) -> Result<AssignBidderNumberResponse, ApiError> {
        let url = self.endpoint(&[
            "events",
            event_id.as_str(),
            "guests",
            guest_id.as_str(),
            "bidder-number",
        ])?;

        let response = self.execute(
            self.client
                .post(url)
                .json(&AssignBidderNumberRequest { number }),
        )
        .await?;

        // Some deployments answer 204 with no body for a plain assignment
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(AssignBidderNumberResponse::default());
        }
        serde_json::from_str(&body).map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
    }

    #[tracing::instrument(skip_all, fields(registration_id = %registration_id))]
    async fn cancel_registration(
        &self,
        registration_id: &RegistrationId,
        payload: &CancelAttendeesPayload,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["registrations", registration_id.as_str(), "cancel"])?;
        self.execute(self.client.post(url).json(payload)).await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(guest_id = %guest_id))]
    async fn cancel_guest(
        &self,
        guest_id: &GuestId,
        payload: &CancelAttendeesPayload,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["guests", guest_id.as_str()])?;
        self.execute(self.client.delete(url).json(payload)).await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(event_id = %event_id))]
    async fn list_attendees(&self, event_id: &EventId) -> Result<Vec<AttendeeRecord>, ApiError> {
        let url = self.endpoint(&["events", event_id.as_str(), "attendees"])?;
        self.execute_json(self.client.get(url)).await
    }

    #[tracing::instrument(skip_all, fields(event_id = %event_id))]
    async fn create_guest(&self, event_id: &EventId, guest: &GuestUpsert) -> Result<(), ApiError> {
        let url = self.endpoint(&["events", event_id.as_str(), "guests"])?;
        self.execute(self.client.post(url).json(guest)).await?;
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(guest_id = %guest_id))]
    async fn update_guest(&self, guest_id: &GuestId, guest: &GuestUpsert) -> Result<(), ApiError> {
        let url = self.endpoint(&["guests", guest_id.as_str()])?;
        self.execute(self.client.patch(url).json(guest)).await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["health"])?;
        self.execute(self.client.get(url)).await?;
        Ok(())
    }
}
