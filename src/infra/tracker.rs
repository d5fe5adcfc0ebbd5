use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use reqwest::{
    Client, RequestBuilder, Response,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Serialize;

use crate::domain::ticket::{Ticket, TicketId};
use crate::error::{AppError, AppResult};
use crate::services::{IssueTrackerService, NotificationService};

/// Client for the tracker's JSON ticket API.
pub struct HttpTracker {
    http: Client,
    base_url: Option<String>,
    user: Option<String>,
    token: Option<String>,
}

impl HttpTracker {
    pub fn new(base_url: Option<String>, user: Option<String>, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            user,
            token,
        }
    }

    fn base_url(&self) -> AppResult<&str> {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .ok_or_else(|| AppError::Configuration("tracker URL not configured".to_string()))
    }

    fn ticket_endpoint(base_url: &str, id: TicketId) -> String {
        format!("{base_url}/tickets/{id}")
    }

    fn auth_header(user: &str, token: &str) -> String {
        let credentials = format!("{user}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(ACCEPT, "application/json");
        match (self.user.as_deref(), self.token.as_deref()) {
            (Some(user), Some(token)) => request.header(AUTHORIZATION, Self::auth_header(user, token)),
            _ => request,
        }
    }

    async fn ticket_response(response: Response, id: TicketId) -> AppResult<Ticket> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::IssueTracker(format!(
                "tracker responded with {status} for ticket #{id}: {body}"
            )));
        }

        response.json::<Ticket>().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse ticket #{id}: {err}"))
        })
    }
}

#[async_trait]
impl IssueTrackerService for HttpTracker {
    async fn get_ticket(&self, id: TicketId) -> AppResult<Ticket> {
        let base_url = self.base_url()?;
        let response = self
            .authorize(self.http.get(Self::ticket_endpoint(base_url, id)))
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to fetch ticket #{id}: {err}")))?;

        Self::ticket_response(response, id).await
    }

    async fn save_ticket(&self, ticket: &Ticket, author: &str, comment: &str) -> AppResult<Ticket> {
        let base_url = self.base_url()?;
        let body = TicketUpdateRequest {
            author,
            comment,
            status: &ticket.status,
            resolution: ticket.resolution.as_deref(),
            remaining_time: ticket.remaining_time.as_deref(),
        };

        let response = self
            .authorize(self.http.put(Self::ticket_endpoint(base_url, ticket.id)))
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                AppError::IssueTracker(format!("failed to save ticket #{}: {err}", ticket.id))
            })?;

        Self::ticket_response(response, ticket.id).await
    }
}

#[async_trait]
impl NotificationService for HttpTracker {
    async fn ticket_changed(&self, ticket: &Ticket) -> AppResult<()> {
        let base_url = self.base_url()?;
        let url = format!("{}/notify", Self::ticket_endpoint(base_url, ticket.id));
        let body = NotifyRequest {
            new_ticket: false,
            modified_at: ticket.changed_at,
        };

        let response = self
            .authorize(self.http.post(url))
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                AppError::Notification(format!("failed to notify for ticket #{}: {err}", ticket.id))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Notification(format!(
                "tracker responded with {status} to notification for ticket #{}",
                ticket.id
            )));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct TicketUpdateRequest<'a> {
    author: &'a str,
    comment: &'a str,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining_time: Option<&'a str>,
}

#[derive(Serialize)]
struct NotifyRequest {
    new_ticket: bool,
    modified_at: Option<DateTime<Utc>>,
}
