//! Support desk the administrator moderates alongside verifications.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::professionals::domain::ProfessionalId;
use super::professionals::repository::RepositoryError;
use super::professionals::router::{admin_required_response, authorized_admin};

/// Identifier wrapper for support tickets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    Resolved,
}

impl TicketStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Resolved => "resolved",
        }
    }
}

/// A support request, optionally tied to a professional account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub ticket_id: TicketId,
    pub professional_id: Option<ProfessionalId>,
    pub subject: String,
    pub message: String,
    pub status: TicketStatus,
    pub opened_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Storage abstraction for tickets; shares the marketplace repository error
/// taxonomy.
pub trait TicketRepository: Send + Sync {
    fn insert(&self, ticket: SupportTicket) -> Result<SupportTicket, RepositoryError>;
    fn update(&self, ticket: SupportTicket) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &TicketId) -> Result<Option<SupportTicket>, RepositoryError>;
    fn open(&self) -> Result<Vec<SupportTicket>, RepositoryError>;
}

static TICKET_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_ticket_id() -> TicketId {
    let id = TICKET_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TicketId(format!("tick-{id:06}"))
}

/// Error raised by the support desk.
#[derive(Debug, thiserror::Error)]
pub enum SupportError {
    #[error("ticket subject is required")]
    EmptySubject,
    #[error("ticket is already resolved")]
    AlreadyResolved,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Ticket lifecycle service.
pub struct SupportDesk<T> {
    tickets: Arc<T>,
}

impl<T> SupportDesk<T>
where
    T: TicketRepository + 'static,
{
    pub fn new(tickets: Arc<T>) -> Self {
        Self { tickets }
    }

    pub fn open(
        &self,
        professional_id: Option<ProfessionalId>,
        subject: &str,
        message: &str,
        at: DateTime<Utc>,
    ) -> Result<SupportTicket, SupportError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(SupportError::EmptySubject);
        }

        let ticket = SupportTicket {
            ticket_id: next_ticket_id(),
            professional_id,
            subject: subject.to_string(),
            message: message.trim().to_string(),
            status: TicketStatus::Open,
            opened_at: at,
            resolved_at: None,
        };
        let stored = self.tickets.insert(ticket)?;
        Ok(stored)
    }

    pub fn resolve(&self, id: &TicketId, at: DateTime<Utc>) -> Result<SupportTicket, SupportError> {
        let mut ticket = self.tickets.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        if ticket.status == TicketStatus::Resolved {
            return Err(SupportError::AlreadyResolved);
        }

        ticket.status = TicketStatus::Resolved;
        ticket.resolved_at = Some(at);
        self.tickets.update(ticket.clone())?;
        Ok(ticket)
    }

    pub fn backlog(&self) -> Result<Vec<SupportTicket>, SupportError> {
        let mut open = self.tickets.open()?;
        open.sort_by(|a, b| a.opened_at.cmp(&b.opened_at));
        Ok(open)
    }
}

/// Router builder for the support surface. Opening a ticket is public;
/// listing and resolving are admin operations.
pub fn support_router<T>(desk: Arc<SupportDesk<T>>, admin_token: &str) -> Router
where
    T: TicketRepository + 'static,
{
    let state = SupportRoutes {
        desk,
        admin_token: Arc::from(admin_token),
    };

    Router::new()
        .route(
            "/api/v1/support/tickets",
            post(open_handler::<T>).get(backlog_handler::<T>),
        )
        .route(
            "/api/v1/support/tickets/:ticket_id/resolve",
            post(resolve_handler::<T>),
        )
        .with_state(state)
}

pub struct SupportRoutes<T> {
    desk: Arc<SupportDesk<T>>,
    admin_token: Arc<str>,
}

impl<T> Clone for SupportRoutes<T> {
    fn clone(&self) -> Self {
        Self {
            desk: self.desk.clone(),
            admin_token: self.admin_token.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenTicketRequest {
    #[serde(default)]
    pub(crate) professional_id: Option<String>,
    pub(crate) subject: String,
    pub(crate) message: String,
}

fn error_response(error: SupportError) -> Response {
    let status = match &error {
        SupportError::EmptySubject => StatusCode::UNPROCESSABLE_ENTITY,
        SupportError::AlreadyResolved => StatusCode::CONFLICT,
        SupportError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        SupportError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn open_handler<T>(
    State(routes): State<SupportRoutes<T>>,
    axum::Json(request): axum::Json<OpenTicketRequest>,
) -> Response
where
    T: TicketRepository + 'static,
{
    let professional_id = request.professional_id.map(ProfessionalId);
    match routes.desk.open(
        professional_id,
        &request.subject,
        &request.message,
        Utc::now(),
    ) {
        Ok(ticket) => (StatusCode::ACCEPTED, axum::Json(ticket)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn backlog_handler<T>(
    State(routes): State<SupportRoutes<T>>,
    headers: HeaderMap,
) -> Response
where
    T: TicketRepository + 'static,
{
    if !authorized_admin(&headers, &routes.admin_token) {
        return admin_required_response();
    }

    match routes.desk.backlog() {
        Ok(tickets) => (StatusCode::OK, axum::Json(tickets)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn resolve_handler<T>(
    State(routes): State<SupportRoutes<T>>,
    Path(ticket_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    T: TicketRepository + 'static,
{
    if !authorized_admin(&headers, &routes.admin_token) {
        return admin_required_response();
    }

    let id = TicketId(ticket_id);
    match routes.desk.resolve(&id, Utc::now()) {
        Ok(ticket) => (StatusCode::OK, axum::Json(ticket)).into_response(),
        Err(error) => error_response(error),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MemoryTickets {
        records: Mutex<HashMap<TicketId, SupportTicket>>,
    }

    impl TicketRepository for MemoryTickets {
        fn insert(&self, ticket: SupportTicket) -> Result<SupportTicket, RepositoryError> {
            let mut guard = self.records.lock().expect("ticket mutex poisoned");
            guard.insert(ticket.ticket_id.clone(), ticket.clone());
            Ok(ticket)
        }

        fn update(&self, ticket: SupportTicket) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("ticket mutex poisoned");
            guard.insert(ticket.ticket_id.clone(), ticket);
            Ok(())
        }

        fn fetch(&self, id: &TicketId) -> Result<Option<SupportTicket>, RepositoryError> {
            let guard = self.records.lock().expect("ticket mutex poisoned");
            Ok(guard.get(id).cloned())
        }

        fn open(&self) -> Result<Vec<SupportTicket>, RepositoryError> {
            let guard = self.records.lock().expect("ticket mutex poisoned");
            Ok(guard
                .values()
                .filter(|ticket| ticket.status == TicketStatus::Open)
                .cloned()
                .collect())
        }
    }

    fn timestamp(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_770_000_000 + seconds, 0).expect("valid timestamp")
    }

    fn desk() -> SupportDesk<MemoryTickets> {
        SupportDesk::new(Arc::new(MemoryTickets::default()))
    }

    #[test]
    fn blank_subjects_are_rejected() {
        let desk = desk();
        let error = desk
            .open(None, "   ", "help", timestamp(0))
            .expect_err("blank subject refused");
        assert!(matches!(error, SupportError::EmptySubject));
    }

    #[test]
    fn resolving_twice_fails() {
        let desk = desk();
        let ticket = desk
            .open(None, "billing question", "charged twice?", timestamp(0))
            .expect("ticket opened");

        let resolved = desk
            .resolve(&ticket.ticket_id, timestamp(60))
            .expect("first resolve succeeds");
        assert_eq!(resolved.status, TicketStatus::Resolved);
        assert!(resolved.resolved_at.is_some());

        let error = desk
            .resolve(&ticket.ticket_id, timestamp(120))
            .expect_err("second resolve refused");
        assert!(matches!(error, SupportError::AlreadyResolved));
    }

    #[test]
    fn backlog_lists_open_tickets_oldest_first() {
        let desk = desk();
        desk.open(None, "second", "b", timestamp(60))
            .expect("ticket opened");
        desk.open(None, "first", "a", timestamp(0))
            .expect("ticket opened");
        let resolved = desk
            .open(None, "third", "c", timestamp(120))
            .expect("ticket opened");
        desk.resolve(&resolved.ticket_id, timestamp(180))
            .expect("resolved");

        let backlog = desk.backlog().expect("backlog listed");
        let subjects: Vec<&str> = backlog
            .iter()
            .map(|ticket| ticket.subject.as_str())
            .collect();
        assert_eq!(subjects, vec!["first", "second"]);
    }
}
