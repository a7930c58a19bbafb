// Request dispatcher.
//
// Every use case is a request type tagged with a `RequestKind`. Handlers are
// registered once at startup; `DispatcherBuilder::build` refuses to produce a
// dispatcher unless every kind has exactly one handler, so a missing
// registration stops the process instead of failing individual requests.

use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::services::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Login,
    RefreshSession,
    UserMenus,
    AllUsers,
    DeactivateUser,
    UserLevelLookup,
    DesignationLookup,
    ReportingLevelLookup,
    ExistingUserDetails,
    UserTranslanderLookup,
    InsertUser,
    UpdateUser,
}

impl RequestKind {
    pub const ALL: [RequestKind; 12] = [
        RequestKind::Login,
        RequestKind::RefreshSession,
        RequestKind::UserMenus,
        RequestKind::AllUsers,
        RequestKind::DeactivateUser,
        RequestKind::UserLevelLookup,
        RequestKind::DesignationLookup,
        RequestKind::ReportingLevelLookup,
        RequestKind::ExistingUserDetails,
        RequestKind::UserTranslanderLookup,
        RequestKind::InsertUser,
        RequestKind::UpdateUser,
    ];
}

/// A use case's input. The type alone decides which handler runs.
pub trait Request: Send + 'static {
    type Output: Send + 'static;
    const KIND: RequestKind;
}

/// Stateless handler for one request type
#[async_trait]
pub trait Handler<R: Request>: Send + Sync + 'static {
    async fn handle(&self, request: R) -> Result<R::Output, ServiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("No handler registered for {0:?}")]
    NoHandlerRegistered(RequestKind),

    #[error("More than one handler registered for {0:?}")]
    DuplicateHandler(RequestKind),
}

// Each entry holds an `Arc<dyn Handler<R>>` for the R whose KIND is the key.
type ErasedHandler = Box<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct DispatcherBuilder {
    handlers: HashMap<RequestKind, ErasedHandler>,
    duplicates: Vec<RequestKind>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<R, H>(mut self, handler: H) -> Self
    where
        R: Request,
        H: Handler<R>,
    {
        let handler: Arc<dyn Handler<R>> = Arc::new(handler);
        if self.handlers.insert(R::KIND, Box::new(handler)).is_some() {
            self.duplicates.push(R::KIND);
        }
        self
    }

    /// Fails unless every `RequestKind` has exactly one handler
    pub fn build(self) -> Result<Dispatcher, DispatchError> {
        if let Some(kind) = self.duplicates.first() {
            return Err(DispatchError::DuplicateHandler(*kind));
        }
        if let Some(kind) = RequestKind::ALL
            .iter()
            .find(|kind| !self.handlers.contains_key(kind))
        {
            return Err(DispatchError::NoHandlerRegistered(*kind));
        }
        Ok(self.finish())
    }

    fn finish(self) -> Dispatcher {
        Dispatcher { handlers: self.handlers }
    }
}

pub struct Dispatcher {
    handlers: HashMap<RequestKind, ErasedHandler>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub async fn send<R: Request>(&self, request: R) -> Result<R::Output, ServiceError> {
        let handler = self.handler::<R>()?;
        debug!(kind = ?R::KIND, "Dispatching request");
        handler.handle(request).await
    }

    fn handler<R: Request>(&self) -> Result<Arc<dyn Handler<R>>, DispatchError> {
        self.handlers
            .get(&R::KIND)
            .and_then(|entry| entry.downcast_ref::<Arc<dyn Handler<R>>>())
            .cloned()
            .ok_or(DispatchError::NoHandlerRegistered(R::KIND))
    }
}
