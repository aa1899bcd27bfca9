//! Collaborators shared by every list view

use crate::core::notify::{Notification, Notifier, TracingNotifier};
use crate::core::session::{AccessPolicy, Session};
use std::sync::Arc;

/// Session, notifier and access policy injected into each view
#[derive(Clone)]
pub struct DashboardContext {
    session: Session,
    notifier: Arc<dyn Notifier>,
    access: AccessPolicy,
}

impl DashboardContext {
    pub fn new(session: Session, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            session,
            notifier,
            access: AccessPolicy::default(),
        }
    }

    /// Anonymous session that only logs notifications
    pub fn anonymous() -> Self {
        Self::new(Session::Anonymous, Arc::new(TracingNotifier))
    }

    pub fn with_access(mut self, access: AccessPolicy) -> Self {
        self.access = access;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Replace the session, e.g. after sign-in or sign-out
    pub fn set_session(&mut self, session: Session) {
        self.session = session;
    }

    pub fn access(&self) -> &AccessPolicy {
        &self.access
    }

    pub fn is_allowed(&self) -> bool {
        self.access.check(&self.session)
    }

    pub fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }
}

impl std::fmt::Debug for DashboardContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardContext")
            .field("session", &self.session)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}
