use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use auth::Role;

use crate::session::errors::MetricsError;
use crate::session::ports::AuthMetrics;

/// Metrics adapter emitting structured tracing events.
///
/// Keeps monotonic per-role login counters; the counts ride along on each
/// event so log-based dashboards need no extra state.
#[derive(Debug, Default)]
pub struct TracingAuthMetrics {
    member_logins: AtomicU64,
    moderator_logins: AtomicU64,
    admin_logins: AtomicU64,
}

impl TracingAuthMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, role: Role) -> &AtomicU64 {
        match role {
            Role::Member => &self.member_logins,
            Role::Moderator => &self.moderator_logins,
            Role::Admin => &self.admin_logins,
        }
    }

    /// Current login count for a role.
    pub fn logins(&self, role: Role) -> u64 {
        self.counter(role).load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AuthMetrics for TracingAuthMetrics {
    async fn record_login(&self, role: Role) -> Result<(), MetricsError> {
        let total = self.counter(role).fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(metric = "login", role = %role, total, "Login recorded");

        Ok(())
    }
}
