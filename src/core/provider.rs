use crate::core::endpoint::{Changes, Endpoint};
use crate::error::Error;
use async_trait::async_trait;

/// The surface the webhook transport calls into: a full current-state
/// snapshot and a best-effort application of a desired-state diff.
#[async_trait]
pub trait DNSProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Every record in every in-scope zone, in canonical form.
    async fn records(&self) -> Result<Vec<Endpoint>, Error>;

    /// Plan, group and apply the diff. Fails only when the view of remote
    /// state cannot be established; individual change failures are logged
    /// and swallowed.
    async fn apply_changes(&self, changes: &Changes) -> Result<(), Error>;
}
