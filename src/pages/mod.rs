//! Page controllers.
//!
//! SYSTEM CONTEXT
//! ==============
//! One controller per admin screen. A controller owns clones of the slices
//! it drives and sequences their operations the way the screen does:
//! fetch on mount, refetch after a successful mutation, clear errors on
//! unmount. Rendering is left to whatever front end subscribes to the
//! slices.

pub mod content;
pub mod dashboard;
pub mod ledger;
pub mod login;
pub mod question_groups;
pub mod settings;
pub mod users;

use tracing::debug;
use wire::Record;

use crate::state::slice::{ListQuery, ResourceSlice};

/// Follow-up list after a successful mutation. A failure lands in the list
/// slot and never fails the mutation itself.
pub(crate) async fn refetch<R: Record>(slice: &ResourceSlice<R>, query: ListQuery) {
    if let Err(e) = slice.list(query).await {
        debug!(resource = slice.base_path(), error = %e, "refetch after mutation failed");
    }
}
