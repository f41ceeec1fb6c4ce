//! Custom actions for the Staff actor.

use crate::model::StaffStatus;

#[derive(Debug, Clone)]
pub enum StaffAction {
    /// Shift start (`Active`) or shift stop (`Inactive`). Idempotent.
    SetStatus(StaffStatus),
}
