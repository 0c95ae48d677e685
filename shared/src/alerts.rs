use crate::types::{CongestionLevel, Junction};
use tracing::info;

/// Transient on-screen warning for one junction at High congestion. Derived
/// state: never persisted, rebuilt from snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: String,
    pub message: String,
}

/// The set of currently raised alerts, in insertion order, oldest first;
/// the render side keeps that order for the stack.
///
/// An alert's presence is a function of the latest snapshot's congestion for
/// its id, with one exception: a manual dismissal holds until the next
/// snapshot re-asserts High.
#[derive(Debug, Default)]
pub struct AlertBoard {
    alerts: Vec<Alert>,
}

impl AlertBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Folds one snapshot into the board: at High congestion the junction
    /// gets exactly one alert (identity by id, never duplicated), at
    /// anything else its alert is withdrawn.
    pub fn reconcile(&mut self, snapshot: &Junction) {
        let existing = self.alerts.iter().position(|alert| alert.id == snapshot.id);

        if snapshot.congestion == CongestionLevel::High {
            if existing.is_none() {
                info!(junction = %snapshot.id, "raising high-congestion alert");
                self.alerts.push(Alert {
                    id: snapshot.id.clone(),
                    message: format!("High congestion at {}", snapshot.name),
                });
            }
        } else if let Some(index) = existing {
            self.alerts.remove(index);
        }
    }

    /// Drops the alert for `id`, leaving every other alert untouched. Not
    /// sticky: a later reconcile that still sees High re-raises it.
    pub fn dismiss(&mut self, id: &str) {
        if let Some(index) = self.alerts.iter().position(|alert| alert.id == id) {
            self.alerts.remove(index);
        }
    }
}
