//! Stock notification dispatchers and activity publishers
//!
//! - [`TracingNotifier`] logs every event; the default when no delivery
//!   pipeline is wired in
//! - [`RecordingNotifier`] keeps every event in memory for inspection
//! - [`Fanout`] hands each event to two sinks, e.g. log and record

use kinship_domain::traits::{ActivityPublisher, NotificationDispatcher, NotifyError};
use kinship_domain::{Activity, Notification};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

/// Logs notifications and activities through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationDispatcher for TracingNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            event_id = %notification.id,
            kind = notification.kind.as_str(),
            from = %notification.from.id,
            to = %notification.to.id,
            relationship_id = %notification.subject.id,
            "{}",
            notification.message()
        );
        Ok(())
    }
}

impl ActivityPublisher for TracingNotifier {
    fn publish(&self, activity: &Activity) -> Result<(), NotifyError> {
        info!(
            event_id = %activity.id,
            kind = activity.kind.as_str(),
            actor = %activity.actor.id,
            container = %activity.container.id,
            relationship_id = %activity.subject.id,
            "activity published"
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Recorded {
    notifications: Vec<Notification>,
    activities: Vec<Activity>,
}

/// Records events in memory
///
/// Clones share the same buffer, so a caller can hand one clone to the
/// service and read events back through another.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingNotifier {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        // A panic while holding the lock cannot leave the Vecs inconsistent
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of sent notifications, in send order
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    /// Snapshot of published activities, in publish order
    pub fn activities(&self) -> Vec<Activity> {
        self.lock().activities.clone()
    }

    /// Total events recorded (notifications plus activities)
    pub fn event_count(&self) -> usize {
        let recorded = self.lock();
        recorded.notifications.len() + recorded.activities.len()
    }

    /// Drop everything recorded so far
    pub fn clear(&self) {
        let mut recorded = self.lock();
        recorded.notifications.clear();
        recorded.activities.clear();
    }
}

impl NotificationDispatcher for RecordingNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.lock().notifications.push(notification.clone());
        Ok(())
    }
}

impl ActivityPublisher for RecordingNotifier {
    fn publish(&self, activity: &Activity) -> Result<(), NotifyError> {
        self.lock().activities.push(activity.clone());
        Ok(())
    }
}

/// Delivers every event to two sinks in turn
///
/// Both sinks always see the event; if either fails, the first error is
/// returned after both have run.
#[derive(Debug, Clone, Default)]
pub struct Fanout<P, S> {
    /// Receives each event first
    pub primary: P,

    /// Receives each event second
    pub secondary: S,
}

impl<P, S> Fanout<P, S> {
    /// Pair two sinks
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P, S> NotificationDispatcher for Fanout<P, S>
where
    P: NotificationDispatcher,
    S: NotificationDispatcher,
{
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let first = self.primary.send(notification);
        let second = self.secondary.send(notification);
        first.and(second)
    }
}

impl<P, S> ActivityPublisher for Fanout<P, S>
where
    P: ActivityPublisher,
    S: ActivityPublisher,
{
    fn publish(&self, activity: &Activity) -> Result<(), NotifyError> {
        let first = self.primary.publish(activity);
        let second = self.secondary.publish(activity);
        first.and(second)
    }
}
