//! Post-commit notifications.
//!
//! Actions hand a [`Notification`] to a [`Notifier`] from their
//! `after_execute` hook, so listeners only ever hear about work that has
//! been committed.

use actionforge_common::{PostId, UserId};
use serde::Serialize;

/// Something that happened and was committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    UserCreated {
        user_id: UserId,
        name: String,
    },
    PostCreated {
        user_id: UserId,
        post_id: PostId,
        title: String,
    },
}

/// Delivers notifications to a callback.
pub struct Notifier {
    callback: Box<dyn Fn(&Notification) + Send + Sync>,
}

impl Notifier {
    /// Create a new notifier from the given callback.
    pub fn new(callback: impl Fn(&Notification) + Send + Sync + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Create a no-op notifier that discards everything.
    pub fn noop() -> Self {
        Self {
            callback: Box::new(|_| {}),
        }
    }

    /// Create a notifier that emits every notification as a `tracing` event.
    pub fn log() -> Self {
        Self::new(|notification| match notification {
            Notification::UserCreated { user_id, name } => {
                tracing::info!(%user_id, name = %name, "User created");
            }
            Notification::PostCreated {
                user_id,
                post_id,
                title,
            } => {
                tracing::info!(%user_id, %post_id, title = %title, "Post created");
            }
        })
    }

    /// Deliver a notification.
    pub fn send(&self, notification: &Notification) {
        (self.callback)(notification);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::noop()
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_callback_receives_notifications() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let notifier = Notifier::new(move |n| seen_clone.lock().unwrap().push(n.clone()));

        let event = Notification::UserCreated {
            user_id: UserId::new(),
            name: "foo".into(),
        };
        notifier.send(&event);

        assert_eq!(*seen.lock().unwrap(), vec![event]);
    }

    #[test]
    fn test_noop_and_log_do_not_panic() {
        let event = Notification::PostCreated {
            user_id: UserId::new(),
            post_id: PostId::new(),
            title: "hello".into(),
        };
        Notifier::noop().send(&event);
        Notifier::log().send(&event);
    }

    #[test]
    fn test_serializes_with_event_tag() {
        let user_id = UserId::new();
        let json = serde_json::to_value(Notification::UserCreated {
            user_id,
            name: "foo".into(),
        })
        .unwrap();
        assert_eq!(json["event"], "user_created");
        assert_eq!(json["user_id"], user_id.to_string());
    }
}
