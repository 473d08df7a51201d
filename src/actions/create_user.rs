use std::sync::Arc;

use actionforge_action::Action;
use actionforge_common::{Result, Validator};
use actionforge_db::{models::User, queries::users, TxScope};
use serde::Deserialize;

use crate::notify::{Notification, Notifier};

const MAX_NAME_LENGTH: usize = 100;

/// Create a user.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUser {
    pub name: Option<String>,

    #[serde(skip)]
    notifier: Option<Arc<Notifier>>,

    #[serde(skip)]
    user: Option<User>,
}

impl CreateUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Builder: notify `notifier` once the user is committed.
    pub fn with_notifier(mut self, notifier: Arc<Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// The created user, once executed.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

impl Action for CreateUser {
    fn name(&self) -> &'static str {
        "CreateUser"
    }

    fn validate(&self, v: &mut Validator<'_>) {
        v.presence("name", &self.name)
            .max_length("name", self.name.as_deref(), MAX_NAME_LENGTH);
    }

    fn execute(&mut self, tx: &TxScope<'_>) -> Result<()> {
        let name = self.name.as_deref().unwrap_or_default().trim();
        self.user = Some(users::create_user(tx, name)?);
        Ok(())
    }

    fn after_execute(&mut self) -> Result<()> {
        if let (Some(notifier), Some(user)) = (&self.notifier, &self.user) {
            notifier.send(&Notification::UserCreated {
                user_id: user.id,
                name: user.name.clone(),
            });
        }
        Ok(())
    }
}
