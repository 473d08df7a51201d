use std::sync::Arc;

use actionforge_action::Action;
use actionforge_common::{Result, UserId};
use actionforge_db::{
    models::Post,
    queries::{posts, users},
    TxScope,
};
use serde::Deserialize;

use crate::notify::{Notification, Notifier};

/// Create a post for a user and bump the user's `posts_count`.
///
/// Both writes happen in one transaction. If the post cannot be created
/// (for instance because the title is missing) the counter increment is
/// rolled back with it.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePost {
    pub user_id: UserId,

    #[serde(default)]
    pub post_title: Option<String>,

    #[serde(skip)]
    notifier: Option<Arc<Notifier>>,

    #[serde(skip)]
    post: Option<Post>,
}

impl CreatePost {
    pub fn new(user_id: UserId, post_title: Option<String>) -> Self {
        Self {
            user_id,
            post_title,
            notifier: None,
            post: None,
        }
    }

    /// Builder: notify `notifier` once the post is committed.
    pub fn with_notifier(mut self, notifier: Arc<Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// The created post, once executed.
    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub fn into_post(self) -> Option<Post> {
        self.post
    }
}

impl Action for CreatePost {
    fn name(&self) -> &'static str {
        "CreatePost"
    }

    fn execute(&mut self, tx: &TxScope<'_>) -> Result<()> {
        let user = users::find_user(tx, self.user_id)?;
        users::update_posts_count(tx, user.id, user.posts_count + 1)?;

        self.post = Some(posts::create_post(
            tx,
            user.id,
            self.post_title.as_deref(),
        )?);
        Ok(())
    }

    fn after_execute(&mut self) -> Result<()> {
        if let (Some(notifier), Some(post)) = (&self.notifier, &self.post) {
            notifier.send(&Notification::PostCreated {
                user_id: post.user_id,
                post_id: post.id,
                title: post.title.clone(),
            });
        }
        Ok(())
    }
}
