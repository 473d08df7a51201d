use std::sync::Arc;

use actionforge_action::{Action, Command};
use actionforge_common::{Result, UserId, Validator};
use actionforge_db::{models::Post, TxScope};
use serde::Deserialize;

use super::CreatePost;
use crate::notify::{Notification, Notifier};

const MAX_TITLES: usize = 100;

/// Create one post per title for a single user, all or nothing.
///
/// Each title runs as a nested [`CreatePost`]; one bad title rolls back
/// every post and counter increment in the import.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportPosts {
    pub user_id: UserId,

    #[serde(default)]
    pub titles: Vec<String>,

    #[serde(skip)]
    notifier: Option<Arc<Notifier>>,

    #[serde(skip)]
    posts: Vec<Post>,
}

impl ImportPosts {
    pub fn new(user_id: UserId, titles: Vec<String>) -> Self {
        Self {
            user_id,
            titles,
            notifier: None,
            posts: Vec::new(),
        }
    }

    /// Builder: notify `notifier` about every post once the import commits.
    pub fn with_notifier(mut self, notifier: Arc<Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Posts created by the import, once executed.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }
}

impl Action for ImportPosts {
    fn name(&self) -> &'static str {
        "ImportPosts"
    }

    fn validate(&self, v: &mut Validator<'_>) {
        v.presence("titles", &self.titles).custom(
            "titles",
            self.titles.len() <= MAX_TITLES,
            format!("is too long (maximum is {MAX_TITLES} titles)"),
        );
    }

    fn execute(&mut self, tx: &TxScope<'_>) -> Result<()> {
        let mut created = Vec::with_capacity(self.titles.len());

        for title in &self.titles {
            // No notifier on the nested post: it would fire before our commit.
            let mut cmd = Command::new(CreatePost::new(self.user_id, Some(title.clone())));
            cmd.save_within(tx)?;
            created.extend(cmd.into_inner().into_post());
        }

        self.posts = created;
        Ok(())
    }

    fn after_execute(&mut self) -> Result<()> {
        if let Some(notifier) = &self.notifier {
            for post in &self.posts {
                notifier.send(&Notification::PostCreated {
                    user_id: post.user_id,
                    post_id: post.id,
                    title: post.title.clone(),
                });
            }
        }
        Ok(())
    }
}
