//! Concrete actions for the users/posts domain.
//!
//! - [`CreateUser`] -- create a user
//! - [`CreatePost`] -- bump a user's post counter and create the post, atomically
//! - [`ImportPosts`] -- create several posts for one user as a single unit

mod create_post;
mod create_user;
mod import_posts;

pub use create_post::CreatePost;
pub use create_user::CreateUser;
pub use import_posts::ImportPosts;
