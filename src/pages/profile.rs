use std::sync::Arc;

use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::feed::Feed;
use crate::models::{Course, User};

/// A user's profile: who they are, what they posted, what they're enrolled
/// in. Karma is displayed exactly as last fetched; the client never
/// recomputes it from posts or likes.
pub struct ProfilePage {
    api: Arc<ApiClient>,
    user_id: String,
    pub user: Option<User>,
    pub feed: Feed,
    pub courses: Vec<Course>,
}

impl ProfilePage {
    pub fn new(api: Arc<ApiClient>, user_id: impl Into<String>) -> Self {
        Self {
            api,
            user_id: user_id.into(),
            user: None,
            feed: Feed::default(),
            courses: Vec::new(),
        }
    }

    /// All three reads are independent; fetch them together. Each result is
    /// applied on its own so a partial failure keeps the rest of the page.
    pub async fn load(&mut self) -> ApiResult<()> {
        let (user, posts, courses) = tokio::join!(
            self.api.get_user(&self.user_id),
            self.api.get_user_posts(&self.user_id),
            self.api.get_user_courses(&self.user_id),
        );

        let mut first_err = None;
        match user {
            Ok(user) => self.user = Some(user),
            Err(err) => first_err = Some(err),
        }
        match posts {
            Ok(posts) => self.feed = Feed::new(posts),
            Err(err) => first_err = first_err.or(Some(err)),
        }
        match courses {
            Ok(courses) => self.courses = courses,
            Err(err) => first_err = first_err.or(Some(err)),
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Delete one of the profile owner's posts (shown only for the viewer's
    /// own profile).
    pub async fn delete_post(&mut self, post_id: &str) -> bool {
        match self.api.delete_post(post_id).await {
            Ok(()) => self.feed.remove(post_id),
            Err(_) => false,
        }
    }
}
