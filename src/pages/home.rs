use std::sync::Arc;

use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::feed::Feed;
use crate::pages::InFlight;

/// The home page: posts from every enrolled course, with the viewer's liked
/// set folded in.
pub struct HomePage {
    api: Arc<ApiClient>,
    pub feed: Feed,
    in_flight: InFlight,
}

impl HomePage {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            feed: Feed::default(),
            in_flight: InFlight::default(),
        }
    }

    /// Fetch the feed and the liked set together; they are independent.
    /// The liked set is best-effort and degrades to empty.
    pub async fn load(&mut self) -> ApiResult<()> {
        let (posts, liked) = tokio::join!(self.api.get_home_posts(), self.api.get_liked_posts());
        self.feed = Feed::new(posts?);
        self.feed.mark_liked(&liked);
        Ok(())
    }

    /// Create a post and prepend it on success. Returns false if the
    /// request failed or one is already outstanding; the feed is untouched
    /// either way.
    pub async fn submit_post(
        &mut self,
        course_id: &str,
        content: &str,
        image: Option<&str>,
    ) -> bool {
        if !self.in_flight.try_begin("post") {
            return false;
        }
        let result = self.api.create_post(course_id, content, image).await;
        self.in_flight.finish("post");
        match result {
            Ok(post) => {
                self.feed.prepend(post);
                true
            }
            Err(_) => false,
        }
    }

    pub async fn delete_post(&mut self, post_id: &str) -> bool {
        match self.api.delete_post(post_id).await {
            Ok(()) => self.feed.remove(post_id),
            Err(_) => false,
        }
    }

    /// Toggle a like; the server response overwrites the local count/flag.
    pub async fn toggle_like(&mut self, post_id: &str) -> bool {
        let key = format!("like:{post_id}");
        if !self.in_flight.try_begin(&key) {
            return false;
        }
        let result = self.api.like_post(post_id).await;
        self.in_flight.finish(&key);
        match result {
            Ok(like) => self.feed.apply_like(&like),
            Err(_) => false,
        }
    }

    pub async fn add_comment(&mut self, post_id: &str, content: &str) -> bool {
        match self.api.create_comment(post_id, content).await {
            Ok(comment) => self.feed.add_comment(post_id, comment),
            Err(_) => false,
        }
    }

    pub async fn delete_comment(&mut self, post_id: &str, comment_id: &str) -> bool {
        match self.api.delete_comment(comment_id).await {
            Ok(()) => self.feed.remove_comment(post_id, comment_id),
            Err(_) => false,
        }
    }
}
