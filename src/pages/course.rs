use std::sync::Arc;

use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::feed::Feed;
use crate::models::{Course, Identity};
use crate::pages::InFlight;

/// One course's page: info header plus its post feed. Post creation is
/// gated on the viewer's enrollment; the gate is advisory only, the backend
/// decides whether a post is actually accepted.
pub struct CoursePage {
    api: Arc<ApiClient>,
    course_id: String,
    pub course: Option<Course>,
    pub feed: Feed,
    in_flight: InFlight,
}

impl CoursePage {
    pub fn new(api: Arc<ApiClient>, course_id: impl Into<String>) -> Self {
        Self {
            api,
            course_id: course_id.into(),
            course: None,
            feed: Feed::default(),
            in_flight: InFlight::default(),
        }
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    /// Course info and posts are independent; fetch them together. Each
    /// result is applied on its own, so one failing leaves the other's
    /// state intact.
    pub async fn load(&mut self) -> ApiResult<()> {
        let (info, posts) = tokio::join!(
            self.api.get_course_info(&self.course_id),
            self.api.get_course_posts(&self.course_id),
        );
        let mut first_err = None;
        match info {
            Ok(course) => self.course = Some(course),
            Err(err) => first_err = Some(err),
        }
        match posts {
            Ok(posts) => self.feed = Feed::new(posts),
            Err(err) => first_err = first_err.or(Some(err)),
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Whether the post-creation control is shown: the viewer's enrollment
    /// set must contain this course.
    pub fn can_post(&self, identity: Option<&Identity>) -> bool {
        identity.is_some_and(|id| id.is_enrolled(&self.course_id))
    }

    pub async fn submit_post(&mut self, content: &str, image: Option<&str>) -> bool {
        if !self.in_flight.try_begin("post") {
            return false;
        }
        let result = self.api.create_post(&self.course_id, content, image).await;
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

    /// Enroll, then re-fetch course info: the backend owns the enrollment
    /// set and the client never mutates it locally.
    pub async fn join(&mut self) -> bool {
        if !self.in_flight.try_begin("join") {
            return false;
        }
        let result = self.api.join_course(&self.course_id).await;
        self.in_flight.finish("join");
        match result {
            Ok(message) => {
                tracing::info!("{message}");
                if let Ok(course) = self.api.get_course_info(&self.course_id).await {
                    self.course = Some(course);
                }
                true
            }
            Err(_) => false,
        }
    }

    /// Unenroll. The response carries the updated course, so no re-fetch.
    pub async fn leave(&mut self) -> bool {
        if !self.in_flight.try_begin("join") {
            return false;
        }
        let result = self.api.leave_course(&self.course_id).await;
        self.in_flight.finish("join");
        match result {
            Ok(course) => {
                self.course = Some(course);
                true
            }
            Err(_) => false,
        }
    }
}
