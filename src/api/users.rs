use serde::Deserialize;

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::{Course, Post, User};

#[derive(Deserialize)]
struct PostsEnvelope {
    posts: Vec<Post>,
}

#[derive(Deserialize)]
struct CoursesEnvelope {
    courses: Vec<Course>,
}

#[derive(Deserialize)]
struct KarmaEnvelope {
    karma: i64,
}

impl ApiClient {
    /// GET /api/users/{id}
    pub async fn get_user(&self, user_id: &str) -> ApiResult<User> {
        let req = self.authed(self.get(&format!("/api/users/{user_id}")));
        self.report("Failed to fetch user profile", self.send(req).await)
    }

    /// GET /api/users/me
    pub async fn get_current_user(&self) -> ApiResult<User> {
        let req = self.authed(self.get("/api/users/me"));
        self.report("Failed to fetch your profile", self.send(req).await)
    }

    /// GET /api/users/{id}/posts
    pub async fn get_user_posts(&self, user_id: &str) -> ApiResult<Vec<Post>> {
        let req = self.authed(self.get(&format!("/api/users/{user_id}/posts")));
        let envelope: PostsEnvelope =
            self.report("Failed to fetch posts", self.send(req).await)?;
        Ok(envelope.posts)
    }

    /// GET /api/users/{id}/courses
    pub async fn get_user_courses(&self, user_id: &str) -> ApiResult<Vec<Course>> {
        let req = self.authed(self.get(&format!("/api/users/{user_id}/courses")));
        let envelope: CoursesEnvelope =
            self.report("Failed to fetch courses", self.send(req).await)?;
        Ok(envelope.courses)
    }

    /// GET /api/users/{id}/karma. Karma is computed and owned by the
    /// backend; the client only ever displays the last fetched value.
    pub async fn get_user_karma(&self, user_id: &str) -> ApiResult<i64> {
        let req = self.authed(self.get(&format!("/api/users/{user_id}/karma")));
        let envelope: KarmaEnvelope =
            self.report("Failed to fetch karma", self.send(req).await)?;
        Ok(envelope.karma)
    }
}
