//! Post, comment and like lifecycle. Like responses carry the authoritative
//! count and viewer flag; callers overwrite local state with them rather
//! than incrementing counters.

use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::{Comment, LikeResult, Post};

#[derive(Deserialize)]
struct PostsEnvelope {
    posts: Vec<Post>,
}

#[derive(Deserialize)]
struct PostEnvelope {
    post: Post,
}

#[derive(Deserialize)]
struct LikeEnvelope {
    post: LikeResult,
}

#[derive(Deserialize)]
struct CommentEnvelope {
    comment: Comment,
}

#[derive(Deserialize)]
struct LikedPostsEnvelope {
    liked_posts: Vec<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePostBody<'a> {
    course_id: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeletePostBody<'a> {
    post_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCommentBody<'a> {
    post_id: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteCommentBody<'a> {
    comment_id: &'a str,
}

impl ApiClient {
    /// GET /api/post/home — posts from every course the user is enrolled in,
    /// newest first.
    pub async fn get_home_posts(&self) -> ApiResult<Vec<Post>> {
        let req = self.authed(self.get("/api/post/home"));
        let envelope: PostsEnvelope =
            self.report("Failed to fetch posts", self.send(req).await)?;
        Ok(envelope.posts)
    }

    /// GET /api/post/my — posts authored by the current user.
    pub async fn get_my_posts(&self) -> ApiResult<Vec<Post>> {
        let req = self.authed(self.get("/api/post/my"));
        let envelope: PostsEnvelope =
            self.report("Failed to fetch your posts", self.send(req).await)?;
        Ok(envelope.posts)
    }

    /// GET /api/courses/{id}/posts
    pub async fn get_course_posts(&self, course_id: &str) -> ApiResult<Vec<Post>> {
        let req = self.authed(self.get(&format!("/api/courses/{course_id}/posts")));
        let envelope: PostsEnvelope =
            self.report("Failed to fetch posts", self.send(req).await)?;
        Ok(envelope.posts)
    }

    /// POST /api/post
    pub async fn create_post(
        &self,
        course_id: &str,
        content: &str,
        image: Option<&str>,
    ) -> ApiResult<Post> {
        let body = CreatePostBody {
            course_id,
            content,
            image,
        };
        let req = self.authed(self.post("/api/post").json(&body));
        let envelope: PostEnvelope =
            self.report("Failed to create post", self.send(req).await)?;
        Ok(envelope.post)
    }

    /// DELETE /api/post — the post id travels in the JSON body.
    pub async fn delete_post(&self, post_id: &str) -> ApiResult<()> {
        let body = DeletePostBody { post_id };
        let req = self.authed(self.delete("/api/post").json(&body));
        let _: serde_json::Value = self.report("Failed to delete post", self.send(req).await)?;
        Ok(())
    }

    /// POST /api/post/{id}/like — toggles the viewer's like and returns the
    /// authoritative count/flag.
    pub async fn like_post(&self, post_id: &str) -> ApiResult<LikeResult> {
        let req = self.authed(self.post(&format!("/api/post/{post_id}/like")));
        let envelope: LikeEnvelope =
            self.report("Failed to update like", self.send(req).await)?;
        Ok(envelope.post)
    }

    /// GET /api/posts/liked. Best-effort: a failure degrades to an empty
    /// set so feeds still render.
    pub async fn get_liked_posts(&self) -> Vec<String> {
        let req = self.authed(self.get("/api/posts/liked"));
        match self.send::<LikedPostsEnvelope>(req).await {
            Ok(envelope) => envelope.liked_posts,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to fetch liked posts");
                Vec::new()
            }
        }
    }

    /// POST /api/upload-image — multipart form; returns the stored image's
    /// URL for embedding in a post.
    pub async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> ApiResult<String> {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime.essence_str())?;
        let form = reqwest::multipart::Form::new().part("image", part);
        let req = self.authed(self.post("/api/upload-image").multipart(form));
        let resp: UploadResponse =
            self.report("Failed to upload image", self.send(req).await)?;
        Ok(resp.url)
    }

    /// POST /api/comment
    pub async fn create_comment(&self, post_id: &str, content: &str) -> ApiResult<Comment> {
        let body = CreateCommentBody { post_id, content };
        let req = self.authed(self.post("/api/comment").json(&body));
        let envelope: CommentEnvelope =
            self.report("Failed to add comment", self.send(req).await)?;
        Ok(envelope.comment)
    }

    /// DELETE /api/comment — the comment id travels in the JSON body.
    pub async fn delete_comment(&self, comment_id: &str) -> ApiResult<()> {
        let body = DeleteCommentBody { comment_id };
        let req = self.authed(self.delete("/api/comment").json(&body));
        let _: serde_json::Value =
            self.report("Failed to delete comment", self.send(req).await)?;
        Ok(())
    }
}
