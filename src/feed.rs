//! The ordered post list shown on a page, plus the local mutation rules
//! that keep it consistent without refetching: created posts are prepended,
//! deletions remove by id, and like state is always the server's response
//! applied as an overwrite.

use crate::models::{Comment, LikeResult, Post};

#[derive(Default)]
pub struct Feed {
    posts: Vec<Post>,
}

impl Feed {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    fn get_mut(&mut self, post_id: &str) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == post_id)
    }

    /// New posts go to the front; feeds are newest first.
    pub fn prepend(&mut self, post: Post) {
        self.posts.insert(0, post);
    }

    /// Remove the post with the matching id. Every other entry, and their
    /// order, is untouched. Returns false when no entry matched.
    pub fn remove(&mut self, post_id: &str) -> bool {
        match self.posts.iter().position(|p| p.id == post_id) {
            Some(index) => {
                self.posts.remove(index);
                true
            }
            None => false,
        }
    }

    /// Overwrite a post's like count and viewer flag with the server's
    /// response. Unconditional: if two toggles race, the later response
    /// wins. Never derived from a local increment.
    pub fn apply_like(&mut self, like: &LikeResult) -> bool {
        match self.get_mut(&like.id) {
            Some(post) => {
                post.likes = like.likes;
                post.is_liked = like.is_liked;
                true
            }
            None => false,
        }
    }

    /// Attach a comment to its post. Sibling posts are untouched.
    pub fn add_comment(&mut self, post_id: &str, comment: Comment) -> bool {
        match self.get_mut(post_id) {
            Some(post) => {
                post.comments.push(comment);
                true
            }
            None => false,
        }
    }

    /// Detach a comment locally. No cascading side effects are modeled.
    pub fn remove_comment(&mut self, post_id: &str, comment_id: &str) -> bool {
        match self.get_mut(post_id) {
            Some(post) => {
                let before = post.comments.len();
                post.comments.retain(|c| c.id != comment_id);
                post.comments.len() < before
            }
            None => false,
        }
    }

    /// Fold the liked-posts set into the viewer flags. Posts not in the set
    /// keep whatever flag the feed response carried.
    pub fn mark_liked(&mut self, liked_ids: &[String]) {
        for post in &mut self.posts {
            if liked_ids.iter().any(|id| id == &post.id) {
                post.is_liked = true;
            }
        }
    }
}
