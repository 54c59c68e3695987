//! Minimal stub of the Foodle backend for integration tests. Mirrors the
//! real wire shapes: envelope keys, camelCase fields, numeric ids on some
//! routes, `message`/`err` error bodies.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const TOKEN: &str = "stub-token";

#[derive(Clone)]
pub struct StubState {
    /// (count, viewer liked) for post "p1"; toggled by the like route.
    pub like: Arc<Mutex<(i64, bool)>>,
    /// When set, GET /api/posts/liked returns 500.
    pub liked_fails: Arc<AtomicBool>,
}

pub struct Stub {
    pub base_url: String,
    pub state: StubState,
}

pub async fn spawn() -> Stub {
    let state = StubState {
        like: Arc::new(Mutex::new((1, false))),
        liked_fails: Arc::new(AtomicBool::new(false)),
    };

    let app = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/api/user", get(current_identity))
        .route("/api/users/me", get(me))
        .route("/api/users/{user_id}", get(user_by_id))
        .route("/api/users/{user_id}/posts", get(user_posts))
        .route("/api/users/{user_id}/courses", get(user_courses))
        .route("/api/users/{user_id}/karma", get(user_karma))
        .route("/api/courses/all", get(all_courses))
        .route("/api/courses/my", get(all_courses))
        .route("/api/courses/{course_id}/info", get(course_info))
        .route("/api/courses/{course_id}/posts", get(course_posts))
        .route("/api/enroll", post(enroll))
        .route("/api/unenroll", post(unenroll))
        .route("/api/post/home", get(home_posts))
        .route("/api/post/my", get(my_posts))
        .route("/api/post", post(create_post).delete(delete_post))
        .route("/api/post/{post_id}/like", post(like_post))
        .route("/api/posts/liked", get(liked_posts))
        .route("/api/upload-image", post(upload_image))
        .route("/api/comment", post(create_comment))
        .route("/api/chats", get(chats).post(create_chat))
        .route(
            "/api/chats/{chat_id}/messages",
            get(messages).post(send_message),
        )
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Stub {
        base_url: format!("http://{addr}"),
        state,
    }
}

fn authed(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"msg": "Missing Authorization Header"})),
    )
}

fn post_p1(like: &(i64, bool)) -> Value {
    json!({
        "id": "p1",
        "userId": 1,
        "courseId": "c1",
        "content": "first post",
        "username": "alice",
        "likes": like.0,
        "isLiked": like.1,
        "createdAt": "2024-04-26T15:30:00Z",
        "comments": [{
            "id": "k1",
            "userId": 2,
            "postId": "p1",
            "content": "nice",
            "createdAt": "2024-04-26T15:31:00Z",
            "username": "bob"
        }]
    })
}

fn post_p2() -> Value {
    json!({
        "id": "p2",
        "userId": 2,
        "courseId": "c1",
        "content": "second post",
        "username": "bob",
        "likes": 0,
        "isLiked": false,
        "createdAt": "2024-04-25T09:00:00Z",
        "comments": []
    })
}

fn course_c1() -> Value {
    json!({
        "id": "c1",
        "code": "CS101",
        "name": "Intro to Computer Science",
        "description": "Fundamental concepts of computer science and programming",
        "instructor": "Prof. Anderson",
        "enrolledStudents": [1]
    })
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] == "secret" {
        (
            StatusCode::OK,
            Json(json!({
                "access_token": TOKEN,
                "username": body["username"],
                "id": 1,
                "karma": 3,
                "enrolledCourses": ["c1"]
            })),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"err": "Wrong username or password"})),
        )
    }
}

async fn register(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["username"] == "taken" {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "User already exists"})),
        )
    } else {
        (
            StatusCode::CREATED,
            Json(json!({
                "access_token": TOKEN,
                "message": "Account created successfully"
            })),
        )
    }
}

async fn current_identity(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "username": "alice",
            "id": 1,
            "profilePicture": "/placeholder.svg",
            "enrolledCourses": ["c1"],
            "karma": 3
        })),
    )
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "id": 1,
            "username": "alice",
            "profilePicture": "/placeholder.svg",
            "karma": 3
        })),
    )
}

async fn user_by_id(headers: HeaderMap, Path(user_id): Path<String>) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    if user_id != "2" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "User not found"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "id": 2,
            "username": "bob",
            "profilePicture": "/placeholder.svg",
            "karma": 7
        })),
    )
}

async fn user_posts(headers: HeaderMap, Path(_user_id): Path<String>) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({"posts": [post_p2()]})))
}

async fn user_courses(
    headers: HeaderMap,
    Path(_user_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({"courses": [course_c1()]})))
}

async fn user_karma(headers: HeaderMap, Path(_user_id): Path<String>) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({"karma": 7})))
}

async fn all_courses(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({"courses": [course_c1()]})))
}

async fn enroll(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    if body["courseId"].is_null() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Course ID is required"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"message": "Successfully enrolled in Intro to Computer Science"})),
    )
}

async fn unenroll(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    if body["courseId"].is_null() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Course ID is required"})),
        );
    }
    let mut course = course_c1();
    course["enrolledStudents"] = json!([]);
    (
        StatusCode::OK,
        Json(json!({
            "message": "Successfully unenrolled from Intro to Computer Science",
            "course": course
        })),
    )
}

async fn course_info(
    headers: HeaderMap,
    Path(course_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    if course_id != "c1" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Course not found"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"course": {
            "id": "c1",
            "code": "CS101",
            "name": "Intro to Computer Science",
            "description": "Fundamental concepts of computer science and programming",
            "instructor": "Prof. Anderson",
            "enrolledStudents": [1]
        }})),
    )
}

async fn course_posts(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(_course_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    let like = state.like.lock().unwrap();
    (
        StatusCode::OK,
        Json(json!({"posts": [post_p1(&like), post_p2()]})),
    )
}

async fn home_posts(
    State(state): State<StubState>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    let like = state.like.lock().unwrap();
    (
        StatusCode::OK,
        Json(json!({
            "message": "Posts retrieved successfully",
            "posts": [post_p1(&like), post_p2()]
        })),
    )
}

// The legacy my-posts route keeps the old field names (`timestamp`,
// `user_id`) and omits like data.
async fn my_posts(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "message": "Posts retrieved successfully",
            "posts": [{
                "id": 1,
                "content": "legacy shape",
                "timestamp": "Fri, 26 Apr 2024 15:30:00 GMT",
                "user_id": 1,
                "courseId": 1,
                "username": "alice",
                "comments": []
            }]
        })),
    )
}

async fn upload_image(headers: HeaderMap, mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() == Some("image") {
            let name = field.file_name().unwrap_or("image").to_string();
            let _ = field.bytes().await.unwrap();
            return (
                StatusCode::OK,
                Json(json!({"url": format!("/uploads/{name}")})),
            );
        }
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"message": "No image provided"})),
    )
}

async fn create_post(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Post created successfully",
            "post": {
                "id": "p-new",
                "userId": "1",
                "courseId": body["courseId"],
                "content": body["content"],
                "likes": 0,
                "createdAt": "2024-05-01T10:00:00Z",
                "comments": []
            }
        })),
    )
}

async fn delete_post(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    if body["postId"] == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Post not found"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"message": "Post deleted successfully"})),
    )
}

async fn like_post(
    State(state): State<StubState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    let mut like = state.like.lock().unwrap();
    if like.1 {
        *like = (like.0 - 1, false);
    } else {
        *like = (like.0 + 1, true);
    }
    (
        StatusCode::OK,
        Json(json!({
            "message": "Post liked successfully",
            "post": {"id": post_id, "likes": like.0, "isLiked": like.1}
        })),
    )
}

async fn liked_posts(
    State(state): State<StubState>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    if state.liked_fails.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Internal server error"})),
        );
    }
    (StatusCode::OK, Json(json!({"liked_posts": ["p2"]})))
}

async fn create_comment(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Comment created successfully",
            "comment": {
                "id": "k-new",
                "userId": "1",
                "postId": body["postId"],
                "content": body["content"],
                "createdAt": "2024-05-01T10:05:00Z",
                "username": "alice",
                "likes": 0
            }
        })),
    )
}

async fn chats(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({"chats": [{
            "id": "ch1",
            "participant": {"id": 2, "username": "bob", "profilePicture": "placeholder.svg"},
            "lastMessage": {
                "content": "see you tomorrow",
                "timestamp": "2024-05-01T18:00:00Z",
                "senderId": 2
            },
            "unreadCount": 1
        }]})),
    )
}

async fn create_chat(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    if body["participantId"].is_null() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Participant ID is required"})),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Chat created successfully",
            "chatId": "ch2",
            "chat": {
                "id": "ch2",
                "participant": {"id": 3, "username": "carol", "profilePicture": "placeholder.svg"},
                "lastMessage": null,
                "unreadCount": 0
            }
        })),
    )
}

async fn messages(headers: HeaderMap, Path(_chat_id): Path<String>) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({"messages": [{
            "id": "m1",
            "content": "hey",
            "timestamp": "2024-05-01T17:59:00Z",
            "senderId": 2,
            "isRead": true
        }]})),
    )
}

async fn send_message(
    headers: HeaderMap,
    Path(_chat_id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authed(&headers) {
        return unauthorized();
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "message": {
                "id": "m2",
                "content": body["content"],
                "timestamp": "2024-05-01T18:01:00Z",
                "senderId": 1,
                "senderUsername": "alice",
                "isRead": false
            }
        })),
    )
}
