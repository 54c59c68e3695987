use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use foodle::api::ApiClient;
use foodle::auth::{SessionStore, TokenStore};
use foodle::config::{Cli, Command, Config};
use foodle::models::{Chat, Comment, Course, Post};
use foodle::notify::{Notifier, StderrNotifier};
use foodle::pages::{ChatPage, CoursePage, HomePage, ProfilePage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    let config = Config::load(&cli)?;

    // Wire the session store and API client together
    let notifier: Arc<dyn Notifier> = Arc::new(StderrNotifier);
    let tokens = TokenStore::new(config.token_path());
    let api = Arc::new(ApiClient::new(
        config.api.base_url.clone(),
        tokens.clone(),
        notifier.clone(),
    ));
    let mut session = SessionStore::new(api.clone(), tokens, notifier);

    // Exchange any persisted token for the authoritative identity before an
    // authenticated command runs. Login/register replace the session anyway
    // and logout must work without one.
    if !matches!(
        cli.command,
        Command::Login { .. } | Command::Register { .. } | Command::Logout
    ) {
        session.restore().await;
    }

    if !run(cli.command, &api, &mut session).await {
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Command, api: &Arc<ApiClient>, session: &mut SessionStore) -> bool {
    match command {
        Command::Login { username, password } => {
            if session.login(&username, &password).await {
                let name = session
                    .identity()
                    .map(|i| i.username.clone())
                    .unwrap_or(username);
                println!("Logged in as {name}");
                true
            } else {
                false
            }
        }
        Command::Register { username, password } => {
            if session.register(&username, &password).await {
                // Replace the provisional identity with the backend's view.
                session.refresh_identity().await;
                println!("Welcome to Foodle, {username}!");
                true
            } else {
                false
            }
        }
        Command::Logout => {
            session.logout();
            println!("Logged out");
            true
        }
        Command::Whoami => match session.identity() {
            Some(identity) => {
                println!("{} (id {})", identity.username, identity.id);
                println!("karma: {}", identity.karma);
                println!("courses: {}", identity.enrolled_courses.join(", "));
                true
            }
            None => {
                println!("Not signed in");
                false
            }
        },
        Command::Feed => {
            if !require_auth(session) {
                return false;
            }
            let mut page = HomePage::new(api.clone());
            if page.load().await.is_err() {
                return false;
            }
            if page.feed.is_empty() {
                println!("No posts yet. Join a course to see its feed.");
            }
            for post in page.feed.posts() {
                print_post(post);
            }
            true
        }
        Command::Courses { all } => {
            if !require_auth(session) {
                return false;
            }
            let courses = if all {
                api.get_all_courses().await
            } else {
                api.get_my_courses().await
            };
            match courses {
                Ok(courses) => {
                    for course in &courses {
                        print_course(course);
                    }
                    true
                }
                Err(_) => false,
            }
        }
        Command::Course { course_id } => {
            if !require_auth(session) {
                return false;
            }
            let mut page = CoursePage::new(api.clone(), course_id);
            if page.load().await.is_err() {
                return false;
            }
            if let Some(course) = &page.course {
                println!("{} — {} ({})", course.code, course.name, course.instructor);
                println!("{}", course.description);
                println!("{} students enrolled", course.enrolled_students.len());
            }
            if page.can_post(session.identity()) {
                println!("(you can post here)");
            }
            println!();
            for post in page.feed.posts() {
                print_post(post);
            }
            true
        }
        Command::Join { course_id } => {
            if !require_auth(session) {
                return false;
            }
            let mut page = CoursePage::new(api.clone(), course_id);
            if page.join().await {
                // Enrollment changed server-side; re-fetch the identity.
                session.refresh_identity().await;
                println!("Joined course");
                true
            } else {
                false
            }
        }
        Command::Leave { course_id } => {
            if !require_auth(session) {
                return false;
            }
            let mut page = CoursePage::new(api.clone(), course_id);
            if page.leave().await {
                session.refresh_identity().await;
                let name = page.course.map(|c| c.name).unwrap_or_default();
                println!("Left {name}");
                true
            } else {
                false
            }
        }
        Command::Post {
            course_id,
            content,
            image,
        } => {
            if !require_auth(session) {
                return false;
            }
            let image_url = match image {
                Some(path) => {
                    let bytes = match std::fs::read(&path) {
                        Ok(bytes) => bytes,
                        Err(err) => {
                            eprintln!("Could not read {}: {err}", path.display());
                            return false;
                        }
                    };
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "image".to_string());
                    match api.upload_image(&file_name, bytes).await {
                        Ok(url) => Some(url),
                        Err(_) => return false,
                    }
                }
                None => None,
            };
            let mut page = CoursePage::new(api.clone(), course_id);
            if page.submit_post(&content, image_url.as_deref()).await {
                if let Some(post) = page.feed.posts().first() {
                    print_post(post);
                }
                true
            } else {
                false
            }
        }
        Command::DeletePost { post_id } => {
            if !require_auth(session) {
                return false;
            }
            match api.delete_post(&post_id).await {
                Ok(()) => {
                    println!("Post deleted");
                    true
                }
                Err(_) => false,
            }
        }
        Command::Like { post_id } => {
            if !require_auth(session) {
                return false;
            }
            match api.like_post(&post_id).await {
                Ok(like) => {
                    let state = if like.is_liked { "liked" } else { "unliked" };
                    println!("{state} — {} likes", like.likes);
                    true
                }
                Err(_) => false,
            }
        }
        Command::Comment { post_id, content } => {
            if !require_auth(session) {
                return false;
            }
            match api.create_comment(&post_id, &content).await {
                Ok(comment) => {
                    print_comment(&comment);
                    true
                }
                Err(_) => false,
            }
        }
        Command::DeleteComment { comment_id } => {
            if !require_auth(session) {
                return false;
            }
            match api.delete_comment(&comment_id).await {
                Ok(()) => {
                    println!("Comment deleted");
                    true
                }
                Err(_) => false,
            }
        }
        Command::Profile { user_id } => {
            if !require_auth(session) {
                return false;
            }
            let user_id = match user_id.or_else(|| session.identity().map(|i| i.id.clone())) {
                Some(id) => id,
                None => return false,
            };
            let mut page = ProfilePage::new(api.clone(), user_id);
            if page.load().await.is_err() {
                return false;
            }
            if let Some(user) = &page.user {
                println!("{} (id {})", user.username, user.id);
                println!("karma: {}", user.karma);
            }
            if !page.courses.is_empty() {
                println!("courses:");
                for course in &page.courses {
                    print_course(course);
                }
            }
            println!();
            for post in page.feed.posts() {
                print_post(post);
            }
            true
        }
        Command::Chats => {
            if !require_auth(session) {
                return false;
            }
            let mut page = ChatPage::new(api.clone());
            if page.load().await.is_err() {
                return false;
            }
            if page.chats.is_empty() {
                println!("No chats yet");
            }
            for chat in &page.chats {
                print_chat(chat);
            }
            true
        }
        Command::Chat { chat_id } => {
            if !require_auth(session) {
                return false;
            }
            let mut page = ChatPage::new(api.clone());
            if page.open_chat(&chat_id).await.is_err() {
                return false;
            }
            if let Some(conversation) = &page.open {
                for message in &conversation.messages {
                    let who = message
                        .sender_username
                        .as_deref()
                        .unwrap_or(&message.sender_id);
                    println!("[{}] {}: {}", format_timestamp(&message.timestamp), who, message.content);
                }
            }
            true
        }
        Command::Send { chat_id, content } => {
            if !require_auth(session) {
                return false;
            }
            let mut page = ChatPage::new(api.clone());
            if page.open_chat(&chat_id).await.is_err() {
                return false;
            }
            if page.send(&content).await {
                println!("Sent");
                true
            } else {
                false
            }
        }
        Command::StartChat { participant_id } => {
            if !require_auth(session) {
                return false;
            }
            let mut page = ChatPage::new(api.clone());
            match page.start_chat(&participant_id).await {
                Some(chat_id) => {
                    println!("Chat {chat_id}");
                    true
                }
                None => false,
            }
        }
    }
}

fn require_auth(session: &SessionStore) -> bool {
    if session.is_authenticated() {
        true
    } else {
        eprintln!("Not signed in. Run `foodle login <username> <password>` first.");
        false
    }
}

fn print_post(post: &Post) {
    let author = post.username.as_deref().unwrap_or(&post.user_id);
    println!(
        "[{}] {} in {} ({})",
        post.id,
        author,
        post.course_id,
        format_timestamp(&post.created_at)
    );
    println!("  {}", post.content);
    if let Some(image) = &post.image {
        println!("  image: {image}");
    }
    let liked = if post.is_liked { " (liked)" } else { "" };
    println!(
        "  {} likes{}, {} comments",
        post.likes,
        liked,
        post.comments.len()
    );
    for comment in &post.comments {
        print_comment(comment);
    }
    println!();
}

fn print_comment(comment: &Comment) {
    let who = comment.username.as_deref().unwrap_or(&comment.user_id);
    println!("    [{}] {}: {}", comment.id, who, comment.content);
}

fn print_course(course: &Course) {
    println!(
        "[{}] {} — {} ({} students)",
        course.id,
        course.code,
        course.name,
        course.enrolled_students.len()
    );
}

fn print_chat(chat: &Chat) {
    let preview = chat
        .last_message
        .as_ref()
        .and_then(|m| m.content.as_deref())
        .unwrap_or("(no messages)");
    let unread = if chat.unread_count > 0 {
        format!(" [{} unread]", chat.unread_count)
    } else {
        String::new()
    };
    println!("[{}] {}{}: {}", chat.id, chat.participant.username, unread, preview);
}

/// Render an RFC 3339 timestamp compactly; fall back to the raw string for
/// the legacy date format some routes still emit.
fn format_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%b %e %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
