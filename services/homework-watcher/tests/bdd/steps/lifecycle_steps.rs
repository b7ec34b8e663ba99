//! BDD step definitions for watcher assembly and lifecycle

use std::sync::Arc;

use cucumber::{given, then, when};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use homework_watcher::io::HttpClient;
use homework_watcher::notifier::Notifier;
use homework_watcher::practicum::HomeworkApi;
use homework_watcher::{Config, Credentials, WatcherBuilder};

use crate::steps::doubles::RecordingHttpClient;
use crate::world::WatcherWorld;

const TELEGRAM_OK: &str = r#"{"ok":true,"result":{"message_id":1}}"#;

fn credentials() -> Credentials {
    Credentials {
        practicum_token: "practicum-token".to_string(),
        telegram_token: "123:bot-token".to_string(),
        telegram_chat_id: "987654".to_string(),
    }
}

fn telegram_ok_http() -> Arc<RecordingHttpClient> {
    Arc::new(RecordingHttpClient::answering(200, TELEGRAM_OK))
}

fn lifecycle_http(world: &mut WatcherWorld) -> Arc<RecordingHttpClient> {
    Arc::clone(world.lifecycle_http.get_or_insert_with(telegram_ok_http))
}

fn serve_homeworks(world: &mut WatcherWorld, body: &str) {
    let http = RecordingHttpClient::answering(200, TELEGRAM_OK).with_homeworks(body);
    world.lifecycle_http = Some(Arc::new(http));
}

fn build_watcher(world: &mut WatcherWorld) {
    let http = lifecycle_http(world);
    let mut builder = WatcherBuilder::new(Config::default(), credentials())
        .with_http_client(http as Arc<dyn HttpClient>);

    if let Some(from_date) = world.initial_cursor {
        builder = builder.with_initial_cursor(from_date);
    }
    if world.lifecycle_inject_doubles {
        builder = builder
            .with_api(world.api() as Arc<dyn HomeworkApi>)
            .with_notifier(world.notifier() as Arc<dyn Notifier>);
    }
    if let Some(cancel) = world.lifecycle_cancel.take() {
        builder = builder.with_cancellation_token(cancel);
    }

    world.watcher = Some(builder.build().expect("watcher failed to build"));
}

async fn start_watcher(world: &mut WatcherWorld) {
    let watcher = world.watcher.take().expect("watcher not built");
    watcher.start().await.expect("watcher failed");
}

// --- Given steps ---

#[given(expr = "the grading API serves homework {string} with status {string}")]
fn grading_api_serves(world: &mut WatcherWorld, name: String, status: String) {
    let body = json!({
        "homeworks": [{"homework_name": name, "status": status}],
        "current_date": 1700000600
    });
    serve_homeworks(world, &body.to_string());
}

#[given("the grading API serves no homeworks")]
fn grading_api_serves_nothing(world: &mut WatcherWorld) {
    serve_homeworks(world, r#"{"homeworks": []}"#);
}

#[given(expr = "the watcher starts from {int}")]
fn watcher_starts_from(world: &mut WatcherWorld, from_date: i64) {
    world.initial_cursor = Some(from_date);
}

#[given("the watcher is cancelled before it starts")]
fn watcher_pre_cancelled(world: &mut WatcherWorld) {
    let cancel = CancellationToken::new();
    cancel.cancel();
    world.lifecycle_cancel = Some(cancel);
}

#[given("the watcher uses the injected API and notifier")]
fn watcher_uses_doubles(world: &mut WatcherWorld) {
    world.lifecycle_inject_doubles = true;
}

// --- When steps ---

#[when("the watcher is built")]
fn watcher_built(world: &mut WatcherWorld) {
    build_watcher(world);
}

#[when("the watcher is built and started")]
async fn watcher_built_and_started(world: &mut WatcherWorld) {
    build_watcher(world);
    start_watcher(world).await;
}

#[when("the watcher is stopped through its cancellation token")]
fn watcher_stopped(world: &mut WatcherWorld) {
    let watcher = world.watcher.as_ref().expect("watcher not built");
    watcher.cancellation_token().cancel();
}

#[when("the built watcher is started")]
async fn watcher_started(world: &mut WatcherWorld) {
    start_watcher(world).await;
}

// --- Then steps ---

#[then(expr = "the built watcher's cursor should be {int}")]
fn built_cursor(world: &mut WatcherWorld, expected: i64) {
    let watcher = world.watcher.as_ref().expect("watcher not built");
    assert_eq!(watcher.engine().state().cursor, expected);
}

#[then(expr = "the grading API should have been asked once with token {string} from {int}")]
async fn grading_api_asked_with(world: &mut WatcherWorld, token: String, from_date: i64) {
    let http = lifecycle_http(world);
    let gets = http.gets.read().await;
    assert_eq!(gets.len(), 1, "requests: {:?}", *gets);
    assert_eq!(
        gets[0].url,
        "https://practicum.yandex.ru/api/user_api/homework_statuses/"
    );
    assert_eq!(
        gets[0].headers,
        vec![("Authorization".to_string(), format!("OAuth {}", token))]
    );
    assert_eq!(
        gets[0].query,
        vec![("from_date".to_string(), from_date.to_string())]
    );
}

#[then(expr = "the grading API should have been asked {int} time(s)")]
async fn grading_api_asked(world: &mut WatcherWorld, expected: usize) {
    let http = lifecycle_http(world);
    assert_eq!(http.gets.read().await.len(), expected);
}

#[then(expr = "the bot API should have been posted {int} message(s)")]
async fn bot_posted(world: &mut WatcherWorld, expected: usize) {
    let http = lifecycle_http(world);
    assert_eq!(http.posts.read().await.len(), expected);
}

#[then(expr = "the bot API should have been posted {int} message(s) mentioning {string}")]
async fn bot_posted_mentioning(world: &mut WatcherWorld, expected: usize, fragment: String) {
    let http = lifecycle_http(world);
    let posts = http.posts.read().await;
    assert_eq!(posts.len(), expected, "posts: {:?}", *posts);
    for post in posts.iter() {
        assert_eq!(
            post.url,
            "https://api.telegram.org/bot123:bot-token/sendMessage"
        );
        assert_eq!(post.body["chat_id"], "987654");
        let text = post.body["text"].as_str().unwrap_or_default();
        assert!(text.contains(&fragment), "{:?}", text);
    }
}
