//! Integration tests for the bot's HTTP edges and the full update path.
//!
//! Each test spins up Axum mock servers on random ports, one standing in
//! for the OkanAssist backend and one for the Telegram Bot API, and drives
//! real updates through the production handler.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;

use okanassist_bot::backend::{BackendGateway, HttpBackend, RegistrationRequest, Upload, UploadKind};
use okanassist_bot::channel::OutgoingReply;
use okanassist_bot::conversation::{ConversationEngine, RegistrationState, RegistrationStep};
use okanassist_bot::dispatch::{Dispatcher, Handlers};
use okanassist_bot::error::BackendError;
use okanassist_bot::i18n::{self, Language, MessageKey};
use okanassist_bot::lanes::{BotHandler, LaneHandler, UpdateLanes};
use okanassist_bot::session::{FlowKind, FlowState, MemorySessionStore, SessionStore};
use okanassist_bot::telegram::{TelegramApi, Update};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(10);

const TOKEN: &str = "TEST";
const PREFIX: &str = "/okanassist/v1";

/// One request seen by a mock server.
#[derive(Debug, Clone)]
struct Call {
    path: String,
    query: HashMap<String, String>,
    content_type: Option<String>,
    body: Bytes,
}

impl Call {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Recorder {
    fn record(&self, uri: &Uri, headers: &HeaderMap, body: Bytes) -> Call {
        let query = uri
            .query()
            .unwrap_or("")
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let call = Call {
            path: uri.path().to_string(),
            query,
            content_type: headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        };
        self.calls.lock().unwrap().push(call.clone());
        call
    }

    fn to(&self, suffix: &str) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.path.ends_with(suffix))
            .cloned()
            .collect()
    }

    fn is_empty(&self) -> bool {
        self.calls.lock().unwrap().is_empty()
    }
}

/// Fake OkanAssist API.
async fn backend_handler(
    State(rec): State<Recorder>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let call = rec.record(&uri, &headers, body);
    let Some(endpoint) = call.path.strip_prefix(PREFIX) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let req = call.json();

    match endpoint {
        "/register" if req["email"] == "taken@test.com" => Json(json!({
            "success": false,
            "message": "Email already registered"
        }))
        .into_response(),
        "/register" => Json(json!({"success": true, "message": "🎉 Welcome, Bob!"})).into_response(),
        "/start" => Json(json!({"message": "Welcome back"})).into_response(),
        "/route-message" if req["telegram_id"] == "401" => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "User not registered"})),
        )
            .into_response(),
        "/route-message" => {
            let text = req["message"].as_str().unwrap_or_default();
            Json(json!({"message": format!("echo: {text}")})).into_response()
        }
        "/get-transaction-summary" => Json(json!({"message": "Spent $10"})).into_response(),
        "/get-reminders" => (StatusCode::OK, "definitely not json").into_response(),
        "/upgrade" => (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Already premium"})),
        )
            .into_response(),
        "/profile" => (StatusCode::UNAUTHORIZED, Json(json!({"detail": "nope"}))).into_response(),
        "/process-receipt" => Json(json!({"message": "Receipt saved"})).into_response(),
        "/process-audio" => Json(json!({})).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Fake Telegram Bot API.
async fn telegram_handler(
    State(rec): State<Recorder>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let call = rec.record(&uri, &headers, body);
    let req = call.json();

    if call.path == format!("/file/bot{TOKEN}/photos/p1.jpg") {
        return (StatusCode::OK, "JPEGDATA").into_response();
    }

    match call.path.rsplit('/').next().unwrap_or_default() {
        "sendMessage" if req["text"].as_str().unwrap_or_default().contains("STALL") => {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Json(json!({"ok": true, "result": {"message_id": 1}})).into_response()
        }
        "sendMessage"
            if req.get("parse_mode").is_some()
                && req["text"].as_str().unwrap_or_default().contains("BROKEN") =>
        {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"ok": false, "description": "can't parse entities"})),
            )
                .into_response()
        }
        "sendMessage" => Json(json!({"ok": true, "result": {"message_id": 1}})).into_response(),
        "getFile" => Json(json!({
            "ok": true,
            "result": {"file_id": "p1", "file_path": "photos/p1.jpg"}
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

async fn start_backend() -> (String, Recorder) {
    let rec = Recorder::default();
    let app = Router::new().fallback(backend_handler).with_state(rec.clone());
    (serve(app).await, rec)
}

async fn start_telegram() -> (String, Recorder) {
    let rec = Recorder::default();
    let app = Router::new().fallback(telegram_handler).with_state(rec.clone());
    (serve(app).await, rec)
}

fn http_backend(base: &str) -> HttpBackend {
    HttpBackend::with_base_url(&format!("{base}{PREFIX}"), Duration::from_secs(5)).unwrap()
}

/// Bot wired exactly as in production, against the mock servers.
struct Bot {
    handler: Arc<BotHandler>,
    sessions: Arc<MemorySessionStore>,
    backend: Recorder,
    telegram: Recorder,
}

impl Bot {
    async fn start(support_chat: Option<&str>) -> Self {
        let (backend_url, backend) = start_backend().await;
        let (telegram_url, telegram) = start_telegram().await;

        let gateway: Arc<dyn BackendGateway> = Arc::new(http_backend(&backend_url));
        let messenger = Arc::new(TelegramApi::with_base_url(SecretString::from(TOKEN), &telegram_url));
        let sessions = MemorySessionStore::new();

        let engine = Arc::new(ConversationEngine::new(
            sessions.clone(),
            gateway.clone(),
            messenger.clone(),
            support_chat.map(str::to_string),
        ));
        let handlers = Handlers::new(gateway, messenger.clone(), Some("https://app.example".into()));
        let dispatcher = Arc::new(Dispatcher::new(engine, handlers));

        Self {
            handler: Arc::new(BotHandler::new(dispatcher, messenger)),
            sessions,
            backend,
            telegram,
        }
    }

    async fn send(&self, update: Update) {
        timeout(TEST_TIMEOUT, self.handler.handle(update))
            .await
            .expect("handler hung");
    }

    async fn say(&self, user_id: i64, text: &str) {
        self.send(text_update(user_id, text)).await;
    }

    /// Texts delivered to `chat_id`, in order.
    fn replies_to(&self, chat_id: &str) -> Vec<Value> {
        self.telegram
            .to("/sendMessage")
            .into_iter()
            .map(|c| c.json())
            .filter(|body| body["chat_id"] == chat_id)
            .collect()
    }

    fn last_reply_text(&self, chat_id: &str) -> String {
        self.replies_to(chat_id)
            .last()
            .and_then(|b| b["text"].as_str().map(str::to_string))
            .unwrap_or_default()
    }
}

fn update(user_id: i64, message: Value) -> Update {
    let mut message = message;
    message["message_id"] = json!(1);
    message["chat"] = json!({"id": user_id, "type": "private"});
    message["from"] = json!({
        "id": user_id,
        "is_bot": false,
        "first_name": "Bob",
        "language_code": "en"
    });
    serde_json::from_value(json!({"update_id": 1, "message": message})).unwrap()
}

fn text_update(user_id: i64, text: &str) -> Update {
    update(user_id, json!({"text": text}))
}

fn en(key: MessageKey) -> String {
    i18n::message(Language::En, key, &[])
}

// ── Scenarios ───────────────────────────────────────────────────────────

#[tokio::test]
async fn registration_submits_exactly_once() {
    let bot = Bot::start(None).await;
    for text in ["/register", "bob@test.com", "/skip", "/skip", "timezone: GMT+2", "/confirm"] {
        bot.say(42, text).await;
    }

    let registers = bot.backend.to("/register");
    assert_eq!(registers.len(), 1);
    assert_eq!(
        registers[0].json(),
        json!({
            "telegram_id": "42",
            "email": "bob@test.com",
            "name": "Bob ",
            "language_code": "en",
            "timezone": "timezone: GMT+2",
            "currency": "USD"
        })
    );

    let replies = bot.replies_to("42");
    assert_eq!(replies.len(), 6);
    assert_eq!(replies[5]["text"], "🎉 Welcome, Bob!");
    assert_eq!(replies[5]["parse_mode"], "Markdown");
    assert!(bot.sessions.is_empty().await);
}

#[tokio::test]
async fn invalid_email_then_cancel_makes_no_backend_calls() {
    let bot = Bot::start(None).await;
    for text in ["/register", "notanemail", "/cancel"] {
        bot.say(42, text).await;
    }

    assert!(bot.backend.is_empty());
    assert!(bot.sessions.get("42", FlowKind::Registration).await.is_none());

    let texts: Vec<String> = bot
        .replies_to("42")
        .iter()
        .map(|b| b["text"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        texts,
        vec![
            en(MessageKey::RegisterStart),
            en(MessageKey::ValidateEmail),
            en(MessageKey::RegisterCancelled)
        ]
    );
}

#[tokio::test]
async fn rejected_registration_relays_reason_and_clears_session() {
    let bot = Bot::start(None).await;
    for text in ["/register", "taken@test.com", "/skip", "Smith", "UTC", "/confirm"] {
        bot.say(42, text).await;
    }

    assert_eq!(bot.backend.to("/register")[0].json()["name"], "Bob Smith");
    assert_eq!(bot.last_reply_text("42"), "❌ Registration failed: Email already registered");
    assert!(bot.sessions.is_empty().await);
}

#[tokio::test]
async fn one_shot_command_mid_flow_leaves_flow_untouched() {
    let bot = Bot::start(None).await;
    bot.say(42, "/register").await;
    bot.say(42, "/balance").await;

    let summary = bot.backend.to("/get-transaction-summary");
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].query["telegram_id"], "42");
    assert_eq!(summary[0].query["days"], "30");
    assert_eq!(bot.last_reply_text("42"), "Spent $10");

    bot.say(42, "bob@test.com").await;
    match bot.sessions.get("42", FlowKind::Registration).await {
        Some(FlowState::Registration(RegistrationState { step, .. })) => {
            assert_eq!(step, RegistrationStep::Name)
        }
        other => panic!("registration should continue, got {other:?}"),
    }
    assert!(bot.backend.to("/route-message").is_empty());
}

#[tokio::test]
async fn free_text_goes_to_route_message() {
    let bot = Bot::start(None).await;
    bot.say(42, "I spent 25 on lunch").await;

    let calls = bot.backend.to("/route-message");
    assert_eq!(calls.len(), 1);
    let body = calls[0].json();
    assert_eq!(body["message"], "I spent 25 on lunch");
    assert_eq!(body["user_data"]["first_name"], "Bob");
    assert_eq!(body["language_code"], "en");
    assert_eq!(bot.last_reply_text("42"), "echo: I spent 25 on lunch");
}

#[tokio::test]
async fn unregistered_text_shows_backend_detail() {
    let bot = Bot::start(None).await;
    bot.say(401, "hello").await;

    let reply = bot.last_reply_text("401");
    assert!(reply.starts_with(&en(MessageKey::UserNotFound)));
    assert!(reply.ends_with("⚠️ User not registered"));
}

#[tokio::test]
async fn photo_is_downloaded_and_uploaded_as_receipt() {
    let bot = Bot::start(None).await;
    bot.send(update(
        42,
        json!({"photo": [
            {"file_id": "small", "width": 90, "height": 90},
            {"file_id": "p1", "width": 1280, "height": 960}
        ]}),
    ))
    .await;

    let get_file = bot.telegram.to("/getFile");
    assert_eq!(get_file.len(), 1);
    assert_eq!(get_file[0].json()["file_id"], "p1");

    let uploads = bot.backend.to("/process-receipt");
    assert_eq!(uploads.len(), 1);
    let upload = &uploads[0];
    assert!(upload
        .content_type
        .as_deref()
        .unwrap_or_default()
        .starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("name=\"telegram_id\""));
    assert!(body.contains("filename=\"receipt.jpg\""));
    assert!(body.contains("image/jpeg"));
    assert!(body.contains("JPEGDATA"));

    assert_eq!(bot.last_reply_text("42"), "Receipt saved");
}

#[tokio::test]
async fn support_ticket_reaches_operator_chat() {
    let bot = Bot::start(Some("-100777")).await;
    bot.say(42, "/support").await;
    bot.say(42, "My receipt was not saved").await;

    let operator = bot.replies_to("-100777");
    assert_eq!(operator.len(), 1);
    let report = operator[0]["text"].as_str().unwrap_or_default();
    assert!(report.starts_with("**New Support Request**"));
    assert!(report.contains("**User ID:** `42`"));
    assert!(report.contains("**Username:** @N/A"));
    assert!(report.ends_with("--- Message ---\nMy receipt was not saved"));

    assert_eq!(bot.last_reply_text("42"), en(MessageKey::SupportMessage));
    assert!(bot.sessions.is_empty().await);
    assert!(bot.backend.is_empty());
}

#[tokio::test]
async fn slash_followed_by_space_is_a_support_message() {
    let bot = Bot::start(Some("-100777")).await;
    bot.say(42, "/support").await;
    bot.say(42, "/ hello").await;

    let operator = bot.replies_to("-100777");
    assert_eq!(operator.len(), 1);
    let report = operator[0]["text"].as_str().unwrap_or_default();
    assert!(report.ends_with("--- Message ---\n/ hello"));
    assert_eq!(bot.last_reply_text("42"), en(MessageKey::SupportMessage));
    assert!(bot.sessions.is_empty().await);
}

#[tokio::test]
async fn upgrade_refusal_is_shown_verbatim() {
    let bot = Bot::start(None).await;
    bot.say(42, "/upgrade").await;

    let reply = bot.replies_to("42").pop().unwrap();
    assert_eq!(reply["text"], "Already premium");
    assert!(reply.get("parse_mode").is_none());
}

#[tokio::test]
async fn payment_deep_link_is_answered_locally() {
    let bot = Bot::start(None).await;
    bot.say(42, "/start payment_cancelled").await;
    assert!(bot.backend.is_empty());
    assert_eq!(bot.last_reply_text("42"), en(MessageKey::PaymentFailure));

    bot.say(42, "/start").await;
    let start = bot.backend.to("/start");
    assert_eq!(start.len(), 1);
    assert_eq!(start[0].json()["args"], json!([]));
    let reply = bot.replies_to("42").pop().unwrap();
    assert_eq!(reply["text"], "Welcome back");
    assert_eq!(reply["disable_web_page_preview"], true);
}

#[tokio::test]
async fn lanes_keep_each_users_dialogue_in_order() {
    let bot = Bot::start(None).await;
    let lanes = UpdateLanes::new(Arc::clone(&bot.handler));
    let (tx, rx) = mpsc::unbounded_channel();
    let runner = tokio::spawn(lanes.run(rx));

    let script = ["/register", "bob@test.com", "/skip", "/skip", "UTC", "/confirm"];
    for text in script {
        tx.send(text_update(1, text)).unwrap();
        tx.send(text_update(2, text)).unwrap();
    }
    drop(tx);
    timeout(TEST_TIMEOUT, runner).await.expect("lanes hung").unwrap();

    let mut ids: Vec<String> = bot
        .backend
        .to("/register")
        .iter()
        .map(|c| c.json()["telegram_id"].as_str().unwrap_or_default().to_string())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["1", "2"]);
}

// ── Transport and gateway edges ─────────────────────────────────────────

#[tokio::test]
async fn markdown_failure_falls_back_to_plain_text() {
    let (url, rec) = start_telegram().await;
    let api = TelegramApi::with_base_url(SecretString::from(TOKEN), &url);

    api.send_message("9", &OutgoingReply::markdown("BROKEN *markdown"))
        .await
        .unwrap();

    let sends = rec.to("/sendMessage");
    assert_eq!(sends.len(), 2);
    assert_eq!(sends[0].json()["parse_mode"], "Markdown");
    assert!(sends[1].json().get("parse_mode").is_none());
}

#[tokio::test]
async fn stalled_bot_api_request_times_out() {
    let (url, _) = start_telegram().await;
    let api = TelegramApi::with_base_url(SecretString::from(TOKEN), &url)
        .with_timeout(Duration::from_millis(200));

    let result = timeout(TEST_TIMEOUT, api.send_message("9", &OutgoingReply::plain("STALL")))
        .await
        .expect("send should give up on its own");
    assert!(result.is_err());
}

#[tokio::test]
async fn long_messages_are_split() {
    let (url, rec) = start_telegram().await;
    let api = TelegramApi::with_base_url(SecretString::from(TOKEN), &url);

    let text = format!("{}\n{}", "a".repeat(4000), "b".repeat(200));
    api.send_message("9", &OutgoingReply::plain(text)).await.unwrap();
    assert_eq!(rec.to("/sendMessage").len(), 2);
}

#[tokio::test]
async fn gateway_maps_statuses() {
    let (url, _) = start_backend().await;
    let backend = http_backend(&url);

    match backend.profile("1").await {
        Err(BackendError::Unauthorized { detail }) => assert_eq!(detail.as_deref(), Some("nope")),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
    match backend.upgrade("1").await {
        Err(BackendError::Status { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message.as_deref(), Some("Already premium"));
        }
        other => panic!("expected Status, got {other:?}"),
    }
    assert!(matches!(backend.reminders("1", 10).await, Err(BackendError::Decode(_))));
}

#[tokio::test]
async fn gateway_sends_registration_and_query_params() {
    let (url, rec) = start_backend().await;
    let backend = http_backend(&url);

    let outcome = backend
        .register(&RegistrationRequest {
            telegram_id: "5".into(),
            email: "e@x.io".into(),
            name: "Eve ".into(),
            language_code: "es".into(),
            timezone: "Madrid".into(),
            currency: "USD".into(),
        })
        .await
        .unwrap();
    assert!(outcome.success);
    assert_eq!(rec.to("/register")[0].json()["language_code"], "es");

    let _ = backend.reminders("5", 10).await;
    let reminders = rec.to("/get-reminders");
    assert_eq!(reminders[0].query["telegram_id"], "5");
    assert_eq!(reminders[0].query["limit"], "10");
}

#[tokio::test]
async fn audio_upload_without_message_is_empty_response() {
    let (url, rec) = start_backend().await;
    let backend = http_backend(&url);

    let resp = backend
        .upload(
            UploadKind::Audio,
            "5",
            Upload {
                bytes: b"OGG".to_vec(),
                file_name: "audio.ogg".into(),
                mime: "audio/ogg".into(),
            },
        )
        .await
        .unwrap();
    assert!(resp.message.is_none());
    assert!(String::from_utf8_lossy(&rec.to("/process-audio")[0].body).contains("audio/ogg"));
}
