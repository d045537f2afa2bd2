//! Builds the application around a fake model and a recording mailer so
//! that routes can be driven with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, header},
};
use http_body_util::BodyExt;
use smartmenu::{
    AppState,
    config::{AppConfig, Config, ObservabilityConfig, PlannerConfig, ServerConfig, SessionConfig},
    images::HeroImage,
    session::{SessionStore, SharedPlanner},
};
use smartmenu_generation::{FakeProvider, GenerationConfig, Generator};
use smartmenu_menu::NutritionCoverage;
use smartmenu_notification::{DeliveryReport, Email, EmailConfig, Mailer, Notifier};
use tower::ServiceExt;

#[derive(Debug)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
    answer: Mutex<DeliveryReport>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(vec![]),
            answer: Mutex::new(DeliveryReport::sent("queued")),
        }
    }

    pub fn answer_with(&self, report: DeliveryReport) {
        *self.answer.lock().unwrap() = report;
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn deliver(&self, email: Email) -> DeliveryReport {
        self.sent.lock().unwrap().push(email);
        self.answer.lock().unwrap().clone()
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

pub fn test_config(coverage: NutritionCoverage) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        session: SessionConfig::default(),
        generation: GenerationConfig::default(),
        email: EmailConfig::default(),
        planner: PlannerConfig {
            nutrition_coverage: coverage,
        },
        observability: ObservabilityConfig::default(),
        app: AppConfig {
            default_language: "en".to_string(),
            hero_image: false,
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub provider: Arc<FakeProvider>,
    pub mailer: Arc<RecordingMailer>,
    session: Option<String>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_coverage(NutritionCoverage::EveryDay)
    }

    pub fn with_coverage(coverage: NutritionCoverage) -> Self {
        let provider = Arc::new(FakeProvider::demo());
        let mailer = Arc::new(RecordingMailer::new());

        let state = AppState {
            config: test_config(coverage),
            sessions: SessionStore::new(),
            generator: Generator::new(provider.clone()),
            notifier: Notifier::new(mailer.clone()),
            hero: HeroImage::disabled(),
        };

        Self {
            router: smartmenu::server::app(state.clone()),
            state,
            provider,
            mailer,
            session: None,
        }
    }

    /// Sends a request with the session cookie of earlier responses, and
    /// remembers a session cookie set by this one.
    pub async fn send(&mut self, request: Request<Body>) -> Response<Body> {
        let mut request = request;
        if let Some(session) = &self.session {
            request.headers_mut().append(
                header::COOKIE,
                format!("smartmenu_session={session}").parse().unwrap(),
            );
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(session) = cookie(&response, "smartmenu_session") {
            self.session = Some(session);
        }

        response
    }

    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        self.send(request(Method::GET, uri, Body::empty())).await
    }

    pub async fn post(&mut self, uri: &str, form: &[(&str, &str)]) -> Response<Body> {
        let body = serde_urlencoded::to_string(form).unwrap();
        let mut request = request(Method::POST, uri, Body::from(body));
        request.headers_mut().insert(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded".parse().unwrap(),
        );

        self.send(request).await
    }

    pub async fn post_text(&mut self, uri: &str, form: &[(&str, &str)]) -> String {
        let response = self.post(uri, form).await;
        assert!(response.status().is_success(), "{uri} -> {}", response.status());
        body_text(response).await
    }

    pub async fn generate_menu(&mut self, days: &str) -> String {
        self.post_text(
            "/menu",
            &[("days", days), ("people", "2"), ("dietary", "all")],
        )
        .await
    }

    pub fn session_id(&self) -> &str {
        self.session.as_deref().expect("no session cookie was set")
    }

    pub async fn planner(&self) -> SharedPlanner {
        self.state.sessions.planner(self.session_id()).await
    }

    pub async fn wait_for_images(&self) {
        let planner = self.planner().await;

        for _ in 0..200 {
            let pending = planner.lock().await.menu().map(|m| m.pending_images());
            if pending == Some(0) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        panic!("images never arrived");
    }
}

pub fn request(method: Method, uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .body(body)
        .unwrap()
}

pub fn cookie(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_owned())
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
