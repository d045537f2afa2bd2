use axum::{
    Router,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use smartmenu_generation::Generator;
use smartmenu_menu::MenuPreferences;
use smartmenu_notification::Notifier;
use std::convert::Infallible;

use crate::{
    images::HeroImage,
    session::{Session, SessionStore},
    template::{NotFoundTemplate, Template, Toast},
    view::{IndexTemplate, Workspace, WorkspaceTemplate},
};

mod email;
mod health;
mod index;
mod menu;
mod nutrition;
mod selection;
mod shopping_list;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub sessions: SessionStore,
    pub generator: Generator,
    pub notifier: Notifier,
    pub hero: HeroImage,
}

/// Everything a handler needs to answer with the planning page: the
/// caller's language, their planner and the preferences shown in the form.
pub struct Page {
    pub template: Template,
    pub session: Session,
    pub preferences: MenuPreferences,
    pub hero: Option<String>,
}

impl FromRequestParts<AppState> for Page {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let template = Template::from_request_parts(parts, state).await?;
        let session = Session::from_request_parts(parts, state).await?;
        let jar = CookieJar::from_headers(&parts.headers);

        Ok(Page {
            template,
            session,
            preferences: crate::cookies::read_preferences(&jar),
            hero: state.hero.uri().await,
        })
    }
}

impl Page {
    pub async fn workspace(&self, toast: Option<Toast>) -> Workspace {
        let planner = self.session.planner.lock().await;
        Workspace::new(&planner, toast)
    }

    /// Renders the workspace fragment for script driven requests, the whole
    /// page otherwise.
    pub async fn render(&self, toast: Option<Toast>) -> Response {
        let workspace = self.workspace(toast).await;

        if self.template.is_partial() {
            return self.template.render(WorkspaceTemplate { workspace });
        }

        self.template.render(IndexTemplate::new(
            &self.preferences,
            self.hero.clone(),
            workspace,
        ))
    }
}

pub async fn fallback(template: Template) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, template.render(NotFoundTemplate))
}

pub fn router(app_state: AppState) -> Router {
    let planning = Router::new()
        .route("/", get(index::page))
        .route("/menu", get(menu::partial).post(menu::generate))
        .route("/menu/{day}/{slot}", get(menu::recipe))
        .route("/selection", post(selection::toggle))
        .route("/shopping-list", post(shopping_list::create))
        .route("/nutrition", post(nutrition::create))
        .route("/email/menu", post(email::menu))
        .route("/email/shopping-list", post(email::shopping_list))
        .route("/email/nutrition", post(email::nutrition))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            crate::middleware::session_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(planning)
        .fallback(fallback)
        .nest_service("/static", crate::assets::AssetsService::new())
        .with_state(app_state)
}
