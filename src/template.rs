use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{Html, IntoResponse, Response},
};
use std::{collections::HashMap, convert::Infallible};

use crate::config::LANGUAGES;

pub const SERVER_ERROR_MESSAGE: &str = "Something went wrong, please retry later";

/// Request header set by `app.js` when it only wants the fragment it swaps.
pub const PARTIAL_HEADER: &str = "sm-partial";

pub(crate) mod filters {
    #[askama::filter_fn]
    pub fn t(value: &str, values: &dyn askama::Values) -> askama::Result<String> {
        let lang = askama::get_value::<String>(values, "lang")?;

        Ok(rust_i18n::t!(value, locale = lang).to_string())
    }
}

pub struct Template {
    lang: String,
    partial: bool,
}

impl Template {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            partial: false,
        }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Whether the client asked for a fragment instead of a whole page.
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn t(&self, key: &str) -> String {
        rust_i18n::t!(key, locale = &self.lang).to_string()
    }

    /// Like [`Template::t`], but a message without translation is returned
    /// unchanged instead of as a prefixed key.
    pub fn translate_message(&self, message: &str) -> String {
        let translated = self.t(message);
        if translated == message || translated == format!("{}.{message}", self.lang) {
            return message.to_owned();
        }

        translated
    }

    fn render_with_values<T: askama::Template>(
        &self,
        template: T,
    ) -> Result<String, askama::Error> {
        let mut values: HashMap<&str, Box<dyn std::any::Any>> = HashMap::new();
        values.insert("lang", Box::new(self.lang.to_owned()));

        template.render_with_values(&values)
    }

    pub fn render<T: askama::Template>(&self, template: T) -> Response {
        match self.render_with_values(template) {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!(err = %err, "Failed to render template");
                (StatusCode::INTERNAL_SERVER_ERROR, self.t(SERVER_ERROR_MESSAGE)).into_response()
            }
        }
    }
}

/// Picks the first supported language of an `Accept-Language` header.
pub fn negotiate_language(header: Option<&str>) -> Option<&'static str> {
    let header = header?;
    let mut ranges = header
        .split(',')
        .filter_map(|range| {
            let mut parts = range.trim().split(';');
            let tag = parts.next()?.trim();
            let quality = parts
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);
            Some((tag, quality))
        })
        .filter(|(_, quality)| *quality > 0.0)
        .collect::<Vec<_>>();

    ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranges.into_iter().find_map(|(tag, _)| {
        let primary = tag.split('-').next()?.to_ascii_lowercase();
        LANGUAGES.into_iter().find(|lang| *lang == primary)
    })
}

impl FromRequestParts<crate::routes::AppState> for Template {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &crate::routes::AppState,
    ) -> Result<Self, Self::Rejection> {
        let accept_language = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());

        let lang = negotiate_language(accept_language)
            .map(str::to_owned)
            .unwrap_or_else(|| state.config.app.default_language.to_owned());

        let partial = parts.headers.contains_key(PARTIAL_HEADER);

        Ok(Template { lang, partial })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A transient notification rendered on top of the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub description: Option<String>,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
            description: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }

    /// Turns a crate error into the toast shown to the user. Server side
    /// failures are logged and replaced by a generic message.
    pub fn from_error(template: &Template, err: &smartmenu_shared::Error) -> Self {
        if err.is_user_facing() {
            return Toast::error(template.translate_message(&err.to_string()));
        }

        tracing::error!(err = %err, "Request failed");
        Toast::error(template.t(SERVER_ERROR_MESSAGE))
    }
}

#[derive(askama::Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate;

/// Unwraps a result whose error converts into `smartmenu_shared::Error`, or
/// returns the page with an error toast.
#[macro_export]
macro_rules! try_response {
    ($result:expr, $page:expr) => {
        $crate::try_response!(sync: $result.await, $page)
    };

    (sync: $result:expr, $page:expr) => {
        match $result {
            Ok(r) => r,
            Err(err) => {
                let err: smartmenu_shared::Error = err.into();
                let toast = $crate::template::Toast::from_error(&$page.template, &err);
                return $page.render(Some(toast)).await;
            }
        }
    };
}
