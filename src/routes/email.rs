//! Sending a derived artifact by email. None of these handlers modify the
//! planner.

use axum::{extract::State, response::IntoResponse};
use axum_extra::extract::Form;
use serde::Deserialize;
use smartmenu_notification::DeliveryReport;

use crate::{
    routes::{AppState, Page},
    template::{Template, Toast},
};

#[derive(Deserialize)]
pub struct EmailInput {
    #[serde(default)]
    pub email: String,
}

/// Provider failures are shown verbatim under a localized heading.
fn delivery_toast(template: &Template, report: DeliveryReport) -> Toast {
    if report.success {
        return Toast::success(report.message);
    }

    Toast::error(template.t("We could not send the email")).with_description(report.message)
}

/// POST /email/menu
#[tracing::instrument(skip_all, fields(session = %page.session.id))]
pub async fn menu(
    page: Page,
    State(state): State<AppState>,
    Form(input): Form<EmailInput>,
) -> impl IntoResponse {
    let selections = page.session.planner.lock().await.selections().clone();

    let report = crate::try_response!(
        state
            .notifier
            .send_menu(&input.email, page.template.lang(), &selections),
        page
    );

    page.render(Some(delivery_toast(&page.template, report))).await
}

/// POST /email/shopping-list
#[tracing::instrument(skip_all, fields(session = %page.session.id))]
pub async fn shopping_list(
    page: Page,
    State(state): State<AppState>,
    Form(input): Form<EmailInput>,
) -> impl IntoResponse {
    let list = page
        .session
        .planner
        .lock()
        .await
        .shopping_list()
        .ready()
        .cloned()
        .unwrap_or_default();

    let report = crate::try_response!(
        state
            .notifier
            .send_shopping_list(&input.email, page.template.lang(), &list),
        page
    );

    page.render(Some(delivery_toast(&page.template, report))).await
}

/// POST /email/nutrition
#[tracing::instrument(skip_all, fields(session = %page.session.id))]
pub async fn nutrition(
    page: Page,
    State(state): State<AppState>,
    Form(input): Form<EmailInput>,
) -> impl IntoResponse {
    let report = page
        .session
        .planner
        .lock()
        .await
        .nutrition()
        .ready()
        .cloned()
        .unwrap_or_default();

    let delivery = crate::try_response!(
        state
            .notifier
            .send_nutrition(&input.email, page.template.lang(), &report),
        page
    );

    page.render(Some(delivery_toast(&page.template, delivery))).await
}
