use axum::response::IntoResponse;
use axum_extra::extract::Form;
use serde::Deserialize;
use smartmenu_menu::Slot;

use crate::routes::Page;

#[derive(Deserialize)]
pub struct SelectionInput {
    pub day: u8,
    pub slot: Slot,
    pub included: bool,
}

#[tracing::instrument(skip_all, fields(session = %page.session.id))]
pub async fn toggle(page: Page, Form(input): Form<SelectionInput>) -> impl IntoResponse {
    let result = page
        .session
        .planner
        .lock()
        .await
        .select(input.day, input.slot, input.included);

    let changed = crate::try_response!(sync: result, page);
    if changed {
        tracing::debug!(day = input.day, slot = %input.slot, included = input.included, "Selection changed");
    }

    page.render(None).await
}
