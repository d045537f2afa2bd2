use axum::{extract::State, response::IntoResponse};
use tracing::Instrument;

use crate::{
    routes::{AppState, Page},
    template::{SERVER_ERROR_MESSAGE, Toast},
};

/// POST /shopping-list
///
/// The request is built from the selections under the lock, the generator
/// runs without it. Generation and apply run in their own task so that a
/// dropped request still settles the pending list. A result arriving after
/// the selections changed is dropped.
#[tracing::instrument(skip_all, fields(session = %page.session.id))]
pub async fn create(page: Page, State(state): State<AppState>) -> impl IntoResponse {
    let result = page.session.planner.lock().await.shopping_list_request();
    let (ticket, request) = crate::try_response!(sync: result, page);

    let failure = page
        .template
        .t("We could not create the shopping list, please try again");
    let failure_toast = Toast::error(failure.clone());
    let generator = state.generator.clone();
    let planner = page.session.planner.clone();

    let task = tokio::spawn(
        async move {
            let result = generator
                .create_shopping_list(&request)
                .await
                .map_err(|err| {
                    tracing::error!(err = %err, "Failed to create shopping list");
                    failure
                });
            let ok = result.is_ok();
            let applied = planner.lock().await.apply_shopping_list(ticket, result);

            (applied, ok)
        }
        .in_current_span(),
    );

    let toast = match task.await {
        Ok((false, _)) => {
            tracing::debug!("Shopping list arrived after the selections changed");
            None
        }
        Ok((true, true)) => Some(Toast::success(page.template.t("Your shopping list is ready"))),
        Ok((true, false)) => Some(failure_toast),
        Err(err) => {
            tracing::error!(err = %err, "Shopping list task failed");
            Some(Toast::error(page.template.t(SERVER_ERROR_MESSAGE)))
        }
    };

    page.render(toast).await
}
