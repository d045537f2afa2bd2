use axum::{extract::State, response::IntoResponse};
use tracing::Instrument;

use crate::{
    routes::{AppState, Page},
    template::{SERVER_ERROR_MESSAGE, Toast},
};

/// POST /nutrition
///
/// Runs like the shopping list: the report is generated and applied in its
/// own task, so a dropped request never leaves it pending.
#[tracing::instrument(skip_all, fields(session = %page.session.id))]
pub async fn create(page: Page, State(state): State<AppState>) -> impl IntoResponse {
    let coverage = state.config.planner.nutrition_coverage;
    let result = page.session.planner.lock().await.nutrition_request(coverage);
    let (ticket, request) = crate::try_response!(sync: result, page);

    let failure = page
        .template
        .t("We could not analyse the nutrition of your menu, please try again");
    let failure_toast = Toast::error(failure.clone());
    let generator = state.generator.clone();
    let planner = page.session.planner.clone();

    let task = tokio::spawn(
        async move {
            let result = generator.generate_nutrition(&request).await.map_err(|err| {
                tracing::error!(err = %err, "Failed to generate nutritional report");
                failure
            });
            let ok = result.is_ok();
            let applied = planner.lock().await.apply_nutrition(ticket, result);

            (applied, ok)
        }
        .in_current_span(),
    );

    let toast = match task.await {
        Ok((false, _)) => {
            tracing::debug!("Nutritional report arrived after the selections changed");
            None
        }
        Ok((true, true)) => Some(Toast::success(
            page.template.t("Your nutritional report is ready"),
        )),
        Ok((true, false)) => Some(failure_toast),
        Err(err) => {
            tracing::error!(err = %err, "Nutrition task failed");
            Some(Toast::error(page.template.t(SERVER_ERROR_MESSAGE)))
        }
    };

    page.render(toast).await
}
