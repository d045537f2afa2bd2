use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{CookieJar, Form};
use serde::Deserialize;
use smartmenu_menu::{DietaryPreference, MAX_DAYS, MAX_PEOPLE, MenuPreferences, Slot};
use std::str::FromStr;
use validator::Validate;

use crate::{
    cookies::preferences_cookie,
    images::{image_jobs, spawn_image_jobs},
    routes::{AppState, Page},
    template::{NotFoundTemplate, Toast},
    view::{MenuTemplate, RecipeDetail, RecipeDetailTemplate, RecipeTemplate},
};

/// Numbers arrive as text so that a malformed value reads as a validation
/// error rather than a rejected request.
#[derive(Deserialize)]
pub struct MenuInput {
    pub days: String,
    pub people: String,
    #[serde(default)]
    pub dietary: DietaryPreference,
    pub gluten_free: Option<String>,
    pub lactose_free: Option<String>,
}

impl From<MenuInput> for MenuPreferences {
    fn from(input: MenuInput) -> Self {
        Self {
            days: input.days.trim().parse().unwrap_or(0),
            people: input.people.trim().parse().unwrap_or(0),
            dietary: input.dietary,
            gluten_free: input.gluten_free.is_some(),
            lactose_free: input.lactose_free.is_some(),
        }
    }
}

fn validate_preferences(preferences: &MenuPreferences) -> smartmenu_shared::Result<()> {
    let Err(errors) = preferences.validate() else {
        return Ok(());
    };

    let fields = errors.field_errors();
    if fields.contains_key("days") {
        smartmenu_shared::invalid!("The number of days must be between 1 and {}", MAX_DAYS);
    }
    if fields.contains_key("people") {
        smartmenu_shared::invalid!("The number of people must be between 1 and {}", MAX_PEOPLE);
    }

    Err(errors.into())
}

/// POST /menu
///
/// The planner lock is released while the generator runs. A failure keeps
/// the previous menu and its selections.
#[tracing::instrument(skip_all, fields(session = %page.session.id))]
pub async fn generate(
    mut page: Page,
    State(state): State<AppState>,
    jar: CookieJar,
    Form(input): Form<MenuInput>,
) -> Response {
    let preferences = MenuPreferences::from(input);
    page.preferences = preferences.clone();

    crate::try_response!(sync: validate_preferences(&preferences), page);

    let request = page.session.planner.lock().await.begin_menu_request();

    let menu = match state.generator.generate_menu(&preferences).await {
        Ok(menu) => menu,
        Err(err) => {
            tracing::error!(err = %err, "Failed to generate menu");
            let toast = Toast::error(
                page.template
                    .t("We could not generate your menu, please try again"),
            );
            return page.render(Some(toast)).await;
        }
    };

    let jobs = {
        let mut planner = page.session.planner.lock().await;
        planner
            .install_menu(request, menu)
            .and_then(|tickets| planner.menu().map(|menu| image_jobs(menu, tickets)))
    };

    let Some(jobs) = jobs else {
        return page.render(None).await;
    };

    tracing::info!(
        days = preferences.days,
        people = preferences.people,
        dietary = %preferences.dietary,
        images = jobs.len(),
        "Menu installed"
    );

    spawn_image_jobs(&state.generator, &page.session.planner, jobs);

    let toast = Toast::success(page.template.t("Your menu is ready"));

    (
        jar.add(preferences_cookie(&preferences)),
        page.render(Some(toast)).await,
    )
        .into_response()
}

/// GET /menu, the menu fragment polled while images are pending.
pub async fn partial(page: Page) -> impl IntoResponse {
    let workspace = page.workspace(None).await;

    page.template.render(MenuTemplate { workspace })
}

/// GET /menu/{day}/{slot}
#[tracing::instrument(skip_all, fields(session = %page.session.id))]
pub async fn recipe(page: Page, Path((day, slot)): Path<(u8, String)>) -> Response {
    let not_found = || {
        (StatusCode::NOT_FOUND, page.template.render(NotFoundTemplate)).into_response()
    };

    let Ok(slot) = Slot::from_str(&slot) else {
        return not_found();
    };

    let dish = {
        let planner = page.session.planner.lock().await;
        planner
            .recipe(day, slot)
            .map(|recipe| RecipeDetail::new(day, slot, recipe, planner.is_selected(day, slot)))
    };

    let Some(dish) = dish else {
        return not_found();
    };

    if page.template.is_partial() {
        return page.template.render(RecipeDetailTemplate { dish });
    }

    page.template.render(RecipeTemplate { dish })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(days: &str, people: &str) -> MenuInput {
        MenuInput {
            days: days.to_owned(),
            people: people.to_owned(),
            dietary: DietaryPreference::Vegan,
            gluten_free: Some("on".to_owned()),
            lactose_free: None,
        }
    }

    #[test]
    fn form_input_becomes_preferences() {
        let preferences = MenuPreferences::from(input(" 5 ", "2"));

        assert_eq!(preferences.days, 5);
        assert_eq!(preferences.people, 2);
        assert!(preferences.gluten_free);
        assert!(!preferences.lactose_free);
        assert!(validate_preferences(&preferences).is_ok());
    }

    #[test]
    fn out_of_range_values_are_invalid() {
        for (days, people) in [("0", "2"), ("31", "2"), ("abc", "2"), ("7", "17"), ("7", "")] {
            let err = validate_preferences(&MenuPreferences::from(input(days, people))).unwrap_err();
            assert!(err.is_user_facing(), "{days}/{people}");
        }

        let err = validate_preferences(&MenuPreferences::from(input("31", "2"))).unwrap_err();
        assert_eq!(err.to_string(), "The number of days must be between 1 and 30");
    }
}
