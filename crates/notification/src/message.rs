use smartmenu_menu::{NutritionalReport, SelectionMap, Slot};

use crate::template::filters;

pub(crate) struct MenuDish {
    pub day: u8,
    pub label: String,
    pub name: String,
    pub description: String,
    pub music: Option<String>,
    pub pairing: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub thermomix_url: String,
    pub youtube_url: String,
}

/// Selected dishes ordered by day, suggested before optional.
pub(crate) fn menu_dishes(selections: &SelectionMap, lang: &str) -> Vec<MenuDish> {
    selections
        .by_day()
        .into_iter()
        .map(|selection| {
            let recipe = &selection.recipe;
            let links = recipe.search_links();
            let label = match selection.slot {
                Slot::Suggested => rust_i18n::t!("Suggested lunch", locale = lang),
                Slot::Optional => rust_i18n::t!("Optional lunch", locale = lang),
            };

            MenuDish {
                day: selection.day,
                label: label.to_string(),
                name: recipe.name.to_owned(),
                description: recipe.description.to_owned(),
                music: recipe.music.clone(),
                pairing: recipe.pairing.clone(),
                ingredients: recipe.ingredients.clone(),
                instructions: recipe.instructions.to_owned(),
                thermomix_url: links.thermomix,
                youtube_url: links.youtube,
            }
        })
        .collect()
}

pub(crate) struct NutritionRow {
    pub name: String,
    pub calories: String,
    pub protein: String,
    pub carbohydrates: String,
    pub fats: String,
    pub split: Option<String>,
    pub micronutrients: Vec<String>,
    pub notes: Option<String>,
}

pub(crate) fn nutrition_rows(report: &NutritionalReport) -> Vec<NutritionRow> {
    report
        .iter()
        .map(|entry| {
            let detail = &entry.detail;
            NutritionRow {
                name: entry.recipe_name.to_owned(),
                calories: detail.calories.to_owned(),
                protein: detail.protein.to_owned(),
                carbohydrates: detail.carbohydrates.to_owned(),
                fats: detail.fats.to_owned(),
                split: detail.split.map(|s| {
                    format!(
                        "{:.0}% / {:.0}% / {:.0}%",
                        s.protein, s.carbohydrates, s.fats
                    )
                }),
                micronutrients: detail.key_micronutrients.clone(),
                notes: detail.notes.clone(),
            }
        })
        .collect()
}

#[derive(askama::Template)]
#[template(path = "menu.html")]
pub(crate) struct MenuHtmlTemplate<'a> {
    pub lang: &'a str,
    pub year: i32,
    pub dishes: &'a [MenuDish],
}

#[derive(askama::Template)]
#[template(path = "menu.txt")]
pub(crate) struct MenuPlainTemplate<'a> {
    pub lang: &'a str,
    pub year: i32,
    pub dishes: &'a [MenuDish],
}

#[derive(askama::Template)]
#[template(path = "shopping-list.html")]
pub(crate) struct ShoppingListHtmlTemplate<'a> {
    pub lang: &'a str,
    pub year: i32,
    pub items: &'a [String],
}

#[derive(askama::Template)]
#[template(path = "shopping-list.txt")]
pub(crate) struct ShoppingListPlainTemplate<'a> {
    pub lang: &'a str,
    pub year: i32,
    pub items: &'a [String],
}

#[derive(askama::Template)]
#[template(path = "nutrition.html")]
pub(crate) struct NutritionHtmlTemplate<'a> {
    pub lang: &'a str,
    pub year: i32,
    pub rows: &'a [NutritionRow],
}

#[derive(askama::Template)]
#[template(path = "nutrition.txt")]
pub(crate) struct NutritionPlainTemplate<'a> {
    pub lang: &'a str,
    pub year: i32,
    pub rows: &'a [NutritionRow],
}
