//! Shapes the model is asked to answer with, and their checks.
//!
//! Nothing the model returns is trusted: the text is parsed into these wire
//! types, validated, and only then converted into domain values.

use serde::Deserialize;
use smartmenu_menu::{
    DailyMenu, MacroSplit, Menu, MenuPreferences, NutritionRequest, NutritionalDetail,
    NutritionalReport, Recipe, RecipeNutrition, ShoppingList,
};
use validator::Validate;

use crate::GenerationError;

#[derive(Deserialize, Validate, Debug)]
struct MenuAnswer {
    #[validate(length(min = 1), nested)]
    menu: Vec<DayAnswer>,
}

#[derive(Deserialize, serde::Serialize, Validate, Debug)]
struct DayAnswer {
    day: u8,
    #[validate(nested)]
    suggested: RecipeAnswer,
    #[validate(nested)]
    optional: RecipeAnswer,
}

#[derive(Deserialize, serde::Serialize, Validate, Debug)]
struct RecipeAnswer {
    #[validate(length(min = 1))]
    name: String,
    #[validate(length(min = 1))]
    ingredients: Vec<String>,
    #[serde(default)]
    instructions: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    music: Option<String>,
    #[serde(default)]
    pairing: Option<String>,
}

impl From<RecipeAnswer> for Recipe {
    fn from(answer: RecipeAnswer) -> Self {
        Recipe {
            name: answer.name.trim().to_owned(),
            ingredients: clean_lines(answer.ingredients),
            instructions: answer.instructions.trim().to_owned(),
            description: answer.description.trim().to_owned(),
            music: non_blank(answer.music),
            pairing: non_blank(answer.pairing),
            ..Recipe::new("", vec![])
        }
    }
}

#[derive(Deserialize, Debug)]
struct ShoppingListAnswer {
    shopping_list: Vec<String>,
}

#[derive(Deserialize, Validate, Debug)]
struct NutritionAnswer {
    #[validate(nested)]
    report: Vec<NutritionEntry>,
}

#[derive(Deserialize, Validate, Debug)]
struct NutritionEntry {
    #[serde(default)]
    recipe_name: String,
    #[validate(length(min = 1))]
    calories: String,
    #[validate(length(min = 1))]
    protein: String,
    #[validate(length(min = 1))]
    carbohydrates: String,
    #[validate(length(min = 1))]
    fats: String,
    #[validate(range(min = 0.0, max = 100.0))]
    protein_percentage: Option<f32>,
    #[validate(range(min = 0.0, max = 100.0))]
    carbohydrates_percentage: Option<f32>,
    #[validate(range(min = 0.0, max = 100.0))]
    fats_percentage: Option<f32>,
    #[serde(default)]
    key_micronutrients: Vec<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl NutritionEntry {
    fn into_detail(self) -> NutritionalDetail {
        let split = match (
            self.protein_percentage,
            self.carbohydrates_percentage,
            self.fats_percentage,
        ) {
            (Some(protein), Some(carbohydrates), Some(fats)) => Some(MacroSplit {
                protein,
                carbohydrates,
                fats,
            }),
            _ => None,
        };

        NutritionalDetail {
            calories: self.calories.trim().to_owned(),
            protein: self.protein.trim().to_owned(),
            carbohydrates: self.carbohydrates.trim().to_owned(),
            fats: self.fats.trim().to_owned(),
            split,
            key_micronutrients: clean_lines(self.key_micronutrients),
            notes: non_blank(self.notes),
        }
        .with_derived_split()
    }
}

/// Cuts the JSON object out of answers wrapped in prose or code fences.
fn json_object(text: &str) -> Result<&str, GenerationError> {
    let start = text.find('{');
    let end = text.rfind('}');

    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => Err(GenerationError::InvalidOutput(
            "answer contains no JSON object".to_owned(),
        )),
    }
}

fn parse<T: for<'de> Deserialize<'de>>(text: &str) -> Result<T, GenerationError> {
    serde_json::from_str(json_object(text)?)
        .map_err(|e| GenerationError::InvalidOutput(e.to_string()))
}

fn check<T: Validate>(value: &T) -> Result<(), GenerationError> {
    value
        .validate()
        .map_err(|e| GenerationError::InvalidOutput(e.to_string()))
}

fn clean_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim().to_owned())
        .filter(|line| !line.is_empty())
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

pub(crate) fn menu(text: &str, preferences: &MenuPreferences) -> Result<Menu, GenerationError> {
    let answer: MenuAnswer = parse(text)?;
    check(&answer)?;

    let mut days = answer.menu;
    days.sort_by_key(|d| d.day);

    let expected = (1..=preferences.days).collect::<Vec<_>>();
    let actual = days.iter().map(|d| d.day).collect::<Vec<_>>();
    if actual != expected {
        return Err(GenerationError::InvalidOutput(format!(
            "expected days 1 to {}, got {:?}",
            preferences.days, actual
        )));
    }

    let days = days
        .into_iter()
        .map(|d| DailyMenu {
            day: d.day,
            suggested: d.suggested.into(),
            optional: d.optional.into(),
        })
        .collect::<Vec<_>>();

    if let Some(day) = days
        .iter()
        .find(|d| d.suggested.ingredients.is_empty() || d.optional.ingredients.is_empty())
    {
        return Err(GenerationError::InvalidOutput(format!(
            "day {} has a recipe without ingredients",
            day.day
        )));
    }

    Ok(Menu {
        days,
        preferences: preferences.clone(),
    })
}

pub(crate) fn shopping_list(text: &str) -> Result<ShoppingList, GenerationError> {
    let answer: ShoppingListAnswer = parse(text)?;
    let list = clean_lines(answer.shopping_list);

    if list.is_empty() {
        return Err(GenerationError::InvalidOutput(
            "shopping list is empty".to_owned(),
        ));
    }

    Ok(list)
}

/// Entries are matched to the requested recipes by name, falling back to
/// position when the model renamed a dish. The requested names are kept.
pub(crate) fn nutrition(
    text: &str,
    request: &NutritionRequest,
) -> Result<NutritionalReport, GenerationError> {
    let answer: NutritionAnswer = parse(text)?;
    check(&answer)?;

    if answer.report.len() != request.recipes.len() {
        return Err(GenerationError::InvalidOutput(format!(
            "expected {} report entries, got {}",
            request.recipes.len(),
            answer.report.len()
        )));
    }

    let mut entries = answer.report.into_iter().map(Some).collect::<Vec<_>>();
    let mut report = Vec::with_capacity(request.recipes.len());

    for (position, recipe) in request.recipes.iter().enumerate() {
        let wanted = normalize(&recipe.name);
        let by_name = entries.iter().position(|entry| {
            entry
                .as_ref()
                .is_some_and(|e| normalize(&e.recipe_name) == wanted)
        });

        let entry = by_name
            .or_else(|| entries[position].is_some().then_some(position))
            .or_else(|| entries.iter().position(Option::is_some))
            .and_then(|index| entries[index].take())
            .ok_or_else(|| {
                GenerationError::InvalidOutput(format!("no entry for {}", recipe.name))
            })?;

        report.push(RecipeNutrition {
            recipe_name: recipe.name.clone(),
            detail: entry.into_detail(),
        });
    }

    Ok(report)
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
