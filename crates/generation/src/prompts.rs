use serde_json::json;
use smartmenu_menu::{DietaryPreference, MenuPreferences, NutritionRequest, ShoppingListRequest};

use crate::Prompt;

pub(crate) const MENU: &str = "menu";
pub(crate) const SHOPPING_LIST: &str = "shopping_list";
pub(crate) const NUTRITION: &str = "nutrition";

const RECIPE_SHAPE: &str = r#"{"name": "...", "ingredients": ["Arroz: 2 tazas", "..."], "instructions": "...", "description": "...", "music": "...", "pairing": "..."}"#;

pub(crate) fn menu(preferences: &MenuPreferences, language: &str, temperature: f32) -> Prompt {
    let mut rules = Vec::new();

    match preferences.dietary {
        DietaryPreference::All => {
            rules.push("Plan an omnivorous menu with a variety of proteins.".to_owned())
        }
        DietaryPreference::Vegetarian => rules.push(
            "Every recipe must be strictly vegetarian: no meat, fish or seafood. Eggs and dairy are allowed."
                .to_owned(),
        ),
        DietaryPreference::Vegan => rules.push(
            "Every recipe must be strictly vegan: no animal products at all, including eggs, dairy and honey."
                .to_owned(),
        ),
    }
    if preferences.gluten_free {
        rules.push(
            "Every recipe must be gluten free: no wheat, barley, rye or derivatives.".to_owned(),
        );
    }
    if preferences.lactose_free {
        rules.push(
            "Every recipe must be lactose free: use lactose free dairy or plant based alternatives."
                .to_owned(),
        );
    }

    let system = format!(
        "You are a creative chef who designs balanced, varied lunch menus drawing on Chilean, \
         Peruvian and wider Latin American home cooking, plus European dishes popular in Chile. \
         Avoid repeating similar dishes on consecutive days. Write every text field in {language}. \
         Answer with a single JSON object and nothing else."
    );

    let user = format!(
        "Create a lunch menu for {days} days. Every recipe serves {people} people and its \
         ingredient quantities must be computed for exactly {people} people.\n\
         {rules}\n\
         For each day give two lunches, \"suggested\" and \"optional\". Ingredients are plain \
         strings of the form \"Ingredient: quantity\" without leading dashes. \"description\" is \
         two or three evocative sentences, \"music\" suggests an artist or playlist and \
         \"pairing\" suggests a wine or beer, omit it when a pairing makes no sense.\n\
         Answer with this shape, days numbered from 1 to {days}:\n\
         {{\"menu\": [{{\"day\": 1, \"suggested\": {RECIPE_SHAPE}, \"optional\": {RECIPE_SHAPE}}}]}}",
        days = preferences.days,
        people = preferences.people,
        rules = rules.join("\n"),
    );

    Prompt {
        name: MENU,
        system,
        user,
        temperature: Some(temperature),
        input: json!(preferences),
    }
}

pub(crate) fn shopping_list(request: &ShoppingListRequest, language: &str) -> Prompt {
    let dishes = request
        .dishes
        .iter()
        .map(|dish| format!("- {}: {}", dish.name, dish.ingredients.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");

    Prompt {
        name: SHOPPING_LIST,
        system: format!(
            "You turn menus into concise shopping lists for Chilean supermarkets. Write in \
             {language}. Answer with a single JSON object and nothing else."
        ),
        user: format!(
            "Consolidate the ingredients of these dishes into one shopping list, merging \
             repeated ingredients and adding up their quantities.\n{dishes}\n\
             Answer with {{\"shopping_list\": [\"Ingredient: total quantity\", ...]}}."
        ),
        temperature: None,
        input: json!(request),
    }
}

pub(crate) fn nutrition(request: &NutritionRequest, language: &str) -> Prompt {
    let recipes = request
        .recipes
        .iter()
        .map(|recipe| {
            format!(
                "- {} (serves {}): {}",
                recipe.name,
                recipe.servings,
                recipe.ingredients.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Prompt {
        name: NUTRITION,
        system: format!(
            "You are an expert nutritionist. Write in {language}. Answer with a single JSON \
             object and nothing else."
        ),
        user: format!(
            "Estimate the nutritional values of one serving of each dish. The ingredient \
             quantities are for the number of people given in parentheses, divide accordingly.\n\
             {recipes}\n\
             Answer with {{\"report\": [{{\"recipe_name\": \"...\", \"calories\": \"600 kcal\", \
             \"protein\": \"30g\", \"carbohydrates\": \"75g\", \"fats\": \"20g\", \
             \"protein_percentage\": 20, \"carbohydrates_percentage\": 50, \"fats_percentage\": 30, \
             \"key_micronutrients\": [\"Vitamin C: high\"], \"notes\": \"...\"}}]}} with one entry \
             per dish, in the same order, repeating each dish name exactly."
        ),
        temperature: None,
        input: json!(request),
    }
}

pub(crate) fn image(name: &str, description: Option<&str>) -> String {
    let mut prompt = format!(
        "A realistic, appetizing photo of the dish \"{name}\" for a recipe card. \
         Bright, clean food photography focused on the food."
    );
    if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
        prompt.push_str(&format!(" Consider this description: \"{description}\"."));
    }
    prompt
}

pub(crate) fn hero() -> String {
    "A wide, bright banner photo of a colourful table full of home cooked Latin American \
     lunch dishes, natural light, no text."
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartmenu_menu::MacroSplit;

    #[test]
    fn menu_prompt_carries_every_restriction() {
        let preferences = MenuPreferences {
            days: 3,
            people: 2,
            dietary: DietaryPreference::Vegan,
            gluten_free: true,
            lactose_free: true,
        };

        let prompt = menu(&preferences, "Spanish", 0.9);

        assert!(prompt.user.contains("for 3 days"));
        assert!(prompt.user.contains("exactly 2 people"));
        assert!(prompt.user.contains("strictly vegan"));
        assert!(prompt.user.contains("gluten free"));
        assert!(prompt.user.contains("lactose free"));
        assert!(prompt.system.contains("Spanish"));
        assert_eq!(prompt.input["days"], 3);
        assert_eq!(prompt.temperature, Some(0.9));
    }

    #[test]
    fn nutrition_example_agrees_with_energy_split() {
        let prompt = nutrition(&NutritionRequest { recipes: vec![] }, "English");

        let start = prompt.user.find("Answer with ").unwrap() + "Answer with ".len();
        let end = prompt.user.find(" with one entry").unwrap();
        let example: serde_json::Value = serde_json::from_str(&prompt.user[start..end]).unwrap();
        let entry = &example["report"][0];

        let split = MacroSplit::from_grams(
            entry["protein"].as_str().unwrap(),
            entry["carbohydrates"].as_str().unwrap(),
            entry["fats"].as_str().unwrap(),
        )
        .unwrap();

        assert_eq!(entry["protein_percentage"], split.protein.round() as i64);
        assert_eq!(entry["carbohydrates_percentage"], split.carbohydrates.round() as i64);
        assert_eq!(entry["fats_percentage"], split.fats.round() as i64);
    }

    #[test]
    fn image_prompt_skips_blank_description() {
        assert!(!image("Charquicán", Some("  ")).contains("description"));
        assert!(image("Charquicán", Some("Un clásico")).contains("Un clásico"));
    }
}
