//! What the pages render, flattened out of the planner so the templates stay
//! free of domain logic.

use askama::Template;
use smartmenu_menu::{
    Artifact, DietaryPreference, MAX_DAYS, MAX_PEOPLE, MenuPreferences, NutritionalReport,
    Planner, Recipe, Slot,
};
use strum::VariantArray;

use crate::template::{Toast, filters};

pub struct DishView {
    pub day: u8,
    pub slot: &'static str,
    pub label: &'static str,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub image_pending: bool,
    pub selected: bool,
}

pub struct DayView {
    pub day: u8,
    pub dishes: Vec<DishView>,
}

pub struct MenuView {
    pub days: Vec<DayView>,
    pub people: u8,
    pub pending_images: usize,
}

pub struct ArtifactView<T> {
    pub pending: bool,
    pub ready: Option<T>,
    pub error: Option<String>,
}

impl<T> ArtifactView<T> {
    fn from_artifact<U>(artifact: &Artifact<U>, map: impl FnOnce(&U) -> T) -> Self {
        Self {
            pending: artifact.is_pending(),
            ready: artifact.ready().map(map),
            error: artifact.error().map(str::to_owned),
        }
    }
}

pub struct NutritionRow {
    pub name: String,
    pub calories: String,
    pub protein: String,
    pub carbohydrates: String,
    pub fats: String,
    pub split: Option<String>,
    pub micronutrients: Vec<String>,
    pub notes: Option<String>,
}

fn nutrition_rows(report: &NutritionalReport) -> Vec<NutritionRow> {
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

fn slot_label(slot: Slot) -> &'static str {
    match slot {
        Slot::Suggested => "Suggested lunch",
        Slot::Optional => "Optional lunch",
    }
}

fn slot_key(slot: Slot) -> &'static str {
    match slot {
        Slot::Suggested => "suggested",
        Slot::Optional => "optional",
    }
}

/// Everything below the preferences form.
pub struct Workspace {
    pub menu: Option<MenuView>,
    pub selected: usize,
    pub shopping_list: ArtifactView<Vec<String>>,
    pub nutrition: ArtifactView<Vec<NutritionRow>>,
    pub toast: Option<Toast>,
}

impl Workspace {
    pub fn new(planner: &Planner, toast: Option<Toast>) -> Self {
        let menu = planner.menu().map(|menu| MenuView {
            days: menu
                .days
                .iter()
                .map(|daily| DayView {
                    day: daily.day,
                    dishes: [Slot::Suggested, Slot::Optional]
                        .into_iter()
                        .map(|slot| {
                            let recipe = daily.recipe(slot);
                            DishView {
                                day: daily.day,
                                slot: slot_key(slot),
                                label: slot_label(slot),
                                name: recipe.name.to_owned(),
                                description: recipe.description.to_owned(),
                                image: recipe.image.uri().map(str::to_owned),
                                image_pending: recipe.image.is_pending(),
                                selected: planner.is_selected(daily.day, slot),
                            }
                        })
                        .collect(),
                })
                .collect(),
            people: menu.people(),
            pending_images: menu.pending_images(),
        });

        Self {
            menu,
            selected: planner.selections().len(),
            shopping_list: ArtifactView::from_artifact(planner.shopping_list(), Clone::clone),
            nutrition: ArtifactView::from_artifact(planner.nutrition(), nutrition_rows),
            toast,
        }
    }

    pub fn has_pending_images(&self) -> bool {
        self.menu.as_ref().is_some_and(|m| m.pending_images > 0)
    }
}

pub struct DietaryOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub fn dietary_options(current: DietaryPreference) -> Vec<DietaryOption> {
    DietaryPreference::VARIANTS
        .iter()
        .map(|dietary| DietaryOption {
            value: dietary.as_ref(),
            label: match dietary {
                DietaryPreference::All => "Omnivore",
                DietaryPreference::Vegetarian => "Vegetarian",
                DietaryPreference::Vegan => "Vegan",
            },
            selected: *dietary == current,
        })
        .collect()
}

pub struct RecipeDetail {
    pub day: u8,
    pub slot: &'static str,
    pub label: &'static str,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub music: Option<String>,
    pub pairing: Option<String>,
    pub image: Option<String>,
    pub image_pending: bool,
    pub selected: bool,
    pub thermomix_url: String,
    pub youtube_url: String,
}

impl RecipeDetail {
    pub fn new(day: u8, slot: Slot, recipe: &Recipe, selected: bool) -> Self {
        let links = recipe.search_links();

        Self {
            day,
            slot: slot_key(slot),
            label: slot_label(slot),
            name: recipe.name.to_owned(),
            description: recipe.description.to_owned(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.to_owned(),
            music: recipe.music.clone(),
            pairing: recipe.pairing.clone(),
            image: recipe.image.uri().map(str::to_owned),
            image_pending: recipe.image.is_pending(),
            selected,
            thermomix_url: links.thermomix,
            youtube_url: links.youtube,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub preferences: &'a MenuPreferences,
    pub dietary: Vec<DietaryOption>,
    pub max_days: u8,
    pub max_people: u8,
    pub hero: Option<String>,
    pub workspace: Workspace,
}

impl<'a> IndexTemplate<'a> {
    pub fn new(preferences: &'a MenuPreferences, hero: Option<String>, workspace: Workspace) -> Self {
        Self {
            preferences,
            dietary: dietary_options(preferences.dietary),
            max_days: MAX_DAYS,
            max_people: MAX_PEOPLE,
            hero,
            workspace,
        }
    }
}

#[derive(Template)]
#[template(path = "partials/workspace.html")]
pub struct WorkspaceTemplate {
    pub workspace: Workspace,
}

#[derive(Template)]
#[template(path = "partials/menu.html")]
pub struct MenuTemplate {
    pub workspace: Workspace,
}

#[derive(Template)]
#[template(path = "recipe.html")]
pub struct RecipeTemplate {
    pub dish: RecipeDetail,
}

#[derive(Template)]
#[template(path = "partials/recipe-detail.html")]
pub struct RecipeDetailTemplate {
    pub dish: RecipeDetail,
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartmenu_menu::{DailyMenu, ImageState, Menu};

    fn planner() -> Planner {
        let mut planner = Planner::new();
        let request = planner.begin_menu_request();
        let mut optional = Recipe::new("Humitas", vec!["Choclo: 6".to_owned()]);
        optional.image = ImageState::Ready("data:image/png;base64,AAAA".to_owned());

        planner.install_menu(
            request,
            Menu {
                days: vec![DailyMenu {
                    day: 1,
                    suggested: Recipe::new("Cazuela", vec!["Zapallo: 200 g".to_owned()]),
                    optional,
                }],
                preferences: MenuPreferences::default(),
            },
        );
        planner
    }

    #[test]
    fn workspace_mirrors_the_planner() {
        let workspace = Workspace::new(&planner(), None);
        let menu = workspace.menu.as_ref().unwrap();

        assert_eq!(menu.days.len(), 1);
        assert_eq!(menu.pending_images, 1);
        assert!(workspace.has_pending_images());
        assert_eq!(workspace.selected, 1);

        let [suggested, optional] = &menu.days[0].dishes[..] else {
            panic!("expected two dishes");
        };
        assert!(suggested.selected && suggested.image_pending);
        assert!(!optional.selected);
        assert_eq!(optional.image.as_deref(), Some("data:image/png;base64,AAAA"));
        assert!(workspace.shopping_list.ready.is_none());
    }

    #[test]
    fn empty_planner_has_no_menu() {
        let workspace = Workspace::new(&Planner::new(), None);

        assert!(workspace.menu.is_none());
        assert!(!workspace.has_pending_images());
    }

    #[test]
    fn current_dietary_preference_is_selected() {
        let options = dietary_options(DietaryPreference::Vegan);

        assert_eq!(options.len(), 3);
        assert!(options.iter().any(|o| o.value == "vegan" && o.selected));
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
    }
}
