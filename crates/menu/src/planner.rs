//! Session-scoped planning state.
//!
//! The planner owns the current menu, the user's selections and the derived
//! artifacts. Every mutation goes through one of the methods below, each of
//! which corresponds to a user action or to the completion of an external
//! call. Completions carry a ticket so that results belonging to an older
//! menu or an older selection are dropped instead of applied.

use crate::{
    Artifact, ArtifactTicket, DailyMenu, Dish, ImageState, Menu, NutritionCoverage,
    NutritionRecipe, NutritionRequest, NutritionalReport, Recipe, SelectionKey, SelectionMap,
    ShoppingList, ShoppingListRequest, Slot,
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PlannerError {
    #[error("no menu has been generated yet")]
    NoMenu,

    #[error("day {day} has no {slot} dish in the current menu")]
    NotInMenu { day: u8, slot: Slot },

    #[error("select at least one dish first")]
    EmptySelection,

    #[error("select a dish for every day first, missing days: {}", format_days(.missing))]
    IncompleteCoverage { missing: Vec<u8> },
}

fn format_days(days: &[u8]) -> String {
    days.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<PlannerError> for smartmenu_shared::Error {
    fn from(value: PlannerError) -> Self {
        smartmenu_shared::Error::Invalid(value.to_string())
    }
}

/// Handed out when a menu request starts, required to install its result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuRequest(u64);

/// Addresses one recipe image of one menu generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageTicket {
    pub generation: u64,
    pub day: u8,
    pub slot: Slot,
}

#[derive(Debug, Default)]
pub struct Planner {
    menu: Option<Menu>,
    generation: u64,
    requested: u64,
    installed: u64,
    selections: SelectionMap,
    revision: u64,
    shopping_list: Artifact<ShoppingList>,
    nutrition: Artifact<NutritionalReport>,
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selections(&self) -> &SelectionMap {
        &self.selections
    }

    pub fn is_selected(&self, day: u8, slot: Slot) -> bool {
        self.selections.contains(SelectionKey::new(day, slot))
    }

    pub fn shopping_list(&self) -> &Artifact<ShoppingList> {
        &self.shopping_list
    }

    pub fn nutrition(&self) -> &Artifact<NutritionalReport> {
        &self.nutrition
    }

    pub fn recipe(&self, day: u8, slot: Slot) -> Option<&Recipe> {
        self.menu.as_ref().and_then(|m| m.recipe(day, slot))
    }

    /// Marks the start of a menu request. A result installs unless a newer
    /// request already installed its own.
    pub fn begin_menu_request(&mut self) -> MenuRequest {
        self.requested += 1;
        MenuRequest(self.requested)
    }

    /// Replaces the menu and resets the reconciler: selections are re-seeded
    /// with the suggested dish of every day and both artifacts are cleared.
    ///
    /// Returns one image ticket per (day, slot), or `None` when a newer
    /// request installed first and this result was dropped.
    pub fn install_menu(&mut self, request: MenuRequest, menu: Menu) -> Option<Vec<ImageTicket>> {
        if request.0 <= self.installed {
            tracing::debug!(
                request = request.0,
                installed = self.installed,
                "dropping superseded menu"
            );
            return None;
        }

        self.installed = request.0;

        self.generation += 1;
        self.selections.clear();

        let mut tickets = Vec::with_capacity(menu.days.len() * 2);
        for DailyMenu { day, suggested, .. } in &menu.days {
            self.selections
                .insert(*day, Slot::Suggested, suggested.clone());

            for slot in [Slot::Suggested, Slot::Optional] {
                tickets.push(ImageTicket {
                    generation: self.generation,
                    day: *day,
                    slot,
                });
            }
        }

        self.menu = Some(menu);
        self.invalidate();

        Some(tickets)
    }

    /// Sets or clears the selection at (day, slot). Returns whether the
    /// selection changed; a change clears both artifacts.
    pub fn select(&mut self, day: u8, slot: Slot, included: bool) -> Result<bool, PlannerError> {
        let menu = self.menu.as_ref().ok_or(PlannerError::NoMenu)?;
        let recipe = menu
            .recipe(day, slot)
            .ok_or(PlannerError::NotInMenu { day, slot })?;

        let changed = if included {
            self.selections.insert(day, slot, recipe.clone())
        } else {
            self.selections.remove(SelectionKey::new(day, slot))
        };

        if changed {
            self.invalidate();
        }

        Ok(changed)
    }

    /// Applies an image result. Results for another generation are ignored;
    /// selection membership never changes.
    pub fn patch_image(&mut self, ticket: ImageTicket, image: ImageState) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                day = ticket.day,
                slot = %ticket.slot,
                "discarding stale image"
            );
            return false;
        }

        let Some(daily) = self.menu.as_mut().and_then(|m| m.day_mut(ticket.day)) else {
            return false;
        };

        daily.recipe_mut(ticket.slot).image = image.clone();

        if let Some(selection) = self
            .selections
            .get_mut(SelectionKey::new(ticket.day, ticket.slot))
        {
            selection.recipe.image = image;
        }

        true
    }

    /// Builds the shopping list request from the selections in the order they
    /// were made, and marks the list as pending.
    pub fn shopping_list_request(
        &mut self,
    ) -> Result<(ArtifactTicket, ShoppingListRequest), PlannerError> {
        if self.menu.is_none() {
            return Err(PlannerError::NoMenu);
        }

        if self.selections.is_empty() {
            return Err(PlannerError::EmptySelection);
        }

        let dishes = self
            .selections
            .iter()
            .map(|s| Dish {
                name: s.recipe.name.clone(),
                ingredients: s.recipe.ingredients.clone(),
            })
            .collect();

        self.shopping_list = Artifact::Pending;

        Ok((self.ticket(), ShoppingListRequest { dishes }))
    }

    /// Builds the nutrition request, enforcing the coverage policy, and marks
    /// the report as pending.
    pub fn nutrition_request(
        &mut self,
        coverage: NutritionCoverage,
    ) -> Result<(ArtifactTicket, NutritionRequest), PlannerError> {
        let menu = self.menu.as_ref().ok_or(PlannerError::NoMenu)?;

        if self.selections.is_empty() {
            return Err(PlannerError::EmptySelection);
        }

        if coverage == NutritionCoverage::EveryDay {
            let covered = self.selections.days();
            let missing = menu
                .days
                .iter()
                .map(|d| d.day)
                .filter(|day| !covered.contains(day))
                .collect::<Vec<_>>();

            if !missing.is_empty() {
                return Err(PlannerError::IncompleteCoverage { missing });
            }
        }

        let servings = menu.people();
        let recipes = self
            .selections
            .iter()
            .map(|s| NutritionRecipe {
                name: s.recipe.name.clone(),
                ingredients: s.recipe.ingredients.clone(),
                servings,
            })
            .collect();

        self.nutrition = Artifact::Pending;

        Ok((self.ticket(), NutritionRequest { recipes }))
    }

    /// Replaces the shopping list wholesale, unless the selections changed
    /// since the request was built.
    pub fn apply_shopping_list(
        &mut self,
        ticket: ArtifactTicket,
        result: Result<ShoppingList, String>,
    ) -> bool {
        if ticket.revision != self.revision {
            return false;
        }

        self.shopping_list = match result {
            Ok(list) => Artifact::Ready(list),
            Err(message) => Artifact::Failed(message),
        };

        true
    }

    /// Replaces the nutrition report wholesale, unless the selections changed
    /// since the request was built.
    pub fn apply_nutrition(
        &mut self,
        ticket: ArtifactTicket,
        result: Result<NutritionalReport, String>,
    ) -> bool {
        if ticket.revision != self.revision {
            return false;
        }

        self.nutrition = match result {
            Ok(report) => Artifact::Ready(report),
            Err(message) => Artifact::Failed(message),
        };

        true
    }

    fn ticket(&self) -> ArtifactTicket {
        ArtifactTicket {
            revision: self.revision,
        }
    }

    fn invalidate(&mut self) {
        self.revision += 1;
        self.shopping_list = Artifact::NotComputed;
        self.nutrition = Artifact::NotComputed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MenuPreferences, NutritionalDetail, RecipeNutrition};

    fn recipe(name: &str) -> Recipe {
        Recipe::new(name, vec![format!("{name} ingredient: 1 unit")])
    }

    fn menu(days: u8) -> Menu {
        Menu {
            days: (1..=days)
                .map(|day| DailyMenu {
                    day,
                    suggested: recipe(&format!("S{day}")),
                    optional: recipe(&format!("O{day}")),
                })
                .collect(),
            preferences: MenuPreferences {
                days,
                people: 3,
                ..Default::default()
            },
        }
    }

    fn planner_with(days: u8) -> (Planner, Vec<ImageTicket>) {
        let mut planner = Planner::new();
        let request = planner.begin_menu_request();
        let tickets = planner.install_menu(request, menu(days)).unwrap();
        (planner, tickets)
    }

    #[test]
    fn install_seeds_suggested_for_every_day() {
        let (planner, tickets) = planner_with(3);

        let keys = planner.selections().keys().collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![
                SelectionKey::new(1, Slot::Suggested),
                SelectionKey::new(2, Slot::Suggested),
                SelectionKey::new(3, Slot::Suggested),
            ]
        );
        assert_eq!(tickets.len(), 6);
        assert!(tickets.iter().all(|t| t.generation == 1));
    }

    #[test]
    fn superseded_menu_is_dropped() {
        let mut planner = Planner::new();
        let first = planner.begin_menu_request();
        let second = planner.begin_menu_request();

        assert!(planner.install_menu(second, menu(2)).is_some());
        assert!(planner.install_menu(first, menu(5)).is_none());
        assert_eq!(planner.menu().unwrap().days.len(), 2);
        assert_eq!(planner.generation(), 1);
    }

    #[test]
    fn older_menu_installs_while_newer_is_in_flight() {
        let mut planner = Planner::new();
        let first = planner.begin_menu_request();
        let second = planner.begin_menu_request();

        assert!(planner.install_menu(first, menu(5)).is_some());
        assert_eq!(planner.menu().unwrap().days.len(), 5);

        assert!(planner.install_menu(second, menu(2)).is_some());
        assert_eq!(planner.menu().unwrap().days.len(), 2);
        assert_eq!(planner.generation(), 2);
    }

    #[test]
    fn select_rejects_unknown_keys() {
        let mut planner = Planner::new();
        assert_eq!(
            planner.select(1, Slot::Optional, true),
            Err(PlannerError::NoMenu)
        );

        let (mut planner, _) = planner_with(2);
        assert_eq!(
            planner.select(3, Slot::Optional, true),
            Err(PlannerError::NotInMenu {
                day: 3,
                slot: Slot::Optional
            })
        );
    }

    #[test]
    fn selection_change_clears_artifacts() {
        let (mut planner, _) = planner_with(2);

        let (ticket, _) = planner.shopping_list_request().unwrap();
        assert!(planner.shopping_list().is_pending());
        assert!(planner.apply_shopping_list(ticket, Ok(vec!["Arroz: 2 tazas".to_owned()])));
        assert!(planner.shopping_list().ready().is_some());

        assert!(!planner.select(1, Slot::Suggested, true).unwrap());
        assert!(planner.shopping_list().ready().is_some());

        assert!(planner.select(1, Slot::Optional, true).unwrap());
        assert_eq!(planner.shopping_list(), &Artifact::NotComputed);
        assert_eq!(planner.nutrition(), &Artifact::NotComputed);
    }

    #[test]
    fn result_for_old_selection_is_dropped() {
        let (mut planner, _) = planner_with(2);

        let (ticket, _) = planner.shopping_list_request().unwrap();
        planner.select(2, Slot::Suggested, false).unwrap();

        assert!(!planner.apply_shopping_list(ticket, Ok(vec!["stale".to_owned()])));
        assert_eq!(planner.shopping_list(), &Artifact::NotComputed);
    }

    #[test]
    fn failure_clears_prior_artifact() {
        let (mut planner, _) = planner_with(1);

        let detail = NutritionalDetail {
            calories: "400 kcal".to_owned(),
            protein: "20g".to_owned(),
            carbohydrates: "40g".to_owned(),
            fats: "10g".to_owned(),
            split: None,
            key_micronutrients: vec![],
            notes: None,
        };

        let (ticket, _) = planner
            .nutrition_request(NutritionCoverage::EveryDay)
            .unwrap();
        planner.apply_nutrition(
            ticket,
            Ok(vec![RecipeNutrition {
                recipe_name: "S1".to_owned(),
                detail,
            }]),
        );
        assert!(planner.nutrition().ready().is_some());

        let (ticket, _) = planner
            .nutrition_request(NutritionCoverage::EveryDay)
            .unwrap();
        assert!(planner.nutrition().is_pending());
        planner.apply_nutrition(ticket, Err("model returned garbage".to_owned()));

        assert_eq!(planner.nutrition().error(), Some("model returned garbage"));
    }

    #[test]
    fn every_day_coverage_lists_missing_days() {
        let (mut planner, _) = planner_with(3);
        planner.select(2, Slot::Suggested, false).unwrap();

        assert_eq!(
            planner.nutrition_request(NutritionCoverage::EveryDay),
            Err(PlannerError::IncompleteCoverage { missing: vec![2] })
        );

        let (_, request) = planner
            .nutrition_request(NutritionCoverage::AnySelection)
            .unwrap();
        assert_eq!(request.recipes.len(), 2);
        assert!(request.recipes.iter().all(|r| r.servings == 3));
    }

    #[test]
    fn patch_updates_menu_and_selected_copy() {
        let (mut planner, tickets) = planner_with(1);
        let before = planner.selections().keys().collect::<Vec<_>>();

        for ticket in tickets {
            assert!(planner.patch_image(ticket, ImageState::Ready(format!("img-{}", ticket.slot))));
        }

        assert_eq!(planner.selections().keys().collect::<Vec<_>>(), before);
        let selected = planner
            .selections()
            .get(SelectionKey::new(1, Slot::Suggested))
            .unwrap();
        assert_eq!(selected.recipe.image.uri(), Some("img-suggested"));
        assert_eq!(
            planner.recipe(1, Slot::Optional).unwrap().image.uri(),
            Some("img-optional")
        );
    }
}
