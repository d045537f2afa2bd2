use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Output derived from the current selections.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Artifact<T> {
    #[default]
    NotComputed,
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> Artifact<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Artifact::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Artifact::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Artifact::Pending)
    }
}

pub type ShoppingList = Vec<String>;

/// Identifies the selection state a derived request was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArtifactTicket {
    pub(crate) revision: u64,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Dish {
    pub name: String,
    pub ingredients: Vec<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ShoppingListRequest {
    pub dishes: Vec<Dish>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NutritionRecipe {
    pub name: String,
    pub ingredients: Vec<String>,
    /// People the ingredient quantities were written for.
    pub servings: u8,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NutritionRequest {
    pub recipes: Vec<NutritionRecipe>,
}

/// How much of the menu must be selected before a nutrition report is requested.
#[derive(
    EnumString, Display, AsRefStr, Serialize, Deserialize, Default, Clone, Copy, Debug, PartialEq, Eq,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NutritionCoverage {
    /// At least one dish.
    AnySelection,
    /// At least one dish on every day of the menu.
    #[default]
    EveryDay,
}
