use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::MenuPreferences;

/// Position of a recipe within a day.
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Suggested,
    Optional,
}

/// Image attached to a recipe after the menu was produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ImageState {
    #[default]
    Pending,
    Ready(String),
    /// Generation failed, the UI shows a placeholder.
    Unavailable,
}

impl ImageState {
    pub fn uri(&self) -> Option<&str> {
        match self {
            ImageState::Ready(uri) => Some(uri.as_str()),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ImageState::Pending)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub description: String,
    pub music: Option<String>,
    pub pairing: Option<String>,
    pub image: ImageState,
}

impl Recipe {
    pub fn new(name: impl Into<String>, ingredients: Vec<String>) -> Self {
        Self {
            name: name.into(),
            ingredients,
            instructions: String::new(),
            description: String::new(),
            music: None,
            pairing: None,
            image: ImageState::Pending,
        }
    }

    pub fn search_links(&self) -> SearchLinks {
        let query = urlencoding::encode(&self.name);

        SearchLinks {
            thermomix: format!("https://www.google.cl/search?q={query}+thermomix"),
            youtube: format!("https://www.youtube.com/results?search_query={query}"),
        }
    }
}

/// Where to look for a video or a Thermomix version of a dish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchLinks {
    pub thermomix: String,
    pub youtube: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DailyMenu {
    pub day: u8,
    pub suggested: Recipe,
    pub optional: Recipe,
}

impl DailyMenu {
    pub fn recipe(&self, slot: Slot) -> &Recipe {
        match slot {
            Slot::Suggested => &self.suggested,
            Slot::Optional => &self.optional,
        }
    }

    pub fn recipe_mut(&mut self, slot: Slot) -> &mut Recipe {
        match slot {
            Slot::Suggested => &mut self.suggested,
            Slot::Optional => &mut self.optional,
        }
    }
}

/// A generated menu together with the preferences it was requested with.
#[derive(Clone, Debug, PartialEq)]
pub struct Menu {
    pub days: Vec<DailyMenu>,
    pub preferences: MenuPreferences,
}

impl Menu {
    pub fn day(&self, day: u8) -> Option<&DailyMenu> {
        self.days.iter().find(|d| d.day == day)
    }

    pub fn day_mut(&mut self, day: u8) -> Option<&mut DailyMenu> {
        self.days.iter_mut().find(|d| d.day == day)
    }

    pub fn recipe(&self, day: u8, slot: Slot) -> Option<&Recipe> {
        self.day(day).map(|d| d.recipe(slot))
    }

    pub fn people(&self) -> u8 {
        self.preferences.people
    }

    pub fn pending_images(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| [&d.suggested, &d.optional])
            .filter(|r| r.image.is_pending())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn slot_round_trips_through_path_segments() {
        assert_eq!(Slot::from_str("suggested").unwrap(), Slot::Suggested);
        assert_eq!(Slot::Optional.to_string(), "optional");
        assert!(Slot::from_str("dinner").is_err());
    }

    #[test]
    fn pending_images_counts_both_slots() {
        let mut day = DailyMenu {
            day: 1,
            suggested: Recipe::new("Pastel de choclo", vec![]),
            optional: Recipe::new("Porotos granados", vec![]),
        };
        day.optional.image = ImageState::Unavailable;

        let menu = Menu {
            days: vec![day],
            preferences: MenuPreferences::default(),
        };

        assert_eq!(menu.pending_images(), 1);
        assert_eq!(
            menu.recipe(1, Slot::Optional).map(|r| r.name.as_str()),
            Some("Porotos granados")
        );
        assert!(menu.recipe(2, Slot::Suggested).is_none());
    }

    #[test]
    fn search_links_encode_the_dish_name() {
        let links = Recipe::new("Ají de gallina", vec![]).search_links();

        assert_eq!(
            links.thermomix,
            "https://www.google.cl/search?q=Aj%C3%AD%20de%20gallina+thermomix"
        );
        assert_eq!(
            links.youtube,
            "https://www.youtube.com/results?search_query=Aj%C3%AD%20de%20gallina"
        );
    }
}
