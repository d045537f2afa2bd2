use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use validator::Validate;

pub const DEFAULT_DAYS: u8 = 7;
pub const DEFAULT_PEOPLE: u8 = 4;
pub const MAX_DAYS: u8 = 30;
pub const MAX_PEOPLE: u8 = 16;

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Serialize,
    Deserialize,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DietaryPreference {
    /// Omnivore.
    #[default]
    All,
    Vegetarian,
    Vegan,
}

/// What the user asks the generator for. Also the shape persisted in the
/// preferences cookie.
#[derive(Validate, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MenuPreferences {
    #[validate(range(min = 1, max = 30))]
    pub days: u8,
    #[validate(range(min = 1, max = 16))]
    pub people: u8,
    #[serde(default)]
    pub dietary: DietaryPreference,
    #[serde(default)]
    pub gluten_free: bool,
    #[serde(default)]
    pub lactose_free: bool,
}

impl Default for MenuPreferences {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            people: DEFAULT_PEOPLE,
            dietary: DietaryPreference::All,
            gluten_free: false,
            lactose_free: false,
        }
    }
}

impl MenuPreferences {
    /// Reads a persisted JSON blob field by field. Anything missing, out of
    /// range or of the wrong type falls back to its default, and a blob that
    /// is not JSON at all yields the defaults.
    pub fn from_json_lenient(raw: &str) -> Self {
        let defaults = Self::default();

        let Ok(serde_json::Value::Object(saved)) = serde_json::from_str(raw) else {
            tracing::debug!("ignoring unreadable saved preferences");
            return defaults;
        };

        let bounded = |key: &str, max: u8, fallback: u8| {
            saved
                .get(key)
                .and_then(|v| v.as_u64())
                .filter(|v| (1..=max as u64).contains(v))
                .map(|v| v as u8)
                .unwrap_or(fallback)
        };

        let flag = |key: &str| saved.get(key).and_then(|v| v.as_bool()).unwrap_or(false);

        let dietary = saved
            .get("dietary")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();

        Self {
            days: bounded("days", MAX_DAYS, defaults.days),
            people: bounded("people", MAX_PEOPLE, defaults.people),
            dietary,
            gluten_free: flag("gluten_free"),
            lactose_free: flag("lactose_free"),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
