use std::sync::LazyLock;

use regex::Regex;

static GRAMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:[.,]\d+)?)").expect("valid grams pattern"));

const KCAL_PER_GRAM_PROTEIN: f32 = 4.0;
const KCAL_PER_GRAM_CARBOHYDRATES: f32 = 4.0;
const KCAL_PER_GRAM_FATS: f32 = 9.0;

/// Share of energy coming from each macronutrient, in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MacroSplit {
    pub protein: f32,
    pub carbohydrates: f32,
    pub fats: f32,
}

impl MacroSplit {
    /// Derives the split from gram amounts written like "30g" or "12,5 g".
    pub fn from_grams(protein: &str, carbohydrates: &str, fats: &str) -> Option<Self> {
        let protein = parse_grams(protein)? * KCAL_PER_GRAM_PROTEIN;
        let carbohydrates = parse_grams(carbohydrates)? * KCAL_PER_GRAM_CARBOHYDRATES;
        let fats = parse_grams(fats)? * KCAL_PER_GRAM_FATS;

        let total = protein + carbohydrates + fats;
        if total <= 0.0 {
            return None;
        }

        Some(Self {
            protein: protein / total * 100.0,
            carbohydrates: carbohydrates / total * 100.0,
            fats: fats / total * 100.0,
        })
    }
}

fn parse_grams(value: &str) -> Option<f32> {
    let captures = GRAMS.captures(value)?;
    captures[1].replace(',', ".").parse().ok()
}

#[derive(Clone, Debug, PartialEq)]
pub struct NutritionalDetail {
    pub calories: String,
    pub protein: String,
    pub carbohydrates: String,
    pub fats: String,
    pub split: Option<MacroSplit>,
    pub key_micronutrients: Vec<String>,
    pub notes: Option<String>,
}

impl NutritionalDetail {
    /// Fills the macro split from the gram strings when the generator left it out.
    pub fn with_derived_split(mut self) -> Self {
        if self.split.is_none() {
            self.split = MacroSplit::from_grams(&self.protein, &self.carbohydrates, &self.fats);
        }
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecipeNutrition {
    pub recipe_name: String,
    pub detail: NutritionalDetail,
}

/// Per person figures for each selected recipe.
pub type NutritionalReport = Vec<RecipeNutrition>;

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(protein: &str, carbohydrates: &str, fats: &str) -> NutritionalDetail {
        NutritionalDetail {
            calories: "500 kcal".to_owned(),
            protein: protein.to_owned(),
            carbohydrates: carbohydrates.to_owned(),
            fats: fats.to_owned(),
            split: None,
            key_micronutrients: vec![],
            notes: None,
        }
    }

    #[test]
    fn split_is_energy_weighted() {
        let split = MacroSplit::from_grams("25g", "50 g", "0g").unwrap();
        assert!((split.protein - 33.333).abs() < 0.01);
        assert!((split.carbohydrates - 66.666).abs() < 0.01);
        assert_eq!(split.fats, 0.0);
    }

    #[test]
    fn decimal_comma_is_accepted() {
        let split = MacroSplit::from_grams("10,5 g", "10.5g", "0 g").unwrap();
        assert!((split.protein - 50.0).abs() < 0.01);
    }

    #[test]
    fn unparsable_grams_leave_split_empty() {
        assert!(detail("a lot", "40g", "10g").with_derived_split().split.is_none());
        assert!(detail("0g", "0g", "0g").with_derived_split().split.is_none());
    }

    #[test]
    fn provided_split_is_kept() {
        let provided = MacroSplit {
            protein: 20.0,
            carbohydrates: 50.0,
            fats: 30.0,
        };
        let mut d = detail("30g", "40g", "10g");
        d.split = Some(provided);

        assert_eq!(d.with_derived_split().split, Some(provided));
    }
}
