//! Deterministic provider for tests and offline development.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{GenerationError, LlmProvider, Prompt, prompts};

pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 4 3'%3E%3Crect width='4' height='3' fill='%23f4e1c1'/%3E%3C/svg%3E";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FakeImage {
    #[default]
    Placeholder,
    /// Answers without an image.
    Missing,
    Fail,
}

/// Answers are looked up by prompt name (`menu`, `shopping_list`,
/// `nutrition`). In demo mode prompts without a registered answer get one
/// built from the prompt input.
#[derive(Debug, Default)]
pub struct FakeProvider {
    responses: RwLock<HashMap<String, String>>,
    failures: RwLock<HashSet<String>>,
    image: RwLock<FakeImage>,
    image_delay: RwLock<Duration>,
    delays: RwLock<HashMap<String, Duration>>,
    calls: Mutex<Vec<String>>,
    demo: bool,
}

const DISHES: [(&str, &str); 7] = [
    ("Pastel de choclo", "Porotos granados"),
    ("Cazuela de vacuno", "Charquicán"),
    ("Ají de gallina", "Lentejas con arroz"),
    ("Pescado a lo pobre", "Budín de zapallo italiano"),
    ("Pollo arvejado", "Tortilla de acelga"),
    ("Lomo saltado", "Humitas"),
    ("Merluza frita con ensalada chilena", "Quinotto de champiñones"),
];

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn demo() -> Self {
        Self {
            demo: true,
            ..Self::default()
        }
    }

    pub fn with_response(self, prompt: &str, response: &str) -> Self {
        self.set_response(prompt, response);
        self
    }

    pub fn set_response(&self, prompt: &str, response: &str) {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(prompt.to_owned(), response.to_owned());
    }

    /// Makes every later call of the named prompt fail.
    pub fn fail(&self, prompt: &str) {
        self.failures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(prompt.to_owned());
    }

    pub fn set_image(&self, image: FakeImage) {
        *self.image.write().unwrap_or_else(PoisonError::into_inner) = image;
    }

    pub fn set_image_delay(&self, delay: Duration) {
        *self
            .image_delay
            .write()
            .unwrap_or_else(PoisonError::into_inner) = delay;
    }

    /// Holds every later answer of the named prompt back for `delay`.
    pub fn set_delay(&self, prompt: &str, delay: Duration) {
        self.delays
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(prompt.to_owned(), delay);
    }

    /// Number of calls made for a prompt name, images count as `image`.
    pub fn calls(&self, prompt: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|name| name.as_str() == prompt)
            .count()
    }

    fn record(&self, prompt: &str) -> Result<(), GenerationError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_owned());

        let failing = self
            .failures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(prompt);

        if failing {
            return Err(GenerationError::ApiError {
                status: 503,
                message: format!("fake {prompt} failure"),
            });
        }

        Ok(())
    }

    fn demo_answer(prompt: &Prompt) -> Option<Value> {
        let input = &prompt.input;

        match prompt.name {
            prompts::MENU => {
                let days = input["days"].as_u64().unwrap_or(1);
                let people = input["people"].as_u64().unwrap_or(1);
                let menu = (1..=days)
                    .map(|day| {
                        let (suggested, optional) = DISHES[(day as usize - 1) % DISHES.len()];
                        json!({
                            "day": day,
                            "suggested": demo_recipe(suggested, people),
                            "optional": demo_recipe(optional, people),
                        })
                    })
                    .collect::<Vec<_>>();
                Some(json!({ "menu": menu }))
            }
            prompts::SHOPPING_LIST => {
                let mut list = Vec::<String>::new();
                for dish in input["dishes"].as_array()? {
                    for ingredient in dish["ingredients"].as_array()? {
                        let ingredient = ingredient.as_str()?.to_owned();
                        if !list.contains(&ingredient) {
                            list.push(ingredient);
                        }
                    }
                }
                Some(json!({ "shopping_list": list }))
            }
            prompts::NUTRITION => {
                let report = input["recipes"]
                    .as_array()?
                    .iter()
                    .map(|recipe| {
                        json!({
                            "recipe_name": recipe["name"],
                            "calories": "550 kcal",
                            "protein": "30g",
                            "carbohydrates": "60g",
                            "fats": "20g",
                            "key_micronutrients": ["Hierro: buena fuente", "Vitamina C: moderada"],
                            "notes": "Valores estimados por porción.",
                        })
                    })
                    .collect::<Vec<_>>();
                Some(json!({ "report": report }))
            }
            _ => None,
        }
    }
}

fn demo_recipe(name: &str, people: u64) -> Value {
    json!({
        "name": name,
        "ingredients": [
            format!("Cebolla: {people} unidades"),
            format!("Papas: {} g", people * 200),
            "Aceite de oliva: 2 cucharadas",
        ],
        "instructions": "Picar, sofreír y cocinar a fuego lento hasta que esté listo.",
        "description": format!("{name}, un clásico de la mesa chilena para compartir."),
        "music": "Los Jaivas - Todos juntos",
        "pairing": "Un Carmenere del valle del Colchagua",
    })
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        let delay = self
            .delays
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(prompt.name)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.record(prompt.name)?;

        let registered = self
            .responses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(prompt.name)
            .cloned();

        if let Some(response) = registered {
            return Ok(response);
        }

        if self.demo {
            if let Some(answer) = Self::demo_answer(prompt) {
                return Ok(answer.to_string());
            }
        }

        Err(GenerationError::RequestFailed(format!(
            "no fake response for prompt {}",
            prompt.name
        )))
    }

    async fn image(&self, _prompt: &str) -> Result<Option<String>, GenerationError> {
        let delay = *self.image_delay.read().unwrap_or_else(PoisonError::into_inner);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.record("image")?;

        match *self.image.read().unwrap_or_else(PoisonError::into_inner) {
            FakeImage::Placeholder => Ok(Some(PLACEHOLDER_IMAGE.to_owned())),
            FakeImage::Missing => Ok(None),
            FakeImage::Fail => Err(GenerationError::RequestFailed(
                "fake image failure".to_owned(),
            )),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}
