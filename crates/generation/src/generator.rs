use std::sync::Arc;

use smartmenu_menu::{
    Menu, MenuPreferences, NutritionRequest, NutritionalReport, ShoppingList, ShoppingListRequest,
};
use tracing::{debug, info};

use crate::{
    FakeProvider, GenerationConfig, GenerationError, LlmProvider, OpenAiProvider, ProviderKind,
    prompts, schema,
};

/// The four generation flows of the application.
///
/// Cheap to clone, every clone shares the same provider.
#[derive(Clone, Debug)]
pub struct Generator {
    provider: Arc<dyn LlmProvider>,
    language: String,
    menu_temperature: f32,
}

impl Generator {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        let config = GenerationConfig::default();
        Self {
            provider,
            language: config.output_language,
            menu_temperature: config.menu_temperature,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let provider: Arc<dyn LlmProvider> = match config.provider {
            ProviderKind::Fake => Arc::new(FakeProvider::demo()),
            ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(config)?),
        };

        info!(
            provider = provider.provider_name(),
            model = provider.model_name(),
            "Generation provider ready"
        );

        Ok(Self {
            provider,
            language: config.output_language.clone(),
            menu_temperature: config.menu_temperature,
        })
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    #[tracing::instrument(skip_all, fields(days = preferences.days, people = preferences.people))]
    pub async fn generate_menu(&self, preferences: &MenuPreferences) -> Result<Menu, GenerationError> {
        let prompt = prompts::menu(preferences, &self.language, self.menu_temperature);
        let text = self.provider.complete(&prompt).await?;
        let menu = schema::menu(&text, preferences)?;

        debug!(days = menu.days.len(), "Menu generated");

        Ok(menu)
    }

    /// `Ok(None)` means the provider answered without an image.
    #[tracing::instrument(skip(self, description))]
    pub async fn generate_image(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<String>, GenerationError> {
        self.provider
            .image(&prompts::image(name, description))
            .await
    }

    #[tracing::instrument(skip_all)]
    pub async fn generate_hero_image(&self) -> Result<Option<String>, GenerationError> {
        self.provider.image(&prompts::hero()).await
    }

    #[tracing::instrument(skip_all, fields(dishes = request.dishes.len()))]
    pub async fn create_shopping_list(
        &self,
        request: &ShoppingListRequest,
    ) -> Result<ShoppingList, GenerationError> {
        let prompt = prompts::shopping_list(request, &self.language);
        let text = self.provider.complete(&prompt).await?;

        schema::shopping_list(&text)
    }

    #[tracing::instrument(skip_all, fields(recipes = request.recipes.len()))]
    pub async fn generate_nutrition(
        &self,
        request: &NutritionRequest,
    ) -> Result<NutritionalReport, GenerationError> {
        let prompt = prompts::nutrition(request, &self.language);
        let text = self.provider.complete(&prompt).await?;

        schema::nutrition(&text, request)
    }
}
