use std::sync::Arc;

use smartmenu_generation::Generator;
use smartmenu_menu::{ImageState, ImageTicket, Menu};
use tokio::{sync::RwLock, task::JoinHandle};
use tracing::{debug, warn};

use crate::session::SharedPlanner;

/// One image to draw for a freshly installed menu.
#[derive(Debug, Clone)]
pub struct ImageJob {
    pub ticket: ImageTicket,
    pub name: String,
    pub description: String,
}

/// Pairs every ticket with the recipe it points at. Tickets whose recipe is
/// not part of `menu` are skipped.
pub fn image_jobs(menu: &Menu, tickets: Vec<ImageTicket>) -> Vec<ImageJob> {
    tickets
        .into_iter()
        .filter_map(|ticket| {
            let recipe = menu.recipe(ticket.day, ticket.slot)?;
            Some(ImageJob {
                ticket,
                name: recipe.name.to_owned(),
                description: recipe.description.to_owned(),
            })
        })
        .collect()
}

/// Draws one image and patches it into the planner.
///
/// The planner lock is only taken once the provider answered. A failed or
/// empty answer leaves a placeholder.
pub async fn fill_image(generator: &Generator, planner: &SharedPlanner, job: ImageJob) -> bool {
    let description = Some(job.description.as_str()).filter(|d| !d.trim().is_empty());

    let image = match generator.generate_image(&job.name, description).await {
        Ok(Some(uri)) => ImageState::Ready(uri),
        Ok(None) => {
            warn!(recipe = %job.name, "Provider returned no image");
            ImageState::Unavailable
        }
        Err(err) => {
            warn!(recipe = %job.name, err = %err, "Failed to generate image");
            ImageState::Unavailable
        }
    };

    let applied = planner.lock().await.patch_image(job.ticket, image);
    if !applied {
        debug!(recipe = %job.name, "Image arrived for a replaced menu");
    }

    applied
}

/// Spawns one task per job. Each task patches its own slot.
pub fn spawn_image_jobs(
    generator: &Generator,
    planner: &SharedPlanner,
    jobs: Vec<ImageJob>,
) -> Vec<JoinHandle<bool>> {
    jobs.into_iter()
        .map(|job| {
            let generator = generator.clone();
            let planner = planner.clone();
            tokio::spawn(async move { fill_image(&generator, &planner, job).await })
        })
        .collect()
}

/// Banner image shared by every session, drawn once in the background.
#[derive(Clone, Debug, Default)]
pub struct HeroImage(Arc<RwLock<ImageState>>);

impl HeroImage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A hero that is never drawn; pages fall back to the plain banner.
    pub fn disabled() -> Self {
        Self(Arc::new(RwLock::new(ImageState::Unavailable)))
    }

    pub async fn uri(&self) -> Option<String> {
        self.0.read().await.uri().map(str::to_owned)
    }

    pub fn spawn(&self, generator: Generator) -> JoinHandle<()> {
        let hero = self.clone();

        tokio::spawn(async move {
            let state = match generator.generate_hero_image().await {
                Ok(Some(uri)) => ImageState::Ready(uri),
                Ok(None) => ImageState::Unavailable,
                Err(err) => {
                    warn!(err = %err, "Failed to generate hero image");
                    ImageState::Unavailable
                }
            };

            *hero.0.write().await = state;
        })
    }
}
