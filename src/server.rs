use std::time::Duration;

use anyhow::{Context, Result};
use smartmenu_generation::Generator;
use smartmenu_notification::{Notifier, mailer_from_config};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::{images::HeroImage, routes::AppState, session::SessionStore};

/// Builds the shared state from the configuration.
pub fn app_state(config: crate::config::Config) -> Result<AppState> {
    let generator = Generator::from_config(&config.generation)
        .context("Failed to configure the generation provider")?;
    let mailer = mailer_from_config(&config.email).context("Failed to configure email delivery")?;
    let notifier = Notifier::new(mailer);

    Ok(AppState {
        config,
        sessions: SessionStore::new(),
        generator,
        notifier,
        hero: HeroImage::new(),
    })
}

/// The full application: routes plus the cross-cutting layers.
pub fn app(state: AppState) -> axum::Router {
    crate::routes::router(state)
        .layer(axum::middleware::from_fn(
            crate::middleware::cache_control_middleware,
        ))
        .layer(CompressionLayer::new().br(true).gzip(true))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(
    config: crate::config::Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting smartmenu server...");

    // Use CLI overrides if provided, otherwise use config
    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    let idle = Duration::from_secs(config.session.idle_timeout_secs);
    let every = Duration::from_secs(config.session.sweep_interval_secs);
    let hero_image = config.app.hero_image;

    let mut state = app_state(config)?;

    tracing::info!(
        generation = state.generator.provider_name(),
        email = state.notifier.provider_name(),
        "Providers configured"
    );

    let sweeper = state.sessions.spawn_sweeper(idle, every);

    if hero_image {
        state.hero.spawn(state.generator.clone());
    } else {
        state.hero = HeroImage::disabled();
    }

    let app = app(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();

    tracing::info!("Graceful shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(err = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(err = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Starting graceful shutdown...");
}

