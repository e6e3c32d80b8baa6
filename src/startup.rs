use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::config::{DatabaseSettings, Settings};
use crate::content_client::ContentClient;
use crate::domain::variant::Variant;
use crate::gateway::MessagingGateway;
use crate::reconciler::Reconciler;
use crate::registration::Registrar;
use crate::routes::{
    handle_create_subscription, handle_get_fun_facts, handle_rcs_webhook, handle_send_invite,
    health_check, publish_newsletter,
};
use crate::store::{PostgresSubscriberStore, SubscriberStore};

pub struct Application {
    pub port: u16,
    pub server: Server,
}

/// Everything request handlers share. Built once, then cloned into each
/// worker.
pub struct Dependencies {
    pub store: Arc<dyn SubscriberStore>,
    pub gateway: Arc<dyn MessagingGateway>,
    pub content_client: Option<ContentClient>,
    pub variant: Variant,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let store = Arc::new(PostgresSubscriberStore::new(get_connection_db_pool(
            &config.database,
        )));

        Self::build_with_store(config, store).await
    }

    /// Builds the application around an existing store, e.g. the in-memory one.
    pub async fn build_with_store(
        config: Settings,
        store: Arc<dyn SubscriberStore>,
    ) -> Result<Self, std::io::Error> {
        let variant = config.get_variant();
        let gateway = Arc::new(config.rcs_client().map_err(to_io_error)?);
        let content_client = match variant {
            Variant::FunFacts => Some(config.content_client().map_err(to_io_error)?),
            Variant::Arxiv => None,
        };

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            "Server listening on {} as the {} newsletter",
            config.get_address(),
            variant.as_str()
        );

        let server = run(
            listener,
            Dependencies {
                store,
                gateway,
                content_client,
                variant,
            },
        )?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(listener: TcpListener, dependencies: Dependencies) -> Result<Server, std::io::Error> {
    let Dependencies {
        store,
        gateway,
        content_client,
        variant,
    } = dependencies;
    let registrar = web::Data::new(Registrar::new(store.clone(), variant));
    let reconciler = web::Data::new(Reconciler::new(store.clone(), gateway.clone(), variant));
    let store: web::Data<dyn SubscriberStore> = web::Data::from(store);
    let gateway: web::Data<dyn MessagingGateway> = web::Data::from(gateway);
    let content_client = content_client.map(web::Data::new);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        let app = App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/subscriptions", web::post().to(handle_create_subscription))
            .route("/subscriptions/invite", web::post().to(handle_send_invite))
            .route("/webhooks/rcs", web::post().to(handle_rcs_webhook))
            .route("/newsletters", web::post().to(publish_newsletter))
            .app_data(registrar.clone())
            .app_data(reconciler.clone())
            .app_data(store.clone())
            .app_data(gateway.clone());

        match &content_client {
            Some(content_client) => app
                .route("/fun_facts", web::get().to(handle_get_fun_facts))
                .app_data(content_client.clone()),
            None => app,
        }
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> Pool<Postgres> {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.get_db_options())
}

fn to_io_error(err: reqwest::Error) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err)
}
