use claim::{assert_none, assert_some};
use rcs_newsletter::{
    config::{get_configuration, DatabaseSettings},
    domain::{new_subscriber::NewSubscriber, phone_number::PhoneNumber},
    startup::get_connection_db_pool,
    store::{PostgresSubscriberStore, SubscriberStore},
};
use sqlx::{migrate, Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

use crate::helpers::ADA;

async fn configure_db(db_config: &mut DatabaseSettings) -> PgPool {
    let db_test_name = format!("db_{}", Uuid::new_v4().to_string().replace('-', "_"));

    // Create database
    let mut connection = PgConnection::connect_with(&db_config.get_server_options())
        .await
        .expect("Failed to connect to Postgres.");

    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, db_test_name))
        .await
        .expect("Failed to create database.");

    connection
        .close()
        .await
        .expect("Failed to close connection.");

    // Execute migrations
    db_config.set_name(db_test_name);

    let db_pool = get_connection_db_pool(db_config);

    migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run migrations.");

    db_pool
}

async fn postgres_store() -> PostgresSubscriberStore {
    let mut config = get_configuration().expect("Missing configuration file.");

    PostgresSubscriberStore::new(configure_db(&mut config.database).await)
}

fn subscriber(name: &str, number: &str) -> NewSubscriber {
    NewSubscriber::parse(name.to_string(), number.to_string()).unwrap()
}

fn ada() -> PhoneNumber {
    PhoneNumber::parse(ADA.to_string()).unwrap()
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn insert_if_absent_inserts_exactly_once() {
    let store = postgres_store().await;

    assert!(store.insert_if_absent(&subscriber("Ada", ADA)).await.unwrap());
    assert!(!store.insert_if_absent(&subscriber("Grace", ADA)).await.unwrap());

    let stored = assert_some!(store.find(&ada()).await.unwrap());

    assert_eq!(stored.name.unwrap().as_ref(), "Ada");
    assert!(!stored.subscribed);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn concurrent_registrations_insert_one_row() {
    let store = postgres_store().await;
    let first = subscriber("Ada", ADA);
    let second = subscriber("Grace", ADA);

    let (first, second) = tokio::join!(
        store.insert_if_absent(&first),
        store.insert_if_absent(&second)
    );

    assert!(first.unwrap() ^ second.unwrap());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn set_subscribed_only_touches_existing_rows() {
    let store = postgres_store().await;

    assert!(!store.set_subscribed(&ada(), true).await.unwrap());
    assert_none!(store.find(&ada()).await.unwrap());

    store.insert_if_absent(&subscriber("Ada", ADA)).await.unwrap();

    assert!(store.set_subscribed(&ada(), true).await.unwrap());
    assert!(assert_some!(store.find(&ada()).await.unwrap()).subscribed);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn upserts_create_and_overwrite_rows() {
    let store = postgres_store().await;

    store.upsert_subscribed(&ada(), true).await.unwrap();
    let created = assert_some!(store.find(&ada()).await.unwrap());
    assert!(created.subscribed);
    assert_none!(created.name);

    store.upsert(&subscriber("Ada", ADA), false).await.unwrap();
    let overwritten = assert_some!(store.find(&ada()).await.unwrap());
    assert!(!overwritten.subscribed);
    assert_eq!(overwritten.name.unwrap().as_ref(), "Ada");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn list_subscribed_returns_only_subscribed_rows() {
    let store = postgres_store().await;

    store.insert_if_absent(&subscriber("Ada", ADA)).await.unwrap();
    store
        .upsert(&subscriber("Grace", "+15557654321"), true)
        .await
        .unwrap();

    let subscribed = store.list_subscribed().await.unwrap();

    assert_eq!(subscribed.len(), 1);
    assert_eq!(subscribed[0].phone_number.as_ref(), "+15557654321");
}
