use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::phone_number::PhoneNumber;
use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_name::SubscriberName;
use crate::store::{StoreError, SubscriberStore};

pub struct PostgresSubscriberStore {
    db_pool: PgPool,
}

impl PostgresSubscriberStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriberStore for PostgresSubscriberStore {
    #[tracing::instrument(name = "Fetch a subscriber from the database", skip(self))]
    async fn find(&self, phone_number: &PhoneNumber) -> Result<Option<Subscriber>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT phone_number, name, is_subscribed, created_at
            FROM subscribers
            WHERE phone_number = $1
            "#,
        )
        .bind(phone_number.as_ref())
        .fetch_optional(&self.db_pool)
        .await?;

        row.map(subscriber_from_row).transpose()
    }

    #[tracing::instrument(
        name = "Insert a new subscriber into the database",
        skip(self, new_subscriber),
        fields(phone_number = %new_subscriber.phone_number)
    )]
    async fn insert_if_absent(&self, new_subscriber: &NewSubscriber) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO subscribers (phone_number, name, is_subscribed, created_at)
            VALUES ($1, $2, FALSE, $3)
            ON CONFLICT (phone_number) DO NOTHING
            "#,
        )
        .bind(new_subscriber.phone_number.as_ref())
        .bind(new_subscriber.name.as_ref())
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            err
        })?;

        Ok(result.rows_affected() == 1)
    }

    #[tracing::instrument(
        name = "Upsert a subscriber into the database",
        skip(self, new_subscriber),
        fields(phone_number = %new_subscriber.phone_number)
    )]
    async fn upsert(
        &self,
        new_subscriber: &NewSubscriber,
        subscribed: bool,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO subscribers (phone_number, name, is_subscribed, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (phone_number)
            DO UPDATE SET name = EXCLUDED.name, is_subscribed = EXCLUDED.is_subscribed
            "#,
        )
        .bind(new_subscriber.phone_number.as_ref())
        .bind(new_subscriber.name.as_ref())
        .bind(subscribed)
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            err
        })?;

        Ok(())
    }

    #[tracing::instrument(name = "Update a subscription flag", skip(self))]
    async fn set_subscribed(
        &self,
        phone_number: &PhoneNumber,
        subscribed: bool,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE subscribers
            SET is_subscribed = $2
            WHERE phone_number = $1
            "#,
        )
        .bind(phone_number.as_ref())
        .bind(subscribed)
        .execute(&self.db_pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            err
        })?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(name = "Upsert a subscription flag", skip(self))]
    async fn upsert_subscribed(
        &self,
        phone_number: &PhoneNumber,
        subscribed: bool,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO subscribers (phone_number, is_subscribed, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (phone_number)
            DO UPDATE SET is_subscribed = EXCLUDED.is_subscribed
            "#,
        )
        .bind(phone_number.as_ref())
        .bind(subscribed)
        .bind(Utc::now())
        .execute(&self.db_pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            err
        })?;

        Ok(())
    }

    #[tracing::instrument(name = "Fetch all subscribed numbers", skip(self))]
    async fn list_subscribed(&self) -> Result<Vec<Subscriber>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT phone_number, name, is_subscribed, created_at
            FROM subscribers
            WHERE is_subscribed = TRUE
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        rows.into_iter().map(subscriber_from_row).collect()
    }
}

fn subscriber_from_row(row: PgRow) -> Result<Subscriber, StoreError> {
    let phone_number = PhoneNumber::parse(row.try_get("phone_number")?)
        .map_err(StoreError::Corrupted)?;
    let name = row
        .try_get::<Option<String>, _>("name")?
        .map(SubscriberName::parse)
        .transpose()
        .map_err(StoreError::Corrupted)?;

    Ok(Subscriber {
        phone_number,
        name,
        subscribed: row.try_get("is_subscribed")?,
        created_at: row.try_get("created_at")?,
    })
}
