use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::phone_number::PhoneNumber;
use crate::domain::subscriber::Subscriber;
use crate::store::{StoreError, SubscriberStore};

/// Process-local store for running the service without Postgres.
#[derive(Default)]
pub struct InMemorySubscriberStore {
    subscribers: Mutex<HashMap<PhoneNumber, Subscriber>>,
}

impl InMemorySubscriberStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<PhoneNumber, Subscriber>>, StoreError> {
        self.subscribers.lock().map_err(|_| StoreError::Unavailable)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }
}

#[async_trait]
impl SubscriberStore for InMemorySubscriberStore {
    async fn find(&self, phone_number: &PhoneNumber) -> Result<Option<Subscriber>, StoreError> {
        Ok(self.lock()?.get(phone_number).cloned())
    }

    async fn insert_if_absent(&self, new_subscriber: &NewSubscriber) -> Result<bool, StoreError> {
        let mut subscribers = self.lock()?;

        if subscribers.contains_key(&new_subscriber.phone_number) {
            return Ok(false);
        }

        subscribers.insert(
            new_subscriber.phone_number.clone(),
            Subscriber {
                phone_number: new_subscriber.phone_number.clone(),
                name: Some(new_subscriber.name.clone()),
                subscribed: false,
                created_at: Utc::now(),
            },
        );

        Ok(true)
    }

    async fn upsert(
        &self,
        new_subscriber: &NewSubscriber,
        subscribed: bool,
    ) -> Result<(), StoreError> {
        self.lock()?
            .entry(new_subscriber.phone_number.clone())
            .and_modify(|subscriber| {
                subscriber.name = Some(new_subscriber.name.clone());
                subscriber.subscribed = subscribed;
            })
            .or_insert_with(|| Subscriber {
                phone_number: new_subscriber.phone_number.clone(),
                name: Some(new_subscriber.name.clone()),
                subscribed,
                created_at: Utc::now(),
            });

        Ok(())
    }

    async fn set_subscribed(
        &self,
        phone_number: &PhoneNumber,
        subscribed: bool,
    ) -> Result<bool, StoreError> {
        match self.lock()?.get_mut(phone_number) {
            Some(subscriber) => {
                subscriber.subscribed = subscribed;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn upsert_subscribed(
        &self,
        phone_number: &PhoneNumber,
        subscribed: bool,
    ) -> Result<(), StoreError> {
        self.lock()?
            .entry(phone_number.clone())
            .and_modify(|subscriber| subscriber.subscribed = subscribed)
            .or_insert_with(|| Subscriber {
                phone_number: phone_number.clone(),
                name: None,
                subscribed,
                created_at: Utc::now(),
            });

        Ok(())
    }

    async fn list_subscribed(&self) -> Result<Vec<Subscriber>, StoreError> {
        let mut subscribed: Vec<Subscriber> = self
            .lock()?
            .values()
            .filter(|subscriber| subscriber.subscribed)
            .cloned()
            .collect();

        subscribed.sort_by_key(|subscriber| subscriber.created_at);

        Ok(subscribed)
    }
}
