//! In-memory record store with the same observable semantics as DynamoDB:
//! key-ordered scans, the limit applied before the filter, a page token
//! whenever the scan stops at the limit, conditioned delete, and upserting
//! update. Every handler test runs against this.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::error::PetApiError;
use crate::filter::PetFilter;
use crate::model::Pet;
use crate::update::PetUpdate;

use super::{decode_token, encode_token, PetStore, ScanPage};

#[derive(Default)]
pub struct MemoryPetStore {
    pets: Mutex<BTreeMap<String, Pet>>,
}

impl MemoryPetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.lock().is_empty()
    }
}

#[async_trait]
impl PetStore for MemoryPetStore {
    async fn create(&self, pet: &Pet) -> Result<(), PetApiError> {
        self.pets.lock().insert(pet.pet_id.clone(), pet.clone());
        Ok(())
    }

    async fn get(&self, pet_id: &str) -> Result<Option<Pet>, PetApiError> {
        Ok(self.pets.lock().get(pet_id).cloned())
    }

    async fn scan(
        &self,
        filter: &PetFilter,
        limit: i32,
        start_token: Option<&str>,
    ) -> Result<ScanPage, PetApiError> {
        let start = match start_token {
            Some(token) => Bound::Excluded(decode_token(token)?),
            None => Bound::Unbounded,
        };
        let limit = limit.max(1) as usize;

        let pets_map = self.pets.lock();
        let mut scanned = 0;
        let mut last_key = None;
        let mut pets = Vec::new();
        for (pet_id, pet) in pets_map.range((start, Bound::Unbounded)).take(limit) {
            scanned += 1;
            last_key = Some(pet_id.clone());
            if filter.matches(pet) {
                pets.push(pet.clone());
            }
        }

        // Stopping at the limit means the store cannot know the table is
        // exhausted, so a token is returned either way.
        let next_token = match last_key {
            Some(key) if scanned == limit => Some(encode_token(&key)),
            _ => None,
        };

        Ok(ScanPage { pets, next_token })
    }

    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<Pet>, PetApiError> {
        Ok(self
            .pets
            .lock()
            .values()
            .filter(|pet| pet.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        pet_id: &str,
        update: &PetUpdate,
    ) -> Result<Map<String, Value>, PetApiError> {
        let mut pets = self.pets.lock();
        let pet = pets.entry(pet_id.to_string()).or_insert_with(|| {
            let mut pet = Pet::default();
            pet.pet_id = pet_id.to_string();
            pet
        });
        update.apply(pet);
        Ok(update.updated_attributes())
    }

    async fn delete(&self, pet_id: &str) -> Result<(), PetApiError> {
        match self.pets.lock().remove(pet_id) {
            Some(_) => Ok(()),
            None => Err(PetApiError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn pet(id: &str, owner: &str, price: i64) -> Pet {
        let mut pet = Pet::default();
        pet.pet_id = id.to_string();
        pet.owner_id = owner.to_string();
        pet.price = Decimal::from(price);
        pet
    }

    fn update(body: Value) -> PetUpdate {
        PetUpdate::from_json(body.as_object().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn owner_query_returns_exactly_the_owners_records() {
        let store = MemoryPetStore::new();
        for i in 0..3 {
            store.create(&pet(&format!("a-{i}"), "alice", 100)).await.unwrap();
        }
        for i in 0..2 {
            store.create(&pet(&format!("b-{i}"), "bob", 100)).await.unwrap();
        }

        let pets = store.query_by_owner("alice").await.unwrap();
        assert_eq!(pets.len(), 3);
        assert!(pets.iter().all(|p| p.owner_id == "alice"));
    }

    #[tokio::test]
    async fn pagination_walks_every_record_once() {
        let store = MemoryPetStore::new();
        for i in 0..7 {
            store.create(&pet(&format!("p-{i}"), "alice", 100)).await.unwrap();
        }

        let mut seen = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = store
                .scan(&PetFilter::default(), 3, token.as_deref())
                .await
                .unwrap();
            seen.extend(page.pets.into_iter().map(|p| p.pet_id));
            match page.next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }

        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 7);
    }

    #[tokio::test]
    async fn limit_bounds_records_read_not_returned() {
        let store = MemoryPetStore::new();
        store.create(&pet("p-0", "alice", 50)).await.unwrap();
        store.create(&pet("p-1", "alice", 500)).await.unwrap();
        store.create(&pet("p-2", "alice", 600)).await.unwrap();

        let mut filter = PetFilter::default();
        filter.min_price = Some(Decimal::from(400));

        // Page of 2 scans p-0 and p-1; p-0 is filtered out after the read.
        let page = store.scan(&filter, 2, None).await.unwrap();
        assert_eq!(page.pets.len(), 1);
        assert_eq!(page.pets[0].pet_id, "p-1");
        assert!(page.next_token.is_some());
    }

    #[tokio::test]
    async fn delete_twice_is_ok_then_not_found() {
        let store = MemoryPetStore::new();
        store.create(&pet("p-1", "alice", 100)).await.unwrap();

        store.delete("p-1").await.unwrap();
        assert!(matches!(
            store.delete("p-1").await,
            Err(PetApiError::NotFound)
        ));
    }

    #[tokio::test]
    async fn lifecycle_create_get_update_delete() {
        let store = MemoryPetStore::new();
        let mut rex = Pet::default();
        rex.pet_id = "p-rex".to_string();
        rex.pet_name = "Rex".to_string();
        rex.price = Decimal::new(2505, 1);
        store.create(&rex).await.unwrap();

        let fetched = store.get("p-rex").await.unwrap().unwrap();
        assert_eq!(fetched.pet_name, "Rex");
        assert_eq!(fetched.price, Decimal::new(2505, 1));
        assert_eq!(fetched.pet_type, "Unknown");

        let attrs = store
            .update("p-rex", &update(json!({"price": 300})))
            .await
            .unwrap();
        assert_eq!(attrs["price"], json!(300.0));

        let updated = store.get("p-rex").await.unwrap().unwrap();
        assert_eq!(updated.price, Decimal::from(300));
        assert_eq!(updated.pet_name, "Rex");

        store.delete("p-rex").await.unwrap();
        assert!(store.get("p-rex").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_upserts_like_the_real_store() {
        let store = MemoryPetStore::new();
        store
            .update("ghost", &update(json!({"pet_name": "Casper"})))
            .await
            .unwrap();
        let pet = store.get("ghost").await.unwrap().unwrap();
        assert_eq!(pet.pet_name, "Casper");
        assert_eq!(pet.pet_type, "Unknown");
    }
}
