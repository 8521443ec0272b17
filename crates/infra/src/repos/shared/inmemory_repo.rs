use super::repo::DeleteResult;
use certification_tracker_domain::Entity;
use std::sync::Mutex;

/// Useful functions for creating inmemory repositories

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    collection.push(val.clone());
}

/// Replaces the element with the same id, returns false if there was none
pub fn save<K: PartialEq, T: Clone + Entity<K>>(val: &T, collection: &Mutex<Vec<T>>) -> bool {
    let mut collection = collection.lock().unwrap();
    match collection.iter().position(|item| item.id() == val.id()) {
        Some(index) => {
            collection[index] = val.clone();
            true
        }
        None => false,
    }
}

/// Replaces the element with the same id or inserts it if there was none
pub fn upsert<K: PartialEq, T: Clone + Entity<K>>(val: &T, collection: &Mutex<Vec<T>>) {
    if !save(val, collection) {
        insert(val, collection);
    }
}

pub fn find<K: PartialEq, T: Clone + Entity<K>>(val_id: &K, collection: &Mutex<Vec<T>>) -> Option<T> {
    let collection = collection.lock().unwrap();
    collection.iter().find(|item| item.id() == val_id).cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(collection: &Mutex<Vec<T>>, mut compare: F) -> Vec<T> {
    let collection = collection.lock().unwrap();
    let mut items = Vec::new();
    for item in collection.iter() {
        if compare(item) {
            items.push(item.clone());
        }
    }
    items
}

pub fn delete<K: PartialEq, T: Clone + Entity<K>>(val_id: &K, collection: &Mutex<Vec<T>>) -> Option<T> {
    let mut collection = collection.lock().unwrap();
    let index = collection.iter().position(|item| item.id() == val_id)?;
    Some(collection.remove(index))
}

pub fn delete_by<T: Clone, F: Fn(&T) -> bool>(collection: &Mutex<Vec<T>>, compare: F) -> DeleteResult {
    DeleteResult {
        deleted_count: find_and_delete_by(collection, compare).len() as i64,
    }
}

pub fn find_and_delete_by<T: Clone, F: Fn(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    compare: F,
) -> Vec<T> {
    let mut collection = collection.lock().unwrap();
    let mut deleted_items = Vec::new();
    let mut index = 0;
    while index < collection.len() {
        if compare(&collection[index]) {
            deleted_items.push(collection.remove(index));
        } else {
            index += 1;
        }
    }
    deleted_items
}

pub fn update_many<T: Clone, F: Fn(&T) -> bool, U: Fn(&mut T)>(
    collection: &Mutex<Vec<T>>,
    compare: F,
    update: U,
) -> i64 {
    let mut collection = collection.lock().unwrap();
    let mut updated_count = 0;
    for item in collection.iter_mut() {
        if compare(item) {
            update(item);
            updated_count += 1;
        }
    }
    updated_count
}
