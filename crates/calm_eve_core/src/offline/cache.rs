use super::controller::{CacheError, CacheResult};
use super::request::{cache_key, Response};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Named cache buckets keyed by request URL.
pub trait CacheStorage: Send + Sync {
    /// Creates the bucket if it does not exist.
    fn open(&self, name: &str) -> CacheResult<()>;

    /// Bucket names in creation order.
    fn keys(&self) -> CacheResult<Vec<String>>;

    /// Returns whether a bucket was removed.
    fn delete(&self, name: &str) -> CacheResult<bool>;

    /// Stores `response` under `url` in bucket `name`, creating the bucket.
    fn put(&self, name: &str, url: &str, response: Response) -> CacheResult<()>;

    /// Stores every pair or none of them.
    fn put_all(&self, name: &str, responses: Vec<(String, Response)>) -> CacheResult<()>;

    fn match_in(&self, name: &str, url: &str) -> CacheResult<Option<Response>>;

    /// First match across all buckets, oldest bucket first.
    fn match_any(&self, url: &str) -> CacheResult<Option<Response>>;
}

type Bucket = BTreeMap<String, Response>;

/// In-process cache storage shared by concurrent fetch handlers.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    buckets: RwLock<Vec<(String, Bucket)>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, read: impl FnOnce(&[(String, Bucket)]) -> T) -> CacheResult<T> {
        let guard = self
            .buckets
            .read()
            .map_err(|_| CacheError::Storage("cache lock poisoned".to_string()))?;
        Ok(read(&guard))
    }

    fn write<T>(&self, write: impl FnOnce(&mut Vec<(String, Bucket)>) -> T) -> CacheResult<T> {
        let mut guard = self
            .buckets
            .write()
            .map_err(|_| CacheError::Storage("cache lock poisoned".to_string()))?;
        Ok(write(&mut guard))
    }
}

fn bucket_mut<'b>(buckets: &'b mut Vec<(String, Bucket)>, name: &str) -> &'b mut Bucket {
    let index = match buckets.iter().position(|(existing, _)| existing == name) {
        Some(index) => index,
        None => {
            buckets.push((name.to_string(), Bucket::new()));
            buckets.len() - 1
        }
    };
    &mut buckets[index].1
}

impl CacheStorage for MemoryCacheStorage {
    fn open(&self, name: &str) -> CacheResult<()> {
        self.write(|buckets| {
            bucket_mut(buckets, name);
        })
    }

    fn keys(&self) -> CacheResult<Vec<String>> {
        self.read(|buckets| buckets.iter().map(|(name, _)| name.clone()).collect())
    }

    fn delete(&self, name: &str) -> CacheResult<bool> {
        self.write(|buckets| {
            let before = buckets.len();
            buckets.retain(|(existing, _)| existing != name);
            buckets.len() != before
        })
    }

    fn put(&self, name: &str, url: &str, response: Response) -> CacheResult<()> {
        self.write(|buckets| {
            bucket_mut(buckets, name).insert(cache_key(url).to_string(), response);
        })
    }

    fn put_all(&self, name: &str, responses: Vec<(String, Response)>) -> CacheResult<()> {
        self.write(|buckets| {
            let bucket = bucket_mut(buckets, name);
            for (url, response) in responses {
                bucket.insert(cache_key(&url).to_string(), response);
            }
        })
    }

    fn match_in(&self, name: &str, url: &str) -> CacheResult<Option<Response>> {
        self.read(|buckets| {
            buckets
                .iter()
                .find(|(existing, _)| existing == name)
                .and_then(|(_, bucket)| bucket.get(cache_key(url)).cloned())
        })
    }

    fn match_any(&self, url: &str) -> CacheResult<Option<Response>> {
        self.read(|buckets| {
            buckets
                .iter()
                .find_map(|(_, bucket)| bucket.get(cache_key(url)).cloned())
        })
    }
}
