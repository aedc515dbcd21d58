//! Local Data Source
//!
//! The callback a group falls back to when no peer serves a key.

use async_trait::async_trait;

use crate::error::Result;

// == Getter ==
/// Loads the value for a key from the backing data source.
///
/// This is the only place the surrounding application supplies real data.
/// A missing key should be reported as `CacheError::NotFound`.
#[async_trait]
pub trait Getter: Send + Sync {
    async fn get(&self, key: &str) -> Result<Vec<u8>>;
}

// == Getter Func ==
/// Adapts a plain closure into a [`Getter`].
///
/// ```ignore
/// let getter = GetterFunc::new(|key: &str| Ok(key.as_bytes().to_vec()));
/// ```
pub struct GetterFunc<F>(F);

impl<F> GetterFunc<F>
where
    F: Fn(&str) -> Result<Vec<u8>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Getter for GetterFunc<F>
where
    F: Fn(&str) -> Result<Vec<u8>> + Send + Sync,
{
    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        (self.0)(key)
    }
}
