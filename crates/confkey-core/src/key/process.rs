use std::fmt;

use super::{DynKey, Key};
use crate::error::Result;
use crate::value::Configurable;

type Processor<'c, T> = Box<dyn Fn(T) -> T + 'c>;

/// A key whose values pass through processors.
///
/// The pre-processor runs on every value before it is set, the post-processor on
/// every value after it is read. Either may be absent.
pub struct ProcessedKey<'c, T> {
    key: Key<'c, T>,
    pre: Option<Processor<'c, T>>,
    post: Option<Processor<'c, T>>,
}

impl<'c, T: Configurable> ProcessedKey<'c, T> {
    pub fn new(key: Key<'c, T>) -> Self {
        Self {
            key,
            pre: None,
            post: None,
        }
    }

    pub fn pre_process(mut self, processor: impl Fn(T) -> T + 'c) -> Self {
        self.pre = Some(Box::new(processor));
        self
    }

    pub fn post_process(mut self, processor: impl Fn(T) -> T + 'c) -> Self {
        self.post = Some(Box::new(processor));
        self
    }

    pub fn key(&self) -> &Key<'c, T> {
        &self.key
    }

    pub fn get_value(&self) -> Result<T> {
        let value = self.key.get_value()?;
        Ok(match &self.post {
            Some(post) => post(value),
            None => value,
        })
    }

    pub fn set_value(&self, value: T) -> Result<()> {
        let value = match &self.pre {
            Some(pre) => pre(value),
            None => value,
        };
        self.key.set_value(value)
    }

    pub fn exists(&self) -> bool {
        self.key.exists()
    }
}

impl<'c, T> AsRef<DynKey<'c>> for ProcessedKey<'c, T> {
    fn as_ref(&self) -> &DynKey<'c> {
        self.key.as_ref()
    }
}

impl<T> fmt::Debug for ProcessedKey<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessedKey")
            .field("key", &self.key)
            .field("pre", &self.pre.is_some())
            .field("post", &self.post.is_some())
            .finish()
    }
}
