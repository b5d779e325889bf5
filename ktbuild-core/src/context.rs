//! Request-scoped context passed to build actions.

use std::{any::Any, collections::HashMap, fmt, marker::PhantomData};

use indexmap::IndexMap;
use miette::Diagnostic;
use thiserror::Error;

use crate::Flag;

/// A typed key for a value stored in a [`Context`].
///
/// Keys are identified by name; the type parameter makes reads and writes
/// through the same key agree on the stored type.
pub struct Key<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.name).finish()
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ContextError {
    #[error("required value '{key}' is missing from the compile request")]
    #[diagnostic(code(ktbuild::context::missing))]
    Missing { key: &'static str },

    #[error("value '{key}' is already set for this compile request")]
    #[diagnostic(
        code(ktbuild::context::occupied),
        help("each request slot may only be written once")
    )]
    Occupied { key: &'static str },
}

/// The context of a single compile request.
///
/// Holds the resolved flags in the order they were supplied plus a set of
/// typed slots. A context is created per build action by the caller and
/// discarded once the action returns.
#[derive(Default)]
pub struct Context {
    flags: IndexMap<Flag, String>,
    values: HashMap<&'static str, Box<dyn Any + Send>>,
}

impl Context {
    /// Create a context from resolved flags.
    pub fn new(flags: IndexMap<Flag, String>) -> Self {
        Self {
            flags,
            values: HashMap::new(),
        }
    }

    /// Look up a single flag.
    pub fn flag(&self, flag: Flag) -> Option<&str> {
        self.flags.get(&flag).map(String::as_str)
    }

    /// Copy the requested flags that are present, in the requested order.
    pub fn copy_of_flags(&self, flags: &[Flag]) -> IndexMap<Flag, String> {
        flags
            .iter()
            .filter_map(|flag| self.flags.get(flag).map(|value| (*flag, value.clone())))
            .collect()
    }

    /// Get a value if it has been set.
    pub fn get<T: 'static>(&self, key: &Key<T>) -> Option<&T> {
        self.values.get(key.name)?.downcast_ref()
    }

    /// Get a value that the request is required to carry.
    pub fn must_get<T: 'static>(&self, key: &Key<T>) -> Result<&T, ContextError> {
        self.get(key).ok_or(ContextError::Missing { key: key.name })
    }

    /// Check whether a value has been set.
    pub fn contains<T: 'static>(&self, key: &Key<T>) -> bool {
        self.get(key).is_some()
    }

    /// Store a value. Each slot can be written at most once.
    pub fn put<T: Send + 'static>(&mut self, key: &Key<T>, value: T) -> Result<(), ContextError> {
        if self.values.contains_key(key.name) {
            return Err(ContextError::Occupied { key: key.name });
        }
        self.values.insert(key.name, Box::new(value));
        Ok(())
    }

    /// Remove a value from the context, handing ownership to the caller.
    pub fn take<T: 'static>(&mut self, key: &Key<T>) -> Option<T> {
        let value = self.values.remove(key.name)?;
        match value.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(value) => {
                // Keyed under the same name with another type; leave it in place.
                self.values.insert(key.name, value);
                None
            }
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("Context")
            .field("flags", &self.flags)
            .field("values", &keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMBERS: Key<Vec<u32>> = Key::new("numbers");
    const NAME: Key<String> = Key::new("name");

    fn make_test_context() -> Context {
        let mut flags = IndexMap::new();
        flags.insert(Flag::KotlinJvmTarget, "1.8".to_string());
        flags.insert(Flag::Label, "//app:lib".to_string());
        flags.insert(Flag::Classpath, "a.jar".to_string());
        Context::new(flags)
    }

    #[test]
    fn test_copy_of_flags_uses_requested_order() {
        let ctx = make_test_context();

        let copied = ctx.copy_of_flags(&[
            Flag::Classpath,
            Flag::KotlinApiVersion,
            Flag::KotlinJvmTarget,
        ]);

        let keys: Vec<_> = copied.keys().copied().collect();
        assert_eq!(keys, [Flag::Classpath, Flag::KotlinJvmTarget]);
        assert_eq!(copied[&Flag::Classpath], "a.jar");
    }

    #[test]
    fn test_put_and_get() {
        let mut ctx = make_test_context();
        ctx.put(&NUMBERS, vec![1, 2]).expect("slot should be free");

        assert_eq!(ctx.get(&NUMBERS), Some(&vec![1, 2]));
        assert!(ctx.contains(&NUMBERS));
        assert!(!ctx.contains(&NAME));
    }

    #[test]
    fn test_must_get_missing() {
        let ctx = make_test_context();

        let err = ctx.must_get(&NAME).unwrap_err();
        assert!(matches!(err, ContextError::Missing { key: "name" }));
    }

    #[test]
    fn test_put_twice_is_rejected() {
        let mut ctx = make_test_context();
        ctx.put(&NAME, "first".to_string()).unwrap();

        let err = ctx.put(&NAME, "second".to_string()).unwrap_err();
        assert!(matches!(err, ContextError::Occupied { key: "name" }));
        assert_eq!(ctx.get(&NAME).map(String::as_str), Some("first"));
    }

    #[test]
    fn test_take_moves_value_out() {
        let mut ctx = make_test_context();
        ctx.put(&NAME, "value".to_string()).unwrap();

        assert_eq!(ctx.take(&NAME).as_deref(), Some("value"));
        assert!(ctx.take(&NAME).is_none());
    }

    #[test]
    fn test_mismatched_key_type_is_not_returned() {
        const SHADOW: Key<u8> = Key::new("name");
        let mut ctx = make_test_context();
        ctx.put(&NAME, "value".to_string()).unwrap();

        assert!(ctx.get(&SHADOW).is_none());
        assert!(ctx.take(&SHADOW).is_none());
        assert!(ctx.contains(&NAME));
    }
}
