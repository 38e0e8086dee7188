//! Dtype registry (C5): a process-wide `key -> codec` table with alias
//! resolution and type inference, per spec.md §4.3.

use std::any::TypeId;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::codec::Codec;
use crate::error::{ArrexError, Result};
use crate::error::KeyDisplay;
use crate::value::Value;

/// Maximum alias-chase depth before declaring a cycle (spec.md §3).
const MAX_ALIAS_DEPTH: usize = 8;

/// A dtype key: either a host element-type identity or a layout string.
#[derive(Debug, Clone)]
pub enum DtypeKey {
    Layout(String),
    Type(TypeId, &'static str),
}

impl PartialEq for DtypeKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DtypeKey::Layout(a), DtypeKey::Layout(b)) => a == b,
            (DtypeKey::Type(a, _), DtypeKey::Type(b, _)) => a == b,
            _ => false,
        }
    }
}
impl Eq for DtypeKey {}

impl std::hash::Hash for DtypeKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            DtypeKey::Layout(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            DtypeKey::Type(id, _) => {
                1u8.hash(state);
                id.hash(state);
            }
        }
    }
}

impl std::fmt::Display for DtypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DtypeKey::Layout(s) => write!(f, "layout {s:?}"),
            DtypeKey::Type(_, name) => write!(f, "type {name}"),
        }
    }
}

impl DtypeKey {
    fn to_key_display(&self) -> KeyDisplay {
        KeyDisplay(self.to_string())
    }

    /// A name suitable for serialization round-trips (spec.md §6).
    pub fn wire_name(&self) -> String {
        match self {
            DtypeKey::Layout(s) => s.clone(),
            DtypeKey::Type(_, name) => (*name).to_owned(),
        }
    }
}

enum Entry {
    Codec(Codec),
    Alias(DtypeKey),
}

type AutoHook = Box<dyn Fn(&Value) -> Option<DtypeKey> + Send + Sync>;

struct Registry {
    entries: DashMap<DtypeKey, Entry>,
    write_lock: Mutex<()>,
    auto_hooks: parking_lot::RwLock<Vec<AutoHook>>,
    /// Name -> key index, populated alongside `entries`, used to resolve a
    /// wire-format name (layout string or type name) back into a `DtypeKey`
    /// when deserializing a `TypedList` in a fresh process (spec.md §6).
    by_name: DashMap<String, DtypeKey>,
}

static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry {
    entries: DashMap::new(),
    write_lock: Mutex::new(()),
    auto_hooks: parking_lot::RwLock::new(Vec::new()),
    by_name: DashMap::new(),
});

/// Registers `key` against a codec or, if `codec_or_alias` names an
/// existing key instead, as an alias of it. Re-registering an existing
/// key replaces it atomically (spec.md §4.3: "default is replace").
pub fn declare(key: DtypeKey, codec: Codec) {
    let _guard = REGISTRY.write_lock.lock();
    tracing::debug!(key = %key, "declaring dtype");
    REGISTRY.by_name.insert(key.wire_name(), key.clone());
    REGISTRY.entries.insert(key, Entry::Codec(codec));
}

/// Registers `alias` as pointing at whatever `target` currently resolves
/// to (followed lazily, so re-declaring `target` later is observed).
pub fn declare_alias(alias: DtypeKey, target: DtypeKey) {
    let _guard = REGISTRY.write_lock.lock();
    tracing::debug!(alias = %alias, target = %target, "declaring alias");
    REGISTRY.by_name.insert(alias.wire_name(), alias.clone());
    REGISTRY.entries.insert(alias, Entry::Alias(target));
}

/// Resolves `key` to its codec, following aliases (cycle detection at
/// `MAX_ALIAS_DEPTH`).
pub fn declared(key: &DtypeKey) -> Result<Codec> {
    let mut current = key.clone();
    for _ in 0..MAX_ALIAS_DEPTH {
        let entry = REGISTRY
            .entries
            .get(&current)
            .ok_or_else(|| ArrexError::UnknownDtype(current.to_key_display()))?;
        match &*entry {
            Entry::Codec(codec) => return Ok(codec.clone()),
            Entry::Alias(target) => {
                let target = target.clone();
                drop(entry);
                current = target;
            }
        }
    }
    Err(ArrexError::UnknownDtype(key.to_key_display()))
}

/// Resolves a wire-format name (the layout string or type name recorded by
/// `DtypeKey::wire_name`) back into a codec, for deserialization.
pub fn declared_by_name(name: &str) -> Result<Codec> {
    let key = REGISTRY
        .by_name
        .get(name)
        .map(|e| e.value().clone())
        .ok_or_else(|| ArrexError::UnknownDtype(KeyDisplay(name.to_owned())))?;
    declared(&key)
}

/// Registers a hook consulted by [`infer_from_sample`] when no direct type
/// identity match is available (spec.md §4.3: "scan for a declared 'auto'
/// entry").
pub fn register_auto_hook(hook: AutoHook) {
    REGISTRY.auto_hooks.write().push(hook);
}

/// Infers a codec from a sample [`Value`], trying registered auto-hooks in
/// registration order.
pub fn infer_from_sample(value: &Value) -> Result<Codec> {
    for hook in REGISTRY.auto_hooks.read().iter() {
        if let Some(key) = hook(value) {
            if let Ok(codec) = declared(&key) {
                return Ok(codec);
            }
        }
    }
    Err(ArrexError::UnknownDtype(KeyDisplay(
        "no auto dtype matches the given sample".to_owned(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_codec(layout: &str) -> Codec {
        let size = crate::layout::size_of(layout).unwrap();
        Codec::function(
            size,
            |v| Ok(v.as_i64().unwrap_or_default().to_le_bytes()[..size].to_vec()),
            move |b| {
                let mut buf = [0u8; 8];
                buf[..b.len()].copy_from_slice(b);
                Ok(Value::I64(i64::from_le_bytes(buf)))
            },
            Some(layout.to_owned()),
            None,
        )
        .unwrap()
    }

    #[test]
    fn declare_and_resolve() {
        let key = DtypeKey::Layout("zz-test-h".into());
        declare(key.clone(), number_codec("h"));
        let codec = declared(&key).unwrap();
        assert_eq!(codec.size(), 2);
    }

    #[test]
    fn alias_resolution() {
        let target = DtypeKey::Layout("zz-test-alias-target".into());
        declare(target.clone(), number_codec("i"));
        let alias = DtypeKey::Layout("zz-test-alias".into());
        declare_alias(alias.clone(), target);
        assert_eq!(declared(&alias).unwrap().size(), 4);
    }

    #[test]
    fn cyclic_alias_fails() {
        let a = DtypeKey::Layout("zz-cycle-a".into());
        let b = DtypeKey::Layout("zz-cycle-b".into());
        declare_alias(a.clone(), b.clone());
        declare_alias(b, a.clone());
        assert!(declared(&a).is_err());
    }

    #[test]
    fn unknown_key_fails() {
        let key = DtypeKey::Layout("zz-does-not-exist".into());
        assert!(matches!(declared(&key), Err(ArrexError::UnknownDtype(_))));
    }

    #[test]
    fn auto_inference() {
        let key = DtypeKey::Layout("zz-test-auto-l".into());
        declare(key.clone(), number_codec("l"));
        register_auto_hook(Box::new(|v: &Value| match v {
            Value::I64(_) => Some(DtypeKey::Layout("zz-test-auto-l".into())),
            _ => None,
        }));
        let codec = infer_from_sample(&Value::I64(42)).unwrap();
        assert_eq!(codec.size(), 8);
    }
}
