// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A polymorphic store that files every item under all of its classes and interfaces.
//!
//! Rust has no runtime reflection over implemented traits, so every class declares
//! its lineage up front in a static [`ClassInfo`] table:
//!
//! ```rust
//! use arbor_core::type_index::{ClassInfo, TypeIndexedCollection, TypeKey};
//!
//! trait Drawable {}
//! struct Widget;
//! struct Sprite;
//!
//! static WIDGET: ClassInfo = ClassInfo::new("Widget", TypeKey::of::<Widget>);
//! static SPRITE: ClassInfo = ClassInfo::new("Sprite", TypeKey::of::<Sprite>)
//!     .extends(&WIDGET)
//!     .implements(&[TypeKey::of::<dyn Drawable>]);
//!
//! let mut index = TypeIndexedCollection::with_root(TypeKey::of::<Widget>());
//! index.insert("hero", &SPRITE);
//! assert_eq!(index.query_all::<dyn Drawable>().count(), 1);
//! ```
//!
//! The flattened key list of a class is computed once and cached, so filing and
//! `is_a` checks only pay for a hash lookup after the first use of a class.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A runtime key for a concrete type or a `dyn Trait` interface.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key of `T`. Works for unsized interface types such as `dyn Trait`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The type name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

/// A static registration table describing one class: its key, its base class and
/// the interfaces it implements.
///
/// All constructors are `const`, so class tables live in `static` items and can
/// reference each other by address.
pub struct ClassInfo {
    name: &'static str,
    key: fn() -> TypeKey,
    base: Option<&'static ClassInfo>,
    interfaces: &'static [fn() -> TypeKey],
}

impl ClassInfo {
    /// Declares a class with no base class and no interfaces.
    pub const fn new(name: &'static str, key: fn() -> TypeKey) -> Self {
        Self {
            name,
            key,
            base: None,
            interfaces: &[],
        }
    }

    /// Sets the base class.
    pub const fn extends(self, base: &'static ClassInfo) -> Self {
        Self {
            base: Some(base),
            ..self
        }
    }

    /// Sets the implemented interfaces.
    pub const fn implements(self, interfaces: &'static [fn() -> TypeKey]) -> Self {
        Self { interfaces, ..self }
    }

    /// The human-readable class name, also used to generate default node names.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The key of the concrete class.
    pub fn key(&self) -> TypeKey {
        (self.key)()
    }

    /// The base class, if any.
    pub fn base(&self) -> Option<&'static ClassInfo> {
        self.base
    }

    /// The interfaces declared directly on this class (not inherited ones).
    pub fn interfaces(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.interfaces.iter().map(|key| key())
    }

    /// Iterates over this class and then each of its base classes.
    pub fn lineage(&self) -> impl Iterator<Item = &ClassInfo> {
        std::iter::successors(Some(self), |class| class.base)
    }

    /// Returns `true` if `self` is `other` or derives from it.
    pub fn is_subclass_of(&self, other: &ClassInfo) -> bool {
        let target = other.key();
        self.lineage().any(|class| class.key() == target)
    }
}

impl fmt::Debug for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field("name", &self.name)
            .field("base", &self.base.map(|base| base.name))
            .field("interfaces", &self.interfaces().collect::<Vec<_>>())
            .finish()
    }
}

/// An index filing each item under every class and interface key of its class.
///
/// Items are lightweight handles (`H`); the collection owns nothing but the index.
/// Queries return items in insertion order.
pub struct TypeIndexedCollection<H> {
    /// Keys at and above this class are not filed.
    root: Option<TypeId>,
    /// Rejects duplicate insertion through a debug assertion when set.
    forbid_duplicates: bool,
    key_cache: RefCell<HashMap<TypeId, Rc<[TypeKey]>>>,
    buckets: HashMap<TypeId, Vec<H>>,
    /// The classes each item was filed with, one entry per insertion.
    members: HashMap<H, Vec<&'static ClassInfo>>,
    filed: usize,
}

impl<H: Clone + Eq + Hash> TypeIndexedCollection<H> {
    /// Creates an empty collection that files every class of the lineage.
    pub fn new() -> Self {
        Self {
            root: None,
            forbid_duplicates: false,
            key_cache: RefCell::new(HashMap::new()),
            buckets: HashMap::new(),
            members: HashMap::new(),
            filed: 0,
        }
    }

    /// Creates an empty collection that stops filing at `root`, exclusive.
    pub fn with_root(root: TypeKey) -> Self {
        Self {
            root: Some(root.id()),
            ..Self::new()
        }
    }

    /// Turns the duplicate-insertion debug assertion on or off.
    pub fn forbid_duplicates(mut self, forbid: bool) -> Self {
        self.forbid_duplicates = forbid;
        self
    }

    /// Files `item` under every key of `class`.
    pub fn insert(&mut self, item: H, class: &'static ClassInfo) {
        if self.forbid_duplicates {
            debug_assert!(
                !self.members.contains_key(&item),
                "item filed twice in TypeIndexedCollection"
            );
        }
        for key in self.keys_for(class).iter() {
            self.buckets.entry(key.id()).or_default().push(item.clone());
        }
        self.members.entry(item).or_default().push(class);
        self.filed += 1;
    }

    /// Removes one filing of `item`.
    ///
    /// Returns `false` if the item is not in the collection.
    pub fn remove(&mut self, item: &H) -> bool {
        let Some(classes) = self.members.get_mut(item) else {
            return false;
        };
        let Some(class) = classes.pop() else {
            return false;
        };
        if classes.is_empty() {
            self.members.remove(item);
        }

        for key in self.keys_for(class).iter() {
            if let Some(bucket) = self.buckets.get_mut(&key.id()) {
                if let Some(position) = bucket.iter().position(|filed| filed == item) {
                    bucket.remove(position);
                }
            }
        }
        self.filed -= 1;
        true
    }

    /// Returns every item assignable to `T`, in insertion order.
    pub fn query_all<T: ?Sized + 'static>(&self) -> std::slice::Iter<'_, H> {
        self.query_key(TypeId::of::<T>())
    }

    /// Returns every item assignable to `T` that satisfies `predicate`, in insertion order.
    pub fn query_all_where<'a, T: ?Sized + 'static>(
        &'a self,
        mut predicate: impl FnMut(&H) -> bool + 'a,
    ) -> impl Iterator<Item = &'a H> + 'a {
        self.query_all::<T>().filter(move |item| predicate(item))
    }

    /// Returns every item filed under `key`, in insertion order.
    pub fn query_key(&self, key: TypeId) -> std::slice::Iter<'_, H> {
        self.buckets
            .get(&key)
            .map(|bucket| bucket.as_slice())
            .unwrap_or(&[])
            .iter()
    }

    /// Returns the number of items assignable to `T`.
    pub fn count<T: ?Sized + 'static>(&self) -> usize {
        self.buckets
            .get(&TypeId::of::<T>())
            .map_or(0, |bucket| bucket.len())
    }

    /// Returns `true` if `item` is filed at least once.
    pub fn contains(&self, item: &H) -> bool {
        self.members.contains_key(item)
    }

    /// Returns the number of filings.
    pub fn len(&self) -> usize {
        self.filed
    }

    /// Returns `true` if nothing is filed.
    pub fn is_empty(&self) -> bool {
        self.filed == 0
    }

    /// Returns `true` if instances of `class` are assignable to `key`.
    ///
    /// The root class is assignable from everything even though it is never filed.
    pub fn is_a(&self, class: &ClassInfo, key: TypeId) -> bool {
        self.root == Some(key) || self.keys_for(class).iter().any(|k| k.id() == key)
    }

    /// Returns the flattened, cached key list of `class`.
    pub fn keys_for(&self, class: &ClassInfo) -> Rc<[TypeKey]> {
        let class_id = class.key().id();
        if let Some(keys) = self.key_cache.borrow().get(&class_id) {
            return Rc::clone(keys);
        }

        let keys: Rc<[TypeKey]> = self.compute_keys(class).into();
        log::trace!(
            "Cached {} index keys for class '{}'.",
            keys.len(),
            class.name()
        );
        self.key_cache
            .borrow_mut()
            .insert(class_id, Rc::clone(&keys));
        keys
    }

    fn compute_keys(&self, class: &ClassInfo) -> Vec<TypeKey> {
        let mut keys: Vec<TypeKey> = Vec::new();
        for ancestor in class.lineage() {
            let key = ancestor.key();
            if Some(key.id()) == self.root {
                break;
            }
            for candidate in std::iter::once(key).chain(ancestor.interfaces()) {
                if !keys.contains(&candidate) {
                    keys.push(candidate);
                }
            }
        }
        keys
    }
}

impl<H: Clone + Eq + Hash> Default for TypeIndexedCollection<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: fmt::Debug> fmt::Debug for TypeIndexedCollection<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeIndexedCollection")
            .field("filed", &self.filed)
            .field("keys", &self.buckets.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Drawable {}
    trait Clickable {}
    trait Animated {}

    struct Widget;
    struct Sprite;
    struct Button;
    struct Timer;

    static WIDGET: ClassInfo = ClassInfo::new("Widget", TypeKey::of::<Widget>)
        .implements(&[TypeKey::of::<dyn Animated>]);
    static SPRITE: ClassInfo = ClassInfo::new("Sprite", TypeKey::of::<Sprite>)
        .extends(&WIDGET)
        .implements(&[TypeKey::of::<dyn Drawable>]);
    static BUTTON: ClassInfo = ClassInfo::new("Button", TypeKey::of::<Button>)
        .extends(&SPRITE)
        .implements(&[TypeKey::of::<dyn Clickable>, TypeKey::of::<dyn Drawable>]);
    static TIMER: ClassInfo = ClassInfo::new("Timer", TypeKey::of::<Timer>).extends(&WIDGET);

    fn collection() -> TypeIndexedCollection<&'static str> {
        TypeIndexedCollection::with_root(TypeKey::of::<Widget>())
    }

    #[test]
    fn test_lineage_and_subclass() {
        assert!(BUTTON.is_subclass_of(&WIDGET));
        assert!(BUTTON.is_subclass_of(&BUTTON));
        assert!(!SPRITE.is_subclass_of(&BUTTON));
        assert_eq!(
            BUTTON.lineage().map(|class| class.name()).collect::<Vec<_>>(),
            vec!["Button", "Sprite", "Widget"]
        );
    }

    #[test]
    fn test_keys_stop_at_root_and_are_deduplicated() {
        let index = collection();
        let keys = index.keys_for(&BUTTON);

        assert_eq!(
            keys.iter().map(|key| key.id()).collect::<Vec<_>>(),
            vec![
                TypeId::of::<Button>(),
                TypeId::of::<dyn Clickable>(),
                TypeId::of::<dyn Drawable>(),
                TypeId::of::<Sprite>(),
            ]
        );
        assert!(!keys.contains(&TypeKey::of::<dyn Animated>()));
    }

    #[test]
    fn test_keys_are_cached_per_class() {
        let index = collection();
        let first = index.keys_for(&SPRITE);
        let second = index.keys_for(&SPRITE);

        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_query_returns_insertion_order() {
        let mut index = collection();
        index.insert("button", &BUTTON);
        index.insert("timer", &TIMER);
        index.insert("sprite", &SPRITE);

        let drawables: Vec<_> = index.query_all::<dyn Drawable>().copied().collect();
        assert_eq!(drawables, vec!["button", "sprite"]);

        let sprites: Vec<_> = index.query_all::<Sprite>().copied().collect();
        assert_eq!(sprites, vec!["button", "sprite"]);

        assert_eq!(index.count::<dyn Clickable>(), 1);
        assert_eq!(index.count::<Timer>(), 1);
        assert_eq!(index.count::<Widget>(), 0);
    }

    #[test]
    fn test_query_with_predicate() {
        let mut index = collection();
        index.insert("ok", &BUTTON);
        index.insert("cancel", &BUTTON);

        let found: Vec<_> = index
            .query_all_where::<dyn Clickable>(|name| name.starts_with('c'))
            .copied()
            .collect();
        assert_eq!(found, vec!["cancel"]);
    }

    #[test]
    fn test_remove_reverses_filing() {
        let mut index = collection();
        index.insert("a", &BUTTON);
        index.insert("b", &SPRITE);

        assert!(index.remove(&"a"));
        assert!(!index.contains(&"a"));
        assert_eq!(index.count::<dyn Clickable>(), 0);
        assert_eq!(
            index.query_all::<dyn Drawable>().copied().collect::<Vec<_>>(),
            vec!["b"]
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_silent() {
        let mut index = collection();
        index.insert("a", &SPRITE);

        assert!(!index.remove(&"missing"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_duplicate_insertion_is_permitted_by_default() {
        let mut index = collection();
        index.insert("a", &SPRITE);
        index.insert("a", &SPRITE);

        assert_eq!(index.count::<Sprite>(), 2);
        assert!(index.remove(&"a"));
        assert!(index.contains(&"a"));
        assert!(index.remove(&"a"));
        assert!(index.is_empty());
    }

    #[test]
    fn test_is_a_includes_root() {
        let index = collection();

        assert!(index.is_a(&TIMER, TypeId::of::<Widget>()));
        assert!(index.is_a(&BUTTON, TypeId::of::<dyn Drawable>()));
        assert!(!index.is_a(&TIMER, TypeId::of::<dyn Drawable>()));
    }

    #[test]
    fn test_without_root_every_ancestor_is_filed() {
        let mut index = TypeIndexedCollection::new();
        index.insert(7u32, &TIMER);

        assert_eq!(index.count::<Widget>(), 1);
        assert_eq!(index.count::<dyn Animated>(), 1);
    }
}
