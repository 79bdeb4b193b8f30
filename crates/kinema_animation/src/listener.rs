//! Named listener slots.
//!
//! Channels write animated values into *slots*: fixed-size `f32` buffers
//! registered under a name. Consumers (transforms, lights, cameras) hold
//! [`AnimListener`] handles onto the same slots and read the values back
//! after each tick.
//!
//! Slots are reference counted. Every handle and every bound channel holds
//! one reference; the slot disappears from the registry when the last one
//! is released.
//!
//! Channels may address a single component of a slot with a suffix:
//!
//! ```text
//! "lamp/intensity"    -> whole slot, offset 0
//! "lamp/intensity.G"  -> component 1
//! ```

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use kinema_core::{KinemaError, Result};
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::values::ListenerValue;

new_key_type! {
    pub struct SlotKey;
}

/// The registry as shared between the evaluator and listener handles.
pub type SharedRegistry = Rc<RefCell<ListenerRegistry>>;

#[derive(Debug)]
struct ListenerSlot {
    name: String,
    values: Vec<f32>,
    use_count: usize,
}

/// Maps a component suffix letter to its index.
///
/// Position, color, texture and quaternion naming conventions all alias the
/// same four components.
#[must_use]
pub fn suffix_index(suffix: &str) -> Option<usize> {
    match suffix {
        "X" | "R" | "S" | "U" => Some(0),
        "Y" | "G" | "T" | "V" => Some(1),
        "Z" | "B" | "P" => Some(2),
        "W" | "A" | "Q" => Some(3),
        _ => None,
    }
}

/// Splits `"base.SUFFIX"` into its base name and component offset.
pub fn parse_target(target: &str) -> Result<(&str, usize)> {
    match target.split_once('.') {
        None => Ok((target, 0)),
        Some((base, suffix)) => {
            suffix_index(suffix)
                .map(|offset| (base, offset))
                .ok_or_else(|| KinemaError::UnknownSuffix {
                    target: target.to_string(),
                    suffix: suffix.to_string(),
                })
        }
    }
}

#[derive(Debug, Default)]
pub struct ListenerRegistry {
    slots: SlotMap<SlotKey, ListenerSlot>,
    names: FxHashMap<String, SlotKey>,
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> SharedRegistry {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Gets or creates the slot `name` and takes a reference on it.
    ///
    /// New slots start zeroed. An existing slot must have been created with
    /// the same component count.
    pub fn acquire(&mut self, name: &str, components: usize) -> Result<SlotKey> {
        if let Some(&key) = self.names.get(name) {
            let slot = &mut self.slots[key];
            if slot.values.len() != components {
                log::error!(
                    "Listener '{name}' re-acquired with {components} components, slot has {}",
                    slot.values.len()
                );
                return Err(KinemaError::ComponentMismatch {
                    name: name.to_string(),
                    existing: slot.values.len(),
                    requested: components,
                });
            }
            slot.use_count += 1;
            return Ok(key);
        }

        let key = self.slots.insert(ListenerSlot {
            name: name.to_string(),
            values: vec![0.0; components],
            use_count: 1,
        });
        self.names.insert(name.to_string(), key);
        log::trace!("Created listener '{name}' ({components} components)");
        Ok(key)
    }

    /// Takes another reference on a live slot.
    pub(crate) fn retain(&mut self, key: SlotKey) {
        if let Some(slot) = self.slots.get_mut(key) {
            slot.use_count += 1;
        }
    }

    /// Binds `components` values of an existing slot, addressed by
    /// `"base"` or `"base.SUFFIX"`.
    ///
    /// Never fails: an unresolvable target is logged and yields a scratch
    /// binding whose writes go nowhere.
    pub fn acquire_with_offset(&mut self, target: &str, components: usize) -> SlotBinding {
        match self.resolve(target, components) {
            Ok((key, offset)) => {
                self.slots[key].use_count += 1;
                SlotBinding {
                    target: BindingTarget::Slot {
                        key,
                        name: self.slots[key].name.clone(),
                    },
                    offset,
                    components,
                }
            }
            Err(err) => {
                log::error!("Cannot bind '{target}': {err}");
                SlotBinding::scratch(components)
            }
        }
    }

    fn resolve(&self, target: &str, components: usize) -> Result<(SlotKey, usize)> {
        let (base, offset) = parse_target(target)?;
        let key = *self
            .names
            .get(base)
            .ok_or_else(|| KinemaError::UnknownListener(base.to_string()))?;

        let slot_components = self.slots[key].values.len();
        if offset + components > slot_components {
            return Err(KinemaError::ListenerOverflow {
                target: target.to_string(),
                offset,
                components,
                slot_components,
            });
        }
        Ok((key, offset))
    }

    /// Drops one reference on `name`, erasing the slot at zero.
    pub fn release(&mut self, name: &str) -> Result<()> {
        let Some(&key) = self.names.get(name) else {
            log::error!("Released unknown listener '{name}'");
            return Err(KinemaError::UnknownListener(name.to_string()));
        };

        let slot = &mut self.slots[key];
        slot.use_count -= 1;
        if slot.use_count == 0 {
            self.slots.remove(key);
            self.names.remove(name);
            log::trace!("Freed listener '{name}'");
        }
        Ok(())
    }

    /// Releases the slot reference held by `binding` and detaches it.
    pub fn release_binding(&mut self, binding: &mut SlotBinding) -> Result<()> {
        let detached = SlotBinding::scratch(binding.components);
        match std::mem::replace(binding, detached).target {
            BindingTarget::Slot { name, .. } => self.release(&name),
            BindingTarget::Scratch(_) => Ok(()),
        }
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<SlotKey> {
        self.names.get(name).copied()
    }

    #[must_use]
    pub fn values(&self, key: SlotKey) -> Option<&[f32]> {
        self.slots.get(key).map(|s| s.values.as_slice())
    }

    #[must_use]
    pub fn values_mut(&mut self, key: SlotKey) -> Option<&mut [f32]> {
        self.slots.get_mut(key).map(|s| s.values.as_mut_slice())
    }

    /// Current values of the slot `name`.
    #[must_use]
    pub fn values_by_name(&self, name: &str) -> Option<&[f32]> {
        self.find(name).and_then(|key| self.values(key))
    }

    /// Writes component `index` of a binding.
    pub fn write(&mut self, binding: &mut SlotBinding, index: usize, value: f32) {
        let offset = binding.offset;
        match &mut binding.target {
            BindingTarget::Slot { key, .. } => {
                if let Some(v) = self
                    .slots
                    .get_mut(*key)
                    .and_then(|s| s.values.get_mut(offset + index))
                {
                    *v = value;
                }
            }
            BindingTarget::Scratch(buffer) => {
                if let Some(v) = buffer.get_mut(index) {
                    *v = value;
                }
            }
        }
    }

    #[must_use]
    pub fn use_count(&self, name: &str) -> Option<usize> {
        self.find(name).map(|key| self.slots[key].use_count)
    }

    /// Component count of the slot `name`.
    #[must_use]
    pub fn components(&self, name: &str) -> Option<usize> {
        self.find(name).map(|key| self.slots[key].values.len())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Names of all live slots, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum BindingTarget {
    Slot { key: SlotKey, name: String },
    Scratch(Box<[f32]>),
}

/// Where a channel writes its values.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotBinding {
    target: BindingTarget,
    offset: usize,
    components: usize,
}

impl SlotBinding {
    /// A private buffer that absorbs writes.
    #[must_use]
    pub fn scratch(components: usize) -> Self {
        Self {
            target: BindingTarget::Scratch(vec![0.0; components].into_boxed_slice()),
            offset: 0,
            components,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_scratch(&self) -> bool {
        matches!(self.target, BindingTarget::Scratch(_))
    }

    /// Name of the bound slot, `None` for scratch bindings.
    #[must_use]
    pub fn slot_name(&self) -> Option<&str> {
        match &self.target {
            BindingTarget::Slot { name, .. } => Some(name),
            BindingTarget::Scratch(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    #[must_use]
    pub fn components(&self) -> usize {
        self.components
    }
}

/// Typed handle onto a listener slot.
///
/// Holds one reference on the slot for its whole lifetime; cloning takes
/// another.
pub struct AnimListener<T: ListenerValue> {
    registry: SharedRegistry,
    key: SlotKey,
    name: String,
    _marker: PhantomData<T>,
}

impl<T: ListenerValue> AnimListener<T> {
    /// Acquires the slot `name`, sized for `T`.
    pub fn new(registry: &SharedRegistry, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let key = registry.borrow_mut().acquire(&name, T::COMPONENTS)?;
        Ok(Self {
            registry: Rc::clone(registry),
            key,
            name,
            _marker: PhantomData,
        })
    }

    /// Acquires the slot and stores `value` into it.
    pub fn with_value(registry: &SharedRegistry, name: impl Into<String>, value: T) -> Result<Self> {
        let listener = Self::new(registry, name)?;
        listener.set(value);
        Ok(listener)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> SlotKey {
        self.key
    }

    pub fn set(&self, value: T) {
        let mut registry = self.registry.borrow_mut();
        if let Some(values) = registry.values_mut(self.key) {
            value.write_to(values);
        }
    }

    #[must_use]
    pub fn value(&self) -> T {
        let registry = self.registry.borrow();
        registry
            .values(self.key)
            .map_or_else(T::zeroed, T::read_from)
    }
}

impl<T: ListenerValue> Clone for AnimListener<T> {
    fn clone(&self) -> Self {
        self.registry.borrow_mut().retain(self.key);
        Self {
            registry: Rc::clone(&self.registry),
            key: self.key,
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: ListenerValue> Drop for AnimListener<T> {
    fn drop(&mut self) {
        match self.registry.try_borrow_mut() {
            Ok(mut registry) => {
                let _ = registry.release(&self.name);
            }
            Err(_) => log::error!("Listener '{}' dropped while the registry is borrowed", self.name),
        }
    }
}

impl<T: ListenerValue> fmt::Debug for AnimListener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimListener")
            .field("name", &self.name)
            .field("components", &T::COMPONENTS)
            .finish_non_exhaustive()
    }
}
