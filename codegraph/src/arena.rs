// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! Simple arena allocation for code graph data.
//!
//! A code graph is built up of many small, append-only pieces — nodes, files, interned strings —
//! that never need to be removed individually and that benefit from being addressed by a small
//! numeric handle instead of a reference. An [`Arena<T>`] stores every instance of `T` that
//! belongs to a single [`crate::graph::GraphStore`]; a [`Handle<T>`] is a stable index into that
//! arena. Unlike the stack-graphs arena this is adapted from, we do not rely on `unsafe` storage
//! tricks — a code graph has nowhere near the node volume that would make the extra bookkeeping
//! worthwhile, so we keep a plain `Vec<T>` underneath.

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::num::NonZeroU32;
use std::ops::Index;
use std::ops::IndexMut;

use bitvec::vec::BitVec;

/// A handle to an instance of type `T` that was allocated from an [`Arena`].
#[repr(transparent)]
pub struct Handle<T> {
    index: NonZeroU32,
    _phantom: PhantomData<T>,
}

impl<T> Handle<T> {
    fn new(index: NonZeroU32) -> Handle<T> {
        Handle {
            index,
            _phantom: PhantomData,
        }
    }

    #[inline(always)]
    pub fn as_u32(self) -> u32 {
        self.index.get()
    }

    #[inline(always)]
    pub fn as_usize(self) -> usize {
        self.index.get() as usize
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Handle<T> {
        Handle::new(self.index)
    }
}

impl<T> Copy for Handle<T> {}

impl<T> Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Handle").field("index", &self.index).finish()
    }
}

impl<T> Eq for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// Handles are always Send and Sync, even if T is not: a handle is just a number, and you need
// access to the owning Arena (which won't be Send/Sync if T isn't) to dereference it.
unsafe impl<T> Send for Handle<T> {}
unsafe impl<T> Sync for Handle<T> {}

/// Manages the life cycle of instances of type `T`. All of the instances are dropped together
/// when the arena itself is dropped; there is no way to remove a single instance (callers that
/// need to "delete" a node mark it instead, see [`crate::symbols::DupeSet`]).
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Arena<T> {
    pub fn new() -> Arena<T> {
        Arena { items: Vec::new() }
    }

    /// Adds a new instance to this arena, returning a stable handle to it.
    ///
    /// Note that we do not deduplicate instances of `T` in any way: adding two instances with
    /// the same content yields two distinct handles.
    pub fn add(&mut self, item: T) -> Handle<T> {
        self.items.push(item);
        Handle::new(NonZeroU32::new(self.items.len() as u32).unwrap())
    }

    pub fn get(&self, handle: Handle<T>) -> &T {
        &self.items[handle.as_usize() - 1]
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> &mut T {
        &mut self.items[handle.as_usize() - 1]
    }

    /// Returns an iterator of all of the handles in this arena, in allocation order.
    pub fn iter_handles(&self) -> impl Iterator<Item = Handle<T>> + '_ {
        (1..=self.items.len()).map(|index| Handle::new(NonZeroU32::new(index as u32).unwrap()))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena::new()
    }
}

impl<T> Index<Handle<T>> for Arena<T> {
    type Output = T;
    fn index(&self, handle: Handle<T>) -> &T {
        self.get(handle)
    }
}

impl<T> IndexMut<Handle<T>> for Arena<T> {
    fn index_mut(&mut self, handle: Handle<T>) -> &mut T {
        self.get_mut(handle)
    }
}

/// Supplemental, sparse data about instances of `H` that are themselves stored in an
/// [`Arena<H>`]. Looking up a handle that has no supplemental value yet returns `None`;
/// indexing in a mutable context creates a `Default` value on demand, mirroring the ergonomics
/// of the teacher's `SupplementalArena`.
pub struct SupplementalArena<H, T> {
    items: Vec<Option<T>>,
    _phantom: PhantomData<H>,
}

impl<H, T> SupplementalArena<H, T> {
    pub fn new() -> SupplementalArena<H, T> {
        SupplementalArena {
            items: Vec::new(),
            _phantom: PhantomData,
        }
    }

    pub fn get(&self, handle: Handle<H>) -> Option<&T> {
        self.items.get(handle.as_usize() - 1).and_then(|o| o.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle<H>) -> Option<&mut T> {
        self.items.get_mut(handle.as_usize() - 1).and_then(|o| o.as_mut())
    }

    pub fn set(&mut self, handle: Handle<H>, value: T) {
        let index = handle.as_usize() - 1;
        if self.items.len() <= index {
            self.items.resize_with(index + 1, || None);
        }
        self.items[index] = Some(value);
    }
}

impl<H, T: Default> SupplementalArena<H, T> {
    pub fn get_mut_or_default(&mut self, handle: Handle<H>) -> &mut T {
        let index = handle.as_usize() - 1;
        if self.items.len() <= index {
            self.items.resize_with(index + 1, || None);
        }
        if self.items[index].is_none() {
            self.items[index] = Some(T::default());
        }
        self.items[index].as_mut().unwrap()
    }
}

impl<H, T> Default for SupplementalArena<H, T> {
    fn default() -> Self {
        SupplementalArena::new()
    }
}

impl<H, T: Default> Index<Handle<H>> for SupplementalArena<H, T> {
    type Output = T;
    fn index(&self, handle: Handle<H>) -> &T {
        self.get(handle).expect("no supplemental value for handle")
    }
}

impl<H, T: Default> IndexMut<Handle<H>> for SupplementalArena<H, T> {
    fn index_mut(&mut self, handle: Handle<H>) -> &mut T {
        self.get_mut_or_default(handle)
    }
}

/// A set of handles to instances of `T`, encoded as a bitset rather than a hash set (§4.2 "dupe
/// set"): membership checks against a dense handle space are a single bit test instead of a hash
/// and probe, which matters since `is_dupe` is consulted on every use-edge candidate in Pass 2.
pub struct HandleSet<T> {
    elements: BitVec<u32, bitvec::order::Lsb0>,
    _phantom: PhantomData<T>,
}

impl<T> HandleSet<T> {
    pub fn new() -> HandleSet<T> {
        HandleSet::default()
    }

    pub fn contains(&self, handle: Handle<T>) -> bool {
        let index = handle.as_usize();
        self.elements.get(index).map(|bit| *bit).unwrap_or(false)
    }

    /// Adds `handle` to the set, returning `true` if it was not already present.
    pub fn insert(&mut self, handle: Handle<T>) -> bool {
        let index = handle.as_usize();
        if self.elements.len() <= index {
            self.elements.resize(index + 1, false);
        }
        let was_present = self.elements[index];
        self.elements.set(index, true);
        !was_present
    }
}

impl<T> Default for HandleSet<T> {
    fn default() -> HandleSet<T> {
        HandleSet {
            elements: BitVec::default(),
            _phantom: PhantomData,
        }
    }
}

