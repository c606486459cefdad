// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2026, codegraph authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

use codegraph::arena::Arena;
use codegraph::arena::HandleSet;
use codegraph::arena::SupplementalArena;

#[test]
fn arena_add_returns_distinct_handles_without_deduplicating() {
    let mut arena: Arena<&str> = Arena::new();
    let a = arena.add("hello");
    let b = arena.add("hello");
    assert_ne!(a, b);
    assert_eq!(arena.len(), 2);
    assert_eq!(*arena.get(a), "hello");
    assert_eq!(*arena.get(b), "hello");
}

#[test]
fn arena_iter_handles_is_allocation_order() {
    let mut arena: Arena<i32> = Arena::new();
    let handles: Vec<_> = (0..5).map(|i| arena.add(i)).collect();
    let iterated: Vec<_> = arena.iter_handles().collect();
    assert_eq!(handles, iterated);
}

#[test]
fn supplemental_arena_lookup_on_unset_handle_is_none() {
    let mut arena: Arena<&str> = Arena::new();
    let handle = arena.add("x");
    let supplement: SupplementalArena<&str, u32> = SupplementalArena::new();
    assert_eq!(supplement.get(handle), None);
}

#[test]
fn supplemental_arena_set_then_get_round_trips() {
    let mut arena: Arena<&str> = Arena::new();
    let a = arena.add("a");
    let b = arena.add("b");
    let mut supplement: SupplementalArena<&str, u32> = SupplementalArena::new();
    supplement.set(a, 10);
    assert_eq!(supplement.get(a), Some(&10));
    assert_eq!(supplement.get(b), None);
}

#[test]
fn supplemental_arena_get_mut_or_default_creates_default_once() {
    let mut arena: Arena<&str> = Arena::new();
    let a = arena.add("a");
    let mut supplement: SupplementalArena<&str, Vec<i32>> = SupplementalArena::new();
    supplement.get_mut_or_default(a).push(1);
    supplement.get_mut_or_default(a).push(2);
    assert_eq!(supplement.get(a), Some(&vec![1, 2]));
}

#[test]
fn handle_set_contains_is_false_until_inserted() {
    let mut arena: Arena<&str> = Arena::new();
    let a = arena.add("a");
    let b = arena.add("b");
    let mut set: HandleSet<&str> = HandleSet::new();
    assert!(!set.contains(a));
    assert!(set.insert(a));
    assert!(set.contains(a));
    assert!(!set.contains(b));
}

#[test]
fn handle_set_insert_returns_false_on_repeat() {
    let mut arena: Arena<&str> = Arena::new();
    let a = arena.add("a");
    let mut set: HandleSet<&str> = HandleSet::new();
    assert!(set.insert(a));
    assert!(!set.insert(a));
}

#[test]
fn handle_set_handles_sparse_inserts_out_of_order() {
    let mut arena: Arena<i32> = Arena::new();
    let handles: Vec<_> = (0..10).map(|i| arena.add(i)).collect();
    let mut set: HandleSet<i32> = HandleSet::new();
    set.insert(handles[9]);
    assert!(set.contains(handles[9]));
    for &h in &handles[..9] {
        assert!(!set.contains(h));
    }
}
