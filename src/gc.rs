//! # Garbage Collector
//!
//! A non-moving, non-incremental mark-and-sweep collector that owns every
//! heap-allocated object — currently only interned strings — and cooperates
//! with the VM, which supplies the root set via [`RootSource`].
//!
//! ## Design
//! The spec (`spec.md` §4.5) describes the classic "intrusive singly-linked
//! list of heap objects, prepend on allocation" shape. This crate expresses
//! the same invariants (O(n) sweep, stable identity, no dangling handles)
//! with a safe slot table instead of raw next-pointers: `Heap::objects` is a
//! `Vec<Option<StringObject>>` indexed by [`StringHandle`], with freed slots
//! recycled through `free_slots`. A handle's validity is guaranteed only
//! between collection points, exactly as the spec's "weak handle" language
//! describes — this crate just expresses that weakness as an index into a
//! vector that sweep may clear, rather than a pointer sweep may dangle.
//!
//! ## String interning
//! `alloc_string` is the sole entry point for turning a `&str` into a
//! [`StringHandle`]. It consults `intern` first: if an equal-content string
//! is already live, its existing handle is returned. Interning keys are the
//! heap-owned bytes (not the caller's borrowed slice), so they remain valid
//! for as long as the corresponding object survives sweep.
//!
//! ## Collection
//! Three phases, run by [`Heap::collect`]:
//! 1. **Mark** — `roots.trace_roots(self)` marks every value reachable from
//!    the operand stack, globals, and the current chunk's constant pool.
//!    Marking is idempotent.
//! 2. **Sweep** — every unmarked slot is freed: removed from `intern`,
//!    dropped, and its index pushed onto `free_slots`; `bytes_allocated` is
//!    adjusted by the exact freed size.
//! 3. **Reset marks** — every surviving slot's mark bit is cleared so the
//!    next cycle starts clean.
//!
//! `next_gc` grows multiplicatively after each collection
//! (`max(HEAP_INIT, live_bytes * GROW_FACTOR)`), resolving the spec's open
//! question in favor of the multiplicative formula (see `SPEC_FULL.md` §9).

use std::collections::HashMap;

use crate::value::Value;

/// Initial/minimum allocation threshold before the first collection, in
/// bytes (1 MiB, per `spec.md` §4.5).
const HEAP_INIT: usize = 1024 * 1024;

/// Threshold growth factor applied to live bytes after each collection.
const GROW_FACTOR: usize = 2;

/// Nominal per-object bookkeeping overhead counted in `bytes_allocated`,
/// standing in for the spec's object header (mark bit + intrusive pointer +
/// kind tag).
const OBJ_HEADER_SIZE: usize = 24;

/// An opaque, `Copy` handle to an interned heap string. Two handles compare
/// equal iff they were produced by the same `alloc_string` call or by calls
/// with byte-equal contents (interning guarantees structural equality
/// implies handle identity).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StringHandle(usize);

struct StringObject {
    marked: bool,
    contents: Box<str>,
}

/// Types that can supply the GC's root set: every value on the VM's operand
/// stack, in its globals table, and in the current chunk's constant pool.
/// [`Roots`] below is the implementation every allocation site actually uses.
pub trait RootSource {
    fn trace_roots(&self, heap: &mut Heap);
}

/// Owner of every heap-allocated object in the interpreter.
pub struct Heap {
    objects: Vec<Option<StringObject>>,
    free_slots: Vec<usize>,
    intern: HashMap<Box<str>, StringHandle>,
    bytes_allocated: usize,
    next_gc: usize,
}

impl Heap {
    pub fn new() -> Self {
        Heap {
            objects: Vec::new(),
            free_slots: Vec::new(),
            intern: HashMap::new(),
            bytes_allocated: 0,
            next_gc: HEAP_INIT,
        }
    }

    fn object_size(contents: &str) -> usize {
        OBJ_HEADER_SIZE + contents.len()
    }

    /// Intern `s`, returning its handle. If an equal string is already on
    /// the heap, its existing handle is returned and nothing is allocated.
    /// Otherwise `s` is copied into a GC-owned buffer and linked in.
    ///
    /// `roots` is consulted to trigger a collection first if the allocation
    /// threshold has been exceeded (the GC-safe point contract of
    /// `spec.md` §4.5/§5: allocation sites are the only points a collection
    /// may occur).
    pub fn alloc_string(&mut self, s: &str, roots: &dyn RootSource) -> StringHandle {
        if let Some(handle) = self.intern.get(s) {
            return *handle;
        }

        if self.bytes_allocated + Self::object_size(s) > self.next_gc {
            self.collect(roots);
        }

        let boxed: Box<str> = s.into();
        let size = Self::object_size(&boxed);
        let object = StringObject {
            marked: false,
            contents: boxed.clone(),
        };

        let handle = if let Some(idx) = self.free_slots.pop() {
            self.objects[idx] = Some(object);
            StringHandle(idx)
        } else {
            self.objects.push(Some(object));
            StringHandle(self.objects.len() - 1)
        };

        self.intern.insert(boxed, handle);
        self.bytes_allocated += size;
        handle
    }

    /// Read back the contents of a string handle.
    ///
    /// # Panics
    /// Panics if `handle` does not refer to a live object. Any handle kept
    /// across an allocation site without being reachable from a root
    /// violates the GC safety contract (`spec.md` §4.5); this is the
    /// Rust-native way that violation surfaces.
    pub fn str(&self, handle: StringHandle) -> &str {
        &self
            .objects
            .get(handle.0)
            .and_then(|slot| slot.as_ref())
            .expect("dangling string handle")
            .contents
    }

    /// Mark the object referenced by `handle`, if not already marked.
    /// Marking is idempotent: already-marked objects are not revisited.
    pub fn mark_handle(&mut self, handle: StringHandle) {
        if let Some(Some(obj)) = self.objects.get_mut(handle.0) {
            obj.marked = true;
        }
    }

    /// Mark `value` if it references a heap object.
    pub fn mark_value(&mut self, value: &Value) {
        if let Value::String(handle) = value {
            self.mark_handle(*handle);
        }
    }

    pub fn bytes_allocated(&self) -> usize {
        self.bytes_allocated
    }

    pub fn next_gc(&self) -> usize {
        self.next_gc
    }

    /// Run a full mark-sweep cycle: mark roots, sweep unreached objects,
    /// reset mark bits, and grow the next threshold.
    pub fn collect(&mut self, roots: &dyn RootSource) {
        roots.trace_roots(self);
        self.sweep();
        for slot in self.objects.iter_mut().flatten() {
            slot.marked = false;
        }
        self.next_gc = std::cmp::max(HEAP_INIT, self.bytes_allocated * GROW_FACTOR);
    }

    fn sweep(&mut self) {
        for idx in 0..self.objects.len() {
            let should_free = matches!(&self.objects[idx], Some(obj) if !obj.marked);
            if should_free {
                if let Some(obj) = self.objects[idx].take() {
                    self.bytes_allocated -= Self::object_size(&obj.contents);
                    self.intern.remove(&obj.contents);
                }
                self.free_slots.push(idx);
            }
        }
    }
}

impl Default for Heap {
    fn default() -> Self {
        Heap::new()
    }
}

/// A [`RootSource`] assembled ad hoc at each allocation site from whatever
/// root groups are live at that point: the operand stack, the globals
/// table (absent at compile time, before any globals exist), and the
/// current chunk's constant pool. This is the trait-object "VM calls a
/// method on a trace-roots interface" shape `spec.md` §9 recommends, built
/// fresh per call instead of stored long-lived, which sidesteps a
/// self-referential borrow between `Heap` and its owner.
pub struct Roots<'a> {
    pub stack: &'a [Value],
    pub globals: Option<&'a HashMap<StringHandle, Value>>,
    pub constants: &'a [Value],
}

impl<'a> RootSource for Roots<'a> {
    fn trace_roots(&self, heap: &mut Heap) {
        for v in self.stack {
            heap.mark_value(v);
        }
        if let Some(globals) = self.globals {
            for v in globals.values() {
                heap.mark_value(v);
            }
        }
        for v in self.constants {
            heap.mark_value(v);
        }
    }
}

#[cfg(test)]
mod tests;
