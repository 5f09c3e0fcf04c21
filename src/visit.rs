//! Depth-first traversal over the leaves of a [`Record`].
//!
//! Every leaf is visited in declaration order, nested records included,
//! and every visitor failure is collected under its environment key. A
//! failing leaf never stops the walk.

use crate::error::{SchemaError, TraversalError, VisitError};
use crate::field::{FieldMut, FieldRef, Record};
use crate::key::derive_key;
use crate::leaf::Slot;
use crate::schema;

/// Per-leaf action that may modify the leaf
pub trait Visitor {
    fn visit(&mut self, key: &str, slot: &mut dyn Slot) -> Result<(), VisitError>;
}

impl<F> Visitor for F
where
    F: FnMut(&str, &mut dyn Slot) -> Result<(), VisitError>,
{
    fn visit(&mut self, key: &str, slot: &mut dyn Slot) -> Result<(), VisitError> {
        self(key, slot)
    }
}

/// Per-leaf action with read-only access
pub trait Inspector {
    fn inspect(&mut self, key: &str, slot: &dyn Slot) -> Result<(), VisitError>;
}

impl<F> Inspector for F
where
    F: FnMut(&str, &dyn Slot) -> Result<(), VisitError>,
{
    fn inspect(&mut self, key: &str, slot: &dyn Slot) -> Result<(), VisitError> {
        self(key, slot)
    }
}

/// Run `visitor` on every leaf of `record`
///
/// # Panics
/// If the record's schema is invalid or an optional nested record is
/// `None`. See [`SchemaError`].
pub fn visit<R, V>(record: &mut R, prefix: &str, visitor: &mut V) -> Result<(), TraversalError>
where
    R: Record,
    V: Visitor + ?Sized,
{
    assert_schema(&*record, prefix);
    let mut errors = None;
    walk_mut(record, prefix, visitor, &mut errors);
    errors.map_or(Ok(()), Err)
}

/// Run `inspector` on every leaf of `record` without modifying it
///
/// # Panics
/// Under the same conditions as [`visit`].
pub fn inspect<R, I>(record: &R, prefix: &str, inspector: &mut I) -> Result<(), TraversalError>
where
    R: Record,
    I: Inspector + ?Sized,
{
    assert_schema(record, prefix);
    let mut errors = None;
    walk_ref(record, prefix, inspector, &mut errors);
    errors.map_or(Ok(()), Err)
}

/// Rejects a broken schema before any visitor runs, so a panic never
/// leaves the record partly written
fn assert_schema<R: Record>(record: &R, prefix: &str) {
    if let Err(e) = schema::schema::<R>(prefix) {
        panic!("{}", e);
    }
    assert_branches_allocated(record, prefix);
}

fn assert_branches_allocated(record: &dyn Record, prefix: &str) {
    for field in record.fields() {
        match field {
            FieldRef::Branch(tag, Some(nested)) => {
                assert_branches_allocated(nested, &derive_key(prefix, tag));
            }
            FieldRef::Branch(tag, None) => missing_branch(prefix, tag),
            FieldRef::Leaf(..) => {}
        }
    }
}

fn collect(errors: &mut Option<TraversalError>, key: &str, err: VisitError) {
    match errors {
        Some(existing) => existing.record(key, err),
        None => *errors = Some(TraversalError::from_visit(key, err)),
    }
}

fn walk_mut<V>(
    record: &mut dyn Record,
    prefix: &str,
    visitor: &mut V,
    errors: &mut Option<TraversalError>,
) where
    V: Visitor + ?Sized,
{
    for field in record.fields_mut() {
        match field {
            FieldMut::Leaf(tag, slot) => {
                let key = derive_key(prefix, tag);
                if let Err(e) = visitor.visit(&key, slot) {
                    collect(errors, &key, e);
                }
            }
            FieldMut::Branch(tag, Some(nested)) => {
                walk_mut(nested, &derive_key(prefix, tag), visitor, errors);
            }
            FieldMut::Branch(tag, None) => missing_branch(prefix, tag),
        }
    }
}

fn walk_ref<I>(
    record: &dyn Record,
    prefix: &str,
    inspector: &mut I,
    errors: &mut Option<TraversalError>,
) where
    I: Inspector + ?Sized,
{
    for field in record.fields() {
        match field {
            FieldRef::Leaf(tag, slot) => {
                let key = derive_key(prefix, tag);
                if let Err(e) = inspector.inspect(&key, slot) {
                    collect(errors, &key, e);
                }
            }
            FieldRef::Branch(tag, Some(nested)) => {
                walk_ref(nested, &derive_key(prefix, tag), inspector, errors);
            }
            FieldRef::Branch(tag, None) => missing_branch(prefix, tag),
        }
    }
}

fn missing_branch(prefix: &str, tag: &str) -> ! {
    panic!(
        "{}",
        SchemaError::MissingBranch {
            key: derive_key(prefix, tag),
        }
    )
}
