//! Type descriptors and the conversion from a descriptor to [`Fields`].
//!
//! Rust has no runtime reflection, so the per-field `(name, type, annotation)`
//! triples come from the [`Describe`] trait. `#[derive(Tagged)]` implements it
//! for structs; std types describe themselves as non-records, and pointer-like
//! wrappers describe themselves as a [`TypeDescriptor::Reference`].

use std::any::type_name;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;

use crate::collection::Fields;
use crate::field::Field;
use crate::parser;

/// Shape of a type as far as field extraction is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Record(RecordDescriptor),
    /// `&T`, `Box<T>` and friends.
    Reference(Box<TypeDescriptor>),
    /// Anything that is not a record, named for diagnostics.
    Other(String),
}

impl TypeDescriptor {
    pub fn reference(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Reference(Box::new(inner))
    }

    pub fn other(name: impl Into<String>) -> Self {
        TypeDescriptor::Other(name.into())
    }

    /// The record behind this descriptor, looking through at most one reference.
    pub fn as_record(&self) -> Option<&RecordDescriptor> {
        match self {
            TypeDescriptor::Record(record) => Some(record),
            TypeDescriptor::Reference(inner) => match inner.as_ref() {
                TypeDescriptor::Record(record) => Some(record),
                _ => None,
            },
            TypeDescriptor::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDescriptor {
    pub name: String,
    pub fields: Vec<RawField>,
}

impl RecordDescriptor {
    pub fn new(name: impl Into<String>, fields: Vec<RawField>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// A declared member before its annotation has been parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawField {
    pub name: String,
    pub ty: String,
    /// Raw annotation text, empty when the member has none.
    pub annotation: String,
}

impl RawField {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            annotation: annotation.into(),
        }
    }
}

/// Yields the descriptor of `Self`. Implement it with `#[derive(Tagged)]`.
pub trait Describe {
    fn describe() -> TypeDescriptor;
}

/// Builds the field collection of a record.
///
/// Returns `None` when the descriptor is not a record, or is only a record
/// behind more than one level of reference. A record without members
/// yields `Some` of an empty collection.
pub fn extract(descriptor: &TypeDescriptor) -> Option<Fields> {
    let Some(record) = descriptor.as_record() else {
        log::trace!("not a record, nothing to extract: {descriptor:?}");
        return None;
    };

    let parser = parser::shared();
    Some(
        record
            .fields
            .iter()
            .map(|raw| Field::new(raw.name.clone(), raw.ty.clone(), parser.parse(&raw.annotation)))
            .collect(),
    )
}

/// [`extract`] for a type known at compile time.
pub fn extract_type<T: Describe + ?Sized>() -> Option<Fields> {
    extract(&T::describe())
}

/// [`extract`] for the type of `value`.
pub fn extract_value<T: Describe + ?Sized>(_value: &T) -> Option<Fields> {
    extract_type::<T>()
}

macro_rules! describe_as_other {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::other(type_name::<Self>())
                }
            }
        )*
    };
}

describe_as_other!(
    (), bool, char, str, String, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);

impl<T> Describe for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::other(type_name::<Self>())
    }
}

impl<T> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::other(type_name::<Self>())
    }
}

impl<T> Describe for [T] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::other(type_name::<Self>())
    }
}

impl<T, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::other(type_name::<Self>())
    }
}

impl<K, V, S> Describe for HashMap<K, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::other(type_name::<Self>())
    }
}

impl<K, V> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::other(type_name::<Self>())
    }
}

impl<T, S> Describe for HashSet<T, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::other(type_name::<Self>())
    }
}

impl<T> Describe for BTreeSet<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::other(type_name::<Self>())
    }
}

macro_rules! describe_as_reference {
    ($($ptr:ident),* $(,)?) => {
        $(
            impl<T: Describe + ?Sized> Describe for $ptr<T> {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::reference(T::describe())
                }
            }
        )*
    };
}

describe_as_reference!(Box, Rc, Arc);

impl<T: Describe + ?Sized> Describe for &T {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::reference(T::describe())
    }
}

impl<T: Describe + ?Sized> Describe for &mut T {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::reference(T::describe())
    }
}
