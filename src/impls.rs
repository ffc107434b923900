// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! [`Navigable`] for standard library types.

use crate::navigable::*;

use core::any::Any;
use core::hash::{BuildHasher, Hash};
use std::collections::{BTreeMap, HashMap, VecDeque};

macro_rules! scalars {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Navigable for $ty {
                fn kind(&self) -> Kind<'_> {
                    Kind::Scalar
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }
            }
        )*
    };
}

scalars!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
    &'static str, (),
);

impl<T: Navigable> Navigable for Option<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Indirection(self.as_ref().map(|v| v as &dyn Navigable))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

macro_rules! pointers {
    ($($ptr:ident)::+) => {
        impl<T: Navigable> Navigable for $($ptr)::+<T> {
            fn kind(&self) -> Kind<'_> {
                Kind::Indirection(Some(&**self as &dyn Navigable))
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

pointers!(Box);
pointers!(std::rc::Rc);
pointers!(std::sync::Arc);

macro_rules! sequence {
    (impl<$t:ident $(, const $n:ident: usize)?> for $ty:ty) => {
        impl<$t: Navigable $(, const $n: usize)?> Navigable for $ty {
            fn kind(&self) -> Kind<'_> {
                Kind::Sequence(self)
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        impl<$t: Navigable $(, const $n: usize)?> Sequence for $ty {
            fn len(&self) -> usize {
                <[$t]>::len(&self[..])
            }

            fn element(&self, index: usize) -> Option<&dyn Navigable> {
                self[..].get(index).map(|v| v as &dyn Navigable)
            }
        }
    };
}

sequence!(impl<T> for Vec<T>);
sequence!(impl<T, const N: usize> for [T; N]);

// The ring buffer of a deque is not contiguous.
impl<T: Navigable> Navigable for VecDeque<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Sequence(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: Navigable> Sequence for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn element(&self, index: usize) -> Option<&dyn Navigable> {
        VecDeque::get(self, index).map(|v| v as &dyn Navigable)
    }
}

impl<K, V, S> Navigable for HashMap<K, V, S>
where
    K: KeyType + Eq + Hash + 'static,
    V: Navigable + Default,
    S: BuildHasher + 'static,
{
    fn kind(&self) -> Kind<'_> {
        Kind::Map(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<K, V, S> Map for HashMap<K, V, S>
where
    K: KeyType + Eq + Hash + 'static,
    V: Navigable + Default,
    S: BuildHasher + 'static,
{
    fn key_kind(&self) -> KeyKind {
        K::KIND
    }

    fn get(&self, key: &MapKey) -> Option<&dyn Navigable> {
        let key = K::from_map_key(key)?;
        HashMap::get(self, &key).map(|v| v as &dyn Navigable)
    }

    fn zero_value(&self) -> Box<dyn Navigable> {
        Box::new(V::default())
    }
}

impl<K, V> Navigable for BTreeMap<K, V>
where
    K: KeyType + Ord + 'static,
    V: Navigable + Default,
{
    fn kind(&self) -> Kind<'_> {
        Kind::Map(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<K, V> Map for BTreeMap<K, V>
where
    K: KeyType + Ord + 'static,
    V: Navigable + Default,
{
    fn key_kind(&self) -> KeyKind {
        K::KIND
    }

    fn get(&self, key: &MapKey) -> Option<&dyn Navigable> {
        let key = K::from_map_key(key)?;
        BTreeMap::get(self, &key).map(|v| v as &dyn Navigable)
    }

    fn zero_value(&self) -> Box<dyn Navigable> {
        Box::new(V::default())
    }
}
