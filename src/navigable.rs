// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::any::Any;
use core::fmt;

use num_bigint::BigInt;

/// A value that path expressions can navigate into.
///
/// Implementations exist for the common standard library types (see the
/// `impls` module), for the dynamic [`Value`](crate::Value) tree, and can be
/// generated for user structs with [`navigable_record!`](crate::navigable_record).
pub trait Navigable: Any {
    /// Structural kind of the value, with access to its contents.
    fn kind(&self) -> Kind<'_>;

    fn as_any(&self) -> &dyn Any;

    /// Name used in error messages.
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl fmt::Debug for dyn Navigable + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {}>", self.kind().name(), self.type_name())
    }
}

/// Structural kind of a [`Navigable`] value.
pub enum Kind<'a> {
    /// Pointer, reference or optional wrapper. `None` is a nil indirection.
    Indirection(Option<&'a dyn Navigable>),
    Record(&'a dyn Record),
    Sequence(&'a dyn Sequence),
    Map(&'a dyn Map),
    Scalar,
}

impl Kind<'_> {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Indirection(_) => "indirection",
            Self::Record(_) => "record",
            Self::Sequence(_) => "sequence",
            Self::Map(_) => "map",
            Self::Scalar => "scalar",
        }
    }
}

/// Named fields.
pub trait Record {
    /// Looks up a field by its exact declared name.
    fn field(&self, name: &str) -> Option<&dyn Navigable>;
}

/// Index addressable elements.
pub trait Sequence {
    fn len(&self) -> usize;

    fn element(&self, index: usize) -> Option<&dyn Navigable>;
}

/// Key to value association.
pub trait Map {
    /// Representation that index constants are converted to before lookup.
    fn key_kind(&self) -> KeyKind;

    fn get(&self, key: &MapKey) -> Option<&dyn Navigable>;

    /// Value returned in place of an absent key.
    fn zero_value(&self) -> Box<dyn Navigable>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
}

macro_rules! int_kind_bounds {
    ($self:expr, $($kind:ident => $ty:ty),* $(,)?) => {
        match $self {
            $(IntKind::$kind => (BigInt::from(<$ty>::MIN), BigInt::from(<$ty>::MAX)),)*
        }
    };
}

impl IntKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::Usize => "usize",
        }
    }

    /// Inclusive range of representable values.
    pub fn bounds(self) -> (BigInt, BigInt) {
        int_kind_bounds!(self,
            I8 => i8, I16 => i16, I32 => i32, I64 => i64, I128 => i128, Isize => isize,
            U8 => u8, U16 => u16, U32 => u32, U64 => u64, U128 => u128, Usize => usize,
        )
    }

    pub fn contains(self, value: &BigInt) -> bool {
        let (min, max) = self.bounds();
        &min <= value && value <= &max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatKind {
    F32,
    F64,
}

/// Declared key representation of a [`Map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Bool,
    Int(IntKind),
    Float(FloatKind),
    /// Unicode scalar value, addressed by an integer code point.
    Char,
    String,
    /// Any constant kind is accepted as is.
    Dynamic,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int(k) => f.write_str(k.name()),
            Self::Float(FloatKind::F32) => f.write_str("f32"),
            Self::Float(FloatKind::F64) => f.write_str("f64"),
            Self::Char => f.write_str("char"),
            Self::String => f.write_str("string"),
            Self::Dynamic => f.write_str("dynamic key"),
        }
    }
}

/// A map key after conversion to the map's [`KeyKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapKey {
    Bool(bool),
    Int(BigInt),
    Float(f64),
    Char(char),
    String(String),
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Char(c) => write!(f, "{c:?}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// Concrete key types of standard maps.
pub trait KeyType: Sized {
    const KIND: KeyKind;

    /// Recovers the key from its converted form. `None` when the key can not
    /// be one of this type.
    fn from_map_key(key: &MapKey) -> Option<Self>;
}

impl KeyType for bool {
    const KIND: KeyKind = KeyKind::Bool;

    fn from_map_key(key: &MapKey) -> Option<Self> {
        match key {
            MapKey::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl KeyType for char {
    const KIND: KeyKind = KeyKind::Char;

    fn from_map_key(key: &MapKey) -> Option<Self> {
        match key {
            MapKey::Char(c) => Some(*c),
            _ => None,
        }
    }
}

impl KeyType for String {
    const KIND: KeyKind = KeyKind::String;

    fn from_map_key(key: &MapKey) -> Option<Self> {
        match key {
            MapKey::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

macro_rules! int_key_types {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl KeyType for $ty {
                const KIND: KeyKind = KeyKind::Int(IntKind::$kind);

                fn from_map_key(key: &MapKey) -> Option<Self> {
                    match key {
                        MapKey::Int(i) => <$ty>::try_from(i).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

int_key_types!(
    i8 => I8, i16 => I16, i32 => I32, i64 => I64, i128 => I128, isize => Isize,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64, u128 => U128, usize => Usize,
);

/// Implements [`Navigable`] and [`Record`] for a struct, exposing the listed
/// fields under their declared names.
///
/// ```ignore
/// struct Server {
///     name: String,
///     ports: Vec<u16>,
/// }
/// navpath::navigable_record!(Server { name, ports });
/// ```
#[macro_export]
macro_rules! navigable_record {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Navigable for $ty {
            fn kind(&self) -> $crate::Kind<'_> {
                $crate::Kind::Record(self)
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }
        }

        impl $crate::Record for $ty {
            fn field(&self, name: &str) -> ::core::option::Option<&dyn $crate::Navigable> {
                match name {
                    $(::core::stringify!($field) => ::core::option::Option::Some(&self.$field),)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };
}
