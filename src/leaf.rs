use crate::coerce;
use num_bigint::BigInt;
use std::fmt;

/// The closed set of field types that can be read from a single variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LeafKind {
    Bool,
    Int,
    Uint(u32),
    String,
    BigInt,
    OptionalBigInt,
    StringList,
    IntList,
}

impl LeafKind {
    /// Human-readable description of the value a variable must hold
    pub fn expected(&self) -> String {
        match self {
            Self::Bool => r#""true" or "false""#.to_string(),
            Self::Int => "a base-10 int".to_string(),
            Self::Uint(bits) => format!("a base-10 uint{bits}"),
            Self::String => "any string".to_string(),
            Self::BigInt | Self::OptionalBigInt => "a base-10 big integer".to_string(),
            Self::StringList => "a comma-separated list of strings".to_string(),
            Self::IntList => "a comma-separated list of ints".to_string(),
        }
    }
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Uint(bits) => write!(f, "uint{bits}"),
            Self::String => write!(f, "string"),
            Self::BigInt => write!(f, "big integer"),
            Self::OptionalBigInt => write!(f, "optional big integer"),
            Self::StringList => write!(f, "string list"),
            Self::IntList => write!(f, "int list"),
        }
    }
}

/// A field type that is parsed directly from one environment variable
///
/// Implemented only for the supported kinds, so a record declaring any
/// other leaf type fails to compile.
pub trait Leaf: Sized {
    const KIND: LeafKind;

    fn coerce(raw: &str) -> Result<Self, String>;

    /// Value as printed by the logger
    fn render(&self) -> String;
}

impl Leaf for bool {
    const KIND: LeafKind = LeafKind::Bool;

    fn coerce(raw: &str) -> Result<Self, String> {
        coerce::parse_bool(raw)
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl Leaf for isize {
    const KIND: LeafKind = LeafKind::Int;

    fn coerce(raw: &str) -> Result<Self, String> {
        coerce::parse_int(raw)
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

macro_rules! uint_leaf {
    ($($ty:ty => $bits:literal),*) => {
        $(
            impl Leaf for $ty {
                const KIND: LeafKind = LeafKind::Uint($bits);

                fn coerce(raw: &str) -> Result<Self, String> {
                    coerce::parse_uint(raw, $bits)
                }

                fn render(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

uint_leaf!(u8 => 8, u16 => 16, u32 => 32, u64 => 64);

impl Leaf for String {
    const KIND: LeafKind = LeafKind::String;

    fn coerce(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn render(&self) -> String {
        format!("{self:?}")
    }
}

impl Leaf for BigInt {
    const KIND: LeafKind = LeafKind::BigInt;

    fn coerce(raw: &str) -> Result<Self, String> {
        coerce::parse_big_int(raw)
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl Leaf for Option<BigInt> {
    const KIND: LeafKind = LeafKind::OptionalBigInt;

    fn coerce(raw: &str) -> Result<Self, String> {
        coerce::parse_big_int(raw).map(Some)
    }

    fn render(&self) -> String {
        match self {
            Some(value) => value.to_string(),
            None => "none".to_string(),
        }
    }
}

impl Leaf for Vec<String> {
    const KIND: LeafKind = LeafKind::StringList;

    fn coerce(raw: &str) -> Result<Self, String> {
        Ok(coerce::parse_string_list(raw))
    }

    fn render(&self) -> String {
        format!("{self:?}")
    }
}

impl Leaf for Vec<isize> {
    const KIND: LeafKind = LeafKind::IntList;

    fn coerce(raw: &str) -> Result<Self, String> {
        coerce::parse_int_list(raw)
    }

    fn render(&self) -> String {
        format!("{self:?}")
    }
}

/// Type-erased access to one leaf of a record
///
/// Visitors receive leaves through this trait, which lets a single
/// traversal hand out fields of different types.
pub trait Slot {
    fn kind(&self) -> LeafKind;

    /// Parse `raw` and overwrite the value. On failure the value is untouched.
    fn assign(&mut self, raw: &str) -> Result<(), String>;

    fn render(&self) -> String;
}

impl<T: Leaf> Slot for T {
    fn kind(&self) -> LeafKind {
        T::KIND
    }

    fn assign(&mut self, raw: &str) -> Result<(), String> {
        *self = T::coerce(raw)?;
        Ok(())
    }

    fn render(&self) -> String {
        Leaf::render(self)
    }
}
