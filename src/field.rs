use crate::leaf::{LeafKind, Slot};

/// Static description of one field of a record
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    /// Local key fragment, joined onto the parent key with `_`
    pub tag: &'static str,
    pub shape: Shape,
}

/// Whether a field is parsed from a variable or recursed into
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Leaf(LeafKind),
    /// Layout of the nested record
    Branch(fn() -> &'static [FieldDef]),
}

impl FieldDef {
    pub const fn leaf(tag: &'static str, kind: LeafKind) -> Self {
        Self {
            tag,
            shape: Shape::Leaf(kind),
        }
    }

    pub const fn branch(tag: &'static str, layout: fn() -> &'static [FieldDef]) -> Self {
        Self {
            tag,
            shape: Shape::Branch(layout),
        }
    }
}

/// Mutable view of one field, handed out in declaration order
pub enum FieldMut<'a> {
    Leaf(&'static str, &'a mut dyn Slot),
    /// `None` when an optional nested record has not been allocated
    Branch(&'static str, Option<&'a mut dyn Record>),
}

/// Shared view of one field, handed out in declaration order
pub enum FieldRef<'a> {
    Leaf(&'static str, &'a dyn Slot),
    Branch(&'static str, Option<&'a dyn Record>),
}

/// A struct whose fields can be bound to environment variables
///
/// Implement it with `#[derive(Record)]`:
///
/// ```rust
/// use env_configs::Record;
///
/// #[derive(Default, Record)]
/// struct Database {
///     #[env(key = "HOST")]
///     host: String,
///     #[env(key = "PORT")]
///     port: u16,
/// }
///
/// #[derive(Default, Record)]
/// struct Config {
///     #[env(key = "DEBUG")]
///     debug: bool,
///     #[env(key = "DB", nested)]
///     database: Database,
/// }
///
/// let mut config = Config::default();
/// env_configs::load(&mut config, "APP").unwrap();
/// ```
///
/// `APP_DEBUG`, `APP_DB_HOST` and `APP_DB_PORT` are read into `config`.
pub trait Record {
    /// Field table for this record type, in declaration order
    fn layout() -> &'static [FieldDef]
    where
        Self: Sized;

    fn fields(&self) -> Vec<FieldRef<'_>>;

    fn fields_mut(&mut self) -> Vec<FieldMut<'_>>;
}
