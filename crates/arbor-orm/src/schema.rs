//! Schema description values for model attributes and indexes.
//!
//! These types describe what a model's code expects of its backing table.
//! They are plain data, validated by the registry at registration time,
//! and deliberately carry no SQL rendering.

use serde::{Deserialize, Serialize};

/// Attribute data types supported by model definitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    /// Integer (32-bit).
    Integer,
    /// Big integer (64-bit).
    BigInt,
    /// Unbounded text.
    Text,
    /// Variable-length character string.
    Varchar(usize),
    /// Boolean.
    Boolean,
    /// Double-precision float.
    Float,
    /// Date and time.
    DateTime,
    /// JSON document.
    Json,
    /// UUID.
    Uuid,
}

/// Default value for an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum DefaultValue {
    /// No default.
    #[default]
    None,
    /// NULL default.
    Null,
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Int(i64),
    /// Float default.
    Float(f64),
    /// Text default.
    Text(String),
    /// Database-side expression (e.g. `CURRENT_TIMESTAMP`).
    Expression(String),
}

impl DefaultValue {
    /// Returns true when a default exists (anything but [`Self::None`]).
    #[must_use]
    pub const fn is_set(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Description of one model attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDef {
    /// Attribute (column) name.
    pub name: String,
    /// Data type.
    pub attr_type: AttributeType,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Whether this attribute is the primary key.
    pub primary_key: bool,
    /// Whether the value is assigned by the database sequence.
    pub auto_increment: bool,
    /// Whether the attribute carries a UNIQUE constraint.
    pub unique: bool,
    /// Default value.
    pub default: DefaultValue,
}

impl AttributeDef {
    /// Creates a new nullable attribute of the given type.
    #[must_use]
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            nullable: true,
            primary_key: false,
            auto_increment: false,
            unique: false,
            default: DefaultValue::None,
        }
    }

    /// Marks the attribute NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the attribute as the primary key. Primary keys are NOT NULL.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Marks the attribute as database-assigned.
    #[must_use]
    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Marks the attribute UNIQUE.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = value;
        self
    }

    /// Whether the attribute may be omitted from a creation payload.
    ///
    /// Attributes with a default, database-assigned attributes, and
    /// nullable attributes are all omittable at creation time; they are
    /// still always present on a persisted row.
    #[must_use]
    pub const fn creation_optional(&self) -> bool {
        self.auto_increment || self.nullable || self.default.is_set()
    }
}

/// Index method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IndexMethod {
    /// B-tree index (the common default).
    #[default]
    BTree,
    /// Hash index.
    Hash,
    /// Generalized inverted index.
    Gin,
}

impl IndexMethod {
    /// Returns the conventional name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BTree => "BTREE",
            Self::Hash => "HASH",
            Self::Gin => "GIN",
        }
    }
}

/// Description of a named index over model attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    /// Index name.
    pub name: String,
    /// Attributes covered by the index.
    pub fields: Vec<String>,
    /// Index method.
    pub method: IndexMethod,
    /// Whether the index is built without locking writes.
    pub concurrently: bool,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
}

impl IndexDef {
    /// Creates a B-tree index over the given attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            name: name.into(),
            fields,
            method: IndexMethod::BTree,
            concurrently: false,
            unique: false,
        }
    }

    /// Sets the index method.
    #[must_use]
    pub const fn method(mut self, method: IndexMethod) -> Self {
        self.method = method;
        self
    }

    /// Builds the index without locking writes.
    #[must_use]
    pub const fn concurrently(mut self) -> Self {
        self.concurrently = true;
        self
    }

    /// Makes the index unique.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}
