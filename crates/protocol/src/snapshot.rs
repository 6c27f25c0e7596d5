//! Semantic snapshot: resolved declarations exported by a compiler front end.
//!
//! Every type reference in the snapshot is already resolved. Places where the front end
//! could not resolve a type carry `None` instead of a [`TypeRef`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SemanticSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default namespace of the analyzed project (display-prefix stripping only)
    #[serde(default)]
    pub default_namespace: String,

    #[serde(default)]
    pub documents: Vec<SourceDocument>,
}

fn default_schema_version() -> u32 {
    SNAPSHOT_SCHEMA_VERSION
}

impl SemanticSnapshot {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SourceDocument {
    pub path: String,

    #[serde(default)]
    pub declarations: Vec<TypeDeclaration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    #[default]
    Class,
    Interface,
    Record,
    Struct,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TypeDeclaration {
    /// Fully qualified name; `None` when the front end could not resolve the declaration
    pub full_name: Option<String>,

    /// Short name as written in source
    pub name: String,

    #[serde(default)]
    pub kind: DeclarationKind,

    pub base_type: Option<TypeRef>,

    #[serde(default)]
    pub interfaces: Vec<TypeRef>,

    #[serde(default)]
    pub members: Vec<Member>,
}

impl TypeDeclaration {
    pub fn is_interface(&self) -> bool {
        self.kind == DeclarationKind::Interface
    }
}

/// Resolved type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    /// The universal root type every class derives from
    Object,

    String,

    /// Built-in value type (int, bool, double, ...)
    Primitive { name: String },

    /// Non-generic type or a generic type definition (`Ns.Repo<T>`)
    Named {
        name: String,
        #[serde(default)]
        value_type: bool,
        #[serde(default)]
        enumerable: bool,
    },

    /// Constructed generic type (`List<Ns.Order>`)
    Generic {
        definition: String,
        #[serde(default)]
        arguments: Vec<TypeRef>,
        #[serde(default)]
        value_type: bool,
        #[serde(default)]
        enumerable: bool,
    },

    Array { element: Box<TypeRef> },

    TypeParameter { name: String },

    Void,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            value_type: false,
            enumerable: false,
        }
    }

    pub fn value(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            value_type: true,
            enumerable: false,
        }
    }

    pub fn generic(definition: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        Self::Generic {
            definition: definition.into(),
            arguments,
            value_type: false,
            enumerable: false,
        }
    }

    /// Constructed collection type, e.g. `List<T>` or `IEnumerable<T>`
    pub fn collection(definition: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        Self::Generic {
            definition: definition.into(),
            arguments,
            value_type: false,
            enumerable: true,
        }
    }

    pub fn array(element: TypeRef) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    pub fn is_root_object(&self) -> bool {
        matches!(self, Self::Object)
    }

    /// Fully qualified name of a non-generic or definition type
    pub fn named_identity(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Self::Object => "object".to_string(),
            Self::String => "string".to_string(),
            Self::Primitive { name } | Self::TypeParameter { name } => name.clone(),
            Self::Named { name, .. } => name.clone(),
            Self::Generic {
                definition,
                arguments,
                ..
            } => {
                let base = definition.split('<').next().unwrap_or(definition);
                let args: Vec<String> = arguments.iter().map(TypeRef::display_name).collect();
                format!("{base}<{}>", args.join(", "))
            }
            Self::Array { element } => format!("{}[]", element.display_name()),
            Self::Void => "void".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Protected,
    Internal,
    ProtectedInternal,
    PrivateProtected,
    #[default]
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        self == Self::Public
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Option<TypeRef>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum Member {
    Field {
        name: String,
        #[serde(rename = "type")]
        ty: Option<TypeRef>,
        #[serde(default)]
        visibility: Visibility,
    },
    Property {
        name: String,
        #[serde(rename = "type")]
        ty: Option<TypeRef>,
        #[serde(default)]
        visibility: Visibility,
    },
    Constructor {
        #[serde(default)]
        parameters: Vec<Parameter>,
        #[serde(default)]
        is_static: bool,
        /// `None` for constructors without a body (extern, generated)
        body: Option<Body>,
    },
    Method {
        name: String,
        #[serde(default)]
        parameters: Vec<Parameter>,
        return_type: Option<TypeRef>,
        #[serde(default)]
        is_static: bool,
        /// `None` for abstract, interface and extern methods
        body: Option<Body>,
    },
}

/// Expressions found inside a member body, flattened in source order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Body {
    #[serde(default)]
    pub expressions: Vec<Expression>,
}

impl Body {
    pub fn new(expressions: Vec<Expression>) -> Self {
        Self { expressions }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TypeTestOperator {
    Is,
    As,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum Expression {
    /// Invocation; `declaring_type` is the type declaring the resolved callee
    Call {
        declaring_type: Option<TypeRef>,
        #[serde(default)]
        type_arguments: Vec<Option<TypeRef>>,
    },
    ObjectCreation {
        created_type: Option<TypeRef>,
    },
    Cast {
        target_type: Option<TypeRef>,
    },
    TypeTest {
        operator: TypeTestOperator,
        target_type: Option<TypeRef>,
    },
    Lambda {
        #[serde(default)]
        parameters: Vec<Option<TypeRef>>,
    },
}
