#![forbid(unsafe_code)]

/// Generic names that resolve to `Generic` even without type parameters.
pub const BUILTIN_GENERICS: &[&str] = &["lista", "tabula", "copia", "promissum", "cursor", "fluxus"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveName {
    Textus,
    Numerus,
    Bivalens,
    Nihil,
    Vacuum,
}

impl PrimitiveName {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveName::Textus => "textus",
            PrimitiveName::Numerus => "numerus",
            PrimitiveName::Bivalens => "bivalens",
            PrimitiveName::Nihil => "nihil",
            PrimitiveName::Vacuum => "vacuum",
        }
    }

    /// Case-insensitive lookup of a primitive by its Latin name.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            PrimitiveName::Textus,
            PrimitiveName::Numerus,
            PrimitiveName::Bivalens,
            PrimitiveName::Nihil,
            PrimitiveName::Vacuum,
        ]
        .into_iter()
        .find(|p| p.as_str().eq_ignore_ascii_case(name))
    }
}

/// Ownership modifier carried by a primitive annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Owned value (`Proprius`).
    Proprius,
    /// Borrowed value (`Alienus`).
    Alienus,
}

impl Ownership {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ownership::Proprius => "Proprius",
            Ownership::Alienus => "Alienus",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimitiveType {
    pub name: PrimitiveName,
    pub nullable: bool,
    /// Bit width from annotations such as `numerus<32>`.
    pub size: Option<u32>,
    pub unsigned: bool,
    pub ownership: Option<Ownership>,
    pub mutable: bool,
}

impl PrimitiveType {
    pub fn new(name: PrimitiveName) -> Self {
        PrimitiveType {
            name,
            nullable: false,
            size: None,
            unsigned: false,
            ownership: None,
            mutable: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericType {
    pub name: String,
    pub type_parameters: Vec<SemanticType>,
    pub nullable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionType {
    pub parameter_types: Vec<SemanticType>,
    pub return_type: Box<SemanticType>,
    pub is_async: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserType {
    pub name: String,
    pub nullable: bool,
}

/// The resolved type of an expression or declaration.
///
/// `Unknown` is a real variant rather than an absent value: every node always
/// carries some type, and `Unknown` is compatible with everything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SemanticType {
    Primitive(PrimitiveType),
    Generic(GenericType),
    Function(FunctionType),
    Union { types: Vec<SemanticType> },
    Unknown { reason: Option<String> },
    User(UserType),
}

impl Default for SemanticType {
    fn default() -> Self {
        SemanticType::unknown()
    }
}

impl SemanticType {
    pub fn primitive(name: PrimitiveName) -> Self {
        let mut p = PrimitiveType::new(name);
        // `nihil` is the null value itself, so it always admits null.
        p.nullable = name == PrimitiveName::Nihil;
        SemanticType::Primitive(p)
    }

    pub fn nullable_primitive(name: PrimitiveName) -> Self {
        SemanticType::primitive(name).with_nullable(true)
    }

    pub fn textus() -> Self {
        SemanticType::primitive(PrimitiveName::Textus)
    }

    pub fn numerus() -> Self {
        SemanticType::primitive(PrimitiveName::Numerus)
    }

    pub fn bivalens() -> Self {
        SemanticType::primitive(PrimitiveName::Bivalens)
    }

    pub fn nihil() -> Self {
        SemanticType::primitive(PrimitiveName::Nihil)
    }

    pub fn vacuum() -> Self {
        SemanticType::primitive(PrimitiveName::Vacuum)
    }

    pub fn generic(name: impl Into<String>, type_parameters: Vec<SemanticType>) -> Self {
        SemanticType::Generic(GenericType {
            name: name.into(),
            type_parameters,
            nullable: false,
        })
    }

    pub fn lista(elem: SemanticType) -> Self {
        SemanticType::generic("lista", vec![elem])
    }

    pub fn promissum(inner: SemanticType) -> Self {
        SemanticType::generic("promissum", vec![inner])
    }

    pub fn function(parameter_types: Vec<SemanticType>, return_type: SemanticType, is_async: bool) -> Self {
        SemanticType::Function(FunctionType {
            parameter_types,
            return_type: Box::new(return_type),
            is_async,
        })
    }

    /// Builds a union, splicing nested unions into one flat member list.
    pub fn union(types: Vec<SemanticType>) -> Self {
        let mut flat = Vec::with_capacity(types.len());
        for t in types {
            match t {
                SemanticType::Union { types: inner } => flat.extend(inner),
                other => flat.push(other),
            }
        }
        SemanticType::Union { types: flat }
    }

    pub fn unknown() -> Self {
        SemanticType::Unknown { reason: None }
    }

    pub fn unknown_because(reason: impl Into<String>) -> Self {
        SemanticType::Unknown {
            reason: Some(reason.into()),
        }
    }

    pub fn user(name: impl Into<String>) -> Self {
        SemanticType::User(UserType {
            name: name.into(),
            nullable: false,
        })
    }

    /// Returns a copy with the nullable flag set. Types without a nullable
    /// flag (functions, unions, unknown) are returned unchanged.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        match &mut self {
            SemanticType::Primitive(p) => p.nullable = nullable,
            SemanticType::Generic(g) => g.nullable = nullable,
            SemanticType::User(u) => u.nullable = nullable,
            SemanticType::Function(_) | SemanticType::Union { .. } | SemanticType::Unknown { .. } => {}
        }
        self
    }

    pub fn nullable(&self) -> bool {
        match self {
            SemanticType::Primitive(p) => p.nullable,
            SemanticType::Generic(g) => g.nullable,
            SemanticType::User(u) => u.nullable,
            SemanticType::Union { types } => types.iter().any(|t| t.nullable()),
            SemanticType::Function(_) => false,
            SemanticType::Unknown { .. } => true,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SemanticType::Unknown { .. })
    }

    pub fn is_primitive(&self, name: PrimitiveName) -> bool {
        matches!(self, SemanticType::Primitive(p) if p.name == name)
    }

    pub fn primitive_name(&self) -> Option<PrimitiveName> {
        match self {
            SemanticType::Primitive(p) => Some(p.name),
            _ => None,
        }
    }

    /// `(name, params)` for generic types, e.g. `("lista", [numerus])`.
    pub fn generic_parts(&self) -> Option<(&str, &[SemanticType])> {
        match self {
            SemanticType::Generic(g) => Some((g.name.as_str(), g.type_parameters.as_slice())),
            _ => None,
        }
    }
}
