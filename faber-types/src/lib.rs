#![forbid(unsafe_code)]

mod format;
mod relate;
mod ty;

pub use format::format_type;
pub use relate::{is_assignable_to, types_equal};
pub use ty::{
    FunctionType, GenericType, Ownership, PrimitiveName, PrimitiveType, SemanticType, UserType,
    BUILTIN_GENERICS,
};
