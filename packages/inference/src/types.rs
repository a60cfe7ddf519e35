use crate::codegen::{typescript::TypeScriptGenerator, CodeGenerator};
use serde::{Serialize, Serializer};
use std::fmt;

/// Primitive TypeScript keywords the engine can infer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Number,
    String,
    Boolean,
    Null,
    Void,
}

impl PrimitiveKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            PrimitiveKind::Number => "number",
            PrimitiveKind::String => "string",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Null => "null",
            PrimitiveKind::Void => "void",
        }
    }
}

/// Inferred type of an expression or declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// Fallback when nothing more specific is known
    Any,

    Primitive(PrimitiveKind),

    /// Object literal shape
    Object(ObjectShape),

    /// Array with the set of element types seen
    Array(ArrayShape),

    Function(FunctionShape),

    /// Reference to a synthesized interface by name
    InterfaceRef(String),
}

impl TypeDescriptor {
    pub fn number() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::Number)
    }

    pub fn string() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::String)
    }

    pub fn boolean() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::Boolean)
    }

    pub fn null() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::Null)
    }

    pub fn void() -> Self {
        TypeDescriptor::Primitive(PrimitiveKind::Void)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, TypeDescriptor::Any)
    }

    pub fn is_primitive(&self, kind: PrimitiveKind) -> bool {
        matches!(self, TypeDescriptor::Primitive(k) if *k == kind)
    }

    /// TypeScript spelling of this type
    pub fn render(&self) -> String {
        TypeScriptGenerator::new().generate_type(self)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Descriptors serialize as their TypeScript spelling
impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

/// Ordered object fields. A repeated key keeps its first position and takes
/// the later value, matching how an object literal evaluates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ObjectShape {
    fields: Vec<(String, TypeDescriptor)>,
}

impl ObjectShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, ty: TypeDescriptor) {
        let key = key.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = ty,
            None => self.fields.push((key, ty)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&TypeDescriptor> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, ty)| ty)
    }

    pub fn fields(&self) -> &[(String, TypeDescriptor)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, TypeDescriptor)> for ObjectShape {
    fn from_iter<I: IntoIterator<Item = (K, TypeDescriptor)>>(iter: I) -> Self {
        let mut shape = ObjectShape::new();
        for (key, ty) in iter {
            shape.insert(key, ty);
        }
        shape
    }
}

impl Serialize for ObjectShape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&TypeScriptGenerator::new().generate_object(self))
    }
}

/// Distinct element types of an array, in first-appearance order.
///
/// `Any` is only kept when nothing concrete was seen, so the set is never
/// empty: `[]` and `[, ,]` both become `Array<any>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayShape {
    element_types: Vec<TypeDescriptor>,
}

impl ArrayShape {
    pub fn from_elements(elements: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let mut element_types: Vec<TypeDescriptor> = Vec::new();
        for ty in elements {
            if !element_types.contains(&ty) {
                element_types.push(ty);
            }
        }

        if element_types.iter().any(|ty| !ty.is_any()) {
            element_types.retain(|ty| !ty.is_any());
        } else {
            element_types = vec![TypeDescriptor::Any];
        }

        Self { element_types }
    }

    pub fn element_types(&self) -> &[TypeDescriptor] {
        &self.element_types
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub params: Vec<(String, TypeDescriptor)>,
    pub return_type: Box<TypeDescriptor>,
}

impl FunctionShape {
    pub fn new(params: Vec<(String, TypeDescriptor)>, return_type: TypeDescriptor) -> Self {
        Self {
            params,
            return_type: Box::new(return_type),
        }
    }
}
