use itertools::Itertools;
use std::{collections::HashMap, fmt};
use strtab::Symbol;

#[derive(Debug)]
pub struct ClassAlreadyDeclared;

#[derive(Debug)]
pub enum RegisterError {
    ClassDoesNotExist,
    MemberAlreadyDeclared,
}

/// The whole-program symbol table. Built once by the first pass of the
/// checker and read-only afterwards. Classes are kept in registration order.
#[derive(Debug, Default)]
pub struct ClassTable<'src> {
    classes: Vec<ClassDef<'src>>,
    by_name: HashMap<Symbol<'src>, usize>,
}

impl<'src> ClassTable<'src> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_class(
        &mut self,
        name: Symbol<'src>,
        parent: Option<Symbol<'src>>,
    ) -> Result<(), ClassAlreadyDeclared> {
        if self.by_name.contains_key(&name) {
            return Err(ClassAlreadyDeclared);
        }

        log::debug!("registering class {}", name);
        self.by_name.insert(name, self.classes.len());
        self.classes.push(ClassDef::new(name, parent));
        Ok(())
    }

    pub fn register_field(
        &mut self,
        class: Symbol<'src>,
        field: ClassFieldDef<'src>,
    ) -> Result<(), RegisterError> {
        let class_def = self.class_mut(class)?;
        if class_def.field(field.name).is_some() {
            return Err(RegisterError::MemberAlreadyDeclared);
        }
        class_def.fields.push(field);
        Ok(())
    }

    pub fn register_method(
        &mut self,
        class: Symbol<'src>,
        method: ClassMethodDef<'src>,
    ) -> Result<(), RegisterError> {
        let class_def = self.class_mut(class)?;
        if class_def.method(method.name).is_some() {
            return Err(RegisterError::MemberAlreadyDeclared);
        }
        class_def.methods.push(method);
        Ok(())
    }

    fn class_mut(&mut self, name: Symbol<'src>) -> Result<&mut ClassDef<'src>, RegisterError> {
        let idx = *self
            .by_name
            .get(&name)
            .ok_or(RegisterError::ClassDoesNotExist)?;
        Ok(&mut self.classes[idx])
    }

    /// Forget the parent of `class`. Used to keep checking a program whose
    /// hierarchy is broken.
    pub(crate) fn detach_parent(&mut self, class: Symbol<'src>) {
        if let Ok(class_def) = self.class_mut(class) {
            class_def.parent = None;
        }
    }

    pub fn class(&self, name: Symbol<'src>) -> Option<&ClassDef<'src>> {
        self.by_name.get(&name).map(|&idx| &self.classes[idx])
    }

    pub fn is_class_defined(&self, name: Symbol<'src>) -> bool {
        self.by_name.contains_key(&name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDef<'src>> {
        self.classes.iter()
    }

    /// `class` itself followed by its parent, grandparent and so on. Stops
    /// at the first unregistered parent. Never yields more items than there
    /// are classes, so it terminates on cyclic hierarchies, too.
    pub fn ancestors<'t>(
        &'t self,
        class: Symbol<'src>,
    ) -> impl Iterator<Item = &'t ClassDef<'src>> + 't {
        let mut next = self.class(class);
        let mut remaining = self.classes.len();
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;

            let current = next?;
            next = current.parent.and_then(|parent| self.class(parent));
            Some(current)
        })
    }

    /// The closest ancestor-or-self field named `name`.
    pub fn lookup_field(
        &self,
        class: Symbol<'src>,
        name: Symbol<'src>,
    ) -> Option<&ClassFieldDef<'src>> {
        self.ancestors(class).find_map(|class_def| class_def.field(name))
    }

    /// The closest ancestor-or-self method named `name`.
    pub fn lookup_method(
        &self,
        class: Symbol<'src>,
        name: Symbol<'src>,
    ) -> Option<&ClassMethodDef<'src>> {
        self.ancestors(class)
            .find_map(|class_def| class_def.method(name))
    }

    /// Reflexive: every registered class is a subtype of itself.
    pub fn is_subtype_of(&self, ancestor: Symbol<'src>, descendant: Symbol<'src>) -> bool {
        self.ancestors(descendant)
            .any(|class_def| class_def.name == ancestor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef<'src> {
    pub name: Symbol<'src>,
    pub parent: Option<Symbol<'src>>,
    fields: Vec<ClassFieldDef<'src>>,
    methods: Vec<ClassMethodDef<'src>>,
}

impl<'src> ClassDef<'src> {
    fn new(name: Symbol<'src>, parent: Option<Symbol<'src>>) -> Self {
        ClassDef {
            name,
            parent,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn field(&self, name: Symbol<'src>) -> Option<&ClassFieldDef<'src>> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn method(&self, name: Symbol<'src>) -> Option<&ClassMethodDef<'src>> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// Fields in declaration order, without inherited ones.
    pub fn fields(&self) -> impl Iterator<Item = &ClassFieldDef<'src>> {
        self.fields.iter()
    }

    /// Methods in declaration order, without inherited ones.
    pub fn methods(&self) -> impl Iterator<Item = &ClassMethodDef<'src>> {
        self.methods.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassFieldDef<'src> {
    pub name: Symbol<'src>,
    pub ty: CheckedType<'src>,
    /// The declaring class
    pub class: Symbol<'src>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMethodDef<'src> {
    pub name: Symbol<'src>,
    pub params: Vec<MethodParamDef<'src>>,
    pub return_ty: CheckedType<'src>,
    /// The declaring class
    pub class: Symbol<'src>,
}

/// `A.f(int, B) -> int`
impl fmt::Display for ClassMethodDef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}({}) -> {}",
            self.class,
            self.name,
            self.params.iter().map(|param| param.ty).join(", "),
            self.return_ty
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodParamDef<'src> {
    pub name: Symbol<'src>,
    pub ty: CheckedType<'src>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckedType<'src> {
    Int,
    Boolean,
    IntArray,
    TypeRef(Symbol<'src>),
}

impl<'src> CheckedType<'src> {
    /// `self` is the expected type, `other` the actual one. Identical types
    /// are compatible, and a class is compatible with each of its ancestors.
    /// There are no coercions between primitive types.
    pub fn is_assignable_from(&self, other: &CheckedType<'src>, table: &ClassTable<'src>) -> bool {
        use self::CheckedType::*;

        match (self, other) {
            (TypeRef(expected), TypeRef(actual)) => {
                expected == actual || table.is_subtype_of(*expected, *actual)
            }
            _ => self == other,
        }
    }

    pub fn class_name(&self) -> Option<Symbol<'src>> {
        match self {
            CheckedType::TypeRef(name) => Some(*name),
            _ => None,
        }
    }
}

impl fmt::Display for CheckedType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::CheckedType::*;
        match self {
            Int => write!(f, "int"),
            Boolean => write!(f, "boolean"),
            IntArray => write!(f, "int[]"),
            TypeRef(name) => write!(f, "{}", name),
        }
    }
}
