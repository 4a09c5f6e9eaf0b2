//! Declaration builders shared by the integration test targets.

#![allow(dead_code)]

use metrology_declaration::{
    Declaration, Property, QuantityProperties, ScalarDeclaration, SpecializedScalarDeclaration,
    SpecializedVectorDeclaration, SpecializedVectorGroupDeclaration, UnitDeclaration,
    UnitInstanceDeclaration, VectorDeclaration, VectorGroupDeclaration,
    VectorGroupMemberDeclaration,
};
use metrology_foundation::{Diagnostic, SourceLocation, TypeIdentity};

/// Identity in the `Physics` namespace.
pub fn id(name: &str) -> TypeIdentity {
    TypeIdentity::new("Physics", name)
}

/// Diagnostic names, in order.
pub fn names<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> Vec<&'static str> {
    diagnostics.into_iter().map(|d| d.kind.name()).collect()
}

/// Builds declarations as if read top to bottom from one file.
#[derive(Clone, Debug)]
pub struct Source {
    file: &'static str,
    line: u32,
    declarations: Vec<Declaration>,
}

impl Source {
    pub fn new(file: &'static str) -> Self {
        Self {
            file,
            line: 0,
            declarations: Vec::new(),
        }
    }

    /// A source with the unit of length, its scalar, and a position group.
    pub fn length() -> Self {
        Self::new("length.cs")
            .unit("UnitOfLength", "Length", &[("Metre", "m"), ("Foot", "ft")])
            .scalar("Length", "UnitOfLength")
            .group("Position", "UnitOfLength")
    }

    fn next(&mut self) -> SourceLocation {
        self.line += 1;
        SourceLocation::at(self.file, self.line, 1)
    }

    fn push(mut self, declaration: impl Into<Declaration>) -> Self {
        self.declarations.push(declaration.into());
        self
    }

    pub fn unit(mut self, name: &str, quantity: &str, instances: &[(&str, &str)]) -> Self {
        let location = self.next();
        let mut d = UnitDeclaration::new(id(name), location.clone());
        d.quantity = Property::set(id(quantity), location.clone());
        for (instance, symbol) in instances {
            d.instances
                .push(UnitInstanceDeclaration::new(*instance, location.clone()).with_symbol(*symbol));
        }
        self.push(d)
    }

    pub fn biased_unit(mut self, name: &str, quantity: &str) -> Self {
        let location = self.next();
        let mut d = UnitDeclaration::new(id(name), location.clone());
        d.quantity = Property::set(id(quantity), location.clone());
        d.bias_term = Property::set(true, location);
        self.push(d)
    }

    pub fn scalar(mut self, name: &str, unit: &str) -> Self {
        let location = self.next();
        let mut d = ScalarDeclaration::new(id(name), location.clone());
        d.unit = Property::set(id(unit), location);
        self.push(d)
    }

    pub fn biased_scalar(mut self, name: &str, unit: &str) -> Self {
        let location = self.next();
        let mut d = ScalarDeclaration::new(id(name), location.clone());
        d.unit = Property::set(id(unit), location.clone());
        d.use_unit_bias = Property::set(true, location);
        self.push(d)
    }

    pub fn specialized_scalar(mut self, name: &str, original: &str) -> Self {
        let location = self.next();
        let mut d = SpecializedScalarDeclaration::new(id(name), location.clone());
        d.original = Property::set(id(original), location);
        self.push(d)
    }

    pub fn vector(mut self, name: &str, unit: &str, dimension: i64) -> Self {
        let location = self.next();
        let mut d = VectorDeclaration::new(id(name), location.clone());
        d.unit = Property::set(id(unit), location.clone());
        d.dimension = Property::set(dimension, location);
        self.push(d)
    }

    pub fn specialized_vector(mut self, name: &str, original: &str) -> Self {
        let location = self.next();
        let mut d = SpecializedVectorDeclaration::new(id(name), location.clone());
        d.original = Property::set(id(original), location);
        self.push(d)
    }

    pub fn group(mut self, name: &str, unit: &str) -> Self {
        let location = self.next();
        let mut d = VectorGroupDeclaration::new(id(name), location.clone());
        d.unit = Property::set(id(unit), location);
        self.push(d)
    }

    pub fn specialized_group(mut self, name: &str, original: &str) -> Self {
        let location = self.next();
        let mut d = SpecializedVectorGroupDeclaration::new(id(name), location.clone());
        d.original = Property::set(id(original), location);
        self.push(d)
    }

    /// A member whose dimension is read from its name.
    pub fn member(mut self, name: &str, group: &str) -> Self {
        let location = self.next();
        let mut d = VectorGroupMemberDeclaration::new(id(name), location.clone());
        d.group = Property::set(id(group), location);
        self.push(d)
    }

    pub fn member_of_dimension(mut self, name: &str, group: &str, dimension: i64) -> Self {
        let location = self.next();
        let mut d = VectorGroupMemberDeclaration::new(id(name), location.clone());
        d.group = Property::set(id(group), location.clone());
        d.dimension = Property::set(dimension, location);
        self.push(d)
    }

    /// Repeats the last declaration at the same location.
    pub fn repeated(mut self) -> Self {
        if let Some(last) = self.declarations.last().cloned() {
            self.declarations.push(last);
        }
        self
    }

    /// Sets the scalar (or, for scalars, the vector) of the last declaration.
    pub fn companion(mut self, name: &str) -> Self {
        let location = self.next();
        let reference = Property::set(id(name), location);
        match self.declarations.last_mut() {
            Some(Declaration::Scalar(d)) => d.vector = reference,
            Some(Declaration::SpecializedScalar(d)) => d.vector = reference,
            Some(Declaration::Vector(d)) => d.scalar = reference,
            Some(Declaration::SpecializedVector(d)) => d.scalar = reference,
            Some(Declaration::VectorGroup(d)) => d.scalar = reference,
            Some(Declaration::SpecializedVectorGroup(d)) => d.scalar = reference,
            Some(Declaration::Unit(_) | Declaration::VectorGroupMember(_)) | None => {
                panic!("no quantity to set a companion on")
            }
        }
        self
    }

    /// Edits the quantity properties of the last declaration.
    pub fn quantity(mut self, edit: impl FnOnce(&mut QuantityProperties, SourceLocation)) -> Self {
        let location = self.next();
        let properties = match self.declarations.last_mut() {
            Some(Declaration::Scalar(d)) => &mut d.quantity,
            Some(Declaration::SpecializedScalar(d)) => &mut d.quantity,
            Some(Declaration::Vector(d)) => &mut d.quantity,
            Some(Declaration::SpecializedVector(d)) => &mut d.quantity,
            Some(Declaration::VectorGroup(d)) => &mut d.quantity,
            Some(Declaration::SpecializedVectorGroup(d)) => &mut d.quantity,
            Some(Declaration::Unit(_) | Declaration::VectorGroupMember(_)) | None => {
                panic!("no quantity to edit")
            }
        };
        edit(properties, location);
        self
    }

    /// Sets the difference quantity of the last declaration.
    pub fn difference(self, name: &str) -> Self {
        let difference = id(name);
        self.quantity(move |q, location| q.difference = Property::set(difference, location))
    }

    /// Sets the default unit of the last declaration.
    pub fn default_unit(self, name: &str, symbol: &str) -> Self {
        let (name, symbol) = (name.to_string(), symbol.to_string());
        self.quantity(move |q, location| {
            q.default_unit_name = Property::set(name, location.clone());
            q.default_unit_symbol = Property::set(symbol, location);
        })
    }

    pub fn build(self) -> Vec<Declaration> {
        self.declarations
    }
}
