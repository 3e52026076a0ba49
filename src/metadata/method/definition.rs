use crate::{
    metadata::{
        method::{MethodBody, MethodModifiers, ParamAttributes, ParamKind},
        signatures::TypeSignature,
        token::Token,
    },
    Result,
};

/// A resolved reference to a method that injected code calls.
///
/// Besides the token, a reference carries just enough of the signature to know the call's stack
/// effect and to print it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    /// `MethodDef` or `MemberRef` token of the method
    pub token: Token,
    /// Full name of the declaring type
    pub declaring_type: String,
    /// Method name
    pub name: String,
    /// The method takes `this`
    pub has_this: bool,
    /// Number of declared parameters
    pub param_count: u8,
    /// The method returns a value
    pub returns_value: bool,
}

impl MethodRef {
    /// Create a reference to a static, parameterless, void method
    pub fn new(token: Token, declaring_type: impl Into<String>, name: impl Into<String>) -> Self {
        MethodRef {
            token,
            declaring_type: declaring_type.into(),
            name: name.into(),
            has_this: false,
            param_count: 0,
            returns_value: false,
        }
    }

    /// Mark the method as an instance method
    #[must_use]
    pub fn instance(mut self) -> Self {
        self.has_this = true;
        self
    }

    /// Mark the method as returning a value
    #[must_use]
    pub fn returning(mut self) -> Self {
        self.returns_value = true;
        self
    }

    /// Set the number of declared parameters
    #[must_use]
    pub fn with_params(mut self, count: u8) -> Self {
        self.param_count = count;
        self
    }

    /// Values a call to this method pops, `this` included
    #[must_use]
    pub fn stack_pops(&self) -> u8 {
        self.param_count.saturating_add(u8::from(self.has_this))
    }

    /// `Declaring.Type::Name`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}::{}", self.declaring_type, self.name)
    }
}

/// A declared parameter of a method.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Position in the declared parameter list, not counting `this`
    pub index: u16,
    /// Parameter name
    pub name: String,
    /// Parameter flags
    pub flags: ParamAttributes,
    /// Declared type; `ref` and `out` parameters are [`TypeSignature::ByRef`]
    pub ty: TypeSignature,
}

impl Parameter {
    /// Create a by-value input parameter
    pub fn new(index: u16, name: impl Into<String>, ty: TypeSignature) -> Self {
        Parameter {
            index,
            name: name.into(),
            flags: ParamAttributes::empty(),
            ty,
        }
    }

    /// Create an `out` parameter writing a value of type `pointee`
    pub fn output(index: u16, name: impl Into<String>, pointee: TypeSignature) -> Self {
        Parameter {
            index,
            name: name.into(),
            flags: ParamAttributes::OUT,
            ty: TypeSignature::ByRef(Box::new(pointee)),
        }
    }

    /// Create a `ref` parameter
    pub fn by_ref(index: u16, name: impl Into<String>, pointee: TypeSignature) -> Self {
        Parameter {
            index,
            name: name.into(),
            flags: ParamAttributes::empty(),
            ty: TypeSignature::ByRef(Box::new(pointee)),
        }
    }

    /// Replace the parameter flags
    #[must_use]
    pub fn with_flags(mut self, flags: ParamAttributes) -> Self {
        self.flags = flags;
        self
    }

    /// How this parameter passes data
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        ParamKind::classify(self.flags, self.ty.is_by_ref())
    }

    /// Returns true if the callee must assign this parameter on every exit path
    #[must_use]
    pub fn is_output(&self) -> bool {
        self.kind() == ParamKind::Output
    }
}

/// A type declaring methods, with its inheritance chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    /// `TypeDef` token
    pub token: Token,
    /// Namespace, empty for the global namespace
    pub namespace: String,
    /// Simple name
    pub name: String,
    /// Full names of the base types, nearest first
    pub base_types: Vec<String>,
}

impl TypeDefinition {
    /// Create a type without base types
    pub fn new(token: Token, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeDefinition {
            token,
            namespace: namespace.into(),
            name: name.into(),
            base_types: Vec::new(),
        }
    }

    /// Append a base type to the inheritance chain
    #[must_use]
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.base_types.push(base.into());
        self
    }

    /// Namespace qualified name
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Returns true if this type is `base` or inherits from it
    #[must_use]
    pub fn is_or_derives_from(&self, base: &str) -> bool {
        self.full_name() == base || self.base_types.iter().any(|ancestor| ancestor == base)
    }
}

/// A method declaration with its (optional) body.
///
/// # Examples
///
/// ```rust
/// use dotguard::metadata::method::{MethodDefinition, MethodModifiers, Parameter};
/// use dotguard::metadata::{signatures::TypeSignature, token::Token};
///
/// let method = MethodDefinition::new(Token::new(0x0600_0001), "Game.Player", "TryGet", TypeSignature::Boolean)
///     .with_modifiers(MethodModifiers::STATIC)
///     .with_param(Parameter::output(0, "value", TypeSignature::I4));
///
/// assert_eq!(method.full_name(), "System.Boolean Game.Player::TryGet(System.Int32&)");
/// assert_eq!(method.argument_index(&method.params[0])?, 0);
/// # Ok::<(), dotguard::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MethodDefinition {
    /// `MethodDef` token
    pub token: Token,
    /// Full name of the declaring type
    pub declaring_type: String,
    /// Method name
    pub name: String,
    /// Method attribute flags
    pub modifiers: MethodModifiers,
    /// Declared parameters, in order
    pub params: Vec<Parameter>,
    /// Return type
    pub return_type: TypeSignature,
    /// Full names of the custom attribute types applied to the method, in declaration order
    pub custom_attributes: Vec<String>,
    /// The body, `None` for abstract and extern methods
    pub body: Option<MethodBody>,
}

impl MethodDefinition {
    /// Create an instance method without parameters, attributes or body
    pub fn new(
        token: Token,
        declaring_type: impl Into<String>,
        name: impl Into<String>,
        return_type: TypeSignature,
    ) -> Self {
        MethodDefinition {
            token,
            declaring_type: declaring_type.into(),
            name: name.into(),
            modifiers: MethodModifiers::HIDE_BY_SIG,
            params: Vec::new(),
            return_type,
            custom_attributes: Vec::new(),
            body: None,
        }
    }

    /// Replace the method modifiers
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: MethodModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Append a parameter
    #[must_use]
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Append a custom attribute by its type's full name
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.custom_attributes.push(attribute.into());
        self
    }

    /// Set the body
    #[must_use]
    pub fn with_body(mut self, body: MethodBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns true for static methods
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(MethodModifiers::STATIC)
    }

    /// Argument slot of `param`; instance methods reserve slot 0 for `this`.
    ///
    /// # Errors
    /// Returns an error if `param` is not declared at position `param.index` of this method, or
    /// if the slot does not fit an argument index.
    pub fn argument_index(&self, param: &Parameter) -> Result<u16> {
        if self.params.get(usize::from(param.index)) != Some(param) {
            return Err(malformed_error!(
                "Parameter '{}' of {} is not declared at position {}",
                param.name,
                self.name,
                param.index
            ));
        }

        if self.is_static() {
            Ok(param.index)
        } else {
            param.index.checked_add(1).ok_or_else(|| {
                malformed_error!("Parameter '{}' of {} has no argument slot", param.name, self.name)
            })
        }
    }

    /// Full name as used in diagnostics, e.g. `System.Void Game.Player::Fire(System.Int32)`
    #[must_use]
    pub fn full_name(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|param| param.ty.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{} {}::{}({})",
            self.return_type, self.declaring_type, self.name, params
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_index_instance_and_static() {
        let instance = MethodDefinition::new(Token::new(0x0600_0001), "A", "M", TypeSignature::Void)
            .with_param(Parameter::new(0, "a", TypeSignature::I4))
            .with_param(Parameter::output(1, "b", TypeSignature::I4));
        assert!(!instance.is_static());
        assert_eq!(instance.argument_index(&instance.params[1]).unwrap(), 2);

        let stat = instance.clone().with_modifiers(MethodModifiers::STATIC);
        assert_eq!(stat.argument_index(&stat.params[1]).unwrap(), 1);
    }

    #[test]
    fn test_argument_index_rejects_misplaced_params() {
        let method = MethodDefinition::new(Token::new(0x0600_0001), "A", "M", TypeSignature::Void)
            .with_param(Parameter::output(1, "b", TypeSignature::I4));
        assert!(matches!(
            method.argument_index(&method.params[0]),
            Err(crate::Error::Malformed { .. })
        ));

        let foreign = Parameter::new(u16::MAX, "far", TypeSignature::I4);
        assert!(method.argument_index(&foreign).is_err());
    }

    #[test]
    fn test_argument_index_last_slot() {
        let instance = (0..=u16::MAX).fold(
            MethodDefinition::new(Token::new(0x0600_0001), "A", "M", TypeSignature::Void),
            |method, index| method.with_param(Parameter::new(index, "p", TypeSignature::I4)),
        );
        let last = instance.params.last().unwrap().clone();
        assert!(instance.argument_index(&last).is_err());

        let stat = instance.with_modifiers(MethodModifiers::STATIC);
        assert_eq!(stat.argument_index(&last).unwrap(), u16::MAX);
    }

    #[test]
    fn test_parameter_kinds() {
        assert!(Parameter::output(0, "x", TypeSignature::I4).is_output());
        assert!(!Parameter::by_ref(0, "x", TypeSignature::I4).is_output());
        assert!(!Parameter::new(0, "x", TypeSignature::I4).is_output());
        assert!(!Parameter::output(0, "x", TypeSignature::I4)
            .with_flags(ParamAttributes::IN | ParamAttributes::OUT)
            .is_output());
    }

    #[test]
    fn test_type_inheritance() {
        let ty = TypeDefinition::new(Token::new(0x0200_0002), "Game", "Player")
            .extends("Mirror.NetworkBehaviour")
            .extends("UnityEngine.MonoBehaviour");
        assert_eq!(ty.full_name(), "Game.Player");
        assert!(ty.is_or_derives_from("Mirror.NetworkBehaviour"));
        assert!(ty.is_or_derives_from("Game.Player"));
        assert!(!ty.is_or_derives_from("Mirror.NetworkManager"));
    }

    #[test]
    fn test_full_name_without_params() {
        let method = MethodDefinition::new(Token::new(0x0600_0001), "Game.Player", "Reset", TypeSignature::Void);
        assert_eq!(method.full_name(), "System.Void Game.Player::Reset()");
    }

    #[test]
    fn test_method_ref_stack_pops() {
        let method = MethodRef::new(Token::new(0x0A00_0001), "T", "M")
            .instance()
            .with_params(2);
        assert_eq!(method.stack_pops(), 3);
        assert_eq!(method.full_name(), "T::M");
    }
}
