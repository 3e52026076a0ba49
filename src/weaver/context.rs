//! What the weaver needs to know about the networking runtime it weaves against.

use crate::{
    metadata::method::{MethodRef, TypeDefinition},
    weaver::Role,
};

/// Base type network-aware types derive from by default
pub const DEFAULT_BASE_TYPE: &str = "Mirror.NetworkBehaviour";

/// Namespace the guard attributes live in by default
pub const DEFAULT_ATTRIBUTE_NAMESPACE: &str = "Mirror";

/// Runtime references and type capability checks used while injecting guards.
///
/// Implementations resolve the role predicates and the warning logger into method references
/// usable from the module being woven. One context is shared by every method of a pass.
pub trait GuardContext {
    /// Whether methods of `ty` may carry role guards
    fn is_network_aware(&self, ty: &TypeDefinition) -> bool;

    /// Instance getter reporting whether the object currently satisfies `role`
    fn role_predicate(&self, role: Role) -> &MethodRef;

    /// Static method taking one string, used to log guard violations
    fn warning_method(&self) -> &MethodRef;

    /// Namespace of the guard attributes
    fn attribute_namespace(&self) -> &str {
        DEFAULT_ATTRIBUTE_NAMESPACE
    }
}

/// The four role predicate getters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePredicates {
    /// `get_isServer`
    pub is_server: MethodRef,
    /// `get_isClient`
    pub is_client: MethodRef,
    /// `get_hasAuthority`
    pub has_authority: MethodRef,
    /// `get_isLocalPlayer`
    pub is_local_player: MethodRef,
}

impl RolePredicates {
    /// The predicate for `role`
    #[must_use]
    pub fn get(&self, role: Role) -> &MethodRef {
        match role {
            Role::Server => &self.is_server,
            Role::Client => &self.is_client,
            Role::HasAuthority => &self.has_authority,
            Role::LocalPlayer => &self.is_local_player,
        }
    }
}

/// Stock [`GuardContext`]: a type is network-aware if it is, or derives from, a configured
/// base type.
///
/// # Examples
///
/// ```rust
/// use dotguard::prelude::*;
///
/// let getter = |row, name: &str| {
///     MethodRef::new(Token::from_parts(Token::MEMBER_REF, row), DEFAULT_BASE_TYPE, name)
///         .instance()
///         .returning()
/// };
/// let predicates = RolePredicates {
///     is_server: getter(1, "get_isServer"),
///     is_client: getter(2, "get_isClient"),
///     has_authority: getter(3, "get_hasAuthority"),
///     is_local_player: getter(4, "get_isLocalPlayer"),
/// };
/// let warn = MethodRef::new(Token::from_parts(Token::MEMBER_REF, 5), "UnityEngine.Debug", "LogWarning")
///     .with_params(1);
///
/// let context = NetworkContext::new(predicates, warn);
/// let player = TypeDefinition::new(Token::from_parts(Token::TYPE_DEF, 2), "Game", "Player")
///     .extends(DEFAULT_BASE_TYPE);
/// assert!(context.is_network_aware(&player));
/// ```
#[derive(Debug, Clone)]
pub struct NetworkContext {
    base_type: String,
    attribute_namespace: String,
    predicates: RolePredicates,
    warning: MethodRef,
}

impl NetworkContext {
    /// Create a context with the default base type and attribute namespace
    #[must_use]
    pub fn new(predicates: RolePredicates, warning: MethodRef) -> Self {
        NetworkContext {
            base_type: DEFAULT_BASE_TYPE.to_string(),
            attribute_namespace: DEFAULT_ATTRIBUTE_NAMESPACE.to_string(),
            predicates,
            warning,
        }
    }

    /// Use another base type for the network-aware check
    #[must_use]
    pub fn with_base_type(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = base_type.into();
        self
    }

    /// Recognise guard attributes in another namespace
    #[must_use]
    pub fn with_attribute_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.attribute_namespace = namespace.into();
        self
    }

    /// Base type of network-aware types
    #[must_use]
    pub fn base_type(&self) -> &str {
        &self.base_type
    }
}

impl GuardContext for NetworkContext {
    fn is_network_aware(&self, ty: &TypeDefinition) -> bool {
        ty.is_or_derives_from(&self.base_type)
    }

    fn role_predicate(&self, role: Role) -> &MethodRef {
        self.predicates.get(role)
    }

    fn warning_method(&self) -> &MethodRef {
        &self.warning
    }

    fn attribute_namespace(&self) -> &str {
        &self.attribute_namespace
    }
}
