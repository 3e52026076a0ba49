//! Guard kinds: which role a method requires, and whether a violation is logged.

use std::fmt;

use strum::{EnumCount, EnumIter, IntoEnumIterator};

/// A networking role a guarded method requires of the object it runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum Role {
    /// Running on the server
    Server,
    /// Running on a client
    Client,
    /// The local peer has authority over the object
    HasAuthority,
    /// The object is the local player
    LocalPlayer,
}

impl Role {
    /// Human readable label used in messages, e.g. `Has Authority`
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Role::Server => "Server",
            Role::Client => "Client",
            Role::HasAuthority => "Has Authority",
            Role::LocalPlayer => "Local Player",
        }
    }

    /// Name stem of the attributes requesting this role, e.g. `HasAuthority`
    #[must_use]
    pub const fn attribute_stem(self) -> &'static str {
        match self {
            Role::Server => "Server",
            Role::Client => "Client",
            Role::HasAuthority => "HasAuthority",
            Role::LocalPlayer => "LocalPlayer",
        }
    }

    /// What was observed instead of the role, completing `function '...' <violation>`
    #[must_use]
    pub const fn violation(self) -> &'static str {
        match self {
            Role::Server => "called on client",
            Role::Client => "called on server",
            Role::HasAuthority => "called on player without authority",
            Role::LocalPlayer => "called on nonlocal player",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The guard requested for a method: a role, and whether a failed check logs a warning.
///
/// The warning variants come from `[Server]`, `[Client]`, `[HasAuthority]` and `[LocalPlayer]`,
/// the silent ones from the `...Callback` attributes. Both variants return early the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuardKind {
    /// Required role
    pub role: Role,
    /// Log a warning before returning early
    pub log_warning: bool,
}

impl GuardKind {
    /// Guard that logs a warning when the role check fails
    #[must_use]
    pub const fn warning(role: Role) -> Self {
        GuardKind {
            role,
            log_warning: true,
        }
    }

    /// Guard that returns silently when the role check fails
    #[must_use]
    pub const fn callback(role: Role) -> Self {
        GuardKind {
            role,
            log_warning: false,
        }
    }

    /// All eight guard kinds
    pub fn all() -> impl Iterator<Item = GuardKind> {
        Role::iter().flat_map(|role| [GuardKind::warning(role), GuardKind::callback(role)])
    }

    /// Recognise a guard attribute by the full name of its type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dotguard::weaver::{GuardKind, Role};
    ///
    /// assert_eq!(
    ///     GuardKind::from_attribute("Mirror", "Mirror.HasAuthorityCallbackAttribute"),
    ///     Some(GuardKind::callback(Role::HasAuthority))
    /// );
    /// assert_eq!(GuardKind::from_attribute("Mirror", "Mirror.CommandAttribute"), None);
    /// ```
    #[must_use]
    pub fn from_attribute(namespace: &str, full_name: &str) -> Option<Self> {
        let name = full_name
            .strip_prefix(namespace)?
            .strip_prefix('.')?
            .strip_suffix("Attribute")?;
        let (stem, log_warning) = match name.strip_suffix("Callback") {
            Some(stem) => (stem, false),
            None => (name, true),
        };

        Role::iter()
            .find(|role| role.attribute_stem() == stem)
            .map(|role| GuardKind { role, log_warning })
    }

    /// Full name of the attribute requesting this guard kind
    #[must_use]
    pub fn attribute_name(&self, namespace: &str) -> String {
        let callback = if self.log_warning { "" } else { "Callback" };
        format!("{namespace}.{}{callback}Attribute", self.role.attribute_stem())
    }

    /// Text of the warning logged when the check fails in `method_full_name`
    #[must_use]
    pub fn warning_text(&self, method_full_name: &str) -> String {
        format!(
            "[{}] function '{}' {}",
            self.role.label(),
            method_full_name,
            self.role.violation()
        )
    }
}

impl fmt::Display for GuardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role.attribute_stem())?;
        if !self.log_warning {
            f.write_str("Callback")?;
        }
        Ok(())
    }
}
