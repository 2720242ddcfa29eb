use std::collections::BTreeSet;
use std::fmt;

/// Permission that bypasses every node access check.
pub const BYPASS_NODE_ACCESS: &str = "bypass node access";
/// Permission required to view published content and files.
pub const ACCESS_CONTENT: &str = "access content";
/// Permission required to create file entities through uploads.
pub const CREATE_FILES: &str = "create files";

/// The caller a mutation runs on behalf of.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Actor {
    pub user_id: Option<i32>,
    permissions: BTreeSet<String>,
    is_system: bool,
}

impl Actor {
    pub fn user(user_id: i32) -> Self {
        Self {
            user_id: Some(user_id),
            permissions: BTreeSet::new(),
            is_system: false,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            permissions: BTreeSet::new(),
            is_system: false,
        }
    }

    pub fn system() -> Self {
        Self {
            user_id: None,
            permissions: BTreeSet::new(),
            is_system: true,
        }
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    pub fn is_system(&self) -> bool {
        self.is_system
    }

    pub fn is_owner_of(&self, owner_id: Option<i32>) -> bool {
        self.user_id.is_some() && self.user_id == owner_id
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    View,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::View => "view",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an access check is asked about.
#[derive(Clone, Copy, Debug)]
pub struct AccessTarget<'a> {
    pub entity_type: &'a str,
    pub bundle: &'a str,
    pub owner_id: Option<i32>,
}

pub trait AccessPolicy: Send + Sync {
    fn check(&self, actor: &Actor, target: AccessTarget<'_>, operation: Operation) -> bool;
}

pub struct AllowAllPolicy;

impl AccessPolicy for AllowAllPolicy {
    fn check(&self, _actor: &Actor, _target: AccessTarget<'_>, _operation: Operation) -> bool {
        true
    }
}

/// Permission-string policy modelled on per-bundle content permissions
/// (`create article content`, `edit own article content`, ...).
pub struct PermissionAccessPolicy;

impl PermissionAccessPolicy {
    fn check_node(&self, actor: &Actor, target: AccessTarget<'_>, operation: Operation) -> bool {
        if actor.has_permission(BYPASS_NODE_ACCESS) {
            return true;
        }

        let bundle = target.bundle;
        let own_or_any = |verb: &str| {
            actor.has_permission(&format!("{} any {} content", verb, bundle))
                || (actor.is_owner_of(target.owner_id)
                    && actor.has_permission(&format!("{} own {} content", verb, bundle)))
        };

        match operation {
            Operation::View => actor.has_permission(ACCESS_CONTENT),
            Operation::Create => actor.has_permission(&format!("create {} content", bundle)),
            Operation::Update => own_or_any("edit"),
            Operation::Delete => own_or_any("delete"),
        }
    }

    fn check_file(&self, actor: &Actor, target: AccessTarget<'_>, operation: Operation) -> bool {
        match operation {
            Operation::View => {
                actor.has_permission(ACCESS_CONTENT) || actor.is_owner_of(target.owner_id)
            }
            Operation::Create => actor.has_permission(CREATE_FILES),
            Operation::Update | Operation::Delete => actor.is_owner_of(target.owner_id),
        }
    }
}

impl AccessPolicy for PermissionAccessPolicy {
    fn check(&self, actor: &Actor, target: AccessTarget<'_>, operation: Operation) -> bool {
        if actor.is_system() {
            return true;
        }

        let allowed = match target.entity_type {
            "node" => self.check_node(actor, target, operation),
            "file" => self.check_file(actor, target, operation),
            _ => false,
        };

        if !allowed {
            tracing::debug!(
                "Access denied: {} on {}:{} for user {:?}",
                operation,
                target.entity_type,
                target.bundle,
                actor.user_id
            );
        }
        allowed
    }
}
