use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Legacy action names and the canonical names they stand for.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[("bank.view_balance", "bank.accounts.view_balance")];

/// Access level of a permission, ordered `none < view < edit < approve`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    #[default]
    None,
    View,
    Edit,
    Approve,
}

/// Permission data carried by the authenticated session object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPermissions {
    /// Flat permission strings without levels.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Level-aware permissions keyed by action.
    #[serde(default)]
    pub permission_levels: HashMap<String, PermissionLevel>,
}

/// Answers "can the current user do X at level Y" from session data.
#[derive(Debug, Clone)]
pub struct Permissions {
    levels: HashMap<String, PermissionLevel>,
    flat: HashSet<String>,
    /// legacy name -> canonical name
    aliases: HashMap<String, String>,
}

impl Permissions {
    /// Build from session data with the default alias table.
    #[must_use]
    pub fn new(session: SessionPermissions) -> Self {
        let aliases = DEFAULT_ALIASES
            .iter()
            .map(|(legacy, canonical)| ((*legacy).to_string(), (*canonical).to_string()))
            .collect();
        Self {
            levels: session.permission_levels,
            flat: session.permissions.into_iter().collect(),
            aliases,
        }
    }

    #[must_use]
    pub fn with_alias(mut self, legacy: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.insert(legacy.into(), canonical.into());
        self
    }

    /// The action itself, its canonical name if it is a legacy alias, and
    /// every legacy name mapping to it if it is canonical.
    #[must_use]
    pub fn candidates<'a>(&'a self, action: &'a str) -> Vec<&'a str> {
        let mut candidates = vec![action];
        if let Some(canonical) = self.aliases.get(action) {
            candidates.push(canonical);
        }
        let mut legacy: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, canonical)| canonical.as_str() == action)
            .map(|(legacy, _)| legacy.as_str())
            .collect();
        legacy.sort_unstable();
        candidates.extend(legacy);
        candidates.dedup();
        candidates
    }

    /// The recorded level for `action` or one of its aliases.
    #[must_use]
    pub fn level(&self, action: &str) -> Option<PermissionLevel> {
        self.candidates(action)
            .into_iter()
            .find_map(|candidate| self.levels.get(candidate).copied())
    }

    /// Whether the user holds `action` at `level` or above. Without a
    /// level-aware entry, presence in the flat permission list grants it.
    #[must_use]
    pub fn can(&self, action: &str, level: PermissionLevel) -> bool {
        if let Some(granted) = self.level(action) {
            return granted >= level;
        }
        self.candidates(action)
            .into_iter()
            .any(|candidate| self.flat.contains(candidate))
    }

    #[must_use]
    pub fn can_view(&self, action: &str) -> bool {
        self.can(action, PermissionLevel::View)
    }
}

impl From<SessionPermissions> for Permissions {
    fn from(session: SessionPermissions) -> Self {
        Self::new(session)
    }
}
