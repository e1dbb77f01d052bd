use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::permission::{GLOBAL_WILDCARD, PermissionName};

/// The merged set of permission names a user holds within one organization.
///
/// Derived from role grants layered with active overrides; may contain
/// wildcard entries, which are expanded at evaluation time rather than at
/// resolution time. The set is a point-in-time artifact: it is cached with a
/// TTL and invalidated when any of its inputs change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectivePermissionSet(BTreeSet<PermissionName>);

impl EffectivePermissionSet {
    /// Creates an empty permission set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a permission name to the set.
    pub fn insert(&mut self, name: PermissionName) {
        self.0.insert(name);
    }

    /// Removes a permission name; removal of an absent name is a no-op.
    pub fn remove(&mut self, name: &PermissionName) {
        self.0.remove(name.as_str());
    }

    /// Returns whether the set contains a name verbatim.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Returns whether the set satisfies one required permission.
    ///
    /// Checks, in order: the global wildcard `*`, a verbatim match, and the
    /// single-level resource wildcard `resource.*`. Deeper hierarchies are
    /// deliberately unsupported.
    #[must_use]
    pub fn satisfies(&self, required: &PermissionName) -> bool {
        if self.0.contains(GLOBAL_WILDCARD) {
            return true;
        }

        if self.0.contains(required.as_str()) {
            return true;
        }

        required
            .resource()
            .is_some_and(|resource| self.0.contains(format!("{resource}.*").as_str()))
    }

    /// Returns whether the set satisfies every required permission.
    #[must_use]
    pub fn satisfies_all(&self, required: &[PermissionName]) -> bool {
        required.iter().all(|name| self.satisfies(name))
    }

    /// Returns the first required permission the set does not satisfy.
    #[must_use]
    pub fn first_unsatisfied<'a>(&self, required: &'a [PermissionName]) -> Option<&'a PermissionName> {
        required.iter().find(|name| !self.satisfies(name))
    }

    /// Iterates over the contained names in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &PermissionName> {
        self.0.iter()
    }

    /// Returns the number of contained names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PermissionName> for EffectivePermissionSet {
    fn from_iter<I: IntoIterator<Item = PermissionName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for EffectivePermissionSet {
    type Item = PermissionName;
    type IntoIter = std::collections::btree_set::IntoIter<PermissionName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
