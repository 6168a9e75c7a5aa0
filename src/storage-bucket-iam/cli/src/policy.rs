// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Merge single-member changes into a policy.
//!
//! Only unconditional bindings are modified. Conditional bindings are kept as
//! they are, even if they grant the same role.

use iam_updater::model::{Binding, Policy};

/// Grants `role` to `member`.
///
/// Returns `None` if the policy already grants the role to the member.
pub fn add_member(mut policy: Policy, role: &str, member: &str) -> Option<Policy> {
    let existing = policy
        .bindings
        .iter_mut()
        .find(|b| b.role == role && b.condition.is_none());
    match existing {
        Some(binding) if binding.members.iter().any(|m| m == member) => return None,
        Some(binding) => binding.members.push(member.to_string()),
        None => policy
            .bindings
            .push(Binding::new().set_role(role).set_members([member])),
    }
    Some(policy)
}

/// Revokes `role` from `member`.
///
/// Bindings left without members are removed. Returns `None` if the policy
/// does not grant the role to the member.
pub fn remove_member(mut policy: Policy, role: &str, member: &str) -> Option<Policy> {
    let mut changed = false;
    for binding in policy
        .bindings
        .iter_mut()
        .filter(|b| b.role == role && b.condition.is_none())
    {
        let before = binding.members.len();
        binding.members.retain(|m| m != member);
        changed |= binding.members.len() != before;
    }
    if !changed {
        return None;
    }
    policy.bindings.retain(|b| !b.members.is_empty());
    Some(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iam_updater::model::Expr;
    use pretty_assertions::assert_eq;

    const VIEWER: &str = "roles/storage.objectViewer";
    const ADMIN: &str = "roles/storage.admin";

    fn policy() -> Policy {
        Policy::new().set_etag("CAE=").set_bindings([
            Binding::new()
                .set_role(VIEWER)
                .set_members(["user:alice@example.com"]),
            Binding::new()
                .set_role(ADMIN)
                .set_members(["user:carol@example.com"])
                .set_condition(Expr::new().set_expression("request.time < timestamp('2030-01-01T00:00:00Z')")),
        ])
    }

    #[test]
    fn add_to_existing_binding() {
        let got = add_member(policy(), VIEWER, "user:bob@example.com");
        let want = policy().set_bindings([
            Binding::new()
                .set_role(VIEWER)
                .set_members(["user:alice@example.com", "user:bob@example.com"]),
            policy().bindings[1].clone(),
        ]);
        assert_eq!(got, Some(want));
    }

    #[test]
    fn add_new_binding() {
        let got = add_member(policy(), ADMIN, "user:bob@example.com");
        let mut want = policy();
        want.bindings.push(
            Binding::new()
                .set_role(ADMIN)
                .set_members(["user:bob@example.com"]),
        );
        assert_eq!(got, Some(want));
    }

    #[test]
    fn add_existing_member() {
        let got = add_member(policy(), VIEWER, "user:alice@example.com");
        assert_eq!(got, None);
    }

    #[test]
    fn remove_last_member() {
        let got = remove_member(policy(), VIEWER, "user:alice@example.com");
        let want = policy().set_bindings([policy().bindings[1].clone()]);
        assert_eq!(got, Some(want));
    }

    #[test]
    fn remove_keeps_other_members() {
        let input = add_member(policy(), VIEWER, "user:bob@example.com");
        let got = input.and_then(|p| remove_member(p, VIEWER, "user:alice@example.com"));
        let want = policy().set_bindings([
            Binding::new()
                .set_role(VIEWER)
                .set_members(["user:bob@example.com"]),
            policy().bindings[1].clone(),
        ]);
        assert_eq!(got, Some(want));
    }

    #[test]
    fn remove_ignores_conditional_bindings() {
        let got = remove_member(policy(), ADMIN, "user:carol@example.com");
        assert_eq!(got, None);
    }

    #[test]
    fn remove_missing_member() {
        let got = remove_member(policy(), VIEWER, "user:bob@example.com");
        assert_eq!(got, None);
    }
}
