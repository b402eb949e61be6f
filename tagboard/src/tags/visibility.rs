// This file is part of the product Tagboard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::forum::{CategoryId, CategoryPrivilege, PrivilegeService, ServiceResult, Viewer};

/// Categories a listing is scoped to.
///
/// An explicit filter is returned unchanged; read access is enforced later
/// when topics are hydrated for the viewer. Without a filter the privilege
/// service decides, including for anonymous viewers.
pub async fn resolve_cids(
    privileges: &dyn PrivilegeService,
    explicit: Option<&[CategoryId]>,
    viewer: Viewer,
    privilege: CategoryPrivilege,
) -> ServiceResult<Vec<CategoryId>> {
    match explicit {
        Some(cids) => Ok(cids.to_vec()),
        None => privileges.get_cids_by_privilege(viewer, privilege).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forum::{DependencyError, GlobalCapability};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedPrivileges {
        readable: Vec<CategoryId>,
        anonymous_readable: Vec<CategoryId>,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PrivilegeService for FixedPrivileges {
        async fn get_cids_by_privilege(
            &self,
            viewer: Viewer,
            _privilege: CategoryPrivilege,
        ) -> ServiceResult<Vec<CategoryId>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DependencyError::unavailable(
                    "privileges.get_cids_by_privilege",
                    "offline",
                ));
            }
            if viewer.is_anonymous() {
                Ok(self.anonymous_readable.clone())
            } else {
                Ok(self.readable.clone())
            }
        }

        async fn can(&self, _capability: GlobalCapability, _viewer: Viewer) -> ServiceResult<bool> {
            Ok(false)
        }
    }

    fn privileges(readable: &[u64], anonymous_readable: &[u64]) -> FixedPrivileges {
        FixedPrivileges {
            readable: readable.iter().copied().map(CategoryId).collect(),
            anonymous_readable: anonymous_readable.iter().copied().map(CategoryId).collect(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn no_filter_returns_every_readable_category() {
        let cids = resolve_cids(
            &privileges(&[1, 2, 3], &[1]),
            None,
            Viewer::User(4),
            CategoryPrivilege::TopicsRead,
        )
        .await
        .expect("cids");
        assert_eq!(cids, vec![CategoryId(1), CategoryId(2), CategoryId(3)]);
    }

    #[tokio::test]
    async fn anonymous_viewer_gets_the_unauthenticated_answer() {
        let cids = resolve_cids(
            &privileges(&[1, 2, 3], &[1]),
            None,
            Viewer::Anonymous,
            CategoryPrivilege::TopicsRead,
        )
        .await
        .expect("cids");
        assert_eq!(cids, vec![CategoryId(1)]);
    }

    #[tokio::test]
    async fn explicit_filter_is_used_as_is() {
        let service = privileges(&[1, 2, 3], &[1]);
        let requested = [CategoryId(9), CategoryId(2)];
        let cids = resolve_cids(
            &service,
            Some(&requested),
            Viewer::Anonymous,
            CategoryPrivilege::TopicsRead,
        )
        .await
        .expect("cids");
        assert_eq!(cids, vec![CategoryId(9), CategoryId(2)]);
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn privilege_failures_propagate() {
        let mut failing = privileges(&[], &[]);
        failing.fail = true;
        let result =
            resolve_cids(&failing, None, Viewer::Anonymous, CategoryPrivilege::TopicsRead).await;
        assert!(matches!(result, Err(DependencyError::Unavailable { .. })));
    }
}
