//! User-details view coordinator
//!
//! Holds the acting session and the user being browsed, decides which relation
//! tabs and membership actions the session may use, and drives the loader for
//! the selected tab.

use crate::error::{ConsoleError, Result};
use crate::loader::{RelationTabLoader, TabUpdate};
use crate::source::DataAccess;
use keystone_core::{
    Action, Entity, MembershipRecord, RelationTabState, ResourceKind, UserWithRoles, can,
    can_edit_record, check,
};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;
use tracing::info;

pub struct UserDetailView {
    session: UserWithRoles,
    subject_id: String,
    source: Arc<dyn DataAccess>,
    loader: RelationTabLoader,
    active: Mutex<Option<ResourceKind>>,
}

impl UserDetailView {
    pub fn new(
        session: UserWithRoles,
        subject_id: impl Into<String>,
        source: Arc<dyn DataAccess>,
    ) -> Self {
        let subject_id = subject_id.into();
        Self {
            loader: RelationTabLoader::new(Arc::clone(&source), subject_id.clone()),
            session,
            subject_id,
            source,
            active: Mutex::new(None),
        }
    }

    pub const fn session(&self) -> &UserWithRoles {
        &self.session
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Whether the session may perform `action` on `resource`
    pub fn evaluate(&self, resource: ResourceKind, action: Action) -> bool {
        can(&self.session, resource, action)
    }

    /// Relation tabs the session may see, in display order
    pub fn visible_tabs(&self) -> Vec<ResourceKind> {
        ResourceKind::RELATIONS
            .into_iter()
            .filter(|kind| self.evaluate(*kind, Action::View))
            .collect()
    }

    /// Whether the session may edit the browsed user's profile
    pub fn can_edit_subject(&self) -> bool {
        can_edit_record(&self.session, ResourceKind::Users, &self.subject_id)
    }

    pub fn active_tab(&self) -> Option<ResourceKind> {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `kind` the active tab and (re)load it.
    ///
    /// Selecting the tab that is already active reloads it, which is also how
    /// a failed load is retried.
    pub fn select_tab(&self, kind: ResourceKind) -> Result<()> {
        if self.loader.is_torn_down() {
            return Err(ConsoleError::TornDown);
        }
        check(&self.session, kind, Action::View)?;

        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = Some(kind);
        self.loader.activate(kind);
        Ok(())
    }

    pub fn tab_state(&self, kind: ResourceKind) -> Option<RelationTabState<Entity>> {
        self.loader.state_of(kind)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TabUpdate> {
        self.loader.subscribe()
    }

    /// Wait for `kind` to finish loading.
    ///
    /// `None` if the tab was never selected or the view is torn down.
    pub async fn wait_settled(&self, kind: ResourceKind) -> Option<RelationTabState<Entity>> {
        self.loader.settled(kind).await
    }

    /// Attach the browsed user to the record `entity_id`
    pub async fn add_membership(
        &self,
        kind: ResourceKind,
        entity_id: &str,
    ) -> Result<MembershipRecord> {
        self.ensure_live()?;
        check(&self.session, kind, Action::Create)?;

        let record = self
            .source
            .add_membership(kind, entity_id, &self.subject_id)
            .await?;
        info!(%kind, entity_id, subject = %self.subject_id, membership = %record.id, "membership added");

        self.refresh_if_active(kind);
        Ok(record)
    }

    /// Detach the browsed user by deleting a membership row
    pub async fn remove_membership(&self, kind: ResourceKind, membership_id: &str) -> Result<()> {
        self.ensure_live()?;
        check(&self.session, kind, Action::Remove)?;

        self.source.remove_membership(kind, membership_id).await?;
        info!(%kind, membership_id, subject = %self.subject_id, "membership removed");

        self.refresh_if_active(kind);
        Ok(())
    }

    /// Suppress every pending load. The view is inert afterwards.
    pub fn teardown(&self) {
        self.loader.teardown();
    }

    fn ensure_live(&self) -> Result<()> {
        if self.loader.is_torn_down() {
            Err(ConsoleError::TornDown)
        } else {
            Ok(())
        }
    }

    fn refresh_if_active(&self, kind: ResourceKind) {
        if self.active_tab() == Some(kind) {
            self.loader.activate(kind);
        }
    }
}

impl std::fmt::Debug for UserDetailView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDetailView")
            .field("session", &self.session.id)
            .field("subject_id", &self.subject_id)
            .field("active", &self.active_tab())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockDataAccess;
    use keystone_core::{PermissionDenied, RoleGrant, TabStatus};
    use keystone_http::ClientError;

    fn session() -> UserWithRoles {
        UserWithRoles::new(
            "admin",
            vec![
                RoleGrant::all(ResourceKind::Customers),
                RoleGrant::view_only(ResourceKind::Properties),
                RoleGrant::none(ResourceKind::Projects),
                RoleGrant {
                    update_self: true,
                    ..RoleGrant::view_only(ResourceKind::Users)
                },
            ],
        )
    }

    #[test]
    fn visible_tabs_follow_view_grants() {
        let view = UserDetailView::new(session(), "u7", Arc::new(MockDataAccess::new()));
        assert_eq!(
            view.visible_tabs(),
            vec![ResourceKind::Customers, ResourceKind::Properties]
        );
    }

    #[test]
    fn subject_editing_needs_update_or_ownership() {
        let other = UserDetailView::new(session(), "u7", Arc::new(MockDataAccess::new()));
        assert!(!other.can_edit_subject());

        let own = UserDetailView::new(session(), "admin", Arc::new(MockDataAccess::new()));
        assert!(own.can_edit_subject());
    }

    #[tokio::test]
    async fn hidden_tab_cannot_be_selected() {
        let mut mock = MockDataAccess::new();
        mock.expect_fetch_relation_memberships().never();
        let view = UserDetailView::new(session(), "u7", Arc::new(mock));

        let err = view.select_tab(ResourceKind::Licensings).unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::PermissionDenied(PermissionDenied {
                resource: ResourceKind::Licensings,
                action: Action::View,
            })
        ));
        assert_eq!(view.active_tab(), None);
        assert_eq!(view.tab_state(ResourceKind::Licensings), None);
    }

    #[tokio::test]
    async fn selecting_a_tab_loads_it() {
        let mut mock = MockDataAccess::new();
        mock.expect_fetch_relation_memberships()
            .withf(|kind, user| *kind == ResourceKind::Properties && user == "u7")
            .times(1)
            .returning(|_, _| {
                Ok(vec![MembershipRecord::new(
                    "1",
                    Some(Entity::new("p1", "Harbour View")),
                )])
            });
        let view = UserDetailView::new(session(), "u7", Arc::new(mock));

        view.select_tab(ResourceKind::Properties).unwrap();
        assert_eq!(view.active_tab(), Some(ResourceKind::Properties));

        let state = view.wait_settled(ResourceKind::Properties).await.unwrap();
        assert_eq!(state.items, vec![Entity::new("p1", "Harbour View")]);
    }

    #[tokio::test]
    async fn waiting_on_an_unselected_tab_returns_immediately() {
        let mut mock = MockDataAccess::new();
        mock.expect_fetch_relation_memberships().never();
        let view = UserDetailView::new(session(), "u7", Arc::new(mock));

        assert_eq!(view.wait_settled(ResourceKind::Customers).await, None);
    }

    #[tokio::test]
    async fn membership_changes_require_grants() {
        let mut mock = MockDataAccess::new();
        mock.expect_add_membership().never();
        mock.expect_remove_membership().never();
        let view = UserDetailView::new(session(), "u7", Arc::new(mock));

        let add = view.add_membership(ResourceKind::Properties, "p1").await;
        assert!(matches!(add, Err(ConsoleError::PermissionDenied(_))));

        let remove = view.remove_membership(ResourceKind::Projects, "m1").await;
        assert!(matches!(remove, Err(ConsoleError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn removing_a_membership_reloads_the_active_tab() {
        let mut mock = MockDataAccess::new();
        let mut fetches = 0;
        mock.expect_fetch_relation_memberships()
            .times(2)
            .returning(move |_, _| {
                fetches += 1;
                if fetches == 1 {
                    Ok(vec![MembershipRecord::new("m1", Some(Entity::new("c1", "Acme")))])
                } else {
                    Ok(Vec::new())
                }
            });
        mock.expect_remove_membership()
            .withf(|kind, id| *kind == ResourceKind::Customers && id == "m1")
            .times(1)
            .returning(|_, _| Ok(()));
        let view = UserDetailView::new(session(), "u7", Arc::new(mock));

        view.select_tab(ResourceKind::Customers).unwrap();
        let before = view.wait_settled(ResourceKind::Customers).await.unwrap();
        assert_eq!(before.items.len(), 1);

        let mut updates = view.subscribe();
        view.remove_membership(ResourceKind::Customers, "m1")
            .await
            .unwrap();

        assert!(updates.recv().await.unwrap().state.loading);
        let after = updates.recv().await.unwrap().state;
        assert_eq!(after, RelationTabState::loaded(Vec::new()));
    }

    #[tokio::test]
    async fn adding_to_an_inactive_tab_does_not_load_it() {
        let mut mock = MockDataAccess::new();
        mock.expect_fetch_relation_memberships().never();
        mock.expect_add_membership()
            .withf(|kind, entity, user| {
                *kind == ResourceKind::Customers && entity == "c9" && user == "u7"
            })
            .times(1)
            .returning(|_, _, _| Ok(MembershipRecord::new("m9", Some(Entity::new("c9", "Umbrella")))));
        let view = UserDetailView::new(session(), "u7", Arc::new(mock));

        let record = view
            .add_membership(ResourceKind::Customers, "c9")
            .await
            .unwrap();
        assert_eq!(record.id, "m9");
        assert_eq!(view.tab_state(ResourceKind::Customers), None);
    }

    #[tokio::test]
    async fn failed_mutation_surfaces_client_error() {
        let mut mock = MockDataAccess::new();
        mock.expect_add_membership().returning(|_, _, _| {
            Err(ClientError::Conflict("already a member".to_string()))
        });
        let view = UserDetailView::new(session(), "u7", Arc::new(mock));

        let result = view.add_membership(ResourceKind::Customers, "c1").await;
        assert!(matches!(
            result,
            Err(ConsoleError::Client(ClientError::Conflict(_)))
        ));
    }

    #[tokio::test]
    async fn torn_down_view_is_inert() {
        let mut mock = MockDataAccess::new();
        mock.expect_fetch_relation_memberships().never();
        mock.expect_add_membership().never();
        let view = UserDetailView::new(session(), "u7", Arc::new(mock));

        view.teardown();
        assert!(matches!(
            view.select_tab(ResourceKind::Customers),
            Err(ConsoleError::TornDown)
        ));
        assert!(matches!(
            view.add_membership(ResourceKind::Customers, "c1").await,
            Err(ConsoleError::TornDown)
        ));
        assert_eq!(view.wait_settled(ResourceKind::Customers).await, None);
    }

    #[tokio::test]
    async fn retry_by_reselecting_after_failure() {
        let mut mock = MockDataAccess::new();
        let mut attempts = 0;
        mock.expect_fetch_relation_memberships()
            .times(2)
            .returning(move |_, _| {
                attempts += 1;
                if attempts == 1 {
                    Err(ClientError::ServerError {
                        status: 500,
                        message: "boom".to_string(),
                    })
                } else {
                    Ok(vec![MembershipRecord::new("m1", Some(Entity::new("c1", "Acme")))])
                }
            });
        let view = UserDetailView::new(session(), "u7", Arc::new(mock));

        view.select_tab(ResourceKind::Customers).unwrap();
        let failed = view.wait_settled(ResourceKind::Customers).await.unwrap();
        assert_eq!(failed.status(), TabStatus::Errored);

        view.select_tab(ResourceKind::Customers).unwrap();
        let recovered = view.wait_settled(ResourceKind::Customers).await.unwrap();
        assert_eq!(recovered.status(), TabStatus::Loaded);
    }
}
