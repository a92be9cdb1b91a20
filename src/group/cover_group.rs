// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The cover group: member tracking, reconciliation and command dispatch.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::actuator::{ActuatorInvoker, ServiceCall};
use crate::error::{Error, Result};
use crate::event::GroupId;
use crate::registry::{MemberEvent, StateRegistry, SubscriptionId};
use crate::state::{DerivedState, MemberCoverState};
use crate::types::{EntityId, Position};

use super::{CoverCommand, CoverFeatures, CoverGroupConfig};

/// Live subscription plus the task consuming it.
struct Tracker {
    subscription_id: SubscriptionId,
    task: JoinHandle<()>,
}

/// A virtual cover aggregating several physical covers.
///
/// The group subscribes to its members in the registry, recomputes a
/// [`DerivedState`] on every member change, and turns open/close/stop into
/// button presses and set-position into one call per member.
///
/// # Lifecycle
///
/// 1. [`new`](Self::new) - build from a validated configuration
/// 2. [`activate`](Self::activate) - subscribe and compute the first state
/// 3. commands and state reads
/// 4. [`deactivate`](Self::deactivate) - unsubscribe (also done on drop)
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use cover_group::actuator::HttpConfig;
/// use cover_group::group::{CoverGroup, CoverGroupConfig};
/// use cover_group::registry::InMemoryRegistry;
///
/// # async fn example() -> cover_group::Result<()> {
/// let registry = Arc::new(InMemoryRegistry::new());
/// let invoker = Arc::new(HttpConfig::new("hass:8123").into_caller()?);
///
/// let config = CoverGroupConfig::new("Living Room")
///     .with_cover("cover.left")
///     .with_cover("cover.right")
///     .with_open_button("button.open")
///     .with_close_button("button.close")
///     .with_stop_button("button.stop");
///
/// let mut group = CoverGroup::new(config, registry, invoker)?;
/// group.activate()?;
///
/// group.set_position(Some(50)).await?;
/// println!("position: {:?}", group.state().position);
///
/// group.deactivate();
/// # Ok(())
/// # }
/// ```
pub struct CoverGroup<R: StateRegistry, I> {
    id: GroupId,
    config: CoverGroupConfig,
    registry: Arc<R>,
    invoker: Arc<I>,
    state_tx: Arc<watch::Sender<DerivedState>>,
    tracker: Option<Tracker>,
}

impl<R: StateRegistry, I> CoverGroup<R, I> {
    /// Creates an inactive group with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid.
    pub fn new(config: CoverGroupConfig, registry: Arc<R>, invoker: Arc<I>) -> Result<Self> {
        Self::with_id(GroupId::new(), config, registry, invoker)
    }

    /// Creates an inactive group with a known identifier, e.g. when a
    /// configuration entry is reloaded.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid.
    pub fn with_id(
        id: GroupId,
        config: CoverGroupConfig,
        registry: Arc<R>,
        invoker: Arc<I>,
    ) -> Result<Self> {
        config.validate()?;
        let (state_tx, _) = watch::channel(DerivedState::default());

        Ok(Self {
            id,
            config,
            registry,
            invoker,
            state_tx: Arc::new(state_tx),
            tracker: None,
        })
    }

    /// Returns the group identifier.
    #[must_use]
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the member covers.
    #[must_use]
    pub fn members(&self) -> &[EntityId] {
        &self.config.covers
    }

    /// Returns the configuration the group was built from.
    #[must_use]
    pub fn config(&self) -> &CoverGroupConfig {
        &self.config
    }

    /// Returns the commands this group supports.
    #[must_use]
    pub fn supported_features(&self) -> CoverFeatures {
        CoverFeatures::OPEN | CoverFeatures::CLOSE | CoverFeatures::STOP | CoverFeatures::SET_POSITION
    }

    /// Returns `true` while the group tracks its members.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.tracker.is_some()
    }

    /// Returns the current derived state.
    #[must_use]
    pub fn state(&self) -> DerivedState {
        *self.state_tx.borrow()
    }

    /// Returns a receiver notified after every reconciliation.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<DerivedState> {
        self.state_tx.subscribe()
    }

    /// Returns the registry's current snapshot of a member, or `None` if
    /// the registry has no data for it.
    #[must_use]
    pub fn snapshot(&self, member: &EntityId) -> Option<MemberCoverState> {
        self.registry.get_state(member)
    }

    /// Cancels the member subscription and stops reconciliation.
    ///
    /// Does nothing if the group is not active. The last derived state
    /// stays readable.
    pub fn deactivate(&mut self) {
        let Some(tracker) = self.tracker.take() else {
            return;
        };

        if !self.registry.unsubscribe(tracker.subscription_id) {
            tracing::debug!(
                group_id = %self.id,
                subscription = %tracker.subscription_id,
                "Subscription was already gone"
            );
        }
        tracker.task.abort();

        tracing::info!(group_id = %self.id, "Cover group deactivated");
    }
}

// =============================================================================
// Member tracking
// =============================================================================

impl<R: StateRegistry + 'static, I> CoverGroup<R, I> {
    /// Subscribes to member changes and computes the initial state.
    ///
    /// A consumer task is spawned that owns reconciliation from then on.
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyActive` if the group is already active.
    pub fn activate(&mut self) -> Result<()> {
        if self.tracker.is_some() {
            return Err(Error::AlreadyActive);
        }

        // Subscribe before the first read so no change can slip in between.
        let (subscription_id, events) = self.registry.subscribe(&self.config.covers).into_parts();

        let previous = self.state_tx.borrow().position;
        let initial = reconcile(self.registry.as_ref(), &self.config.covers, previous);
        self.state_tx.send_replace(initial);

        let task = tokio::spawn(run_reconciler(
            self.id,
            self.config.covers.clone(),
            Arc::clone(&self.registry),
            events,
            Arc::clone(&self.state_tx),
            initial,
        ));

        self.tracker = Some(Tracker {
            subscription_id,
            task,
        });

        tracing::info!(
            group_id = %self.id,
            name = %self.config.name,
            members = self.config.covers.len(),
            "Cover group activated"
        );
        Ok(())
    }
}

// =============================================================================
// Commands
// =============================================================================

impl<R: StateRegistry, I: ActuatorInvoker> CoverGroup<R, I> {
    /// Opens the group by pressing the open button.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotActive` if the group has not been activated.
    pub async fn open(&self) -> Result<()> {
        self.execute(CoverCommand::Open).await
    }

    /// Closes the group by pressing the close button.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotActive` if the group has not been activated.
    pub async fn close(&self) -> Result<()> {
        self.execute(CoverCommand::Close).await
    }

    /// Stops the group by pressing the stop button.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotActive` if the group has not been activated.
    pub async fn stop(&self) -> Result<()> {
        self.execute(CoverCommand::Stop).await
    }

    /// Moves every member to `target`, clamped into 0-100.
    ///
    /// `None` does nothing.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotActive` if the group has not been activated.
    pub async fn set_position(&self, target: Option<i64>) -> Result<()> {
        self.execute(CoverCommand::SetPosition(target)).await
    }

    /// Dispatches a command.
    ///
    /// Calls are fire-and-forget: a failing call is logged and does not
    /// stop the remaining calls or surface as an error. Member calls of a
    /// set-position are issued concurrently, so a stalled member does not
    /// hold back the others. The derived state is not touched; it follows
    /// once the members report back.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotActive` if the group has not been activated.
    pub async fn execute(&self, command: CoverCommand) -> Result<()> {
        if self.tracker.is_none() {
            return Err(Error::NotActive);
        }

        tracing::debug!(group_id = %self.id, %command, "Dispatching cover command");

        match command {
            CoverCommand::Open => {
                self.send(ServiceCall::button_press(self.config.open_button.clone()))
                    .await;
            }
            CoverCommand::Close => {
                self.send(ServiceCall::button_press(self.config.close_button.clone()))
                    .await;
            }
            CoverCommand::Stop => {
                self.send(ServiceCall::button_press(self.config.stop_button.clone()))
                    .await;
            }
            CoverCommand::SetPosition(None) => {
                tracing::trace!(group_id = %self.id, "No target position, ignoring");
            }
            CoverCommand::SetPosition(Some(target)) => {
                let position = Position::saturating_from(target);
                let calls = self.config.covers.iter().map(|member| {
                    self.send(ServiceCall::set_cover_position(member.clone(), position))
                });
                join_all(calls).await;
            }
        }

        Ok(())
    }

    async fn send(&self, call: ServiceCall) {
        tracing::debug!(group_id = %self.id, %call, "Invoking actuator");

        if let Err(e) = self.invoker.invoke(&call).await {
            tracing::warn!(group_id = %self.id, %call, error = %e, "Actuator call failed");
        }
    }
}

impl<R: StateRegistry, I> Drop for CoverGroup<R, I> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl<R: StateRegistry, I> std::fmt::Debug for CoverGroup<R, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoverGroup")
            .field("id", &self.id)
            .field("name", &self.config.name)
            .field("members", &self.config.covers)
            .field("active", &self.tracker.is_some())
            .finish_non_exhaustive()
    }
}

/// Pulls every member's snapshot and computes the group state.
fn reconcile<R: StateRegistry + ?Sized>(
    registry: &R,
    members: &[EntityId],
    previous: Option<Position>,
) -> DerivedState {
    let snapshots: Vec<MemberCoverState> = members
        .iter()
        .filter_map(|member| registry.get_state(member))
        .collect();

    DerivedState::reconcile(previous, &snapshots)
}

/// Consumer loop owning the derived state of one group.
async fn run_reconciler<R: StateRegistry>(
    group_id: GroupId,
    members: Vec<EntityId>,
    registry: Arc<R>,
    mut events: mpsc::UnboundedReceiver<MemberEvent>,
    state_tx: Arc<watch::Sender<DerivedState>>,
    mut current: DerivedState,
) {
    while let Some(event) = events.recv().await {
        tracing::trace!(%group_id, entity_id = %event.entity_id, "Member state changed");

        current = reconcile(registry.as_ref(), &members, current.position);

        tracing::debug!(
            %group_id,
            position = ?current.position,
            is_open = current.is_open,
            is_opening = current.is_opening,
            is_closing = current.is_closing,
            is_closed = ?current.is_closed,
            "Reconciled cover group"
        );

        state_tx.send_replace(current);
    }

    tracing::debug!(%group_id, "Member subscription closed");
}
