// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for cover group tracking and command dispatch.

use std::sync::Arc;
use std::time::Duration;

use cover_group::actuator::{ActuatorInvoker, ServiceCall};
use cover_group::registry::InMemoryRegistry;
use cover_group::state::{DerivedState, MemberCoverState};
use cover_group::types::{CoverLifecycle, EntityId, Position};
use cover_group::{CoverCommand, CoverGroup, CoverGroupConfig, Error, ProtocolError};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::Instant;

// ============================================================================
// Helpers
// ============================================================================

/// Invoker recording every call, optionally failing for one entity.
#[derive(Default)]
struct RecordingInvoker {
    calls: Mutex<Vec<ServiceCall>>,
    failing: Option<EntityId>,
}

impl RecordingInvoker {
    fn failing_for(entity_id: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: Some(EntityId::new(entity_id)),
        }
    }

    fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().clone()
    }
}

impl ActuatorInvoker for RecordingInvoker {
    async fn invoke(&self, call: &ServiceCall) -> Result<(), ProtocolError> {
        self.calls.lock().push(call.clone());

        if self.failing.as_ref() == Some(call.entity_id()) {
            return Err(ProtocolError::Rejected("unavailable".to_string()));
        }
        Ok(())
    }
}

/// Invoker that never finishes quickly for one entity and records when
/// each call was issued.
struct StallingInvoker {
    stalled: EntityId,
    issued: Mutex<Vec<(EntityId, Instant)>>,
}

impl StallingInvoker {
    fn new(stalled: &str) -> Self {
        Self {
            stalled: EntityId::new(stalled),
            issued: Mutex::new(Vec::new()),
        }
    }
}

impl ActuatorInvoker for StallingInvoker {
    async fn invoke(&self, call: &ServiceCall) -> Result<(), ProtocolError> {
        self.issued
            .lock()
            .push((call.entity_id().clone(), Instant::now()));

        if call.entity_id() == &self.stalled {
            tokio::time::sleep(Duration::from_secs(3)).await;
        }
        Ok(())
    }
}

fn config() -> CoverGroupConfig {
    CoverGroupConfig::new("Living Room")
        .with_cover("cover.a")
        .with_cover("cover.b")
        .with_cover("cover.c")
        .with_open_button("button.open")
        .with_close_button("button.close")
        .with_stop_button("button.stop")
}

fn pos(value: u8) -> Position {
    Position::new(value).unwrap()
}

fn member(id: &str, lifecycle: CoverLifecycle, position: Option<u8>) -> MemberCoverState {
    let state = MemberCoverState::new(id, lifecycle);
    match position {
        Some(value) => state.with_position(pos(value)),
        None => state,
    }
}

fn group_with(
    invoker: RecordingInvoker,
) -> (
    Arc<InMemoryRegistry>,
    Arc<RecordingInvoker>,
    CoverGroup<InMemoryRegistry, RecordingInvoker>,
) {
    let registry = Arc::new(InMemoryRegistry::new());
    let invoker = Arc::new(invoker);
    let group = CoverGroup::new(config(), Arc::clone(&registry), Arc::clone(&invoker)).unwrap();
    (registry, invoker, group)
}

async fn wait_until(
    rx: &mut watch::Receiver<DerivedState>,
    predicate: impl FnMut(&DerivedState) -> bool,
) -> DerivedState {
    *tokio::time::timeout(Duration::from_secs(2), rx.wait_for(predicate))
        .await
        .expect("state not reached in time")
        .expect("state channel closed")
}

// ============================================================================
// Activation
// ============================================================================

mod activation {
    use super::*;

    #[tokio::test]
    async fn initial_state_reflects_registry() {
        let (registry, _, mut group) = group_with(RecordingInvoker::default());
        registry.set_state(member("cover.a", CoverLifecycle::Open, Some(20)));
        registry.set_state(member("cover.b", CoverLifecycle::Open, Some(30)));
        registry.set_state(member("cover.c", CoverLifecycle::Closed, Some(45)));

        group.activate().unwrap();

        let state = group.state();
        assert_eq!(state.position, Some(pos(32)));
        assert!(state.is_open);
        assert_eq!(state.is_closed, Some(false));
    }

    #[tokio::test]
    async fn no_members_present_yields_unknown_state() {
        let (_, _, mut group) = group_with(RecordingInvoker::default());

        group.activate().unwrap();

        assert_eq!(group.state(), DerivedState::default());
        assert_eq!(group.state().lifecycle(), CoverLifecycle::Unknown);
    }

    #[tokio::test]
    async fn activating_twice_fails() {
        let (registry, _, mut group) = group_with(RecordingInvoker::default());

        group.activate().unwrap();
        assert!(matches!(group.activate(), Err(Error::AlreadyActive)));
        assert_eq!(registry.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn snapshot_reads_registry() {
        let (registry, _, group) = group_with(RecordingInvoker::default());
        registry.set_state(member("cover.a", CoverLifecycle::Open, Some(70)));

        let present = group.snapshot(&EntityId::new("cover.a")).unwrap();
        assert_eq!(present.lifecycle(), CoverLifecycle::Open);
        assert_eq!(present.position(), Some(pos(70)));
        assert!(group.snapshot(&EntityId::new("cover.b")).is_none());
    }

    #[tokio::test]
    async fn deactivate_is_idempotent() {
        let (registry, _, mut group) = group_with(RecordingInvoker::default());
        group.activate().unwrap();

        group.deactivate();
        group.deactivate();

        assert!(!group.is_active());
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn dropping_group_unsubscribes() {
        let (registry, _, mut group) = group_with(RecordingInvoker::default());
        group.activate().unwrap();
        assert_eq!(registry.subscriber_count(), 1);

        drop(group);

        assert_eq!(registry.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn reactivation_resumes_tracking() {
        let (registry, _, mut group) = group_with(RecordingInvoker::default());
        group.activate().unwrap();
        group.deactivate();

        registry.set_state(member("cover.a", CoverLifecycle::Closed, Some(0)));
        group.activate().unwrap();

        assert_eq!(group.state().position, Some(Position::CLOSED));
        assert_eq!(group.state().is_closed, Some(true));
    }
}

// ============================================================================
// Reconciliation
// ============================================================================

mod reconciliation {
    use super::*;

    #[tokio::test]
    async fn member_updates_are_reconciled() {
        let (registry, _, mut group) = group_with(RecordingInvoker::default());
        group.activate().unwrap();
        let mut rx = group.watch();

        registry.set_state(member("cover.a", CoverLifecycle::Open, Some(50)));
        let state = wait_until(&mut rx, |s| s.position.is_some()).await;
        assert_eq!(state.position, Some(pos(50)));

        registry.set_state(member("cover.b", CoverLifecycle::Closing, Some(70)));
        let state = wait_until(&mut rx, |s| s.is_closing).await;
        assert_eq!(state.position, Some(pos(60)));
        assert_eq!(state.is_closed, None);
        assert_eq!(state.lifecycle(), CoverLifecycle::Closing);
    }

    #[tokio::test]
    async fn position_is_sticky_without_reports() {
        let (registry, _, mut group) = group_with(RecordingInvoker::default());
        registry.set_state(member("cover.a", CoverLifecycle::Open, Some(40)));
        group.activate().unwrap();
        let mut rx = group.watch();

        registry.set_state(member("cover.a", CoverLifecycle::Opening, None));
        let state = wait_until(&mut rx, |s| s.is_opening).await;

        assert_eq!(state.position, Some(pos(40)));
    }

    #[tokio::test]
    async fn all_members_gone_resets_state() {
        let (registry, _, mut group) = group_with(RecordingInvoker::default());
        registry.set_state(member("cover.a", CoverLifecycle::Open, Some(40)));
        group.activate().unwrap();
        let mut rx = group.watch();

        registry.remove_state(&EntityId::new("cover.a"));
        let state = wait_until(&mut rx, |s| s.position.is_none()).await;

        assert_eq!(state, DerivedState::default());
    }

    #[tokio::test]
    async fn non_members_are_ignored() {
        let (registry, _, mut group) = group_with(RecordingInvoker::default());
        group.activate().unwrap();
        let mut rx = group.watch();
        rx.borrow_and_update();

        registry.set_state(member("cover.elsewhere", CoverLifecycle::Open, Some(90)));
        registry.set_state(member("cover.c", CoverLifecycle::Closed, Some(10)));

        let state = wait_until(&mut rx, |s| s.position.is_some()).await;
        assert_eq!(state.position, Some(pos(10)));
        assert!(!state.is_open);
    }

    #[tokio::test]
    async fn host_snapshots_are_accepted() {
        let (registry, _, mut group) = group_with(RecordingInvoker::default());
        group.activate().unwrap();
        let mut rx = group.watch();

        registry.set_state(MemberCoverState::from_host(
            "cover.a",
            "open",
            &serde_json::json!({"current_position": 250}),
        ));
        let state = wait_until(&mut rx, |s| s.position.is_some()).await;

        assert_eq!(state.position, Some(Position::OPEN));
    }

    #[tokio::test]
    async fn fractional_reports_are_averaged_before_rounding() {
        let (registry, _, mut group) = group_with(RecordingInvoker::default());
        group.activate().unwrap();
        let mut rx = group.watch();

        for (id, value) in [("cover.a", 20.6), ("cover.b", 30.6)] {
            registry.set_state(MemberCoverState::from_host(
                id,
                "open",
                &serde_json::json!({"current_position": value}),
            ));
        }
        let state = wait_until(&mut rx, |s| s.position == Some(pos(26))).await;

        assert!(state.is_open);
    }

    #[tokio::test]
    async fn dispatch_does_not_touch_state() {
        let (registry, _, mut group) = group_with(RecordingInvoker::default());
        registry.set_state(member("cover.a", CoverLifecycle::Closed, Some(0)));
        group.activate().unwrap();
        let before = group.state();

        group.set_position(Some(100)).await.unwrap();

        assert_eq!(group.state(), before);
    }
}

// ============================================================================
// Commands
// ============================================================================

mod commands {
    use super::*;

    #[tokio::test]
    async fn open_close_stop_press_one_button_each() {
        let (_, invoker, mut group) = group_with(RecordingInvoker::default());
        group.activate().unwrap();

        group.open().await.unwrap();
        group.close().await.unwrap();
        group.stop().await.unwrap();

        let calls = invoker.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|c| c.domain() == "button" && c.service() == "press"));
        assert_eq!(calls[0].entity_id().as_str(), "button.open");
        assert_eq!(calls[1].entity_id().as_str(), "button.close");
        assert_eq!(calls[2].entity_id().as_str(), "button.stop");
    }

    #[tokio::test]
    async fn set_position_targets_every_member() {
        let (_, invoker, mut group) = group_with(RecordingInvoker::default());
        group.activate().unwrap();

        group.set_position(Some(55)).await.unwrap();

        let calls = invoker.calls();
        let targets: Vec<_> = calls.iter().map(|c| c.entity_id().as_str().to_string()).collect();
        assert_eq!(targets, ["cover.a", "cover.b", "cover.c"]);
        assert!(calls.iter().all(|c| c.data()["position"] == 55));
    }

    #[tokio::test]
    async fn out_of_range_targets_are_clamped() {
        let (_, invoker, mut group) = group_with(RecordingInvoker::default());
        group.activate().unwrap();

        group.execute(CoverCommand::SetPosition(Some(150))).await.unwrap();
        group.execute(CoverCommand::SetPosition(Some(-5))).await.unwrap();

        let calls = invoker.calls();
        assert_eq!(calls.len(), 6);
        assert!(calls[..3].iter().all(|c| c.data()["position"] == 100));
        assert!(calls[3..].iter().all(|c| c.data()["position"] == 0));
    }

    #[tokio::test]
    async fn missing_target_is_a_no_op() {
        let (_, invoker, mut group) = group_with(RecordingInvoker::default());
        group.activate().unwrap();

        group.set_position(None).await.unwrap();

        assert!(invoker.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_member_does_not_delay_the_others() {
        let invoker = Arc::new(StallingInvoker::new("cover.a"));
        let mut group = CoverGroup::new(
            config(),
            Arc::new(InMemoryRegistry::new()),
            Arc::clone(&invoker),
        )
        .unwrap();
        group.activate().unwrap();

        let begin = Instant::now();
        group.set_position(Some(50)).await.unwrap();

        let issued = invoker.issued.lock().clone();
        assert_eq!(issued.len(), 3);
        for (entity_id, at) in &issued {
            let delay = at.duration_since(begin);
            assert!(
                delay < Duration::from_millis(100),
                "{entity_id} issued after {delay:?}"
            );
        }
    }

    #[tokio::test]
    async fn failing_member_does_not_stop_the_rest() {
        let (_, invoker, mut group) = group_with(RecordingInvoker::failing_for("cover.b"));
        group.activate().unwrap();

        assert!(group.set_position(Some(20)).await.is_ok());
        assert_eq!(invoker.calls().len(), 3);
    }

    #[tokio::test]
    async fn commands_require_activation() {
        let (_, invoker, group) = group_with(RecordingInvoker::default());

        assert!(matches!(group.open().await, Err(Error::NotActive)));
        assert!(invoker.calls().is_empty());
    }
}
