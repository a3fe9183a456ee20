//! Interaction tests for coordinator notifications using mocked collaborators.

use catcher::config::{CoordinatorConfig, PursuerConfig};
use catcher::geometry::BoundaryDirection;
use catcher::pursuit::{
    Collaborators, ContactChannel, PursuerId, PursuitCoordinator, PursuitListener, PursuitTarget,
    RetreatReason, TargetId,
};
use glam::Vec2;
use mockall::predicate::eq;
use mockall::{mock, Sequence};
use rstest::rstest;
use test_utils::standard_area;

mock! {
    pub Listener {}
    impl PursuitListener for Listener {
        fn on_triggered(&mut self, pursuer: PursuerId, active_position: Vec2);
        fn on_chasing(&mut self, pursuer: PursuerId);
        fn on_retreating(&mut self, pursuer: PursuerId, reason: RetreatReason);
        fn on_hidden(&mut self, pursuer: PursuerId);
        fn on_escaped(&mut self, pursuer: PursuerId);
        fn on_caught(&mut self, pursuer: PursuerId, channel: ContactChannel);
        fn on_game_over(&mut self);
    }
}

mock! {
    pub Target {}
    impl PursuitTarget for Target {
        fn id(&self) -> TargetId;
        fn position(&self) -> Vec2;
        fn is_alive(&self) -> bool;
        fn notify_caught(&mut self, by: PursuerId);
    }
}

const PLAYER: TargetId = TargetId(5);

fn target_near_left() -> MockTarget {
    let mut target = MockTarget::new();
    target.expect_id().return_const(PLAYER);
    target.expect_position().return_const(Vec2::new(-9.5, 0.0));
    target.expect_is_alive().return_const(true);
    target
}

fn coordinator() -> (PursuitCoordinator, PursuerId) {
    let mut coordinator = PursuitCoordinator::new(CoordinatorConfig {
        game_over_delay: 0.5,
        ..CoordinatorConfig::default()
    });
    let id = coordinator.register_config(PursuerConfig::for_boundary(BoundaryDirection::Left));
    (coordinator, id)
}

fn tick(
    coordinator: &mut PursuitCoordinator,
    target: &mut MockTarget,
    listener: &mut MockListener,
    ticks: usize,
) {
    let area = standard_area();
    for _ in 0..ticks {
        let mut collaborators = Collaborators::new(Some(&mut *target), &area, &mut *listener);
        coordinator.tick(0.05, &mut collaborators);
    }
}

#[rstest]
fn full_cycle_notifies_in_order() {
    let (mut coordinator, id) = coordinator();
    let mut target = target_near_left();
    let mut listener = MockListener::new();
    let mut order = Sequence::new();
    listener
        .expect_on_triggered()
        .withf(move |pursuer, _| *pursuer == id)
        .times(1)
        .in_sequence(&mut order)
        .return_const(());
    listener
        .expect_on_chasing()
        .with(eq(id))
        .times(1)
        .in_sequence(&mut order)
        .return_const(());
    listener
        .expect_on_retreating()
        .with(eq(id), eq(RetreatReason::Forced))
        .times(1)
        .in_sequence(&mut order)
        .return_const(());
    listener
        .expect_on_hidden()
        .with(eq(id))
        .times(1)
        .in_sequence(&mut order)
        .return_const(());
    listener
        .expect_on_escaped()
        .with(eq(id))
        .times(1)
        .in_sequence(&mut order)
        .return_const(());

    tick(&mut coordinator, &mut target, &mut listener, 10);
    let area = standard_area();
    {
        let mut collaborators = Collaborators::new(Some(&mut target), &area, &mut listener);
        assert_eq!(coordinator.force_retreat(id, &mut collaborators), Ok(true));
    }
    tick(&mut coordinator, &mut target, &mut listener, 10);
}

#[rstest]
fn catch_notifies_target_and_game_flow_exactly_once() {
    let (mut coordinator, id) = coordinator();
    let mut target = target_near_left();
    target
        .expect_notify_caught()
        .with(eq(id))
        .times(1)
        .return_const(());
    let mut listener = MockListener::new();
    listener.expect_on_triggered().return_const(());
    listener.expect_on_chasing().return_const(());
    listener
        .expect_on_caught()
        .with(eq(id), eq(ContactChannel::Sensor))
        .times(1)
        .return_const(());
    listener.expect_on_game_over().times(1).return_const(());

    tick(&mut coordinator, &mut target, &mut listener, 10);
    let area = standard_area();
    for _ in 0..3 {
        let mut collaborators = Collaborators::new(Some(&mut target), &area, &mut listener);
        let routed = coordinator.report_contact_enter(id, PLAYER, &mut collaborators);
        assert!(routed.is_ok());
    }
    tick(&mut coordinator, &mut target, &mut listener, 40);
    assert!(coordinator.game_over_sent());
}

#[rstest]
fn contact_from_another_object_never_catches() {
    let (mut coordinator, id) = coordinator();
    let mut target = target_near_left();
    target.expect_notify_caught().never();
    let mut listener = MockListener::new();
    listener.expect_on_triggered().return_const(());
    listener.expect_on_chasing().return_const(());
    listener.expect_on_caught().never();

    tick(&mut coordinator, &mut target, &mut listener, 10);
    let area = standard_area();
    let mut collaborators = Collaborators::new(Some(&mut target), &area, &mut listener);
    let routed = coordinator.report_contact_enter(id, TargetId(77), &mut collaborators);
    assert_eq!(routed, Ok(None));
    assert!(!coordinator.is_session_over());
}
