mod common;

use std::time::Duration;

use common::{counter, with_history};
use intentflow::testing::{history_stream_of, intent_stream_of, run_sequence, settle, step};
use intentflow::{ActionOutcome, EngineError, Host, Intent, Props};
use serde_json::Value;

#[tokio::test]
async fn every_action_style_lands_in_history() {
    let host = Host::default();
    let counter = host.mount(&counter(), with_history());
    let mut history = history_stream_of(&counter);
    let actions = counter.actions();

    run_sequence([
        step(|| actions.call("inc", Value::Null).unwrap()),
        step(|| {
            actions
                .from_future(async { Intent::new("inc") })
                .unwrap();
        }),
        step(|| actions.from_event(Intent::new("inc")).unwrap()),
    ])
    .await;

    let state = settle(history.take_last(3))
        .await
        .flatten()
        .expect("three snapshots appended");
    assert_eq!(state.get_i64("count"), Some(3));
    assert_eq!(counter.history_state().len(), 3);
}

#[tokio::test]
async fn reducer_can_emit_followup_intent() {
    let host = Host::default();
    let counter = host.mount(&counter(), with_history());
    let mut intents = intent_stream_of(&counter);

    run_sequence([step(|| counter.actions().call("dec", Value::Null).unwrap())]).await;

    let seen = settle(intents.take(2)).await.expect("two intents");
    assert_eq!(seen[0].kind(), "dec");
    assert_eq!(seen[1].kind(), "dec triggered");
    assert_eq!(counter.current().get_i64("count"), Some(-1));
}

#[tokio::test]
async fn external_prop_seeds_state() {
    let host = Host::default();
    let counter = host.mount(&counter(), with_history().with("count", 9));
    let mut history = history_stream_of(&counter);

    run_sequence([step(|| counter.actions().call("inc", Value::Null).unwrap())]).await;

    let state = settle(history.take_last(1)).await.flatten().expect("snapshot");
    assert_eq!(state.get_i64("count"), Some(10));
}

#[tokio::test]
async fn undeclared_props_are_not_owned_by_history() {
    let host = Host::default();
    let external = with_history()
        .with("wrapperProps", "heheda")
        .with("overwritedProps", "hoho")
        .with("count", 0);
    let counter = host.mount(&counter(), external);
    let actions = counter.actions();

    run_sequence([
        step(|| actions.call("changeWrapperProps", "miao").unwrap()),
        step(|| actions.call("changeDefaultProps", 19).unwrap()),
    ])
    .await;

    assert_eq!(counter.props().get_str("wrapperProps"), Some("heheda"));
    let rendered = counter.rendered().expect("rendered");
    assert_eq!(rendered.wrapper_props, "miao");
    assert_eq!(rendered.overwrited_props, "miao");
    assert_eq!(rendered.count, "19");

    // Parent re-renders with new values for the declared keys.
    counter.set_props(
        with_history()
            .with("wrapperProps", "heheda")
            .with("overwritedProps", "wrapper")
            .with("count", 1),
    );

    let rendered = counter.rendered().expect("rendered");
    assert_eq!(rendered.overwrited_props, "wrapper");
    assert_eq!(rendered.count, "1");
}

#[test]
fn resupplied_external_prop_wins_over_history() {
    let host = Host::default();
    let counter = host.mount(&counter(), with_history().with("count", 0));
    counter.actions().call("changeDefaultProps", 19).unwrap();
    assert_eq!(counter.rendered().unwrap().count, "19");

    counter.set_props(with_history().with("count", 0));

    assert_eq!(counter.rendered().unwrap().count, "0");
    assert_eq!(counter.current().get_i64("count"), Some(0));
    assert_eq!(counter.history_state().len(), 2);
}

#[test]
fn external_props_matching_state_append_nothing() {
    let host = Host::default();
    let counter = host.mount(&counter(), with_history().with("count", 0));
    counter.actions().call("inc", Value::Null).unwrap();
    counter.actions().call("inc", Value::Null).unwrap();

    counter.set_props(with_history().with("count", 2).with("wrapperProps", "new"));

    assert_eq!(counter.current().get_i64("count"), Some(2));
    assert_eq!(counter.history_state().len(), 2);
    assert_eq!(counter.props().get_str("wrapperProps"), Some("new"));
    assert_eq!(counter.rendered().unwrap().wrapper_props, "new");
}

#[test]
fn unknown_action_is_an_error() {
    let host = Host::default();
    let counter = host.mount(&counter(), Props::new());
    let err = counter.actions().call("explode", Value::Null).unwrap_err();
    assert!(matches!(err, EngineError::UnknownAction { name } if name == "explode"));
    assert!(counter.history_state().is_empty());
}

#[test]
fn future_actions_need_a_runtime() {
    let host = Host::default();
    let counter = host.mount(&counter(), Props::new());
    let result = counter.actions().from_future(async { Intent::new("inc") });
    assert!(matches!(result, Err(EngineError::NoRuntime)));
}

#[tokio::test]
async fn rejected_future_sends_nothing() {
    let host = Host::default();
    let counter = host.mount(&counter(), Props::new());

    let pending = counter
        .actions()
        .from_result_future(async { Err::<Intent, _>("backend said no") })
        .unwrap();

    assert_eq!(pending.wait().await, ActionOutcome::Rejected);
    assert!(counter.history_state().is_empty());
}

#[tokio::test]
async fn unmount_cancels_pending_future_actions() {
    let host = Host::default();
    let counter = host.mount(&counter(), Props::new());
    let actions = counter.actions();

    let pending = actions
        .from_future(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Intent::new("inc")
        })
        .unwrap();

    counter.unmount();

    let outcome = settle(pending.wait()).await.expect("settles promptly");
    assert_eq!(outcome, ActionOutcome::Cancelled);
    assert!(!counter.is_mounted());
    assert!(matches!(
        actions.call("inc", Value::Null),
        Err(EngineError::Unmounted { .. })
    ));
    assert!(counter.history_state().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_future_actions_are_all_applied() {
    let host = Host::default();
    let counter = host.mount(&counter(), Props::new());
    let actions = counter.actions();

    let pending: Vec<_> = (0..50)
        .map(|_| {
            actions
                .from_future(async { Intent::new("inc") })
                .unwrap()
        })
        .collect();
    for action in pending {
        assert_eq!(action.wait().await, ActionOutcome::Delivered);
    }

    // A send that lands while another thread drains returns before its
    // intent is applied; wait for the drainer to catch up.
    let caught_up = settle(async {
        while counter.history_state().len() < 50 {
            tokio::task::yield_now().await;
        }
    })
    .await;
    assert!(caught_up.is_some());
    assert_eq!(counter.current().get_i64("count"), Some(50));
    assert_eq!(counter.history_state().len(), 50);
    assert_eq!(counter.rendered().unwrap().count, "50");
}

#[tokio::test]
async fn intents_sent_directly_also_drive_history() {
    let host = Host::default();
    let counter = host.mount(&counter(), Props::new());

    counter.intents().send(Intent::new("inc"));
    counter.intents().send(Intent::new("unknown"));

    let history = counter.history_state();
    assert_eq!(history.len(), 2);
    assert_eq!(history.entries()[1].get_i64("count"), Some(1));
}
