//! Integration tests for cancellable effects in the Store runtime
//!
//! Tests validate that superseded effects never feed their action back,
//! that explicit cancellation aborts running work, and that effect handles
//! still complete when their effects are aborted.

#![allow(clippy::unwrap_used)] // Test code can use unwrap

use composable_todo_core::{
    effect::{Effect, EffectId},
    reducer::Reducer,
    smallvec, SmallVec,
};
use composable_todo_runtime::Store;
use std::time::Duration;

#[derive(Clone, Debug, Default)]
struct JobState {
    finished: Vec<u32>,
}

#[derive(Clone, Debug)]
enum JobAction {
    Start { job: u32, delay: Duration },
    Finished { job: u32 },
    Stop,
    Batch(Vec<u32>),
}

#[derive(Clone)]
struct JobReducer;

fn job_id() -> EffectId {
    EffectId::new("job")
}

impl Reducer for JobReducer {
    type State = JobState;
    type Action = JobAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut JobState,
        action: JobAction,
        _env: &(),
    ) -> SmallVec<[Effect<JobAction>; 4]> {
        match action {
            JobAction::Start { job, delay } => {
                let effect = Effect::future(async move {
                    tokio::time::sleep(delay).await;
                    Some(JobAction::Finished { job })
                });
                smallvec![effect.cancellable(job_id(), true)]
            },
            JobAction::Finished { job } => {
                state.finished.push(job);
                smallvec![Effect::None]
            },
            JobAction::Stop => smallvec![Effect::Cancel(job_id())],
            JobAction::Batch(jobs) => {
                let steps = jobs
                    .into_iter()
                    .map(|job| Effect::future(async move { Some(JobAction::Finished { job }) }))
                    .collect();
                smallvec![Effect::chain(steps)]
            },
        }
    }
}

#[tokio::test]
async fn latest_effect_wins_when_cancelling_in_flight() {
    let store = Store::new(JobState::default(), JobReducer, ());

    let mut first = store
        .send(JobAction::Start {
            job: 1,
            delay: Duration::from_millis(200),
        })
        .await
        .unwrap();
    let mut second = store
        .send(JobAction::Start {
            job: 2,
            delay: Duration::from_millis(10),
        })
        .await
        .unwrap();

    second.wait_with_timeout(Duration::from_secs(2)).await.unwrap();
    // The aborted task still releases its handle
    first.wait_with_timeout(Duration::from_secs(2)).await.unwrap();

    assert_eq!(store.state(|s| s.finished.clone()).await, vec![2]);
}

#[tokio::test]
async fn cancel_aborts_running_effect() {
    let store = Store::new(JobState::default(), JobReducer, ());

    let mut handle = store
        .send(JobAction::Start {
            job: 7,
            delay: Duration::from_secs(30),
        })
        .await
        .unwrap();
    assert_eq!(store.running(&job_id()), 1);

    store.send(JobAction::Stop).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(2)).await.unwrap();

    assert!(store.state(|s| s.finished.is_empty()).await);
    assert_eq!(store.running(&job_id()), 0);
    assert_eq!(store.pending_effects(), 0);
}

#[tokio::test]
async fn sequential_effects_run_in_order() {
    let store = Store::new(JobState::default(), JobReducer, ());

    let mut handle = store.send(JobAction::Batch(vec![3, 1, 2])).await.unwrap();
    handle.wait_with_timeout(Duration::from_secs(2)).await.unwrap();

    assert_eq!(store.state(|s| s.finished.clone()).await, vec![3, 1, 2]);
}

#[tokio::test]
async fn shutdown_times_out_with_running_effects() {
    let store = Store::new(JobState::default(), JobReducer, ());

    store
        .send(JobAction::Start {
            job: 9,
            delay: Duration::from_secs(30),
        })
        .await
        .unwrap();

    let result = store.shutdown(Duration::from_millis(30)).await;
    assert!(result.is_err());
}
