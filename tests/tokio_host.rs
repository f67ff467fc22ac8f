use std::sync::Arc;

use asyncbreak::capture::NullCapture;
use asyncbreak::config::Options;
use asyncbreak::finder::{BreakFinder, Mark};
use asyncbreak::host::tokio::{scope_traced, spawn_traced};
use asyncbreak::host::{HostAdapter, TokioHost};
use tokio::sync::mpsc;

fn setup() -> (Arc<TokioHost>, Arc<BreakFinder>) {
    let host = TokioHost::new(Box::new(NullCapture));
    let finder = Arc::new(BreakFinder::new(
        host.clone() as Arc<dyn HostAdapter>,
        Options::default(),
    ));
    (host, finder)
}

#[tokio::test]
async fn outside_any_traced_task_the_root_is_active() {
    let (host, finder) = setup();
    assert!(host.current_active_id().is_root());
    assert!(finder.mark().id().is_root());
}

#[tokio::test]
async fn chain_survives_spawn_and_scope() {
    let (host, finder) = setup();

    let task_finder = finder.clone();
    let task_host = host.clone();
    let handle = spawn_traced(&host, &finder, "timer-fired", async move {
        let mark = task_finder.mark();

        let inner_finder = task_finder.clone();
        scope_traced(&task_host, &task_finder, "deferred-callback", async move {
            inner_finder.check(mark)
        })
        .await
    });

    assert!(handle.await.unwrap().is_ok());
}

#[tokio::test]
async fn chain_breaks_across_a_channel() {
    let (host, finder) = setup();

    let (tx, mut rx) = mpsc::channel::<Mark>(1);

    // The worker is spawned from the test body, so it descends from the
    // root, not from the producer whose mark it receives.
    let worker_finder = finder.clone();
    let worker = spawn_traced(&host, &finder, "worker-loop", async move {
        match rx.recv().await {
            Some(mark) => worker_finder.check(mark),
            None => Ok(()),
        }
    });

    let producer_finder = finder.clone();
    let producer = spawn_traced(&host, &finder, "timer-fired", async move {
        let mark = producer_finder.mark();
        let _ = tx.send(mark).await;
        mark
    });

    let mark = producer.await.unwrap();
    let err = worker.await.unwrap().unwrap_err();

    assert_eq!(err.marked, mark.id());
    assert_eq!(err.report.ancestor_subtree.id, mark.id());

    // The orphan chain is the worker's own lineage and never mentions the
    // marked producer.
    let ids: Vec<_> = err.report.orphan_chain.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![err.current]);
    assert!(!ids.contains(&mark.id()));
}

#[tokio::test]
async fn completion_notifications_prune_finished_tasks() {
    let (host, finder) = setup();

    let task_finder = finder.clone();
    let handle = spawn_traced(&host, &finder, "timer-fired", async move {
        task_finder.mark().id()
    });

    let id = handle.await.unwrap();
    assert_eq!(finder.node_count(), 2);

    finder.complete(id);
    assert_eq!(finder.node_count(), 1);
}
