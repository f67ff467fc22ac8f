// src/lib.rs

pub mod capture;
pub mod cli;
pub mod config;
pub mod diagnose;
pub mod errors;
pub mod finder;
pub mod forest;
pub mod host;
pub mod logging;
pub mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;

use crate::capture::{BacktraceCapture, CaptureStrategy};
use crate::cli::{CliArgs, Scenario};
use crate::config::Options;
use crate::host::tokio::spawn_traced;
use crate::host::{SimHost, TokioHost};

pub use crate::diagnose::{BreakReport, ChainLink, OrphanChain, SubtreeNode};
pub use crate::errors::BreakDetected;
pub use crate::finder::{BreakFinder, Mark};
pub use crate::forest::{AsyncNode, CausalityRegistry, NodeId};
pub use crate::host::HostAdapter;

const MAGENTA: &str = "\u{1b}[35m";
const RESET: &str = "\u{1b}[0m";

/// High-level entry point used by `main.rs`.
///
/// Builds options (file, environment, flags), runs the selected demo
/// scenario, and reports the outcome: intact chains print a one-liner,
/// broken ones render the two diagnostic trees inline or persist them as an
/// HTML artifact.
pub async fn run(args: CliArgs) -> Result<()> {
    let mut options = match &args.config {
        Some(path) => config::load_from_path(path)?.apply_env(),
        None => Options::from_env(),
    };
    if args.keep_internals {
        options.keep_internal_frames = true;
    }
    if args.artifact {
        options.produce_artifact = true;
    }

    let outcome = match args.scenario {
        Scenario::Linked => scenario_linked(&options),
        Scenario::Broken => scenario_broken(&options),
        Scenario::TokioBroken => scenario_tokio_broken(&options).await?,
    };

    match outcome {
        Ok(()) => {
            info!("causal chain intact");
            println!("Path found: the checked point descends from the marked point.");
            Ok(())
        }
        Err(err) => {
            report_break(&options, &err)?;
            Err(err.into())
        }
    }
}

/// Context propagated properly: the checked work was created while the
/// marked work was active, so the parent walk finds the mark.
fn scenario_linked(options: &Options) -> std::result::Result<(), BreakDetected> {
    let host = SimHost::new(capture_for(options));
    let finder = BreakFinder::new(host.clone() as Arc<dyn HostAdapter>, options.clone());

    let timer = host.allocate_id();
    finder.on_create(timer, "timer-fired");
    let _timer_active = host.activate(timer);
    let mark = finder.mark();

    let continuation = host.allocate_id();
    finder.on_create(continuation, "deferred-callback");
    let _continuation_active = host.activate(continuation);

    finder.check(mark)
}

/// The break the tool exists for: a hand-rolled callback buffer. Work is
/// marked inside one timer, but its continuation is stashed in a plain
/// buffer and later executed under an unrelated timer, so the runtime never
/// sees the descent.
fn scenario_broken(options: &Options) -> std::result::Result<(), BreakDetected> {
    let host = SimHost::new(capture_for(options));
    let finder = BreakFinder::new(host.clone() as Arc<dyn HostAdapter>, options.clone());

    let timer = host.allocate_id();
    finder.on_create(timer, "timer-fired");
    let mark;
    {
        let _timer_active = host.activate(timer);
        mark = finder.mark();
        // A branch the marked work did spawn, so the subtree has a child.
        let side = host.allocate_id();
        finder.on_create(side, "deferred-callback");
    }

    // The buffer is drained by an unrelated timer; the continuation now
    // descends from it instead of the marked work.
    let drain = host.allocate_id();
    finder.on_create(drain, "timer-fired");
    let _drain_active = host.activate(drain);
    let continuation = host.allocate_id();
    finder.on_create(continuation, "deferred-callback");
    let _continuation_active = host.activate(continuation);

    finder.check(mark)
}

/// Same severing, across real tokio tasks: the mark travels through a
/// channel to a worker spawned from the top level, which does not descend
/// from the producer.
async fn scenario_tokio_broken(
    options: &Options,
) -> Result<std::result::Result<(), BreakDetected>> {
    let host = TokioHost::new(capture_for(options));
    let finder = Arc::new(BreakFinder::new(
        host.clone() as Arc<dyn HostAdapter>,
        options.clone(),
    ));

    let (tx, mut rx) = mpsc::channel::<Mark>(1);

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
    });

    producer.await.context("producer task panicked")?;
    worker.await.context("worker task panicked")
}

fn capture_for(options: &Options) -> Box<dyn CaptureStrategy> {
    Box::new(BacktraceCapture::new(options.keep_internal_frames))
}

fn report_break(options: &Options, err: &BreakDetected) -> Result<()> {
    if options.produce_artifact {
        let path =
            render::write_break_artifact(&options.effective_artifact_dir(), &err.report)?;
        println!("No path found! See {}", path.display());
        return Ok(());
    }

    println!(
        "No path found! There is no async context chain between the two pieces \
         of code you've identified."
    );
    println!();
    println!(
        "{MAGENTA}Here is the async tree starting at the first point you identified."
    );
    println!(
        "In one of the edges, asynchronous context is lost probably due to \
         userland scheduling.{RESET}"
    );
    println!(
        "{}",
        render::framed(&render::render_subtree(&err.report.ancestor_subtree))
    );
    println!();
    println!(
        "{MAGENTA}Here is the async branch that leads to the second point you identified."
    );
    println!("Somewhere, you'll need to bind the two together.{RESET}");
    println!(
        "{}",
        render::framed(&render::render_chain(&err.report.orphan_chain))
    );
    Ok(())
}
