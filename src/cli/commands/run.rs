//! Run tasks

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;

use ffpipe::adapters::{LocalFileSystem, ShellRunner};
use ffpipe::core::models::Verbosity;
use ffpipe::core::services::Executor;
use ffpipe::output::{OutputMode, RunSummary};

/// Run the named tasks and their dependencies (every task when `tasks` is empty)
pub fn run(
    file: Option<&Path>,
    tasks: &[String],
    verbosity: Option<Verbosity>,
    always_execute: bool,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let cancel = interrupt_flag();
    let pipeline = super::load(file)?;
    let selected = pipeline.graph.resolve(tasks)?;

    let fs = LocalFileSystem::new();
    let runner = ShellRunner::new(&pipeline.config.root);
    let report = Executor::new(&fs, &runner)
        .default_verbosity(pipeline.config.verbosity)
        .verbosity_override(verbosity)
        .always_execute(always_execute)
        .cancel_flag(cancel)
        .run(&selected);

    RunSummary::from_report(&report).render(mode);
    report.into_result()?;
    Ok(())
}

/// A flag raised by the first Ctrl-C; a second one exits immediately
///
/// The handler is registered before this returns. Without one (no signal
/// support) the flag simply never rises.
fn interrupt_flag() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let raised = Arc::clone(&flag);
    let (ready_tx, ready_rx) = mpsc::channel();

    let spawned = thread::Builder::new().name("interrupt".to_string()).spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime,
            Err(err) => {
                log::debug!("no interrupt handler: {err}");
                return;
            },
        };
        runtime.block_on(async move {
            let mut interrupts = match listen() {
                Ok(interrupts) => interrupts,
                Err(err) => {
                    log::debug!("no interrupt handler: {err}");
                    return;
                },
            };
            let _ = ready_tx.send(());

            if interrupts.recv().await.is_some() {
                log::warn!("interrupted, stopping after the current task");
                raised.store(true, Ordering::SeqCst);
            }
            if interrupts.recv().await.is_some() {
                log::warn!("interrupted again, exiting");
                std::process::exit(130);
            }
        });
    });

    match spawned {
        Ok(_) => {
            let _ = ready_rx.recv();
        },
        Err(err) => log::debug!("no interrupt handler: {err}"),
    }
    flag
}

#[cfg(unix)]
fn listen() -> std::io::Result<tokio::signal::unix::Signal> {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
}

#[cfg(windows)]
fn listen() -> std::io::Result<tokio::signal::windows::CtrlC> {
    tokio::signal::windows::ctrl_c()
}
