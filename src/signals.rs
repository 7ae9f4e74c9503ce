use std::io;
use std::thread;

use tokio::runtime::Builder;

#[cfg(unix)]
type Interrupts = tokio::signal::unix::Signal;

#[cfg(windows)]
type Interrupts = tokio::signal::windows::CtrlC;

#[cfg(unix)]
fn listen() -> io::Result<Interrupts> {
    use tokio::signal::unix::{signal, SignalKind};
    signal(SignalKind::interrupt())
}

#[cfg(windows)]
fn listen() -> io::Result<Interrupts> {
    tokio::signal::windows::ctrl_c()
}

/// Keep Ctrl-C from killing the shell.
///
/// The listener is registered before this returns, so an interrupt that
/// arrives right after startup is already ignored. A background thread then
/// logs and drops each one; only `exit`, `q` or end of input stop the loop.
pub fn ignore_interrupts() -> io::Result<()> {
    let runtime = Builder::new_current_thread().enable_all().build()?;
    let mut interrupts = runtime.block_on(async { listen() })?;
    thread::Builder::new()
        .name("interrupts".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                while interrupts.recv().await.is_some() {
                    log::info!("interrupt ignored, type 'exit' or 'q' to quit");
                }
                log::warn!("interrupt listener closed");
            })
        })?;
    Ok(())
}
