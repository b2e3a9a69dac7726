use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use crossbeam_channel::{bounded, Receiver};
use tracing::{debug, error};
use crate::commands::archive::{dispatch, run};
use crate::core::compression::ArchiveProcessor;
use crate::models::{
    ArchiveError, ArchiveResponse, BridgeConfig, MethodCall, Operation, Reply,
};
use crate::utils::parallel::TaskRunner;

/// Entry point for a host application
///
/// Every known call runs as its own background task and is answered exactly
/// once. Calls with an unknown method name are rejected immediately on the
/// caller's thread with `Reply::NotImplemented`.
pub struct ArchiveBridge {
    runner: TaskRunner,
    processor: Arc<ArchiveProcessor>,
}

impl ArchiveBridge {
    pub fn new(config: BridgeConfig) -> Result<Self, ArchiveError> {
        // Fail early on a bad encoding label rather than on every unzip
        config.codec.encoding()?;

        Ok(Self {
            runner: TaskRunner::with_threads(config.threads)?,
            processor: Arc::new(ArchiveProcessor::with_options(config.codec)),
        })
    }

    /// Handle `call` in the background and pass the reply to `on_reply`
    pub fn handle<F>(&self, call: MethodCall, on_reply: F)
    where
        F: FnOnce(Reply) + Send + 'static,
    {
        let operation = match Operation::parse(&call.method) {
            Ok(operation) => operation,
            Err(e) => {
                debug!(method = %call.method, "{}", e);
                on_reply(Reply::NotImplemented);
                return;
            }
        };

        let processor = Arc::clone(&self.processor);
        self.runner.spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| run(operation, &call, &processor)));
            let response = match result {
                Ok(result) => ArchiveResponse::from_result(&result),
                Err(_) => {
                    error!(method = %call.method, "Archive task panicked");
                    ArchiveResponse::fail()
                }
            };
            on_reply(Reply::Response(response));
        });
    }

    /// Handle `call` in the background; the receiver yields exactly one reply
    pub fn submit(&self, call: MethodCall) -> Receiver<Reply> {
        let (tx, rx) = bounded(1);
        self.handle(call, move |reply| {
            // The caller may have dropped the receiver; nothing left to notify
            let _ = tx.send(reply);
        });
        rx
    }

    /// Handle `call` on the current thread
    pub fn call_blocking(&self, call: &MethodCall) -> Reply {
        dispatch(call, &self.processor)
    }

    pub fn thread_count(&self) -> usize {
        self.runner.thread_count()
    }
}
