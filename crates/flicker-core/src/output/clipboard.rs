use crate::CoreResult;

use std::{future::Future, sync::Arc};

/// Writes text to the system clipboard.
pub trait ClipboardWriter: Send + Sync + 'static {
    /// Replace the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Fails when the clipboard is unavailable. Callers treat this as
    /// best-effort.
    fn write_text(&self, text: &str) -> impl Future<Output = CoreResult<()>> + Send;
}

impl<T: ClipboardWriter> ClipboardWriter for Arc<T> {
    fn write_text(&self, text: &str) -> impl Future<Output = CoreResult<()>> + Send {
        (**self).write_text(text)
    }
}
