//! Scoped document sessions.

use tracing::warn;

use crate::document::{Document, DocumentProvider};
use crate::ports::ScrapeError;

/// A document session that is released through [`Session::finish`].
///
/// Work results are threaded through `finish` so the session is closed on success and
/// failure alike. Do not use `?` between [`Session::open`] and `finish`.
pub struct Session {
    document: Box<dyn Document>,
    closed: bool,
}

impl Session {
    /// Acquire a session from the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Document`] when the provider cannot start a session.
    pub async fn open(provider: &dyn DocumentProvider) -> Result<Self, ScrapeError> {
        let document = provider.open().await?;
        Ok(Self {
            document,
            closed: false,
        })
    }

    /// Document to run the work against.
    pub fn document(&mut self) -> &mut dyn Document {
        self.document.as_mut()
    }

    /// Close the session and hand back the work result.
    ///
    /// When the work failed, its error wins and a close failure is only logged.
    ///
    /// # Errors
    ///
    /// Returns the work error, or the close error after successful work.
    pub async fn finish<T>(mut self, result: Result<T, ScrapeError>) -> Result<T, ScrapeError> {
        self.closed = true;
        let closed = self.document.close().await;

        match (result, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) => Err(err.into()),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                warn!(error = %close_err, "failed to close document session after error");
                Err(err)
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.closed {
            warn!("document session dropped without being closed");
        }
    }
}
