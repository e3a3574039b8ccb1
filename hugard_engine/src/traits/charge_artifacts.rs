use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Could not render artifact for {invoice_ref}. {reason}")]
    RenderError { invoice_ref: String, reason: String },
    #[error("Artifact I/O error. {0}")]
    IOError(#[from] std::io::Error),
}

/// Disposable side artifacts (scannable codes) keyed by invoice reference. They are not ledger data.
#[allow(async_fn_in_trait)]
pub trait ChargeArtifacts {
    /// Renders `payload` into an artifact stored under `invoice_ref`.
    async fn render(&self, invoice_ref: &str, payload: &str) -> Result<(), ArtifactError>;

    /// Deletes the artifact for `invoice_ref`. A missing artifact is not an error.
    async fn remove(&self, invoice_ref: &str) -> Result<(), ArtifactError>;
}

/// An artifact store that keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoArtifacts;

impl ChargeArtifacts for NoArtifacts {
    async fn render(&self, _invoice_ref: &str, _payload: &str) -> Result<(), ArtifactError> {
        Ok(())
    }

    async fn remove(&self, _invoice_ref: &str) -> Result<(), ArtifactError> {
        Ok(())
    }
}
