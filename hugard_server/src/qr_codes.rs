use std::{io::ErrorKind, path::PathBuf};

use hugard_engine::{ArtifactError, ChargeArtifacts};
use log::*;
use qrcode::{render::svg, QrCode};

use crate::helpers::is_safe_reference;

/// Stores payment QR codes as SVG files, one per pending charge, named after the invoice reference.
#[derive(Debug, Clone)]
pub struct QrCodeStore {
    dir: PathBuf,
}

impl QrCodeStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the storage directory if it does not exist yet.
    pub async fn init(&self) -> Result<(), ArtifactError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        debug!("🖼️ QR codes are stored in {}", self.dir.display());
        Ok(())
    }

    /// The file for `invoice_ref`, or `None` if the reference cannot safely be used as a file name.
    pub fn path_for(&self, invoice_ref: &str) -> Option<PathBuf> {
        is_safe_reference(invoice_ref).then(|| self.dir.join(format!("{invoice_ref}.svg")))
    }

    /// Reads the SVG for `invoice_ref`. Returns `None` if there is no code for it.
    pub async fn fetch(&self, invoice_ref: &str) -> Result<Option<String>, ArtifactError> {
        let Some(path) = self.path_for(invoice_ref) else {
            return Ok(None);
        };
        match tokio::fs::read_to_string(&path).await {
            Ok(svg) => Ok(Some(svg)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn invalid(invoice_ref: &str) -> ArtifactError {
        ArtifactError::RenderError {
            invoice_ref: invoice_ref.to_string(),
            reason: "The invoice reference contains unsupported characters".to_string(),
        }
    }
}

/// Renders `payload` as a black on white SVG QR code.
pub fn render_svg(payload: &str) -> Result<String, qrcode::types::QrError> {
    let code = QrCode::new(payload.as_bytes())?;
    let svg = code
        .render::<svg::Color>()
        .min_dimensions(256, 256)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();
    Ok(svg)
}

impl ChargeArtifacts for QrCodeStore {
    async fn render(&self, invoice_ref: &str, payload: &str) -> Result<(), ArtifactError> {
        let path = self.path_for(invoice_ref).ok_or_else(|| Self::invalid(invoice_ref))?;
        let svg = render_svg(payload).map_err(|e| ArtifactError::RenderError {
            invoice_ref: invoice_ref.to_string(),
            reason: e.to_string(),
        })?;
        tokio::fs::write(&path, svg).await?;
        trace!("🖼️ QR code for {invoice_ref} written to {}", path.display());
        Ok(())
    }

    async fn remove(&self, invoice_ref: &str) -> Result<(), ArtifactError> {
        let path = self.path_for(invoice_ref).ok_or_else(|| Self::invalid(invoice_ref))?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                trace!("🖼️ QR code for {invoice_ref} removed");
                Ok(())
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!("🖼️ No QR code to remove for {invoice_ref}");
                Ok(())
            },
            Err(e) => Err(e.into()),
        }
    }
}
