//! Page rasterisation for vision models.
//!
//! Vision chat APIs accept images, not PDF documents, so the first pages of
//! a resume are rendered with pdfium and attached as base64 PNGs.
//!
//! pdfium is not safe to drive from async worker threads; callers run
//! [`PageRasterizer::rasterize`] inside `spawn_blocking`.

use crate::error::ExtractorError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::io::Cursor;
use std::path::PathBuf;
use tracing::{debug, info};

/// Pages sent to the model. Skills rarely live past page four of a resume.
pub const DEFAULT_MAX_PAGES: usize = 4;

/// Longest rendered edge in pixels.
pub const DEFAULT_MAX_PIXELS: u32 = 1600;

/// Turns PDF bytes into page images. Implementations may block.
pub trait PageRasterizer: Send + Sync {
    fn rasterize(&self, pdf: &[u8]) -> Result<Vec<DynamicImage>, ExtractorError>;
}

/// [`PageRasterizer`] backed by the pdfium library.
#[derive(Debug, Clone)]
pub struct PdfiumRasterizer {
    pub max_pages: usize,
    pub max_pixels: u32,
    /// Explicit pdfium library; `None` loads it from the system search path.
    pub library_path: Option<PathBuf>,
}

impl Default for PdfiumRasterizer {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_pixels: DEFAULT_MAX_PIXELS,
            library_path: None,
        }
    }
}

impl PdfiumRasterizer {
    /// Default limits, library from `PDFIUM_LIB_PATH` when set.
    pub fn from_env() -> Self {
        Self {
            library_path: std::env::var_os("PDFIUM_LIB_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            ..Self::default()
        }
    }

    fn bind(&self) -> Result<Pdfium, ExtractorError> {
        let bindings = match self.library_path {
            Some(ref path) => Pdfium::bind_to_library(path.as_path()),
            None => Pdfium::bind_to_system_library(),
        };
        bindings.map(Pdfium::new).map_err(|e| {
            ExtractorError::Render(format!(
                "pdfium library unavailable ({e:?}); set PDFIUM_LIB_PATH to libpdfium"
            ))
        })
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(&self, pdf: &[u8]) -> Result<Vec<DynamicImage>, ExtractorError> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|e| ExtractorError::Render(format!("{e:?}")))?;

        let pages = document.pages();
        let total = pages.len() as usize;
        let count = total.min(self.max_pages);
        info!("PDF loaded: {} pages, rendering {}", total, count);

        let render_config = PdfRenderConfig::new()
            .set_target_width(self.max_pixels as i32)
            .set_maximum_height(self.max_pixels as i32);

        let mut images = Vec::with_capacity(count);
        for idx in 0..count {
            let page = pages
                .get(idx as u16)
                .map_err(|e| ExtractorError::Render(format!("page {}: {e:?}", idx + 1)))?;
            let bitmap = page
                .render_with_config(&render_config)
                .map_err(|e| ExtractorError::Render(format!("page {}: {e:?}", idx + 1)))?;
            let image = bitmap.as_image();
            debug!("Rendered page {} → {}x{} px", idx + 1, image.width(), image.height());
            images.push(image);
        }
        Ok(images)
    }
}

/// Encode a rendered page as a base64 PNG attachment.
pub fn encode_page(img: &DynamicImage) -> Result<ImageData, ExtractorError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ExtractorError::Render(format!("PNG encoding failed: {e}")))?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded page → {} bytes base64", b64.len());
    Ok(ImageData::new(b64, "image/png").with_detail("high"))
}
