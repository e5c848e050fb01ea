use super::error::BannerError;
use ab_glyph::{FontArc, PxScale};
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

static BANNER_FONT: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");

/// Pixels rendered per QR module.
const QR_MODULE_PX: u32 = 3;

/// Quiet zone around the QR matrix, in modules.
const QR_QUIET_MODULES: u32 = 1;

/// Minimum vertical room below the text baseline for the label to be drawn.
const MIN_TEXT_ROOM: i64 = 15;

/// Pixel placement of the QR code and identifier label on the template.
#[derive(Debug, Clone)]
pub struct BannerLayout {
    pub qr_size: u32,
    pub qr_right_margin: u32,
    pub qr_top_offset: u32,
    pub text_gap: u32,
    pub font_size: f32,
}

impl Default for BannerLayout {
    fn default() -> Self {
        BannerLayout {
            qr_size: 380,
            qr_right_margin: 280,
            qr_top_offset: 320,
            text_gap: 8,
            font_size: 55.0,
        }
    }
}

/// Renders identification banner images by stamping a vehicle QR code and its
/// identifier onto the municipal template.
pub struct BannerArtifactBuilder {
    template_path: PathBuf,
    layout: BannerLayout,
    font: FontArc,
}

impl BannerArtifactBuilder {
    pub fn new(template_path: PathBuf) -> Self {
        Self::with_layout(template_path, BannerLayout::default())
    }

    pub fn with_layout(template_path: PathBuf, layout: BannerLayout) -> Self {
        BannerArtifactBuilder {
            template_path,
            layout,
            font: embedded_font(),
        }
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = font;
        self
    }

    /// Loads a ttf font from disk, falling back to the embedded DejaVuSans
    /// when the file is missing or not a parseable font.
    pub fn load_font(path: &Path) -> FontArc {
        match std::fs::read(path) {
            Ok(bytes) => match FontArc::try_from_vec(bytes) {
                Ok(font) => return font,
                Err(_) => warn!(
                    "[BANNER] font at {} is not a valid ttf, using the embedded fallback",
                    path.display()
                ),
            },
            Err(err) => warn!(
                "[BANNER] could not read font at {}: {}, using the embedded fallback",
                path.display(),
                err
            ),
        }

        embedded_font()
    }

    /// Builds the QR code for the given payload, scaled to the layout size.
    fn build_qr(&self, data: &str) -> Result<RgbaImage, QrError> {
        let code = QrCode::with_error_correction_level(data, EcLevel::L)?;

        let modules: GrayImage = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(QR_MODULE_PX, QR_MODULE_PX)
            .build();

        let border = QR_QUIET_MODULES * QR_MODULE_PX;
        let mut padded = GrayImage::from_pixel(
            modules.width() + 2 * border,
            modules.height() + 2 * border,
            Luma([255]),
        );
        image::imageops::overlay(&mut padded, &modules, border as i64, border as i64);

        let resized = image::imageops::resize(
            &padded,
            self.layout.qr_size,
            self.layout.qr_size,
            FilterType::Lanczos3,
        );

        Ok(DynamicImage::ImageLuma8(resized).to_rgba8())
    }

    /// Produces the finished banner as PNG bytes.
    ///
    /// The QR code is anchored relative to the right edge of the template and
    /// the identifier is centered under it. On templates too short to fit the
    /// label it is silently omitted, the QR code alone still identifies the
    /// vehicle.
    pub fn render(
        &self,
        identifier: &str,
        plate: &str,
        qr_url: &str,
    ) -> Result<Vec<u8>, BannerError> {
        if !self.template_path.exists() {
            return Err(BannerError::TemplateMissing(self.template_path.clone()));
        }

        let template = image::open(&self.template_path)
            .map_err(|err| generation_error(identifier, err))?;
        let mut banner = template.to_rgba8();

        let qr = self
            .build_qr(qr_url)
            .map_err(|err| generation_error(identifier, err))?;

        let qr_x = banner.width() as i64
            - self.layout.qr_size as i64
            - self.layout.qr_right_margin as i64;
        let qr_y = self.layout.qr_top_offset as i64;
        image::imageops::overlay(&mut banner, &qr, qr_x, qr_y);

        let scale = PxScale::from(self.layout.font_size);
        let (text_width, _) = text_size(scale, &self.font, identifier);
        let text_x = qr_x + (self.layout.qr_size as i64 - text_width as i64) / 2;
        let text_y = qr_y + self.layout.qr_size as i64 + self.layout.text_gap as i64;

        if text_y + MIN_TEXT_ROOM <= banner.height() as i64 {
            draw_text_mut(
                &mut banner,
                Rgba([0, 0, 0, 255]),
                text_x as i32,
                text_y as i32,
                scale,
                &self.font,
                identifier,
            );
        }

        let mut bytes = Cursor::new(Vec::new());
        banner
            .write_to(&mut bytes, image::ImageFormat::Png)
            .map_err(|err| generation_error(identifier, err))?;

        info!("[BANNER] rendered banner for vehicle {} ({})", identifier, plate);

        Ok(bytes.into_inner())
    }
}

fn embedded_font() -> FontArc {
    FontArc::try_from_slice(BANNER_FONT)
        .unwrap_or_else(|_| panic!("[BANNER] embedded font is not a valid ttf"))
}

fn generation_error(
    identifier: &str,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> BannerError {
    BannerError::Generation {
        identifier: identifier.to_string(),
        source: source.into(),
    }
}
