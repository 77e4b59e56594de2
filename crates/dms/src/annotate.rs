//! Frame annotation: landmark markers, numeric readouts, selfie mirror

use ab_glyph::FontVec;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_text_mut};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use video_frame::VideoFrame;

use crate::features::FeatureBundle;
use crate::state::ColorState;
use crate::{DmsConfig, DmsError};

/// Warning shown while the alarm is sounding
pub const WAKE_UP_TEXT: &str = "WAKE UP! WAKE UP";

const EAR_TEXT_POS: (i32, i32) = (10, 30);
const MAR_TEXT_POS: (i32, i32) = (10, 60);

/// One text readout placed on the output frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlay {
    pub text: String,
    /// Top-left corner in output (mirrored) coordinates
    pub origin: (i32, i32),
    pub color: [u8; 3],
}

/// Values shown on screen for one frame with a face
#[derive(Debug, Clone, Copy)]
pub struct Readout {
    pub ear: f64,
    pub mar: f64,
    pub drowsy_time: f64,
    pub play_alarm: bool,
    pub color: ColorState,
}

/// Text readouts for a frame of the given height
pub fn readouts(readout: &Readout, frame_height: u32) -> Vec<TextOverlay> {
    let color = readout.color.rgb();
    let half = (frame_height / 2) as f64;
    let drowsy_pos = (10, (half * 1.7) as i32);
    let alarm_pos = (10, (half * 1.85) as i32);

    let mut overlays = vec![
        TextOverlay {
            text: format!("EAR: {:.2}", readout.ear),
            origin: EAR_TEXT_POS,
            color,
        },
        TextOverlay {
            text: format!("MAR: {:.2}", readout.mar),
            origin: MAR_TEXT_POS,
            color,
        },
        TextOverlay {
            text: format!("DROWSY: {:.3} Secs", readout.drowsy_time),
            origin: drowsy_pos,
            color,
        },
    ];
    if readout.play_alarm {
        overlays.push(TextOverlay {
            text: WAKE_UP_TEXT.to_string(),
            origin: alarm_pos,
            color,
        });
    }
    overlays
}

/// Draws feedback onto frames
pub struct FrameAnnotator {
    font: Option<FontVec>,
    marker_radius: i32,
    text_scale: f32,
    mirror: bool,
}

impl FrameAnnotator {
    pub fn new(config: &DmsConfig) -> Result<Self, DmsError> {
        let font = match &config.font_path {
            Some(path) => {
                info!("Loading annotation font from {}", path);
                let bytes = std::fs::read(path)
                    .map_err(|e| DmsError::Font(format!("{}: {}", path, e)))?;
                Some(load_font(bytes)?)
            }
            None => {
                warn!("No annotation font configured. Text readouts will not be drawn.");
                None
            }
        };

        Ok(Self {
            font,
            marker_radius: config.marker_radius,
            text_scale: config.text_scale,
            mirror: config.mirror,
        })
    }

    /// Use an in-memory font instead of `font_path`
    pub fn with_font_bytes(mut self, bytes: Vec<u8>) -> Result<Self, DmsError> {
        self.font = Some(load_font(bytes)?);
        Ok(self)
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Markers first (in detector coordinates), then the mirror, then text
    /// so the readouts stay legible.
    pub fn annotate(
        &self,
        frame: VideoFrame,
        features: Option<&FeatureBundle>,
        overlays: &[TextOverlay],
        color: ColorState,
    ) -> Result<VideoFrame, DmsError> {
        let (mut img, timestamp_ns, sequence) = frame.into_rgb_image()?;

        if let Some(features) = features {
            self.draw_markers(&mut img, features, color);
        }

        if self.mirror {
            image::imageops::flip_horizontal_in_place(&mut img);
        }

        if let Some(font) = &self.font {
            for overlay in overlays {
                draw_text_mut(
                    &mut img,
                    Rgb(overlay.color),
                    overlay.origin.0,
                    overlay.origin.1,
                    self.text_scale,
                    font,
                    &overlay.text,
                );
            }
        }

        Ok(VideoFrame::from_rgb_image(img, timestamp_ns, sequence))
    }

    fn draw_markers(&self, img: &mut RgbImage, features: &FeatureBundle, color: ColorState) {
        let rgb = Rgb(color.rgb());
        for point in features.marker_points() {
            draw_filled_circle_mut(img, (point.x, point.y), self.marker_radius, rgb);
        }
    }
}

fn load_font(bytes: Vec<u8>) -> Result<FontVec, DmsError> {
    FontVec::try_from_vec(bytes).map_err(|e| DmsError::Font(e.to_string()))
}
