use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::config::ThemeConfig;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Theme: resolved colours handed to the chart renderers
// ---------------------------------------------------------------------------

/// Resolved chart colours. Passed explicitly to every renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub primary: Color32,
    pub male: Color32,
    pub female: Color32,
    categorical: Vec<Color32>,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from_config(&ThemeConfig::default())
    }
}

impl Theme {
    /// Resolve hex strings. Unparseable entries fall back to the default
    /// colour for that slot and are logged.
    pub fn from_config(cfg: &ThemeConfig) -> Self {
        let defaults = ThemeConfig::default();
        let categorical: Vec<Color32> = cfg
            .categorical
            .iter()
            .filter_map(|hex| match Color32::from_hex(hex) {
                Ok(c) => Some(c),
                Err(_) => {
                    log::warn!("ignoring invalid palette colour {hex:?}");
                    None
                }
            })
            .collect();

        Theme {
            primary: parse_or(&cfg.primary, &defaults.primary),
            male: parse_or(&cfg.male, &defaults.male),
            female: parse_or(&cfg.female, &defaults.female),
            categorical,
        }
    }

    /// Colour for the `index`-th of `count` categories. Uses the configured
    /// palette while it is long enough, an evenly spaced hue wheel otherwise.
    pub fn category_colors(&self, count: usize) -> Vec<Color32> {
        if count <= self.categorical.len() {
            self.categorical[..count].to_vec()
        } else if self.categorical.is_empty() {
            generate_palette(count)
        } else {
            // cycle, like the original pie colours
            (0..count)
                .map(|i| self.categorical[i % self.categorical.len()])
                .collect()
        }
    }
}

fn parse_or(hex: &str, fallback: &str) -> Color32 {
    Color32::from_hex(hex).unwrap_or_else(|_| {
        log::warn!("invalid colour {hex:?}, using {fallback}");
        Color32::from_hex(fallback).unwrap_or(Color32::GRAY)
    })
}
