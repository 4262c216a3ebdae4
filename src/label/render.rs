//! # Label Rendering
//!
//! The encoding pipeline does not know how a label image is produced; it
//! only requires an image of exactly the requested pixel size. This module
//! defines that contract ([`LabelRenderer`]) and ships a renderer that lays
//! out the label text with the Spleen bitmap fonts.
//!
//! ## Built-in Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │██████████████ PREP ██████████████████│  kind banner (inverted)
//! │ Chicken Wrap                         │  name, 12x24
//! │ Printed: 18/10/2026   Use by: 21/10  │
//! │ Allergens: gluten, milk              │
//! │ Ingredients: chicken, tortilla, ...  │  6x12, word wrapped
//! │ By: JD                               │
//! └──────────────────────────────────────┘
//! ```
//!
//! Text that does not fit on the canvas is clipped.

use image::{DynamicImage, Rgb, RgbImage};
use spleen_font::{FONT_6X12, FONT_12X24, PSF2Font};

use super::request::{LabelHeight, LabelKind, LabelRequest, LabelVariant};
use crate::error::{EtiquetaError, Result};
use crate::render::dimensions::PixelSize;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Resolution the built-in layout is designed for.
const BASE_DPI: u32 = 203;

/// Produces the raster image for a label.
///
/// Implementations must return an image of exactly `size`; the pipeline
/// rejects anything else.
pub trait LabelRenderer: Send + Sync {
    fn render(&self, label: &LabelRequest, size: PixelSize) -> Result<DynamicImage>;
}

/// Font face used by the built-in renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    /// Spleen 12x24, for the name and banner
    Large,
    /// Spleen 6x12, for everything else
    Small,
}

impl Face {
    fn font_data(self) -> &'static [u8] {
        match self {
            Face::Large => FONT_12X24,
            Face::Small => FONT_6X12,
        }
    }

    fn cell(self) -> (u32, u32) {
        match self {
            Face::Large => (12, 24),
            Face::Small => (6, 12),
        }
    }
}

/// Renders label text with Spleen bitmap fonts.
#[derive(Debug, Clone, Default)]
pub struct BitmapFontRenderer {
    /// Date printed when the request has no `printedOn`; today if `None`
    pub printed_on_fallback: Option<String>,
}

impl BitmapFontRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed date instead of today's.
    pub fn with_date(date: impl Into<String>) -> Self {
        Self {
            printed_on_fallback: Some(date.into()),
        }
    }

    fn printed_on(&self, label: &LabelRequest) -> String {
        label
            .printed_on
            .clone()
            .or_else(|| self.printed_on_fallback.clone())
            .unwrap_or_else(|| chrono::Local::now().format("%d/%m/%Y").to_string())
    }
}

impl LabelRenderer for BitmapFontRenderer {
    fn render(&self, label: &LabelRequest, size: PixelSize) -> Result<DynamicImage> {
        if size.width == 0 || size.height == 0 {
            return Err(EtiquetaError::Render(format!(
                "cannot render a {}x{} label",
                size.width, size.height
            )));
        }

        let mut canvas = Canvas::new(size, scale_for(label.dpi))?;
        let margin = 4 * canvas.scale;

        if let Some(kind) = label.label_kind.and_then(LabelKind::render_kind) {
            canvas.banner(&kind.as_str().to_uppercase());
        }

        canvas.cursor_x = margin;
        canvas.line(Face::Large, &label.name);

        let mut dates = format!("Printed: {}", self.printed_on(label));
        if let Some(expiry) = &label.expiry {
            dates.push_str(&format!("  Use by: {}", expiry));
        }
        canvas.line(Face::Small, &dates);

        let allergens = collect_allergens(label);
        if !allergens.is_empty() {
            canvas.wrapped(Face::Small, &format!("Allergens: {}", allergens.join(", ")));
        }

        if !label.ingredients.is_empty() {
            match label.label_height {
                LabelHeight::Mm80 => {
                    canvas.line(Face::Small, "Ingredients:");
                    for ingredient in &label.ingredients {
                        canvas.line(Face::Small, &format!("- {}", ingredient));
                    }
                }
                LabelHeight::Mm40 => {
                    canvas.wrapped(
                        Face::Small,
                        &format!(
                            "Ingredients: {}",
                            summarize(&label.ingredients, label.max_ingredients)
                        ),
                    );
                }
            }
        }

        if let LabelVariant::Ppds {
            storage_info,
            business_name,
        } = &label.variant
        {
            canvas.wrapped(Face::Small, &format!("Storage: {}", storage_info));
            canvas.line(Face::Small, business_name);
        }

        if let Some(initials) = &label.initials {
            canvas.line(Face::Small, &format!("By: {}", initials));
        }

        Ok(DynamicImage::ImageRgb8(canvas.image))
    }
}

/// Integer font scale for a printer resolution.
fn scale_for(dpi: u32) -> u32 {
    ((dpi as f64 / BASE_DPI as f64).round() as u32).max(1)
}

/// Request allergens plus those mapped from the label's ingredients,
/// de-duplicated and lower-cased, in first-seen order.
pub fn collect_allergens(label: &LabelRequest) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        let name = name.trim().to_lowercase();
        if !name.is_empty() && !out.contains(&name) {
            out.push(name);
        }
    };

    for allergen in &label.allergens {
        push(allergen);
    }
    for ingredient in &label.ingredients {
        let mapped = label
            .all_ingredients
            .iter()
            .filter(|entry| entry.name.eq_ignore_ascii_case(ingredient));
        for entry in mapped {
            for allergen in &entry.allergens {
                push(allergen);
            }
        }
    }

    out
}

/// Join at most `max` items, noting how many were left out.
fn summarize(items: &[String], max: usize) -> String {
    let shown: Vec<&str> = items.iter().take(max).map(String::as_str).collect();
    let mut text = shown.join(", ");
    if items.len() > max {
        text.push_str(&format!(" +{} more", items.len() - max));
    }
    text
}

/// Greedy word wrap to `max_chars` per line. Words longer than a line are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Drawing surface with a text cursor.
struct Canvas {
    image: RgbImage,
    scale: u32,
    cursor_x: u32,
    cursor_y: u32,
}

impl Canvas {
    fn new(size: PixelSize, scale: u32) -> Result<Self> {
        for face in [Face::Large, Face::Small] {
            if PSF2Font::new(face.font_data()).is_err() {
                return Err(EtiquetaError::Render(format!(
                    "failed to load Spleen font {:?}",
                    face
                )));
            }
        }

        Ok(Self {
            image: RgbImage::from_pixel(size.width, size.height, WHITE),
            scale,
            cursor_x: 0,
            cursor_y: 2 * scale,
        })
    }

    fn line_height(&self, face: Face) -> u32 {
        (face.cell().1 + 2) * self.scale
    }

    fn chars_per_line(&self, face: Face) -> usize {
        let usable = self.image.width().saturating_sub(2 * self.cursor_x);
        (usable / (face.cell().0 * self.scale)) as usize
    }

    /// Full-width black bar with centred white text.
    fn banner(&mut self, text: &str) {
        let height = self.line_height(Face::Large);
        let bar_end = height.min(self.image.height());
        for y in 0..bar_end {
            for x in 0..self.image.width() {
                self.image.put_pixel(x, y, BLACK);
            }
        }

        let text_width = text.chars().count() as u32 * Face::Large.cell().0 * self.scale;
        let x = self.image.width().saturating_sub(text_width) / 2;
        self.draw_text(Face::Large, x, self.scale, text, WHITE);
        self.cursor_y = height + 2 * self.scale;
    }

    fn line(&mut self, face: Face, text: &str) {
        let (x, y) = (self.cursor_x, self.cursor_y);
        self.draw_text(face, x, y, text, BLACK);
        self.cursor_y += self.line_height(face);
    }

    fn wrapped(&mut self, face: Face, text: &str) {
        for line in wrap(text, self.chars_per_line(face)) {
            self.line(face, &line);
        }
    }

    fn draw_text(&mut self, face: Face, x: u32, y: u32, text: &str, color: Rgb<u8>) {
        let (cell_w, _) = face.cell();
        let mut pen_x = x;
        for ch in text.chars() {
            if pen_x >= self.image.width() {
                break;
            }
            self.draw_glyph(face, pen_x, y, ch, color);
            pen_x += cell_w * self.scale;
        }
    }

    fn draw_glyph(&mut self, face: Face, x: u32, y: u32, ch: char, color: Rgb<u8>) {
        let (width, height) = self.image.dimensions();
        let scale = self.scale;
        let Ok(mut font) = PSF2Font::new(face.font_data()) else {
            return;
        };

        // Characters missing from the font are left blank
        let utf8 = ch.to_string();
        let Some(glyph) = font.glyph_for_utf8(utf8.as_bytes()) else {
            return;
        };

        for (row_y, row) in glyph.enumerate() {
            for (col_x, on) in row.enumerate() {
                if !on {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = x + col_x as u32 * scale + dx;
                        let py = y + row_y as u32 * scale + dy;
                        if px < width && py < height {
                            self.image.put_pixel(px, py, color);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::request::{self, PrintLabelRequest};
    use serde_json::json;

    fn label(value: serde_json::Value) -> LabelRequest {
        let raw: PrintLabelRequest = serde_json::from_value(value).unwrap();
        request::validate(&raw).unwrap()
    }

    fn menu_label() -> LabelRequest {
        label(json!({
            "type": "menu",
            "name": "Chicken Wrap",
            "labelType": "prep",
            "printer": { "dpi": 203, "labelSizeMm": { "width": 48, "height": 25 } },
            "ingredients": ["chicken", "Tortilla"],
            "allIngredients": [
                { "name": "tortilla", "allergens": ["Gluten"] },
                { "name": "cheese", "allergens": ["milk"] }
            ],
            "allergensList": ["sesame", "gluten"],
            "expiry": "21/10/2026"
        }))
    }

    #[test]
    fn test_renders_exact_size() {
        let renderer = BitmapFontRenderer::with_date("18/10/2026");
        let image = renderer
            .render(&menu_label(), PixelSize::new(384, 200))
            .unwrap();
        assert_eq!((image.width(), image.height()), (384, 200));
    }

    #[test]
    fn test_draws_ink_and_banner() {
        let renderer = BitmapFontRenderer::with_date("18/10/2026");
        let image = renderer
            .render(&menu_label(), PixelSize::new(384, 200))
            .unwrap()
            .to_rgb8();
        // Banner corner is solid black
        assert_eq!(*image.get_pixel(0, 0), BLACK);
        // Bottom-right corner stays white
        assert_eq!(*image.get_pixel(383, 199), WHITE);
    }

    #[test]
    fn test_ppd_label_has_no_banner() {
        let mut label = menu_label();
        label.label_kind = Some(LabelKind::Ppd);
        let image = BitmapFontRenderer::with_date("18/10/2026")
            .render(&label, PixelSize::new(384, 200))
            .unwrap()
            .to_rgb8();
        assert_eq!(*image.get_pixel(0, 0), WHITE);
        assert_eq!(*image.get_pixel(383, 0), WHITE);
    }

    #[test]
    fn test_tiny_canvas_clips() {
        let renderer = BitmapFontRenderer::with_date("18/10/2026");
        let image = renderer.render(&menu_label(), PixelSize::new(5, 3)).unwrap();
        assert_eq!((image.width(), image.height()), (5, 3));
    }

    #[test]
    fn test_collect_allergens_maps_ingredients() {
        assert_eq!(collect_allergens(&menu_label()), vec!["sesame", "gluten"]);

        let mut label = menu_label();
        label.allergens.clear();
        label.ingredients.push("cheese".to_string());
        assert_eq!(collect_allergens(&label), vec!["gluten", "milk"]);
    }

    #[test]
    fn test_summarize() {
        let items: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(summarize(&items, 5), "a, b, c");
        assert_eq!(summarize(&items, 2), "a, b +1 more");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("", 4), Vec::<String>::new());
        assert_eq!(wrap("a b", 0), vec!["a", "b"]);
    }

    #[test]
    fn test_scale_for() {
        assert_eq!(scale_for(203), 1);
        assert_eq!(scale_for(300), 1);
        assert_eq!(scale_for(406), 2);
        assert_eq!(scale_for(100), 1);
    }
}
