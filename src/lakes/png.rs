// src/lakes/png.rs
//! Визуализация озёр
//!
//! Два представления:
//! - бинарная маска озёр (белое на чёрном) — для отладки и экспорта в другие модули;
//! - совмещённый слой поверх рельефа: серый рельеф, синяя вода, красные маркеры
//!   точек стока.

use image::{ImageBuffer, Luma, Rgba};
use imageproc::drawing::draw_filled_circle_mut;

use crate::heightmap::Heightmap;
use crate::lakes::LakeResult;

/// Цвета совмещённого слоя
const OCEAN_COLOR: [u8; 4] = [24, 64, 120, 255];
const LAKE_COLOR: [u8; 4] = [64, 128, 200, 255];
const OUTFLOW_COLOR: [u8; 4] = [200, 48, 48, 255];

impl LakeResult {
    /// Сохраняет бинарную маску озёр в PNG
    pub fn save_as_png(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let pixels: Vec<u8> = self.mask.iter().map(|&v| if v != 0 { 255 } else { 0 }).collect();
        let img: ImageBuffer<Luma<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width, self.height, pixels)
                .ok_or("Failed to create image buffer")?;
        img.save(path)?;
        Ok(())
    }
}

/// RGBA-байты совмещённого слоя: серый рельеф, океан и озёра синим
#[must_use]
pub fn to_rgba_image(heightmap: &Heightmap, lakes: &LakeResult) -> Vec<u8> {
    heightmap
        .data
        .iter()
        .zip(lakes.mask.iter())
        .flat_map(|(&elevation, &lake)| {
            if lake != 0 {
                LAKE_COLOR
            } else if elevation < heightmap.sea_level {
                OCEAN_COLOR
            } else {
                let gray = (f32::from(elevation) * 2.55).round() as u8;
                [gray, gray, gray, 255]
            }
        })
        .collect()
}

/// Сохраняет совмещённый слой с маркерами стоков в PNG
pub fn save_overlay_png(
    heightmap: &Heightmap,
    lakes: &LakeResult,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(heightmap.width, heightmap.height, to_rgba_image(heightmap, lakes))
            .ok_or("Failed to create image buffer")?;

    // Маркеры стоков поверх готового слоя
    for spillway in &lakes.spillways {
        let (x, y) = spillway.outflow;
        draw_filled_circle_mut(&mut img, (x as i32, y as i32), 1, Rgba(OUTFLOW_COLOR));
    }

    img.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_colors_match_cell_kinds() {
        let mut map = Heightmap::new(4, 1, 20);
        map.data = vec![10, 50, 30, 100];
        let lakes = LakeResult {
            width: 4,
            height: 1,
            mask: vec![0, 0, 1, 0],
            lakes: Vec::new(),
            spillways: Vec::new(),
        };

        let rgba = to_rgba_image(&map, &lakes);
        assert_eq!(rgba.len(), 16);
        assert_eq!(&rgba[0..4], &OCEAN_COLOR);
        assert_eq!(&rgba[8..12], &LAKE_COLOR);
        // Суша — градация серого по высоте
        assert_eq!(&rgba[4..8], &[128, 128, 128, 255]);
        assert_eq!(&rgba[12..16], &[255, 255, 255, 255]);
    }
}
