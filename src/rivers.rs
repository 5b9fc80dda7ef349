use image::{ImageBuffer, Luma};

/// Маска рек — вход гидрологической стадии
///
/// Генератор сам реки не строит: маску поставляет внешний модуль накопления
/// потока. Ненулевая клетка означает, что по ней течёт река; только такие
/// клетки рассматриваются как кандидаты на дно озера.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiverMask {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RiverMask {
    /// Пустая маска: рек нет, озёра не образуются
    #[must_use]
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height) as usize],
        }
    }

    /// Маска из списка клеток (удобно в тестах и демо)
    #[must_use]
    pub fn from_cells(width: u32, height: u32, cells: &[(u32, u32)]) -> Self {
        let mut mask = Self::empty(width, height);
        for &(x, y) in cells {
            mask.data[(y * width + x) as usize] = 1;
        }
        mask
    }

    /// Загружает маску из PNG: любой ненулевой пиксель считается рекой
    pub fn from_png(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let img = image::open(path)?.to_luma8();
        let (width, height) = img.dimensions();
        let data = img
            .into_raw()
            .into_iter()
            .map(|v| u8::from(v != 0))
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[must_use]
    pub fn is_river(&self, x: u32, y: u32) -> bool {
        self.data[(y * self.width + x) as usize] != 0
    }

    pub fn save_as_png(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let pixels: Vec<u8> = self.data.iter().map(|&v| if v != 0 { 255 } else { 0 }).collect();
        let img: ImageBuffer<Luma<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width, self.height, pixels)
                .ok_or("Failed to create image buffer")?;
        img.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_cells_marks_only_listed() {
        let mask = RiverMask::from_cells(4, 3, &[(0, 0), (2, 1)]);
        assert!(mask.is_river(0, 0));
        assert!(mask.is_river(2, 1));
        assert!(!mask.is_river(1, 0));
        assert_eq!(mask.data.iter().filter(|&&v| v != 0).count(), 2);
    }

    #[test]
    fn empty_mask_has_no_rivers() {
        let mask = RiverMask::empty(8, 8);
        assert!(mask.data.iter().all(|&v| v == 0));
    }
}
