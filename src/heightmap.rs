use crate::config::{RidgeSettings, TerrainSettings};
use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use image::{ImageBuffer, Luma};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Двумерная карта высот: целые значения от 0 (глубокий океан) до 100 (высокие горы)
///
/// Уровень моря хранится вместе с картой: все последующие стадии (озёра, биомы)
/// читают его отсюда, а не из конфигурации.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heightmap {
    pub width: u32,
    pub height: u32,
    pub sea_level: u8,
    pub data: Vec<u8>,
}

impl Heightmap {
    #[must_use]
    pub fn new(width: u32, height: u32, sea_level: u8) -> Self {
        Self {
            width,
            height,
            sea_level,
            data: vec![0; (width * height) as usize],
        }
    }

    /// Преобразование 2D-координат в плоский индекс (row-major)
    #[must_use]
    pub fn idx(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    /// Обратное преобразование плоского индекса в (x, y)
    #[must_use]
    pub fn coords(&self, idx: usize) -> (u32, u32) {
        (idx as u32 % self.width, idx as u32 / self.width)
    }

    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        self.data[(y * self.width + x) as usize] = value;
    }

    /// Суша — всё, что не ниже уровня моря
    #[must_use]
    pub fn is_land(&self, x: u32, y: u32) -> bool {
        self.get(x, y) >= self.sea_level
    }

    /// Фактическая доля суши на карте
    #[must_use]
    pub fn land_ratio(&self) -> f32 {
        let land = self
            .data
            .iter()
            .filter(|&&v| v >= self.sea_level)
            .count();
        land as f32 / self.data.len() as f32
    }

    #[must_use]
    pub fn to_grayscale_image(&self) -> Vec<u8> {
        self.data
            .par_iter()
            .map(|&v| (f32::from(v) * 2.55).round() as u8)
            .collect()
    }

    pub fn save_as_png(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let img: ImageBuffer<Luma<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width, self.height, self.to_grayscale_image())
                .ok_or("Failed to create image buffer")?;
        img.save(path)?;
        Ok(())
    }
}

/// Генерирует карту высот: шум → нормализация → сглаживание → хребты
///
/// Детерминированность: результат — чистая функция от `(seed, размеры, настройки)`.
/// Шум зависит только от сида и координат клетки, PRNG хребтов передаётся явно
/// и нигде не разделяется между запусками.
pub fn generate_heightmap(
    seed: u64,
    width: u32,
    height: u32,
    terrain: &TerrainSettings,
    ridges: &RidgeSettings,
) -> Heightmap {
    // === 1. Многооктавный шум ===
    let raw = sample_noise_field(seed, width, height, terrain);

    // === 2. Нормализация в целые высоты с целевой долей суши ===
    let mut data = normalize_elevations(&raw, terrain.land_ratio, terrain.sea_level);

    // === 3. Сглаживание ===
    smooth_heightmap(
        &mut data,
        width as usize,
        height as usize,
        terrain.smooth_passes,
    );

    // === 4. Горные хребты ===
    if ridges.count > 0 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(0xD1E5));
        carve_ridges(&mut data, width, height, &mut rng, ridges);
    }

    Heightmap {
        width,
        height,
        sea_level: terrain.sea_level,
        data,
    }
}

/// Сэмплирует сырое поле шума в диапазоне [0, 1]
///
/// Октавы суммируются явно: частота растёт как `lacunarity^o`, амплитуда падает
/// как `persistence^o`. Накопленная максимальная амплитуда используется для
/// обратного масштабирования `(v + max) / (2 * max)`.
fn sample_noise_field(seed: u64, width: u32, height: u32, terrain: &TerrainSettings) -> Vec<f32> {
    let mut noise = FastNoiseLite::new();
    noise.set_seed(Some(seed as i32));
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    // Октавы складываем сами, встроенный фрактал не нужен
    noise.set_fractal_type(Some(FractalType::None));
    noise.set_frequency(Some(terrain.base_frequency));

    let octaves = terrain.octaves;
    let persistence = terrain.persistence;
    let lacunarity = terrain.lacunarity;

    (0..(width * height))
        .into_par_iter()
        .map(|i| {
            let x = (i % width) as f32;
            let y = (i / width) as f32;

            let mut value = 0.0;
            let mut amplitude = 1.0;
            let mut frequency = 1.0;
            let mut max_amplitude = 0.0;

            for _ in 0..octaves {
                value += noise.get_noise_2d(x * frequency, y * frequency) * amplitude;
                max_amplitude += amplitude;
                amplitude *= persistence;
                frequency *= lacunarity;
            }

            (value + max_amplitude) / (2.0 * max_amplitude)
        })
        .collect()
}

/// Переводит поле [0, 1] в целые высоты [0, 100] с заданной долей суши
///
/// Порог берётся из отсортированной копии поля по перцентилю `(1 - land_ratio)`,
/// после чего обе половины растягиваются линейно: `[0, порог] → [0, sea_level]`
/// и `[порог, 1] → [sea_level, 100]`. Именно кусочная растяжка (а не общий
/// масштаб) гарантирует долю суши независимо от формы распределения шума.
fn normalize_elevations(raw: &[f32], land_ratio: f32, sea_level: u8) -> Vec<u8> {
    let mut sorted = raw.to_vec();
    sorted.sort_unstable_by(f32::total_cmp);
    let cut = ((1.0 - land_ratio) * (sorted.len() - 1) as f32).floor() as usize;
    let sea_value = sorted[cut];

    let sea = f32::from(sea_level);

    raw.iter()
        .map(|&v| {
            if v <= sea_value {
                if sea_value <= 0.0 {
                    // Вырожденное поле: деления на ноль нет, всё уходит на дно
                    return 0;
                }
                let e = (v / sea_value * sea).round();
                if v < sea_value {
                    // Клетка строго ниже порога обязана остаться под уровнем моря,
                    // иначе округление вверх раздувает долю суши
                    e.min(sea - 1.0) as u8
                } else {
                    sea_level
                }
            } else {
                let span = 1.0 - sea_value;
                let e = if span <= 0.0 {
                    sea
                } else {
                    sea + (v - sea_value) / span * (100.0 - sea)
                };
                e.round().clamp(sea, 100.0) as u8
            }
        })
        .collect()
}

/// Сглаживание усредняющим фильтром 3×3
///
/// Каждый проход читает снимок предыдущего состояния целиком — чтение и запись
/// в один буфер дало бы направленный дрейф рельефа. Граничные клетки не трогаем.
pub fn smooth_heightmap(data: &mut Vec<u8>, width: usize, height: usize, passes: usize) {
    if width < 3 || height < 3 {
        return;
    }

    for _ in 0..passes {
        let snapshot = data.clone();
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let mut sum: u32 = 0;
                for ny in (y - 1)..=(y + 1) {
                    for nx in (x - 1)..=(x + 1) {
                        sum += u32::from(snapshot[ny * width + nx]);
                    }
                }
                data[y * width + x] = (sum as f32 / 9.0).round() as u8;
            }
        }
    }
}

/// Накладывает горные хребты поверх готового рельефа
///
/// Каждый хребет — случайная линия: шагаем от стартовой точки единичными шагами
/// и в каждой точке поднимаем окрестность с радиальным затуханием. Хребты только
/// поднимают рельеф, существующие высоты никогда не опускаются.
fn carve_ridges(
    data: &mut [u8],
    width: u32,
    height: u32,
    rng: &mut ChaCha8Rng,
    settings: &RidgeSettings,
) {
    for _ in 0..settings.count {
        let mut cx = rng.gen_range(0..width) as f32;
        let mut cy = rng.gen_range(0..height) as f32;
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let length = rng.gen_range(settings.min_length..=settings.max_length);
        let peak = rng.gen_range(settings.min_peak..=settings.max_peak);
        let half_width = rng.gen_range(settings.min_width..=settings.max_width);

        let (step_x, step_y) = (angle.cos(), angle.sin());

        for _ in 0..length {
            stamp_ridge_point(data, width, height, cx, cy, peak, half_width);
            cx += step_x;
            cy += step_y;
        }
    }
}

/// Поднимает окрестность одной точки осевой линии хребта
fn stamp_ridge_point(data: &mut [u8], width: u32, height: u32, cx: f32, cy: f32, peak: f32, half_width: f32) {
    let radius = half_width.ceil() as i32;
    let center_x = cx.round() as i32;
    let center_y = cy.round() as i32;

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let nx = center_x + dx;
            let ny = center_y + dy;
            if nx < 0 || nx >= width as i32 || ny < 0 || ny >= height as i32 {
                continue;
            }

            let dist = ((nx as f32 - cx).powi(2) + (ny as f32 - cy).powi(2)).sqrt();
            let falloff = 1.0 - dist / half_width;
            if falloff <= 0.0 {
                continue;
            }

            let idx = (ny as u32 * width + nx as u32) as usize;
            let raised = u16::from(data[idx]) + (peak * falloff).round() as u16;
            data[idx] = raised.min(100) as u8;
        }
    }
}
