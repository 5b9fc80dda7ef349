// src/config.rs
//! Конфигурация генератора рельефа и гидрологии
//!
//! Этот модуль определяет все параметры, управляющие генерацией:
//! - Настройки шума и рельефа (октавы, доля суши, сглаживание)
//! - Настройки горных хребтов
//! - Настройки озёр (размеры, глубины, пределы поиска)
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use serde::{Deserialize, Serialize};
use std::fs;

/// Настройки шума и рельефа
///
/// Управляет синтезом многооктавного шума и приведением его к целевой доле суши.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerrainSettings {
    /// Количество октав шума (каждая следующая октава добавляет более мелкие детали)
    #[serde(default = "default_octaves")]
    pub octaves: u32,

    /// Затухание амплитуды от октавы к октаве:
    /// - `<0.5` → гладкий рельеф (крупные формы доминируют),
    /// - `>0.5` → шероховатый рельеф (мелкие детали заметнее).
    #[serde(default = "default_persistence")]
    pub persistence: f32,

    /// Рост частоты от октавы к октаве (обычно 2.0 — каждая октава вдвое мельче)
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,

    /// Базовая частота первой октавы (меньше = крупнее континенты)
    #[serde(default = "default_base_frequency")]
    pub base_frequency: f32,

    /// Целевая доля клеток выше уровня моря (0.0 = океан, 1.0 = сплошная суша)
    #[serde(default = "default_land_ratio")]
    pub land_ratio: f32,

    /// Количество проходов сглаживания 3×3 (0 = без сглаживания)
    #[serde(default = "default_smooth_passes")]
    pub smooth_passes: usize,

    /// Уровень моря в единицах высоты [0, 100]
    #[serde(default = "default_sea_level")]
    pub sea_level: u8,
}

fn default_octaves() -> u32 {
    6
}
fn default_persistence() -> f32 {
    0.5
}
fn default_lacunarity() -> f32 {
    2.0
}
fn default_base_frequency() -> f32 {
    0.02
}
fn default_land_ratio() -> f32 {
    0.3
}
fn default_smooth_passes() -> usize {
    2
}
fn default_sea_level() -> u8 {
    20
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
            base_frequency: 0.02,
            land_ratio: 0.3,
            smooth_passes: 2,
            sea_level: 20,
        }
    }
}

/// Настройки горных хребтов
///
/// Хребты накладываются поверх готового рельефа как линейные возвышения.
/// Диапазоны задают пределы случайного выбора для каждого хребта.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RidgeSettings {
    /// Количество хребтов (0 = без хребтов)
    #[serde(default)]
    pub count: u32,

    /// Минимальная длина хребта в клетках
    #[serde(default = "default_min_ridge_length")]
    pub min_length: u32,

    /// Максимальная длина хребта в клетках
    #[serde(default = "default_max_ridge_length")]
    pub max_length: u32,

    /// Минимальная добавка высоты на оси хребта
    #[serde(default = "default_min_ridge_peak")]
    pub min_peak: f32,

    /// Максимальная добавка высоты на оси хребта
    #[serde(default = "default_max_ridge_peak")]
    pub max_peak: f32,

    /// Минимальная полуширина хребта в клетках
    #[serde(default = "default_min_ridge_width")]
    pub min_width: f32,

    /// Максимальная полуширина хребта в клетках
    #[serde(default = "default_max_ridge_width")]
    pub max_width: f32,
}

fn default_min_ridge_length() -> u32 {
    12
}
fn default_max_ridge_length() -> u32 {
    48
}
fn default_min_ridge_peak() -> f32 {
    15.0
}
fn default_max_ridge_peak() -> f32 {
    35.0
}
fn default_min_ridge_width() -> f32 {
    2.0
}
fn default_max_ridge_width() -> f32 {
    5.0
}

impl Default for RidgeSettings {
    fn default() -> Self {
        Self {
            count: 0,
            min_length: 12,
            max_length: 48,
            min_peak: 15.0,
            max_peak: 35.0,
            min_width: 2.0,
            max_width: 5.0,
        }
    }
}

/// Настройки поиска и заполнения озёр
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LakeSettings {
    /// Минимальный размер озера в клетках (меньшие котловины отбрасываются)
    #[serde(default = "default_min_lake_size")]
    pub min_lake_size: usize,

    /// Максимальный размер озера в клетках (переполненные котловины отбрасываются)
    #[serde(default = "default_max_lake_size")]
    pub max_lake_size: usize,

    /// Минимальное превышение точки перелива над дном котловины.
    /// Более мелкие котловины считаются ямками на пути реки, а не озёрами.
    #[serde(default = "default_min_depth")]
    pub min_depth: u8,

    /// Максимальная глубина заполнения относительно дна котловины
    #[serde(default = "default_max_fill_depth")]
    pub max_fill_depth: u8,

    /// Максимальная высота дна, на которой ещё образуются озёра
    #[serde(default = "default_max_lake_elevation")]
    pub max_lake_elevation: u8,

    /// Предел обхода при поиске точки перелива (защита от вырожденных плоских областей)
    #[serde(default = "default_basin_search_limit")]
    pub basin_search_limit: usize,
}

fn default_min_lake_size() -> usize {
    6
}
fn default_max_lake_size() -> usize {
    60
}
fn default_min_depth() -> u8 {
    4
}
fn default_max_fill_depth() -> u8 {
    12
}
fn default_max_lake_elevation() -> u8 {
    55
}
fn default_basin_search_limit() -> usize {
    256
}

impl Default for LakeSettings {
    fn default() -> Self {
        Self {
            min_lake_size: 6,
            max_lake_size: 60,
            min_depth: 4,
            max_fill_depth: 12,
            max_lake_elevation: 55,
            basin_search_limit: 256,
        }
    }
}

/// Основные параметры генерации
///
/// Полная конфигурация одного запуска генератора. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Сид генерации (строка; одинаковый сид — байт-в-байт одинаковая карта)
    pub seed: String,

    /// Ширина карты в клетках (по умолчанию 512)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Высота карты в клетках (по умолчанию 512)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Настройки шума и рельефа
    #[serde(default)]
    pub terrain: TerrainSettings,

    /// Настройки горных хребтов
    #[serde(default)]
    pub ridges: RidgeSettings,

    /// Настройки озёр
    #[serde(default)]
    pub lakes: LakeSettings,
}

fn default_width() -> u32 {
    512
}
fn default_height() -> u32 {
    512
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: String::new(),
            width: 512,
            height: 512,
            terrain: TerrainSettings::default(),
            ridges: RidgeSettings::default(),
            lakes: LakeSettings::default(),
        }
    }
}

impl GenerationParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Аргументы
    /// * `path` - путь к файлу конфигурации в формате TOML
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден или содержит недопустимый формат.
    ///
    /// # Пример
    /// ```toml
    /// # world.toml
    /// seed = "chronicles-7"
    /// width = 512
    /// height = 256
    ///
    /// [terrain]
    /// land_ratio = 0.35
    /// ```
    pub fn from_toml_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let params: Self = toml::from_str(&contents)?;
        Ok(params)
    }

    /// Проверяет параметры перед запуском генерации.
    ///
    /// Ошибки конфигурации — единственный вид ошибок генератора: после успешной
    /// проверки конвейер всегда завершается штатно.
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "Map dimensions must be positive, got {}x{}",
                self.width, self.height
            )
            .into());
        }
        if self.terrain.octaves == 0 {
            return Err("Octave count must be at least 1".into());
        }
        if self.terrain.persistence <= 0.0 {
            return Err(format!(
                "Persistence must be positive, got {}",
                self.terrain.persistence
            )
            .into());
        }
        if self.terrain.lacunarity < 1.0 {
            return Err(format!(
                "Lacunarity must be at least 1.0, got {}",
                self.terrain.lacunarity
            )
            .into());
        }
        if self.terrain.land_ratio <= 0.0 || self.terrain.land_ratio >= 1.0 {
            return Err(format!(
                "Land ratio must be in (0, 1), got {}",
                self.terrain.land_ratio
            )
            .into());
        }
        if self.terrain.sea_level == 0 || self.terrain.sea_level >= 100 {
            return Err(format!(
                "Sea level must be in [1, 99], got {}",
                self.terrain.sea_level
            )
            .into());
        }
        if self.lakes.min_lake_size > self.lakes.max_lake_size {
            return Err(format!(
                "min_lake_size ({}) must not exceed max_lake_size ({})",
                self.lakes.min_lake_size, self.lakes.max_lake_size
            )
            .into());
        }
        if self.ridges.min_length > self.ridges.max_length
            || self.ridges.min_peak > self.ridges.max_peak
            || self.ridges.min_width > self.ridges.max_width
        {
            return Err("Ridge ranges must satisfy min <= max".into());
        }
        Ok(())
    }

    /// Числовое значение сида для PRNG и шума.
    #[must_use]
    pub fn seed_value(&self) -> u64 {
        hash_seed(&self.seed)
    }
}

/// Сворачивает строковый сид в u64 (FNV-1a).
///
/// Стандартный `DefaultHasher` не гарантирует стабильность между версиями Rust,
/// поэтому константы захардкожены: одинаковый сид обязан давать одинаковую карту
/// на любой машине.
#[must_use]
pub fn hash_seed(seed: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in seed.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}
