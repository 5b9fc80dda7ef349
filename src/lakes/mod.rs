// src/lakes/mod.rs
//! Гидрологическая стадия: поиск замкнутых котловин и заполнение озёр
//!
//! Вход — готовая карта высот и маска рек, выход — множество озёр с точками
//! стока. Конвейер: поиск кандидатов на дно (`seeds`) → обход котловины до
//! точки перелива (`basin::trace_basin`) → заполнение до уровня (`basin::fill_basin`)
//! → построение стока (`spillway`).
//!
//! Кандидаты обрабатываются в порядке возрастания высоты дна: глубокие
//! котловины разбираются первыми и забирают свои клетки, чтобы мелкий сосед
//! не растащил чужую котловину. Этот порядок — часть контракта, его нельзя
//! распараллеливать.

pub mod basin;
pub mod png;
pub mod seeds;
pub mod spillway;

use serde::{Deserialize, Serialize};

use crate::config::LakeSettings;
use crate::events::{EventSink, GenerationEvent};
use crate::heightmap::Heightmap;
use crate::rivers::RiverMask;

/// Соседство фон Неймана: расширение котловин и заполнение озёр идут по нему
pub(crate) const DIRECTIONS_4: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Соседство Мура: проверки дна и выбор точки стока смотрят на все 8 клеток
pub(crate) const DIRECTIONS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Одно принятое озеро
#[derive(Debug, Clone)]
pub struct Lake {
    pub id: u32,
    /// Клетка дна, с которой началось заполнение (плоский индекс)
    pub seed: usize,
    /// Клетки озера (плоские индексы)
    pub tiles: Vec<usize>,
    /// Уровень воды: все клетки озера не выше него
    pub level: u8,
}

/// Сток озера: где вода переливается обратно в речную сеть
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spillway {
    /// Клетка озера, примыкающая к точке перелива
    pub lake_edge: (u32, u32),
    /// Клетка, куда уходит сток (не озеро и не океан) — здесь начнётся новая река
    pub outflow: (u32, u32),
    /// Высота точки перелива
    pub elevation: u8,
}

/// Результат гидрологической стадии
#[derive(Debug, Clone)]
pub struct LakeResult {
    pub width: u32,
    pub height: u32,
    /// Маска принадлежности: 1 = клетка озера
    pub mask: Vec<u8>,
    pub lakes: Vec<Lake>,
    pub spillways: Vec<Spillway>,
}

impl LakeResult {
    #[must_use]
    pub fn lake_count(&self) -> usize {
        self.lakes.len()
    }

    #[must_use]
    pub fn is_lake(&self, x: u32, y: u32) -> bool {
        self.mask[(y * self.width + x) as usize] != 0
    }
}

/// Строит озёра по готовой карте высот и маске рек
///
/// Все отрицательные исходы (котловина открыта к океану, слишком мелкая,
/// не тот размер, нет стока) — штатные: они публикуются в `sink` и уменьшают
/// итоговое число озёр, но никогда не прерывают конвейер.
pub fn generate_lakes(
    heightmap: &Heightmap,
    rivers: &RiverMask,
    settings: &LakeSettings,
    sink: &mut dyn EventSink,
) -> LakeResult {
    let total = heightmap.data.len();

    // === 1. Кандидаты на дно, от глубоких к мелким ===
    let seed_cells = seeds::find_depression_seeds(heightmap, rivers, settings);
    sink.publish(GenerationEvent::SeedsFound {
        count: seed_cells.len(),
    });

    // === 2. Последовательный разбор котловин ===
    // `processed` — общая память стадии: заполнение каждой котловины помечает
    // клетки, и следующие кандидаты обязаны эти отметки видеть.
    let mut processed = vec![false; total];
    let mut mask = vec![0u8; total];
    let mut lakes: Vec<Lake> = Vec::new();
    let mut spillways: Vec<Spillway> = Vec::new();

    for &seed in &seed_cells {
        if processed[seed] || mask[seed] != 0 {
            continue;
        }

        let basin = match basin::trace_basin(heightmap, seed, settings) {
            Ok(basin) => basin,
            Err(reason) => {
                sink.publish(GenerationEvent::BasinRejected { seed, reason });
                continue;
            }
        };

        match basin::fill_basin(heightmap, &basin, settings, &processed, &mask) {
            Ok((tiles, level)) => {
                for &idx in &tiles {
                    mask[idx] = 1;
                    processed[idx] = true;
                }

                let spillway =
                    spillway::build_spillway(heightmap, basin.pour_point, basin.pour_elevation, &mask);
                if let Some(s) = spillway {
                    spillways.push(s);
                }

                let id = lakes.len() as u32 + 1;
                sink.publish(GenerationEvent::LakeAccepted {
                    id,
                    seed,
                    tiles: tiles.len(),
                    level,
                    has_spillway: spillway.is_some(),
                });
                lakes.push(Lake {
                    id,
                    seed,
                    tiles,
                    level,
                });
            }
            Err(reason) => {
                // Котловина не подошла по размеру: помечаем все обойденные клетки,
                // чтобы соседние кандидаты не разбирали её заново
                for &idx in &basin.tiles {
                    processed[idx] = true;
                }
                sink.publish(GenerationEvent::BasinRejected { seed, reason });
            }
        }
    }

    LakeResult {
        width: heightmap.width,
        height: heightmap.height,
        mask,
        lakes,
        spillways,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CollectSink, NullSink, RejectReason};

    /// Плоская карта с одной котловиной: дно в `center`, блюдце 5×5 на единицу
    /// выше дна, вокруг — ровная местность `ambient`
    fn bowl_map(size: u32, center: (u32, u32), floor: u8, ambient: u8) -> Heightmap {
        let mut map = Heightmap::new(size, size, 20);
        map.data.fill(ambient);
        let (cx, cy) = center;
        for y in (cy - 2)..=(cy + 2) {
            for x in (cx - 2)..=(cx + 2) {
                map.set(x, y, floor + 1);
            }
        }
        map.set(cx, cy, floor);
        map
    }

    #[test]
    fn single_bowl_becomes_single_lake() {
        let map = bowl_map(50, (25, 25), 30, 40);
        let rivers = RiverMask::from_cells(50, 50, &(0..50).map(|i| (i, i)).collect::<Vec<_>>());
        let settings = LakeSettings::default();
        let mut sink = CollectSink::default();

        let result = generate_lakes(&map, &rivers, &settings, &mut sink);

        assert_eq!(result.lake_count(), 1);
        assert!(result.is_lake(25, 25));
        assert_eq!(result.lakes[0].tiles.len(), 25);
        // Уровень воды строго ниже точки перелива
        assert!(result.lakes[0].level < 40);
    }

    #[test]
    fn lake_tiles_respect_level_bounds() {
        let map = bowl_map(50, (25, 25), 30, 40);
        let rivers = RiverMask::from_cells(50, 50, &[(25, 25)]);
        let settings = LakeSettings::default();
        let result = generate_lakes(&map, &rivers, &settings, &mut NullSink);

        assert_eq!(result.lake_count(), 1);
        let lake = &result.lakes[0];
        assert!(lake.tiles.len() >= settings.min_lake_size);
        assert!(lake.tiles.len() <= settings.max_lake_size);
        for &idx in &lake.tiles {
            let elev = map.data[idx];
            assert!(elev >= map.sea_level && elev <= lake.level);
        }
    }

    #[test]
    fn ocean_connected_basin_yields_no_lakes() {
        // Котловина с языком до клетки ниже уровня моря: вода уходит в океан
        let mut map = Heightmap::new(30, 30, 20);
        map.data.fill(40);
        for y in 9..=11 {
            for x in 9..=11 {
                map.set(x, y, 26);
            }
        }
        map.set(10, 10, 25);
        map.set(12, 10, 26); // язык котловины на восток
        map.set(13, 10, 15); // клетка океана за языком

        let river_line: Vec<(u32, u32)> = (5..=15).map(|x| (x, 10)).collect();
        let rivers = RiverMask::from_cells(30, 30, &river_line);
        let mut sink = CollectSink::default();

        let result = generate_lakes(&map, &rivers, &LakeSettings::default(), &mut sink);

        assert_eq!(result.lake_count(), 0);
        assert!(sink.events.iter().any(|e| matches!(
            e,
            GenerationEvent::BasinRejected {
                reason: RejectReason::DrainsToOcean,
                ..
            }
        )));
    }

    #[test]
    fn undersized_basin_is_rejected() {
        // Дно с единственной клеткой заполнения: меньше минимального размера
        let mut map = Heightmap::new(20, 20, 20);
        map.data.fill(45);
        map.set(10, 10, 30);

        let rivers = RiverMask::from_cells(20, 20, &[(10, 10)]);
        let mut sink = CollectSink::default();
        let result = generate_lakes(&map, &rivers, &LakeSettings::default(), &mut sink);

        assert_eq!(result.lake_count(), 0);
        assert!(sink.events.iter().any(|e| matches!(
            e,
            GenerationEvent::BasinRejected {
                reason: RejectReason::TooSmall,
                ..
            }
        )));
    }

    #[test]
    fn shallow_dip_is_rejected() {
        // Перелив всего на 2 выше дна — меньше минимальной глубины 4
        let mut map = Heightmap::new(20, 20, 20);
        map.data.fill(32);
        for y in 9..=11 {
            for x in 9..=11 {
                map.set(x, y, 31);
            }
        }
        map.set(10, 10, 30);

        let rivers = RiverMask::from_cells(20, 20, &[(10, 10)]);
        let mut sink = CollectSink::default();
        let result = generate_lakes(&map, &rivers, &LakeSettings::default(), &mut sink);

        assert_eq!(result.lake_count(), 0);
        assert!(sink.events.iter().any(|e| matches!(
            e,
            GenerationEvent::BasinRejected {
                reason: RejectReason::TooShallow,
                ..
            }
        )));
    }

    #[test]
    fn no_rivers_no_lakes() {
        let map = bowl_map(50, (25, 25), 30, 40);
        let rivers = RiverMask::empty(50, 50);
        let result = generate_lakes(&map, &rivers, &LakeSettings::default(), &mut NullSink);
        assert_eq!(result.lake_count(), 0);
        assert!(result.mask.iter().all(|&v| v == 0));
    }

    #[test]
    fn spillway_outflow_is_never_a_lake_tile() {
        let map = bowl_map(50, (25, 25), 30, 40);
        let rivers = RiverMask::from_cells(50, 50, &[(25, 25)]);
        let result = generate_lakes(&map, &rivers, &LakeSettings::default(), &mut NullSink);

        assert_eq!(result.spillways.len(), 1);
        let s = &result.spillways[0];
        assert!(!result.is_lake(s.outflow.0, s.outflow.1));
        assert!(result.is_lake(s.lake_edge.0, s.lake_edge.1));
        // Высота стока равна высоте точки перелива котловины
        assert_eq!(s.elevation, 40);
    }

    #[test]
    fn generation_is_deterministic() {
        let map = bowl_map(50, (25, 25), 30, 40);
        let rivers = RiverMask::from_cells(50, 50, &(0..50).map(|i| (i, i)).collect::<Vec<_>>());
        let a = generate_lakes(&map, &rivers, &LakeSettings::default(), &mut NullSink);
        let b = generate_lakes(&map, &rivers, &LakeSettings::default(), &mut NullSink);
        assert_eq!(a.mask, b.mask);
        assert_eq!(a.spillways, b.spillways);
    }
}
