use std::collections::VecDeque;

use crate::config::LakeSettings;
use crate::events::RejectReason;
use crate::heightmap::Heightmap;
use crate::lakes::DIRECTIONS_4;

/// Обойденная котловина с найденной точкой перелива
#[derive(Debug, Clone)]
pub struct Basin {
    /// Клетка дна (плоский индекс)
    pub seed: usize,
    /// Самая низкая клетка кромки — через неё озеро перельётся
    pub pour_point: usize,
    pub pour_elevation: u8,
    /// Все клетки, обойденные как внутренность котловины
    pub tiles: Vec<usize>,
}

/// Ищет точку перелива котловины обходом в ширину от дна
///
/// Внутренностью считаются клетки не выше `дно + 1`; всё, что выше — кандидаты
/// кромки, среди них запоминается минимальная. Любое касание клетки ниже уровня
/// моря немедленно дисквалифицирует котловину: вода уйдёт в океан, озера здесь
/// не будет.
pub fn trace_basin(
    heightmap: &Heightmap,
    seed: usize,
    settings: &LakeSettings,
) -> Result<Basin, RejectReason> {
    let width = heightmap.width as i32;
    let height = heightmap.height as i32;
    let seed_elevation = heightmap.data[seed];
    let interior_cap = seed_elevation + 1;

    let mut visited = vec![false; heightmap.data.len()];
    let mut queue = VecDeque::new();
    let mut tiles = Vec::new();

    // Первый найденный минимум кромки и остаётся точкой перелива: при равных
    // высотах побеждает ближайшая к дну клетка (порядок BFS)
    let mut rim: Option<(u8, usize)> = None;

    visited[seed] = true;
    queue.push_back(seed);

    while let Some(idx) = queue.pop_front() {
        if heightmap.data[idx] < heightmap.sea_level {
            return Err(RejectReason::DrainsToOcean);
        }
        tiles.push(idx);

        // Предел обхода: вырожденные плоские области не разбираем до конца
        if tiles.len() >= settings.basin_search_limit {
            break;
        }

        let x = idx as i32 % width;
        let y = idx as i32 / width;

        for &(dx, dy) in &DIRECTIONS_4 {
            let nx = x + dx;
            let ny = y + dy;
            if nx < 0 || nx >= width || ny < 0 || ny >= height {
                continue;
            }
            let nidx = (ny * width + nx) as usize;
            if visited[nidx] {
                continue;
            }

            let nelev = heightmap.data[nidx];
            if nelev < heightmap.sea_level {
                return Err(RejectReason::DrainsToOcean);
            }

            if nelev > interior_cap {
                // Кромка: не расширяемся, только запоминаем минимум
                match rim {
                    Some((best, _)) if best <= nelev => {}
                    _ => rim = Some((nelev, nidx)),
                }
            } else {
                visited[nidx] = true;
                queue.push_back(nidx);
            }
        }
    }

    match rim {
        None => Err(RejectReason::NoRim),
        Some((elevation, pour_point)) => {
            if elevation - seed_elevation < settings.min_depth {
                return Err(RejectReason::TooShallow);
            }
            Ok(Basin {
                seed,
                pour_point,
                pour_elevation: elevation,
                tiles,
            })
        }
    }
}

/// Заполняет котловину водой до расчётного уровня
///
/// Уровень — на единицу ниже точки перелива, но не глубже `max_fill_depth`
/// от дна. Возвращает клетки озера или причину отказа по размеру.
pub fn fill_basin(
    heightmap: &Heightmap,
    basin: &Basin,
    settings: &LakeSettings,
    processed: &[bool],
    claimed: &[u8],
) -> Result<(Vec<usize>, u8), RejectReason> {
    let width = heightmap.width as i32;
    let height = heightmap.height as i32;
    let seed_elevation = heightmap.data[basin.seed];

    let level = (basin.pour_elevation - 1).min(seed_elevation.saturating_add(settings.max_fill_depth));

    let mut visited = vec![false; heightmap.data.len()];
    let mut queue = VecDeque::new();
    let mut tiles = Vec::new();

    visited[basin.seed] = true;
    queue.push_back(basin.seed);

    while let Some(idx) = queue.pop_front() {
        tiles.push(idx);
        // Заполнение на клетку дальше предела — признак переполненной котловины
        if tiles.len() > settings.max_lake_size {
            return Err(RejectReason::TooLarge);
        }

        let x = idx as i32 % width;
        let y = idx as i32 / width;

        for &(dx, dy) in &DIRECTIONS_4 {
            let nx = x + dx;
            let ny = y + dy;
            if nx < 0 || nx >= width || ny < 0 || ny >= height {
                continue;
            }
            let nidx = (ny * width + nx) as usize;
            if visited[nidx] || processed[nidx] || claimed[nidx] != 0 {
                continue;
            }

            let nelev = heightmap.data[nidx];
            if nelev < heightmap.sea_level || nelev > level {
                continue;
            }

            visited[nidx] = true;
            queue.push_back(nidx);
        }
    }

    if tiles.len() < settings.min_lake_size {
        return Err(RejectReason::TooSmall);
    }
    Ok((tiles, level))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_map(size: u32, elevation: u8) -> Heightmap {
        let mut map = Heightmap::new(size, size, 20);
        map.data.fill(elevation);
        map
    }

    #[test]
    fn trace_finds_lowest_rim() {
        let mut map = flat_map(20, 40);
        // Дно и блюдце
        for y in 9..=11 {
            for x in 9..=11 {
                map.set(x, y, 31);
            }
        }
        map.set(10, 10, 30);
        // Пониженный участок кромки с восточной стороны
        map.set(12, 10, 36);

        let basin = trace_basin(&map, map.idx(10, 10), &LakeSettings::default()).unwrap();
        assert_eq!(basin.pour_point, map.idx(12, 10));
        assert_eq!(basin.pour_elevation, 36);
        assert_eq!(basin.tiles.len(), 9);
    }

    #[test]
    fn trace_aborts_on_ocean_contact() {
        let mut map = flat_map(20, 40);
        for y in 9..=11 {
            for x in 9..=11 {
                map.set(x, y, 31);
            }
        }
        map.set(10, 10, 30);
        map.set(12, 10, 31); // продолжение внутренности
        map.set(13, 10, 10); // океан

        let result = trace_basin(&map, map.idx(10, 10), &LakeSettings::default());
        assert!(matches!(result, Err(RejectReason::DrainsToOcean)));
    }

    #[test]
    fn trace_respects_search_limit() {
        // Большое плоское дно: обход обрывается по пределу, кромки нет
        let mut map = flat_map(40, 40);
        for y in 5..35 {
            for x in 5..35 {
                map.set(x, y, 30);
            }
        }
        map.set(20, 20, 30);

        let settings = LakeSettings {
            basin_search_limit: 50,
            ..LakeSettings::default()
        };
        // Обход обрывается на пределе задолго до кромки плато
        let result = trace_basin(&map, map.idx(20, 20), &settings);
        assert!(matches!(result, Err(RejectReason::NoRim)));
    }

    #[test]
    fn fill_caps_level_by_max_depth() {
        let mut map = flat_map(30, 80);
        for y in 10..=20 {
            for x in 10..=20 {
                map.set(x, y, 31);
            }
        }
        map.set(15, 15, 30);

        let settings = LakeSettings {
            max_fill_depth: 5,
            max_lake_size: 200,
            ..LakeSettings::default()
        };
        let basin = trace_basin(&map, map.idx(15, 15), &settings).unwrap();
        assert_eq!(basin.pour_elevation, 80);

        let processed = vec![false; map.data.len()];
        let claimed = vec![0u8; map.data.len()];
        let (_, level) = fill_basin(&map, &basin, &settings, &processed, &claimed).unwrap();
        // 30 + 5, а не 79
        assert_eq!(level, 35);
    }

    #[test]
    fn fill_rejects_oversized_basin() {
        let mut map = flat_map(30, 80);
        for y in 5..=25 {
            for x in 5..=25 {
                map.set(x, y, 31);
            }
        }
        map.set(15, 15, 30);

        let settings = LakeSettings {
            max_lake_size: 60,
            basin_search_limit: 1000,
            ..LakeSettings::default()
        };
        let basin = trace_basin(&map, map.idx(15, 15), &settings).unwrap();

        let processed = vec![false; map.data.len()];
        let claimed = vec![0u8; map.data.len()];
        let result = fill_basin(&map, &basin, &settings, &processed, &claimed);
        assert!(matches!(result, Err(RejectReason::TooLarge)));
    }

    #[test]
    fn fill_skips_claimed_cells() {
        let mut map = flat_map(20, 40);
        for y in 9..=11 {
            for x in 9..=11 {
                map.set(x, y, 31);
            }
        }
        map.set(10, 10, 30);

        let settings = LakeSettings {
            min_lake_size: 1,
            ..LakeSettings::default()
        };
        let basin = trace_basin(&map, map.idx(10, 10), &settings).unwrap();

        let processed = vec![false; map.data.len()];
        let mut claimed = vec![0u8; map.data.len()];
        // Северная строка блюдца уже занята другим озером
        for x in 9..=11u32 {
            claimed[map.idx(x, 9)] = 1;
        }

        let (tiles, _) = fill_basin(&map, &basin, &settings, &processed, &claimed).unwrap();
        assert_eq!(tiles.len(), 6);
        assert!(tiles.iter().all(|&idx| claimed[idx] == 0));
    }
}
