use crate::config::LakeSettings;
use crate::heightmap::Heightmap;
use crate::lakes::DIRECTIONS_8;
use crate::rivers::RiverMask;

/// Ищет кандидатов на дно озера среди речных клеток
///
/// Клетка подходит, если она:
/// - несёт реку и лежит на суше не выше `max_lake_elevation`;
/// - локальный минимум (ни один из 8 соседей не ниже);
/// - не соприкасается с океаном (сосед ниже уровня моря сразу дисквалифицирует);
/// - настоящая впадина: не меньше 75% соседей строго выше.
///
/// Порог 75% сознательно жёстче наивного локального минимума: без него каждая
/// мелкая ямка на естественном пути реки вниз затапливалась бы.
///
/// Результат отсортирован по возрастанию высоты: глубокие котловины
/// обрабатываются первыми и успевают забрать свои клетки.
#[must_use]
pub fn find_depression_seeds(
    heightmap: &Heightmap,
    rivers: &RiverMask,
    settings: &LakeSettings,
) -> Vec<usize> {
    let width = heightmap.width as i32;
    let height = heightmap.height as i32;

    let mut seeds = Vec::new();

    for idx in 0..heightmap.data.len() {
        if rivers.data[idx] == 0 {
            continue;
        }

        let elevation = heightmap.data[idx];
        if elevation < heightmap.sea_level || elevation > settings.max_lake_elevation {
            continue;
        }

        let x = idx as i32 % width;
        let y = idx as i32 / width;

        let mut in_bounds = 0u32;
        let mut higher = 0u32;
        let mut disqualified = false;

        for &(dx, dy) in &DIRECTIONS_8 {
            let nx = x + dx;
            let ny = y + dy;
            if nx < 0 || nx >= width || ny < 0 || ny >= height {
                continue;
            }
            in_bounds += 1;

            let nelev = heightmap.data[(ny * width + nx) as usize];
            if nelev < heightmap.sea_level || nelev < elevation {
                // Сосед-океан или путь вниз: это не замкнутая впадина
                disqualified = true;
                break;
            }
            if nelev > elevation {
                higher += 1;
            }
        }

        if !disqualified && in_bounds > 0 && higher * 4 >= in_bounds * 3 {
            seeds.push(idx);
        }
    }

    seeds.sort_by_key(|&idx| (heightmap.data[idx], idx));
    seeds
}
