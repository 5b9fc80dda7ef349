use crate::heightmap::Heightmap;
use crate::lakes::{DIRECTIONS_4, DIRECTIONS_8, Spillway};

/// Строит сток принятого озера через точку перелива
///
/// Сток состоит из двух клеток: кромка озера, примыкающая к точке перелива,
/// и самая низкая из 8 соседних клеток перелива, которая не озеро и не океан —
/// туда внешний речной модуль посадит исток новой реки. Если любой из двух
/// не находится, озеро остаётся без смоделированного стока; это штатный исход.
#[must_use]
pub fn build_spillway(
    heightmap: &Heightmap,
    pour_point: usize,
    pour_elevation: u8,
    lake_mask: &[u8],
) -> Option<Spillway> {
    let width = heightmap.width as i32;
    let height = heightmap.height as i32;
    let x = pour_point as i32 % width;
    let y = pour_point as i32 / width;

    // Кромка озера: первый сосед перелива по 4-связности, занятый озером
    let mut lake_edge = None;
    for &(dx, dy) in &DIRECTIONS_4 {
        let nx = x + dx;
        let ny = y + dy;
        if nx < 0 || nx >= width || ny < 0 || ny >= height {
            continue;
        }
        let nidx = (ny * width + nx) as usize;
        if lake_mask[nidx] != 0 {
            lake_edge = Some(nidx);
            break;
        }
    }
    let lake_edge = lake_edge?;

    // Приёмник стока: минимальный по высоте сосед, не озеро и не океан
    let mut outflow: Option<(u8, usize)> = None;
    for &(dx, dy) in &DIRECTIONS_8 {
        let nx = x + dx;
        let ny = y + dy;
        if nx < 0 || nx >= width || ny < 0 || ny >= height {
            continue;
        }
        let nidx = (ny * width + nx) as usize;
        if lake_mask[nidx] != 0 {
            continue;
        }
        let nelev = heightmap.data[nidx];
        if nelev < heightmap.sea_level {
            continue;
        }
        match outflow {
            Some((best, _)) if best <= nelev => {}
            _ => outflow = Some((nelev, nidx)),
        }
    }
    let (_, outflow) = outflow?;

    let (ex, ey) = heightmap.coords(lake_edge);
    let (ox, oy) = heightmap.coords(outflow);
    Some(Spillway {
        lake_edge: (ex, ey),
        outflow: (ox, oy),
        elevation: pour_elevation,
    })
}
