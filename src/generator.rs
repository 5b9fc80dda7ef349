use crate::config::GenerationParams;
use crate::events::{EventSink, GenerationEvent};
use crate::heightmap::{Heightmap, generate_heightmap};
use crate::lakes::{LakeResult, generate_lakes};
use crate::rivers::RiverMask;

/// Полный результат одного запуска генератора
#[derive(Debug, Clone)]
pub struct WorldOutput {
    pub heightmap: Heightmap,
    pub lakes: LakeResult,
}

/// Запускает весь конвейер: `(сид, параметры, маска рек) → (рельеф, озёра)`
///
/// Единственный источник ошибок — некорректная конфигурация; она
/// отсекается до начала работы. Дальше конвейер тотален: любые
/// геометрические неудачи съедаются внутри и лишь уменьшают число озёр.
/// Все промежуточные буферы живут внутри вызова, наружу выходят только
/// рельеф и озёра — поэтому независимые генерации можно спокойно гнать
/// в параллельных потоках.
pub fn generate_world(
    params: &GenerationParams,
    rivers: &RiverMask,
    sink: &mut dyn EventSink,
) -> Result<WorldOutput, Box<dyn std::error::Error>> {
    params.validate()?;
    if rivers.width != params.width || rivers.height != params.height {
        return Err(format!(
            "River mask dimensions {}x{} do not match map dimensions {}x{}",
            rivers.width, rivers.height, params.width, params.height
        )
        .into());
    }

    let seed = params.seed_value();

    let heightmap = generate_heightmap(
        seed,
        params.width,
        params.height,
        &params.terrain,
        &params.ridges,
    );
    let land_cells = heightmap
        .data
        .iter()
        .filter(|&&v| v >= heightmap.sea_level)
        .count();
    sink.publish(GenerationEvent::HeightmapReady {
        land_cells,
        total_cells: heightmap.data.len(),
    });

    let lakes = generate_lakes(&heightmap, rivers, &params.lakes, sink);

    Ok(WorldOutput { heightmap, lakes })
}
