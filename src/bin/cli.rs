use clap::Parser;
use std::path::PathBuf;

use terragen::events::{EventSink, GenerationEvent};
use terragen::lakes::png::save_overlay_png;
use terragen::{GenerationParams, RiverMask, generate_world};

/// Генератор рельефа и озёр для Chronicles of Realms
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: PathBuf,

    /// Маска рек в PNG (ненулевой пиксель = река); без неё озёра не строятся
    #[arg(short, long)]
    rivers: Option<PathBuf>,

    /// Путь для сохранения height.png (по умолчанию: ./height.png)
    #[arg(short, long, default_value = "height.png")]
    output: PathBuf,

    /// Путь для сохранения маски озёр
    #[arg(short, long, default_value = "lakes.png")]
    lakes: PathBuf,

    /// Путь для совмещённого слоя (рельеф + вода + стоки)
    #[arg(long, default_value = "overlay.png")]
    overlay: PathBuf,

    /// Путь для экспорта стоков в JSON
    #[arg(long)]
    spillways: Option<PathBuf>,
}

/// Печатает события генерации в консоль
struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn publish(&mut self, event: GenerationEvent) {
        match event {
            GenerationEvent::HeightmapReady {
                land_cells,
                total_cells,
            } => {
                println!(
                    "Рельеф готов: суша {:.1}%",
                    land_cells as f64 / total_cells as f64 * 100.0
                );
            }
            GenerationEvent::SeedsFound { count } => {
                println!("Кандидатов на озёра: {count}");
            }
            GenerationEvent::LakeAccepted {
                id,
                tiles,
                level,
                has_spillway,
                ..
            } => {
                println!(
                    "💧 Озеро {id}: {tiles} клеток, уровень {level}{}",
                    if has_spillway { "" } else { ", без стока" }
                );
            }
            GenerationEvent::BasinRejected { seed, reason } => {
                println!("   Котловина у клетки {seed} отброшена: {reason:?}");
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    println!("🔍 Загрузка конфигурации...");
    let params = GenerationParams::from_toml_file(cli.config.to_str().unwrap())?;

    let rivers = match &cli.rivers {
        Some(path) => RiverMask::from_png(path.to_str().unwrap())?,
        None => RiverMask::empty(params.width, params.height),
    };

    println!(
        "Генерация мира (сид: {:?}, размер: {}×{})...",
        params.seed, params.width, params.height
    );
    let world = generate_world(&params, &rivers, &mut ConsoleSink)?;

    println!("Сохранение в {:?}", cli.output);
    world.heightmap.save_as_png(cli.output.to_str().unwrap())?;
    world.lakes.save_as_png(cli.lakes.to_str().unwrap())?;
    save_overlay_png(&world.heightmap, &world.lakes, cli.overlay.to_str().unwrap())?;

    if let Some(path) = &cli.spillways {
        let json = serde_json::to_string_pretty(&world.lakes.spillways)?;
        std::fs::write(path, json)?;
    }

    println!(
        "\nГотово! Озёр: {}, стоков: {}.",
        world.lakes.lake_count(),
        world.lakes.spillways.len()
    );
    Ok(())
}
