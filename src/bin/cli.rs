use clap::Parser;
use std::path::PathBuf;
use tilegen::{MapGenerationParams, TilesDiagram};

/// Генератор тайловых карт с биомами и реками
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Путь для сохранения map.png (по умолчанию: ./map.png)
    #[arg(short, long, default_value = "map.png")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let params = match &cli.config {
        Some(path) => {
            println!("🔍 Загрузка конфигурации...");
            MapGenerationParams::from_toml_file(path.to_str().ok_or("некорректный путь")?)?
        }
        None => MapGenerationParams::default(),
    };

    println!(
        "Генерация карты (размер: {}×{}, сетка {}×{}, сид {})...",
        params.width, params.height, params.num_x, params.num_y, params.seed
    );
    let diagram = TilesDiagram::generate(&params)?;

    println!("Сохранение в {:?}", cli.output);
    diagram.save_as_png(cli.output.to_str().ok_or("некорректный путь")?)?;

    println!("\nГотово! Карта сохранена.");
    Ok(())
}
