// src/config.rs
//! Конфигурация генерации тайловой карты
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией:
//! - Размер карты и разбиение на тайлы
//! - Стратегию формы суши (радиальный остров или шумовые поля)
//! - Пороги воды/озёр и коэффициенты перераспределения высот
//! - Плотность рек и сид генератора случайных чисел
//!
//! Все структуры поддерживают сериализацию в TOML для удобной настройки через
//! конфигурационные файлы.

use serde::{Deserialize, Serialize};
use std::fs;

/// Стратегия классификации суши
///
/// Определяет, какой предикат `is_land` будет решать, где на карте вода,
/// а где суша. Все стратегии потребляют один и тот же сидированный поток
/// случайных чисел при построении.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum LandShapeType {
    /// Радиальный остров из наложенных синусоид: бухты и выступы береговой линии
    #[default]
    Radial,
    /// Порог по шуму OpenSimplex2
    Simplex,
    /// Порог по шуму Перлина
    Perlin,
    /// Порог по value-шуму
    Value,
    /// Порог по клеточному шуму (Worley)
    Cellular,
}

/// Параметры формы суши
///
/// Радиальная стратегия использует `land_factor`/`land_scale`/`land_slope`,
/// шумовые стратегии — `noise_frequency`/`noise_cutoff`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShapeSettings {
    /// Ширина кольцевого зазора между внутренней и внешней границей острова:
    /// - `1.0` — ровный берег,
    /// - `2.0` — много выступов.
    #[serde(default = "default_land_factor")]
    pub land_factor: f32,

    /// Масштаб радиуса: чем больше, тем меньше суши
    #[serde(default = "default_land_scale")]
    pub land_scale: f32,

    /// Континентальный шельф в секторе "бухты":
    /// ближе к 0 — заметнее бухта, ближе к 1 — заметнее шельф
    #[serde(default = "default_land_slope")]
    pub land_slope: f32,

    /// Частота сэмплирования шума (в единицах карты)
    #[serde(default = "default_noise_frequency")]
    pub noise_frequency: f32,

    /// Порог отсечения: значения шума выше порога считаются сушей
    #[serde(default = "default_noise_cutoff")]
    pub noise_cutoff: f32,
}

fn default_land_factor() -> f32 {
    1.03
}
fn default_land_scale() -> f32 {
    0.35
}
fn default_land_slope() -> f32 {
    0.7
}
fn default_noise_frequency() -> f32 {
    0.01
}
fn default_noise_cutoff() -> f32 {
    0.0
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            land_factor: 1.03,
            land_scale: 0.35,
            land_slope: 0.7,
            noise_frequency: 0.01,
            noise_cutoff: 0.0,
        }
    }
}

/// Основные параметры генерации карты
///
/// Полная конфигурация одного запуска генератора. Поддерживает загрузку из
/// TOML-файлов. Размеры обязаны нацело делиться на число тайлов по
/// соответствующей оси, иначе инициализация завершится ошибкой
/// [`DiagramError::InvalidGridDimensions`](crate::diagram::DiagramError).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapGenerationParams {
    /// Сид генератора случайных чисел (детерминированная генерация)
    pub seed: u64,

    /// Ширина карты в единицах карты (по умолчанию 800)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Высота карты в единицах карты (по умолчанию 600)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Число тайлов по горизонтали (по умолчанию 100)
    #[serde(default = "default_num_x")]
    pub num_x: u32,

    /// Число тайлов по вертикали (по умолчанию 75)
    #[serde(default = "default_num_y")]
    pub num_y: u32,

    /// Стратегия формы суши (по умолчанию радиальный остров)
    #[serde(default)]
    pub land_shape: LandShapeType,

    /// Параметры выбранной стратегии
    #[serde(default)]
    pub shape: ShapeSettings,

    /// Сколько из 4 углов тайла должны быть водой, чтобы тайл стал водным.
    /// Чем меньше, тем больше озёр (диапазон 1–4, по умолчанию 2).
    #[serde(default = "default_lake_threshold")]
    pub lake_threshold: u32,

    /// Коэффициент перераспределения высот и затухания глубины океана:
    /// больше 1 — больше горной местности и быстрее рост глубины
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f32,

    /// Плотность рек: число стартовых точек = `(width + height) * river_density`
    #[serde(default = "default_river_density")]
    pub river_density: f32,

    /// Дополнительная случайность: прибавляет джиттер к приращениям высоты и
    /// амплитудам береговой линии. Внимание: при включённом флаге повторная
    /// классификация одной и той же точки внутри одного запуска недетерминирована.
    #[serde(default = "default_extra_randomness")]
    pub extra_randomness: bool,
}

impl MapGenerationParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден или содержит недопустимый формат.
    ///
    /// # Пример
    /// ```toml
    /// # map.toml
    /// seed = 42
    /// width = 800
    /// height = 600
    /// num_x = 100
    /// num_y = 75
    /// land_shape = "Radial"
    /// ```
    pub fn from_toml_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let params: Self = toml::from_str(&contents)?;
        Ok(params)
    }
}

fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    600
}
fn default_num_x() -> u32 {
    100
}
fn default_num_y() -> u32 {
    75
}
fn default_lake_threshold() -> u32 {
    2
}
fn default_scale_factor() -> f32 {
    1.1
}
fn default_river_density() -> f32 {
    0.25
}
fn default_extra_randomness() -> bool {
    true
}

impl Default for MapGenerationParams {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 800,
            height: 600,
            num_x: 100,
            num_y: 75,
            land_shape: LandShapeType::Radial,
            shape: ShapeSettings::default(),
            lake_threshold: 2,
            scale_factor: 1.1,
            river_density: 0.25,
            extra_randomness: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_toml() {
        let params: MapGenerationParams = toml::from_str("seed = 7").unwrap();
        assert_eq!(params.seed, 7);
        assert_eq!(params.width, 800);
        assert_eq!(params.num_x, 100);
        assert_eq!(params.lake_threshold, 2);
        assert!(params.extra_randomness);
        assert_eq!(params.land_shape, LandShapeType::Radial);
    }

    #[test]
    fn parses_shape_overrides() {
        let toml = r#"
            seed = 1
            land_shape = "Cellular"

            [shape]
            noise_frequency = 0.05
            noise_cutoff = 0.2
        "#;
        let params: MapGenerationParams = toml::from_str(toml).unwrap();
        assert_eq!(params.land_shape, LandShapeType::Cellular);
        assert!((params.shape.noise_frequency - 0.05).abs() < 1e-6);
        // Незаданные поля берутся из default-функций
        assert!((params.shape.land_scale - 0.35).abs() < 1e-6);
    }
}
