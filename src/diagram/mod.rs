// src/diagram/mod.rs
//! Тайловая диаграмма карты: Site, Corner, Edge и конвейер генерации
//!
//! Все три вида элементов лежат в плоских массивах, размер которых задаётся
//! один раз при инициализации. Перекрёстные ссылки — индексы в массивах,
//! `-1` означает "соседа нет" (граница сетки).
//!
//! Конвейер строго последовательный, каждая стадия опирается на инварианты
//! предыдущей:
//! 1. топология сетки ([`builder`])
//! 2. высоты углов от ближайшей воды ([`elevation`])
//! 3. океан/озёра/побережье ([`water`])
//! 4. перераспределение высот и высоты регионов ([`elevation`])
//! 5. стоки, водоразделы и реки ([`rivers`])
//! 6. биомы регионов ([`crate::biome`])

pub mod builder;
pub mod elevation;
pub mod png;
pub mod rivers;
pub mod water;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::biome::BiomeType;
use crate::config::MapGenerationParams;
use crate::land_shape::LandShape;

/// Сентинел "соседа нет"
pub const NO_INDEX: i32 = -1;

/// Кардинальные соседи тайла среди восьми (верх, лево, право, низ)
pub(crate) const SITE_CARDINALS: [usize; 4] = [1, 3, 4, 6];

/// Ошибки инициализации диаграммы
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiagramError {
    /// Размер карты не делится нацело на число тайлов
    #[error("размер карты {width}×{height} не делится нацело на сетку {num_x}×{num_y}")]
    InvalidGridDimensions {
        width: u32,
        height: u32,
        num_x: u32,
        num_y: u32,
    },
    /// Классификатор суши не дал ни одного водного угла: высоты не от чего отсчитывать
    #[error("классификатор суши не дал ни одного водного угла")]
    NoWaterSource,
}

/// Тайл — базовый регион карты
#[derive(Debug, Clone, Copy)]
pub struct Site {
    pub index: i32,
    /// Опорная точка тайла
    pub point: (f32, f32),
    pub water: bool,
    pub island: bool,
    pub coast: bool,
    pub border: bool,
    pub biome: BiomeType,
    /// Соседние тайлы s0..s7 (окрестность 3×3 без себя, построчно)
    pub neighbors: [i32; 8],
    /// Ограничивающие рёбра: левое, правое, верхнее, нижнее
    pub edges: [i32; 4],
    /// Углы тайла: верхний левый, верхний правый, нижний левый, нижний правый
    pub corners: [i32; 4],
    /// Высота: суша в `[0,1]`, океан отрицательный
    pub elevation: f32,
    pub moisture: f32,
    pub flux: f32,
}

/// Угол — вершина сетки, общая для четырёх тайлов
#[derive(Debug, Clone, Copy)]
pub struct Corner {
    pub index: i32,
    /// Позиция со смещением в полтайла от сетки тайлов
    pub point: (f32, f32),
    pub water: bool,
    pub coast: bool,
    pub border: bool,
    pub biome: BiomeType,
    /// Прилегающие тайлы: верхний левый, верхний правый, нижний левый, нижний правый
    pub sites: [i32; 4],
    /// Прилегающие рёбра: левое, правое, верхнее, нижнее
    pub edges: [i32; 4],
    /// Соседние углы: левый, правый, верхний, нижний
    pub neighbors: [i32; 4],
    pub elevation: f32,
    pub moisture: f32,
    pub flux: f32,
    /// Сосед с минимальной высотой (или сам угол во впадине)
    pub downslope: i32,
    /// Конечная точка цепочки стоков — водораздел бассейна
    pub watershed: i32,
    /// Сколько углов стекает в этот водораздел; `-1`, если он сам вода
    pub watershed_size: i32,
    /// Счётчик проходов рек
    pub river: i32,
}

/// Ребро — отрезок сетки между двумя углами, разделяющий до двух тайлов
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub index: i32,
    pub midpoint: (f32, f32),
    pub border: bool,
    /// Тайлы по сторонам ребра (`-1` на границе карты)
    pub sites: [i32; 2],
    /// Концевые углы
    pub corners: [i32; 2],
    pub elevation: f32,
    pub moisture: f32,
    pub flux: f32,
    /// Счётчик проходов рек
    pub river: i32,
}

/// Тайловая диаграмма — результат генерации
///
/// Потребители (рендер, отладка) читают массивы только по индексам через
/// аксессоры; мутация после генерации не предусмотрена.
#[derive(Debug)]
pub struct TilesDiagram {
    pub(crate) sites: Vec<Site>,
    pub(crate) corners: Vec<Corner>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) tile_width: u32,
    pub(crate) tile_height: u32,
    pub(crate) num_x: u32,
    pub(crate) num_y: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl TilesDiagram {
    /// Генерирует диаграмму по конфигурации
    ///
    /// Стратегия суши строится из того же потока случайных чисел, что и
    /// остальной конвейер, поэтому результат полностью определяется сидом
    /// (при выключенном `extra_randomness`).
    pub fn generate(params: &MapGenerationParams) -> Result<Self, DiagramError> {
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        if params.num_x == 0
            || params.num_y == 0
            || params.width % params.num_x != 0
            || params.height % params.num_y != 0
        {
            return Err(DiagramError::InvalidGridDimensions {
                width: params.width,
                height: params.height,
                num_x: params.num_x,
                num_y: params.num_y,
            });
        }
        let tile_width = params.width / params.num_x;
        let tile_height = params.height / params.num_y;
        let mut shape = LandShape::from_params(
            params,
            tile_width as f32 * 0.5,
            tile_height as f32 * 0.5,
            &mut rng,
        );
        Self::generate_with_shape(params, &mut shape, &mut rng)
    }

    /// Генерирует диаграмму с готовой стратегией суши (тесты, отладка)
    pub fn generate_with_shape(
        params: &MapGenerationParams,
        shape: &mut LandShape,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self, DiagramError> {
        let mut diagram = builder::build(params)?;
        log::debug!(
            "топология: {} тайлов, {} углов, {} рёбер",
            diagram.sites.len(),
            diagram.corners.len(),
            diagram.edges.len()
        );

        elevation::assign_corner_elevations(&mut diagram, shape, rng, params.extra_randomness)?;
        water::assign_ocean_coast_and_land(&mut diagram, params.lake_threshold);
        elevation::redistribute_corner_elevations(&mut diagram, params.scale_factor);
        elevation::assign_land_region_elevations(&mut diagram);
        elevation::assign_ocean_region_elevations(&mut diagram, params.scale_factor);
        rivers::calculate_downslopes(&mut diagram);
        rivers::calculate_watersheds(&mut diagram);
        let samples = ((params.width + params.height) as f32 * params.river_density) as usize;
        rivers::create_rivers(&mut diagram, rng, samples);
        crate::biome::assign_site_biomes(&mut diagram);

        log::info!(
            "карта {}×{} сгенерирована: {} океанских тайлов, {} прибрежных",
            params.width,
            params.height,
            diagram
                .sites
                .iter()
                .filter(|s| s.biome == BiomeType::Ocean)
                .count(),
            diagram.sites.iter().filter(|s| s.coast).count()
        );
        Ok(diagram)
    }

    #[must_use]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    #[must_use]
    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    #[must_use]
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    #[must_use]
    pub fn num_x(&self) -> u32 {
        self.num_x
    }

    #[must_use]
    pub fn num_y(&self) -> u32 {
        self.num_y
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
}
