// src/land_shape.rs
//! Стратегии формы суши
//!
//! Предикат `is_land(point)` решает, находится ли точка карты на суше.
//! Доступные стратегии:
//! - **Радиальный остров** — радиус точки сравнивается с двумя синусоидальными
//!   границами; один случайный сектор ("бухта") подменяет границы на шельфовые
//! - **Шумовые поля** — сэмплирование 2D-шума (OpenSimplex2, Перлин, value,
//!   клеточный) с отсечением по порогу
//! - **`Uniform`** — вырожденная стратегия для тестов и отладки
//!
//! Все случайные параметры стратегии вытягиваются один раз при построении.
//! При включённом `extra_randomness` амплитуды синусоид (и смещение точки
//! сэмплирования шума) дополнительно джиттерятся на каждый вызов — повторная
//! классификация одной и той же точки при этом недетерминирована.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f32::consts::PI;

use crate::config::{LandShapeType, MapGenerationParams, ShapeSettings};

/// Параметры радиального острова
///
/// Вытягиваются случайно при построении; публичные поля позволяют собрать
/// фиксированную форму в тестах.
#[derive(Debug, Clone, Copy)]
pub struct RadialShape {
    /// Число выступов береговой линии (1–5)
    pub bumps: u32,
    /// Фазовый сдвиг синусоид
    pub start_angle: f32,
    /// Направление сектора бухты
    pub dip_angle: f32,
    /// Угловая полуширина сектора бухты
    pub dip_width: f32,
    /// Нижняя база внутренней границы
    pub start: f32,
    /// Верхняя база внешней границы
    pub end: f32,
    pub land_factor: f32,
    pub land_scale: f32,
    pub land_slope: f32,
    /// Размер карты и смещение в полтайла: точки нормализуются в `[-1,1]²`
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl RadialShape {
    /// Вытягивает случайную форму острова из потока `rng`
    pub fn draw(
        rng: &mut ChaCha8Rng,
        settings: &ShapeSettings,
        width: f32,
        height: f32,
        offset_x: f32,
        offset_y: f32,
    ) -> Self {
        let bumps = rng.gen_range(1..6);
        let start_angle = rng.gen_range(0.0..1.0) * 2.0 * PI;
        let dip_angle = rng.gen_range(0.0..1.0) * 2.0 * PI;

        let random = rng.gen_range(0.0..1.0);
        let start = rng.gen_range(0.0..0.5);
        let end = rng.gen_range(0.5..1.0);

        Self {
            bumps,
            start_angle,
            dip_angle,
            dip_width: (end - start) * random + start,
            start,
            end,
            land_factor: settings.land_factor,
            land_scale: settings.land_scale,
            land_slope: settings.land_slope,
            width,
            height,
            offset_x,
            offset_y,
        }
    }
}

struct NoiseShape {
    noise: FastNoiseLite,
    cutoff: f32,
}

enum ShapeKind {
    Radial(RadialShape),
    Noise(NoiseShape),
    Uniform(bool),
}

/// Классификатор суши: стратегия + собственный поток джиттера
pub struct LandShape {
    kind: ShapeKind,
    jitter: ChaCha8Rng,
    extra_randomness: bool,
}

impl LandShape {
    /// Строит стратегию из конфигурации, потребляя общий поток случайных чисел
    pub fn from_params(
        params: &MapGenerationParams,
        offset_x: f32,
        offset_y: f32,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let kind = match params.land_shape {
            LandShapeType::Radial => ShapeKind::Radial(RadialShape::draw(
                rng,
                &params.shape,
                params.width as f32,
                params.height as f32,
                offset_x,
                offset_y,
            )),
            LandShapeType::Simplex => Self::noise_kind(rng, &params.shape, NoiseType::OpenSimplex2),
            LandShapeType::Perlin => Self::noise_kind(rng, &params.shape, NoiseType::Perlin),
            LandShapeType::Value => Self::noise_kind(rng, &params.shape, NoiseType::Value),
            LandShapeType::Cellular => Self::noise_kind(rng, &params.shape, NoiseType::Cellular),
        };
        Self {
            kind,
            jitter: ChaCha8Rng::seed_from_u64(rng.r#gen()),
            extra_randomness: params.extra_randomness,
        }
    }

    /// Фиксированный радиальный остров (для тестов и отладки)
    #[must_use]
    pub fn radial(shape: RadialShape, extra_randomness: bool, jitter_seed: u64) -> Self {
        Self {
            kind: ShapeKind::Radial(shape),
            jitter: ChaCha8Rng::seed_from_u64(jitter_seed),
            extra_randomness,
        }
    }

    /// Вырожденный классификатор: вся карта — суша либо вода
    #[must_use]
    pub fn uniform(land: bool) -> Self {
        Self {
            kind: ShapeKind::Uniform(land),
            jitter: ChaCha8Rng::seed_from_u64(0),
            extra_randomness: false,
        }
    }

    fn noise_kind(rng: &mut ChaCha8Rng, settings: &ShapeSettings, noise_type: NoiseType) -> ShapeKind {
        let mut noise = FastNoiseLite::new();
        noise.set_seed(Some(rng.r#gen::<i32>()));
        noise.set_noise_type(Some(noise_type));
        noise.set_frequency(Some(settings.noise_frequency));
        ShapeKind::Noise(NoiseShape {
            noise,
            cutoff: settings.noise_cutoff,
        })
    }

    /// Принадлежит ли точка карты суше
    pub fn is_land(&mut self, x: f32, y: f32) -> bool {
        match &self.kind {
            ShapeKind::Uniform(land) => *land,
            ShapeKind::Noise(shape) => {
                let (jx, jy) = if self.extra_randomness {
                    (
                        self.jitter.gen_range(-1.0..1.0),
                        self.jitter.gen_range(-1.0..1.0),
                    )
                } else {
                    (0.0, 0.0)
                };
                shape.noise.get_noise_2d(x + jx, y + jy) > shape.cutoff
            }
            ShapeKind::Radial(shape) => {
                // Амплитуды синусоид: U(0, 0.5) на каждый вызов либо фиксированное
                // среднее 0.25 в детерминированном режиме
                let (a1, a2, dip1, dip2) = if self.extra_randomness {
                    (
                        self.jitter.gen_range(0.0..0.5),
                        self.jitter.gen_range(0.0..0.5),
                        self.jitter.gen_range(0.0..shape.land_slope),
                        self.jitter.gen_range(shape.land_slope..1.0),
                    )
                } else {
                    (
                        0.25,
                        0.25,
                        shape.land_slope * 0.5,
                        (shape.land_slope + 1.0) * 0.5,
                    )
                };
                radial_is_land(shape, x, y, a1, a2, dip1, dip2)
            }
        }
    }
}

fn radial_is_land(
    shape: &RadialShape,
    x: f32,
    y: f32,
    a1: f32,
    a2: f32,
    dip_r1: f32,
    dip_r2: f32,
) -> bool {
    // Нормализация точки в [-1,1]² относительно центра карты
    let qx = (x + shape.offset_x) / shape.width * 2.0 - 1.0;
    let qy = (y + shape.offset_y) / shape.height * 2.0 - 1.0;

    let angle = qy.atan2(qx);
    let length = shape.land_scale * (qx.abs().max(qy.abs()) + (qx * qx + qy * qy).sqrt());

    let bumps = shape.bumps as f32;
    let mut r1 = shape.start
        + a1 * (shape.start_angle + bumps * angle + ((bumps + 3.0) * angle).cos()).sin();
    let mut r2 =
        shape.end - a2 * (shape.start_angle + bumps * angle - ((bumps + 2.0) * angle).sin()).sin();

    // Сектор бухты: подменяем границы на шельфовые
    if (angle - shape.dip_angle).abs() < shape.dip_width
        || (angle - shape.dip_angle + 2.0 * PI).abs() < shape.dip_width
        || (angle - shape.dip_angle - 2.0 * PI).abs() < shape.dip_width
    {
        r1 = dip_r1;
        r2 = dip_r2;
    }

    length < r1 || (length > r1 * shape.land_factor && length < r2)
}
