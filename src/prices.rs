//! Simulated commodity prices, AUD per tonne.
//!
//! Wheat prices are roughly normal with a censored lower tail around the
//! observed floor, so a clamped normal fits. The pulse and oat markets are
//! bimodal with peak/tail patterns no single distribution describes well,
//! so they sample uniformly inside historical decile bands instead.
//!
//! Standalone generators with no interaction with the filter core.

use rand::Rng;
use rand_distr::{Distribution, Normal};

pub const WHEAT_MEAN: f64 = 350.0;
pub const WHEAT_SD: f64 = 60.0;
pub const WHEAT_FLOOR: f64 = 200.0;

/// Decile bounds, index 0 = min and 10 = max.
pub const FABABEAN_DECILES: [f64; 11] = [
    281.0, 319.0, 338.0, 346.0, 407.0, 449.0, 475.0, 490.0, 500.0, 571.0, 746.0,
];
pub const PEAS_DECILES: [f64; 11] = [
    357.0, 402.0, 422.0, 438.0, 458.0, 472.0, 482.0, 498.0, 556.0, 587.0, 666.0,
];
pub const OATS_DECILES: [f64; 11] = [
    251.0, 287.0, 298.0, 314.0, 324.0, 340.0, 370.0, 400.0, 440.0, 474.0, 561.0,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commodity {
    Wheat,
    Fababean,
    Peas,
    Oats,
}

impl Commodity {
    pub const ALL: [Commodity; 4] = [
        Commodity::Wheat,
        Commodity::Fababean,
        Commodity::Peas,
        Commodity::Oats,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Commodity::Wheat => "wheat",
            Commodity::Fababean => "fababean",
            Commodity::Peas => "peas",
            Commodity::Oats => "oats",
        }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R, n: usize) -> Vec<f64> {
        match self {
            Commodity::Wheat => wheat_prices(rng, n),
            Commodity::Fababean => decile_prices(rng, &FABABEAN_DECILES, n),
            Commodity::Peas => decile_prices(rng, &PEAS_DECILES, n),
            Commodity::Oats => decile_prices(rng, &OATS_DECILES, n),
        }
    }
}

/// Normal(350, 60) with values below 200 clamped to 200.
pub fn wheat_prices<R: Rng>(rng: &mut R, n: usize) -> Vec<f64> {
    let normal = Normal::new(WHEAT_MEAN, WHEAT_SD).unwrap();
    (0..n)
        .map(|_| normal.sample(rng).max(WHEAT_FLOOR))
        .collect()
}

/// Pick a decile with probability 1/10 each, then sample uniformly between
/// its bounds.
pub fn decile_prices<R: Rng>(rng: &mut R, deciles: &[f64; 11], n: usize) -> Vec<f64> {
    (0..n)
        .map(|_| {
            let u: f64 = rng.gen();
            let d = ((u * 10.0) as usize).min(9);
            rng.gen_range(deciles[d]..deciles[d + 1])
        })
        .collect()
}
