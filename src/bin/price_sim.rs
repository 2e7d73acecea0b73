//! Generate simulated commodity price samples as CSV on stdout.
//!
//! Usage: `price_sim [n]` (default 1000 samples per commodity). Seed via
//! `PRICE_SIM_SEED` for reproducible runs; unset means a fresh seed each
//! run. One row per draw: `commodity,price`.

use std::env;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::json;

use trialdash::logging::{log, obj, Domain, Level};
use trialdash::prices::Commodity;

fn main() {
    let n: usize = env::args()
        .nth(1)
        .and_then(|v| v.parse().ok())
        .unwrap_or(1000);
    let seed: u64 = env::var("PRICE_SIM_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| rand::thread_rng().gen());

    log(
        Level::Info,
        Domain::Prices,
        "price_sim",
        obj(&[("n", json!(n)), ("seed", json!(seed))]),
    );

    let mut rng = StdRng::seed_from_u64(seed);
    println!("commodity,price");
    for commodity in Commodity::ALL {
        for price in commodity.sample(&mut rng, n) {
            println!("{},{:.2}", commodity.as_str(), price);
        }
    }
}
