#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::pedantic)]

use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasherDefault, Hash, Hasher};
use std::time::Instant;

use chainmap::ChainedMap;
use plotters::prelude::*;
use rand::Rng;

// Fixed table size; the sweep varies the number of keys instead
const BUCKETS: usize = 4096;
const NUM_LOAD_FACTORS: usize = 12;
const MAX_LOAD: f64 = 3.0;
const LOOKUP_ROUNDS: usize = 5;

/// Mirrors the bucket placement of `BuildHasherDefault<DefaultHasher>` so the
/// simulation can histogram chain lengths without poking at map internals.
fn bucket_of(key: u64) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() as usize) % BUCKETS
}

struct LoadPoint {
    load: f64,
    avg_chain: f64,
    max_chain: usize,
    expected_probes: f64,
    lookup_ns: f64,
}

fn measure(load: f64, rng: &mut impl Rng) -> LoadPoint {
    let n_keys = (BUCKETS as f64 * load) as usize;

    // Distinct keys from a random base; the hash spreads them anyway
    let base: u64 = rng.random_range(1..1_000_000_000);
    let keys: Vec<u64> = (0..n_keys as u64).map(|i| base + i).collect();

    let mut map: ChainedMap<u64, u64, BuildHasherDefault<DefaultHasher>> =
        ChainedMap::with_buckets_and_hasher(BUCKETS, BuildHasherDefault::default());
    for &key in &keys {
        map.insert(key, key);
    }
    assert_eq!(map.len(), n_keys);

    // Chain length histogram from the mirrored placement
    let mut chain_lens = vec![0_usize; BUCKETS];
    for &key in &keys {
        chain_lens[bucket_of(key)] += 1;
    }

    let occupied: Vec<usize> = chain_lens.iter().copied().filter(|&len| len > 0).collect();
    let avg_chain = if occupied.is_empty() {
        0.0
    } else {
        occupied.iter().sum::<usize>() as f64 / occupied.len() as f64
    };
    let max_chain = occupied.iter().copied().max().unwrap_or(0);

    // A successful lookup of the i-th entry in a chain costs i probes, so a
    // chain of length L contributes L * (L + 1) / 2 over its entries
    let expected_probes = if n_keys == 0 {
        0.0
    } else {
        chain_lens.iter().map(|&len| len * (len + 1) / 2).sum::<usize>() as f64 / n_keys as f64
    };

    // Wall-clock cost of hitting every key
    let start = Instant::now();
    let mut found = 0_usize;
    for _ in 0..LOOKUP_ROUNDS {
        for &key in &keys {
            if map.get(&key).is_some() {
                found += 1;
            }
        }
    }
    let elapsed = start.elapsed();
    let lookups = (n_keys * LOOKUP_ROUNDS).max(1);
    assert_eq!(found, n_keys * LOOKUP_ROUNDS);
    let lookup_ns = elapsed.as_nanos() as f64 / lookups as f64;

    LoadPoint { load, avg_chain, max_chain, expected_probes, lookup_ns }
}

/// Prints a tiny table so the dump format can be eyeballed alongside the
/// sweep numbers.
fn show_small_table() {
    let mut map = ChainedMap::with_buckets(4);
    map.insert("ash".to_string(), 1);
    map.insert("beech".to_string(), 2);
    map.insert("cedar".to_string(), 3);
    map.insert("douglas".to_string(), 4);

    println!("Sample map: {map}");
    println!("{}", map.dump());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    show_small_table();

    let load_factors: Vec<f64> =
        (1..=NUM_LOAD_FACTORS).map(|i| MAX_LOAD * i as f64 / NUM_LOAD_FACTORS as f64).collect();

    let mut rng = rand::rng();
    let mut points = Vec::with_capacity(load_factors.len());

    println!("Sweeping {} load factors over {} buckets", load_factors.len(), BUCKETS);
    for &load in &load_factors {
        let point = measure(load, &mut rng);
        println!(
            "  load {:.2}: avg chain = {:.2}, max chain = {}, expected probes = {:.2}, lookup = {:.0} ns",
            point.load, point.avg_chain, point.max_chain, point.expected_probes, point.lookup_ns
        );
        points.push(point);
    }

    let font_family = "sans-serif";
    let line_width = 2;
    let text_size = 16;
    let title_size = 35;

    let avg_color = RGBColor(50, 90, 220);
    let max_color = RGBColor(220, 50, 50);
    let probe_color = RGBColor(50, 180, 50);

    // Plot 1: chain lengths against load factor
    let root = BitMapBackend::new("chain_lengths.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = points.iter().map(|p| p.max_chain).max().unwrap_or(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Chain Length Growth Under Fixed Buckets", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..MAX_LOAD * 1.05, 0.0..max_y)?;

    chart
        .configure_mesh()
        .x_desc("Load Factor (entries / buckets)")
        .y_desc("Chain Length")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    let avg_style = ShapeStyle::from(&avg_color).stroke_width(line_width);
    chart
        .draw_series(LineSeries::new(points.iter().map(|p| (p.load, p.avg_chain)), avg_style))?
        .label("average non-empty chain")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], avg_style));

    let max_style = ShapeStyle::from(&max_color).stroke_width(line_width);
    chart
        .draw_series(LineSeries::new(
            points.iter().map(|p| (p.load, p.max_chain as f64)),
            max_style,
        ))?
        .label("longest chain")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], max_style));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    // Plot 2: lookup cost against load factor
    let root = BitMapBackend::new("lookup_cost.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_probe = points.iter().map(|p| p.expected_probes).fold(0.0, f64::max) * 1.2;

    let mut chart = ChartBuilder::on(&root)
        .caption("Successful Lookup Cost", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..MAX_LOAD * 1.05, 0.0..max_probe)?;

    chart
        .configure_mesh()
        .x_desc("Load Factor (entries / buckets)")
        .y_desc("Expected Probes Per Hit")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    let probe_style = ShapeStyle::from(&probe_color).stroke_width(line_width);
    chart
        .draw_series(LineSeries::new(
            points.iter().map(|p| (p.load, p.expected_probes)),
            probe_style,
        ))?
        .label("expected probes")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], probe_style));

    chart.draw_series(
        points.iter().map(|p| Circle::new((p.load, p.expected_probes), 4, probe_color.filled())),
    )?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    println!("Wrote chain_lengths.png and lookup_cost.png");

    Ok(())
}
