//! City Partition Example
//!
//! Builds a small synthetic district, runs the subdivision engine over a
//! starting grid, persists the result to a snapshot and writes the final
//! partition as GeoJSON.

use geo::coord;
use std::error::Error;
use std::ops::ControlFlow;
use zonestat::export::zones_to_geojson;
use zonestat::ingest::{RawBuilding, prepare_buildings};
use zonestat::prelude::*;
use zonestat::zone_weight;

fn district() -> Vec<RawBuilding> {
    let kinds = ["apartments", "house", "retail", "warehouse", "church"];
    let mut buildings = Vec::new();

    // A dense block of apartments in the south-west corner
    for i in 0..12u64 {
        for j in 0..12u64 {
            let lon = 13.401 + i as f64 * 0.0006;
            let lat = 52.501 + j as f64 * 0.0004;
            buildings.push(footprint(i * 12 + j, kinds[0], lon, lat, 0.0003, 8));
        }
    }

    // Mixed low-rise use everywhere else
    for i in 0..30u64 {
        let lon = 13.405 + (i % 6) as f64 * 0.0025;
        let lat = 52.505 + (i / 6) as f64 * 0.0018;
        let kind = kinds[1 + (i as usize % 4)];
        buildings.push(footprint(1_000 + i, kind, lon, lat, 0.0002, 2));
    }

    buildings
}

fn footprint(id: u64, raw_type: &str, lon: f64, lat: f64, side: f64, levels: u32) -> RawBuilding {
    RawBuilding {
        id,
        raw_type: raw_type.to_string(),
        outline: vec![
            coord! { x: lon, y: lat },
            coord! { x: lon + side, y: lat },
            coord! { x: lon + side, y: lat + side * 0.6 },
            coord! { x: lon, y: lat + side * 0.6 },
        ],
        levels: Some(levels),
        height: None,
    }
}

fn main() -> std::result::Result<(), Box<dyn Error>> {
    env_logger::init();
    println!("=== zonestat - City Partition ===\n");

    let config = Config::default().with_weight_threshold(40_000.0);
    let categories = CategoryConfig::from_json(
        r#"{
            "categories": {
                "residential": { "weight": 1.0, "extra_radius_kf": 0.8 },
                "commercial": { "weight": 1.5, "extra_radius_kf": 1.2, "effects": { "jobs": 0.3 } },
                "industrial": { "weight": 2.0, "extra_radius_kf": 1.5, "effects": { "pollution": 0.5 } }
            },
            "raw_types": {
                "apartments": "residential",
                "house": "residential",
                "retail": "commercial",
                "warehouse": "industrial"
            }
        }"#,
    )?;

    let buildings = prepare_buildings(district(), &categories);
    println!("Prepared {} buildings", buildings.len());

    let bounds = GeoBounds::new(13.4, 52.5, 13.42, 52.515);
    let dir = tempfile::tempdir()?;
    let mut store = SnapshotZoneStore::open(dir.path().join("district.snapshot"))?;
    if store.is_empty() {
        store.upsert_zones(&initial_grid(&bounds, 2, 2))?;
    }
    let zones = store.load_initial_zones(&bounds)?;
    println!("Loaded {} starting zones\n", zones.len());

    let engine = SubdivisionEngine::new(&config, &categories);
    let outcome = engine.run_with(zones, &buildings, |report| {
        println!(
            "  iteration {:>2}: {:>3} zones, {} split, {} rolled back, {} shared buildings",
            report.iteration,
            report.zone_count,
            report.overweight.len(),
            report.affected.len(),
            report.distribution.shared
        );
        ControlFlow::Continue(())
    })?;

    println!(
        "\nConverged after {} iterations: {} zones, {} replaced",
        outcome.iterations,
        outcome.zones.len(),
        outcome.pending_deletion.len()
    );

    let heaviest = outcome
        .zones
        .iter()
        .map(|zone| (zone.id.as_str(), zone_weight(zone, &categories)))
        .fold(("", 0.0), |best, next| if next.1 > best.1 { next } else { best });
    println!("Heaviest zone: {} ({:.0})", heaviest.0, heaviest.1);

    persist_outcome(&mut store, &outcome)?;
    println!("Snapshot holds {} zones", store.len());

    let geojson = zones_to_geojson(&outcome.zones)?;
    let out = dir.path().join("district.geojson");
    std::fs::write(&out, geojson)?;
    println!("Wrote {}", out.display());

    Ok(())
}
