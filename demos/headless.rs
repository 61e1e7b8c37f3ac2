use quakemap::{
    HeadlessSurface, HttpFeedSource, LegendState, OverlayEvent, QuakeMap, QuakeMapConfig,
    StaticFeedSource,
};

const SAMPLE_FEED: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"mag": 1.2, "place": "5km NW of The Geysers, CA"},
     "geometry": {"type": "Point", "coordinates": [-122.8, 38.8, 2.1]}},
    {"type": "Feature", "properties": {"mag": 3.4, "place": "10km S of Hollister, CA"},
     "geometry": {"type": "Point", "coordinates": [-121.4, 36.8, 7.0]}},
    {"type": "Feature", "properties": {"mag": 5.1, "place": "Fox Islands, Aleutian Islands, Alaska"},
     "geometry": {"type": "Point", "coordinates": [-169.9, 52.6, 30.0]}}
  ]
}"#;

/// Loads the earthquake map without any UI and prints what a surface would
/// be asked to draw. Pass `--offline` to use a built-in sample feed.
#[tokio::main]
async fn main() -> quakemap::Result<()> {
    quakemap::init_logging();

    let offline = std::env::args().any(|arg| arg == "--offline");
    let config = if offline {
        QuakeMapConfig::default().with_plates_url(None)
    } else {
        QuakeMapConfig::from_env()?
    };

    println!("🗺️ quakemap headless example");
    println!("   feed: {}", config.earthquake_feed_url());

    let mut surface = HeadlessSurface::new();
    let mut map = if offline {
        let source =
            StaticFeedSource::new().with_feed(config.earthquake_feed_url(), SAMPLE_FEED);
        QuakeMap::load_onto(&source, config, &mut surface).await?
    } else {
        let source = HttpFeedSource::from_config(&config);
        QuakeMap::load_onto(&source, config, &mut surface).await?
    };

    let [min, mid, max] = map.scale().domain();
    println!("\n🎨 color scale: {min} / {mid} / {max}");

    println!("\n📍 overlays:");
    for (name, layer, visible) in map.registry().iter() {
        println!("   {name}: {} features (visible: {visible})", layer.len());
    }

    println!("\n📋 legend:");
    for bin in map.legend().bins() {
        println!("   {} {}", bin.color.to_hex(), bin.label);
    }

    for notice in map.notices() {
        println!("\n⚠️ {notice}");
    }

    println!("\n🔁 toggling the earthquake overlay:");
    for event in [
        OverlayEvent::removed("Earthquakes"),
        OverlayEvent::added("Earthquakes"),
    ] {
        map.handle_event(&event, &mut surface);
        let state = match map.legend_state() {
            LegendState::Visible => "visible",
            LegendState::Hidden => "hidden",
        };
        println!("   {event:?} -> legend {state}");
    }

    println!("\n✅ {} surface calls recorded", surface.calls().len());
    Ok(())
}
