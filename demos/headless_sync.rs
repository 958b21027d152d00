use maplet_gl::prelude::*;
use tokio::time::interval;

/// Drives a GL layer against the headless host map with a ~60fps frame loop:
/// a pan gesture, an animated zoom, a window resize and a pinch zoom
#[tokio::main]
async fn main() -> maplet_gl::Result<()> {
    env_logger::init();

    println!("🗺️ maplet-gl Headless Sync Example");
    println!("==================================");

    let mut host = HeadlessMap::new(LatLng::new(46.5197, 6.6323), 12.0, Point::new(1024.0, 768.0));
    let factory = HeadlessSurfaceFactory::new();
    let options = GlLayerOptions::new("https://api.maptiler.com/maps/outdoor-v2/style.json?key=DEMO")
        .with_padding(0.15)
        .with_attribution("Demo data");

    let mut layer = gl_layer(options, factory.clone())?;
    layer.on_add(&mut host)?;
    let surface = factory
        .last_surface()
        .ok_or_else(|| MapError::Surface("no surface was built".into()))?;

    println!("✅ Layer attached to {}", layer.pane_name(&host));
    println!("   Attribution: {}", layer.attribution().unwrap_or_default());
    let size = layer.size(&host);
    println!("   Overlay size: {}x{}", size.x, size.y);

    let mut frames = interval(Duration::from_millis(16));
    for frame in 0..90u32 {
        frames.tick().await;
        let now = Instant::now();

        match frame {
            0..=19 => host.pan_by(Point::new(12.0, -4.0)),
            30 => host.animate_zoom(host.center(), 13.0),
            45 => {
                host.end_zoom_animation();
            }
            60 => host.resize(Point::new(1280.0, 800.0)),
            75 => host.set_zoom(14.5),
            _ => {}
        }

        for event in host.drain_events() {
            layer.handle_event(&mut host, &event, now)?;
        }
        layer.tick(&mut host, now)?;

        if frame % 15 == 0 {
            let camera = surface.camera();
            println!(
                "   frame {:>2}: phase {}, surface at ({:.4}, {:.4}) zoom {:.2}",
                frame,
                layer.phase(),
                camera.center.lat,
                camera.center.lng,
                camera.zoom
            );
        }
    }

    let stats = layer.stats();
    println!("\n📊 Synchronization summary:");
    println!("   Passes:  {}", stats.passes);
    println!("   Resizes: {}", stats.resizes);
    println!("   Redraws: {}", stats.redraws);
    println!("   Resets:  {}", stats.resets);
    println!("   Host zoom {} -> surface zoom {}", host.zoom(), surface.zoom());

    layer.on_remove(&mut host)?;
    println!("\n🎉 Layer detached, surface removed: {}", surface.is_removed());
    Ok(())
}
