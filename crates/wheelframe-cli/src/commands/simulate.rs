use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::info;

use wheelframe_core::{
    AnimatedElement, AppConfig, RecordingSurface, Scene, ScriptedEvent, SimulatedFrame, TickDriver,
    WheelEvent, WheelSession, MAX_SCENE_MS,
};

pub struct SimulateOptions {
    pub duration_ms: u64,
    pub tick_ms: u64,
    pub realtime: bool,
    pub json: bool,
}

pub async fn run(config: &AppConfig, scene_path: &Path, options: SimulateOptions) -> Result<()> {
    if options.tick_ms == 0 {
        return Err(anyhow!("--tick-ms must be greater than 0"));
    }
    if options.duration_ms > MAX_SCENE_MS {
        return Err(anyhow!("--duration-ms must not exceed {}", MAX_SCENE_MS));
    }

    let scene = Scene::load(scene_path)?;
    let session_config = scene.session_config(config.session);
    info!(
        scene = %scene_path.display(),
        layers = scene.layers.len(),
        events = scene.events.len(),
        realtime = options.realtime,
        "Simulating scene"
    );

    if options.realtime {
        return run_realtime(&scene, session_config, &options).await;
    }

    let frames = scene.simulate(session_config, options.duration_ms, options.tick_ms)?;
    for frame in &frames {
        print_frame(frame, options.json)?;
    }
    if !options.json {
        println!("{} frames", frames.len());
    }
    Ok(())
}

/// Drive the scene through a [`TickDriver`] on the wall clock, printing each
/// frame as it is broadcast
async fn run_realtime(
    scene: &Scene,
    session_config: wheelframe_core::SessionConfig,
    options: &SimulateOptions,
) -> Result<()> {
    let session = WheelSession::new(session_config)?;
    let handle = session.handle();

    let elements = scene
        .layers
        .iter()
        .map(|layer| {
            let element = AnimatedElement::mount(
                &handle,
                layer.animations.clone(),
                vec![Some(RecordingSurface::new())],
            )?;
            Ok((layer.name.clone(), element))
        })
        .collect::<wheelframe_core::Result<Vec<_>>>()?;
    let elements = Rc::new(elements);

    // Subscribed after the elements, so their composites are fresh when it runs
    let started = Instant::now();
    let json = options.json;
    let _printer = handle.subscribe({
        let elements = Rc::clone(&elements);
        move |position| {
            let frame = SimulatedFrame {
                at_ms: started.elapsed().as_secs_f64() * 1000.0,
                position,
                transforms: elements
                    .iter()
                    .map(|(name, element)| (name.clone(), element.last_transform()))
                    .collect(),
            };
            if let Err(e) = print_frame(&frame, json) {
                tracing::error!("Failed to print frame: {}", e);
            }
        }
    })?;

    let (wheel_tx, wheel_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let driver = TickDriver::new(Duration::from_millis(options.tick_ms));

    let mut events: Vec<ScriptedEvent> = scene.events.clone();
    events.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
    let end = deadline(started, options.duration_ms as f64)?;
    let mut event_deadlines = Vec::with_capacity(events.len());
    for event in &events {
        event_deadlines.push((deadline(started, event.at_ms)?, event.delta_y));
    }

    let script = async move {
        for (at, delta_y) in event_deadlines {
            tokio::time::sleep_until(at).await;
            if wheel_tx.send(WheelEvent::new(delta_y)).is_err() {
                break;
            }
        }
        drop(wheel_tx);
        tokio::time::sleep_until(end).await;
    };

    let stop = async move {
        tokio::select! {
            _ = script => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
            }
        }
        let _ = shutdown_tx.send(true);
    };

    let (reason, ()) = tokio::join!(driver.run(&session, wheel_rx, shutdown_rx), stop);
    info!(reason = ?reason, "Simulation finished");
    Ok(())
}

/// The instant `offset_ms` after `started`, or an error when the offset is
/// not a representable duration
fn deadline(started: Instant, offset_ms: f64) -> Result<Instant> {
    let offset = Duration::try_from_secs_f64(offset_ms / 1000.0)
        .map_err(|e| anyhow!("invalid time offset {}ms: {}", offset_ms, e))?;
    started
        .checked_add(offset)
        .ok_or_else(|| anyhow!("time offset {}ms is out of range", offset_ms))
}

fn print_frame(frame: &SimulatedFrame, json: bool) -> Result<()> {
    if json {
        let layers: serde_json::Map<String, serde_json::Value> = frame
            .transforms
            .iter()
            .map(|(name, transform)| (name.clone(), serde_json::json!(transform)))
            .collect();
        let line = serde_json::json!({
            "atMs": frame.at_ms,
            "position": frame.position,
            "layers": layers,
        });
        println!("{}", serde_json::to_string(&line)?);
    } else {
        let layers = frame
            .transforms
            .iter()
            .map(|(name, transform)| format!("{}={}", name, transform.as_deref().unwrap_or("-")))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{:>8.1}ms  {:>12.4}  {}", frame.at_ms, frame.position, layers);
    }
    Ok(())
}
