use ::rand as external_rand;
use clap::Parser;
use external_rand::thread_rng;

mod agent;
mod config;
mod field;
mod simulation;
mod swarm;

use config::SimulationConfig;
use simulation::Simulation;

#[cfg(feature = "ui")]
mod controls;
#[cfg(feature = "ui")]
mod visualization;

#[cfg(feature = "ui")]
use macroquad::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run without a window for a fixed number of steps
    #[arg(long)]
    headless: bool,

    /// Number of simulation steps to run in headless mode
    #[arg(long, default_value_t = 1800)]
    steps: u64,

    /// Configuration file path (YAML or JSON). If not specified, searches for config.yaml, config.yml, or config.json in current directory.
    #[arg(short, long)]
    config: Option<String>,

    /// Directory to write grayscale PNG frames into (headless mode)
    #[arg(long)]
    export_dir: Option<String>,

    /// Export every Nth frame in headless mode (0 disables export)
    #[arg(long, default_value_t = 60)]
    export_every: u64,
}

#[cfg(not(feature = "ui"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Headless mode only
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    headless_main(&args, config)
}

#[cfg(feature = "ui")]
#[macroquad::main(window_conf)]
async fn main() {
    let args = Args::parse();

    // Load configuration
    let config = match load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    if args.headless {
        // Run headless mode even with UI feature enabled
        if let Err(e) = headless_main(&args, config) {
            eprintln!("Error running headless mode: {}", e);
            std::process::exit(1);
        }
    } else {
        ui_main(config).await;
    }
}

/// Load configuration from file or use default
fn load_config(config_path: Option<&str>) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    if let Some(path) = config_path {
        // User specified a config file
        SimulationConfig::from_file(path)
            .map_err(|e| format!("Failed to load config from {}: {}", path, e).into())
    } else {
        // Try default paths
        Ok(SimulationConfig::from_default_paths())
    }
}

#[cfg(feature = "ui")]
async fn ui_main(config: SimulationConfig) {
    use controls::handle_controls;
    use visualization::{draw_agents, draw_help_popup, draw_stats_and_help, FieldView};

    let mut rng = thread_rng();
    let mut sim = Simulation::with_config(&mut rng, config);
    let mut view = FieldView::new(sim.field.width(), sim.field.height());

    // The render surface is fixed at startup; losing it is fatal to the run.
    let surface_w = screen_width();
    let surface_h = screen_height();
    let started = std::time::Instant::now();

    loop {
        if (screen_width() - surface_w).abs() > 0.5 || (screen_height() - surface_h).abs() > 0.5 {
            eprintln!(
                "Render surface changed from {}x{} to {}x{} mid-run; stopping.",
                surface_w,
                surface_h,
                screen_width(),
                screen_height()
            );
            break;
        }

        // Handle player controls
        handle_controls(&mut sim, &mut rng);

        clear_background(BLACK);

        // Draw the trail field, then the optional agent overlay
        view.draw(&sim.field);
        draw_agents(&sim.swarm, sim.agents_visible, &sim.config);

        // Update simulation only if not paused
        // Handle speed multiplier with accumulator for fractional speeds
        if !sim.paused {
            sim.speed_accumulator += sim.speed_multiplier;
            let steps = sim.speed_accumulator.floor() as usize;
            sim.speed_accumulator -= steps as f32;

            for _ in 0..steps {
                sim.step(&mut rng);
            }
        }

        // Draw statistics overlay (always visible)
        let (agent_count, mean_intensity, max_intensity, frame_index) = sim.stats();
        draw_stats_and_help(
            agent_count,
            mean_intensity,
            max_intensity,
            frame_index,
            sim.paused,
            sim.speed_multiplier,
        );

        // Draw help popup if visible
        if sim.help_popup_visible {
            draw_help_popup();
        } else {
            // Show hint to press F1 for help when popup is not visible
            let hint_text = "Press F1 for controls";
            let hint_font_size = 16.0;
            let hint_width = measure_text(hint_text, None, hint_font_size as u16, 1.0).width;
            draw_text(
                hint_text,
                screen_width() - hint_width - 10.0,
                screen_height() - 25.0,
                hint_font_size,
                Color::new(0.7, 0.7, 0.7, 0.6),
            );
        }

        // Take screenshot if requested
        if sim.take_screenshot {
            sim.take_screenshot = false;
            let timestamp = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_secs();
            let filename = format!("physarust_screenshot_{}.png", timestamp);

            match capture_screenshot(&filename) {
                Ok(_) => {
                    println!("Screenshot saved: {}", filename);
                }
                Err(e) => {
                    eprintln!("Failed to save screenshot {}: {}", filename, e);
                }
            }
        }

        // External run-length bound; the per-frame core knows nothing of it
        if let Some(minutes) = sim.config.run_minutes {
            let elapsed = started.elapsed().as_secs_f32() / 60.0;
            if elapsed > minutes {
                println!(
                    "Run complete after {:.1} minutes ({} frames)",
                    elapsed, frame_index
                );
                break;
            }
        }

        next_frame().await;
    }
}

#[cfg(feature = "ui")]
fn window_conf() -> Conf {
    // Try to load config to set window size, fall back to defaults if not available
    let config = SimulationConfig::from_default_paths();

    Conf {
        window_title: "Physarum Trail Simulation".to_owned(),
        window_width: config.width as i32,
        window_height: config.height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[cfg(feature = "ui")]
/// Capture a screenshot of the current screen
fn capture_screenshot(filename: &str) -> Result<(), Box<dyn std::error::Error>> {
    let screen_image = get_screen_data();

    let width = screen_image.width as u32;
    let height = screen_image.height as u32;
    let bytes = &screen_image.bytes;

    let mut img = image::RgbaImage::new(width, height);

    // OpenGL's origin is bottom-left, image files are top-left - flip rows
    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) as usize * 4;
            if idx + 3 < bytes.len() {
                let pixel = image::Rgba([
                    bytes[idx],
                    bytes[idx + 1],
                    bytes[idx + 2],
                    bytes[idx + 3],
                ]);
                img.put_pixel(x, height - 1 - y, pixel);
            }
        }
    }

    img.save(filename)?;

    Ok(())
}

/// Headless mode - runs a fixed number of steps, optionally exporting frames
fn headless_main(args: &Args, config: SimulationConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = thread_rng();
    let mut sim = Simulation::with_config(&mut rng, config);

    if let Some(dir) = &args.export_dir {
        std::fs::create_dir_all(dir)?;
    }

    println!(
        "Running {} steps headless: {} agents on a {}x{} field",
        args.steps, sim.config.agent_count, sim.config.width, sim.config.height
    );
    let started = std::time::Instant::now();

    for step in 1..=args.steps {
        sim.step(&mut rng);

        if let Some(dir) = &args.export_dir {
            if args.export_every > 0 && step % args.export_every == 0 {
                export_frame(&sim, dir, step)?;
            }
        }

        if step % 600 == 0 {
            let (_, mean_intensity, max_intensity, _) = sim.stats();
            println!(
                "step {}: trail mean {:.2}, max {:.2}",
                step, mean_intensity, max_intensity
            );
        }

        if let Some(minutes) = sim.config.run_minutes {
            if started.elapsed().as_secs_f32() / 60.0 > minutes {
                println!("Run-length bound reached after {} steps", step);
                break;
            }
        }
    }

    println!("Done in {:.1}s", started.elapsed().as_secs_f32());
    Ok(())
}

/// Write the current trail field as a grayscale PNG.
fn export_frame(
    sim: &Simulation,
    dir: &str,
    step: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let width = sim.config.width as u32;
    let mut img = image::GrayImage::new(width, sim.config.height as u32);

    for (i, &v) in sim.field.cells().iter().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        img.put_pixel(x, y, image::Luma([v.clamp(0.0, field::MAX_TRAIL) as u8]));
    }

    let path = std::path::Path::new(dir).join(format!("frame_{:06}.png", step));
    img.save(&path)?;
    Ok(())
}
