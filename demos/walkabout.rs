//! Walk around a generated world in the terminal.
//!
//! Arrow keys look around, WASD moves, `q` or Esc quits. Pass a path to a JSON config as the
//! first argument to override defaults. The frame is sized to the terminal, two pixels per
//! character cell.

use crossterm::{
    cursor,
    event::{self, KeyboardEnhancementFlags},
    style, terminal, QueueableCommand,
};
use paintrend::{
    color::{CrosstermColorMode, CrosstermConvParams},
    config::Config,
    extra::{session::Session, Ctx},
};
use rand::{rngs::StdRng, SeedableRng};
use std::io::{stdout, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

fn load_config() -> anyhow::Result<Config> {
    match std::env::args().nth(1) {
        Some(path) => Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?),
        None => Ok(Config::default()),
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, redirect it to keep them out of the picture.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = load_config()?;

    const Y_OFF: u16 = 1;
    let (cols, rows) = terminal::size()?;
    config.width = cols as usize;
    config.height = (rows.saturating_sub(Y_OFF) as usize) * 2;

    let seed = config.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    });
    info!(seed, "seeding world");

    let mut session = Session::new(&config, &mut StdRng::seed_from_u64(seed))?;

    let conv = CrosstermConvParams {
        colors: CrosstermColorMode::detect(),
    };

    let mut stdout = stdout();
    stdout.queue(cursor::Hide)?;

    // Without release events held keys turn into a stream of presses.
    let release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if release_events {
        stdout.queue(event::PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }

    // In case we get an outside sigterm/sigint, we want to gracefully shutdown without leaving the
    // terminal in raw mode.
    let stop = Arc::new(AtomicBool::new(false));

    signal_hook::flag::register(signal_hook::consts::SIGTERM, stop.clone())?;
    signal_hook::flag::register(signal_hook::consts::SIGINT, stop.clone())?;

    terminal::enable_raw_mode()?;

    let (tx, rx) = std::sync::mpsc::channel();
    let _ = std::thread::spawn(move || {
        while let Ok(e) = event::read() {
            if tx.send(e).is_err() {
                break;
            }
        }
    });

    let mut ctx = Ctx::new(release_events);
    let time = Instant::now();

    while !stop.load(Ordering::SeqCst) && !ctx.should_stop {
        let start = time.elapsed();

        while let Ok(e) = rx.try_recv() {
            if let event::Event::Resize(w, h) = e {
                session
                    .renderer_mut()
                    .resize(w as usize, (h.saturating_sub(Y_OFF) as usize) * 2);
                stdout.queue(terminal::Clear(terminal::ClearType::All))?;
            }
            ctx.event(e);
        }

        let frame = session.tick(&ctx.keys);
        ctx.new_frame();

        let rendered = time.elapsed();

        // Upper half block: foreground is the top pixel, background the bottom one.
        let rows: Vec<_> = frame.rows().collect();
        for (y, pair) in rows.chunks(2).enumerate() {
            stdout.queue(cursor::MoveTo(0, y as u16 + Y_OFF))?;
            for (x, top) in pair[0].iter().enumerate() {
                let bottom = pair.get(1).map_or(*top, |row| row[x]);
                stdout.queue(style::SetColors(style::Colors {
                    foreground: Some(top.to_crossterm(&conv)),
                    background: Some(bottom.to_crossterm(&conv)),
                }))?;
                stdout.queue(style::Print('▀'))?;
            }
        }

        let drawn = time.elapsed();

        let stats = session.renderer().stats();
        let camera = &session.scene.camera;
        stdout.queue(cursor::MoveTo(0, 0))?;
        stdout.queue(style::ResetColor)?;
        stdout.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
        stdout.queue(style::Print(format!(
            "{} {:.02}FPS ({:.02} + {:.02} ms) objs {}/{} pos ({:.1}, {:.1}, {:.1}) yaw {:.2} pitch {:.2}",
            session.frames(),
            1.0 / (drawn - start).as_secs_f32(),
            (rendered - start).as_secs_f32() * 1000.0,
            (drawn - rendered).as_secs_f32() * 1000.0,
            stats.draw_order.len(),
            session.scene.objects().len(),
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.yaw,
            camera.pitch,
        )))?;

        stdout.flush()?;

        let drawn_delta = time.elapsed() - start;
        let frametime_target = Duration::from_millis(33);

        if drawn_delta < frametime_target {
            std::thread::sleep(frametime_target - drawn_delta);
        }
    }

    terminal::disable_raw_mode()?;

    stdout.queue(style::ResetColor)?;
    if release_events {
        stdout.queue(event::PopKeyboardEnhancementFlags)?;
    }
    stdout.queue(terminal::Clear(terminal::ClearType::All))?;
    stdout.queue(cursor::MoveTo(0, 0))?;
    stdout.queue(cursor::Show)?;
    stdout.flush()?;

    Ok(())
}
