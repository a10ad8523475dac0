use chip8_vm::{
    thread_rng_provider, Audio, Emulator, IndexOverflow, Keypad, Quirks, SpriteEdges,
    FRAME_BUFFER_PIXEL_HEIGHT, FRAME_BUFFER_PIXEL_WIDTH,
};
use clap::{crate_authors, crate_version, value_t, App, Arg};
use log::{debug, error, info};
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Instant;

const MICROS_BETWEEN_TIMER_TICKS: u128 = 1_000_000 / 60;
const MICROS_BETWEEN_DISPLAY_REFRESH: u128 = 1_000_000 / 60;

const PIXEL_OFF: u32 = 0x00_2C_50_66;
const PIXEL_ON: u32 = 0x00_68_BB_ED;

/// Physical keys for the hex keypad, laid out as
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// Q W E R  ->  4 5 6 D
/// A S D F      7 8 9 E
/// Z X C V      A 0 B F
/// ```
const KEY_MAP: [(Key, u8); 16] = [
    (Key::Key1, 0x1),
    (Key::Key2, 0x2),
    (Key::Key3, 0x3),
    (Key::Key4, 0xC),
    (Key::Q, 0x4),
    (Key::W, 0x5),
    (Key::E, 0x6),
    (Key::R, 0xD),
    (Key::A, 0x7),
    (Key::S, 0x8),
    (Key::D, 0x9),
    (Key::F, 0xE),
    (Key::Z, 0xA),
    (Key::X, 0x0),
    (Key::C, 0xB),
    (Key::V, 0xF),
];

/// Rings the terminal bell.
struct TerminalBell;

impl Audio for TerminalBell {
    fn beep(&mut self) {
        debug!("Beep");
        print!("\x07");
        let _ = std::io::stdout().flush();
    }
}

fn update_keypad(window: &Window, keypad: &mut Keypad) -> chip8_vm::Result<()> {
    for &(physical, key) in KEY_MAP.iter() {
        keypad.set_key(key, window.is_key_down(physical))?;
    }

    Ok(())
}

fn load_rom(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;

    Ok(buffer)
}

fn parse_scale(scale: u32) -> Scale {
    match scale {
        1 => Scale::X1,
        2 => Scale::X2,
        4 => Scale::X4,
        8 => Scale::X8,
        32 => Scale::X32,
        _ => Scale::X16,
    }
}

fn create_window(scale: Scale) -> Result<Window, Box<dyn std::error::Error>> {
    let mut opts = WindowOptions::default();

    opts.scale = scale;
    let window = Window::new(
        "CHIP-8",
        FRAME_BUFFER_PIXEL_WIDTH,
        FRAME_BUFFER_PIXEL_HEIGHT,
        opts,
    )?;

    Ok(window)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let matches = App::new("CHIP-8")
        .version(crate_version!())
        .author(crate_authors!())
        .about("A CHIP-8 emulator")
        .arg(
            Arg::with_name("ROM")
                .help("The CHIP-8 ROM to run")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("cycles-per-second")
                .long("cycles-per-second")
                .help("How many instructions to execute per second")
                .takes_value(true)
                .default_value("700"),
        )
        .arg(
            Arg::with_name("scale")
                .long("scale")
                .help("Window scale factor")
                .takes_value(true)
                .possible_values(&["1", "2", "4", "8", "16", "32"])
                .default_value("16"),
        )
        .arg(
            Arg::with_name("index-overflow")
                .long("index-overflow")
                .help("When FX1E sets VF")
                .takes_value(true)
                .possible_values(&["byte", "address", "unflagged"])
                .default_value("byte"),
        )
        .arg(
            Arg::with_name("sprite-edges")
                .long("sprite-edges")
                .help("What happens to sprites drawn past the screen edge")
                .takes_value(true)
                .possible_values(&["wrap", "clip"])
                .default_value("wrap"),
        )
        .get_matches();

    let cycles_per_second =
        value_t!(matches, "cycles-per-second", u128).unwrap_or_else(|e| e.exit());
    let scale = value_t!(matches, "scale", u32).unwrap_or_else(|e| e.exit());
    let index_overflow =
        value_t!(matches, "index-overflow", IndexOverflow).unwrap_or_else(|e| e.exit());
    let sprite_edges = value_t!(matches, "sprite-edges", SpriteEdges).unwrap_or_else(|e| e.exit());
    let quirks = Quirks::default()
        .index_overflow(index_overflow)
        .sprite_edges(sprite_edges);
    let micros_between_cycles = 1_000_000 / cycles_per_second.max(1);

    // clap enforces the presence of ROM
    let rom_path = matches.value_of("ROM").unwrap_or_default();
    let rom = load_rom(Path::new(rom_path))?;
    info!("Loaded {} ({} bytes)", rom_path, rom.len());

    let mut window = create_window(parse_scale(scale))?;
    let mut audio = TerminalBell;
    let mut emulator = Emulator::with_quirks(quirks, thread_rng_provider());
    emulator.load(rom)?;

    let mut last_instant = Instant::now();
    let mut last_timer_tick = Instant::now();
    let mut last_redraw = Instant::now();
    let mut buffer = vec![PIXEL_OFF; FRAME_BUFFER_PIXEL_WIDTH * FRAME_BUFFER_PIXEL_HEIGHT];

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if window.is_key_pressed(Key::F1, KeyRepeat::No) && !emulator.is_initial_state() {
            info!("Resetting");
            emulator.reset()?;
            last_instant = Instant::now();
            last_timer_tick = Instant::now();
            last_redraw = Instant::now();
            continue;
        }

        if last_instant.elapsed().as_micros() >= micros_between_cycles {
            update_keypad(&window, emulator.keypad_mut())?;

            if let Err(e) = emulator.step() {
                error!("Halted: {}", e);
                return Err(e.into());
            }
            last_instant = Instant::now();
        }

        if last_timer_tick.elapsed().as_micros() >= MICROS_BETWEEN_TIMER_TICKS {
            emulator.tick_timers(&mut audio);
            last_timer_tick = Instant::now();
        }

        if last_redraw.elapsed().as_micros() >= MICROS_BETWEEN_DISPLAY_REFRESH {
            if emulator.display().is_dirty() {
                for (target, &pixel) in buffer.iter_mut().zip(emulator.display().pixels()) {
                    *target = if pixel == 1 { PIXEL_ON } else { PIXEL_OFF };
                }
                emulator.display_mut().clear_dirty();
            }

            window.update_with_buffer(&buffer)?;
            last_redraw = Instant::now();
        }
    }

    Ok(())
}
