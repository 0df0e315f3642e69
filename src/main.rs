//! paula — plays ProTracker MOD files from the terminal.
//!
//! Usage:
//!   paula [file.mod] [--wav output.wav] [--solo 0,3]
//!
//! With no file argument the bundled demo module is played.
//! Exit codes: 0 normal, 1 file error, 2 unsupported format.

use paula_player::{DecodeError, Player, PlayerError};
use std::io::Write;
use std::{env, fs, process};

/// Played when no path is given on the command line.
static DEMO_MODULE: &[u8] = include_bytes!("../demos/intro.mod");

const EXIT_FILE_ERROR: i32 = 1;
const EXIT_UNSUPPORTED: i32 = 2;

fn main() {
    let args: Vec<String> = env::args().collect();

    let wav_path = flag_value(&args, "--wav");
    let solo = flag_value(&args, "--solo").map(|list| parse_solo(&list));
    let path = positional_arg(&args);

    let data = match &path {
        Some(p) => fs::read(p).unwrap_or_else(|e| {
            eprintln!("Failed to read {}: {}", p, e);
            process::exit(EXIT_FILE_ERROR);
        }),
        None => DEMO_MODULE.to_vec(),
    };

    let mut player = Player::load(&data).unwrap_or_else(|e| {
        eprintln!("Failed to load module: {}", e);
        process::exit(match e {
            PlayerError::Decode(DecodeError::UnsupportedFormat) => EXIT_UNSUPPORTED,
            _ => EXIT_FILE_ERROR,
        });
    });

    if let Some(channels) = solo {
        player.set_solo(&channels);
    }

    print_banner(&player, path.as_deref());

    match wav_path {
        Some(wav) => render_to_wav(&player, &wav),
        None => play_audio(&mut player),
    }
}

/// The value following a `--flag`, if present.
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// The first argument that is neither a flag nor a flag's value.
fn positional_arg(args: &[String]) -> Option<String> {
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--wav" | "--solo" => i += 2,
            a if a.starts_with("--") => i += 1,
            a => return Some(a.to_string()),
        }
    }
    None
}

/// Parse "0,3" into channel indices; out-of-range entries are dropped.
fn parse_solo(list: &str) -> Vec<usize> {
    list.split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter(|&ch| ch < 4)
        .collect()
}

fn print_banner(player: &Player, path: Option<&str>) {
    let song = player.song();
    println!("File:        {}", path.unwrap_or("(bundled demo)"));
    println!("Title:       {}", song.title);
    println!("Positions:   {}", song.used_positions);
    println!("Patterns:    {}", song.patterns.len());
    let with_data = song.instruments.iter().filter(|i| i.has_waveform()).count();
    println!("Instruments: {} (with waveforms)", with_data);

    let effects: std::collections::BTreeSet<&str> = song
        .patterns
        .iter()
        .flat_map(|p| p.data.iter())
        .filter(|row| row.effect != paula_player::Effect::None)
        .map(|row| row.effect.name())
        .collect();
    if !effects.is_empty() {
        let names: Vec<&str> = effects.into_iter().collect();
        println!("Effects:     {}", names.join(", "));
    }
    println!();
}

fn play_audio(player: &mut Player) {
    player.play();
    println!("Playing...");

    while player.is_playing() {
        if let Some(pos) = player.position() {
            print!(
                "\rOrd: {:02X} | Pat: {:02X} | Row: {:02X}",
                pos.order, pos.pattern, pos.row
            );
            let _ = std::io::stdout().flush();
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }

    if let Some(e) = player.sink_error() {
        eprintln!("\r{}", e);
        process::exit(EXIT_FILE_ERROR);
    }
    println!("\rDone.                          ");
}

fn render_to_wav(player: &Player, path: &str) {
    let max_seconds = 600;
    println!("Rendering to {}...", path);

    let wav = player.render_to_wav(max_seconds);
    fs::write(path, &wav).unwrap_or_else(|e| {
        eprintln!("Failed to write {}: {}", path, e);
        process::exit(EXIT_FILE_ERROR);
    });

    println!("Wrote {} bytes.", wav.len());
}
