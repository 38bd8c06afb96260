use cast_playlist::{
    config_dir,
    Config,
    Context,
    listing::*,
    navigator::*,
    player::*,
    playlist::{self, Playlist},
    remote::*,
    sequencer::*,
};
use anyhow::{Context as _, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use colored::Colorize;
use log::{error, info, warn};
use std::process::ExitCode;

/// Cast a playlist of local media files to a Chromecast.
#[derive(Parser)]
#[command(name = "cast")]
struct Cli {
    /// Files (or URLs) to play, save or append
    files: Vec<String>,

    #[arg(short = 'A', long, help = "Append items to existing playlist")]
    append_playlist: bool,

    #[arg(short = 'c', long = "continue", help = "Continue playback")]
    resume: bool,

    #[arg(short = 'F', long, help = "Print current playlist (full paths)")]
    print_full_playlist: bool,

    #[arg(short = 'l', long = "loop", help = "Loop or repeat playback of the whole playlist")]
    repeat: bool,

    #[arg(short, long, help = "Next item in playlist")]
    next: bool,

    #[arg(short, long, help = "Mute volume")]
    mute: bool,

    #[arg(short, long, value_name = "NAME", help = "Name for saved playlist (use with -S)")]
    output: Option<String>,

    #[arg(short = 'O', long, value_name = "PLAYLIST", help = "Open saved playlist file")]
    open_playlist: Option<Utf8PathBuf>,

    #[arg(short, long, help = "Previous item in playlist")]
    previous: bool,

    #[arg(long, help = "Pause playback")]
    pause: bool,

    #[arg(short = 'P', long, help = "Print current playlist (titles only)")]
    print_playlist: bool,

    #[arg(short, long, help = "Play items in playlist in random order")]
    random: bool,

    #[arg(short, long, help = "Stop playback")]
    stop: bool,

    #[arg(short = 'S', long, help = "Save playlist to file")]
    save_playlist: bool,

    #[arg(long, help = "Play all items without playlist functionality")]
    simple_playlist: bool,

    #[arg(long, help = "Print chromecast status")]
    status: bool,

    #[arg(short, long, help = "Toggle Play/Pause")]
    toggle: bool,

    #[arg(short, long, value_name = "SETTING", help = "Adjust volume (up, down, mute, 0-1, level)")]
    volume: Option<VolumeSetting>,

    #[arg(long, help = "Lower volume by 10%")]
    vol_down: bool,

    #[arg(long, help = "Mute volume")]
    vol_mute: bool,

    #[arg(long, value_name = "LEVEL", value_parser = parse_level, help = "Set volume to specified level (between 0 and 1)")]
    vol_set: Option<f64>,

    #[arg(long, help = "Raise volume by 10%")]
    vol_up: bool,

    #[arg(long, action = clap::ArgAction::Count, help = "Log more (repeatable)")]
    verbose: u8,

    #[arg(long, help = "Log nothing but the playback report")]
    quiet: bool,
}

/// Directory of the running executable, the secondary config location.
fn executable_dir() -> Option<Utf8PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let dir = exe.parent()?.to_str()?;
    Some(Utf8PathBuf::from(dir))
}

fn print_listing(pl: &Playlist, title: &str, format: ListingFormat, ctx: &Context) -> Result<()> {
    println!("  {}", format!("=={title}==").bold());
    let listing = Listing::build(pl.tracks(), format, &ctx.probe)?;
    for line in &listing.lines {
        println!("{line}");
    }
    println!("{}", listing.total_line());
    Ok(())
}

fn save_or_append(cli: &Cli, ctx: &Context) -> Result<()> {
    let items = if cli.random { playlist::shuffle(&cli.files) } else { cli.files.clone() };

    if cli.save_playlist {
        if cli.output.is_none() {
            println!("  No name specified for playlist, saving to default directory...");
        }
        let dest = ctx.saved_playlist_path(cli.output.as_deref());
        let saved = playlist::save(&items, &dest)
            .with_context(|| format!("Failed to save playlist to '{dest}'"))?;
        println!("  Playlist saved to {}. {} items written to playlist.", dest, saved.len());
    } else {
        let dest = match &cli.output {
            Some(name) => Utf8PathBuf::from(name),
            None => {
                println!("  No playlist name specified, appending to current playlist...");
                ctx.working_playlist.clone()
            },
        };
        let appended = playlist::append(&items, &dest)
            .with_context(|| format!("Failed to append to '{dest}'"))?;
        println!("  {} items appended to {}", appended.len(), dest);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config_dir = config_dir()?;
    let config = Config::locate(&config_dir, executable_dir().as_deref())?;
    let ctx = Context::new(&config, &config_dir);
    info!("Using working playlist '{}'", ctx.working_playlist);

    let clock = SystemClock;
    let player = Player::new(&ctx.backend, &ctx.probe, &clock, ctx.safety_margin);
    let remote = Remote::new(&ctx.backend);

    // Transport
    if cli.pause {
        remote.pause()?;
        return Ok(());
    }
    if cli.stop {
        remote.stop()?;
        return Ok(());
    }
    if cli.resume {
        remote.resume()?;
        return Ok(());
    }
    if cli.toggle {
        remote.toggle()?;
        return Ok(());
    }

    // Volume
    let volume = if cli.vol_up {
        Some(VolumeSetting::Up)
    } else if cli.vol_down {
        Some(VolumeSetting::Down)
    } else if cli.vol_mute || cli.mute {
        Some(VolumeSetting::Mute)
    } else if let Some(level) = cli.vol_set {
        Some(VolumeSetting::Set(level))
    } else {
        cli.volume
    };
    if let Some(setting) = volume {
        remote.volume(setting)?;
        return Ok(());
    }

    // Navigation
    if cli.next || cli.previous {
        let direction = if cli.next { Direction::Next } else { Direction::Previous };
        Navigator::new(&player, &ctx.working_playlist).jump(direction)?;
        return Ok(());
    }

    // Playlist files
    if cli.save_playlist || cli.append_playlist {
        return save_or_append(&cli, &ctx);
    }

    let mut files = cli.files.clone();
    let mut print_target: (&Utf8Path, &str) = (&ctx.working_playlist, "Current Playlist");
    if let Some(path) = &cli.open_playlist {
        files = playlist::read_all(path)?.into_iter().map(|x| x.to_string()).collect();
        print_target = (path, path.file_name().unwrap_or(path.as_str()));
    }

    if cli.print_playlist || cli.print_full_playlist {
        let format = if cli.print_playlist { ListingFormat::Titles } else { ListingFormat::FullPaths };
        let (path, title) = print_target;
        return print_listing(&Playlist::open(path)?, title, format, &ctx);
    }

    if cli.status {
        print!("{}", remote.status_text()?);
        return Ok(());
    }

    // Playback
    if files.is_empty() {
        warn!("Nothing to play; pass files, or --open-playlist");
        return Ok(());
    }
    let tracks = playlist::expand_all(&files)?;
    if cli.simple_playlist {
        play_simple(&player, &tracks, cli.random)?;
    } else {
        let mode = PlayMode { repeat: cli.repeat, random: cli.random };
        Sequencer::new(&player, &ctx.working_playlist).run(&tracks, mode)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = stderrlog::new()
        .module(module_path!())
        .module("cast_playlist")
        .quiet(cli.quiet)
        .verbosity(2 + cli.verbose as usize)
        .init()
    {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
