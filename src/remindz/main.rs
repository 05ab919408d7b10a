use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use log::LevelFilter;
use remindz::api::{ConfigAction, RemindzApi};
use remindz::commands::{CmdMessage, MessageLevel, SettingEntry, StatusReport};
use remindz::config::RemindzConfig;
use remindz::error::{RemindzError, Result};
use remindz::model::Reminder;
use remindz::persistence::Phase;
use remindz::store::fs_backend::FsBackend;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::path::PathBuf;

mod args;
use args::{Cli, Commands, Toggle};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: RemindzApi<FsBackend>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Status) => handle_status(&mut ctx),
        Some(Commands::List { file }) => handle_list(&mut ctx, file),
        Some(Commands::Add {
            file,
            row,
            time,
            title,
        }) => handle_add(&mut ctx, file, row, time, title),
        Some(Commands::Forget { file }) => handle_forget(&mut ctx, file),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
        Some(Commands::Scanned) => handle_scanned(&mut ctx),
        Some(Commands::Debug { state }) => handle_debug(&mut ctx, state),
        Some(Commands::Save { force }) => return handle_save(&mut ctx, force),
        None => handle_list(&mut ctx, None),
    }?;

    // Opportunistic save: a no-op unless the command changed something.
    ctx.api.save(false)?;
    Ok(())
}

/// The logger accepts everything; the `log` max level does the filtering so it
/// can be raised once the persisted debug flag is known.
fn init_logging(verbose: bool) {
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Warning: Failed to initialise logging: {}", e);
    }
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let (data_dir, cache_dir) = resolve_dirs(cli)?;
    log::debug!(
        "data dir: {}, cache dir: {}",
        data_dir.display(),
        cache_dir.display()
    );

    let config = RemindzConfig::load(&data_dir)?;
    let backend = FsBackend::new(data_dir, cache_dir);
    let mut api = RemindzApi::new(backend, &config);

    let opened = api.open()?;
    if api.debug() {
        log::set_max_level(LevelFilter::Debug);
    }
    print_messages(&opened.messages);

    Ok(AppContext { api })
}

fn resolve_dirs(cli: &Cli) -> Result<(PathBuf, PathBuf)> {
    if let (Some(data), Some(cache)) = (&cli.data_dir, &cli.cache_dir) {
        return Ok((data.clone(), cache.clone()));
    }
    let proj_dirs = ProjectDirs::from("com", "remindz", "remindz")
        .ok_or_else(|| RemindzError::Api("Could not determine data directories".into()))?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| proj_dirs.data_dir().to_path_buf());
    let cache_dir = cli
        .cache_dir
        .clone()
        .unwrap_or_else(|| proj_dirs.cache_dir().to_path_buf());
    Ok((data_dir, cache_dir))
}

fn handle_status(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.status()?;
    if let Some(status) = &result.status {
        print_status(status);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &mut AppContext, file: Option<String>) -> Result<()> {
    let result = ctx.api.list_reminders(file.as_deref())?;
    print_reminders(&result.reminders);
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(
    ctx: &mut AppContext,
    file: String,
    row: usize,
    time: String,
    title: String,
) -> Result<()> {
    let result = ctx.api.add_reminder(&file, row, &time, &title)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_forget(ctx: &mut AppContext, file: String) -> Result<()> {
    let result = ctx.api.forget_file(&file)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let is_set = matches!(action, ConfigAction::Set(..));
    let result = ctx.api.config(action)?;
    if !is_set {
        print_settings(&result.settings);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_scanned(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.mark_scanned()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_debug(ctx: &mut AppContext, state: Toggle) -> Result<()> {
    let result = ctx.api.set_debug(state == Toggle::On)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_save(ctx: &mut AppContext, force: bool) -> Result<()> {
    let result = ctx.api.save(force)?;
    print_messages(&result.messages);
    Ok(())
}

fn print_reminders(reminders: &[Reminder]) {
    for reminder in reminders {
        println!(
            "{}  {}  {}",
            reminder.time.to_string().yellow(),
            reminder.title.bold(),
            format!("({}:{})", reminder.file, reminder.row_number).dimmed()
        );
    }
}

fn print_settings(settings: &[SettingEntry]) {
    for entry in settings {
        if entry.tags.is_empty() {
            println!("{} = {}", entry.key.bold(), entry.value);
        } else {
            println!(
                "{} = {} {}",
                entry.key.bold(),
                entry.value,
                format!("[{}]", entry.tags.join(", ")).dimmed()
            );
        }
    }
}

fn print_status(status: &StatusReport) {
    let phase = match status.phase {
        Phase::Restoring => "restoring".yellow(),
        Phase::Ready => "ready".green(),
    };
    println!("phase:     {}", phase);
    println!("scanned:   {}", yes_no(status.scanned));
    println!("debug:     {}", yes_no(status.debug));
    println!("unsaved:   {}", yes_no(status.changed));
    println!("files:     {}", status.files);
    println!("reminders: {}", status.reminders);
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}
