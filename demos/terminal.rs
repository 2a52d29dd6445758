//! Terminal console example.
//!
//! Demonstrates using bevy_dev_console with stdin/stdout for headless applications
//! like dedicated servers.
//!
//! Run with: `cargo run --example terminal --features terminal`
//!
//! Commands:
//! - `help` - List available commands
//! - `status` - Show server status
//! - `say <message>` - Broadcast a message
//! - `dev 1` - Enable dev mode
//! - `kick <player>` - Kick a player (dev mode only)
//! - `quit` - Exit the application

use bevy::prelude::*;
use bevy_dev_console::prelude::*;
use bevy_dev_console::TerminalPlugin;

fn main() {
    println!("=== Terminal Console Example ===");
    println!("Type commands and press Enter. Type 'quit' to exit.");
    println!();

    // Ensure output is flushed before starting the app
    use std::io::Write;
    let _ = std::io::stdout().flush();

    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(ConsolePlugin::default())
        .add_plugins(TerminalPlugin { colored: true })
        .init_resource::<QuitRequested>()
        .add_systems(Startup, setup)
        .add_systems(Update, quit_on_request)
        .run();
}

/// Set by the `quit` command through a shared flag.
#[derive(Resource, Default, Clone)]
struct QuitRequested(std::sync::Arc<std::sync::atomic::AtomicBool>);

fn setup(mut console: ResMut<ConsoleEngine>, quit: Res<QuitRequested>) {
    let flag = quit.0.clone();

    let commands = [
        ConCommand::new("status", |_args, console| {
            let dev = console.is_dev_mode();
            let history = console.history().len();
            console.print("=== Status ===");
            console.print(format!("Dev mode: {}", dev));
            console.print(format!("Lines submitted: {}", history));
        })
        .help("Show server status"),
        ConCommand::new("say", |args, console| {
            if args.is_empty() {
                console.print_warning("Usage: say <message>");
            } else {
                console.print(format!("[SERVER] {}", args.join(" ")));
            }
        })
        .help("Broadcast a message"),
        ConCommand::new("dev", |args, console| match args.parse::<u8>(0) {
            Some(value) => console.set_dev_mode(value != 0),
            None => console.print_warning("Usage: dev <0|1>"),
        })
        .help("Enable or disable dev mode"),
        ConCommand::new("kick", |args, console| match args.get(0) {
            Some(player) => console.print_success(format!("Kicked {}", player)),
            None => console.print_warning("Usage: kick <player>"),
        })
        .help("Kick a player")
        .flags(CommandFlags::DEV_ONLY),
        ConCommand::new("quit", move |_args, console| {
            console.print("Shutting down...");
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
        })
        .alias("exit")
        .help("Exit the application"),
    ];

    for command in commands {
        if let Err(e) = console.register(command) {
            error!("Failed to register command: {}", e);
        }
    }
}

fn quit_on_request(quit: Res<QuitRequested>, mut exit: MessageWriter<AppExit>) {
    if quit.0.load(std::sync::atomic::Ordering::SeqCst) {
        exit.write(AppExit::Success);
    }
}
