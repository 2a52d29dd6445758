//! Minimal headless console example.
//!
//! Demonstrates driving bevy_dev_console programmatically without any UI.
//! Useful for testing or custom UI implementations.
//!
//! Run with: `cargo run --example minimal`

use std::collections::VecDeque;

use bevy::prelude::*;
use bevy_dev_console::prelude::*;

fn main() {
    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(ConsolePlugin::new(ConsoleConfig::default().allow_cheat_mode(true)))
        .add_systems(Startup, setup)
        .add_systems(PostUpdate, (watch_events, exit_after_script))
        .run();
}

/// Prints console output with a prefix per print type.
struct PrefixDisplay;

impl DisplaySink for PrefixDisplay {
    fn print(&mut self, text: &str, print_type: PrintType) {
        let prefix = match print_type {
            PrintType::Info => "[INFO]",
            PrintType::Success => "[OK]",
            PrintType::Warning => "[WARN]",
            PrintType::Error => "[ERROR]",
            PrintType::Misc => "[..]",
        };
        println!("{} {}", prefix, text);
    }

    fn clear(&mut self) {
        println!("--- cleared ---");
    }

    fn remove_oldest(&mut self, _index: usize) {}
}

fn setup(mut console: ResMut<ConsoleEngine>) {
    console.set_display(PrefixDisplay);

    // Register a command
    let greet = ConCommand::new("greet", |args, console| {
        let name = args.get(0).unwrap_or("World");
        console.print(format!("Hello, {}!", name));
    })
    .help("Greet someone");

    // Register a cheat-protected command
    let god = ConCommand::new("god", |_args, console| {
        console.print_success("God mode enabled");
    })
    .help("Become invulnerable")
    .flags(CommandFlags::CHEAT);

    // Register a command that runs over several frames
    let countdown = ConCommand::new("countdown", |_args, console| {
        console.print("Counting down...");
    })
    .help("Count down over several frames")
    .task(|args| {
        let mut remaining: u32 = args.parse(0).unwrap_or(3);
        Some(Box::new(move |console: &mut ConsoleEngine| {
            console.print(remaining.to_string());
            remaining = remaining.saturating_sub(1);
            if remaining == 0 { TaskStep::Done } else { TaskStep::Pending }
        }))
    });

    for command in [greet, god, countdown] {
        if let Err(e) = console.register(command) {
            error!("Failed to register command: {}", e);
        }
    }

    // Open on the first frame, submit `help` on the third
    console.set_input_buffer("help");
    console.set_input_source(VecDeque::from([
        ConsoleAction::Open,
        ConsoleAction::None,
        ConsoleAction::Submit,
    ]));

    // Lines can also be submitted directly
    console.submit_text("greet Developer");
    console.submit_text("god");
    console.set_cheat_mode(true);
    console.submit_text("god");
    console.submit_text("countdown 3");
    console.submit_text("nope");
}

/// Log interesting notifications.
fn watch_events(mut events: MessageReader<ConsoleEvent>) {
    for event in events.read() {
        match event {
            ConsoleEvent::Opened => println!("(console opened)"),
            ConsoleEvent::CheatModeChanged(enabled) => println!("(cheat mode: {})", enabled),
            ConsoleEvent::CommandExecuted { name, args } => {
                println!("(executed '{}' with {:?})", name, args)
            }
            _ => {}
        }
    }
}

fn exit_after_script(mut frames: Local<u32>, mut exit: MessageWriter<AppExit>) {
    *frames += 1;
    if *frames >= 10 {
        exit.write(AppExit::Success);
    }
}
