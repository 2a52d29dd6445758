//! Built-in console commands: `echo`, `help` and `clear`.

use std::sync::Arc;

use super::{CommandRef, CommandRegistry, ConCommand, RegisterError, command_doesnt_exist};

/// The built-in commands in registration order.
pub fn builtin_commands() -> Vec<CommandRef> {
    vec![
        // echo - Print the arguments
        Arc::new(
            ConCommand::new("echo", |args, console| {
                console.print(args.join(" "));
            })
            .help("Prints the given text"),
        ),
        // help - List every command or describe one
        Arc::new(
            ConCommand::new("h", |args, console| match args.get(0) {
                Some(name) => match console.command(name) {
                    Some(command) => console.print(command.help().to_string()),
                    None => console.print_error(command_doesnt_exist(name)),
                },
                None => {
                    let lines: Vec<String> = console
                        .registry()
                        .iter()
                        .map(|command| format!("{} --> {}", command.names().join(", "), command.help()))
                        .collect();
                    for line in lines {
                        console.print(line);
                    }
                }
            })
            .alias("help")
            .help("Lists every command, or prints the help of the given one"),
        ),
        // clear - Wipe output and history
        Arc::new(
            ConCommand::new("c", |_args, console| console.clear())
                .alias("cls")
                .alias("clr")
                .alias("clear")
                .help("Clears the console"),
        ),
    ]
}

/// Register the built-in commands.
pub fn register_builtin_commands(registry: &mut CommandRegistry) -> Result<(), RegisterError> {
    for command in builtin_commands() {
        registry.register_shared(command)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{DisplayCall, RecordingDisplay};
    use crate::core::{ConsoleConfig, ConsoleEngine, PrintType};

    fn engine_with_builtins() -> (ConsoleEngine, RecordingDisplay) {
        let display = RecordingDisplay::default();
        let engine = ConsoleEngine::builder(ConsoleConfig::default())
            .display(display.clone())
            .builtins()
            .build()
            .unwrap();
        (engine, display)
    }

    #[test]
    fn test_register_builtin_commands() {
        let mut registry = CommandRegistry::new();
        register_builtin_commands(&mut registry).unwrap();

        for name in ["echo", "help", "h", "clear", "c", "cls", "clr"] {
            assert!(registry.contains(name), "missing built-in '{}'", name);
        }
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_echo_joins_arguments() {
        let (mut engine, display) = engine_with_builtins();

        engine.submit_text("echo hello  world");
        assert_eq!(
            display.calls(),
            vec![DisplayCall::Print("hello  world".to_string(), PrintType::Info)]
        );
    }

    #[test]
    fn test_help_lists_every_command() {
        let (mut engine, display) = engine_with_builtins();
        engine
            .register(ConCommand::new("noclip", |_, _| {}).help("Fly"))
            .unwrap();

        engine.submit_text("help");

        let printed: Vec<String> = display
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                DisplayCall::Print(text, _) => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(printed.len(), 4);
        assert_eq!(printed[0], "echo --> Prints the given text");
        assert!(printed[1].starts_with("h, help --> "));
        assert!(printed[2].starts_with("c, cls, clr, clear --> "));
        assert_eq!(printed[3], "noclip --> Fly");
    }

    #[test]
    fn test_help_for_one_command() {
        let (mut engine, display) = engine_with_builtins();
        engine.register(ConCommand::new("bare", |_, _| {})).unwrap();

        engine.submit_text("h ECHO");
        engine.submit_text("h bare");
        engine.submit_text("h missing");

        assert_eq!(
            display.calls(),
            vec![
                DisplayCall::Print("Prints the given text".to_string(), PrintType::Info),
                DisplayCall::Print("none".to_string(), PrintType::Info),
                DisplayCall::Print("\"missing\" is not a command.".to_string(), PrintType::Error),
            ]
        );
    }

    #[test]
    fn test_clear_aliases() {
        let (mut engine, display) = engine_with_builtins();

        for line in ["echo a", "cls"] {
            engine.submit_text(line);
        }

        assert!(engine.history().is_empty());
        assert_eq!(display.calls().last(), Some(&DisplayCall::Clear));
    }
}
