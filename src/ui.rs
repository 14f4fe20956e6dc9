use crate::lifecycle::UiDescriptor;
use crate::playback::EffectPreset;
use std::path::Path;

/// Commands accepted on the record screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordCommand {
    Record,
    Stop,
    Quit,
}

/// Commands accepted on the play screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayCommand {
    Effect(EffectPreset),
    Stop,
    Back,
    Quit,
}

pub fn parse_record_command(line: &str) -> Option<RecordCommand> {
    match line {
        "record" | "r" => Some(RecordCommand::Record),
        "stop" | "s" => Some(RecordCommand::Stop),
        "quit" | "q" => Some(RecordCommand::Quit),
        _ => None,
    }
}

pub fn parse_play_command(line: &str) -> Option<PlayCommand> {
    match line {
        "stop" | "s" => Some(PlayCommand::Stop),
        "back" | "b" => Some(PlayCommand::Back),
        "quit" | "q" => Some(PlayCommand::Quit),
        other => EffectPreset::from_command(other).map(PlayCommand::Effect),
    }
}

/// Render the record screen from its descriptor. The descriptor is the
/// single source of which actions are offered.
pub fn render_record_screen(descriptor: &UiDescriptor) {
    println!();
    if descriptor.busy {
        println!("{}...", descriptor.prompt);
        return;
    }

    println!("{}", descriptor.prompt);

    let mut actions = Vec::new();
    if descriptor.record_enabled {
        actions.push("record");
    }
    if descriptor.stop_visible && descriptor.stop_enabled {
        actions.push("stop");
    }
    actions.push("quit");
    println!("  [{}]", actions.join(" | "));
}

pub fn render_play_screen(recording: &Path) {
    println!();
    println!("Playing back {:?}", recording);
    let labels: Vec<&str> = EffectPreset::ALL.iter().map(|p| p.label()).collect();
    println!("  effects: [{}]", labels.join(" | "));
    println!("  [stop | back | quit]");
}

pub fn render_error(message: &str) {
    println!();
    println!("Error: {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_screen_commands_parse() {
        assert_eq!(parse_record_command("record"), Some(RecordCommand::Record));
        assert_eq!(parse_record_command("r"), Some(RecordCommand::Record));
        assert_eq!(parse_record_command("stop"), Some(RecordCommand::Stop));
        assert_eq!(parse_record_command("quit"), Some(RecordCommand::Quit));
        assert_eq!(parse_record_command("echo"), None);
    }

    #[test]
    fn play_screen_commands_parse() {
        assert_eq!(
            parse_play_command("chipmunk"),
            Some(PlayCommand::Effect(EffectPreset::Chipmunk))
        );
        assert_eq!(parse_play_command("back"), Some(PlayCommand::Back));
        assert_eq!(parse_play_command("stop"), Some(PlayCommand::Stop));
        assert_eq!(parse_play_command("record"), None);
    }
}
