use crate::ids::VideoId;

/// Command sent to the media player when the active item changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackCommand {
    Pause(VideoId),
    Play(VideoId),
}

/// Commands for an active-item change: pause the old item, then play the new one.
///
/// Equal ids produce nothing.
pub fn playback_commands(
    previous: Option<&VideoId>,
    next: Option<&VideoId>,
) -> Vec<PlaybackCommand> {
    if previous == next {
        return Vec::new();
    }

    let mut commands = Vec::with_capacity(2);
    if let Some(previous) = previous {
        commands.push(PlaybackCommand::Pause(previous.clone()));
    }
    if let Some(next) = next {
        commands.push(PlaybackCommand::Play(next.clone()));
    }
    commands
}
