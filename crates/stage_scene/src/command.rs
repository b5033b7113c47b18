//! The `scene` operator command.

use stage_host::{Host, PlayerId};
use tracing::info;

use crate::scene::Scene;

/// Name the command is registered under.
pub const COMMAND_NAME: &str = "scene";

/// Reply for anything other than a known subcommand.
pub const USAGE: &str = "Usage: /scene reset";

/// Run `scene <params...>` on behalf of `caller`.
///
/// `reset` destroys every staged tank so the scene restarts from its
/// placements. Anything else gets the usage text. Always reports the command
/// as handled.
pub fn on_command<H: Host>(
    scene: &Scene,
    host: &mut H,
    caller: PlayerId,
    params: &[String],
) -> bool {
    let subcommand = params
        .first()
        .map(|p| p.to_ascii_lowercase())
        .unwrap_or_default();

    match subcommand.as_str() {
        "reset" => {
            let mut count = 0;
            for player in scene.bound_players() {
                host.kill(player);
                count += 1;
            }
            info!(caller = %caller, tanks = count, "scene reset");
        }
        _ => host.send_message(caller, USAGE),
    }
    true
}

#[cfg(test)]
mod tests {
    use stage_host::{HostCommand, RecordingHost};

    use super::*;
    use crate::scene::{SceneParams, StagedPlayer};

    fn scene() -> Scene {
        let mut scene = Scene::new(SceneParams::default());
        scene.players = vec![
            StagedPlayer::new("a"),
            StagedPlayer::new("b"),
            StagedPlayer::new("c"),
        ];
        scene.bind(PlayerId(4));
        scene.bind(PlayerId(6));
        scene
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_reset_kills_every_bound_tank() {
        let scene = scene();
        let mut host = RecordingHost::new();
        assert!(on_command(&scene, &mut host, PlayerId(9), &args(&["RESET"])));
        assert_eq!(
            host.log(),
            [
                HostCommand::Kill { player: PlayerId(4) },
                HostCommand::Kill { player: PlayerId(6) }
            ]
        );
    }

    #[test]
    fn test_bad_subcommand_replies_with_usage() {
        let scene = scene();
        let before = scene.clone();
        let mut host = RecordingHost::new();
        assert!(on_command(&scene, &mut host, PlayerId(9), &args(&["badarg"])));
        assert_eq!(
            host.log(),
            [HostCommand::Message {
                to: PlayerId(9),
                text: USAGE.to_string()
            }]
        );
        assert_eq!(scene, before);
    }

    #[test]
    fn test_missing_subcommand_replies_with_usage() {
        let scene = scene();
        let mut host = RecordingHost::new();
        on_command(&scene, &mut host, PlayerId(1), &[]);
        assert!(matches!(host.log(), [HostCommand::Message { .. }]));
    }
}
