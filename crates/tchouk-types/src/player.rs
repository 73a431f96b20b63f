use serde::{Deserialize, Serialize};

/// One scorer line on a spreadsheet. Players exist only inside their owning
/// spreadsheet and are looked up by exact name; names are unique within one
/// sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub attacking: Attacking,
    #[serde(default)]
    pub defending: Defending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Attacking {
    pub point: u32,
    pub caught: u32,
    pub short: u32,
    pub frame: u32,
    pub footing: u32,
    pub landed: u32,
    #[serde(rename = "badPass")]
    pub bad_pass: u32,
    #[serde(rename = "dropPass")]
    pub drop_pass: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Defending {
    #[serde(rename = "first")]
    pub first_line: u32,
    #[serde(rename = "second")]
    pub second_line: u32,
    pub drop: u32,
    pub gap: u32,
    pub dig: u32,
}

/// A single scorer correction: a named action and a signed delta. Never
/// persisted — applied to a player's counters and discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerAction {
    #[serde(rename = "type")]
    pub action: String,
    pub value: i32,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown action type '{0}'")]
pub struct UnknownAction(pub String);

type Counter = fn(&mut Player) -> &mut u32;

/// Action-type routing table. This is the one place the action vocabulary
/// lives: extending it means adding a row here and a counter field above.
const ACTIONS: &[(&str, Counter)] = &[
    ("point", |p| &mut p.attacking.point),
    ("caught", |p| &mut p.attacking.caught),
    ("short", |p| &mut p.attacking.short),
    ("frame", |p| &mut p.attacking.frame),
    ("footing", |p| &mut p.attacking.footing),
    ("landed", |p| &mut p.attacking.landed),
    ("bad pass", |p| &mut p.attacking.bad_pass),
    ("drop pass", |p| &mut p.attacking.drop_pass),
    ("1st", |p| &mut p.defending.first_line),
    ("2nd", |p| &mut p.defending.second_line),
    ("drop", |p| &mut p.defending.drop),
    ("gap", |p| &mut p.defending.gap),
    ("dig", |p| &mut p.defending.dig),
];

impl Player {
    pub fn named(name: impl Into<String>) -> Self {
        Player {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Apply one action: the routed counter becomes `max(0, current + value)`.
    /// Deltas are manual scorer corrections, so the clamp holds at every
    /// step — a counter can never go negative, even transiently.
    pub fn apply(&mut self, action: &PlayerAction) -> Result<(), UnknownAction> {
        let (_, route) = ACTIONS
            .iter()
            .find(|(kind, _)| *kind == action.action)
            .ok_or_else(|| UnknownAction(action.action.clone()))?;
        let counter = route(self);
        *counter = counter.saturating_add_signed(action.value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn act(action: &str, value: i32) -> PlayerAction {
        PlayerAction {
            action: action.to_string(),
            value,
        }
    }

    #[test]
    fn routes_to_the_named_counter() {
        let mut player = Player::named("Ann");
        player.apply(&act("point", 1)).unwrap();
        player.apply(&act("dig", 2)).unwrap();
        player.apply(&act("bad pass", 3)).unwrap();
        assert_eq!(player.attacking.point, 1);
        assert_eq!(player.defending.dig, 2);
        assert_eq!(player.attacking.bad_pass, 3);
        assert_eq!(player.attacking.caught, 0);
    }

    #[test]
    fn clamps_at_zero_on_every_step() {
        let mut player = Player::named("Ann");
        player.apply(&act("point", -5)).unwrap();
        player.apply(&act("point", 3)).unwrap();
        // -5 clamps to 0 first, so the result is 3, not max(0, -2).
        assert_eq!(player.attacking.point, 3);
    }

    #[test]
    fn undo_below_zero_stops_at_zero() {
        let mut player = Player::named("Ann");
        player.apply(&act("point", 2)).unwrap();
        player.apply(&act("point", -5)).unwrap();
        assert_eq!(player.attacking.point, 0);
    }

    #[test]
    fn unknown_action_is_an_error_and_a_no_op() {
        let mut player = Player::named("Ann");
        player.apply(&act("point", 4)).unwrap();
        let err = player.apply(&act("smash", 1)).unwrap_err();
        assert_eq!(err.0, "smash");
        assert_eq!(player.attacking.point, 4);
    }

    #[test]
    fn every_vocabulary_entry_routes_somewhere() {
        let mut player = Player::named("Ann");
        for (kind, _) in ACTIONS {
            player.apply(&act(kind, 1)).unwrap();
        }
        let total = player.attacking.point
            + player.attacking.caught
            + player.attacking.short
            + player.attacking.frame
            + player.attacking.footing
            + player.attacking.landed
            + player.attacking.bad_pass
            + player.attacking.drop_pass
            + player.defending.first_line
            + player.defending.second_line
            + player.defending.drop
            + player.defending.gap
            + player.defending.dig;
        assert_eq!(total as usize, ACTIONS.len());
    }

    #[test]
    fn counter_json_uses_the_scoreboard_field_names() {
        let mut player = Player::named("Ann");
        player.apply(&act("bad pass", 1)).unwrap();
        player.apply(&act("1st", 1)).unwrap();
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["attacking"]["badPass"], 1);
        assert_eq!(json["defending"]["first"], 1);
    }
}
