//! Offline narrator used when no collaborator is configured or it fails.

use async_trait::async_trait;

use game_core::{GameEvent, NarrationContext};

use super::{Consultation, LoreRequest, NarrationError, NarrationProvider, NarrationResponse};

/// Generic lines derived from the event list. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackNarrator;

impl FallbackNarrator {
    /// One line summarizing the most telling event of the command.
    pub fn line(context: &NarrationContext) -> String {
        let enemy = context
            .enemy
            .as_ref()
            .map(|e| e.name.as_str())
            .unwrap_or("the foe");

        let headline = context.events.iter().rev().find_map(|event| match event {
            GameEvent::Defeat => Some(format!("{} falls.", context.player.name)),
            GameEvent::Victory { .. } => Some(format!("{enemy} is defeated.")),
            GameEvent::LevelUp { level, .. } => {
                Some(format!("{} reaches level {level}.", context.player.name))
            }
            GameEvent::Fled => Some(format!("{} escapes.", context.player.name)),
            GameEvent::CombatStarted { name, .. } => Some(format!("{name} blocks the way.")),
            GameEvent::RoomEntered { room, floor } => {
                Some(format!("A {room} room on floor {floor}."))
            }
            GameEvent::TrapResolved { action, outcome } => {
                Some(format!("The attempt to {action} the trap ends in {outcome}."))
            }
            GameEvent::ShrineResolved { .. } => Some("The shrine falls silent.".to_owned()),
            GameEvent::Purchased { item, .. } => Some(format!("{item} changes hands.")),
            _ => None,
        });

        headline.unwrap_or_else(|| {
            format!(
                "{} ({}/{}) presses on.",
                context.player.name, context.player.health, context.player.max_health
            )
        })
    }
}

#[async_trait]
impl NarrationProvider for FallbackNarrator {
    async fn narrate(
        &self,
        context: &NarrationContext,
    ) -> Result<NarrationResponse, NarrationError> {
        Ok(NarrationResponse::text(Self::line(context)))
    }

    async fn consult(
        &self,
        _context: &NarrationContext,
    ) -> Result<NarrationResponse, NarrationError> {
        Ok(NarrationResponse::text(Consultation::fallback().narration))
    }

    async fn lore(&self, request: &LoreRequest) -> Result<String, NarrationError> {
        Ok(format!("Little is known of {} beyond whispers.", request.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{CharacterClass, GameState, Player};

    #[test]
    fn defeat_wins_over_earlier_events() {
        let state = GameState::new(1, Player::new("Ida", CharacterClass::Mage));
        let context = NarrationContext::capture(
            &state,
            "attack",
            &[GameEvent::Fled, GameEvent::Defeat],
        );
        assert_eq!(FallbackNarrator::line(&context), "Ida falls.");
    }

    #[test]
    fn quiet_commands_get_a_status_line() {
        let state = GameState::new(1, Player::new("Ida", CharacterClass::Mage));
        let context = NarrationContext::capture(&state, "stance", &[]);
        assert_eq!(FallbackNarrator::line(&context), "Ida (80/80) presses on.");
    }
}
