use crate::domain::chips::Chips;
use crate::domain::player::Player;
use crate::engine::actions::{ActionOutcome, BetEffect, LegalAction, PlayerActionKind};
use crate::engine::betting::BettingState;
use crate::engine::errors::EngineError;

/// Проверка, может ли игрок выполнить это действие при текущем состоянии ставок.
///
/// Ничего не меняет: возвращает, к чему приведёт действие (сколько фишек
/// уйдёт в банк, до какой суммы вырастет ставка). Суммы больше стека
/// не ошибка – они обрезаются до all-in.
pub fn validate_action(
    player: &Player,
    action: &PlayerActionKind,
    betting: &BettingState,
) -> Result<ActionOutcome, EngineError> {
    if !player.can_act() {
        return Err(EngineError::PlayerCannotAct(player.seat));
    }

    let to_call = diff_to_call(player, betting);

    match *action {
        PlayerActionKind::Fold => Ok(ActionOutcome::Folded),

        PlayerActionKind::Check => {
            if to_call.is_zero() {
                Ok(ActionOutcome::Checked)
            } else {
                Err(EngineError::CannotCheck { to_call })
            }
        }

        PlayerActionKind::Call => {
            if to_call.is_zero() {
                // Call без ставки – это check.
                Ok(ActionOutcome::Checked)
            } else if player.stack <= to_call {
                // Короткий стек коллирует на всё, что есть. Никогда не fold.
                resolve_all_in(player, betting)
            } else {
                Ok(ActionOutcome::Called { added: to_call })
            }
        }

        PlayerActionKind::Raise(to) => {
            let max_to = player.bet_this_round + player.stack;
            if to >= max_to {
                return resolve_all_in(player, betting);
            }
            if to <= betting.current_bet {
                return Err(EngineError::InvalidRaise {
                    to,
                    current_bet: betting.current_bet,
                });
            }
            if !betting.can_raise(player.seat) {
                return Err(EngineError::ReraiseNotAllowed);
            }

            let raise_size = to - betting.current_bet;
            if raise_size < betting.min_raise {
                return Err(EngineError::RaiseTooSmall {
                    min_to: min_raise_to(betting),
                });
            }

            Ok(ActionOutcome::Raised {
                added: to - player.bet_this_round,
                to,
            })
        }

        PlayerActionKind::AllIn => resolve_all_in(player, betting),
    }
}

/// Что даёт all-in на весь стек: call на меньшую сумму, полный или неполный рейз.
/// Игрок с пустым стеком сюда не попадает: он уже в AllIn и `can_act` его отсекает.
fn resolve_all_in(player: &Player, betting: &BettingState) -> Result<ActionOutcome, EngineError> {
    let to = player.bet_this_round + player.stack;
    let effect = if to <= betting.current_bet {
        BetEffect::None
    } else {
        if !betting.can_raise(player.seat) {
            return Err(EngineError::ReraiseNotAllowed);
        }
        if to - betting.current_bet >= betting.min_raise {
            BetEffect::FullRaise
        } else {
            BetEffect::ShortRaise
        }
    };

    Ok(ActionOutcome::AllIn {
        added: player.stack,
        to,
        effect,
    })
}

/// Список допустимых действий. Каждое из них проходит `validate_action`.
pub fn legal_actions(player: &Player, betting: &BettingState) -> Vec<LegalAction> {
    if !player.can_act() || player.stack.is_zero() {
        return Vec::new();
    }

    let to_call = diff_to_call(player, betting);
    let max_to = player.bet_this_round + player.stack;
    let may_raise = betting.can_raise(player.seat);

    let mut actions = vec![LegalAction::Fold];

    if to_call.is_zero() {
        actions.push(LegalAction::Check);
    } else {
        actions.push(LegalAction::Call(to_call.min(player.stack)));
    }

    if player.stack > to_call && may_raise {
        let min_to = min_raise_to(betting);
        if max_to >= min_to {
            actions.push(LegalAction::Raise {
                min: min_to,
                max: max_to,
            });
        }
    }

    if may_raise || player.stack <= to_call {
        actions.push(LegalAction::AllIn(max_to));
    }

    actions
}

/// Минимальная итоговая ставка для рейза.
pub fn min_raise_to(betting: &BettingState) -> Chips {
    betting.current_bet + betting.min_raise
}

/// Сколько фишек нужно добавить игроку, чтобы уравнять текущую ставку.
pub fn diff_to_call(player: &Player, betting: &BettingState) -> Chips {
    betting.current_bet.saturating_sub(player.bet_this_round)
}
