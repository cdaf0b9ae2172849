use crate::domain::player::{Player, PlayerStatus};
use crate::domain::{SeatIndex, Table};

/// Все места по кругу, начиная со `start` (включая/исключая его), удовлетворяющие `pred`.
pub fn seats_from<F>(table: &Table, start: SeatIndex, include_start: bool, pred: F) -> Vec<SeatIndex>
where
    F: Fn(&Player) -> bool,
{
    let max = table.num_seats();
    if max == 0 {
        return Vec::new();
    }

    let first = if include_start { 0 } else { 1 };
    (first..first + max)
        .map(|offset| ((start as usize + offset) % max) as SeatIndex)
        .filter(|&seat| {
            // Место `start` при include_start = false не должно попасть в круг повторно.
            (include_start || seat != start)
                && table.player(seat).map(&pred).unwrap_or(false)
        })
        .collect()
}

/// Найти следующее место по кругу, удовлетворяющее `pred`.
pub fn next_seat<F>(table: &Table, start: SeatIndex, include_start: bool, pred: F) -> Option<SeatIndex>
where
    F: Fn(&Player) -> bool,
{
    seats_from(table, start, include_start, pred).first().copied()
}

/// Полный круг слева от `seat`; сам `seat` (если подходит) замыкает круг.
pub fn circle_left_of<F>(table: &Table, seat: SeatIndex, pred: F) -> Vec<SeatIndex>
where
    F: Fn(&Player) -> bool,
{
    let mut seats = seats_from(table, seat, false, &pred);
    if table.player(seat).map(&pred).unwrap_or(false) {
        seats.push(seat);
    }
    seats
}

/// Игрок сдан в текущую раздачу.
pub fn is_dealt_in(p: &Player) -> bool {
    p.status != PlayerStatus::SittingOut
}

/// Сданные в раздачу места: слева от кнопки, кнопка последней.
pub fn dealt_in_order(table: &Table, button: SeatIndex) -> Vec<SeatIndex> {
    circle_left_of(table, button, is_dealt_in)
}

/// Активные места после `seat` (сам `seat` не входит). Очередь после рейза.
pub fn active_after(table: &Table, seat: SeatIndex) -> Vec<SeatIndex> {
    seats_from(table, seat, false, Player::can_act)
}

/// Очередь постфлоп-улицы: активные слева от кнопки, кнопка последней.
pub fn active_left_of(table: &Table, button: SeatIndex) -> Vec<SeatIndex> {
    circle_left_of(table, button, Player::can_act)
}

/// Предложить следующую позицию дилера:
/// - если есть текущая кнопка – следующее сданное место;
/// - если нет – первое сданное с нуля.
pub fn next_dealer(table: &Table) -> Option<SeatIndex> {
    match table.dealer_button {
        Some(button) => next_seat(table, button, false, is_dealt_in),
        None => next_seat(table, 0, true, is_dealt_in),
    }
}
