//! Punch state machine.
//!
//! Rows are the current status (`None` first, then `PunchType::ALL` order),
//! columns the requested action in `PunchType::ALL` order.

use crate::models::event_type::PunchType;

//                               Entry  Exit   PStart PEnd
const TRANSITIONS: [[bool; 4]; 5] = [
    /* None       */ [true, false, false, false],
    /* Entry      */ [false, true, true, false],
    /* Exit       */ [true, false, false, false],
    /* PauseStart */ [false, false, false, true],
    /* PauseEnd   */ [false, true, true, false],
];

fn row(current: Option<PunchType>) -> usize {
    match current {
        None => 0,
        Some(kind) => kind.index() + 1,
    }
}

/// Is `action` legal when the subject's latest punch is `current`?
pub fn decide(current: Option<PunchType>, action: PunchType) -> bool {
    TRANSITIONS[row(current)][action.index()]
}

/// Actions legal from `current`, in `PunchType::ALL` order.
pub fn allowed_actions(current: Option<PunchType>) -> Vec<PunchType> {
    PunchType::ALL
        .into_iter()
        .filter(|a| decide(current, *a))
        .collect()
}
