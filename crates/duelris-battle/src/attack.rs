use duelris_engine::{GarbageBatch, LineClear};

/// Garbage sent to the opponent for one line clear.
///
/// Clearing N rows at once sends N - 1 garbage rows. Each garbage row takes
/// its gap from one of the bottom-most cleared rows: the leftmost column the
/// attacker's block filled there. Singles send nothing.
#[must_use]
pub fn attack_for(clear: &LineClear) -> Option<GarbageBatch> {
    let rows = clear.len().saturating_sub(1);
    if rows == 0 {
        return None;
    }
    let gaps = clear.gap_columns[clear.gap_columns.len() - rows..].to_vec();
    Some(GarbageBatch::new(gaps))
}
