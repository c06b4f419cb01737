//! Project completion percentage.

/// Percentage of completed tasks, rounded half up.
///
/// `completed` and `total` count only non-deleted tasks. A project with
/// no tasks has progress 0.
pub fn compute_progress(completed: i64, total: i64) -> i32 {
    if total <= 0 {
        return 0;
    }
    let completed = completed.clamp(0, total);
    ((200 * completed + total) / (2 * total)) as i32
}
