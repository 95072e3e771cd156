use crate::models::Filter;

/// Application commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,

    // ===== Navigation =====
    /// Select the next task
    TaskDown,
    /// Select the previous task
    TaskUp,
    /// Jump to the first task (`gg`)
    FirstTask,
    /// Jump to the last task
    LastTask,
    NextFilter,
    PrevFilter,
    SetFilter(Filter),

    // ===== Task actions =====
    NewTask,
    EditTask,
    /// Mark the selected task done / not done
    ToggleTask,
    /// Delete the selected task (asks first)
    DeleteTask,
    /// Remove every completed task (asks first)
    ClearCompleted,
    /// Copy the selected task to the clipboard
    CopyTask,

    // ===== Overlays =====
    ShowAwards,
    ShowHelp,
    Cancel,
}
