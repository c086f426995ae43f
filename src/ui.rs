//! Presence overlay text rendering.
//!
//! The UI collaborator receives a ready-to-display text block once per frame:
//! one line per present label with a bar scaled to this frame's detection
//! count. Labels still inside the display timeout but not re-detected this
//! frame render as "held" with no bar, so the operator can tell a live
//! detection from hysteresis.

use crate::track::PresenceSummary;

/// Bars are capped so a box of knives does not wrap the panel.
const MAX_BAR_LEN: usize = 20;

/// Render the per-frame presence panel.
pub fn render_presence(summary: &PresenceSummary) -> String {
    if summary.is_empty() {
        return "Detected Objects:\n- None\n".to_string();
    }
    let mut out = String::from("Detected Objects:\n");
    for entry in &summary.entries {
        if entry.count > 0 {
            let bar = "█".repeat(entry.count.min(MAX_BAR_LEN));
            out.push_str(&format!("{:<10}: {} ({})\n", entry.label, bar, entry.count));
        } else {
            out.push_str(&format!("{:<10}: (held)\n", entry.label));
        }
    }
    out
}
