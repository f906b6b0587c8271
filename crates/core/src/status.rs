//! Status rendering — a pure function of display state and animation frame.

use crate::display::DisplayState;

pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
pub const TOOL_ICONS: [&str; 4] = ["🔧", "🔨", "⚙️", "🛠️"];
pub const WORKFLOW_ICONS: [&str; 4] = ["📋", "📝", "📊", "📈"];

fn cycle(icons: &[&'static str], frame: u64) -> &'static str {
    icons[(frame % icons.len() as u64) as usize]
}

/// Render the one-line progress message for `state` at animation `frame`.
///
/// Deterministic: the same inputs always produce the same string.
pub fn render_status(state: &DisplayState, frame: u64) -> String {
    let kind = state.current_kind();
    let label = title_case(kind);

    if kind.starts_with("tool-") {
        if let Some(tool) = state.tool_name() {
            return format!("{} {label}: {}...", cycle(&TOOL_ICONS, frame), humanize(tool));
        }
    }
    if kind.starts_with("workflow-") {
        if let Some(step) = state.step_name() {
            return format!("{} {label}: {}...", cycle(&WORKFLOW_ICONS, frame), humanize(step));
        }
    }
    if kind.contains("agent") {
        if let Some(agent) = state.agent_name() {
            return format!("{} {label}: {}...", cycle(&SPINNER_FRAMES, frame), humanize(agent));
        }
    }
    format!("{} {label}...", cycle(&SPINNER_FRAMES, frame))
}

/// `tool-call` ⇒ `Tool Call`.
pub fn title_case(kind: &str) -> String {
    kind.split('-').map(capitalize).collect::<Vec<_>>().join(" ")
}

/// Present an identifier to humans: `reverseText` ⇒ `Reverse Text`,
/// `fetch_weather` ⇒ `Fetch Weather`. Splits on `-`, `_`, whitespace and
/// lower-to-upper camel-case boundaries.
pub fn humanize(identifier: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in identifier.chars() {
        if c == '-' || c == '_' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.iter().map(|w| capitalize(w)).collect::<Vec<_>>().join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
