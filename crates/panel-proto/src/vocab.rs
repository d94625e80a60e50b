//! Advisory vocabulary of recognized command and event names.
//!
//! The tables mirror what the panel firmware understands. They are checked
//! for logging only, never enforced, so a firmware update adding names keeps
//! working against an older bridge.

/// Commands the bridge sends to the panel.
pub const ALL_COMMANDS: &[&str] = &[
    "send_command",
    "send_commands",
    "goto_page",
    "notify",
    "req_device_info",
    "req_device_state",
    "set_brightness",
    "set_sleep_brightness",
    "set_volume",
    "play_sound",
    "sleep",
    "wakeup",
    "reset_device",
];

/// Events the panel reports to the bridge.
pub const ALL_EVENTS: &[&str] = &[
    "connected",
    "heartbeat",
    "res_device_info",
    "res_device_state",
    "component",
    "touch",
    "touch_start",
    "touch_end",
    "gesture",
    "page",
    "sleep",
    "wakeup",
    "brightness",
    "timeout",
    "button_left",
    "button_right",
];

pub fn is_known_command(name: &str) -> bool {
    ALL_COMMANDS.contains(&name)
}

pub fn is_known_event(name: &str) -> bool {
    ALL_EVENTS.contains(&name)
}
