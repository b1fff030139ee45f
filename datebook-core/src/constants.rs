/// Color given to events that don't carry one.
pub const DEFAULT_EVENT_COLOR: &str = "#3B86FF";

/// Text color of every rendered event.
pub const EVENT_TEXT_COLOR: &str = "#ffffff";

/// Default storage slot holding the serialized event collection.
pub const STORAGE_KEY: &str = "calendar-events";

/// Suffix of the slot holding the id counter under the persisted id policy.
pub const NEXT_ID_KEY_SUFFIX: &str = "-next-id";

pub const EVENT_TITLE_MAX_LENGTH: usize = 30;

/// Viewport width (px) below which the editor popup is centered.
pub const MOBILE_BREAKPOINT: u32 = 640;

/// Shown in the draft preview when the title is cleared.
pub const PREVIEW_PLACEHOLDER: &str = "Event name";

/// Gap (px) between a date cell and the popup anchored below it.
pub const POPUP_OFFSET: f64 = 2.0;

pub const MOBILE_POPUP_WIDTH_PERCENT: u32 = 90;
pub const MOBILE_POPUP_MAX_WIDTH: u32 = 400;

/// Palette offered by the editor form.
pub const EVENT_COLORS: [(&str, &str); 7] = [
    ("Blue", "#3B86FF"),
    ("Green", "#10B981"),
    ("Red", "#EF4444"),
    ("Yellow", "#F59E0B"),
    ("Purple", "#8B5CF6"),
    ("Pink", "#EC4899"),
    ("Orange", "#F97316"),
];

/// Palette value for a palette name or value ("green", "#10b981").
pub fn palette_color(name_or_value: &str) -> Option<&'static str> {
    let wanted = name_or_value.trim();
    EVENT_COLORS
        .iter()
        .find(|(name, value)| name.eq_ignore_ascii_case(wanted) || value.eq_ignore_ascii_case(wanted))
        .map(|(_, value)| *value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_color_by_name_or_value() {
        assert_eq!(palette_color("Green"), Some("#10B981"));
        assert_eq!(palette_color(" purple "), Some("#8B5CF6"));
        assert_eq!(palette_color("#ef4444"), Some("#EF4444"));
        assert_eq!(palette_color("#123456"), None);
        assert_eq!(palette_color("Teal"), None);
    }
}
