/// Class labels, index-aligned with the output neurons of every model.
pub const CLASSES: [&str; 10] = [
    "an airplane",
    "an automobile",
    "a bird",
    "a cat",
    "a deer",
    "a dog",
    "a frog",
    "a horse",
    "a ship",
    "a truck",
];

pub const NUM_CLASSES: usize = CLASSES.len();

/// Uppercases the first character for display, e.g. "an airplane" -> "An airplane".
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
