use std::{
    fmt::Display,
    sync::{
        atomic::{AtomicBool, Ordering},
        LazyLock,
    },
};

use nu_ansi_term::Color;

pub static COLOR: LazyLock<AtomicBool> =
    LazyLock::new(|| AtomicBool::new(std::env::var_os("NO_COLOR").is_none()));

pub fn disable_color() {
    COLOR.store(false, Ordering::Relaxed);
}

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if COLOR.load(Ordering::Relaxed) {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

/// Renders a list as `[a b c]`.
pub fn bracketed<T: Display>(items: &[T]) -> String {
    let inner = items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    format!("[{inner}]")
}

/// Prints a heading followed by one ` * item` line per entry.
pub fn print_bullets<T: Display>(heading: &str, items: impl IntoIterator<Item = T>) {
    println!("{heading}");
    for item in items {
        println!(" * {item}");
    }
}
