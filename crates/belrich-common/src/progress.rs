//! Progress bars for long loops. Drawn on stderr and hidden automatically
//! when stderr is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// A bar over `len` items labelled with `message`.
pub fn bar(len: usize, message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    pb.set_style(style);
    pb.set_message(message.into());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_length() {
        let pb = bar(3, "genes");
        pb.inc(2);
        assert_eq!(pb.length(), Some(3));
        assert_eq!(pb.position(), 2);
        pb.finish_and_clear();
    }
}
