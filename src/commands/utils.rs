use crate::catalog::Book;

/// Initialize logging
///
/// `RUST_LOG` wins; otherwise `--verbose` selects debug and the configured
/// level applies.
pub fn init_logging(verbose: bool, configured_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if verbose { "debug" } else { configured_level };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

/// One catalog line: id, title, author, pole, premium marker
pub fn format_book_line(book: &Book) -> String {
    format!(
        "{:>6}  {}{} - {} [{}]",
        book.id,
        if book.is_premium { "★ " } else { "" },
        book.title,
        book.author,
        book.category
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn premium_works_are_marked() {
        let catalog = Catalog::builtin();
        let premium = format_book_line(catalog.find("2").unwrap());
        let free = format_book_line(catalog.find("1").unwrap());

        assert!(premium.contains("★ Guide Pratique"));
        assert!(!free.contains('★'));
        assert!(free.contains("[Lettres & Littérature]"));
    }
}
