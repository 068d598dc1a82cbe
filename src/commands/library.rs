use anyhow::{Context, Result};

use crate::catalog::{Book, Catalog, Category};
use crate::commands::utils::format_book_line;
use crate::enhance::{self, TextEnhancer};

/// List the catalog, optionally one pole only
pub fn list(catalog: &Catalog, category: Option<Category>) -> Result<()> {
    let books: Vec<&Book> = match category {
        Some(category) => catalog.by_category(category),
        None => catalog.books().iter().collect(),
    };

    match category {
        Some(category) => println!("\n=== {} ===\n", category),
        None => println!("\n=== Catalog ===\n"),
    }

    if books.is_empty() {
        println!("No works in this pole yet.");
        return Ok(());
    }

    for book in &books {
        println!("{}", format_book_line(book));
    }
    println!("\n{} work(s), ★ = premium", books.len());

    if category.is_none() {
        println!("\nPoles:");
        for pole in Category::ALL {
            println!("  {}", pole);
        }
    }

    Ok(())
}

/// Plain or keyword-expanded search
pub async fn search<E: TextEnhancer>(
    catalog: &Catalog,
    enhancer: &E,
    query: &str,
    smart: bool,
) -> Result<()> {
    let results = if smart {
        println!("Analysing query...");
        let (keywords, results) = enhance::smart_search(enhancer, catalog, query).await;
        println!("Suggested keywords: {}", keywords.join(", "));
        results
    } else {
        catalog.search(query)
    };

    if results.is_empty() {
        println!("No document found for this search.");
        return Ok(());
    }

    for book in &results {
        println!("{}", format_book_line(book));
    }

    Ok(())
}

/// Details of one work with a generated preview
pub async fn show<E: TextEnhancer>(catalog: &Catalog, enhancer: &E, id: &str) -> Result<()> {
    let book = catalog
        .find(id)
        .with_context(|| format!("Book not found: {}", id))?;

    println!("\n{}", book.title);
    println!("By {}", book.author);
    println!("{} | {}", book.category, book.language);
    println!("Pages: {}    Format: EPUB3 / PDF", book.pages);
    if !book.cover_url.is_empty() {
        println!("Cover: {}", book.cover_url);
    }

    if !book.description.is_empty() {
        println!("\nAbout this work:\n  {}", book.description);
    }

    let summary = enhance::summarize_book(enhancer, &book.title, &book.author).await;
    println!("\nSmart preview:\n  {}", summary);

    if book.is_premium {
        println!("\nPremium work: free readers have a daily time budget. Read with: biblio read {}", book.id);
    } else {
        println!("\nFree to read: biblio read {}", book.id);
    }

    Ok(())
}
