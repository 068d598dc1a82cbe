use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Subject poles of the national catalog
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Education,
    Science,
    It,
    Health,
    Law,
    Economics,
    Agriculture,
    Literature,
    Social,
    Arts,
    Religion,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Education,
        Category::Science,
        Category::It,
        Category::Health,
        Category::Law,
        Category::Economics,
        Category::Agriculture,
        Category::Literature,
        Category::Social,
        Category::Arts,
        Category::Religion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Education => "Éducation & Pédagogie",
            Category::Science => "Sciences & Technologies",
            Category::It => "Informatique & Numérique",
            Category::Health => "Médecine & Santé",
            Category::Law => "Droit & Sciences Politiques",
            Category::Economics => "Économie & Gestion",
            Category::Agriculture => "Agriculture & Environnement",
            Category::Literature => "Lettres & Littérature",
            Category::Social => "Sciences Sociales",
            Category::Arts => "Arts & Culture",
            Category::Religion => "Religion & Philosophie",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Language a work is written in
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookLanguage {
    French,
    Moore,
    Dioula,
    Fulfulde,
}

impl BookLanguage {
    pub fn label(&self) -> &'static str {
        match self {
            BookLanguage::French => "Français",
            BookLanguage::Moore => "Mooré",
            BookLanguage::Dioula => "Dioula",
            BookLanguage::Fulfulde => "Fulfuldé",
        }
    }
}

impl fmt::Display for BookLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A work in the catalog
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: Category,
    #[serde(default)]
    pub cover_url: String,
    #[serde(default)]
    pub description: String,
    /// Premium works are gated for free readers
    #[serde(default)]
    pub is_premium: bool,
    pub pages: u32,
    pub language: BookLanguage,
}

impl Book {
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.author.to_lowercase().contains(needle)
            || self.category.label().to_lowercase().contains(needle)
    }
}

/// Read-only catalog of works
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    /// Build a catalog, rejecting empty lists, duplicate ids and empty works
    pub fn new(books: Vec<Book>) -> Result<Self> {
        if books.is_empty() {
            anyhow::bail!("Catalog must contain at least one book");
        }

        let mut seen = HashSet::new();
        for book in &books {
            if book.id.trim().is_empty() {
                anyhow::bail!("Book '{}' has an empty id", book.title);
            }
            if !seen.insert(book.id.as_str()) {
                anyhow::bail!("Duplicate book id: {}", book.id);
            }
            if book.pages == 0 {
                anyhow::bail!("Book '{}' must have at least one page", book.id);
            }
        }

        Ok(Self { books })
    }

    /// Load a catalog from a YAML list of books
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

        let books: Vec<Book> = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;

        Self::new(books).with_context(|| format!("Invalid catalog: {}", path.display()))
    }

    /// The built-in demonstration catalog
    pub fn builtin() -> Self {
        Self {
            books: builtin_books(),
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn find(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn by_category(&self, category: Category) -> Vec<&Book> {
        self.books.iter().filter(|b| b.category == category).collect()
    }

    /// Case-insensitive match on title, author or category; empty query matches everything
    pub fn search(&self, query: &str) -> Vec<&Book> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.books.iter().collect();
        }
        self.books.iter().filter(|b| b.matches(&needle)).collect()
    }
}

fn builtin_books() -> Vec<Book> {
    fn book(
        id: &str,
        title: &str,
        author: &str,
        category: Category,
        seed: &str,
        description: &str,
        is_premium: bool,
        pages: u32,
        language: BookLanguage,
    ) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            category,
            cover_url: format!("https://picsum.photos/seed/{}/400/600", seed),
            description: description.to_string(),
            is_premium,
            pages,
            language,
        }
    }

    vec![
        book(
            "1",
            "Les Soleils des Indépendances",
            "Ahmadou Kourouma",
            Category::Literature,
            "lit1",
            "Un chef-d'œuvre de la littérature africaine explorant les désillusions post-coloniales.",
            false,
            250,
            BookLanguage::French,
        ),
        book(
            "2",
            "Guide Pratique de l'Agriculture au Sahel",
            "Inoussa Kafando",
            Category::Agriculture,
            "agri1",
            "Stratégies de culture du sésame et gestion de l'eau en zone aride.",
            true,
            120,
            BookLanguage::French,
        ),
        book(
            "3",
            "Histoire du Burkina Faso",
            "Roger Bila Kaboré",
            Category::Arts,
            "hist1",
            "De l'empire Mossi à la révolution de Thomas Sankara.",
            false,
            350,
            BookLanguage::French,
        ),
        book(
            "4",
            "Introduction à la Cybersécurité",
            "Abdoulaye Traoré",
            Category::It,
            "it1",
            "Protéger les infrastructures critiques en Afrique de l'Ouest.",
            true,
            280,
            BookLanguage::French,
        ),
        book(
            "5",
            "Code Civil du Burkina Faso",
            "Ministère de la Justice",
            Category::Law,
            "law1",
            "Texte intégral révisé en 2024.",
            false,
            500,
            BookLanguage::French,
        ),
        book(
            "6",
            "Manier le Mooré au quotidien",
            "Lassané Sawadogo",
            Category::Education,
            "edu1",
            "Méthode d'apprentissage rapide de la langue mooré.",
            false,
            150,
            BookLanguage::Moore,
        ),
    ]
}
