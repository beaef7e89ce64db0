//! Portfolio Content - Static site data bundled at build time.
//!
//! The data lives in `content/portfolio.toml` and is compiled into the
//! binary with `include_str!`. It is read-only: pages query it, nothing
//! writes it.
//!
//! - Projects keyed by slug (detail pages, the works section, the projects page)
//! - Services, experience entries, tech stack, social links
//! - Category filtering with an "All" pseudo-category

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::types::Rgba;

/// Bundled portfolio source.
pub const PORTFOLIO_TOML: &str = include_str!("../content/portfolio.toml");

/// Pseudo-category that matches every project.
pub const ALL_CATEGORIES: &str = "All";

// =============================================================================
// RECORDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    pub name: String,
    pub greeting: String,
    pub title: String,
    pub summary: String,
    pub years: u32,
    pub project_count: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub href: String,
}

impl SocialLink {
    /// The link without its scheme, as shown next to the icon.
    pub fn display_target(&self) -> &str {
        self.href
            .strip_prefix("mailto:")
            .or_else(|| self.href.strip_prefix("https://"))
            .unwrap_or(&self.href)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    pub id: u32,
    pub slug: String,
    pub title: String,
    pub category: String,
    pub year: String,
    pub description: String,
    pub full_description: String,
    pub tech: Vec<String>,
    pub features: Vec<String>,
    pub challenges: String,
    pub demo: String,
    pub github: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Service {
    pub number: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Experience {
    pub company: String,
    pub role: String,
    /// Freelance, Education, Training, ...
    pub kind: String,
    pub period: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TechItem {
    pub name: String,
    pub icon: String,
    pub color: Rgba,
}

#[derive(Debug, Deserialize)]
struct RawTechItem {
    name: String,
    icon: String,
    color: String,
}

#[derive(Debug, Deserialize)]
struct RawPortfolio {
    profile: Profile,
    #[serde(default)]
    social: Vec<SocialLink>,
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    services: Vec<Service>,
    #[serde(default)]
    experiences: Vec<Experience>,
    #[serde(default)]
    tech_stack: Vec<RawTechItem>,
}

// =============================================================================
// PORTFOLIO
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub profile: Profile,
    pub social: Vec<SocialLink>,
    pub projects: Vec<Project>,
    pub services: Vec<Service>,
    pub experiences: Vec<Experience>,
    pub tech_stack: Vec<TechItem>,
}

impl Portfolio {
    /// The content compiled into the binary.
    pub fn bundled() -> Result<Self, ContentError> {
        Self::parse(PORTFOLIO_TOML)
    }

    pub fn parse(source: &str) -> Result<Self, ContentError> {
        let raw: RawPortfolio = toml::from_str(source)?;

        for (i, project) in raw.projects.iter().enumerate() {
            if project.slug.is_empty() {
                return Err(ContentError::EmptySlug { title: project.title.clone() });
            }
            if raw.projects[..i].iter().any(|p| p.slug == project.slug) {
                return Err(ContentError::DuplicateSlug(project.slug.clone()));
            }
        }

        let tech_stack = raw
            .tech_stack
            .into_iter()
            .map(|item| -> Result<TechItem, ContentError> {
                let color = Rgba::from_hex(&item.color).ok_or_else(|| ContentError::InvalidColor {
                    name: item.name.clone(),
                    value: item.color.clone(),
                })?;
                Ok(TechItem {
                    name: item.name,
                    icon: item.icon,
                    color,
                })
            })
            .collect::<Result<Vec<_>, ContentError>>()?;

        debug!(
            "loaded portfolio: {} projects, {} services, {} experiences",
            raw.projects.len(),
            raw.services.len(),
            raw.experiences.len()
        );

        Ok(Self {
            profile: raw.profile,
            social: raw.social,
            projects: raw.projects,
            services: raw.services,
            experiences: raw.experiences,
            tech_stack,
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn project(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug == slug)
    }

    /// The first `n` projects, as shown on the home page.
    pub fn featured(&self, n: usize) -> &[Project] {
        &self.projects[..n.min(self.projects.len())]
    }

    /// Projects in a category. [`ALL_CATEGORIES`] matches every project.
    pub fn filter(&self, category: &str) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| category == ALL_CATEGORIES || p.category == category)
            .collect()
    }

    /// "All" followed by each distinct category in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories = vec![ALL_CATEGORIES];
        for project in &self.projects {
            if !categories.contains(&project.category.as_str()) {
                categories.push(&project.category);
            }
        }
        categories
    }
}

/// Errors in bundled or user-supplied portfolio content
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate project slug `{0}`")]
    DuplicateSlug(String),

    #[error("project `{title}` has an empty slug")]
    EmptySlug { title: String },

    #[error("tech `{name}` has invalid color `{value}`")]
    InvalidColor { name: String, value: String },
}
