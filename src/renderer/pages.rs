//! Page builders - Portfolio content as document blocks.
//!
//! Each route renders into a [`TerminalDocument`](super::TerminalDocument):
//! - Home: hero, about, works, experience and contact sections
//! - Projects: category tabs and the filtered project list
//! - Project: one project in full

use crate::contact::{ContactForm, Field, SubmitStatus};
use crate::content::{Portfolio, Project};
use crate::types::{Attr, Rgba};

use super::buffer::Style;
use super::document::{Block, Paragraph};

/// Frames before each deferred home section mounts.
pub const WORKS_MOUNT_FRAMES: u32 = 2;
pub const EXPERIENCE_MOUNT_FRAMES: u32 = 4;
pub const CONTACT_MOUNT_FRAMES: u32 = 6;

/// Blocks before the first project on the projects page.
pub const PROJECT_LIST_OFFSET: usize = 2;

const HEADING: Style = Style::new(Rgba::SKY, Attr::BOLD);
const SUBTLE: Style = Style::plain(Rgba::SLATE);
const HINT: Style = Style::new(Rgba::SLATE, Attr::DIM);

fn heading(text: impl Into<String>) -> Paragraph {
    Paragraph::new(text, HEADING)
}

fn subtle(text: impl Into<String>) -> Paragraph {
    Paragraph::new(text, SUBTLE)
}

fn hint(text: impl Into<String>) -> Paragraph {
    Paragraph::new(text, HINT)
}

/// Contact form state shown in the contact section.
#[derive(Debug, Clone, Copy)]
pub struct ContactView<'a> {
    pub form: &'a ContactForm,
    pub editing: Option<Field>,
    pub notice: Option<&'a str>,
}

// =============================================================================
// HOME
// =============================================================================

/// Sections of the home page. The hero fills the first screen.
pub fn home_blocks(
    portfolio: &Portfolio,
    featured: usize,
    contact: ContactView<'_>,
    hero_rows: u16,
) -> Vec<Block> {
    vec![
        Block::section("home", hero(portfolio)).min_height(hero_rows),
        Block::section("about", about(portfolio)),
        Block::section("works", works(portfolio, featured)).lazy(WORKS_MOUNT_FRAMES),
        Block::section("experience", experience(portfolio)).lazy(EXPERIENCE_MOUNT_FRAMES),
        Block::section("contact", contact_paragraphs(portfolio, contact)).lazy(CONTACT_MOUNT_FRAMES),
        Block::plain(vec![hint(format!("© {}", portfolio.profile.name))]),
    ]
}

fn hero(portfolio: &Portfolio) -> Vec<Paragraph> {
    let profile = &portfolio.profile;
    vec![
        subtle(profile.greeting.clone()),
        Paragraph::new(profile.name.to_uppercase(), Style::new(Rgba::WHITE, Attr::BOLD)),
        heading(profile.title.clone()),
        Paragraph::blank(),
        Paragraph::plain(profile.summary.clone()),
        Paragraph::blank(),
        Paragraph::new(
            format!(
                "{}+ years experience   {}+ projects completed",
                profile.years, profile.project_count
            ),
            Style::plain(Rgba::EMERALD),
        ),
        Paragraph::blank(),
        hint("View My Work: press 3"),
    ]
}

fn about(portfolio: &Portfolio) -> Vec<Paragraph> {
    let mut paragraphs = vec![
        subtle("ABOUT"),
        heading("Transforming Ideas Into Reality"),
        Paragraph::blank(),
    ];

    for service in &portfolio.services {
        paragraphs.push(Paragraph::new(
            format!("{}  {}", service.number, service.title),
            Style::new(Rgba::WHITE, Attr::BOLD),
        ));
        paragraphs.push(subtle(service.description.clone()));
    }

    paragraphs.push(Paragraph::blank());
    paragraphs.push(heading("Technologies I Work With"));
    for tech in &portfolio.tech_stack {
        paragraphs.push(Paragraph::new(format!("● {}", tech.name), Style::plain(tech.color)));
    }
    paragraphs
}

fn works(portfolio: &Portfolio, featured: usize) -> Vec<Paragraph> {
    let mut paragraphs = vec![subtle("WORKS"), heading("Featured Projects"), Paragraph::blank()];

    for project in portfolio.featured(featured) {
        paragraphs.extend(project_summary(project, false));
        paragraphs.push(Paragraph::blank());
    }

    paragraphs.push(hint("p: all projects   Enter: open the first project"));
    paragraphs
}

fn experience(portfolio: &Portfolio) -> Vec<Paragraph> {
    let mut paragraphs = vec![subtle("EXPERIENCE"), heading("My Journey"), Paragraph::blank()];

    for entry in &portfolio.experiences {
        paragraphs.push(Paragraph::new(
            format!("{} @ {}", entry.role, entry.company),
            Style::new(Rgba::WHITE, Attr::BOLD),
        ));
        paragraphs.push(Paragraph::new(
            format!("{} · {}", entry.kind, entry.period),
            Style::plain(Rgba::EMERALD),
        ));
        paragraphs.push(subtle(entry.description.clone()));
        paragraphs.push(Paragraph::blank());
    }
    paragraphs
}

/// The contact section, rebuilt whenever the form changes.
pub fn contact_paragraphs(portfolio: &Portfolio, view: ContactView<'_>) -> Vec<Paragraph> {
    let mut paragraphs = vec![
        subtle("CONTACT"),
        heading("Let's Work Together"),
        Paragraph::blank(),
        Paragraph::new("Connect With Me", Style::new(Rgba::WHITE, Attr::BOLD)),
    ];

    for link in &portfolio.social {
        paragraphs.push(subtle(format!("{:<10}{}", link.name, link.display_target())));
    }
    paragraphs.push(Paragraph::blank());

    for field in Field::ALL {
        let focused = view.editing == Some(field);
        let cursor = if focused { "▏" } else { "" };
        let style = if focused {
            Style::new(Rgba::SKY, Attr::BOLD)
        } else {
            Style::default()
        };
        paragraphs.push(Paragraph::new(
            format!("{:<9}{}{cursor}", format!("{}:", field.label()), view.form.value(field)),
            style,
        ));
    }
    paragraphs.push(Paragraph::blank());

    let button = match view.form.status() {
        SubmitStatus::Idle => Paragraph::new("[ Send Message ]", Style::new(Rgba::WHITE, Attr::BOLD)),
        SubmitStatus::Submitting => Paragraph::new("Sending...", SUBTLE),
        SubmitStatus::Success => Paragraph::new("Message Sent!", Style::new(Rgba::EMERALD, Attr::BOLD)),
        SubmitStatus::Error => {
            Paragraph::new("Failed to Send. Try Again.", Style::new(Rgba::ROSE, Attr::BOLD))
        }
    };
    paragraphs.push(button);

    if let Some(notice) = view.notice {
        paragraphs.push(Paragraph::new(notice, Style::plain(Rgba::ROSE)));
    }

    paragraphs.push(hint(if view.editing.is_some() {
        "Tab: next field   Enter: send   Esc: stop editing"
    } else {
        "Enter: write a message"
    }));
    paragraphs
}

fn project_summary(project: &Project, selected: bool) -> Vec<Paragraph> {
    let (marker, style) = if selected {
        ("▶ ", Style::new(Rgba::SKY, Attr::BOLD))
    } else {
        ("  ", Style::new(Rgba::WHITE, Attr::BOLD))
    };
    vec![
        Paragraph::new(format!("{marker}{}", project.title), style),
        Paragraph::new(
            format!("  {} · {}", project.category, project.year),
            Style::plain(Rgba::EMERALD),
        ),
        subtle(format!("  {}", project.description)),
        hint(format!("  {}", project.tech.join(", "))),
    ]
}

// =============================================================================
// PROJECTS
// =============================================================================

/// The projects page: tabs, then one block per project in the category.
pub fn projects_blocks(portfolio: &Portfolio, category: &str, selected: usize) -> Vec<Block> {
    let tabs = portfolio
        .categories()
        .into_iter()
        .map(|name| {
            if name == category {
                format!("[{name}]")
            } else {
                format!(" {name} ")
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    let mut blocks = vec![
        Block::plain(vec![subtle("PORTFOLIO"), heading("All Projects")]),
        Block::plain(vec![
            Paragraph::new(tabs, Style::plain(Rgba::WHITE)),
            hint("Tab: next category   j/k: select   Enter: open   Esc: back"),
        ]),
    ];

    let projects = portfolio.filter(category);
    if projects.is_empty() {
        blocks.push(Block::plain(vec![subtle("No projects in this category.")]));
    }
    for (i, project) in projects.into_iter().enumerate() {
        blocks.push(Block::plain(project_summary(project, i == selected)));
    }
    blocks
}

// =============================================================================
// PROJECT DETAIL
// =============================================================================

pub fn project_blocks(project: &Project) -> Vec<Block> {
    let mut features = vec![heading("Key Features")];
    features.extend(project.features.iter().map(|f| Paragraph::plain(format!("• {f}"))));

    vec![
        Block::plain(vec![hint("Esc: back")]),
        Block::plain(vec![
            Paragraph::new(project.title.clone(), Style::new(Rgba::WHITE, Attr::BOLD)),
            Paragraph::new(
                format!("{} · {}", project.category, project.year),
                Style::plain(Rgba::EMERALD),
            ),
            Paragraph::blank(),
            Paragraph::plain(project.full_description.clone()),
        ]),
        Block::plain(features),
        Block::plain(vec![
            heading("Technologies Used"),
            Paragraph::plain(project.tech.join(", ")),
        ]),
        Block::plain(vec![
            heading("Challenges & Solutions"),
            subtle(project.challenges.clone()),
        ]),
        Block::plain(vec![
            subtle(format!("Live demo  {}", project.demo)),
            subtle(format!("Source     {}", project.github)),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn portfolio() -> Portfolio {
        Portfolio::bundled().unwrap()
    }

    fn texts(paragraphs: &[Paragraph]) -> Vec<&str> {
        paragraphs.iter().map(|p| p.text.as_str()).collect()
    }

    #[test]
    fn test_home_sections_in_nav_order() {
        let portfolio = portfolio();
        let form = ContactForm::new("me@example.com", Duration::from_secs(5));
        let view = ContactView { form: &form, editing: None, notice: None };
        let blocks = home_blocks(&portfolio, 4, view, 20);

        let ids: Vec<_> = blocks.iter().filter_map(|b| b.id.as_ref()).map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["home", "about", "works", "experience", "contact"]);
        assert_eq!(blocks[0].min_height, 20);
        assert_eq!(blocks[0].mount_after, 0);
        assert_eq!(blocks[2].mount_after, WORKS_MOUNT_FRAMES);
        assert!(blocks[4].mount_after > blocks[3].mount_after);
    }

    #[test]
    fn test_works_shows_featured_only() {
        let portfolio = portfolio();
        let paragraphs = works(&portfolio, 2);
        let text = texts(&paragraphs).join("\n");
        assert!(text.contains("Shop Mart"));
        assert!(text.contains("Linkedpost"));
        assert!(!text.contains("Weather"));
    }

    #[test]
    fn test_contact_reflects_form() {
        let portfolio = portfolio();
        let mut form = ContactForm::new("me@example.com", Duration::from_secs(5));
        form.update(Field::Name, "Ada");

        let view = ContactView {
            form: &form,
            editing: Some(Field::Email),
            notice: Some("Email is required"),
        };
        let paragraphs = contact_paragraphs(&portfolio, view);
        let text = texts(&paragraphs);

        assert!(text.contains(&"Name:    Ada"));
        assert!(text.contains(&"Email:   ▏"));
        assert!(text.contains(&"[ Send Message ]"));
        assert!(text.contains(&"Email is required"));
    }

    #[test]
    fn test_projects_page_filters_and_marks_selection() {
        let portfolio = portfolio();
        let blocks = projects_blocks(&portfolio, "Web Application", 1);

        assert_eq!(blocks.len(), PROJECT_LIST_OFFSET + 2);
        assert!(blocks[1].paragraphs[0].text.contains("[Web Application]"));
        assert!(blocks[2].paragraphs[0].text.starts_with("  "));
        assert!(blocks[3].paragraphs[0].text.starts_with("▶ "));
    }

    #[test]
    fn test_projects_page_empty_category() {
        let portfolio = portfolio();
        let blocks = projects_blocks(&portfolio, "Games", 0);
        assert_eq!(blocks.len(), PROJECT_LIST_OFFSET + 1);
    }

    #[test]
    fn test_project_detail() {
        let portfolio = portfolio();
        let project = portfolio.project("weather-app").unwrap();
        let blocks = project_blocks(project);

        assert!(blocks.iter().all(|b| b.id.is_none()));
        assert_eq!(blocks[2].paragraphs.len(), project.features.len() + 1);
    }
}
