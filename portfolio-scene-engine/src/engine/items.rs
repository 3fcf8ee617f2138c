use constants::layout::{SIZE_LARGE, SIZE_MEDIUM, SIZE_SMALL};
use constants::palette::{COLOR_TOKENS, DEFAULT_ACCENT, LANGUAGE_COLORS, lookup_color};
use serde::{Deserialize, Serialize};

/// Number of repositories kept by [`rank_repositories`].
pub const MAX_FEATURED_REPOS: usize = 8;

/// Closed set of item kinds. Drives shape choice and overlay badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    #[default]
    Note,
    Quote,
    Link,
    Image,
    Project,
    Skill,
}

impl Category {
    /// Map a category token to its kind. Unknown tokens become `Note`.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "note" | "text" => Category::Note,
            "quote" => Category::Quote,
            "link" => Category::Link,
            "image" | "color" => Category::Image,
            "project" | "repo" | "repository" => Category::Project,
            "skill" => Category::Skill,
            _ => Category::Note,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Note => "note",
            Category::Quote => "quote",
            Category::Link => "link",
            Category::Image => "image",
            Category::Project => "project",
            Category::Skill => "skill",
        }
    }

    /// Capitalised name used as a fallback title and overlay badge.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Note => "Note",
            Category::Quote => "Quote",
            Category::Link => "Link",
            Category::Image => "Image",
            Category::Project => "Project",
            Category::Skill => "Skill",
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from_token(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SizeHint {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizeHint {
    pub fn multiplier(&self) -> f32 {
        match self {
            SizeHint::Small => SIZE_SMALL,
            SizeHint::Medium => SIZE_MEDIUM,
            SizeHint::Large => SIZE_LARGE,
        }
    }
}

impl From<String> for SizeHint {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "small" | "sm" => SizeHint::Small,
            "large" | "lg" => SizeHint::Large,
            _ => SizeHint::Medium,
        }
    }
}

impl From<SizeHint> for String {
    fn from(value: SizeHint) -> Self {
        match value {
            SizeHint::Small => "small",
            SizeHint::Medium => "medium",
            SizeHint::Large => "large",
        }
        .to_string()
    }
}

/// A piece of portfolio content the host page wants in the scene.
///
/// Field aliases accept the host's moodboard payloads (`type`, `title`,
/// `content`, `color`, `size`, `url`) as well as the canonical names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayItem {
    pub id: String,
    #[serde(alias = "type")]
    pub category: Category,
    #[serde(alias = "title", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(alias = "content")]
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(alias = "color", skip_serializing_if = "Option::is_none")]
    pub color_hint: Option<String>,
    #[serde(alias = "size")]
    pub size_hint: SizeHint,
    #[serde(alias = "url", skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
}

impl DisplayItem {
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            category,
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Title shown on the label and overlay; falls back to the category name.
    pub fn display_title(&self) -> String {
        match self.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => self.category.display_name().to_string(),
        }
    }

    /// RGB colour for the item's material.
    ///
    /// Image swatches without a hint use their body when it is a hex literal.
    pub fn resolved_color(&self) -> u32 {
        if self.color_hint.is_none() && self.category == Category::Image {
            if let Some(rgb) = parse_hex_color(&self.body) {
                return rgb;
            }
        }
        resolve_color(self.color_hint.as_deref())
    }
}

/// Resolve a colour hint: `#rrggbb` literal, then semantic token, then
/// repository language, then the default accent.
pub fn resolve_color(hint: Option<&str>) -> u32 {
    let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) else {
        return DEFAULT_ACCENT;
    };

    parse_hex_color(hint)
        .or_else(|| lookup_color(COLOR_TOKENS, hint))
        .or_else(|| lookup_color(LANGUAGE_COLORS, hint))
        .unwrap_or(DEFAULT_ACCENT)
}

fn parse_hex_color(value: &str) -> Option<u32> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Repository entry as returned by the GitHub listing endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RepoRecord {
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub language: Option<String>,
    /// ISO-8601 timestamp; compares chronologically as a string.
    pub updated_at: String,
    pub size: u64,
    pub topics: Vec<String>,
}

impl RepoRecord {
    pub fn into_item(self) -> DisplayItem {
        let size_hint = match self.stargazers_count {
            0..=2 => SizeHint::Small,
            3..=9 => SizeHint::Medium,
            _ => SizeHint::Large,
        };

        DisplayItem {
            id: format!("repo-{}", self.name),
            category: Category::Project,
            label: Some(self.name),
            body: self.description.unwrap_or_default(),
            author: None,
            color_hint: self.language,
            size_hint,
            external_url: Some(self.html_url).filter(|u| !u.is_empty()),
        }
    }
}

/// Pick the repositories worth showing: no profile-page repos, no empty
/// repos, most starred first and most recently updated on ties.
pub fn rank_repositories(mut repos: Vec<RepoRecord>) -> Vec<RepoRecord> {
    repos.retain(|repo| !repo.name.contains(".github.io") && repo.size > 0);
    repos.sort_by(|a, b| {
        b.stargazers_count
            .cmp(&a.stargazers_count)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
    repos.truncate(MAX_FEATURED_REPOS);
    repos
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SkillRecord {
    pub name: String,
    pub level: u8,
    #[serde(default)]
    pub color: Option<String>,
}

impl SkillRecord {
    pub fn into_item(self) -> DisplayItem {
        let size_hint = match self.level {
            95..=u8::MAX => SizeHint::Large,
            90..=94 => SizeHint::Medium,
            _ => SizeHint::Small,
        };

        DisplayItem {
            id: format!("skill-{}", self.name.to_ascii_lowercase().replace(' ', "-")),
            category: Category::Skill,
            label: Some(format!("{} {}%", self.name, self.level)),
            body: format!("Proficiency: {}%", self.level),
            author: None,
            color_hint: self.color,
            size_hint,
            external_url: None,
        }
    }
}

/// Detail payload the host page shows while an item is focused.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusOverlay {
    pub id: String,
    pub title: String,
    pub badge: &'static str,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub color: String,
}

impl FocusOverlay {
    pub fn from_item(item: &DisplayItem) -> Self {
        let attribution = match item.category {
            Category::Quote => item.author.clone().filter(|a| !a.trim().is_empty()),
            _ => None,
        };

        Self {
            id: item.id.clone(),
            title: item.display_title(),
            badge: item.category.display_name(),
            body: item.body.clone(),
            attribution,
            link: item.external_url.clone(),
            color: format!("#{:06x}", item.resolved_color()),
        }
    }
}
