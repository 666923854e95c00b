use crate::{
    core::{Fps, Rgba8, Viewport},
    error::{VitrineError, VitrineResult},
};

/// Complete description of one showcase page: what the loading title says,
/// which sections stack under it, and which projects the index links to.
/// Everything the engine animates is derived from this plus an input script.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Stage {
    pub fps: Fps,
    /// Initial viewport. May be empty; the loading sequence then takes its
    /// fallback path instead of sampling a title raster.
    pub viewport: Viewport,
    pub seed: u64,
    pub title: TitleSpec,
    #[serde(default)]
    pub palette: Palette,
    /// Touch stages never show the project hover preview.
    #[serde(default)]
    pub touch: bool,
    pub sections: Vec<SectionSpec>,
    pub projects: Vec<ProjectSpec>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TitleSpec {
    pub text: String,
    pub size_px: f32,
    /// Font file path, resolved relative to the stage file by the caller.
    /// Without one the title cannot be rasterized and the loading sequence
    /// reveals content without a dissolve.
    #[serde(default)]
    pub font_source: Option<String>,
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    pub background: Rgba8,
    pub surface: Rgba8,
    pub accent: Rgba8,
    pub text: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba8::opaque(18, 20, 28),
            surface: Rgba8::opaque(30, 33, 41),
            accent: Rgba8::opaque(0, 127, 255),
            text: Rgba8::opaque(236, 238, 243),
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SectionSpec {
    pub name: String,
    pub kind: SectionKind,
    /// Section height in viewport heights. The project index grows past this
    /// when its rows need more room.
    #[serde(default = "default_height_vh")]
    pub height_vh: f64,
    /// Whether the section's content block slides in when scrolled into view.
    #[serde(default)]
    pub reveal: bool,
}

fn default_height_vh() -> f64 {
    1.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SectionKind {
    Hero,
    Text,
    ProjectIndex,
    Contact,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ProjectSpec {
    pub slug: String,
    pub name: String,
    /// Image ref shown in the hover preview panel.
    pub preview_image: String,
    /// Ordered gallery image refs for the detail overlay.
    pub images: Vec<String>,
    /// Ordered narrative blocks; scrolling one into the overlay's center band
    /// activates the same-indexed gallery image.
    pub text_sections: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ProjectId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SectionId(pub usize);

impl Stage {
    pub fn validate(&self) -> VitrineResult<()> {
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(VitrineError::validation("fps must have num>0 and den>0"));
        }
        if self.title.text.trim().is_empty() {
            return Err(VitrineError::validation("title text must be non-empty"));
        }
        if !self.title.size_px.is_finite() || self.title.size_px <= 0.0 {
            return Err(VitrineError::validation(
                "title size_px must be finite and > 0",
            ));
        }

        for section in &self.sections {
            if !section.height_vh.is_finite() || section.height_vh <= 0.0 {
                return Err(VitrineError::validation(format!(
                    "section '{}' height_vh must be finite and > 0",
                    section.name
                )));
            }
        }

        let index_sections = self
            .sections
            .iter()
            .filter(|s| s.kind == SectionKind::ProjectIndex)
            .count();
        if index_sections > 1 {
            return Err(VitrineError::validation(
                "at most one project-index section is allowed",
            ));
        }
        if !self.projects.is_empty() && index_sections == 0 {
            return Err(VitrineError::validation(
                "projects require a project-index section",
            ));
        }

        for (i, project) in self.projects.iter().enumerate() {
            if project.slug.trim().is_empty() {
                return Err(VitrineError::validation(format!(
                    "project #{i} slug must be non-empty"
                )));
            }
            if self.projects[..i].iter().any(|p| p.slug == project.slug) {
                return Err(VitrineError::validation(format!(
                    "duplicate project slug '{}'",
                    project.slug
                )));
            }
        }

        Ok(())
    }

    pub fn project(&self, id: ProjectId) -> Option<&ProjectSpec> {
        self.projects.get(id.0)
    }

    pub fn project_by_slug(&self, slug: &str) -> Option<(ProjectId, &ProjectSpec)> {
        self.projects
            .iter()
            .enumerate()
            .find(|(_, p)| p.slug == slug)
            .map(|(i, p)| (ProjectId(i), p))
    }

    /// Built-in stage used by the CLI when no stage file is given, and by
    /// tests that want realistic content without fixtures.
    pub fn demo() -> Self {
        Self {
            fps: Fps { num: 60, den: 1 },
            viewport: Viewport::new(1280, 800),
            seed: 7,
            title: TitleSpec {
                text: "VITRINE STUDIO".to_string(),
                size_px: 96.0,
                font_source: None,
            },
            palette: Palette::default(),
            touch: false,
            sections: vec![
                SectionSpec {
                    name: "hero".to_string(),
                    kind: SectionKind::Hero,
                    height_vh: 1.0,
                    reveal: false,
                },
                SectionSpec {
                    name: "about".to_string(),
                    kind: SectionKind::Text,
                    height_vh: 1.0,
                    reveal: true,
                },
                SectionSpec {
                    name: "projects".to_string(),
                    kind: SectionKind::ProjectIndex,
                    height_vh: 1.0,
                    reveal: true,
                },
                SectionSpec {
                    name: "contact".to_string(),
                    kind: SectionKind::Contact,
                    height_vh: 1.0,
                    reveal: true,
                },
            ],
            projects: vec![
                ProjectSpec {
                    slug: "aurora".to_string(),
                    name: "Aurora Shelving".to_string(),
                    preview_image: "aurora/cover".to_string(),
                    images: (1..=4).map(|i| format!("aurora/{i:02}")).collect(),
                    text_sections: vec![
                        "Brief".to_string(),
                        "Process".to_string(),
                        "Material studies".to_string(),
                        "Outcome".to_string(),
                    ],
                },
                ProjectSpec {
                    slug: "tidemark".to_string(),
                    name: "Tidemark Editions".to_string(),
                    preview_image: "tidemark/cover".to_string(),
                    images: (1..=3).map(|i| format!("tidemark/{i:02}")).collect(),
                    text_sections: vec![
                        "Concept".to_string(),
                        "Print run".to_string(),
                        "Launch".to_string(),
                    ],
                },
                ProjectSpec {
                    // More narrative blocks than images; the gallery clamps
                    // to its last image for the extra blocks.
                    slug: "meridian".to_string(),
                    name: "Meridian Atlas".to_string(),
                    preview_image: "meridian/cover".to_string(),
                    images: (1..=2).map(|i| format!("meridian/{i:02}")).collect(),
                    text_sections: vec![
                        "Survey".to_string(),
                        "Plates".to_string(),
                        "Bindery".to_string(),
                        "Colophon".to_string(),
                    ],
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_validates_and_roundtrips() {
        let stage = Stage::demo();
        stage.validate().unwrap();

        let s = serde_json::to_string_pretty(&stage).unwrap();
        let de: Stage = serde_json::from_str(&s).unwrap();
        assert_eq!(de.projects.len(), 3);
        assert_eq!(de.sections.len(), 4);
        assert_eq!(de.title.text, "VITRINE STUDIO");
    }

    #[test]
    fn validate_rejects_duplicate_slugs() {
        let mut stage = Stage::demo();
        stage.projects[1].slug = stage.projects[0].slug.clone();
        assert!(stage.validate().is_err());
    }

    #[test]
    fn validate_rejects_two_index_sections() {
        let mut stage = Stage::demo();
        stage.sections.push(SectionSpec {
            name: "more-projects".to_string(),
            kind: SectionKind::ProjectIndex,
            height_vh: 1.0,
            reveal: false,
        });
        assert!(stage.validate().is_err());
    }

    #[test]
    fn validate_rejects_projects_without_index_section() {
        let mut stage = Stage::demo();
        stage.sections.retain(|s| s.kind != SectionKind::ProjectIndex);
        assert!(stage.validate().is_err());
    }

    #[test]
    fn validate_accepts_empty_viewport() {
        let mut stage = Stage::demo();
        stage.viewport = Viewport::new(0, 0);
        stage.validate().unwrap();
    }

    #[test]
    fn validate_rejects_blank_title() {
        let mut stage = Stage::demo();
        stage.title.text = "   ".to_string();
        assert!(stage.validate().is_err());
    }

    #[test]
    fn project_lookup_by_slug() {
        let stage = Stage::demo();
        let (id, p) = stage.project_by_slug("tidemark").unwrap();
        assert_eq!(id, ProjectId(1));
        assert_eq!(p.images.len(), 3);
        assert!(stage.project_by_slug("nope").is_none());
    }
}
