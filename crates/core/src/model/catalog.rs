use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{CourseId, LessonId, ModuleId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("lesson {lesson} does not belong to module {module}")]
    ForeignLesson { lesson: LessonId, module: ModuleId },

    #[error("module {module} does not belong to course {course}")]
    ForeignModule { module: ModuleId, course: CourseId },

    #[error("duplicate lesson id {0}")]
    DuplicateLesson(LessonId),

    #[error("duplicate module id {0}")]
    DuplicateModule(ModuleId),
}

//
// ─── ICONS & ACCENTS ───────────────────────────────────────────────────────────
//

/// Icon vocabulary the catalog backend emits for courses.
///
/// The backend stores icon names as free-form strings; they are converted to
/// this enum once, at the API boundary, so view code never matches on raw
/// strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CourseIcon {
    #[default]
    HeartPulse,
    Shield,
    Brain,
    Heart,
    Scale,
}

impl CourseIcon {
    /// Looks up an icon by its backend name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "HeartPulse" => Some(Self::HeartPulse),
            "Shield" => Some(Self::Shield),
            "Brain" => Some(Self::Brain),
            "Heart" => Some(Self::Heart),
            "Scale" => Some(Self::Scale),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::HeartPulse => "HeartPulse",
            Self::Shield => "Shield",
            Self::Brain => "Brain",
            Self::Heart => "Heart",
            Self::Scale => "Scale",
        }
    }
}

/// Accent color variant assigned to a course card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CourseAccent {
    #[default]
    Primary,
    Secondary,
}

impl CourseAccent {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "primary" => Some(Self::Primary),
            "secondary" => Some(Self::Secondary),
            _ => None,
        }
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// Smallest unit of course content with a completion state.
///
/// Lesson content itself (video, text) is owned by the catalog backend; the
/// client only needs identity, title, and duration for listing and
/// sequencing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    module_id: ModuleId,
    title: String,
    description: Option<String>,
    duration_minutes: u32,
}

impl Lesson {
    /// Creates a new lesson.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyTitle` if the title is empty or
    /// whitespace-only.
    pub fn new(
        id: LessonId,
        module_id: ModuleId,
        title: impl Into<String>,
        description: Option<String>,
        duration_minutes: u32,
    ) -> Result<Self, CatalogError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CatalogError::EmptyTitle);
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            module_id,
            title: title.trim().to_owned(),
            description,
            duration_minutes,
        })
    }

    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn module_id(&self) -> ModuleId {
        self.module_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// Ordered group of lessons within a course.
///
/// The lesson order is authored and pedagogically significant: it is the
/// only order used for "next lesson" sequencing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    id: ModuleId,
    course_id: CourseId,
    title: String,
    description: Option<String>,
    lessons: Vec<Lesson>,
}

impl Module {
    /// Creates a new module from an ordered lesson list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the title is empty, a lesson references a
    /// different module, or two lessons share an id.
    pub fn new(
        id: ModuleId,
        course_id: CourseId,
        title: impl Into<String>,
        description: Option<String>,
        lessons: Vec<Lesson>,
    ) -> Result<Self, CatalogError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CatalogError::EmptyTitle);
        }

        let mut seen = HashSet::new();
        for lesson in &lessons {
            if lesson.module_id() != id {
                return Err(CatalogError::ForeignLesson {
                    lesson: lesson.id(),
                    module: id,
                });
            }
            if !seen.insert(lesson.id()) {
                return Err(CatalogError::DuplicateLesson(lesson.id()));
            }
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            course_id,
            title: title.trim().to_owned(),
            description,
            lessons,
        })
    }

    #[must_use]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Lessons in authored order.
    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A course: ordered modules, each an ordered list of lessons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: Option<String>,
    category: Option<String>,
    icon: CourseIcon,
    accent: CourseAccent,
    modules: Vec<Module>,
}

impl Course {
    /// Creates a new course from an ordered module list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the title is empty, a module references a
    /// different course, or module/lesson ids collide anywhere in the tree.
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        description: Option<String>,
        category: Option<String>,
        icon: CourseIcon,
        accent: CourseAccent,
        modules: Vec<Module>,
    ) -> Result<Self, CatalogError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CatalogError::EmptyTitle);
        }

        let mut module_ids = HashSet::new();
        let mut lesson_ids = HashSet::new();
        for module in &modules {
            if module.course_id() != id {
                return Err(CatalogError::ForeignModule {
                    module: module.id(),
                    course: id,
                });
            }
            if !module_ids.insert(module.id()) {
                return Err(CatalogError::DuplicateModule(module.id()));
            }
            for lesson in module.lessons() {
                if !lesson_ids.insert(lesson.id()) {
                    return Err(CatalogError::DuplicateLesson(lesson.id()));
                }
            }
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());
        let category = category
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty());

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            description,
            category,
            icon,
            accent,
            modules,
        })
    }

    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn icon(&self) -> CourseIcon {
        self.icon
    }

    #[must_use]
    pub fn accent(&self) -> CourseAccent {
        self.accent
    }

    /// Modules in authored order.
    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// All lessons in module order, then lesson order.
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|m| m.lessons().iter())
    }

    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(|m| m.lessons().len()).sum()
    }

    #[must_use]
    pub fn total_duration_minutes(&self) -> u32 {
        self.lessons().map(Lesson::duration_minutes).sum()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
