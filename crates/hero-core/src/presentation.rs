//! Display attributes for each task category.

use hero_db::models::TaskType;

/// How a task of a given category is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskPresentation {
    /// Icon name (sun, book, moon, palette).
    pub icon: &'static str,
    /// Accent colour name.
    pub accent: &'static str,
    /// Arabic category label.
    pub label: &'static str,
    /// Single character used in terminal listings.
    pub glyph: char,
}

pub fn presentation(task_type: TaskType) -> TaskPresentation {
    match task_type {
        TaskType::QuranMorning => TaskPresentation {
            icon: "sun",
            accent: "yellow",
            label: "حفظ الصباح",
            glyph: '☀',
        },
        TaskType::Language => TaskPresentation {
            icon: "book",
            accent: "blue",
            label: "تعلم اللغات",
            glyph: '✎',
        },
        TaskType::QuranEvening => TaskPresentation {
            icon: "moon",
            accent: "indigo",
            label: "ورد المساء",
            glyph: '☾',
        },
        TaskType::Fun => TaskPresentation {
            icon: "palette",
            accent: "purple",
            label: "نشاط ممتع",
            glyph: '✿',
        },
    }
}
