//! Catalog state and the lesson lists derived from it

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::catalog::{Lesson, LessonId};
use super::types::Tab;

/// Lifecycle of the catalog fetch
#[derive(Clone, Debug, Default)]
pub enum CatalogState {
    #[default]
    Loading,
    Loaded(Vec<Arc<Lesson>>),
    Failed(String),
}

impl CatalogState {
    pub fn lessons(&self) -> &[Arc<Lesson>] {
        match self {
            CatalogState::Loaded(lessons) => lessons,
            _ => &[],
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub catalog: CatalogState,
    pub favorites: BTreeSet<LessonId>,
}

impl ContentState {
    /// Lessons listed on a tab: the whole catalog on Home, favorites in catalog
    /// order on Favorites, nothing elsewhere.
    pub fn lessons_for(&self, tab: Tab) -> Vec<Arc<Lesson>> {
        let lessons = self.catalog.lessons();
        match tab {
            Tab::Home => lessons.to_vec(),
            Tab::Favorites => lessons
                .iter()
                .filter(|lesson| self.favorites.contains(&lesson.id))
                .cloned()
                .collect(),
            Tab::Settings | Tab::About => Vec::new(),
        }
    }

    pub fn is_favorite(&self, id: &LessonId) -> bool {
        self.favorites.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LessonDuration;

    fn lesson(id: &str) -> Arc<Lesson> {
        Arc::new(Lesson {
            id: LessonId::from(id),
            title: id.to_uppercase(),
            duration: LessonDuration::from_label("5:00"),
            audio: None,
        })
    }

    #[test]
    fn favorites_keep_catalog_order() {
        let state = ContentState {
            catalog: CatalogState::Loaded(vec![lesson("a"), lesson("b"), lesson("c")]),
            favorites: [LessonId::from("c"), LessonId::from("a"), LessonId::from("gone")]
                .into_iter()
                .collect(),
        };

        let ids: Vec<_> = state
            .lessons_for(Tab::Favorites)
            .iter()
            .map(|l| l.id.to_string())
            .collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(state.lessons_for(Tab::Home).len(), 3);
        assert!(state.lessons_for(Tab::About).is_empty());
    }

    #[test]
    fn no_lessons_until_loaded() {
        assert!(CatalogState::Loading.lessons().is_empty());
        assert!(CatalogState::Failed("offline".into()).lessons().is_empty());
    }
}
