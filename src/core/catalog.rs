use crate::domain::model::{Course, LevelFilter};
use crate::domain::ports::BackendApi;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Courses matching `filter`, case-insensitively on `level`.
pub fn filter_courses(courses: &[Course], filter: LevelFilter) -> Vec<Course> {
    courses
        .iter()
        .filter(|course| filter.matches(&course.level))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogState {
    pub courses: Vec<Course>,
    pub level_filter: LevelFilter,
    in_flight: usize,
}

impl CatalogState {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Derived view, never stored.
    pub fn filtered(&self) -> Vec<Course> {
        filter_courses(&self.courses, self.level_filter)
    }

    fn load_started(mut self) -> Self {
        self.in_flight += 1;
        self
    }

    fn load_finished(mut self, courses: Vec<Course>) -> Self {
        self.courses = courses;
        self.in_flight = self.in_flight.saturating_sub(1);
        self
    }

    /// The caller dropped the load before a reply arrived; the list is untouched.
    fn load_abandoned(mut self) -> Self {
        self.in_flight = self.in_flight.saturating_sub(1);
        self
    }

    fn with_filter(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }
}

fn lock_state(state: &Mutex<CatalogState>) -> MutexGuard<'_, CatalogState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn apply_to(state: &Mutex<CatalogState>, reducer: impl FnOnce(CatalogState) -> CatalogState) {
    let mut guard = lock_state(state);
    let current = std::mem::take(&mut *guard);
    *guard = reducer(current);
}

/// Holds one `in_flight` slot until the load finishes or its future is dropped.
struct LoadGuard<'a> {
    state: &'a Mutex<CatalogState>,
    armed: bool,
}

impl<'a> LoadGuard<'a> {
    fn start(state: &'a Mutex<CatalogState>) -> Self {
        apply_to(state, CatalogState::load_started);
        Self { state, armed: true }
    }

    fn finish(mut self, courses: Vec<Course>) {
        self.armed = false;
        apply_to(self.state, |state| state.load_finished(courses));
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!("Course catalog load dropped before completion");
            apply_to(self.state, CatalogState::load_abandoned);
        }
    }
}

/// Course list fetched from the backend plus the level selector.
pub struct CatalogViewModel<A: BackendApi> {
    api: A,
    state: Arc<Mutex<CatalogState>>,
}

impl<A: BackendApi + Clone> Clone for CatalogViewModel<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<A: BackendApi> CatalogViewModel<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(CatalogState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        lock_state(&self.state)
    }

    fn apply(&self, reducer: impl FnOnce(CatalogState) -> CatalogState) {
        apply_to(&self.state, reducer);
    }

    /// Replaces the course list with the backend's. Failures leave an empty list.
    pub async fn load_courses(&self) {
        let guard = LoadGuard::start(&self.state);
        tracing::debug!("Loading course catalog");

        let courses = match self.api.fetch_courses().await {
            Ok(courses) => {
                tracing::info!("📚 Loaded {} courses", courses.len());
                courses
            }
            Err(e) => {
                tracing::warn!("Error fetching courses: {}", e);
                Vec::new()
            }
        };

        guard.finish(courses);
    }

    pub fn set_level_filter(&self, level_filter: LevelFilter) {
        tracing::debug!("Level filter set to {}", level_filter);
        self.apply(|state| state.with_filter(level_filter));
    }

    pub fn snapshot(&self) -> CatalogState {
        self.lock().clone()
    }

    pub fn courses(&self) -> Vec<Course> {
        self.lock().courses.clone()
    }

    pub fn filtered_courses(&self) -> Vec<Course> {
        self.lock().filtered()
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.lock().level_filter
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading()
    }

    /// Titles of the full list, used as `course_interest` options.
    pub fn course_titles(&self) -> Vec<String> {
        self.lock().courses.iter().map(|c| c.title.clone()).collect()
    }
}
